use std::sync::Mutex;

/// Counters for one wizard run.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub remote_calls: usize,
    pub rejections: usize,
    pub failures: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_call(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.remote_calls += 1;
        }
    }

    /// Local validation refused the input; nothing went over the wire.
    pub fn record_rejection(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rejections += 1;
        }
    }

    pub fn record_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failures += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_independently() {
        let metrics = MetricsRecorder::new();
        metrics.record_call();
        metrics.record_call();
        metrics.record_rejection();
        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                remote_calls: 2,
                rejections: 1,
                failures: 0,
            }
        );
    }
}
