use std::time::Duration;
use tokio::time::sleep;

pub const STEP_MARKER: &str = "🚀";

/// Where processing status lines are shown.
pub trait StatusSink {
    fn show(&mut self, line: &str);
    fn hide(&mut self);
}

#[derive(Default)]
pub struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn show(&mut self, line: &str) {
        println!("  {line}");
    }

    fn hide(&mut self) {
        println!();
    }
}

/// Shows each step followed by `interval`, then hides the status area.
pub async fn play_steps<S: StatusSink>(steps: &[String], interval: Duration, sink: &mut S) {
    for step in steps {
        sink.show(&format!("{step} {STEP_MARKER}"));
        sleep(interval).await;
    }
    sink.hide();
}
