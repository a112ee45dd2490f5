/// Failure talking to the trajectory backend.
#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    #[error("invalid backend URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP error! Status: {status}{}", detail_suffix(.detail))]
    Status {
        endpoint: &'static str,
        status: u16,
        detail: Option<String>,
    },
    #[error("could not decode {endpoint} reply: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// The backend answered, but with an `error` field.
    #[error("{message}")]
    Server {
        endpoint: &'static str,
        message: String,
    },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_ref()
        .map(|text| format!(" ({text})"))
        .unwrap_or_default()
}

impl BackendError {
    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidUrl { .. } => None,
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. }
            | Self::Server { endpoint, .. } => Some(*endpoint),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_includes_server_detail_when_present() {
        let err = BackendError::Status {
            endpoint: "process_trajectory",
            status: 500,
            detail: Some("TLE data file not found".into()),
        };
        assert_eq!(
            err.to_string(),
            "HTTP error! Status: 500 (TLE data file not found)"
        );
        let err = BackendError::Status {
            endpoint: "get_rockets",
            status: 502,
            detail: None,
        };
        assert_eq!(err.to_string(), "HTTP error! Status: 502");
        assert_eq!(err.endpoint(), Some("get_rockets"));
    }
}
