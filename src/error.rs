//! Error types for the weekboard client and configuration loading.
//!
//! [`ClientError`] covers every way a [`TaskApi`](crate::client::TaskApi)
//! call can fail. [`ConfigError`] covers reading and parsing configuration
//! files. Store-side failures are [`TaskError`] from `weekboard-tasks`.

use weekboard_tasks::TaskError;

/// Errors returned by [`TaskApi`](crate::client::TaskApi) implementations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connection-level failure (DNS, TCP connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status and an error body.
    #[error("HTTP {status}: {error}: {details}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Short `error` field of the response body.
        error: String,
        /// `details` field of the response body.
        details: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Failure reported by an in-process store.
    #[error(transparent)]
    Task(#[from] TaskError),

    /// The request was rejected locally before being sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    /// Returns the HTTP status associated with this error, if any.
    ///
    /// In-process store errors report the status the server would have
    /// answered with.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Task(err) => Some(err.status_code()),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            Self::Decode(_) | Self::InvalidInput(_) => None,
        }
    }

    /// Returns `true` if the store rejected a stale write.
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// Returns `true` if the target task does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Errors that occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("Failed to parse config TOML: {source}")]
    Parse {
        #[from]
        source: toml::de::Error,
    },

    /// The config file could not be read from disk.
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        source: std::io::Error,
        path: String,
    },

    /// An environment variable held a value of the wrong shape.
    #[error("Invalid value for {name}: {message}")]
    Env { name: &'static str, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_and_status() {
        let err = ClientError::Api {
            status: 404,
            error: "Task not found".to_string(),
            details: "task not found: abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP 404: Task not found: task not found: abc"
        );
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert!(!err.is_conflict());
    }

    #[test]
    fn task_error_reports_wire_status() {
        let err = ClientError::from(TaskError::ConcurrentModification {
            task_id: "t".to_string(),
            expected_version: 1,
            actual_version: 2,
        });
        assert!(err.is_conflict());
        assert!(err.to_string().contains("modified concurrently"));
    }

    #[test]
    fn local_errors_have_no_status() {
        assert_eq!(ClientError::InvalidInput("blank".into()).status(), None);
        assert_eq!(ClientError::Decode("eof".into()).status(), None);
    }

    #[test]
    fn config_parse_error_from_toml() {
        let toml_err = toml::from_str::<toml::Value>("= nope").unwrap_err();
        let err = ConfigError::from(toml_err);
        assert!(err.to_string().starts_with("Failed to parse config TOML"));
    }
}
