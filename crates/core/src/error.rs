/// Result alias that carries the custom [`CollageError`] type.
pub type Result<T> = std::result::Result<T, CollageError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum CollageError {
    /// Configuration rejected before any timeline is built.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// Externally supplied data (beat times, props) failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// JSON decoding or encoding failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CollageError {
    pub fn invalid_config<T: Into<String>>(msg: T) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        Self::InvalidInput(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(CollageError::invalid_config("fps")
            .to_string()
            .starts_with("invalid config:"));
        assert!(CollageError::invalid_input("beat")
            .to_string()
            .starts_with("invalid input:"));
    }

    #[test]
    fn io_errors_convert() {
        let err: CollageError = std::fs::read_to_string("/nonexistent/beat-collage.json")
            .unwrap_err()
            .into();
        assert!(matches!(err, CollageError::Io(_)));
    }

    #[test]
    fn json_errors_convert() {
        let err: CollageError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, CollageError::Json(_)));
    }
}
