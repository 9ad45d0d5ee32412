//! Error types for the Sark bot

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No token provided, try --token or --file to supply one.")]
    TokenMissing,

    #[error("Telegram API error: {0}")]
    TelegramError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<teloxide::RequestError> for Error {
    fn from(err: teloxide::RequestError) -> Self {
        Error::TelegramError(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("digit 12 out of range".to_string());
        assert!(err.to_string().contains("Invalid input"));
        assert!(err.to_string().contains("digit 12"));
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("prefix must not be empty".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("prefix"));
    }

    #[test]
    fn test_error_display_token_missing() {
        let err = Error::TokenMissing;
        assert_eq!(
            err.to_string(),
            "No token provided, try --token or --file to supply one."
        );
    }

    #[test]
    fn test_error_display_telegram_error() {
        let err = Error::TelegramError("flood wait".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Telegram API error"));
        assert!(msg.contains("flood wait"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::IoError(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_error_from_serde_yaml() {
        let yaml_err = serde_yaml::from_str::<Vec<i32>>("{ not: [a list").unwrap_err();
        let err: Error = yaml_err.into();

        assert!(matches!(err, Error::SerializationError(_)));
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_error_display_logging() {
        let err = Error::Logging("global subscriber already set".to_string());
        assert!(err.to_string().contains("Logging setup failed"));
    }

    #[test]
    fn test_error_debug_impl() {
        let err = Error::TokenMissing;
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("TokenMissing"));
    }

    #[test]
    fn test_result_unwrap_or_else() {
        let result: Result<u8> = Err(Error::InvalidInput("bad".to_string()));
        let value = result.unwrap_or_else(|_| 7);
        assert_eq!(value, 7);
    }
}
