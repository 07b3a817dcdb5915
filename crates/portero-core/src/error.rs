use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid identifier: {message}")]
    InvalidIdentifier { message: String },

    #[error("Invalid report line: {message}")]
    InvalidReportLine { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl Error {
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            message: message.into(),
        }
    }

    pub fn invalid_report_line(message: impl Into<String>) -> Self {
        Self::InvalidReportLine {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
