use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenfuzzError {
    #[error("template parse error at line {line}: {message}")]
    TemplateParse { line: usize, message: String },

    #[error("genome length mismatch: {left} != {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("coverage oracle failure: {0}")]
    Oracle(String),

    #[error("target send failure: {0}")]
    TargetSend(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenfuzzError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        GenfuzzError::TemplateParse {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GenfuzzError>;
