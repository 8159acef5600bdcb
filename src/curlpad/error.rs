use thiserror::Error;

#[derive(Error, Debug)]
pub enum CurlpadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("{0}")]
    MissingDependency(String),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Invalid curl command: {command} ({reason})")]
    InvalidCommand { command: String, reason: String },

    #[error("Failed to execute command: {0}")]
    Execution(String),

    #[error("{0}")]
    Install(String),

    #[error("Failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

pub type Result<T> = std::result::Result<T, CurlpadError>;
