/// Result alias that carries the custom [`BoardError`] type.
pub type Result<T> = std::result::Result<T, BoardError>;

/// Common error type for the core crate.
///
/// Rendering itself never fails on bad data; degenerate inputs become
/// placeholder rows. The variants below only cover the boundaries where the
/// crate talks to the outside world.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// A document parsed but holds values the board cannot run with.
    #[error("{0}")]
    Message(String),
    /// Writing to the terminal or reading a file failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// A configuration or session document could not be parsed.
    #[error("invalid document: {0}")]
    Config(#[from] serde_json::Error),
}

impl BoardError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for BoardError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for BoardError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
