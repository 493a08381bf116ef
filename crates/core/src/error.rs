/// Result alias that carries the custom [`ChordSheetError`] type.
pub type Result<T> = std::result::Result<T, ChordSheetError>;

/// Common error type for the core crate.
///
/// User data alone never produces one of these: lyrics, chord symbols and
/// ChordPro text are all accepted and resolved to a well formed song. The
/// id variants signal that the caller addressed an entity that is not part
/// of the song it passed in.
#[derive(Debug, thiserror::Error)]
pub enum ChordSheetError {
    #[error("section `{0}` does not exist in this song")]
    SectionNotFound(String),
    #[error("line `{0}` does not exist in this section")]
    LineNotFound(String),
    #[error("token `{0}` does not exist in this line")]
    TokenNotFound(String),
    /// Whitespace tokens never carry a chord.
    #[error("token `{0}` is whitespace and cannot hold a chord")]
    SpaceToken(String),
    #[error("a song must keep at least one section")]
    LastSection,
    /// Editor configuration could not be decoded.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Message(String),
}

impl ChordSheetError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for ChordSheetError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for ChordSheetError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
