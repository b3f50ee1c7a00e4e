/// Result alias that carries the custom [`SongSyncError`] type.
pub type Result<T> = std::result::Result<T, SongSyncError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum SongSyncError {
    /// Free-form failure that does not warrant its own variant.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// A cue line without the `action:argument` separator.
    #[error("line {line}: expected `action:argument`, found {text:?}")]
    MissingSeparator { line: usize, text: String },
    /// A `sleep` cue whose argument is not a usable number of seconds.
    #[error("line {line}: invalid sleep duration {value:?}")]
    InvalidDuration { line: usize, value: String },
    /// An `off` cue for an effect that is not currently running.
    #[error("effect `{0}` is not active")]
    InactiveEffect(String),
    /// The audio player executable could not be started.
    #[error("failed to launch audio player `{program}`: {source}")]
    PlayerSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// Installing the interrupt handler failed.
    #[error("failed to install interrupt handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

impl SongSyncError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for SongSyncError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for SongSyncError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
