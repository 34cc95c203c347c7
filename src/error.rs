use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaylistError {
    #[error("rows {start}..={end} moved to {to} fall outside a playlist of {len} entries")]
    OutOfRange {
        start: usize,
        end: usize,
        to: usize,
        len: usize,
    },
    #[error("row range starts at {start} after it ends at {end}")]
    InvertedRange { start: usize, end: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerError {
    #[error("failed to load {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },
    #[error("MIDI output error: {0}")]
    Output(String),
    #[error(transparent)]
    Playlist(#[from] PlaylistError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    #[error("locale tag is empty")]
    Empty,
    #[error("invalid locale tag {0:?}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("dispatch loop is bound to another thread")]
    WrongThread,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("no command given")]
    Empty,
    #[error("unknown command {0:?}")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}
