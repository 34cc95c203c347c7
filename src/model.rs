use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

/// A playable MIDI file. Ordered by path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Track(PathBuf);

impl Track {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn title(&self) -> String {
        self.0
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or("unknown")
            .to_string()
    }
}

impl From<PathBuf> for Track {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl From<&str> for Track {
    fn from(path: &str) -> Self {
        Self(PathBuf::from(path))
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn message_key(self) -> &'static str {
        match self {
            Self::Stopped => "state.stopped",
            Self::Playing => "state.playing",
            Self::Paused => "state.paused",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub current_index: Option<usize>,
    #[serde(default)]
    pub looping: bool,
    #[serde(default)]
    pub playlist_looping: bool,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub midi_port: Option<String>,
}

fn default_locale() -> String {
    String::from("en")
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            tracks: Vec::new(),
            current_index: None,
            looping: false,
            playlist_looping: false,
            locale: default_locale(),
            midi_port: None,
        }
    }
}
