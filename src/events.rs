use crate::error::PlayerError;
use crate::model::PlaybackState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    PlaylistSize,
    CurrentIndex,
    /// Coarse "the playlist content changed" signal. Carries no values.
    Contents,
    Looping,
    PlaylistLooping,
    Started,
    Paused,
    Stopped,
}

impl Property {
    pub fn name(self) -> &'static str {
        match self {
            Self::PlaylistSize => "playlistSize",
            Self::CurrentIndex => "currentIndex",
            Self::Contents => "contents",
            Self::Looping => "looping",
            Self::PlaylistLooping => "playlistLooping",
            Self::Started => "started",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Count(usize),
    Cursor(Option<usize>),
    Bool(bool),
    State(PlaybackState),
}

/// A property transition. A missing side means "unknown" and always fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChange {
    pub property: Property,
    pub old: Option<Value>,
    pub new: Option<Value>,
}

impl PropertyChange {
    pub fn new(property: Property, old: Value, new: Value) -> Self {
        Self {
            property,
            old: Some(old),
            new: Some(new),
        }
    }

    pub fn unknown(property: Property) -> Self {
        Self {
            property,
            old: None,
            new: None,
        }
    }
}

pub trait PropertyListener: Send + Sync {
    fn property_changed(&self, change: &PropertyChange);
}

impl<F> PropertyListener for F
where
    F: Fn(&PropertyChange) + Send + Sync,
{
    fn property_changed(&self, change: &PropertyChange) {
        self(change)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEvent {
    DataChanged,
    RowsUpdated { first: usize, last: usize },
}

impl TableEvent {
    /// Covers the rows that held and now hold the cursor, if any.
    pub fn cursor_rows(old: Option<usize>, new: Option<usize>) -> Self {
        match (old, new) {
            (Some(a), Some(b)) => Self::RowsUpdated {
                first: a.min(b),
                last: a.max(b),
            },
            (Some(row), None) | (None, Some(row)) => Self::RowsUpdated {
                first: row,
                last: row,
            },
            (None, None) => Self::DataChanged,
        }
    }
}

pub trait TableListener: Send + Sync {
    fn table_changed(&self, event: &TableEvent);
}

impl<F> TableListener for F
where
    F: Fn(&TableEvent) + Send + Sync,
{
    fn table_changed(&self, event: &TableEvent) {
        self(event)
    }
}

pub trait ErrorListener: Send + Sync {
    fn error_occurred(&self, error: &PlayerError);
}

impl<F> ErrorListener for F
where
    F: Fn(&PlayerError) + Send + Sync,
{
    fn error_occurred(&self, error: &PlayerError) {
        self(error)
    }
}
