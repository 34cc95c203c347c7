use crate::locale::LocaleListener;
use crate::messages::Messages;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Current,
    Index,
    Title,
    Path,
}

impl Column {
    pub const ALL: [Column; 4] = [Column::Current, Column::Index, Column::Title, Column::Path];

    pub fn from_index(col: usize) -> Option<Self> {
        Self::ALL.get(col).copied()
    }

    pub fn message_key(self) -> &'static str {
        match self {
            Self::Current => "column.current",
            Self::Index => "column.index",
            Self::Title => "column.title",
            Self::Path => "column.path",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Self::Current => ColumnKind::Flag,
            Self::Index => ColumnKind::Integer,
            Self::Title | Self::Path => ColumnKind::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Flag,
    Integer,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Flag(bool),
    Integer(usize),
    Text(String),
}

pub trait TableModel {
    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;
    fn column_name(&self, col: usize) -> Option<String>;
    fn column_kind(&self, col: usize) -> Option<ColumnKind>;
    fn value_at(&self, row: usize, col: usize) -> Option<Cell>;

    fn is_cell_editable(&self, _row: usize, _col: usize) -> bool {
        false
    }
}

/// Column titles, re-pulled from the catalog whenever the locale changes.
#[derive(Debug)]
pub struct ColumnHeaders {
    messages: Arc<Messages>,
    names: RwLock<Vec<String>>,
}

impl ColumnHeaders {
    pub fn new(messages: Arc<Messages>) -> Self {
        let names = resolve_names(&messages);
        Self {
            messages,
            names: RwLock::new(names),
        }
    }

    pub fn name(&self, column: Column) -> String {
        self.names
            .read()
            .get(column as usize)
            .cloned()
            .unwrap_or_default()
    }

    pub fn names(&self) -> Vec<String> {
        self.names.read().clone()
    }

    pub fn messages(&self) -> &Arc<Messages> {
        &self.messages
    }
}

impl Default for ColumnHeaders {
    fn default() -> Self {
        Self::new(Arc::new(Messages::default()))
    }
}

impl LocaleListener for ColumnHeaders {
    fn refresh_locale(&self) {
        *self.names.write() = resolve_names(&self.messages);
    }
}

fn resolve_names(messages: &Messages) -> Vec<String> {
    Column::ALL
        .iter()
        .map(|column| messages.get(column.message_key()))
        .collect()
}
