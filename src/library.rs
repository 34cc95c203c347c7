use crate::model::Track;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const MIDI_EXTENSIONS: &[&str] = &["mid", "midi", "kar", "rmi", "smf"];

pub fn is_midi_file(path: &Path) -> bool {
    let ext = path.extension().and_then(OsStr::to_str).unwrap_or_default();
    MIDI_EXTENSIONS
        .iter()
        .any(|supported| ext.eq_ignore_ascii_case(supported))
}

pub fn scan_folder(root: &Path) -> Vec<Track> {
    let mut tracks: Vec<Track> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && is_midi_file(entry.path()))
        .map(|entry| Track::new(PathBuf::from(entry.path())))
        .collect();

    tracks.sort();
    debug!(root = %root.display(), found = tracks.len(), "scanned folder");
    tracks
}

/// A MIDI file resolves to itself, a folder to the MIDI files below it.
pub fn resolve(path: &Path) -> Vec<Track> {
    if path.is_dir() {
        scan_folder(path)
    } else if path.is_file() && is_midi_file(path) {
        vec![Track::new(path)]
    } else {
        Vec::new()
    }
}
