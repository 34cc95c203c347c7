use crate::model::PersistedState;
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

pub const CONFIG_DIR_ENV: &str = "MIDIPLAY_CONFIG_DIR";
const STATE_FILE: &str = "state.json";

pub fn config_root() -> Result<PathBuf> {
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }

    ["HOME", "USERPROFILE"]
        .into_iter()
        .find_map(env::var_os)
        .map(|home| PathBuf::from(home).join(".config").join("midiplay"))
        .with_context(|| format!("no session directory: set {CONFIG_DIR_ENV} or HOME"))
}

pub fn state_path() -> Result<PathBuf> {
    Ok(config_root()?.join(STATE_FILE))
}

/// A missing file is a fresh session.
pub fn load_state() -> Result<PersistedState> {
    let path = state_path()?;
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(PersistedState::default()),
        Err(err) => {
            return Err(err).with_context(|| format!("cannot read session {}", path.display()));
        }
    };
    serde_json::from_str(&raw)
        .with_context(|| format!("session {} holds no valid state", path.display()))
}

pub fn save_state(state: &PersistedState) -> Result<()> {
    let path = state_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("cannot create session directory {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(state).context("cannot encode session")?;
    fs::write(&path, json).with_context(|| format!("cannot write session {}", path.display()))?;
    debug!(path = %path.display(), "session saved");
    Ok(())
}
