use crate::commands::Command;
use crate::config;
use crate::core::{Player, PlayerEvents};
use crate::dispatch::{self, DispatchLoop};
use crate::error::{CommandError, PlayerError};
use crate::events::{ErrorListener, Property, PropertyChange, PropertyListener};
use crate::library;
use crate::locale::{Locale, LocaleBus};
use crate::messages::Messages;
use crate::model::PersistedState;
#[cfg(feature = "midi-out")]
use crate::sequencer::MidiOutSequencer;
use crate::sequencer::{NullSequencer, Sequencer};
use crate::table::{Cell, ColumnHeaders, TableModel};
use anyhow::Result;
use parking_lot::Mutex;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Default)]
pub struct AppStartupOptions {
    pub locale: Option<Locale>,
    pub midi_port: Option<String>,
    /// Start from an empty session instead of the saved one.
    pub fresh: bool,
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run(options: AppStartupOptions) -> Result<()> {
    let mut state = if options.fresh {
        PersistedState::default()
    } else {
        config::load_state()?
    };
    if let Some(locale) = &options.locale {
        state.locale = locale.to_string();
    }
    if options.midi_port.is_some() {
        state.midi_port = options.midi_port.clone();
    }

    let sequencer = open_sequencer(state.midi_port.as_deref());
    let mut app = App::new(state, sequencer)?;
    match app.sequencer().output_name() {
        Some(port) => info!(%port, "MIDI output ready"),
        None => info!("no MIDI output, playing silently"),
    }
    for path in options.paths {
        app.execute(Command::Add(path));
        println!("{}", app.status());
    }
    println!("{}", app.status());

    let (lines_tx, lines_rx) = mpsc::channel::<String>();
    thread::Builder::new()
        .name(String::from("stdin"))
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if lines_tx.send(line).is_err() {
                    break;
                }
            }
        })?;

    prompt()?;
    let result: Result<()> = loop {
        if app.maybe_auto_advance() {
            println!("{}", app.status());
            prompt()?;
        }

        match lines_rx.recv_timeout(TICK) {
            Ok(line) => {
                let flow = app.run_command(&line);
                println!("{}", app.status());
                if flow == Flow::Quit {
                    break Ok(());
                }
                prompt()?;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break Ok(()),
        }

        if let Err(err) = app.dispatch.run_pending() {
            break Err(err.into());
        }
    };

    let save_result = app.save();
    app.shutdown();
    result?;
    save_result?;
    Ok(())
}

fn prompt() -> Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

#[cfg(feature = "midi-out")]
fn open_sequencer(port: Option<&str>) -> Box<dyn Sequencer> {
    match MidiOutSequencer::connect(port) {
        Ok(sequencer) => Box::new(sequencer),
        Err(err) => {
            warn!("MIDI output unavailable, playing silently: {err:#}");
            Box::new(NullSequencer::new())
        }
    }
}

#[cfg(not(feature = "midi-out"))]
fn open_sequencer(port: Option<&str>) -> Box<dyn Sequencer> {
    if let Some(port) = port {
        warn!(port, "built without MIDI output, playing silently");
    }
    Box::new(NullSequencer::new())
}

/// The interactive session: one player, its sequencer and the locale they render in.
pub struct App {
    messages: Arc<Messages>,
    bus: LocaleBus,
    player: Player,
    sequencer: Box<dyn Sequencer>,
    dispatch: DispatchLoop,
    transport: Arc<dyn PropertyListener>,
    pending: Arc<Mutex<Vec<Property>>>,
    failures: Arc<Mutex<Vec<PlayerError>>>,
    /// Playlist row the sequencer was started on.
    playing_row: Option<usize>,
    midi_port: Option<String>,
    status: String,
}

impl App {
    /// Binds the dispatch loop to the calling thread, which must be the one
    /// that later calls `run_command`.
    pub fn new(state: PersistedState, sequencer: Box<dyn Sequencer>) -> Result<Self> {
        let locale = Locale::new(&state.locale).unwrap_or_else(|err| {
            warn!("ignoring saved locale: {err}");
            Locale::default()
        });
        let messages = Arc::new(Messages::builtin(locale.clone()));
        let headers = Arc::new(ColumnHeaders::new(Arc::clone(&messages)));
        let bus = LocaleBus::new(locale);
        bus.add_resource_listener(messages.clone());
        bus.add_listener(headers.clone());

        let (queue, dispatch) = dispatch::channel();
        dispatch.bind()?;

        let pending = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&pending);
        let transport: Arc<dyn PropertyListener> = Arc::new(move |change: &PropertyChange| {
            sink.lock().push(change.property);
        });
        let failures = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&failures);
        let on_error: Arc<dyn ErrorListener> = Arc::new(move |error: &PlayerError| {
            sink.lock().push(error.clone());
        });

        let midi_port = state.midi_port.clone();
        let player = Player::from_persisted(state, PlayerEvents::dispatched(queue), headers);
        player.events().errors.subscribe(on_error);

        let app = Self {
            status: messages.get("status.ready"),
            messages,
            bus,
            player,
            sequencer,
            dispatch,
            transport,
            pending,
            failures,
            playing_row: None,
            midi_port,
        };
        app.attach_transport();
        Ok(app)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn sequencer(&self) -> &dyn Sequencer {
        self.sequencer.as_ref()
    }

    pub fn messages(&self) -> &Arc<Messages> {
        &self.messages
    }

    pub fn locale_bus(&self) -> &LocaleBus {
        &self.bus
    }

    pub fn persisted_state(&self) -> PersistedState {
        PersistedState {
            locale: self.bus.locale().to_string(),
            midi_port: self.midi_port.clone(),
            ..self.player.persisted_state()
        }
    }

    pub fn save(&self) -> Result<()> {
        config::save_state(&self.persisted_state())
    }

    pub fn shutdown(&mut self) {
        self.sequencer.stop();
        self.playing_row = None;
        self.bus.shutdown();
    }

    pub fn run_command(&mut self, line: &str) -> Flow {
        match line.parse::<Command>() {
            Ok(command) => self.execute(command),
            Err(err) => {
                self.status = self.describe(&err);
                Flow::Continue
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> Flow {
        debug!(command = command.id(), "running command");
        let flow = self.apply(command);
        self.settle();
        flow
    }

    /// Called every tick. Returns true when it changed what is playing.
    pub fn maybe_auto_advance(&mut self) -> bool {
        if !self.player.is_playing()
            || self.sequencer.current_track().is_none()
            || self.sequencer.is_paused()
            || !self.sequencer.is_finished()
        {
            return false;
        }

        if self.player.move_to_next_song(false) {
            self.play_current();
        } else {
            self.player.stop_playing();
            self.status = self.messages.get("status.end_of_playlist");
        }
        self.settle();
        true
    }

    fn apply(&mut self, command: Command) -> Flow {
        match command {
            Command::Play => {
                if self.player.is_empty() {
                    self.status = self.messages.get("status.empty_playlist");
                } else if !self.player.start_playing() {
                    self.status = self.messages.get("status.nothing_to_do");
                }
            }
            Command::Pause => {
                self.status = if self.player.pause_playing() {
                    self.messages.get("status.paused")
                } else {
                    self.messages.get("status.nothing_to_do")
                };
            }
            Command::Stop => {
                self.status = if self.player.stop_playing() {
                    self.messages.get("status.stopped")
                } else {
                    self.messages.get("status.nothing_to_do")
                };
            }
            Command::Next => {
                if self.player.move_to_next_song(true) {
                    self.after_cursor_move();
                } else {
                    self.status = self.messages.get("status.empty_playlist");
                }
            }
            Command::Previous => {
                if self.player.move_to_previous_song() {
                    self.after_cursor_move();
                } else {
                    self.status = self.messages.get("status.nothing_to_do");
                }
            }
            Command::Goto(index) => {
                if index >= self.player.len() {
                    self.status = self.no_track(index);
                } else {
                    self.player.move_to_song(index);
                    if self.player.is_playing() {
                        self.play_current();
                    } else {
                        self.playing_row = None;
                        self.player.start_playing();
                    }
                }
            }
            Command::Loop(value) => {
                let value = value.unwrap_or(!self.player.is_looping());
                self.player.set_looping(value);
                let word = self.messages.on_off(value);
                self.status = self.messages.format("status.loop", &[&word]);
            }
            Command::PlaylistLoop(value) => {
                let value = value.unwrap_or(!self.player.is_playlist_looping());
                self.player.set_playlist_looping(value);
                let word = self.messages.on_off(value);
                self.status = self.messages.format("status.playlist_loop", &[&word]);
            }
            Command::Shuffle => {
                self.status = if self.player.shuffle_playlist() {
                    self.messages.get("status.shuffled")
                } else {
                    self.messages.get("status.nothing_to_do")
                };
            }
            Command::Sort => {
                self.status = if self.player.sort_playlist() {
                    self.messages.get("status.sorted")
                } else {
                    self.messages.get("status.nothing_to_do")
                };
            }
            Command::Add(path) => {
                let tracks = library::resolve(&path);
                if tracks.is_empty() {
                    self.status = self.messages.format("status.no_midi", &[&path.display()]);
                } else {
                    let count = tracks.len();
                    self.player.add_all(tracks);
                    self.status = self.messages.format("status.added", &[&count]);
                }
            }
            Command::Remove(index) => {
                if self.player.remove(index) {
                    self.status = self.messages.format("status.removed", &[&(index + 1)]);
                } else {
                    self.status = self.no_track(index);
                }
            }
            Command::Move { from, to } => {
                let len = self.player.len();
                if from >= len {
                    self.status = self.no_track(from);
                } else if to >= len {
                    self.status = self.no_track(to);
                } else {
                    match self.player.move_row(from, to) {
                        Ok(true) => {
                            self.status =
                                self.messages.format("status.moved", &[&(from + 1), &(to + 1)]);
                        }
                        Ok(false) => self.status = self.messages.get("status.nothing_to_do"),
                        Err(err) => self.player.report_error(err.into()),
                    }
                }
            }
            Command::Clear => {
                let changed = self.player.clear();
                self.attach_transport();
                self.status = if changed {
                    self.messages.get("status.cleared")
                } else {
                    self.messages.get("status.nothing_to_do")
                };
            }
            Command::List => {
                self.status = if self.player.is_empty() {
                    self.messages.get("status.empty_playlist")
                } else {
                    render_table(&self.player)
                };
            }
            Command::Locale(locale) => {
                if let Some(locale) = locale {
                    self.bus.set_locale(locale);
                }
                let active = self.bus.locale();
                self.status = self.messages.format("status.locale", &[&active]);
            }
            Command::Save => {
                self.status = match self.save() {
                    Ok(()) => self.messages.get("status.saved"),
                    Err(err) => {
                        warn!("failed to save state: {err:#}");
                        self.messages.format("status.save_failed", &[&format!("{err:#}")])
                    }
                };
            }
            Command::Help => self.status = self.messages.get("help.text"),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn describe(&self, err: &CommandError) -> String {
        match err {
            CommandError::Empty => self.messages.get("status.nothing_to_do"),
            CommandError::Unknown(word) => self.messages.format("status.unknown_command", &[word]),
            CommandError::Usage(usage) => self.messages.format("status.usage", &[usage]),
        }
    }

    fn no_track(&self, index: usize) -> String {
        self.messages.format("status.no_track", &[&(index + 1)])
    }

    /// A jump restarts output even when the new row holds the same file.
    fn after_cursor_move(&mut self) {
        if self.player.is_playing() {
            self.play_current();
            return;
        }
        // Paused output belongs to the old row; the next start replays.
        self.playing_row = None;
        if let Some(track) = self.player.current_track() {
            self.status = self.messages.format("status.selected", &[&track.title()]);
        }
    }

    /// `clear` drops every property listener, so this runs again after it.
    fn attach_transport(&self) {
        let properties = &self.player.events().properties;
        if !properties.contains(&self.transport) {
            properties.subscribe(Arc::clone(&self.transport));
        }
    }

    fn settle(&mut self) {
        if let Err(err) = self.dispatch.run_pending() {
            warn!("dispatch queue not drained: {err}");
        }
        self.sync_sequencer();

        let failures = std::mem::take(&mut *self.failures.lock());
        if let Some(error) = failures.last() {
            self.status = self.messages.format("status.error", &[error]);
        }
    }

    fn sync_sequencer(&mut self) {
        loop {
            let changes = std::mem::take(&mut *self.pending.lock());
            if changes.is_empty() {
                break;
            }
            for property in changes {
                match property {
                    Property::Started => self.start_or_resume(),
                    Property::Paused => self.sequencer.pause(),
                    Property::Stopped => {
                        self.sequencer.stop();
                        self.playing_row = None;
                    }
                    // Jumps restart output themselves. Whatever else moves
                    // the cursor (edits, reorders) keeps it on its track.
                    Property::CurrentIndex if self.playing_row.is_some() => {
                        self.playing_row = self.player.current_index();
                    }
                    _ => {}
                }
            }
        }
    }

    fn sequencer_on_current(&self) -> bool {
        self.playing_row.is_some()
            && self.playing_row == self.player.current_index()
            && self.sequencer.current_track() == self.player.current_track()
    }

    fn start_or_resume(&mut self) {
        if !self.player.is_playing() {
            return;
        }
        if !self.sequencer_on_current() {
            self.play_current();
        } else if self.sequencer.is_paused() {
            self.sequencer.resume();
            if let Some(track) = self.player.current_track() {
                self.status = self.messages.format("status.now_playing", &[&track.title()]);
            }
        }
    }

    fn play_current(&mut self) {
        let Some(track) = self.player.current_track().cloned() else {
            return;
        };
        match self.sequencer.play(&track) {
            Ok(()) => {
                self.playing_row = self.player.current_index();
                info!(track = %track, "playing");
                self.status = self.messages.format("status.now_playing", &[&track.title()]);
            }
            Err(err) => {
                self.sequencer.stop();
                self.playing_row = None;
                self.player.report_error(PlayerError::Load {
                    path: track.path().to_path_buf(),
                    reason: format!("{err:#}"),
                });
                self.player.stop_playing();
            }
        }
    }
}

/// One line per row, cells separated by `|`, headers first.
pub fn render_table(model: &dyn TableModel) -> String {
    let columns = model.column_count();
    let mut lines = Vec::with_capacity(model.row_count() + 1);
    lines.push(
        (0..columns)
            .filter_map(|col| model.column_name(col))
            .collect::<Vec<_>>()
            .join(" | "),
    );
    for row in 0..model.row_count() {
        let cells: Vec<String> = (0..columns)
            .map(|col| match model.value_at(row, col) {
                Some(Cell::Flag(true)) => String::from(">"),
                Some(Cell::Flag(false)) | None => String::from(" "),
                Some(Cell::Integer(n)) => n.to_string(),
                Some(Cell::Text(text)) => text,
            })
            .collect();
        lines.push(cells.join(" | "));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Track;
    use crate::sequencer::fixtures::write_song;
    use crate::table::Column;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tempfile::tempdir;

    type Played = Arc<Mutex<Vec<Track>>>;

    struct TestSequencer {
        played: Played,
        finished: Arc<AtomicBool>,
        current: Option<Track>,
        paused: bool,
    }

    impl Sequencer for TestSequencer {
        fn play(&mut self, track: &Track) -> Result<()> {
            if track.path().ends_with("broken.mid") {
                anyhow::bail!("not a MIDI file");
            }
            self.played.lock().push(track.clone());
            self.finished.store(false, Ordering::SeqCst);
            self.current = Some(track.clone());
            self.paused = false;
            Ok(())
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn stop(&mut self) {
            self.current = None;
            self.paused = false;
        }

        fn is_paused(&self) -> bool {
            self.paused
        }

        fn current_track(&self) -> Option<&Track> {
            self.current.as_ref()
        }

        fn position(&self) -> Option<Duration> {
            None
        }

        fn duration(&self) -> Option<Duration> {
            None
        }

        fn is_finished(&self) -> bool {
            self.current.is_some() && self.finished.load(Ordering::SeqCst)
        }

        fn output_name(&self) -> Option<String> {
            Some(String::from("test"))
        }
    }

    fn app_with(names: &[&str]) -> (App, Played, Arc<AtomicBool>) {
        let played = Played::default();
        let finished = Arc::new(AtomicBool::new(false));
        let sequencer = TestSequencer {
            played: Arc::clone(&played),
            finished: Arc::clone(&finished),
            current: None,
            paused: false,
        };
        let state = PersistedState {
            tracks: names.iter().map(|name| Track::from(*name)).collect(),
            ..PersistedState::default()
        };
        let app = App::new(state, Box::new(sequencer)).expect("app");
        (app, played, finished)
    }

    fn played(log: &Played) -> Vec<String> {
        log.lock().iter().map(Track::title).collect()
    }

    #[test]
    fn play_starts_sequencer_on_current_track() {
        let (mut app, log, _) = app_with(&["a.mid", "b.mid"]);

        app.run_command("play");

        assert_eq!(played(&log), vec!["a"]);
        assert_eq!(app.status(), "Now playing a");
        assert!(app.player().is_playing());
    }

    #[test]
    fn pause_then_play_resumes_without_restarting() {
        let (mut app, log, _) = app_with(&["a.mid"]);
        app.run_command("play");

        app.run_command("pause");
        assert!(app.sequencer().is_paused());
        assert_eq!(app.status(), "Paused");

        app.run_command("play");
        assert!(!app.sequencer().is_paused());
        assert_eq!(played(&log), vec!["a"]);
    }

    #[test]
    fn next_while_playing_switches_track() {
        let (mut app, log, _) = app_with(&["a.mid", "b.mid"]);
        app.run_command("play");

        app.run_command("next");

        assert_eq!(played(&log), vec!["a", "b"]);
        assert_eq!(app.status(), "Now playing b");
    }

    #[test]
    fn next_while_stopped_only_selects() {
        let (mut app, log, _) = app_with(&["a.mid", "b.mid"]);

        app.run_command("next");

        assert!(played(&log).is_empty());
        assert_eq!(app.player().current_index(), Some(1));
        assert_eq!(app.status(), "Selected b");
    }

    #[test]
    fn auto_advance_plays_next_track_when_finished() {
        let (mut app, log, finished) = app_with(&["a.mid", "b.mid"]);
        app.run_command("play");
        finished.store(true, Ordering::SeqCst);

        assert!(app.maybe_auto_advance());

        assert_eq!(played(&log), vec!["a", "b"]);
        assert_eq!(app.player().current_index(), Some(1));
    }

    #[test]
    fn auto_advance_stops_when_playlist_ends() {
        let (mut app, _, finished) = app_with(&["a.mid"]);
        app.run_command("play");
        finished.store(true, Ordering::SeqCst);

        assert!(app.maybe_auto_advance());

        assert_eq!(app.status(), "Reached end of playlist");
        assert!(!app.player().is_playing());
        assert!(app.sequencer().current_track().is_none());
        assert!(!app.maybe_auto_advance());
    }

    #[test]
    fn duplicate_rows_each_play_on_auto_advance() {
        let (mut app, log, finished) = app_with(&["a.mid", "a.mid", "b.mid"]);
        app.run_command("play");

        finished.store(true, Ordering::SeqCst);
        assert!(app.maybe_auto_advance());
        finished.store(true, Ordering::SeqCst);
        assert!(app.maybe_auto_advance());

        assert_eq!(played(&log), vec!["a", "a", "b"]);
        assert_eq!(app.player().current_index(), Some(2));
    }

    #[test]
    fn next_onto_same_file_restarts_output() {
        let (mut app, log, _) = app_with(&["a.mid", "a.mid"]);
        app.run_command("play");

        app.run_command("next");

        assert_eq!(played(&log), vec!["a", "a"]);
        assert_eq!(app.player().current_index(), Some(1));
        assert_eq!(app.status(), "Now playing a");
    }

    #[test]
    fn jump_while_paused_replays_new_row() {
        let (mut app, log, _) = app_with(&["a.mid", "a.mid"]);
        app.run_command("play");
        app.run_command("pause");

        app.run_command("next");
        assert_eq!(played(&log), vec!["a"]);
        app.run_command("play");

        assert_eq!(played(&log), vec!["a", "a"]);
        assert!(!app.sequencer().is_paused());
    }

    #[test]
    fn reordering_keeps_current_output() {
        let (mut app, log, _) = app_with(&["a.mid", "b.mid"]);
        app.run_command("play");

        app.run_command("move 1 2");
        assert_eq!(
            app.player().tracks(),
            &[Track::from("b.mid"), Track::from("a.mid")]
        );
        assert_eq!(app.player().current_index(), Some(1));
        assert_eq!(played(&log), vec!["a"]);

        app.run_command("pause");
        app.run_command("play");

        assert_eq!(played(&log), vec!["a"]);
        assert!(!app.sequencer().is_paused());
    }

    #[test]
    fn looping_track_replays() {
        let (mut app, log, finished) = app_with(&["a.mid", "b.mid"]);
        app.run_command("loop on");
        app.run_command("play");
        finished.store(true, Ordering::SeqCst);

        app.maybe_auto_advance();

        assert_eq!(played(&log), vec!["a", "a"]);
        assert_eq!(app.player().current_index(), Some(0));
    }

    #[test]
    fn unknown_command_is_reported() {
        let (mut app, _, _) = app_with(&[]);
        app.run_command("wat");
        assert!(app.status().contains("Unknown command"));

        app.run_command("goto zero");
        assert_eq!(app.status(), "Usage: goto <n>");
    }

    #[test]
    fn load_failure_is_reported_and_stops() {
        let (mut app, _, _) = app_with(&["broken.mid"]);

        app.run_command("play");

        assert!(app.status().starts_with("Playback error"));
        assert!(app.status().contains("not a MIDI file"));
        assert!(!app.player().is_playing());
    }

    #[test]
    fn clear_keeps_transport_wired() {
        let dir = tempdir().expect("tempdir");
        write_song(dir.path(), "fresh.mid", 500_000);
        let (mut app, log, _) = app_with(&["a.mid"]);
        app.run_command("play");

        app.run_command("clear");
        assert_eq!(app.status(), "Playlist cleared");
        assert!(app.sequencer().current_track().is_none());

        app.run_command(&format!("add {}", dir.path().display()));
        assert_eq!(app.status(), "Added 1 tracks");
        app.run_command("play");

        assert_eq!(played(&log), vec!["a", "fresh"]);
    }

    #[test]
    fn removing_current_track_stops_output() {
        let (mut app, _, _) = app_with(&["a.mid", "b.mid"]);
        app.run_command("play");

        app.run_command("remove 1");

        assert_eq!(app.status(), "Removed track 1");
        assert!(app.sequencer().current_track().is_none());
        assert_eq!(app.player().current_track(), Some(&Track::from("b.mid")));
    }

    #[test]
    fn moves_use_one_based_positions() {
        let (mut app, _, _) = app_with(&["a.mid", "b.mid", "c.mid"]);

        app.run_command("move 3 1");
        assert_eq!(app.status(), "Moved track 3 to 1");
        assert_eq!(
            app.player().tracks(),
            &[Track::from("c.mid"), Track::from("a.mid"), Track::from("b.mid")]
        );

        app.run_command("move 4 1");
        assert_eq!(app.status(), "No track 4");
    }

    #[test]
    fn locale_command_relabels_status_and_headers() {
        let (mut app, _, _) = app_with(&["a.mid"]);

        app.run_command("locale de");

        assert_eq!(app.status(), "Sprache: de");
        assert_eq!(app.player().headers().name(Column::Title), "Titel");
        app.run_command("list");
        assert_eq!(
            app.status().lines().next(),
            Some("Aktuell | # | Titel | Datei")
        );
        assert_eq!(app.persisted_state().locale, "de");
    }

    #[test]
    fn list_marks_current_row() {
        let (mut app, _, _) = app_with(&["a.mid", "b.mid"]);

        app.run_command("list");

        let lines: Vec<&str> = app.status().lines().collect();
        assert_eq!(lines[1], "> | 1 | a | a.mid");
        assert_eq!(lines[2], "  | 2 | b | b.mid");
    }
}
