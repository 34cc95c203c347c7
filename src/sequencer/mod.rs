use crate::model::Track;
use anyhow::Result;
use std::time::{Duration, Instant};

#[cfg(feature = "midi-out")]
mod midi_out;
pub mod song;

#[cfg(feature = "midi-out")]
pub use midi_out::MidiOutSequencer;
pub use song::{Song, TimedMessage};

pub trait Sequencer {
    fn play(&mut self, track: &Track) -> Result<()>;
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);
    fn is_paused(&self) -> bool;
    fn current_track(&self) -> Option<&Track>;
    fn position(&self) -> Option<Duration>;
    fn duration(&self) -> Option<Duration>;
    fn is_finished(&self) -> bool;
    fn output_name(&self) -> Option<String>;
}

/// Play position that stands still while paused.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    offset: Duration,
    started_at: Option<Instant>,
}

impl Clock {
    pub fn start(&mut self) {
        self.offset = Duration::ZERO;
        self.started_at = Some(Instant::now());
    }

    pub fn pause(&mut self) {
        self.offset = self.elapsed();
        self.started_at = None;
    }

    pub fn resume(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    pub fn reset(&mut self) {
        self.offset = Duration::ZERO;
        self.started_at = None;
    }

    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started_at) => self.offset.saturating_add(started_at.elapsed()),
            None => self.offset,
        }
    }
}

#[derive(Debug, Default)]
pub struct NullSequencer {
    current: Option<Track>,
    duration: Option<Duration>,
    clock: Clock,
    paused: bool,
}

impl NullSequencer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sequencer for NullSequencer {
    fn play(&mut self, track: &Track) -> Result<()> {
        let song = Song::load(track.path())?;
        self.current = Some(track.clone());
        self.duration = Some(song.duration);
        self.paused = false;
        self.clock.start();
        Ok(())
    }

    fn pause(&mut self) {
        self.clock.pause();
        self.paused = true;
    }

    fn resume(&mut self) {
        if self.current.is_some() {
            self.clock.resume();
        }
        self.paused = false;
    }

    fn stop(&mut self) {
        self.current = None;
        self.duration = None;
        self.paused = false;
        self.clock.reset();
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn current_track(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    fn position(&self) -> Option<Duration> {
        self.current.as_ref()?;
        let position = self.clock.elapsed();
        Some(match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        })
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn is_finished(&self) -> bool {
        match (self.position(), self.duration) {
            (Some(position), Some(duration)) => !self.paused && position >= duration,
            _ => false,
        }
    }

    fn output_name(&self) -> Option<String> {
        None
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::write_song;
    use super::*;
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn null_sequencer_finishes_after_song_duration() {
        let dir = tempdir().expect("tempdir");
        let track = Track::new(write_song(dir.path(), "short.mid", 20_000));
        let mut sequencer = NullSequencer::new();

        sequencer.play(&track).expect("play");
        assert_eq!(sequencer.duration(), Some(Duration::from_millis(20)));
        assert_eq!(sequencer.current_track(), Some(&track));
        thread::sleep(Duration::from_millis(40));

        assert!(sequencer.is_finished());
        assert_eq!(sequencer.position(), Some(Duration::from_millis(20)));
    }

    #[test]
    fn paused_sequencer_holds_position() {
        let dir = tempdir().expect("tempdir");
        let track = Track::new(write_song(dir.path(), "long.mid", 5_000_000));
        let mut sequencer = NullSequencer::new();
        sequencer.play(&track).expect("play");
        thread::sleep(Duration::from_millis(10));

        sequencer.pause();
        let held = sequencer.position().expect("position");
        thread::sleep(Duration::from_millis(20));

        assert!(sequencer.is_paused());
        assert_eq!(sequencer.position(), Some(held));
        assert!(!sequencer.is_finished());

        sequencer.resume();
        thread::sleep(Duration::from_millis(10));
        assert!(sequencer.position().expect("position") > held);
    }

    #[test]
    fn unreadable_track_fails_to_play() {
        let mut sequencer = NullSequencer::new();
        assert!(sequencer.play(&Track::from("missing/nowhere.mid")).is_err());
        assert_eq!(sequencer.current_track(), None);
    }

    #[test]
    fn stop_forgets_track() {
        let dir = tempdir().expect("tempdir");
        let track = Track::new(write_song(dir.path(), "a.mid", 500_000));
        let mut sequencer = NullSequencer::new();
        sequencer.play(&track).expect("play");

        sequencer.stop();

        assert_eq!(sequencer.current_track(), None);
        assert_eq!(sequencer.position(), None);
        assert!(!sequencer.is_finished());
    }
}
