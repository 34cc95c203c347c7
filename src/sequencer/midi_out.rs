use super::{Clock, Sequencer, Song, TimedMessage};
use crate::model::Track;
use anyhow::{Context, Result, anyhow};
use midir::{MidiOutput, MidiOutputConnection};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

const CLIENT_NAME: &str = "midiplay";
const MAX_SLEEP: Duration = Duration::from_millis(5);
const ALL_NOTES_OFF: u8 = 123;

struct Worker {
    stop: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

pub struct MidiOutSequencer {
    connection: Arc<Mutex<MidiOutputConnection>>,
    port_name: String,
    current: Option<Track>,
    duration: Option<Duration>,
    clock: Arc<Mutex<Clock>>,
    paused: bool,
    worker: Option<Worker>,
}

impl MidiOutSequencer {
    /// Connects to the first port whose name contains `preferred`, or to the
    /// first port at all.
    pub fn connect(preferred: Option<&str>) -> Result<Self> {
        let output = MidiOutput::new(CLIENT_NAME).context("failed to open MIDI client")?;
        let ports = output.ports();
        let port = match preferred {
            Some(wanted) => ports.iter().find(|port| {
                output
                    .port_name(port)
                    .is_ok_and(|name| name.contains(wanted))
            }),
            None => ports.first(),
        }
        .cloned()
        .with_context(|| match preferred {
            Some(wanted) => format!("no MIDI output port matches {wanted:?}"),
            None => String::from("no MIDI output ports available"),
        })?;
        let port_name = output.port_name(&port).context("failed to read MIDI port name")?;
        let connection = output
            .connect(&port, CLIENT_NAME)
            .map_err(|err| anyhow!("failed to connect to {port_name}: {err}"))?;
        debug!(port = %port_name, "MIDI output connected");

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            port_name,
            current: None,
            duration: None,
            clock: Arc::new(Mutex::new(Clock::default())),
            paused: false,
            worker: None,
        })
    }

    fn silence(&self) {
        let mut connection = self.connection.lock();
        for channel in 0..16_u8 {
            if let Err(err) = connection.send(&[0xB0 | channel, ALL_NOTES_OFF, 0]) {
                warn!(channel, "failed to silence MIDI channel: {err}");
            }
        }
    }

    fn join_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.stop.store(true, Ordering::Relaxed);
            if worker.handle.join().is_err() {
                warn!("MIDI worker panicked");
            }
        }
    }
}

impl Sequencer for MidiOutSequencer {
    fn play(&mut self, track: &Track) -> Result<()> {
        let song = Song::load(track.path())?;
        self.join_worker();
        self.silence();

        let stop = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));
        self.clock.lock().start();
        let handle = {
            let connection = Arc::clone(&self.connection);
            let clock = Arc::clone(&self.clock);
            let stop = Arc::clone(&stop);
            let finished = Arc::clone(&finished);
            let messages = song.messages;
            thread::Builder::new()
                .name(String::from("midi-out"))
                .spawn(move || {
                    stream(&messages, &connection, &clock, &stop);
                    finished.store(true, Ordering::Relaxed);
                })
                .context("failed to spawn MIDI worker")?
        };

        self.worker = Some(Worker {
            stop,
            finished,
            handle,
        });
        self.current = Some(track.clone());
        self.duration = Some(song.duration);
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.clock.lock().pause();
        self.paused = true;
        self.silence();
    }

    fn resume(&mut self) {
        if self.current.is_some() {
            self.clock.lock().resume();
        }
        self.paused = false;
    }

    fn stop(&mut self) {
        self.join_worker();
        self.silence();
        self.clock.lock().reset();
        self.current = None;
        self.duration = None;
        self.paused = false;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn current_track(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    fn position(&self) -> Option<Duration> {
        self.current.as_ref()?;
        let position = self.clock.lock().elapsed();
        Some(self.duration.map_or(position, |duration| position.min(duration)))
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn is_finished(&self) -> bool {
        self.current.is_some()
            && self
                .worker
                .as_ref()
                .is_some_and(|worker| worker.finished.load(Ordering::Relaxed))
    }

    fn output_name(&self) -> Option<String> {
        Some(self.port_name.clone())
    }
}

impl Drop for MidiOutSequencer {
    fn drop(&mut self) {
        self.join_worker();
        self.silence();
    }
}

fn stream(
    messages: &[TimedMessage],
    connection: &Mutex<MidiOutputConnection>,
    clock: &Mutex<Clock>,
    stop: &AtomicBool,
) {
    for message in messages {
        loop {
            if stop.load(Ordering::Relaxed) {
                return;
            }
            let now = clock.lock().elapsed();
            if now >= message.at {
                break;
            }
            thread::sleep((message.at - now).min(MAX_SLEEP));
        }
        if let Err(err) = connection.lock().send(&message.bytes) {
            warn!("failed to send MIDI message: {err}");
        }
    }
}
