use anyhow::{Context, Result, anyhow};
use midly::{MetaMessage, Smf, Timing, TrackEventKind};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Microseconds per quarter note until the file says otherwise (120 BPM).
const DEFAULT_TEMPO_US: u32 = 500_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedMessage {
    pub at: Duration,
    pub bytes: Vec<u8>,
}

/// Channel messages of every track merged onto one timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub messages: Vec<TimedMessage>,
    pub duration: Duration,
    pub track_count: usize,
}

impl Song {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&data).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn parse(data: &[u8]) -> Result<Self> {
        let smf = Smf::parse(data)?;
        let timing = smf.header.timing;

        let mut timeline = Vec::new();
        for (track_idx, track) in smf.tracks.iter().enumerate() {
            let mut tick = 0_u64;
            for event in track {
                tick += u64::from(event.delta.as_int());
                timeline.push((tick, track_idx, event.kind));
            }
        }
        // Stable, so events sharing a tick keep their in-track order.
        timeline.sort_by_key(|(tick, track_idx, _)| (*tick, *track_idx));

        let mut messages = Vec::new();
        let mut elapsed = Duration::ZERO;
        let mut last_tick = 0_u64;
        let mut tempo = DEFAULT_TEMPO_US;
        for (tick, _, kind) in timeline {
            elapsed += ticks_to_duration(tick - last_tick, timing, tempo);
            last_tick = tick;

            match kind {
                TrackEventKind::Meta(MetaMessage::Tempo(value)) => tempo = value.as_int(),
                TrackEventKind::Midi { .. } => {
                    let Some(live) = kind.as_live_event() else {
                        continue;
                    };
                    let mut bytes = Vec::with_capacity(3);
                    live.write(&mut bytes)
                        .map_err(|_| anyhow!("failed to encode MIDI message at tick {tick}"))?;
                    messages.push(TimedMessage { at: elapsed, bytes });
                }
                _ => {}
            }
        }

        Ok(Self {
            messages,
            duration: elapsed,
            track_count: smf.tracks.len(),
        })
    }
}

fn ticks_to_duration(ticks: u64, timing: Timing, tempo_us: u32) -> Duration {
    if ticks == 0 {
        return Duration::ZERO;
    }
    match timing {
        Timing::Metrical(per_quarter) => {
            let per_quarter = u64::from(per_quarter.as_int().max(1));
            Duration::from_micros(ticks * u64::from(tempo_us) / per_quarter)
        }
        Timing::Timecode(fps, subframes) => {
            let per_second = f64::from(fps.as_f32()) * f64::from(subframes.max(1));
            Duration::from_secs_f64(ticks as f64 / per_second)
        }
    }
}
