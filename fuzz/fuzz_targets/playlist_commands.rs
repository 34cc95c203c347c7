#![no_main]

use libfuzzer_sys::fuzz_target;
use midiplay::commands::Command;
use midiplay::core::Player;
use midiplay::model::{PlaybackState, Track};

fuzz_target!(|data: &[u8]| {
    let mut player = Player::default();

    for pair in data.chunks(2) {
        let op = pair[0];
        let arg = usize::from(pair.get(1).copied().unwrap_or(0) % 16);
        match op % 12 {
            0 => {
                player.add(Track::new(format!("track_{arg}.mid")));
            }
            1 => {
                player.insert(arg, Track::new(format!("insert_{arg}.mid")));
            }
            2 => {
                player.remove(arg);
            }
            3 => {
                let _ = player.move_row(arg, usize::from(op / 12) % 16);
            }
            4 => {
                player.shuffle_playlist();
            }
            5 => {
                player.sort_playlist();
            }
            6 => {
                player.start_playing();
            }
            7 => {
                player.pause_playing();
            }
            8 => {
                player.move_to_next_song(arg % 2 == 0);
            }
            9 => {
                player.move_to_previous_song();
            }
            10 => {
                player.set_playlist_looping(arg % 2 == 0);
            }
            _ => {
                let _ = String::from_utf8_lossy(pair).parse::<Command>();
            }
        }

        match player.current_index() {
            Some(idx) => assert!(idx < player.len()),
            None => {
                assert!(player.is_empty());
                assert_eq!(player.state(), PlaybackState::Stopped);
            }
        }
    }
});
