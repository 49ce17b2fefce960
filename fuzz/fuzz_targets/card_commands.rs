#![no_main]

use keepsake::audio::NullAudioEngine;
use keepsake::config;
use keepsake::core::CardCore;
use libfuzzer_sys::fuzz_target;
use std::time::{Duration, Instant};

fuzz_target!(|data: &[u8]| {
    let mut now = Instant::now();
    let Ok(mut core) = CardCore::new(now) else {
        return;
    };
    let mut audio = NullAudioEngine::new();

    for byte in data {
        match byte % 8 {
            0 => core.next(now, &mut audio),
            1 => core.previous(now, &mut audio),
            2 => core.go_to(now, usize::from(byte / 8), &mut audio),
            3 => core.toggle_play(now, &mut audio),
            4 => {
                core.gate.open_prompt();
                core.gate.push_char(char::from(*byte));
                let _ = core.gate.submit();
                core.gate.close();
            }
            5 => core.effects.spawn_hearts(now, 80, 24),
            6 => now += Duration::from_millis(u64::from(*byte) * 100),
            _ => {}
        }
        core.tick(now, 80, &mut audio);
        assert!((1..=config::PAGE_COUNT).contains(&core.page()));
        assert!(core.player.cursor < core.player.entries().len());
    }
});
