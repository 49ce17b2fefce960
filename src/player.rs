use crate::audio::AudioEngine;
use crate::config;
use crate::model::PlaylistEntry;
use std::time::{Duration, Instant};

/// Sequenced playback over the fixed playlist. Each entry gets a 20 second
/// preview window; the cursor only ever moves forward, one entry at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPhase {
    Idle,
    /// Between entries: the next one starts once `resume_at` passes.
    Loading { resume_at: Instant },
    Playing {
        started_at: Instant,
        advance_at: Instant,
        /// False when the resource handle could not be acquired and only
        /// the wall-clock projection is running.
        audio_live: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    Advanced,
    Finished,
    Degraded(String),
}

#[derive(Debug)]
pub struct Player {
    entries: Vec<PlaylistEntry>,
    pub cursor: usize,
    pub phase: PlayerPhase,
    /// Progress through the preview window, 0.0..=1.0. Kept across a pause
    /// so the bar does not snap back.
    pub progress: f64,
}

impl Player {
    pub fn new(entries: Vec<PlaylistEntry>) -> Self {
        Self {
            entries,
            cursor: 0,
            phase: PlayerPhase::Idle,
            progress: 0.0,
        }
    }

    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    pub fn current(&self) -> &PlaylistEntry {
        &self.entries[self.cursor]
    }

    pub fn is_playing(&self) -> bool {
        !matches!(self.phase, PlayerPhase::Idle)
    }

    /// The external claim affordance shows once the last entry is reached.
    pub fn claim_revealed(&self) -> bool {
        self.cursor + 1 == self.entries.len()
    }

    /// Tears down any prior handle and starts the current entry from its
    /// configured offset. Acquisition failure degrades to the visual
    /// projection instead of surfacing an error.
    pub fn play(&mut self, now: Instant, audio: &mut dyn AudioEngine) -> Option<PlayerEvent> {
        audio.stop();
        self.progress = 0.0;
        let entry = self.current();
        let advance_at = now + config::PREVIEW_WINDOW;
        match audio.play(&entry.media_path(), entry.start_offset()) {
            Ok(()) => {
                self.phase = PlayerPhase::Playing {
                    started_at: now,
                    advance_at,
                    audio_live: true,
                };
                None
            }
            Err(err) => {
                self.phase = PlayerPhase::Playing {
                    started_at: now,
                    advance_at,
                    audio_live: false,
                };
                Some(PlayerEvent::Degraded(format!("{err:#}")))
            }
        }
    }

    pub fn pause(&mut self, audio: &mut dyn AudioEngine) {
        audio.pause();
        self.phase = PlayerPhase::Idle;
    }

    pub fn toggle(&mut self, now: Instant, audio: &mut dyn AudioEngine) -> Option<PlayerEvent> {
        if self.is_playing() {
            self.pause(audio);
            None
        } else {
            self.play(now, audio)
        }
    }

    /// Stops playback entirely, e.g. when navigating off the music page.
    pub fn suspend(&mut self, audio: &mut dyn AudioEngine) {
        audio.stop();
        self.phase = PlayerPhase::Idle;
    }

    /// Drives the pending resume delay, the progress projection, the 20s
    /// hard cutoff, and the natural end-of-media signal.
    pub fn tick(&mut self, now: Instant, audio: &mut dyn AudioEngine) -> Option<PlayerEvent> {
        match self.phase {
            PlayerPhase::Idle => None,
            PlayerPhase::Loading { resume_at } => {
                if now >= resume_at {
                    self.play(now, audio)
                } else {
                    None
                }
            }
            PlayerPhase::Playing {
                started_at,
                advance_at,
                audio_live,
            } => {
                let elapsed = now.saturating_duration_since(started_at);
                self.progress =
                    (elapsed.as_secs_f64() / config::PREVIEW_WINDOW.as_secs_f64()).min(1.0);
                if now >= advance_at || (audio_live && audio.is_finished()) {
                    self.advance(now, audio)
                } else {
                    None
                }
            }
        }
    }

    fn advance(&mut self, now: Instant, audio: &mut dyn AudioEngine) -> Option<PlayerEvent> {
        let was_playing = self.is_playing();
        self.progress = 0.0;
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            audio.stop();
            self.phase = if was_playing {
                PlayerPhase::Loading {
                    resume_at: now + config::RESUME_DELAY,
                }
            } else {
                PlayerPhase::Idle
            };
            Some(PlayerEvent::Advanced)
        } else {
            audio.stop();
            self.phase = PlayerPhase::Idle;
            Some(PlayerEvent::Finished)
        }
    }

    /// Time label for the display: the resource's own position when live,
    /// otherwise the projection from the entry's start offset.
    pub fn time_label(&self, now: Instant, audio: &dyn AudioEngine) -> String {
        let position = match self.phase {
            PlayerPhase::Playing {
                started_at,
                audio_live,
                ..
            } => {
                if audio_live {
                    audio.position().unwrap_or(Duration::ZERO)
                } else {
                    self.current().start_offset() + now.saturating_duration_since(started_at)
                }
            }
            _ => Duration::ZERO,
        };
        format_clock(position)
    }

    pub fn window_label() -> String {
        format_clock(config::PREVIEW_WINDOW)
    }
}

pub fn format_clock(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::path::{Path, PathBuf};

    struct TestAudioEngine {
        played: Vec<(PathBuf, Duration)>,
        stops: usize,
        paused: bool,
        current: Option<PathBuf>,
        finished: bool,
        fail_play: bool,
        position: Option<Duration>,
        volume: f32,
    }

    impl TestAudioEngine {
        fn new() -> Self {
            Self {
                played: Vec::new(),
                stops: 0,
                paused: false,
                current: None,
                finished: false,
                fail_play: false,
                position: None,
                volume: 1.0,
            }
        }

        fn failing() -> Self {
            Self {
                fail_play: true,
                ..Self::new()
            }
        }
    }

    impl AudioEngine for TestAudioEngine {
        fn play(&mut self, path: &Path, start: Duration) -> Result<()> {
            if self.fail_play {
                anyhow::bail!("playback blocked");
            }
            self.played.push((path.to_path_buf(), start));
            self.current = Some(path.to_path_buf());
            self.position = Some(start);
            self.paused = false;
            self.finished = false;
            Ok(())
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn stop(&mut self) {
            self.stops += 1;
            self.current = None;
            self.position = None;
            self.finished = false;
        }

        fn current_track(&self) -> Option<&Path> {
            self.current.as_deref()
        }

        fn position(&self) -> Option<Duration> {
            self.position
        }

        fn is_finished(&self) -> bool {
            self.finished
        }

        fn volume(&self) -> f32 {
            self.volume
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
        }

        fn output_name(&self) -> Option<String> {
            Some(String::from("test"))
        }
    }

    fn entries(count: usize) -> Vec<PlaylistEntry> {
        (0..count)
            .map(|n| PlaylistEntry {
                title: format!("song {n}"),
                artist: String::from("artist"),
                description: String::new(),
                filename: format!("{n:02}.mp3"),
                start_offset_seconds: u64::try_from(n).unwrap() * 10,
            })
            .collect()
    }

    #[test]
    fn play_seeks_to_the_configured_offset() {
        let mut player = Player::new(entries(3));
        let mut audio = TestAudioEngine::new();
        player.cursor = 1;

        let event = player.play(Instant::now(), &mut audio);
        assert_eq!(event, None);
        assert_eq!(audio.played.len(), 1);
        assert_eq!(audio.played[0].1, Duration::from_secs(10));
        assert!(player.is_playing());
    }

    #[test]
    fn progress_is_half_at_ten_seconds() {
        let mut player = Player::new(entries(3));
        let mut audio = TestAudioEngine::new();
        let start = Instant::now();
        player.play(start, &mut audio);

        let event = player.tick(start + Duration::from_secs(10), &mut audio);
        assert_eq!(event, None);
        assert!((player.progress - 0.5).abs() < 0.01, "{}", player.progress);
    }

    #[test]
    fn window_cutoff_forces_advance_without_an_ended_signal() {
        let mut player = Player::new(entries(3));
        let mut audio = TestAudioEngine::new();
        let start = Instant::now();
        player.play(start, &mut audio);

        let event = player.tick(start + config::PREVIEW_WINDOW, &mut audio);
        assert_eq!(event, Some(PlayerEvent::Advanced));
        assert_eq!(player.cursor, 1);
        assert!(matches!(player.phase, PlayerPhase::Loading { .. }));
        assert_eq!(player.progress, 0.0);
    }

    #[test]
    fn resume_waits_out_the_fixed_delay() {
        let mut player = Player::new(entries(3));
        let mut audio = TestAudioEngine::new();
        let start = Instant::now();
        player.play(start, &mut audio);
        player.tick(start + config::PREVIEW_WINDOW, &mut audio);

        let advance = start + config::PREVIEW_WINDOW;
        assert_eq!(
            player.tick(advance + Duration::from_millis(500), &mut audio),
            None
        );
        assert_eq!(audio.played.len(), 1);

        player.tick(advance + config::RESUME_DELAY, &mut audio);
        assert_eq!(audio.played.len(), 2);
        assert_eq!(audio.played[1].0, PathBuf::from("public/01.mp3"));
    }

    #[test]
    fn natural_end_advances_early() {
        let mut player = Player::new(entries(3));
        let mut audio = TestAudioEngine::new();
        let start = Instant::now();
        player.play(start, &mut audio);

        audio.finished = true;
        let event = player.tick(start + Duration::from_secs(5), &mut audio);
        assert_eq!(event, Some(PlayerEvent::Advanced));
        assert_eq!(player.cursor, 1);
    }

    #[test]
    fn advancing_while_paused_does_not_schedule_a_resume() {
        let mut player = Player::new(entries(3));
        let mut audio = TestAudioEngine::new();
        let start = Instant::now();
        player.play(start, &mut audio);
        player.pause(&mut audio);

        // A paused player never ticks past the cutoff on its own; advancing
        // happens only through play/tick, so force the state to check it.
        assert!(audio.paused);
        assert_eq!(player.tick(start + config::PREVIEW_WINDOW, &mut audio), None);
        assert_eq!(player.cursor, 0);
    }

    #[test]
    fn cursor_stops_at_the_last_entry_and_reveals_the_claim() {
        let mut player = Player::new(entries(2));
        let mut audio = TestAudioEngine::new();
        let mut now = Instant::now();
        player.play(now, &mut audio);

        now += config::PREVIEW_WINDOW;
        assert_eq!(player.tick(now, &mut audio), Some(PlayerEvent::Advanced));
        assert_eq!(player.cursor, 1);
        assert!(player.claim_revealed());

        now += config::RESUME_DELAY;
        player.tick(now, &mut audio);

        now += config::PREVIEW_WINDOW;
        assert_eq!(player.tick(now, &mut audio), Some(PlayerEvent::Finished));
        assert_eq!(player.cursor, 1, "cursor never moves past the end");
        assert!(!player.is_playing());

        // Further ended signals are no-ops.
        assert_eq!(player.tick(now + config::PREVIEW_WINDOW, &mut audio), None);
        assert_eq!(player.cursor, 1);
    }

    #[test]
    fn blocked_resource_degrades_to_visual_projection() {
        let mut player = Player::new(entries(2));
        let mut audio = TestAudioEngine::failing();
        let start = Instant::now();

        let event = player.play(start, &mut audio);
        assert!(matches!(event, Some(PlayerEvent::Degraded(_))));
        assert!(matches!(
            player.phase,
            PlayerPhase::Playing {
                audio_live: false,
                ..
            }
        ));

        player.tick(start + Duration::from_secs(10), &mut audio);
        assert!((player.progress - 0.5).abs() < 0.01);

        let event = player.tick(start + config::PREVIEW_WINDOW, &mut audio);
        assert_eq!(event, Some(PlayerEvent::Advanced));
    }

    #[test]
    fn time_label_reflects_the_resource_position() {
        let mut player = Player::new(entries(2));
        let mut audio = TestAudioEngine::new();
        let start = Instant::now();
        player.cursor = 1;
        player.play(start, &mut audio);

        audio.position = Some(Duration::from_secs(96));
        assert_eq!(player.time_label(start, &audio), "1:36");
        assert_eq!(Player::window_label(), "0:20");
    }

    #[test]
    fn clock_format_pads_seconds_only() {
        assert_eq!(format_clock(Duration::from_secs(0)), "0:00");
        assert_eq!(format_clock(Duration::from_secs(36)), "0:36");
        assert_eq!(format_clock(Duration::from_secs(61)), "1:01");
    }
}
