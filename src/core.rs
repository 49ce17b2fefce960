use crate::audio::AudioEngine;
use crate::config;
use crate::effects::Effects;
use crate::gate::Gate;
use crate::model::{self, StatCard, TimelineItem};
use crate::player::{Player, PlayerEvent};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Forward,
    Backward,
}

/// Transition tags on the two pages involved in a flip. They exist for the
/// 50ms settle window and are cleared afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Settled,
    Transitioning {
        from: usize,
        direction: NavDirection,
        settle_at: Instant,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Previous,
    Next,
}

/// Classifies a completed drag: horizontal displacement must dominate the
/// vertical one and exceed the threshold. Positive dx means a rightward
/// drag, which goes to the previous page.
pub fn classify_swipe(dx: i32, dy: i32, threshold: i32) -> Option<SwipeDirection> {
    if dx.abs() <= dy.abs() || dx.abs() <= threshold {
        return None;
    }
    Some(if dx > 0 {
        SwipeDirection::Previous
    } else {
        SwipeDirection::Next
    })
}

/// The presentation controller: current page, transition state, the player,
/// the gate, the decorative effects, and the status line. All mutation goes
/// through its operations; rendering and audio are injected.
#[derive(Debug)]
pub struct CardCore {
    page: usize,
    pub nav: NavState,
    pub player: Player,
    pub gate: Gate,
    pub effects: Effects,
    pub timeline: Vec<TimelineItem>,
    pub stats: Vec<StatCard>,
    pub status: String,
    pub share_hint: String,
    pub dirty: bool,
}

impl CardCore {
    pub fn new(now: Instant) -> anyhow::Result<Self> {
        let playlist = config::load_playlist()?;
        let mut core = Self {
            page: 1,
            nav: NavState::Settled,
            player: Player::new(playlist),
            gate: Gate::new(),
            effects: Effects::new(),
            timeline: model::timeline_items(),
            stats: model::stat_cards(),
            status: String::from("Welcome"),
            share_hint: share_hint(1),
            dirty: true,
        };
        core.fire_enter_hook(1, now);
        Ok(core)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn prev_enabled(&self) -> bool {
        self.page > 1
    }

    pub fn next_enabled(&self) -> bool {
        self.page < config::PAGE_COUNT
    }

    /// Applies the startup page parameter: numeric and in range seeds the
    /// initial page, everything else silently defaults to 1.
    pub fn seed_page(&mut self, param: Option<&str>, now: Instant) {
        let Some(page) = param
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|page| (1..=config::PAGE_COUNT).contains(page))
        else {
            return;
        };
        if page != self.page {
            self.page = page;
            self.share_hint = share_hint(page);
            self.fire_enter_hook(page, now);
            self.dirty = true;
        }
    }

    /// Flips to `target`. No-op when out of range, already current, or a
    /// transition is still settling.
    pub fn go_to(&mut self, now: Instant, target: usize, audio: &mut dyn AudioEngine) {
        if !(1..=config::PAGE_COUNT).contains(&target) || target == self.page {
            return;
        }
        if matches!(self.nav, NavState::Transitioning { .. }) {
            return;
        }

        let direction = if target > self.page {
            NavDirection::Forward
        } else {
            NavDirection::Backward
        };

        if self.page == model::MUSIC_PAGE {
            self.player.suspend(audio);
        }

        self.nav = NavState::Transitioning {
            from: self.page,
            direction,
            settle_at: now + config::TRANSITION_SETTLE,
        };
        self.page = target;
        self.share_hint = share_hint(target);
        self.set_status(&format!("Page {target}: {}", model::page_title(target)));
        self.fire_enter_hook(target, now);
    }

    pub fn next(&mut self, now: Instant, audio: &mut dyn AudioEngine) {
        if self.next_enabled() {
            self.go_to(now, self.page + 1, audio);
        }
    }

    pub fn previous(&mut self, now: Instant, audio: &mut dyn AudioEngine) {
        if self.prev_enabled() {
            self.go_to(now, self.page - 1, audio);
        }
    }

    /// One pass of the cooperative timers: transition settle, playback, and
    /// decorative effects. Called every loop iteration.
    pub fn tick(&mut self, now: Instant, width: u16, audio: &mut dyn AudioEngine) {
        if let NavState::Transitioning { settle_at, .. } = self.nav
            && now >= settle_at
        {
            self.nav = NavState::Settled;
            self.dirty = true;
        }

        match self.player.tick(now, audio) {
            Some(PlayerEvent::Advanced) => {
                let entry = self.player.current();
                self.set_status(&format!("Up next: {} - {}", entry.artist, entry.title));
            }
            Some(PlayerEvent::Finished) => {
                self.set_status("That was the whole mixtape. The claim link is yours.");
            }
            Some(PlayerEvent::Degraded(detail)) => {
                self.set_status(&format!("Playing silently (audio unavailable): {detail}"));
            }
            None => {}
        }

        self.effects.tick(now, width);
    }

    pub fn toggle_play(&mut self, now: Instant, audio: &mut dyn AudioEngine) {
        let event = self.player.toggle(now, audio);
        match event {
            Some(PlayerEvent::Degraded(detail)) => {
                self.set_status(&format!("Playing silently (audio unavailable): {detail}"));
            }
            _ => {
                if self.player.is_playing() {
                    let entry = self.player.current();
                    self.set_status(&format!("Playing: {} - {}", entry.artist, entry.title));
                } else {
                    self.set_status("Paused");
                }
            }
        }
    }

    fn fire_enter_hook(&mut self, page: usize, now: Instant) {
        match page {
            model::HERO_PAGE => self.effects.on_enter_hero(now),
            model::TIMELINE_PAGE => self.effects.on_enter_timeline(now),
            model::STATS_PAGE => self.effects.on_enter_stats(now),
            model::MUSIC_PAGE => {
                let entry = self.player.current();
                self.set_status(&format!("Track: {} - {}", entry.artist, entry.title));
            }
            model::SURPRISE_PAGE => self.effects.on_enter_surprise(now),
            _ => {}
        }
    }

    pub fn set_status(&mut self, message: &str) {
        self.status = message.to_string();
        self.dirty = true;
    }
}

fn share_hint(page: usize) -> String {
    format!("keepsake --page {page}")
}
