use crate::config;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Confetti,
    Heart,
    Sparkle,
}

/// Number of confetti tints; the UI maps the index onto its palette.
pub const CONFETTI_TINTS: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub kind: ParticleKind,
    pub col: u16,
    pub row: u16,
    pub tint: usize,
    pub born_at: Instant,
    pub ttl: Duration,
}

impl Particle {
    pub fn glyph(&self) -> &'static str {
        match self.kind {
            ParticleKind::Confetti => "•",
            ParticleKind::Heart => "♥",
            ParticleKind::Sparkle => "✦",
        }
    }

    pub fn expired(&self, now: Instant) -> bool {
        now >= self.born_at + self.ttl
    }

    /// Cell the particle occupies at `now`, or `None` while unborn or
    /// expired. Confetti falls from its spawn row to the bottom edge over
    /// its lifetime; the other kinds stay put.
    pub fn position_at(&self, now: Instant, height: u16) -> Option<(u16, u16)> {
        if now < self.born_at || self.expired(now) {
            return None;
        }
        let row = match self.kind {
            ParticleKind::Confetti => {
                let progress = now.duration_since(self.born_at).as_secs_f64()
                    / self.ttl.as_secs_f64().max(f64::EPSILON);
                let span = f64::from(height.saturating_sub(self.row));
                self.row + (progress * span) as u16
            }
            ParticleKind::Heart | ParticleKind::Sparkle => self.row,
        };
        (row < height).then_some((self.col, row))
    }
}

/// Decorative one-shot animation state. Everything here is cosmetic; the
/// navigator and player never read from it.
#[derive(Debug)]
pub struct Effects {
    pub particles: Vec<Particle>,
    rng: SmallRng,
    pub ambient_restarted_at: Option<Instant>,
    pub timeline_entered_at: Option<Instant>,
    pub counters_started_at: Option<Instant>,
    pub surprise_entered_at: Option<Instant>,
    surprise_burst_done: bool,
}

impl Effects {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            rng: SmallRng::from_os_rng(),
            ambient_restarted_at: None,
            timeline_entered_at: None,
            counters_started_at: None,
            surprise_entered_at: None,
            surprise_burst_done: false,
        }
    }

    pub fn on_enter_hero(&mut self, now: Instant) {
        self.ambient_restarted_at = Some(now);
    }

    pub fn on_enter_timeline(&mut self, now: Instant) {
        self.timeline_entered_at = Some(now);
    }

    pub fn on_enter_stats(&mut self, now: Instant) {
        self.counters_started_at = Some(now);
    }

    pub fn on_enter_surprise(&mut self, now: Instant) {
        self.surprise_entered_at = Some(now);
        self.surprise_burst_done = false;
    }

    /// 50 confetti pieces dropped from the top edge, randomized column,
    /// tint, and 2-5s fall time.
    pub fn spawn_confetti(&mut self, now: Instant, width: u16) {
        let width = width.max(1);
        for _ in 0..config::CONFETTI_COUNT {
            let ttl = Duration::from_millis(self.rng.random_range(2_000..5_000));
            self.particles.push(Particle {
                kind: ParticleKind::Confetti,
                col: self.rng.random_range(0..width),
                row: 0,
                tint: self.rng.random_range(0..CONFETTI_TINTS),
                born_at: now,
                ttl,
            });
        }
    }

    /// A burst of hearts at random cells, staggered 100ms apart.
    pub fn spawn_hearts(&mut self, now: Instant, width: u16, height: u16) {
        let width = width.max(1);
        let height = height.max(1);
        for index in 0..config::HEART_BURST_COUNT {
            self.particles.push(Particle {
                kind: ParticleKind::Heart,
                col: self.rng.random_range(0..width),
                row: self.rng.random_range(0..height),
                tint: 0,
                born_at: now + config::HEART_STAGGER * index as u32,
                ttl: config::HEART_TTL,
            });
        }
    }

    pub fn spawn_sparkle(&mut self, now: Instant, col: u16, row: u16) {
        self.particles.push(Particle {
            kind: ParticleKind::Sparkle,
            col,
            row,
            tint: 0,
            born_at: now,
            ttl: config::SPARKLE_TTL,
        });
    }

    /// Sweeps dead particles and fires the delayed surprise burst once.
    pub fn tick(&mut self, now: Instant, width: u16) {
        self.particles.retain(|particle| !particle.expired(now));

        if let Some(entered) = self.surprise_entered_at
            && !self.surprise_burst_done
            && now >= entered + config::SURPRISE_REVEAL_DELAY + config::SURPRISE_BURST_DELAY
        {
            self.surprise_burst_done = true;
            self.spawn_confetti(now, width);
        }
    }

    /// How many timeline rows are visible, one more every stagger interval.
    pub fn revealed_timeline_rows(&self, now: Instant, total: usize) -> usize {
        let Some(entered) = self.timeline_entered_at else {
            return total;
        };
        let steps = (now.saturating_duration_since(entered).as_millis()
            / config::TIMELINE_STAGGER.as_millis()) as usize;
        (steps + 1).min(total)
    }

    /// Counter value at `now`: 0 up to `target` over the fixed duration,
    /// quantized to ~60 increments per second.
    pub fn counter_value(&self, now: Instant, target: u64) -> u64 {
        let Some(started) = self.counters_started_at else {
            return target;
        };
        if target == 0 {
            return 0;
        }
        let total_steps =
            (config::COUNTER_DURATION.as_millis() / config::COUNTER_STEP.as_millis()) as f64;
        let steps = (now.saturating_duration_since(started).as_millis()
            / config::COUNTER_STEP.as_millis()) as f64;
        let increment = target as f64 / total_steps;
        ((steps * increment).min(target as f64)) as u64
    }

    pub fn surprise_visible(&self, now: Instant) -> bool {
        self.surprise_entered_at
            .is_some_and(|entered| now >= entered + config::SURPRISE_REVEAL_DELAY)
    }
}

impl Default for Effects {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confetti_burst_spawns_the_full_count() {
        let mut effects = Effects::new();
        let now = Instant::now();
        effects.spawn_confetti(now, 80);
        assert_eq!(effects.particles.len(), config::CONFETTI_COUNT);
        assert!(effects.particles.iter().all(|p| p.col < 80));
        assert!(
            effects
                .particles
                .iter()
                .all(|p| p.ttl >= Duration::from_secs(2) && p.ttl < Duration::from_secs(5))
        );
    }

    #[test]
    fn hearts_are_staggered_into_the_future() {
        let mut effects = Effects::new();
        let now = Instant::now();
        effects.spawn_hearts(now, 80, 24);
        assert_eq!(effects.particles.len(), config::HEART_BURST_COUNT);
        let last = effects.particles.last().expect("heart");
        assert_eq!(last.born_at, now + config::HEART_STAGGER * 9);
        // Unborn particles do not render yet.
        assert_eq!(last.position_at(now, 24), None);
        assert!(last.position_at(last.born_at, 24).is_some());
    }

    #[test]
    fn sweep_removes_expired_but_keeps_unborn() {
        let mut effects = Effects::new();
        let now = Instant::now();
        effects.spawn_sparkle(now, 3, 3);
        effects.spawn_hearts(now, 80, 24);

        effects.tick(now + config::SPARKLE_TTL, 80);
        assert!(
            effects
                .particles
                .iter()
                .all(|p| p.kind != ParticleKind::Sparkle)
        );
        assert_eq!(effects.particles.len(), config::HEART_BURST_COUNT);
    }

    #[test]
    fn confetti_falls_toward_the_bottom_edge() {
        let particle = Particle {
            kind: ParticleKind::Confetti,
            col: 5,
            row: 0,
            tint: 0,
            born_at: Instant::now(),
            ttl: Duration::from_secs(4),
        };
        let (_, start_row) = particle.position_at(particle.born_at, 24).expect("cell");
        let (_, mid_row) = particle
            .position_at(particle.born_at + Duration::from_secs(2), 24)
            .expect("cell");
        assert_eq!(start_row, 0);
        assert!(mid_row > start_row);
        assert_eq!(
            particle.position_at(particle.born_at + Duration::from_secs(4), 24),
            None
        );
    }

    #[test]
    fn timeline_rows_reveal_one_per_stagger() {
        let mut effects = Effects::new();
        let now = Instant::now();
        effects.on_enter_timeline(now);

        assert_eq!(effects.revealed_timeline_rows(now, 5), 1);
        assert_eq!(
            effects.revealed_timeline_rows(now + Duration::from_millis(450), 5),
            3
        );
        assert_eq!(
            effects.revealed_timeline_rows(now + Duration::from_secs(10), 5),
            5
        );
    }

    #[test]
    fn counter_ramps_to_target_over_two_seconds() {
        let mut effects = Effects::new();
        let now = Instant::now();
        effects.on_enter_stats(now);

        assert_eq!(effects.counter_value(now, 1000), 0);
        let halfway = effects.counter_value(now + Duration::from_secs(1), 1000);
        assert!((450..=550).contains(&halfway), "halfway was {halfway}");
        assert_eq!(
            effects.counter_value(now + config::COUNTER_DURATION, 1000),
            1000
        );
        assert_eq!(
            effects.counter_value(now + Duration::from_secs(5), 1000),
            1000
        );
    }

    #[test]
    fn surprise_reveals_then_bursts_exactly_once() {
        let mut effects = Effects::new();
        let now = Instant::now();
        effects.on_enter_surprise(now);

        assert!(!effects.surprise_visible(now));
        assert!(effects.surprise_visible(now + config::SURPRISE_REVEAL_DELAY));

        let burst_at = now + config::SURPRISE_REVEAL_DELAY + config::SURPRISE_BURST_DELAY;
        effects.tick(now + Duration::from_millis(100), 80);
        assert!(effects.particles.is_empty());

        effects.tick(burst_at, 80);
        assert_eq!(effects.particles.len(), config::CONFETTI_COUNT);

        effects.particles.clear();
        effects.tick(burst_at + Duration::from_millis(100), 80);
        assert!(effects.particles.is_empty(), "burst must be one-shot");
    }
}
