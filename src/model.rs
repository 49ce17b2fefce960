use crate::config;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const HERO_PAGE: usize = 1;
pub const TIMELINE_PAGE: usize = 2;
pub const STATS_PAGE: usize = 3;
pub const MUSIC_PAGE: usize = 4;
pub const SURPRISE_PAGE: usize = 5;

pub fn page_title(page: usize) -> &'static str {
    match page {
        HERO_PAGE => "For You",
        TIMELINE_PAGE => "Our Timeline",
        STATS_PAGE => "By the Numbers",
        MUSIC_PAGE => "Our Mixtape",
        SURPRISE_PAGE => "A Little Surprise",
        _ => "",
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub title: String,
    pub artist: String,
    pub description: String,
    pub filename: String,
    #[serde(default)]
    pub start_offset_seconds: u64,
}

impl PlaylistEntry {
    pub fn media_path(&self) -> PathBuf {
        Path::new(config::ASSET_DIR).join(&self.filename)
    }

    pub fn start_offset(&self) -> Duration {
        Duration::from_secs(self.start_offset_seconds)
    }
}

#[derive(Debug, Clone)]
pub struct TimelineItem {
    pub date: String,
    pub title: String,
    pub detail: String,
}

pub fn timeline_items() -> Vec<TimelineItem> {
    let days = config::days_talking();
    vec![
        TimelineItem {
            date: String::from("17 Jan 2021"),
            title: String::from("First message"),
            detail: String::from("A random hello that refused to stay random."),
        },
        TimelineItem {
            date: String::from("Spring 2021"),
            title: String::from("The train day"),
            detail: String::from("Future x Miley, word for word for word. Unbelievable."),
        },
        TimelineItem {
            date: String::from("Every day since"),
            title: String::from("Still talking"),
            detail: format!("{days} days of conversations, laughter, and love..."),
        },
        TimelineItem {
            date: String::from("Golden hours"),
            title: String::from("Walks in Tannenbusch"),
            detail: String::from("Army of One on repeat, the long way home on purpose."),
        },
        TimelineItem {
            date: String::from("Today"),
            title: String::from("Here"),
            detail: String::from("The best part is that this list keeps growing."),
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatValue {
    Number(u64),
    Infinite,
}

#[derive(Debug, Clone)]
pub struct StatCard {
    pub label: String,
    pub value: StatValue,
}

pub fn stat_cards() -> Vec<StatCard> {
    vec![
        StatCard {
            label: String::from("Days talking"),
            value: StatValue::Number(config::days_talking().max(0) as u64),
        },
        StatCard {
            label: String::from("Songs on the mixtape"),
            value: StatValue::Number(16),
        },
        StatCard {
            label: String::from("Coldplay songs snuck in"),
            value: StatValue::Number(3),
        },
        StatCard {
            label: String::from("Reasons to smile"),
            value: StatValue::Infinite,
        },
    ]
}
