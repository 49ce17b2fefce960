pub mod app;
pub mod audio;
pub mod config;
pub mod core;
pub mod effects;
pub mod gate;
pub mod model;
pub mod player;
pub mod ui;
