pub mod app;
pub mod braille;
pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod format;
pub mod map;
pub mod model;
pub mod overlay;
pub mod scale;
pub mod ui;
