pub mod config;
pub mod driver;
pub mod input;
pub mod plan;
pub mod playback;
pub mod prompt;
pub mod runner;
