pub mod completions;
pub mod config;
pub mod notes;
pub mod sounds;
pub mod stats;
