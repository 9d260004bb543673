pub mod carousel;
pub mod config;
pub mod progress;
pub mod provinces;
pub mod quiz;
