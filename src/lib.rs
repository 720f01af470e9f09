pub mod config;
pub mod geocode;
