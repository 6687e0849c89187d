pub mod config;
pub mod demo;
pub mod maintain;
pub mod stats;
