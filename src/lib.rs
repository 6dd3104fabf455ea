pub mod config;
pub mod engines;
pub mod error;
pub mod template;
