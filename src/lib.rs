pub mod config;
pub mod content;
pub mod render;
pub mod search;
