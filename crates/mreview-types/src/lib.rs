pub mod config;
pub mod poster;
pub mod utils;
