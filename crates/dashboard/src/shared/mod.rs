pub mod config;
pub mod number_format;
