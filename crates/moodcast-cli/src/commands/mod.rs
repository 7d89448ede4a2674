pub mod config;
pub mod forecast;
pub mod generate;
pub mod patterns;
