pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod search;
pub mod seed;
pub mod utils;
