pub mod booking;
pub mod config;
pub mod db;
pub mod http;
pub mod inventory;

pub mod error;
pub mod time;
