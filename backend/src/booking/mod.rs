pub mod occupancy;
pub mod service;
