pub mod clash;
pub mod data;
pub mod engine;
pub mod moves;
pub mod occupancy;
pub mod placer;
pub mod registry;
pub mod server;
pub mod units;
