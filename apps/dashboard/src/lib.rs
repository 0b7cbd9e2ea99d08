pub mod backend_bridge;
pub mod config;
pub mod controller;
pub mod ui;
