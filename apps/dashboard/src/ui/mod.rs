//! UI layer: app shell, localized strings, and terminal rendering.

pub mod app;
pub mod messages;
pub mod table;

pub use app::{DashboardApp, PumpOutcome};
