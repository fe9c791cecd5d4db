//! Support library for the `booking` command-line tool.

pub mod config;
pub mod logging;
pub mod render;
pub mod session;

pub use config::DashboardConfig;
pub use render::OutputFormat;
pub use session::Session;
