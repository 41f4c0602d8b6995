//! Time Series API Service Library
//!
//! HTTP server for point time series queries over gridded datasets.

pub mod app;
pub mod config;
pub mod handlers;
pub mod state;

pub use app::build_router;
pub use state::AppState;
