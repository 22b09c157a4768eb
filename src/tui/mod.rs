//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a medical-themed interface for:
//! - Dashboard with model status and reference ranges
//! - Patient reading input
//! - Prediction result with risk gauge

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::MedicalTheme;
