//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod step_ticker;

// Re-export main types
pub use step_ticker::StepTicker;
