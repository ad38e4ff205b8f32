/// State management module
///
/// This module handles all application state, including:
/// - Output image parameters and aspect-lock recompute (config.rs)
/// - Delivery settings and the transmission lifecycle (send.rs)
/// - The currently held still image (capture.rs)

pub mod capture;
pub mod config;
pub mod send;
