/// State management module
///
/// This module handles all client-side state, including:
/// - Shared data structures: samples, slots and choices (data.rs)
/// - The rating session state machine (session.rs)

pub mod data;
pub mod session;
