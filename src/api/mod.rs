/// Scoring service module
///
/// This module handles everything that crosses the network:
/// - Request and reply shapes, and reply parsing (wire.rs)
/// - The async HTTP client (client.rs)

pub mod client;
pub mod wire;
