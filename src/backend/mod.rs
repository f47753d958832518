/// Remote record backend module
///
/// This module handles:
/// - The wire client for the record backend service (client.rs)
/// - Normalizing backend error shapes into one taxonomy (error.rs)
/// - The image and task gateways mapping remote schemas to flat records
///   (images.rs, tasks.rs)
///
/// The client is injected into the gateways as a trait object so tests can
/// substitute the in-memory fake (fake.rs).
pub mod client;
pub mod error;
pub mod images;
pub mod tasks;

#[cfg(test)]
pub mod fake;
