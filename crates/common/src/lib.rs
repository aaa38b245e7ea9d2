//! Shared types for the VK client workspace

mod secret;

pub use secret::Secret;
