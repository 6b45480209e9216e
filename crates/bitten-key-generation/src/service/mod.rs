//! Service Layer
//!
//! Application service that orchestrates the domain algorithms over the
//! outbound store ports.

pub mod key_generation_service;

pub use key_generation_service::KeyGenerationService;
