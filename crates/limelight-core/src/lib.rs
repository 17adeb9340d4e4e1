pub mod config;
pub mod error;
pub mod group;
pub mod question;
pub mod random;
pub mod session;
pub mod trust;
pub mod user;

// Re-export common error type
pub use error::EngineError;
