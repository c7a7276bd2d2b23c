pub mod config;
pub mod constants;
pub mod error;
pub mod mo;

// Re-exports for convenience.
pub use config::boot_order;
pub use mo::{class::ClassId, ManagedObject};
