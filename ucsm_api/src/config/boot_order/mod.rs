//! # Boot Order
//!
//! Types and rules describing how a list of boot devices maps onto a boot
//! policy tree. The tree itself is composed and committed by the caller of
//! this module; here live only the pieces that do not touch a backend:
//!
//! 1. The device registry, mapping each logical device name to its backend
//!    class and, where a family needs more than "one leaf per call", to a
//!    specialized builder.
//! 2. The cross-family rules that reject device lists whose combinations are
//!    not admissible, before any tree is built.
//! 3. The error type describing every rule violation.
//!
//! ## Layout
//!
//! ```text
//! ucsm_api/src/config/boot_order
//! ├── error.rs -------------> # Rule violation errors.
//! ├── mod.rs ---------------> # This file.
//! ├── registry.rs ----------> # Device registry and its inverse.
//! ├── rules.rs -------------> # Cross-family rules.
//! ├── types.rs -------------> # Device kinds, families and vmedia access.
//! └── validation_tests.rs --> # Rule tests.
//! ```

pub mod error;
pub mod registry;
pub mod rules;
pub mod types;


pub use error::BootOrderError;
pub use types::{DeviceBuilder, DeviceFamily, DeviceKind, VmediaAccess};
