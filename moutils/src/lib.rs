pub mod files;
pub mod handle;
pub mod memory;

#[cfg(any(test, feature = "test-utilities"))]
pub mod testutils;

pub use handle::Handle;
pub use memory::MemoryHandle;
