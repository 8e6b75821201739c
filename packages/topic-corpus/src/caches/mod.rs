//! Cache storage implementations.
//!
//! - `MemoryCache` - in-process map, lost on drop
//! - `FileCache` - one file per document under a root directory

mod file;
mod memory;

pub use file::FileCache;
pub use memory::MemoryCache;
