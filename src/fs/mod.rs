//! File system collaborators
//!
//! File metadata, OS-native hiding and the platform adapter for timestamps.
//! These supply streams to the hashing core and consume its digests.

mod entry;
mod hide;
pub mod platform;

pub use entry::{FileDescriptor, FileInfo, FileOptions, OpenMode};
pub use hide::{hide_file, split_path};
