//! Asset storage for the Ritra pipeline.
//!
//! Generated audio and illustrations are persisted through the [`AssetStore`]
//! trait, which returns a URL the render service can fetch.
//!
//! # Backends
//!
//! - [`FileSystemStorage`]: content-addressed files under a local directory
//! - [`GcsStorage`]: public objects in a Google Cloud Storage bucket
//! - [`MemoryStorage`]: process memory, for tests and dry runs
//!
//! # Example
//!
//! ```rust
//! use ritra_storage::{AssetStore, MemoryStorage};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = MemoryStorage::new();
//! let url = storage.put(b"RIFF....", "audio/wav").await?;
//! assert!(url.starts_with("memory://"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod gcs;
mod media_type;
mod memory;
mod store;

pub use filesystem::FileSystemStorage;
pub use gcs::GcsStorage;
pub use media_type::MediaType;
pub use memory::{MemoryStorage, StoredAsset};
pub use ritra_error::{StorageError, StorageErrorKind};
pub use store::{AssetStore, store_from_config};
