//! IO abstractions for loading resources.
//!
//! The centerpiece is [`RemoteStreamLoader`], which turns a
//! [`ResourceDescriptor`] into a [`ResourceStream`]:
//!
//! - one load in flight per loader, cancellable by the caller's token or by
//!   replacing the locator;
//! - optional in-memory TTL caching through a shared [`StreamCache`];
//! - transport failures logged once and returned as typed errors.
//!
//! [`ImageSourceServices`] dispatches file, in-memory and remote image
//! sources onto the same stream type.

mod cache;
mod client;
mod descriptor;
mod error;
mod loader;
mod observer;
mod sources;
mod stream;

pub use cache::{CacheStats, StreamCache};
pub use client::ClientConfig;
pub use descriptor::{ResourceDescriptor, DEFAULT_CACHE_VALIDITY};
pub use error::{LoadError, Result};
pub use loader::{LoadState, RemoteStreamLoader};
pub use observer::{LoadEvent, LoadObserver};
pub use sources::{CachePolicy, ImageSource, ImageSourceServices};
pub use stream::ResourceStream;

pub use tokio_util::sync::CancellationToken;
pub use url::Url;
