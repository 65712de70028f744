//! Image sources and the services that turn them into streams.

use crate::client::ClientConfig;
use crate::{
    LoadError, LoadObserver, RemoteStreamLoader, ResourceDescriptor, ResourceStream, Result,
    StreamCache,
};
use bytes::Bytes;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Where an image's bytes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// A file on the local filesystem
    File(PathBuf),
    /// Bytes supplied by the application
    Stream(Bytes),
    /// A remote resource
    Uri(ResourceDescriptor),
}

impl ImageSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        ImageSource::File(path.into())
    }

    pub fn bytes(data: impl Into<Bytes>) -> Self {
        ImageSource::Stream(data.into())
    }

    pub fn uri(input: &str) -> Result<Self> {
        Ok(ImageSource::Uri(ResourceDescriptor::parse(input)?))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ImageSource::File(path) => path.as_os_str().is_empty(),
            ImageSource::Stream(_) => false,
            ImageSource::Uri(descriptor) => descriptor.is_empty(),
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::File(path) => write!(f, "File: {}", path.display()),
            ImageSource::Stream(data) => write!(f, "Stream: {} bytes", data.len()),
            ImageSource::Uri(descriptor) => fmt::Display::fmt(descriptor, f),
        }
    }
}

/// Default caching policy applied to URIs parsed through the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub enabled: bool,
    pub validity: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            validity: crate::DEFAULT_CACHE_VALIDITY,
        }
    }
}

/// Resolves every kind of [`ImageSource`] into a [`ResourceStream`].
pub struct ImageSourceServices {
    client: ClientConfig,
    policy: CachePolicy,
    cache: Option<Arc<StreamCache>>,
    observers: Vec<Arc<dyn LoadObserver>>,
}

impl ImageSourceServices {
    pub fn new(client: ClientConfig) -> Self {
        Self {
            client,
            policy: CachePolicy::default(),
            cache: None,
            observers: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_cache(mut self, cache: Arc<StreamCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn LoadObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn client_config(&self) -> &ClientConfig {
        &self.client
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn cache(&self) -> Option<&Arc<StreamCache>> {
        self.cache.as_ref()
    }

    /// Parse a URI source carrying the configured cache policy.
    pub fn uri(&self, input: &str) -> Result<ImageSource> {
        let descriptor = ResourceDescriptor::parse(input)?
            .with_caching(self.policy.enabled)
            .with_cache_validity(self.policy.validity);
        Ok(ImageSource::Uri(descriptor))
    }

    /// A loader wired to this service's client, cache and observers.
    pub fn uri_loader(&self, descriptor: ResourceDescriptor) -> RemoteStreamLoader {
        let mut loader =
            RemoteStreamLoader::new(descriptor).with_client_config(self.client.clone());
        if let Some(cache) = &self.cache {
            loader = loader.with_cache(cache.clone());
        }
        for observer in &self.observers {
            loader = loader.with_observer(observer.clone());
        }
        loader
    }

    /// Open `source` as a stream. Empty sources yield `Ok(None)`.
    pub async fn get_stream(
        &self,
        source: &ImageSource,
        cancel: &CancellationToken,
    ) -> Result<Option<ResourceStream>> {
        if source.is_empty() {
            return Ok(None);
        }

        match source {
            ImageSource::Stream(data) => Ok(Some(ResourceStream::from_bytes(data.clone()))),
            ImageSource::File(path) => {
                if cancel.is_cancelled() {
                    return Err(LoadError::Cancelled);
                }
                let opened = async {
                    let file = tokio::fs::File::open(path).await?;
                    let len = file.metadata().await?.len();
                    Ok::<_, std::io::Error>(ResourceStream::from_file(file, Some(len)))
                };
                match opened.await {
                    Ok(stream) => Ok(Some(stream)),
                    Err(error) => {
                        warn!(target: "rune_io::image_loading", path = %path.display(), %error, "unable to load image file");
                        Err(LoadError::Io(error))
                    }
                }
            }
            ImageSource::Uri(descriptor) => self.uri_loader(descriptor.clone()).load(cancel).await,
        }
    }
}

impl Default for ImageSourceServices {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl fmt::Debug for ImageSourceServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageSourceServices")
            .field("client", &self.client)
            .field("policy", &self.policy)
            .field("cache", &self.cache)
            .field("observers", &self.observers.len())
            .finish()
    }
}
