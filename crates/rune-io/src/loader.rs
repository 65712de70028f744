//! Remote stream loader: one cancellable fetch per loader at a time.

use crate::client::{self, ClientConfig};
use crate::{LoadError, LoadObserver, ResourceDescriptor, ResourceStream, Result, StreamCache};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

/// Lifecycle of the most recent load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Completed,
    Cancelled,
    Failed,
}

/// The cancellation source of the load currently in flight.
#[derive(Debug)]
struct LoadSession {
    id: u64,
    token: CancellationToken,
}

/// Resolves a [`ResourceDescriptor`] into a [`ResourceStream`].
///
/// Methods take `&self` so the hosting layer can change the locator while a
/// load is awaiting; doing so cancels that load.
pub struct RemoteStreamLoader {
    descriptor: Mutex<ResourceDescriptor>,
    session: Mutex<Option<LoadSession>>,
    state: Mutex<LoadState>,
    next_session: AtomicU64,
    client: ClientConfig,
    cache: Option<Arc<StreamCache>>,
    observers: Vec<Arc<dyn LoadObserver>>,
}

impl RemoteStreamLoader {
    pub fn new(descriptor: ResourceDescriptor) -> Self {
        Self {
            descriptor: Mutex::new(descriptor),
            session: Mutex::new(None),
            state: Mutex::new(LoadState::Idle),
            next_session: AtomicU64::new(0),
            client: ClientConfig::default(),
            cache: None,
            observers: Vec::new(),
        }
    }

    pub fn with_client_config(mut self, client: ClientConfig) -> Self {
        self.client = client;
        self
    }

    /// Attach a cache store. Without one, caching is a passthrough.
    pub fn with_cache(mut self, cache: Arc<StreamCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn LoadObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn descriptor(&self) -> ResourceDescriptor {
        self.descriptor.lock().clone()
    }

    pub fn state(&self) -> LoadState {
        *self.state.lock()
    }

    pub fn is_loading(&self) -> bool {
        self.session.lock().is_some()
    }

    /// Replace the locator. A different locator cancels the in-flight load.
    pub fn set_locator(&self, locator: Option<Url>) {
        {
            let mut descriptor = self.descriptor.lock();
            if descriptor.locator == locator {
                return;
            }
            descriptor.locator = locator.clone();
        }

        if let Some(session) = self.session.lock().take() {
            debug!(session = session.id, "locator changed, cancelling load");
            session.token.cancel();
        }
        *self.state.lock() = LoadState::Idle;

        for observer in &self.observers {
            observer.source_changed(locator.as_ref());
        }
    }

    pub fn set_caching_enabled(&self, enabled: bool) {
        self.descriptor.lock().caching_enabled = enabled;
    }

    pub fn set_cache_validity(&self, validity: Duration) {
        self.descriptor.lock().cache_validity = validity;
    }

    /// Cancel the in-flight load, if any. Returns whether one was running.
    pub fn cancel(&self) -> bool {
        match self.session.lock().take() {
            Some(session) => {
                session.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Load the current descriptor.
    ///
    /// Returns `Ok(None)` when no locator is set. `cancel` aborts the load
    /// whenever the caller triggers it.
    pub async fn load(&self, cancel: &CancellationToken) -> Result<Option<ResourceStream>> {
        let descriptor = self.descriptor();
        let Some(locator) = descriptor.locator.clone() else {
            return Ok(None);
        };

        for observer in &self.observers {
            observer.loading_started(&locator);
        }

        let (id, token) = self.begin_session(cancel);

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(LoadError::Cancelled),
            result = self.fetch(&descriptor, &locator) => result,
        };

        let current = self.end_session(id);

        let (state, cancelled) = match &result {
            Ok(_) => (LoadState::Completed, false),
            Err(LoadError::Cancelled) => {
                debug!(%locator, "load cancelled");
                (LoadState::Cancelled, true)
            }
            Err(error) => {
                warn!(target: "rune_io::image_loading", %locator, %error, "error getting stream");
                (LoadState::Failed, false)
            }
        };

        // A superseded load leaves the state to whoever replaced it
        if current {
            *self.state.lock() = state;
        }

        for observer in &self.observers {
            observer.loading_completed(&locator, cancelled);
        }

        result.map(Some)
    }

    fn begin_session(&self, external: &CancellationToken) -> (u64, CancellationToken) {
        let id = self.next_session.fetch_add(1, Ordering::Relaxed);
        let token = external.child_token();

        let previous = self.session.lock().replace(LoadSession {
            id,
            token: token.clone(),
        });
        if let Some(previous) = previous {
            debug!(session = previous.id, "superseding in-flight load");
            previous.token.cancel();
        }
        *self.state.lock() = LoadState::Loading;

        (id, token)
    }

    fn end_session(&self, id: u64) -> bool {
        let mut session = self.session.lock();
        match session.as_ref() {
            Some(active) if active.id == id => {
                *session = None;
                true
            }
            _ => false,
        }
    }

    async fn fetch(&self, descriptor: &ResourceDescriptor, locator: &Url) -> Result<ResourceStream> {
        let cache = match &self.cache {
            Some(cache) if descriptor.caching_enabled => cache,
            _ => return client::open_stream(&self.client, locator).await,
        };

        if let Some(data) = cache.get(locator) {
            debug!(%locator, "serving cached resource");
            return Ok(ResourceStream::from_bytes(data).mark_cached());
        }

        let (data, content_type) = client::fetch_bytes(&self.client, locator).await?;
        cache.insert(locator.clone(), data.clone(), descriptor.cache_validity);

        Ok(ResourceStream::from_bytes(data).with_content_type(content_type))
    }
}

impl std::fmt::Debug for RemoteStreamLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStreamLoader")
            .field("descriptor", &*self.descriptor.lock())
            .field("state", &self.state())
            .field("client", &self.client)
            .field("cached", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LoadEvent;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_empty_descriptor_is_noop() {
        let (tx, mut rx) = mpsc::unbounded_channel::<LoadEvent>();
        let loader = RemoteStreamLoader::new(ResourceDescriptor::default()).with_observer(Arc::new(tx));

        let result = loader.load(&CancellationToken::new()).await.unwrap();
        assert!(result.is_none());
        assert_eq!(loader.state(), LoadState::Idle);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let (tx, mut rx) = mpsc::unbounded_channel::<LoadEvent>();
        // Port 9 is discard; the cancelled token wins before any connect is polled
        let descriptor = ResourceDescriptor::parse("http://127.0.0.1:9/a.png").unwrap();
        let loader = RemoteStreamLoader::new(descriptor.clone()).with_observer(Arc::new(tx));

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = loader.load(&cancel).await.unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(loader.state(), LoadState::Cancelled);
        assert!(!loader.is_loading());

        let locator = descriptor.locator.unwrap();
        assert_eq!(rx.try_recv().unwrap(), LoadEvent::Started(locator.clone()));
        assert_eq!(
            rx.try_recv().unwrap(),
            LoadEvent::Completed {
                locator,
                cancelled: true
            }
        );
    }

    #[test]
    fn test_same_locator_does_not_notify() {
        let (tx, mut rx) = mpsc::unbounded_channel::<LoadEvent>();
        let descriptor = ResourceDescriptor::parse("https://example.com/a.png").unwrap();
        let loader = RemoteStreamLoader::new(descriptor.clone()).with_observer(Arc::new(tx));

        loader.set_locator(descriptor.locator.clone());
        assert!(rx.try_recv().is_err());

        loader.set_locator(None);
        assert_eq!(rx.try_recv().unwrap(), LoadEvent::SourceChanged(None));
        assert!(loader.descriptor().is_empty());
    }

    #[test]
    fn test_cancel_without_session() {
        let loader = RemoteStreamLoader::new(ResourceDescriptor::default());
        assert!(!loader.cancel());
        assert!(!loader.is_loading());
    }
}
