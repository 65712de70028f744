//! Loading notifications for UI refresh hooks.

use tokio::sync::mpsc::UnboundedSender;
use url::Url;

/// Receives loading notifications from a [`RemoteStreamLoader`](crate::RemoteStreamLoader).
pub trait LoadObserver: Send + Sync {
    fn loading_started(&self, _locator: &Url) {}
    fn loading_completed(&self, _locator: &Url, _cancelled: bool) {}
    /// The locator was replaced; anything displayed from the old one is stale.
    fn source_changed(&self, _locator: Option<&Url>) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    Started(Url),
    Completed { locator: Url, cancelled: bool },
    SourceChanged(Option<Url>),
}

impl LoadObserver for UnboundedSender<LoadEvent> {
    fn loading_started(&self, locator: &Url) {
        let _ = self.send(LoadEvent::Started(locator.clone()));
    }

    fn loading_completed(&self, locator: &Url, cancelled: bool) {
        let _ = self.send(LoadEvent::Completed {
            locator: locator.clone(),
            cancelled,
        });
    }

    fn source_changed(&self, locator: Option<&Url>) {
        let _ = self.send(LoadEvent::SourceChanged(locator.cloned()));
    }
}
