//! What to fetch and how.

use crate::{LoadError, Result};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Default lifetime of a cached remote resource.
pub const DEFAULT_CACHE_VALIDITY: Duration = Duration::from_secs(24 * 60 * 60);

/// Locator plus caching policy for a remote resource.
///
/// A [`RemoteStreamLoader`](crate::RemoteStreamLoader) snapshots its
/// descriptor when a load begins, so later edits never affect a load that
/// is already running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub locator: Option<Url>,
    pub caching_enabled: bool,
    pub cache_validity: Duration,
}

impl Default for ResourceDescriptor {
    fn default() -> Self {
        Self {
            locator: None,
            caching_enabled: true,
            cache_validity: DEFAULT_CACHE_VALIDITY,
        }
    }
}

impl ResourceDescriptor {
    /// Descriptor for an already parsed locator.
    pub fn new(locator: Url) -> Self {
        Self {
            locator: Some(locator),
            ..Self::default()
        }
    }

    /// Parse `input` as an absolute URI.
    pub fn parse(input: &str) -> Result<Self> {
        let locator = Url::parse(input).map_err(|source| LoadError::InvalidLocator {
            input: input.to_string(),
            source,
        })?;
        Ok(Self::new(locator))
    }

    pub fn with_caching(mut self, enabled: bool) -> Self {
        self.caching_enabled = enabled;
        self
    }

    pub fn with_cache_validity(mut self, validity: Duration) -> Self {
        self.cache_validity = validity;
        self
    }

    /// No locator configured; loading yields nothing.
    pub fn is_empty(&self) -> bool {
        self.locator.is_none()
    }
}

impl fmt::Display for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.locator {
            Some(locator) => write!(f, "Uri: {locator}"),
            None => write!(f, "Uri: <none>"),
        }
    }
}
