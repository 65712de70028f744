use crate::{AppBuilder, FontRegistry, HandlerRegistry, LifecycleHooks};
use rune_config::RuneConfig;
use rune_io::ImageSourceServices;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Everything an application was bootstrapped with.
///
/// Built once by [`AppBuilder`] and then shared read-only through
/// [`AppContext`].
#[derive(Debug)]
pub struct RuneApp {
    pub(crate) config: RuneConfig,
    pub(crate) fonts: FontRegistry,
    pub(crate) handlers: HandlerRegistry,
    pub(crate) image_sources: Option<ImageSourceServices>,
    pub(crate) lifecycle: LifecycleHooks,
    pub(crate) next_scope: AtomicU64,
}

impl RuneApp {
    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn config(&self) -> &RuneConfig {
        &self.config
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Present only when the builder enabled image sources.
    pub fn image_sources(&self) -> Option<&ImageSourceServices> {
        self.image_sources.as_ref()
    }

    pub fn lifecycle(&self) -> &LifecycleHooks {
        &self.lifecycle
    }

    /// Wrap the app in a shareable context for the hosting layer.
    pub fn into_context(self) -> AppContext {
        AppContext {
            app: Arc::new(self),
        }
    }
}

/// Application-wide handle given to platform code.
#[derive(Debug, Clone)]
pub struct AppContext {
    app: Arc<RuneApp>,
}

impl AppContext {
    pub fn app(&self) -> &RuneApp {
        &self.app
    }

    /// A context scoped to one window.
    pub fn make_scoped(&self) -> WindowContext {
        WindowContext {
            app: self.app.clone(),
            scope: self.app.next_scope.fetch_add(1, Ordering::Relaxed) + 1,
        }
    }
}

/// Context for a single window; shares the app's services.
#[derive(Clone)]
pub struct WindowContext {
    app: Arc<RuneApp>,
    scope: u64,
}

impl WindowContext {
    pub fn app(&self) -> &RuneApp {
        &self.app
    }

    /// Distinct per window, starting at 1.
    pub fn scope(&self) -> u64 {
        self.scope
    }
}

impl fmt::Debug for WindowContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowContext")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}
