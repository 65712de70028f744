//! Application bootstrap.

use crate::{
    AppError, FontCollection, FontRegistry, HandlerRegistry, LifecycleHooks, Result, RuneApp,
};
use rune_config::{ImageConfig, RuneConfig};
use rune_io::{CachePolicy, ClientConfig, ImageSourceServices, StreamCache};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tracing::{debug, info};

type ConfigAction = Box<dyn FnOnce(&mut RuneConfig)>;
type FontsAction = Box<dyn FnOnce(&mut FontCollection)>;
type HandlersAction = Box<dyn FnOnce(&mut HandlerRegistry)>;
type ImageSourcesAction = Box<dyn FnOnce(ImageSourceServices) -> ImageSourceServices>;
type LifecycleAction = Box<dyn FnOnce(&mut LifecycleHooks)>;

/// Collects configuration callbacks and turns them into a [`RuneApp`].
///
/// Callbacks run at [`build`](AppBuilder::build) time, each group in the
/// order it was registered: host configuration, app configuration, fonts,
/// handlers, image sources, lifecycle hooks.
#[derive(Default)]
pub struct AppBuilder {
    base: RuneConfig,
    host_config: Vec<ConfigAction>,
    app_config: Vec<ConfigAction>,
    fonts: Vec<FontsAction>,
    handlers: Vec<HandlersAction>,
    image_sources: Option<Vec<ImageSourcesAction>>,
    lifecycle: Vec<LifecycleAction>,
}

/// Client settings for remote images derived from `[images]`.
pub fn client_config(images: &ImageConfig) -> ClientConfig {
    ClientConfig::default()
        .with_timeout(images.request_timeout())
        .with_user_agent(images.user_agent.clone())
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already loaded configuration.
    pub fn with_config(mut self, config: RuneConfig) -> Self {
        self.base = config;
        self
    }

    /// Start from a TOML file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new().with_config(RuneConfig::load_from_file(path)?))
    }

    pub fn configure_host_configuration<F>(mut self, action: F) -> Self
    where
        F: FnOnce(&mut RuneConfig) + 'static,
    {
        self.host_config.push(Box::new(action));
        self
    }

    /// Runs after every host configuration action.
    pub fn configure_app_configuration<F>(mut self, action: F) -> Self
    where
        F: FnOnce(&mut RuneConfig) + 'static,
    {
        self.app_config.push(Box::new(action));
        self
    }

    pub fn configure_fonts<F>(mut self, action: F) -> Self
    where
        F: FnOnce(&mut FontCollection) + 'static,
    {
        self.fonts.push(Box::new(action));
        self
    }

    pub fn configure_handlers<F>(mut self, action: F) -> Self
    where
        F: FnOnce(&mut HandlerRegistry) + 'static,
    {
        self.handlers.push(Box::new(action));
        self
    }

    /// Enable the default image-source services.
    pub fn configure_image_sources(mut self) -> Self {
        self.image_sources.get_or_insert_with(Vec::new);
        self
    }

    /// Enable image sources and customize them (observers, a shared cache...).
    pub fn configure_image_sources_with<F>(mut self, action: F) -> Self
    where
        F: FnOnce(ImageSourceServices) -> ImageSourceServices + 'static,
    {
        self.image_sources
            .get_or_insert_with(Vec::new)
            .push(Box::new(action));
        self
    }

    pub fn configure_lifecycle_events<F>(mut self, action: F) -> Self
    where
        F: FnOnce(&mut LifecycleHooks) + 'static,
    {
        self.lifecycle.push(Box::new(action));
        self
    }

    pub fn build(self) -> Result<RuneApp> {
        let mut config = self.base;
        for action in self.host_config {
            action(&mut config);
        }
        for action in self.app_config {
            action(&mut config);
        }

        let fonts = build_fonts(&config, self.fonts)?;

        let mut handlers = HandlerRegistry::new();
        for action in self.handlers {
            action(&mut handlers);
        }

        let image_sources = self.image_sources.map(|actions| {
            let images = &config.images;
            let mut services =
                ImageSourceServices::new(client_config(images)).with_policy(CachePolicy {
                    enabled: images.caching_enabled,
                    validity: images.cache_validity(),
                });
            if images.caching_enabled {
                let cache = StreamCache::new(images.max_cache_entries);
                services = services.with_cache(Arc::new(cache));
            }
            actions.into_iter().fold(services, |services, action| action(services))
        });

        let mut lifecycle = LifecycleHooks::default();
        for action in self.lifecycle {
            action(&mut lifecycle);
        }

        info!(
            fonts = fonts.len(),
            handlers = handlers.len(),
            image_sources = image_sources.is_some(),
            "application built"
        );

        Ok(RuneApp {
            config,
            fonts,
            handlers,
            image_sources,
            lifecycle,
            next_scope: AtomicU64::new(0),
        })
    }
}

fn build_fonts(config: &RuneConfig, actions: Vec<FontsAction>) -> Result<FontRegistry> {
    let mut collection = FontCollection::default();
    for entry in &config.fonts.entries {
        collection.add_font(entry.file.clone(), entry.alias.as_deref());
    }
    for action in actions {
        action(&mut collection);
    }

    let mut registry = FontRegistry::new();
    for font in collection {
        if font.filename.as_os_str().is_empty() {
            return Err(AppError::InvalidFont { alias: font.alias });
        }
        registry.register(font);
    }
    debug!(names = registry.len(), "fonts registered");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_app_configuration_runs_after_host() {
        let app = AppBuilder::new()
            .configure_app_configuration(|config| config.window.title = "app".into())
            .configure_host_configuration(|config| {
                config.window.title = "host".into();
                config.window.width = 800;
            })
            .build()
            .unwrap();

        assert_eq!(app.config().window.title, "app");
        assert_eq!(app.config().window.width, 800);
    }

    #[test]
    fn test_image_sources_are_opt_in() {
        let app = AppBuilder::new().build().unwrap();
        assert!(app.image_sources().is_none());

        let app = AppBuilder::new()
            .configure_app_configuration(|config| config.images.cache_validity_secs = 10)
            .configure_image_sources()
            .build()
            .unwrap();
        let services = app.image_sources().unwrap();
        assert!(services.cache().is_some());
        assert_eq!(services.policy().validity, Duration::from_secs(10));
    }

    #[test]
    fn test_caching_disabled_skips_cache_store() {
        let app = AppBuilder::new()
            .configure_app_configuration(|config| config.images.caching_enabled = false)
            .configure_image_sources()
            .build()
            .unwrap();
        let services = app.image_sources().unwrap();
        assert!(services.cache().is_none());
        assert!(!services.policy().enabled);
    }

    #[test]
    fn test_empty_font_filename_rejected() {
        let err = AppBuilder::new()
            .configure_fonts(|fonts| {
                fonts.add_font("", Some("Broken"));
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidFont { alias: Some(ref a) } if a == "Broken"));
    }

    #[test]
    fn test_client_config_from_images() {
        let images = ImageConfig {
            request_timeout_secs: 7,
            user_agent: "gallery".into(),
            ..ImageConfig::default()
        };
        let client = client_config(&images);
        assert_eq!(client.timeout, Duration::from_secs(7));
        assert_eq!(client.user_agent, "gallery");
    }
}
