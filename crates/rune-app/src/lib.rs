//! Application bootstrap for Rune.
//!
//! [`AppBuilder`] gathers configuration, fonts, view handlers, image-source
//! services and lifecycle hooks into a [`RuneApp`]. Platform code receives
//! an [`AppContext`] and opens windows with [`create_native_window`].

mod app;
mod builder;
mod error;
mod fonts;
mod handlers;
mod lifecycle;
mod platform;

pub use app::{AppContext, RuneApp, WindowContext};
pub use builder::{client_config, AppBuilder};
pub use error::{AppError, Result};
pub use fonts::{FontCollection, FontDescriptor, FontRegistry};
pub use handlers::{HandlerRegistry, ViewHandler};
pub use lifecycle::LifecycleHooks;
pub use platform::{
    create_native_window, ActivationState, Application, CreatedWindow, OpenWindowRequest,
};

pub use rune_config::RuneConfig;
