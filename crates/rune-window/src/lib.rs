//! rune-window: native window creation behind a capability trait.
//!
//! Responsibilities:
//! - Describe a window independently of the platform ([`WindowAttributes`]).
//! - Create and activate native windows through [`NativeWindowFactory`].
//! - Provide a winit-backed factory and a headless one for tests and servers.

use thiserror::Error;

mod headless;
mod winit_backend;

pub use headless::{HeadlessWindow, HeadlessWindowFactory};
pub use winit_backend::{WinitNativeWindow, WinitWindowFactory};

#[derive(Error, Debug)]
pub enum WindowError {
    #[error("failed to create native window: {0}")]
    Creation(String),

    #[error("window factory is unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, WindowError>;

/// Platform-independent description of a window to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowAttributes {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowAttributes {
    fn default() -> Self {
        Self {
            title: "Rune".to_string(),
            width: 1024,
            height: 768,
        }
    }
}

impl WindowAttributes {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// A window owned by the platform toolkit.
pub trait NativeWindow {
    fn id(&self) -> u64;
    fn title(&self) -> String;
    /// Show the window and give it focus.
    fn activate(&mut self);
    fn is_active(&self) -> bool;
}

/// Capability to materialize native windows.
pub trait NativeWindowFactory {
    fn create_window(&mut self, attributes: &WindowAttributes) -> Result<Box<dyn NativeWindow>>;
}
