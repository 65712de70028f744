//! Hooks invoked while native windows are brought up.

use crate::WindowContext;
use rune_window::NativeWindow;
use std::fmt;

type ContextHook = Box<dyn Fn(&WindowContext) + Send + Sync>;
type WindowHook = Box<dyn Fn(&dyn NativeWindow) + Send + Sync>;

/// Lifecycle callbacks, run in registration order.
#[derive(Default)]
pub struct LifecycleHooks {
    context_created: Vec<ContextHook>,
    window_created: Vec<WindowHook>,
}

impl LifecycleHooks {
    /// Called once the window-scoped context exists, before the window is built.
    pub fn on_context_created<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&WindowContext) + Send + Sync + 'static,
    {
        self.context_created.push(Box::new(hook));
        self
    }

    /// Called after the native window is created and before it is activated.
    pub fn on_window_created<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&dyn NativeWindow) + Send + Sync + 'static,
    {
        self.window_created.push(Box::new(hook));
        self
    }

    pub(crate) fn context_created(&self, context: &WindowContext) {
        for hook in &self.context_created {
            hook(context);
        }
    }

    pub(crate) fn window_created(&self, window: &dyn NativeWindow) {
        for hook in &self.window_created {
            hook(window);
        }
    }
}

impl fmt::Debug for LifecycleHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleHooks")
            .field("context_created", &self.context_created.len())
            .field("window_created", &self.window_created.len())
            .finish()
    }
}
