//! Bringing an application's windows up on the native toolkit.

use crate::{AppContext, Result, WindowContext};
use rune_window::{NativeWindow, NativeWindowFactory, WindowAttributes};
use std::collections::HashMap;
use tracing::{debug, info};

/// Why a window is being opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenWindowRequest {
    /// Arguments the process was launched with
    pub launch_args: Option<String>,
    /// Saved state of a window being restored
    pub state: Option<HashMap<String, String>>,
}

impl OpenWindowRequest {
    pub fn launch(args: impl Into<String>) -> Self {
        Self {
            launch_args: Some(args.into()),
            state: None,
        }
    }

    pub fn restore(state: HashMap<String, String>) -> Self {
        Self {
            launch_args: None,
            state: Some(state),
        }
    }
}

/// What the application sees when asked for a window.
#[derive(Debug, Clone)]
pub struct ActivationState {
    pub context: WindowContext,
    pub launch_args: Option<String>,
    /// Restored state; empty for fresh launches
    pub state: HashMap<String, String>,
}

impl ActivationState {
    /// Saved state takes precedence over launch arguments.
    fn from_request(context: WindowContext, request: OpenWindowRequest) -> Self {
        match request.state {
            Some(state) => Self {
                context,
                launch_args: None,
                state,
            },
            None => Self {
                context,
                launch_args: request.launch_args,
                state: HashMap::new(),
            },
        }
    }
}

/// The cross-platform application object.
pub trait Application {
    /// The context attached by the host; `None` until the app is running.
    fn context(&self) -> Option<&AppContext>;

    /// Describe the window to open for `activation`.
    fn create_window(&mut self, activation: &ActivationState) -> WindowAttributes;
}

/// A native window together with its scoped context.
pub struct CreatedWindow {
    pub window: Box<dyn NativeWindow>,
    pub context: WindowContext,
}

impl std::fmt::Debug for CreatedWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreatedWindow")
            .field("window", &self.window.id())
            .field("context", &self.context)
            .finish()
    }
}

/// Create, announce and activate a native window for `application`.
///
/// Returns `Ok(None)` when the application has no context attached yet.
pub fn create_native_window<A>(
    application: &mut A,
    factory: &mut dyn NativeWindowFactory,
    request: OpenWindowRequest,
) -> Result<Option<CreatedWindow>>
where
    A: Application + ?Sized,
{
    let Some(app_context) = application.context().cloned() else {
        debug!("application has no context, skipping window creation");
        return Ok(None);
    };

    let context = app_context.make_scoped();
    let lifecycle = app_context.app().lifecycle();
    lifecycle.context_created(&context);

    let activation = ActivationState::from_request(context.clone(), request);
    let attributes = application.create_window(&activation);

    let mut window = factory.create_window(&attributes)?;
    lifecycle.window_created(window.as_ref());
    window.activate();

    info!(title = %attributes.title, scope = context.scope(), "window activated");
    Ok(Some(CreatedWindow { window, context }))
}
