use crate::{NativeWindow, NativeWindowFactory, Result, WindowAttributes, WindowError};
use tracing::debug;
use winit::dpi::LogicalSize;
use winit::event_loop::EventLoopWindowTarget;
use winit::window::{Window, WindowBuilder};

/// Creates winit windows on a running event loop.
pub struct WinitWindowFactory<'a> {
    target: &'a EventLoopWindowTarget<()>,
}

impl<'a> WinitWindowFactory<'a> {
    pub fn new(target: &'a EventLoopWindowTarget<()>) -> Self {
        Self { target }
    }
}

impl NativeWindowFactory for WinitWindowFactory<'_> {
    fn create_window(&mut self, attributes: &WindowAttributes) -> Result<Box<dyn NativeWindow>> {
        // Stay hidden until activated
        let window = WindowBuilder::new()
            .with_title(&attributes.title)
            .with_inner_size(LogicalSize::new(attributes.width, attributes.height))
            .with_visible(false)
            .build(self.target)
            .map_err(|e| WindowError::Creation(e.to_string()))?;

        debug!(title = %attributes.title, id = ?window.id(), "created winit window");
        Ok(Box::new(WinitNativeWindow {
            window,
            active: false,
        }))
    }
}

pub struct WinitNativeWindow {
    window: Window,
    active: bool,
}

impl WinitNativeWindow {
    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl NativeWindow for WinitNativeWindow {
    fn id(&self) -> u64 {
        u64::from(self.window.id())
    }

    fn title(&self) -> String {
        self.window.title()
    }

    fn activate(&mut self) {
        self.window.set_visible(true);
        self.window.focus_window();
        self.window.request_redraw();
        self.active = true;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
