use crate::{NativeWindow, NativeWindowFactory, Result, WindowAttributes};

/// Factory that opens no real windows; it records what it was asked for.
#[derive(Debug, Default)]
pub struct HeadlessWindowFactory {
    created: Vec<WindowAttributes>,
}

impl HeadlessWindowFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes of every window created so far, in order.
    pub fn created(&self) -> &[WindowAttributes] {
        &self.created
    }
}

impl NativeWindowFactory for HeadlessWindowFactory {
    fn create_window(&mut self, attributes: &WindowAttributes) -> Result<Box<dyn NativeWindow>> {
        self.created.push(attributes.clone());
        Ok(Box::new(HeadlessWindow {
            id: self.created.len() as u64,
            attributes: attributes.clone(),
            active: false,
        }))
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    id: u64,
    attributes: WindowAttributes,
    active: bool,
}

impl NativeWindow for HeadlessWindow {
    fn id(&self) -> u64 {
        self.id
    }

    fn title(&self) -> String {
        self.attributes.title.clone()
    }

    fn activate(&mut self) {
        self.active = true;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
