//! View type -> platform handler mapping.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Bridges a cross-platform view to its native counterpart.
pub trait ViewHandler {
    fn name(&self) -> &'static str;
}

type HandlerFactory = Box<dyn Fn() -> Box<dyn ViewHandler> + Send + Sync>;

/// Handler factories keyed by view type.
#[derive(Default)]
pub struct HandlerRegistry {
    factories: HashMap<TypeId, (&'static str, HandlerFactory)>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map view type `V` to handler `H`, replacing any earlier mapping.
    pub fn add_handler<V: 'static, H>(&mut self) -> &mut Self
    where
        H: ViewHandler + Default + 'static,
    {
        self.add_handler_with::<V, _>(|| Box::new(H::default()) as Box<dyn ViewHandler>)
    }

    pub fn add_handler_with<V: 'static, F>(&mut self, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn ViewHandler> + Send + Sync + 'static,
    {
        self.factories
            .insert(TypeId::of::<V>(), (type_name::<V>(), Box::new(factory)));
        self
    }

    /// A fresh handler for view type `V`.
    pub fn create_handler<V: 'static>(&self) -> Option<Box<dyn ViewHandler>> {
        self.factories
            .get(&TypeId::of::<V>())
            .map(|(_, factory)| factory())
    }

    pub fn contains<V: 'static>(&self) -> bool {
        self.factories.contains_key(&TypeId::of::<V>())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.factories.values().map(|(view, _)| view))
            .finish()
    }
}
