//! Font registration.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One font file and the alias views use for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDescriptor {
    pub filename: PathBuf,
    pub alias: Option<String>,
}

/// Fonts collected from `configure_fonts` callbacks, in registration order.
#[derive(Debug, Default)]
pub struct FontCollection {
    fonts: Vec<FontDescriptor>,
}

impl FontCollection {
    pub fn add_font(&mut self, filename: impl Into<PathBuf>, alias: Option<&str>) -> &mut Self {
        self.fonts.push(FontDescriptor {
            filename: filename.into(),
            alias: alias.map(String::from),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FontDescriptor> {
        self.fonts.iter()
    }
}

impl IntoIterator for FontCollection {
    type Item = FontDescriptor;
    type IntoIter = std::vec::IntoIter<FontDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fonts.into_iter()
    }
}

/// Resolves font names used by views to registered font files.
///
/// Lookups are case-insensitive and match either the alias or the file
/// name. Re-registering a name replaces the earlier font.
#[derive(Debug, Default)]
pub struct FontRegistry {
    by_name: HashMap<String, FontDescriptor>,
}

fn key(name: &str) -> String {
    name.to_lowercase()
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, font: FontDescriptor) {
        debug!(filename = %font.filename.display(), alias = ?font.alias, "registering font");

        if let Some(name) = font.filename.file_name().and_then(|n| n.to_str()) {
            self.by_name.insert(key(name), font.clone());
        }
        if let Some(alias) = &font.alias {
            self.by_name.insert(key(alias), font);
        }
    }

    pub fn resolve(&self, name: &str) -> Option<&Path> {
        self.by_name.get(&key(name)).map(|font| font.filename.as_path())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(&key(name))
    }

    /// Number of distinct names that resolve to a font.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
