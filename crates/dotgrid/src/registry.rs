//! Name → generator table handed to the rendering layer.
//!
//! Built once at startup and passed around explicitly; nothing here is global.

use std::collections::BTreeMap;

use crate::error::{PatternError, Result};
use crate::geometry::Polygon;
use crate::renderable::Renderable;
use crate::style::PatternStyle;

/// Fixed generator signature: `(style, boundary, aspect_ratio, legend_mode)`.
pub type PatternFn = fn(&PatternStyle, &Polygon, f64, bool) -> Result<Renderable>;

/// A registered generator with a short description for listings.
#[derive(Debug, Clone, Copy)]
pub struct PatternEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub generate: PatternFn,
}

/// Lookup table from pattern names (and aliases) to generators.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    entries: BTreeMap<String, PatternEntry>,
    aliases: BTreeMap<String, String>,
}

fn points_generator(style: &PatternStyle, boundary: &Polygon, aspect_ratio: f64, legend_mode: bool) -> Result<Renderable> {
    crate::points::make_pattern(boundary, style, aspect_ratio, legend_mode)
}

impl PatternRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the generators this crate ships.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(PatternEntry {
            name: "points",
            description: "Lattice of point markers kept clear of the edge",
            generate: points_generator,
        });
        registry.alias("dots", "points");
        registry
    }

    /// Add or replace a generator.
    pub fn register(&mut self, entry: PatternEntry) {
        self.entries.insert(entry.name.to_lowercase(), entry);
    }

    /// Make `alias` resolve to the already-registered `target`.
    ///
    /// Returns false (and records nothing) if `target` is unknown.
    pub fn alias(&mut self, alias: &str, target: &str) -> bool {
        let target = target.to_lowercase();
        if !self.entries.contains_key(&target) {
            return false;
        }
        self.aliases.insert(alias.to_lowercase(), target);
        true
    }

    /// Look up by name or alias, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&PatternEntry> {
        let key = name.trim().to_lowercase();
        let key = self.aliases.get(&key).unwrap_or(&key);
        self.entries.get(key)
    }

    /// Registered names (without aliases), sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Aliases that resolve to `name`.
    pub fn aliases_of(&self, name: &str) -> Vec<&str> {
        let name = name.to_lowercase();
        self.aliases
            .iter()
            .filter(|(_, target)| **target == name)
            .map(|(alias, _)| alias.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run the generator registered under `name`.
    pub fn generate(
        &self,
        name: &str,
        style: &PatternStyle,
        boundary: &Polygon,
        aspect_ratio: f64,
        legend_mode: bool,
    ) -> Result<Renderable> {
        let entry = self
            .get(name)
            .ok_or_else(|| PatternError::UnknownPattern(name.to_string()))?;
        (entry.generate)(style, boundary, aspect_ratio, legend_mode)
    }
}
