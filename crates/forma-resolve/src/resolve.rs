//! # Path Resolution
//!
//! Turns a textual target into a live [`Item`]. Resolution is a capability
//! behind the [`Resolver`] trait so the dispatcher never depends on one
//! particular namespace scheme.
//!
//! ## Dotted Paths
//!
//! [`DottedPathResolver`] walks `a.b.c` left to right:
//!
//! 1. Import `a` as a top-level unit.
//! 2. For each later segment, read it as an attribute of the current item.
//!    If there is no such attribute and the current item is a module, import
//!    the extended dotted path as a deeper unit instead.
//! 3. Anything else fails, naming the segment and the parent path searched.
//!
//! Paths are validated first: an empty string, or any empty segment (so a
//! leading or trailing dot), is a usage error and never reaches the importer.

use std::collections::BTreeMap;

use crate::error::InitError;
use crate::namespace::{Importer, Item};

/// A resolved target and the path that produced it.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// The live item.
    pub item: Item,
    /// Path string, kept for diagnostics.
    pub path: String,
}

/// Turns a path string into a live item.
pub trait Resolver: Send + Sync {
    /// Resolve `path`.
    ///
    /// # Errors
    ///
    /// `InitError::Usage` for malformed paths, `InitError::Resolution` when a
    /// well-formed path names nothing.
    fn resolve(&self, path: &str) -> Result<Resolved, InitError>;
}

/// Split a dotted path into its segments.
///
/// # Errors
///
/// `InitError::Usage` if the path is empty or contains an empty segment.
pub fn split_path(path: &str) -> Result<Vec<&str>, InitError> {
    if path.is_empty() {
        return Err(InitError::usage("empty target path"));
    }
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(InitError::usage(format!(
            "invalid dotted path '{path}'; relative imports are not supported"
        )));
    }
    Ok(segments)
}

fn resolution(path: &str, segment: &str, parent: Option<&str>, reason: String) -> InitError {
    InitError::Resolution {
        path: path.to_string(),
        segment: segment.to_string(),
        parent: parent.map(str::to_string),
        reason,
    }
}

/// Resolves dotted paths against a module namespace.
#[derive(Debug, Clone)]
pub struct DottedPathResolver<I> {
    importer: I,
}

impl<I: Importer> DottedPathResolver<I> {
    /// Resolve through `importer`.
    pub fn new(importer: I) -> Self {
        Self { importer }
    }

    /// The underlying importer.
    pub fn importer(&self) -> &I {
        &self.importer
    }
}

impl<I: Importer> Resolver for DottedPathResolver<I> {
    fn resolve(&self, path: &str) -> Result<Resolved, InitError> {
        let segments = split_path(path)?;
        let Some((first, rest)) = segments.split_first() else {
            return Err(InitError::usage("empty target path"));
        };

        let root = self.importer.import(first).map_err(|err| {
            resolution(path, first, None, format!("{err}; is module '{first}' registered?"))
        })?;
        let mut current = Item::Module(root);
        let mut current_path = (*first).to_string();

        for segment in rest {
            let next = match current.attribute(segment) {
                Some(item) => item,
                None if current.is_module() => {
                    let deeper = format!("{current_path}.{segment}");
                    tracing::trace!(path = %deeper, "attribute missing, importing deeper unit");
                    let module = self.importer.import(&deeper).map_err(|err| {
                        resolution(
                            path,
                            segment,
                            Some(current_path.as_str()),
                            format!("{err}; is '{segment}' importable from module '{current_path}'?"),
                        )
                    })?;
                    Item::Module(module)
                }
                None => {
                    return Err(resolution(
                        path,
                        segment,
                        Some(current_path.as_str()),
                        format!(
                            "'{segment}' is not an attribute of {} '{current_path}'",
                            current.kind()
                        ),
                    ));
                }
            };
            current_path.push('.');
            current_path.push_str(segment);
            current = next;
        }

        tracing::debug!(path, kind = current.kind(), "resolved target");
        Ok(Resolved {
            item: current,
            path: path.to_string(),
        })
    }
}

/// Resolves exact keys against a flat table.
///
/// Keys are opaque strings; no dotted-path walking takes place.
#[derive(Debug, Clone, Default)]
pub struct KeyedResolver {
    entries: BTreeMap<String, Item>,
}

impl KeyedResolver {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `item` under `key`, replacing any previous entry.
    pub fn register(&mut self, key: impl Into<String>, item: impl Into<Item>) -> &mut Self {
        self.entries.insert(key.into(), item.into());
        self
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Resolver for KeyedResolver {
    fn resolve(&self, path: &str) -> Result<Resolved, InitError> {
        if path.is_empty() {
            return Err(InitError::usage("empty target key"));
        }
        let item = self.entries.get(path).cloned().ok_or_else(|| {
            resolution(path, path, None, format!("no target registered under '{path}'"))
        })?;
        tracing::debug!(key = path, kind = item.kind(), "resolved keyed target");
        Ok(Resolved {
            item,
            path: path.to_string(),
        })
    }
}
