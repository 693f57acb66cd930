// src/fixtures.rs
// Read-only credential fixtures, compiled in and optionally overlaid from disk

use crate::error::{HarnessError, Result};
use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Component, Path};
use tracing::{debug, info};
use walkdir::WalkDir;

static EMBEDDED_FIXTURES: &[(&str, &[u8])] = &[
    (
        "university_degree.json",
        include_bytes!("../fixtures/university_degree.json"),
    ),
    (
        "permanent_resident_card.json",
        include_bytes!("../fixtures/permanent_resident_card.json"),
    ),
    (
        "crude_product.json",
        include_bytes!("../fixtures/crude_product.json"),
    ),
    (
        "certified_mill_test_report.json",
        include_bytes!("../fixtures/certified_mill_test_report.json"),
    ),
];

static EMBEDDED: Lazy<FixtureRegistry> = Lazy::new(|| {
    let fixtures = EMBEDDED_FIXTURES
        .iter()
        .map(|(name, bytes)| (name.to_string(), Cow::Borrowed(*bytes)))
        .collect();
    FixtureRegistry { fixtures }
});

/// Clean a logical fixture name into a registry key.
///
/// `./a.json` and `a.json` are the same fixture. Names that leave the
/// fixture root are rejected.
pub fn clean_name(name: &str) -> Result<String> {
    let mut parts = Vec::new();
    for component in Path::new(name.trim()).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(HarnessError::InvalidFixtureName(name.to_string()));
            }
        }
    }

    if parts.is_empty() {
        return Err(HarnessError::InvalidFixtureName(name.to_string()));
    }
    Ok(parts.join("/"))
}

/// Immutable name -> bytes map of credential fixtures
#[derive(Debug, Clone)]
pub struct FixtureRegistry {
    fixtures: BTreeMap<String, Cow<'static, [u8]>>,
}

impl FixtureRegistry {
    /// The compiled-in fixture set, initialised on first use
    pub fn embedded() -> &'static FixtureRegistry {
        &EMBEDDED
    }

    /// Compiled-in fixtures plus every regular file under `dir`, keyed by
    /// its `/`-separated path relative to `dir`. Files shadow compiled-in
    /// fixtures of the same name.
    pub fn with_overlay_dir(dir: &Path) -> Result<Self> {
        let mut registry = Self::embedded().clone();
        let mut loaded = 0usize;

        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(dir) else {
                continue;
            };
            let name = clean_name(&relative.to_string_lossy())?;
            let bytes = std::fs::read(entry.path())?;
            debug!(fixture = %name, bytes = bytes.len(), "Loaded fixture from disk");
            registry.fixtures.insert(name, Cow::Owned(bytes));
            loaded += 1;
        }

        info!(dir = %dir.display(), loaded, "Fixture overlay applied");
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Result<&[u8]> {
        let key = clean_name(name)?;
        self.fixtures
            .get(&key)
            .map(|bytes| bytes.as_ref())
            .ok_or(HarnessError::FixtureNotFound(key))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fixtures.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }
}
