// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named asset lookup.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use hashbrown::HashMap;

/// Extensions probed, in order, when a bare name is looked up as a bitmap.
pub const BITMAP_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Extensions probed, in order, when a bare name is looked up as a vector.
pub const VECTOR_EXTENSIONS: &[&str] = &["svg", "svgz"];

/// The kind of a named asset, which decides how it is rasterized.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Decoded with the `image` crate.
    Bitmap,
    /// Parsed as SVG and rasterized with `resvg`.
    Vector,
}

impl AssetKind {
    /// Classifies a resource name by its extension.
    ///
    /// Only the extensions in [`BITMAP_EXTENSIONS`] and [`VECTOR_EXTENSIONS`]
    /// count, so `"icon.small"` is a bare name and yields `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?;
        [Self::Bitmap, Self::Vector].into_iter().find(|kind| {
            kind.extensions()
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
    }

    /// Extensions probed for a bare name of this kind.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Bitmap => BITMAP_EXTENSIONS,
            Self::Vector => VECTOR_EXTENSIONS,
        }
    }
}

/// A source of named resources.
///
/// Implementations resolve an exact resource name, extension included, to its
/// bytes. Extension probing is handled by [`resolve`].
pub trait AssetSource {
    /// Returns the bytes stored under `name`, or `None` if there is none.
    fn load(&self, name: &str) -> Option<Vec<u8>>;
}

impl<T: AssetSource + ?Sized> AssetSource for &T {
    fn load(&self, name: &str) -> Option<Vec<u8>> {
        (**self).load(name)
    }
}

/// Resources stored as files below a root directory.
#[derive(Clone, Debug)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory names are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirAssets {
    fn load(&self, name: &str) -> Option<Vec<u8>> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            log::warn!("refusing asset name outside of the asset root: {name:?}");
            return None;
        }
        let path = self.root.join(relative);
        match std::fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                log::trace!("asset {} not readable: {err}", path.display());
                None
            }
        }
    }
}

/// Resources held in memory, keyed by name.
#[derive(Clone, Default)]
pub struct MemoryAssets {
    entries: HashMap<String, Vec<u8>>,
}

impl fmt::Debug for MemoryAssets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryAssets")
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl MemoryAssets {
    /// Creates an empty set of resources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `bytes` under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(name.into(), bytes.into());
    }

    /// Builder form of [`MemoryAssets::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }

    /// Number of stored resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no resources are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AssetSource for MemoryAssets {
    fn load(&self, name: &str) -> Option<Vec<u8>> {
        self.entries.get(name).cloned()
    }
}

/// A resource found by [`resolve`].
#[derive(Clone, Debug)]
pub struct ResolvedAsset {
    /// The exact name the bytes were loaded from.
    pub name: String,
    /// How the bytes should be rasterized.
    pub kind: AssetKind,
    /// Encoded resource bytes.
    pub bytes: Vec<u8>,
}

/// Looks up `name` in `assets`.
///
/// A name with an extension is loaded as-is and classified by that extension,
/// even when it contradicts `preferred`. A bare name is probed with the
/// extensions of `preferred`; with no preference, bitmap extensions are tried
/// before vector ones. The bare name itself is never loaded.
pub fn resolve(
    assets: &dyn AssetSource,
    name: &str,
    preferred: Option<AssetKind>,
) -> Option<ResolvedAsset> {
    if let Some(kind) = AssetKind::from_name(name) {
        let bytes = assets.load(name)?;
        return Some(ResolvedAsset {
            name: name.to_owned(),
            kind,
            bytes,
        });
    }

    let kinds: &[AssetKind] = match preferred {
        Some(AssetKind::Bitmap) => &[AssetKind::Bitmap],
        Some(AssetKind::Vector) => &[AssetKind::Vector],
        None => &[AssetKind::Bitmap, AssetKind::Vector],
    };
    kinds.iter().find_map(|&kind| {
        kind.extensions().iter().find_map(|ext| {
            let candidate = format!("{name}.{ext}");
            let bytes = assets.load(&candidate)?;
            Some(ResolvedAsset {
                name: candidate,
                kind,
                bytes,
            })
        })
    })
}
