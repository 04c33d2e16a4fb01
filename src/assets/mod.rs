use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::{AssetKind, AssetManifest};

/// Texture id to file registry. Backends load the files; the core only
/// deals in ids.
#[derive(Default, Debug)]
pub struct AssetManager {
    textures: HashMap<String, PathBuf>,
}

impl AssetManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_manifest(manifest: &AssetManifest) -> Self {
        let mut manager = Self::new();
        for asset in &manifest.assets {
            match asset.kind {
                AssetKind::Texture => manager.add_texture(&asset.id, &asset.file),
            }
        }
        manager
    }

    /// Register a texture; a later registration of the same id wins
    pub fn add_texture(&mut self, id: &str, file: impl AsRef<Path>) {
        log::debug!("adding texture '{}': {}", id, file.as_ref().display());
        if let Some(previous) = self
            .textures
            .insert(id.to_string(), file.as_ref().to_path_buf())
        {
            log::warn!("texture '{}' re-registered, was {}", id, previous.display());
        }
    }

    pub fn get_texture(&self, id: &str) -> Option<&Path> {
        self.textures.get(id).map(PathBuf::as_path)
    }

    pub fn texture_ids(&self) -> impl Iterator<Item = &str> {
        self.textures.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
