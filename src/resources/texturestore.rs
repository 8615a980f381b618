//! Texture store resource.
//!
//! A non-send resource holding loaded textures keyed by string IDs.
//! Sprites, particle effects and the UI designer refer to textures by key
//! and resolve them here at draw time.
//!
//! Note: Raylib textures must be used from the main thread only.

use raylib::prelude::Texture2D;
use rustc_hash::FxHashMap;

/// Map of texture keys to loaded textures.
///
/// This is a non-send resource; use `NonSend<TextureStore>` in system parameters.
// NonSend resource: insert with insert_non_send_resource and access via NonSend/NonSendMut
#[derive(Default)]
pub struct TextureStore {
    textures: FxHashMap<String, Texture2D>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a texture with the given key, replacing any previous one.
    pub fn add(&mut self, id: impl Into<String>, texture: Texture2D) {
        self.textures.insert(id.into(), texture);
    }

    pub fn get(&self, id: impl AsRef<str>) -> Option<&Texture2D> {
        self.textures.get(id.as_ref())
    }

    /// Pixel size of a texture, for layout code that has no texture handle.
    pub fn size_of(&self, id: &str) -> Option<(i32, i32)> {
        self.textures.get(id).map(|t| (t.width, t.height))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.textures.contains_key(id)
    }

    pub fn clear(&mut self) {
        self.textures.clear();
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
