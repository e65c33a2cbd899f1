use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::Texture;

/// Deduplicates texture sources by their resolved path.
///
/// Materials refer to textures by index; a path seen before hands back the
/// index it was first given, so each image is decoded and uploaded once.
#[derive(Default)]
pub struct TextureRegistry {
    textures: Vec<Texture>,
    indices: HashMap<PathBuf, usize>,
}

impl TextureRegistry {
    pub fn resolve(&mut self, directory: &Path, relative: impl AsRef<Path>) -> usize {
        let path = directory.join(relative);
        if let Some(&index) = self.indices.get(&path) {
            log::trace!("Reusing texture #{index} for {}", path.display());
            return index;
        }

        let index = self.textures.len();
        log::debug!("Registered texture #{index}: {}", path.display());
        self.indices.insert(path.clone(), index);
        self.textures.push(Texture { path });
        index
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn into_textures(self) -> Vec<Texture> {
        self.textures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_path_resolves_once() {
        let mut registry = TextureRegistry::default();
        let dir = Path::new("models/backpack");

        let diffuse = registry.resolve(dir, "diffuse.jpg");
        let specular = registry.resolve(dir, "specular.jpg");
        let again = registry.resolve(dir, "diffuse.jpg");

        assert_eq!((diffuse, specular, again), (0, 1, 0));
        assert_eq!(registry.len(), 2);

        let textures = registry.into_textures();
        assert_eq!(textures[1].path, Path::new("models/backpack/specular.jpg"));
    }

    #[test]
    fn same_file_name_in_other_directory_is_distinct() {
        let mut registry = TextureRegistry::default();
        let a = registry.resolve(Path::new("a"), "wood.png");
        let b = registry.resolve(Path::new("b"), "wood.png");
        assert_ne!(a, b);
    }
}
