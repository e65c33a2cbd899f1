pub mod error;
pub mod gltf;
pub mod io;
pub mod loader;
pub mod obj;
pub mod process;
pub mod registry;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use shared::{BoundingBox, Vertex};

pub use error::{Error, Result};

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Scene {
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    pub textures: Vec<Texture>,
    pub instances: Vec<Instance>,
    pub bounding_box: BoundingBox,
    /// Directory texture paths were resolved against.
    pub directory: PathBuf,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub material: Option<usize>,
    pub bounding_box: BoundingBox,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Material {
    pub name: String,
    pub textures: Vec<MaterialTexture>,
    pub diffuse_color: glam::Vec3,
    pub specular_color: glam::Vec3,
    pub shininess: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct MaterialTexture {
    pub kind: TextureKind,
    pub texture: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum TextureKind {
    Diffuse,
    Specular,
    Normal,
    Height,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Texture {
    pub path: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Instance {
    pub mesh: usize,
    pub transform: glam::Mat4,
}

/// Post-processing applied while importing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImportOptions {
    /// Convert strips, fans and polygons into triangle lists.
    pub triangulate: bool,
    /// Flip V for formats whose texture origin is bottom-left (OBJ).
    pub flip_uvs: bool,
    /// Fill in smooth normals for vertices that have none.
    pub generate_normals: bool,
    pub calc_tangents: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            triangulate: true,
            flip_uvs: true,
            generate_normals: true,
            calc_tangents: true,
        }
    }
}

impl TextureKind {
    /// Sampler uniform prefix; shaders number these from 1 per kind.
    pub const fn uniform_name(self) -> &'static str {
        match self {
            Self::Diffuse => "texture_diffuse",
            Self::Specular => "texture_specular",
            Self::Normal => "texture_normal",
            Self::Height => "texture_height",
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::from("default"),
            textures: Vec::new(),
            diffuse_color: glam::Vec3::splat(0.8),
            specular_color: glam::Vec3::splat(0.5),
            shininess: 32.,
        }
    }
}

impl Material {
    pub fn textures_of(&self, kind: TextureKind) -> impl Iterator<Item = usize> + '_ {
        self.textures
            .iter()
            .filter(move |tex| tex.kind == kind)
            .map(|tex| tex.texture)
    }
}

impl Mesh {
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        let bounding_box = BoundingBox::from_points(vertices.iter().map(|v| v.position));
        Self {
            name: name.into(),
            vertices,
            indices,
            material: None,
            bounding_box,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

impl Scene {
    pub fn update_bounding_box(&mut self) {
        self.bounding_box = self
            .instances
            .iter()
            .filter_map(|instance| {
                self.meshes
                    .get(instance.mesh)
                    .map(|mesh| mesh.bounding_box.transform(instance.transform))
            })
            .fold(BoundingBox::default(), BoundingBox::union);
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.vertices.len()).sum()
    }

    /// Checks every cross-reference so the renderer can index without
    /// bounds failures.
    pub fn validate(&self) -> Result<()> {
        let incomplete = |msg: String| Err(Error::IncompleteScene(msg));

        if self.meshes.is_empty() {
            return incomplete(String::from("no meshes found"));
        }

        for (i, mesh) in self.meshes.iter().enumerate() {
            if mesh.indices.len() % 3 != 0 {
                return incomplete(format!(
                    "mesh {i} ({}) has {} indices, not a multiple of 3",
                    mesh.name,
                    mesh.indices.len()
                ));
            }
            let vertex_count = mesh.vertices.len();
            if let Some(index) = mesh.indices.iter().find(|&&idx| idx as usize >= vertex_count) {
                return incomplete(format!(
                    "mesh {i} ({}) references vertex {index} of {vertex_count}",
                    mesh.name
                ));
            }
            if let Some(material) = mesh.material.filter(|&m| m >= self.materials.len()) {
                return incomplete(format!("mesh {i} references missing material {material}"));
            }
        }

        for (i, material) in self.materials.iter().enumerate() {
            if let Some(tex) = material
                .textures
                .iter()
                .find(|tex| tex.texture >= self.textures.len())
            {
                return incomplete(format!(
                    "material {i} ({}) references missing texture {}",
                    material.name, tex.texture
                ));
            }
        }

        if let Some(instance) = self
            .instances
            .iter()
            .find(|instance| instance.mesh >= self.meshes.len())
        {
            return incomplete(format!("instance references missing mesh {}", instance.mesh));
        }

        Ok(())
    }
}
