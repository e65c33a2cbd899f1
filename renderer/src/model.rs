use glsl::Uniform;
use shared::inputs;

use crate::{
    Destroy, Result,
    backend::Backend,
    mesh::GpuMesh,
    program::BoundProgram,
    texture::{Sampler, TextureData},
};

/// A scene resident on the GPU: one texture per distinct image path, one
/// mesh per scene mesh, drawn once per instance.
pub struct GpuModel<B: Backend> {
    meshes: Vec<GpuMesh<B>>,
    textures: Vec<B::Texture>,
    /// Shared stand-in for every texture that failed to decode.
    placeholder: Option<B::Texture>,
    materials: Vec<scene::Material>,
    instances: Vec<scene::Instance>,
    default_material: scene::Material,
}

impl<B: Backend> GpuModel<B> {
    /// Uploads every texture and mesh of `scene`. On failure, whatever was
    /// already created is deleted before the error is returned.
    pub fn upload(backend: &mut B, scene: &scene::Scene) -> Result<Self> {
        firestorm::profile_method!(upload);

        let mut model = Self {
            meshes: Vec::with_capacity(scene.meshes.len()),
            textures: Vec::with_capacity(scene.textures.len()),
            placeholder: None,
            materials: scene.materials.clone(),
            instances: scene.instances.clone(),
            default_material: scene::Material::default(),
        };
        if let Err(err) = model.upload_resources(backend, scene) {
            model.destroy_with(backend);
            return Err(err);
        }

        log::info!(
            "Uploaded {} meshes and {} textures",
            model.meshes.len(),
            model.textures.len()
        );
        Ok(model)
    }

    fn upload_resources(&mut self, backend: &mut B, scene: &scene::Scene) -> Result<()> {
        let sampler = Sampler::default();
        for texture in &scene.textures {
            let handle = match TextureData::load(&texture.path) {
                Ok(data) => backend.create_texture(&data, &sampler)?,
                Err(err) => {
                    log::warn!("{err}; using a white placeholder");
                    match self.placeholder {
                        Some(handle) => handle,
                        None => {
                            let handle = backend.create_texture(&TextureData::white(), &sampler)?;
                            self.placeholder = Some(handle);
                            handle
                        }
                    }
                }
            };
            self.textures.push(handle);
        }

        for mesh in &scene.meshes {
            self.meshes.push(GpuMesh::upload(backend, mesh)?);
        }
        Ok(())
    }

    pub fn draw(&self, program: &mut BoundProgram<'_, B>) {
        firestorm::profile_method!(draw);

        for instance in &self.instances {
            let Some(mesh) = self.meshes.get(instance.mesh) else {
                continue;
            };
            let transform = inputs::Transform::new(instance.transform);
            transform.forward.write_uniform("model", program);
            transform.normal_matrix().write_uniform("normal_matrix", program);

            let material = mesh
                .material
                .and_then(|index| self.materials.get(index))
                .unwrap_or(&self.default_material);
            mesh.draw(program, material, &self.textures);
        }
    }
}

impl<B: Backend> Destroy<B> for GpuModel<B> {
    fn destroy_with(&mut self, backend: &mut B) {
        self.meshes.destroy_with(backend);
        for &texture in &self.textures {
            if Some(texture) != self.placeholder {
                backend.delete_texture(texture);
            }
        }
        if let Some(placeholder) = self.placeholder {
            backend.delete_texture(placeholder);
        }
    }
}
