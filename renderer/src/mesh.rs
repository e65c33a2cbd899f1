use std::collections::HashMap;

use glsl::{Uniform, UniformSink, UniformValue};
use scene::TextureKind;
use shared::{Vertex, lighting};

use crate::{
    Destroy, Result,
    backend::{Backend, MeshBuffers},
    program::BoundProgram,
};

pub struct GpuMesh<B: Backend> {
    buffers: MeshBuffers<B>,
    index_count: usize,
    pub material: Option<usize>,
}

impl<B: Backend> GpuMesh<B> {
    pub fn upload(backend: &mut B, mesh: &scene::Mesh) -> Result<Self> {
        firestorm::profile_method!(upload);

        let buffers = backend.create_mesh_buffers(
            bytemuck::cast_slice(&mesh.vertices),
            &mesh.indices,
            Vertex::STRIDE,
            &Vertex::ATTRIBUTES,
        )?;

        log::debug!(
            "Uploaded mesh {}: {} vertices, {} indices",
            mesh.name,
            mesh.vertices.len(),
            mesh.indices.len()
        );
        Ok(Self {
            buffers,
            index_count: mesh.indices.len(),
            material: mesh.material,
        })
    }

    pub const fn index_count(&self) -> usize {
        self.index_count
    }

    /// Binds the material's textures to consecutive units, naming the
    /// samplers `texture_diffuse1`, `texture_diffuse2`, `texture_specular1`
    /// and so on, then draws.
    pub fn draw(
        &self,
        program: &mut BoundProgram<'_, B>,
        material: &scene::Material,
        textures: &[B::Texture],
    ) {
        let mut counters = HashMap::<TextureKind, i32>::new();
        let bound = material
            .textures
            .iter()
            .filter_map(|binding| Some((binding.kind, *textures.get(binding.texture)?)));
        for (unit, (kind, texture)) in bound.enumerate() {
            let count = counters.entry(kind).or_default();
            *count += 1;

            let unit = unit as u32;
            program.backend().bind_texture(unit, texture);
            program.set_uniform(
                &format!("{}{count}", kind.uniform_name()),
                UniformValue::Int(unit as i32),
            );
        }
        program.backend().active_texture(0);

        let maps = |kind| counters.get(&kind).copied().unwrap_or_default();
        lighting::Material {
            diffuse_color: material.diffuse_color,
            specular_color: material.specular_color,
            shininess: material.shininess,
            diffuse_maps: maps(TextureKind::Diffuse),
            specular_maps: maps(TextureKind::Specular),
        }
        .write_uniform("material", program);

        program
            .backend()
            .draw_indexed(self.buffers.vertex_array, self.index_count);
    }
}

impl<B: Backend> Destroy<B> for GpuMesh<B> {
    fn destroy_with(&mut self, backend: &mut B) {
        self.buffers.destroy_with(backend);
    }
}

#[cfg(test)]
mod tests {
    use scene::MaterialTexture;

    use super::*;
    use crate::{
        program::Program,
        recording::{Call, RecordingBackend},
    };

    fn quad() -> scene::Mesh {
        let vertices = [[0., 0.], [1., 0.], [1., 1.], [0., 1.]]
            .into_iter()
            .map(|[x, y]| Vertex::new(&[x, y, 0.], &[0., 0., 1.], &[x, y]))
            .collect();
        scene::Mesh::new("quad", vertices, vec![0, 1, 2, 2, 3, 0])
    }

    fn texture(kind: TextureKind, texture: usize) -> MaterialTexture {
        MaterialTexture { kind, texture }
    }

    #[test]
    fn upload_uses_vertex_layout() {
        let mut backend = RecordingBackend::default();
        let mesh = GpuMesh::upload(&mut backend, &quad()).unwrap();

        assert_eq!(mesh.index_count(), 6);
        assert_eq!(
            backend.calls,
            [Call::CreateMeshBuffers {
                vertex_bytes: 4 * 56,
                index_count: 6,
                stride: 56,
                attributes: 5,
            }]
        );
    }

    #[test]
    fn samplers_are_numbered_per_kind() {
        let mut backend = RecordingBackend::default();
        let mesh = GpuMesh::upload(&mut backend, &quad()).unwrap();
        let program = Program::create(&mut backend, "", "").unwrap();
        backend.calls.clear();

        let material = scene::Material {
            textures: vec![
                texture(TextureKind::Diffuse, 0),
                texture(TextureKind::Specular, 1),
                texture(TextureKind::Diffuse, 2),
            ],
            shininess: 64.,
            ..Default::default()
        };
        mesh.draw(&mut program.bind(&mut backend), &material, &[10, 11, 12]);

        let binds = backend
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::BindTexture { unit, texture } => Some((*unit, *texture)),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(binds, [(0, 10), (1, 11), (2, 12)]);

        assert_eq!(backend.uniform("texture_diffuse1"), Some(UniformValue::Int(0)));
        assert_eq!(backend.uniform("texture_specular1"), Some(UniformValue::Int(1)));
        assert_eq!(backend.uniform("texture_diffuse2"), Some(UniformValue::Int(2)));
        assert_eq!(backend.uniform("material.diffuse_maps"), Some(UniformValue::Int(2)));
        assert_eq!(backend.uniform("material.specular_maps"), Some(UniformValue::Int(1)));
        assert_eq!(backend.uniform("material.shininess"), Some(UniformValue::Float(64.)));
    }

    #[test]
    fn dangling_bindings_leave_no_unit_gaps() {
        let mut backend = RecordingBackend::default();
        let mesh = GpuMesh::upload(&mut backend, &quad()).unwrap();
        let program = Program::create(&mut backend, "", "").unwrap();
        backend.calls.clear();

        let material = scene::Material {
            textures: vec![
                texture(TextureKind::Diffuse, 5),
                texture(TextureKind::Specular, 0),
            ],
            ..Default::default()
        };
        mesh.draw(&mut program.bind(&mut backend), &material, &[10]);

        assert_eq!(
            backend.count(|call| *call == Call::BindTexture { unit: 0, texture: 10 }),
            1
        );
        assert_eq!(backend.uniform("texture_specular1"), Some(UniformValue::Int(0)));
        assert_eq!(backend.uniform("texture_diffuse1"), None);
        assert_eq!(backend.uniform("material.diffuse_maps"), Some(UniformValue::Int(0)));
    }

    #[test]
    fn unit_zero_is_reactivated_before_drawing() {
        let mut backend = RecordingBackend::default();
        let mesh = GpuMesh::upload(&mut backend, &quad()).unwrap();
        let program = Program::create(&mut backend, "", "").unwrap();
        backend.calls.clear();

        let material = scene::Material {
            textures: vec![texture(TextureKind::Diffuse, 0)],
            ..Default::default()
        };
        mesh.draw(&mut program.bind(&mut backend), &material, &[7]);

        let active = backend
            .calls
            .iter()
            .position(|call| *call == Call::ActiveTexture(0))
            .unwrap();
        let bind = backend
            .calls
            .iter()
            .position(|call| matches!(call, Call::BindTexture { .. }))
            .unwrap();
        assert!(bind < active);
        assert!(matches!(
            backend.calls.last(),
            Some(Call::DrawIndexed { index_count: 6, .. })
        ));
    }

    #[test]
    fn untextured_material_uses_colors() {
        let mut backend = RecordingBackend::default();
        let mesh = GpuMesh::upload(&mut backend, &quad()).unwrap();
        let program = Program::create(&mut backend, "", "").unwrap();

        let material = scene::Material {
            diffuse_color: glam::vec3(1., 0., 0.),
            ..Default::default()
        };
        mesh.draw(&mut program.bind(&mut backend), &material, &[]);

        assert_eq!(backend.count(|call| matches!(call, Call::BindTexture { .. })), 0);
        assert_eq!(backend.uniform("material.diffuse_maps"), Some(UniformValue::Int(0)));
        assert_eq!(
            backend.uniform("material.diffuse_color"),
            Some(UniformValue::Vec3(glam::vec3(1., 0., 0.)))
        );
    }
}
