//! A [`Backend`] that records every call instead of talking to a GPU.

use glsl::UniformValue;
use shared::VertexAttribute;

use crate::{
    Error, Result,
    backend::{Backend, MeshBuffers, PolygonMode, ShaderStage},
    texture::{PixelFormat, Sampler, TextureData},
};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    CreateMeshBuffers {
        vertex_bytes: usize,
        index_count: usize,
        stride: i32,
        attributes: usize,
    },
    CreateTexture {
        handle: u32,
        width: u32,
        height: u32,
        format: PixelFormat,
    },
    CreateProgram(u32),
    UseProgram(u32),
    SetUniform {
        program: u32,
        name: String,
        value: UniformValue,
    },
    BindTexture {
        unit: u32,
        texture: u32,
    },
    ActiveTexture(u32),
    DrawIndexed {
        vertex_array: u32,
        index_count: usize,
    },
    Clear(glam::Vec4),
    Viewport(u32, u32),
    PolygonMode(PolygonMode),
    DepthTest(bool),
    DeleteBuffer(u32),
    DeleteVertexArray(u32),
    DeleteTexture(u32),
    DeleteProgram(u32),
}

#[derive(Default)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    /// Vertex and fragment sources of every program created.
    pub sources: Vec<(String, String)>,
    fail_compile: bool,
    fail_meshes: bool,
    next_handle: u32,
}

impl RecordingBackend {
    /// Every program fails to compile.
    pub fn failing_compile() -> Self {
        Self {
            fail_compile: true,
            ..Default::default()
        }
    }

    /// Every mesh upload fails, as when the driver runs out of memory.
    pub fn failing_meshes() -> Self {
        Self {
            fail_meshes: true,
            ..Default::default()
        }
    }

    fn next(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    pub fn uniforms(&self) -> impl Iterator<Item = (&str, UniformValue)> {
        self.calls.iter().filter_map(|call| match call {
            Call::SetUniform { name, value, .. } => Some((name.as_str(), *value)),
            _ => None,
        })
    }

    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.calls.iter().rev().find_map(|call| match call {
            Call::SetUniform { name: n, value, .. } if n == name => Some(*value),
            _ => None,
        })
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(call)).count()
    }
}

impl Backend for RecordingBackend {
    type Buffer = u32;
    type VertexArray = u32;
    type Texture = u32;
    type Program = u32;

    fn create_mesh_buffers(
        &mut self,
        vertices: &[u8],
        indices: &[u32],
        stride: i32,
        attributes: &[VertexAttribute],
    ) -> Result<MeshBuffers<Self>> {
        if self.fail_meshes {
            return Err(Error::Backend(String::from("out of memory")));
        }
        self.calls.push(Call::CreateMeshBuffers {
            vertex_bytes: vertices.len(),
            index_count: indices.len(),
            stride,
            attributes: attributes.len(),
        });
        Ok(MeshBuffers {
            vertex_array: self.next(),
            vertex_buffer: self.next(),
            index_buffer: self.next(),
        })
    }

    fn create_texture(&mut self, data: &TextureData, _sampler: &Sampler) -> Result<Self::Texture> {
        let handle = self.next();
        self.calls.push(Call::CreateTexture {
            handle,
            width: data.width,
            height: data.height,
            format: data.format,
        });
        Ok(handle)
    }

    fn create_program(&mut self, vertex_src: &str, fragment_src: &str) -> Result<Self::Program> {
        if self.fail_compile {
            return Err(Error::ShaderCompile {
                stage: ShaderStage::Vertex,
                log: String::from("0:1(1): error: syntax error"),
            });
        }
        self.sources
            .push((vertex_src.to_owned(), fragment_src.to_owned()));
        let handle = self.next();
        self.calls.push(Call::CreateProgram(handle));
        Ok(handle)
    }

    fn use_program(&mut self, program: Self::Program) {
        self.calls.push(Call::UseProgram(program));
    }

    fn set_uniform(&mut self, program: Self::Program, name: &str, value: UniformValue) {
        self.calls.push(Call::SetUniform {
            program,
            name: name.to_owned(),
            value,
        });
    }

    fn bind_texture(&mut self, unit: u32, texture: Self::Texture) {
        self.calls.push(Call::BindTexture { unit, texture });
    }

    fn active_texture(&mut self, unit: u32) {
        self.calls.push(Call::ActiveTexture(unit));
    }

    fn draw_indexed(&mut self, vertex_array: Self::VertexArray, index_count: usize) {
        self.calls.push(Call::DrawIndexed {
            vertex_array,
            index_count,
        });
    }

    fn clear(&mut self, color: glam::Vec4) {
        self.calls.push(Call::Clear(color));
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.calls.push(Call::Viewport(width, height));
    }

    fn set_polygon_mode(&mut self, mode: PolygonMode) {
        self.calls.push(Call::PolygonMode(mode));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.calls.push(Call::DepthTest(enabled));
    }

    fn delete_buffer(&mut self, buffer: Self::Buffer) {
        self.calls.push(Call::DeleteBuffer(buffer));
    }

    fn delete_vertex_array(&mut self, vertex_array: Self::VertexArray) {
        self.calls.push(Call::DeleteVertexArray(vertex_array));
    }

    fn delete_texture(&mut self, texture: Self::Texture) {
        self.calls.push(Call::DeleteTexture(texture));
    }

    fn delete_program(&mut self, program: Self::Program) {
        self.calls.push(Call::DeleteProgram(program));
    }
}
