//! The graphics-API seam.
//!
//! Everything above this trait (meshes, models, programs, the frame
//! renderer) is written against opaque handles, so it can run on OpenGL
//! through [`GlBackend`](crate::gl::GlBackend) or on a recording backend
//! in tests.

use std::fmt;

use glsl::UniformValue;
use shared::VertexAttribute;

use crate::{
    Result,
    texture::{Sampler, TextureData},
};

pub trait Backend {
    type Buffer: Copy + Eq + fmt::Debug;
    type VertexArray: Copy + Eq + fmt::Debug;
    type Texture: Copy + Eq + fmt::Debug;
    type Program: Copy + Eq + fmt::Debug;

    /// Uploads interleaved vertices and `u32` indices and records the
    /// attribute layout in a new vertex array.
    fn create_mesh_buffers(
        &mut self,
        vertices: &[u8],
        indices: &[u32],
        stride: i32,
        attributes: &[VertexAttribute],
    ) -> Result<MeshBuffers<Self>>;

    fn create_texture(&mut self, data: &TextureData, sampler: &Sampler) -> Result<Self::Texture>;

    fn create_program(&mut self, vertex_src: &str, fragment_src: &str) -> Result<Self::Program>;

    fn use_program(&mut self, program: Self::Program);

    /// Uniforms the linker optimised away are ignored.
    fn set_uniform(&mut self, program: Self::Program, name: &str, value: UniformValue);

    /// Activates texture unit `unit` and binds `texture` to it.
    fn bind_texture(&mut self, unit: u32, texture: Self::Texture);

    fn active_texture(&mut self, unit: u32);

    fn draw_indexed(&mut self, vertex_array: Self::VertexArray, index_count: usize);

    /// Clears colour and depth.
    fn clear(&mut self, color: glam::Vec4);

    fn set_viewport(&mut self, width: u32, height: u32);

    fn set_polygon_mode(&mut self, mode: PolygonMode);

    fn set_depth_test(&mut self, enabled: bool);

    fn delete_buffer(&mut self, buffer: Self::Buffer);
    fn delete_vertex_array(&mut self, vertex_array: Self::VertexArray);
    fn delete_texture(&mut self, texture: Self::Texture);
    fn delete_program(&mut self, program: Self::Program);
}

pub struct MeshBuffers<B: Backend + ?Sized> {
    pub vertex_array: B::VertexArray,
    pub vertex_buffer: B::Buffer,
    pub index_buffer: B::Buffer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolygonMode {
    Fill,
    Line,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        })
    }
}

impl<B: Backend + ?Sized> crate::Destroy<B> for MeshBuffers<B> {
    fn destroy_with(&mut self, backend: &mut B) {
        backend.delete_vertex_array(self.vertex_array);
        backend.delete_buffer(self.vertex_buffer);
        backend.delete_buffer(self.index_buffer);
    }
}
