use std::collections::HashMap;

use glow::{HasContext, PixelUnpackData};

use glsl::UniformValue;
use shared::VertexAttribute;

use crate::{
    Error, Result,
    backend::{Backend, MeshBuffers, PolygonMode, ShaderStage},
    texture::{Filter, PixelFormat, Sampler, TextureData, Wrap},
};

/// [`Backend`] over an OpenGL 3.3 core context.
pub struct GlBackend {
    gl: glow::Context,
    uniform_locations: HashMap<glow::Program, HashMap<String, Option<glow::UniformLocation>>>,
}

impl GlBackend {
    pub fn new(gl: glow::Context) -> Self {
        log_driver_info(&gl);
        Self {
            gl,
            uniform_locations: HashMap::new(),
        }
    }

    fn uniform_location(
        &mut self,
        program: glow::Program,
        name: &str,
    ) -> Option<glow::UniformLocation> {
        let locations = self.uniform_locations.entry(program).or_default();
        if let Some(location) = locations.get(name) {
            return location.clone();
        }

        let location = unsafe { self.gl.get_uniform_location(program, name) };
        if location.is_none() {
            log::debug!("Uniform {name} is not active in program {program:?}");
        }
        locations.insert(name.to_owned(), location.clone());
        location
    }

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<glow::Shader> {
        let ty = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe {
            let shader = self.gl.create_shader(ty).map_err(Error::Backend)?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if !self.gl.get_shader_compile_status(shader) {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                return Err(Error::ShaderCompile { stage, log });
            }
            Ok(shader)
        }
    }
}

impl Backend for GlBackend {
    type Buffer = glow::Buffer;
    type VertexArray = glow::VertexArray;
    type Texture = glow::Texture;
    type Program = glow::Program;

    fn create_mesh_buffers(
        &mut self,
        vertices: &[u8],
        indices: &[u32],
        stride: i32,
        attributes: &[VertexAttribute],
    ) -> Result<MeshBuffers<Self>> {
        firestorm::profile_method!(create_mesh_buffers);

        let gl = &self.gl;
        unsafe {
            let vertex_array = gl.create_vertex_array().map_err(Error::Backend)?;
            let vertex_buffer = match gl.create_buffer() {
                Ok(buffer) => buffer,
                Err(err) => {
                    gl.delete_vertex_array(vertex_array);
                    return Err(Error::Backend(err));
                }
            };
            let index_buffer = match gl.create_buffer() {
                Ok(buffer) => buffer,
                Err(err) => {
                    gl.delete_buffer(vertex_buffer);
                    gl.delete_vertex_array(vertex_array);
                    return Err(Error::Backend(err));
                }
            };

            gl.bind_vertex_array(Some(vertex_array));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, vertices, glow::STATIC_DRAW);

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index_buffer));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(indices),
                glow::STATIC_DRAW,
            );

            for attribute in attributes {
                gl.enable_vertex_attrib_array(attribute.location);
                gl.vertex_attrib_pointer_f32(
                    attribute.location,
                    attribute.components,
                    glow::FLOAT,
                    false,
                    stride,
                    attribute.offset,
                );
            }

            // the element buffer binding is part of the vertex array state
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(MeshBuffers {
                vertex_array,
                vertex_buffer,
                index_buffer,
            })
        }
    }

    fn create_texture(&mut self, data: &TextureData, sampler: &Sampler) -> Result<Self::Texture> {
        firestorm::profile_method!(create_texture);

        let (internal_format, format) = match data.format {
            PixelFormat::Red => (glow::R8, glow::RED),
            PixelFormat::Rg => (glow::RG8, glow::RG),
            PixelFormat::Rgb => (glow::RGB8, glow::RGB),
            PixelFormat::Rgba => (glow::RGBA8, glow::RGBA),
        };
        let wrap = match sampler.wrap {
            Wrap::Repeat => glow::REPEAT,
            Wrap::MirroredRepeat => glow::MIRRORED_REPEAT,
            Wrap::ClampToEdge => glow::CLAMP_TO_EDGE,
        };
        let min_filter = gl_filter(sampler.min_filter);
        let mag_filter = gl_filter(sampler.mag_filter);

        let gl = &self.gl;
        unsafe {
            let texture = gl.create_texture().map_err(Error::Backend)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));

            // rows of 1- and 3-channel images are not 4-byte aligned
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                internal_format as i32,
                data.width as i32,
                data.height as i32,
                0,
                format,
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(Some(data.pixels.as_slice())),
            );
            if sampler.mipmaps {
                gl.generate_mipmap(glow::TEXTURE_2D);
            }

            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, min_filter as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, mag_filter as i32);

            gl.bind_texture(glow::TEXTURE_2D, None);
            Ok(texture)
        }
    }

    fn create_program(&mut self, vertex_src: &str, fragment_src: &str) -> Result<Self::Program> {
        firestorm::profile_method!(create_program);

        let vertex = self.compile_shader(ShaderStage::Vertex, vertex_src)?;
        let fragment = match self.compile_shader(ShaderStage::Fragment, fragment_src) {
            Ok(fragment) => fragment,
            Err(err) => {
                unsafe { self.gl.delete_shader(vertex) };
                return Err(err);
            }
        };

        let gl = &self.gl;
        unsafe {
            let program = gl.create_program().map_err(Error::Backend)?;
            gl.attach_shader(program, vertex);
            gl.attach_shader(program, fragment);
            gl.link_program(program);

            let linked = gl.get_program_link_status(program);
            let log = (!linked).then(|| gl.get_program_info_log(program));

            gl.detach_shader(program, vertex);
            gl.detach_shader(program, fragment);
            gl.delete_shader(vertex);
            gl.delete_shader(fragment);

            if let Some(log) = log {
                gl.delete_program(program);
                return Err(Error::ProgramLink(log));
            }
            Ok(program)
        }
    }

    fn use_program(&mut self, program: Self::Program) {
        unsafe { self.gl.use_program(Some(program)) };
    }

    fn set_uniform(&mut self, program: Self::Program, name: &str, value: UniformValue) {
        let Some(location) = self.uniform_location(program, name) else {
            return;
        };
        let location = Some(&location);

        let gl = &self.gl;
        unsafe {
            match value {
                UniformValue::Int(v) => gl.uniform_1_i32(location, v),
                UniformValue::Float(v) => gl.uniform_1_f32(location, v),
                UniformValue::Vec2(v) => gl.uniform_2_f32(location, v.x, v.y),
                UniformValue::Vec3(v) => gl.uniform_3_f32(location, v.x, v.y, v.z),
                UniformValue::Vec4(v) => gl.uniform_4_f32(location, v.x, v.y, v.z, v.w),
                UniformValue::Mat3(m) => {
                    gl.uniform_matrix_3_f32_slice(location, false, &m.to_cols_array());
                }
                UniformValue::Mat4(m) => {
                    gl.uniform_matrix_4_f32_slice(location, false, &m.to_cols_array());
                }
            }
        }
    }

    fn bind_texture(&mut self, unit: u32, texture: Self::Texture) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        }
    }

    fn active_texture(&mut self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) };
    }

    fn draw_indexed(&mut self, vertex_array: Self::VertexArray, index_count: usize) {
        unsafe {
            self.gl.bind_vertex_array(Some(vertex_array));
            self.gl
                .draw_elements(glow::TRIANGLES, index_count as i32, glow::UNSIGNED_INT, 0);
            self.gl.bind_vertex_array(None);
        }
    }

    fn clear(&mut self, color: glam::Vec4) {
        unsafe {
            self.gl.clear_color(color.x, color.y, color.z, color.w);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        unsafe { self.gl.viewport(0, 0, width as i32, height as i32) };
    }

    fn set_polygon_mode(&mut self, mode: PolygonMode) {
        let mode = match mode {
            PolygonMode::Fill => glow::FILL,
            PolygonMode::Line => glow::LINE,
        };
        unsafe { self.gl.polygon_mode(glow::FRONT_AND_BACK, mode) };
    }

    fn set_depth_test(&mut self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::DEPTH_TEST);
            } else {
                self.gl.disable(glow::DEPTH_TEST);
            }
        }
    }

    fn delete_buffer(&mut self, buffer: Self::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) };
    }

    fn delete_vertex_array(&mut self, vertex_array: Self::VertexArray) {
        unsafe { self.gl.delete_vertex_array(vertex_array) };
    }

    fn delete_texture(&mut self, texture: Self::Texture) {
        unsafe { self.gl.delete_texture(texture) };
    }

    fn delete_program(&mut self, program: Self::Program) {
        self.uniform_locations.remove(&program);
        unsafe { self.gl.delete_program(program) };
    }
}

const fn gl_filter(filter: Filter) -> u32 {
    match filter {
        Filter::Nearest => glow::NEAREST,
        Filter::Linear => glow::LINEAR,
        Filter::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
    }
}

fn log_driver_info(gl: &glow::Context) {
    let (vendor, renderer, version, glsl) = unsafe {
        (
            gl.get_parameter_string(glow::VENDOR),
            gl.get_parameter_string(glow::RENDERER),
            gl.get_parameter_string(glow::VERSION),
            gl.get_parameter_string(glow::SHADING_LANGUAGE_VERSION),
        )
    };
    log::info!("OpenGL {version} on {renderer} ({vendor}), GLSL {glsl}");
}
