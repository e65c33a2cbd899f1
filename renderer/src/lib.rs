pub mod backend;
mod error;
pub mod gl;
pub mod mesh;
pub mod model;
pub mod program;
pub mod texture;

#[cfg(test)]
mod recording;

use glsl::Uniform;
use shared::{inputs, lighting::Lighting};

pub use backend::{Backend, PolygonMode};
pub use error::{Error, Result};
pub use gl::GlBackend;

use {model::GpuModel, program::Program};

mod conf {
    pub const CLEAR_COLOR: glam::Vec4 = glam::Vec4::new(0.05, 0.05, 0.05, 1.);

    pub const MODEL_VERTEX_SHADER: &str = include_str!("../shaders/model.vert");
    pub const MODEL_FRAGMENT_SHADER: &str = include_str!("../shaders/model.frag");
}

pub trait Destroy<C: ?Sized> {
    fn destroy_with(&mut self, ctx: &mut C);
}

pub struct Renderer<B: Backend> {
    program: Program<B>,
    model: GpuModel<B>,
    lighting: Lighting,

    // state
    resolution: (u32, u32),
    wireframe: bool,
    destroyed: bool,

    backend: B,
}

impl<B: Backend> Renderer<B> {
    pub fn create(mut backend: B, scene: &scene::Scene, resolution: (u32, u32)) -> Result<Self> {
        firestorm::profile_method!(create);

        backend.set_depth_test(true);
        backend.set_viewport(resolution.0, resolution.1);

        let mut program = Program::create(
            &mut backend,
            conf::MODEL_VERTEX_SHADER,
            conf::MODEL_FRAGMENT_SHADER,
        )?;
        let model = match GpuModel::upload(&mut backend, scene) {
            Ok(model) => model,
            Err(err) => {
                program.destroy_with(&mut backend);
                return Err(err);
            }
        };

        Ok(Self {
            program,
            model,
            lighting: Lighting::default_scene(scene.bounding_box),

            resolution,
            wireframe: false,
            destroyed: false,

            backend,
        })
    }

    pub fn render(&mut self, camera: &inputs::Camera) {
        firestorm::profile_method!(render);

        self.lighting
            .follow_camera(camera.position, camera.direction);
        self.backend.clear(conf::CLEAR_COLOR);

        let mut program = self.program.bind(&mut self.backend);
        camera.view.forward.write_uniform("view", &mut program);
        camera.proj.forward.write_uniform("projection", &mut program);
        camera.position.write_uniform("view_pos", &mut program);
        self.lighting.write_uniform("", &mut program);

        self.model.draw(&mut program);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.resolution = (width, height);
        self.backend.set_viewport(width, height);
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.resolution.0 as f32 / self.resolution.1.max(1) as f32
    }

    pub fn set_wireframe(&mut self, wireframe: bool) {
        self.wireframe = wireframe;
        self.backend.set_polygon_mode(if wireframe {
            PolygonMode::Line
        } else {
            PolygonMode::Fill
        });
    }

    pub const fn wireframe(&self) -> bool {
        self.wireframe
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Deletes every GPU resource. Also runs on drop, so call it
    /// explicitly only when the context may be gone by then.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        firestorm::profile_method!(destroy);

        self.model.destroy_with(&mut self.backend);
        self.program.destroy_with(&mut self.backend);
        self.destroyed = true;
    }
}

impl<B: Backend> Drop for Renderer<B> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<T: Destroy<C>, C: ?Sized> Destroy<C> for Vec<T> {
    fn destroy_with(&mut self, ctx: &mut C) {
        self.iter_mut().for_each(|e| e.destroy_with(ctx));
    }
}

impl<T: Destroy<C> + ?Sized, C: ?Sized> Destroy<C> for Box<T> {
    fn destroy_with(&mut self, ctx: &mut C) {
        (**self).destroy_with(ctx);
    }
}
