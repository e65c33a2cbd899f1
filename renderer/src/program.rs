use glsl::{UniformSink, UniformValue};
use shared::lighting::Lighting;

use crate::{Destroy, Result, backend::Backend};

pub struct Program<B: Backend> {
    handle: B::Program,
}

/// A program made current on a backend. Uniforms written through it land
/// in that program.
pub struct BoundProgram<'a, B: Backend> {
    backend: &'a mut B,
    program: B::Program,
}

impl<B: Backend> Program<B> {
    /// Compiles both stages with the lighting struct definitions inserted
    /// after each `#version` line.
    pub fn create(backend: &mut B, vertex_src: &str, fragment_src: &str) -> Result<Self> {
        let definitions = Lighting::glsl_definitions();
        let handle = backend.create_program(
            &with_definitions(vertex_src, &definitions),
            &with_definitions(fragment_src, &definitions),
        )?;
        Ok(Self { handle })
    }

    pub fn bind<'a>(&self, backend: &'a mut B) -> BoundProgram<'a, B> {
        backend.use_program(self.handle);
        BoundProgram {
            backend,
            program: self.handle,
        }
    }
}

impl<B: Backend> BoundProgram<'_, B> {
    pub fn backend(&mut self) -> &mut B {
        self.backend
    }
}

impl<B: Backend> UniformSink for BoundProgram<'_, B> {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.backend.set_uniform(self.program, name, value);
    }
}

impl<B: Backend> Destroy<B> for Program<B> {
    fn destroy_with(&mut self, backend: &mut B) {
        backend.delete_program(self.handle);
    }
}

fn with_definitions(source: &str, definitions: &str) -> String {
    match source.split_once('\n') {
        Some((version, body)) if version.trim_start().starts_with("#version") => {
            format!("{version}\n{definitions}\n{body}")
        }
        _ => format!("{definitions}\n{source}"),
    }
}
