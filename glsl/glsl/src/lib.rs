pub use glsl_derive::GlslStruct;

pub trait Glsl {
    const NAME: &'static str;
}

pub struct GlslField {
    pub name: &'static str,
    pub ty: &'static str,
}

/// A single value that can be assigned to a GLSL uniform location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(glam::Vec2),
    Vec3(glam::Vec3),
    Vec4(glam::Vec4),
    Mat3(glam::Mat3),
    Mat4(glam::Mat4),
}

pub trait UniformSink {
    fn set_uniform(&mut self, name: &str, value: UniformValue);
}

/// Writes `self` into one or more uniforms rooted at `name`.
///
/// Scalars and vectors write exactly one uniform. Structs deriving
/// [`GlslStruct`] write one uniform per field, addressed as `name.field`.
pub trait Uniform {
    fn write_uniform(&self, name: &str, sink: &mut impl UniformSink);
}

pub trait GlslStruct: Glsl + Uniform {
    const FIELDS: &'static [GlslField];

    fn glsl_struct_definition() -> String {
        let mut def = String::from("struct ");
        def.push_str(Self::NAME);
        def.push_str(" {\n");
        for field in Self::FIELDS {
            def.push_str("  ");
            def.push_str(field.ty);
            def.push(' ');
            def.push_str(field.name);
            def.push_str(";\n");
        }
        def.push_str("};\n");
        def
    }
}

macro_rules! impl_glsl {
    ($type:ty => $name:expr, $variant:ident) => {
        impl Glsl for $type {
            const NAME: &'static str = $name;
        }

        impl Uniform for $type {
            fn write_uniform(&self, name: &str, sink: &mut impl UniformSink) {
                sink.set_uniform(name, UniformValue::$variant(*self));
            }
        }
    };
}

impl_glsl!(f32 => "float", Float);
impl_glsl!(i32 => "int", Int);

impl_glsl!(glam::Vec2 => "vec2", Vec2);
impl_glsl!(glam::Vec3 => "vec3", Vec3);
impl_glsl!(glam::Vec4 => "vec4", Vec4);

impl_glsl!(glam::Mat3 => "mat3", Mat3);
impl_glsl!(glam::Mat4 => "mat4", Mat4);

impl<T: Uniform> Uniform for [T] {
    fn write_uniform(&self, name: &str, sink: &mut impl UniformSink) {
        for (i, elem) in self.iter().enumerate() {
            elem.write_uniform(&format!("{name}[{i}]"), sink);
        }
    }
}

impl<T: Uniform + ?Sized> Uniform for &T {
    fn write_uniform(&self, name: &str, sink: &mut impl UniformSink) {
        (**self).write_uniform(name, sink);
    }
}

impl UniformSink for Vec<(String, UniformValue)> {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.push((name.to_owned(), value));
    }
}
