//! Phong light sources and surface parameters.
//!
//! Every type here derives [`GlslStruct`], so the renderer can emit the
//! matching GLSL struct definitions and upload values field by field.

use glsl::{GlslStruct, Uniform, UniformSink, UniformValue};

use crate::BoundingBox;

pub const MAX_POINT_LIGHTS: usize = 4;

/// Distance falloff `1 / (constant + linear * d + quadratic * d^2)`.
#[derive(Copy, Clone, Debug, PartialEq, GlslStruct)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

#[derive(Copy, Clone, Debug, PartialEq, GlslStruct)]
pub struct DirLight {
    pub direction: glam::Vec3,
    pub ambient: glam::Vec3,
    pub diffuse: glam::Vec3,
    pub specular: glam::Vec3,
}

#[derive(Copy, Clone, Debug, PartialEq, GlslStruct)]
pub struct PointLight {
    pub position: glam::Vec3,
    pub attenuation: Attenuation,
    pub ambient: glam::Vec3,
    pub diffuse: glam::Vec3,
    pub specular: glam::Vec3,
}

/// Cone light; `cut_off` and `outer_cut_off` hold cosines of the half-angles.
#[derive(Copy, Clone, Debug, PartialEq, GlslStruct)]
pub struct SpotLight {
    pub position: glam::Vec3,
    pub direction: glam::Vec3,
    pub cut_off: f32,
    pub outer_cut_off: f32,
    pub attenuation: Attenuation,
    pub ambient: glam::Vec3,
    pub diffuse: glam::Vec3,
    pub specular: glam::Vec3,
}

#[derive(Copy, Clone, Debug, PartialEq, GlslStruct)]
pub struct Material {
    pub diffuse_color: glam::Vec3,
    pub specular_color: glam::Vec3,
    pub shininess: f32,
    pub diffuse_maps: i32,
    pub specular_maps: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Lighting {
    pub dir_light: DirLight,
    pub point_lights: Vec<PointLight>,
    pub spot_light: SpotLight,
}

// (range, linear, quadratic); constant is always 1
const ATTENUATION_TABLE: [(f32, f32, f32); 12] = [
    (7., 0.7, 1.8),
    (13., 0.35, 0.44),
    (20., 0.22, 0.20),
    (32., 0.14, 0.07),
    (50., 0.09, 0.032),
    (65., 0.07, 0.017),
    (100., 0.045, 0.0075),
    (160., 0.027, 0.0028),
    (200., 0.022, 0.0019),
    (325., 0.014, 0.0007),
    (600., 0.007, 0.0002),
    (3250., 0.0014, 0.000_007),
];

impl Attenuation {
    pub fn for_range(range: f32) -> Self {
        let (_, linear, quadratic) = ATTENUATION_TABLE
            .iter()
            .copied()
            .find(|(max_range, ..)| range <= *max_range)
            .unwrap_or(ATTENUATION_TABLE[ATTENUATION_TABLE.len() - 1]);
        Self {
            constant: 1.,
            linear,
            quadratic,
        }
    }

    pub fn factor(&self, distance: f32) -> f32 {
        1. / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

impl SpotLight {
    /// Soft-edge factor for a fragment whose direction to the light makes
    /// an angle with cosine `theta` against the spot direction.
    pub fn intensity(&self, theta: f32) -> f32 {
        let epsilon = self.cut_off - self.outer_cut_off;
        ((theta - self.outer_cut_off) / epsilon).clamp(0., 1.)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse_color: glam::Vec3::splat(0.8),
            specular_color: glam::Vec3::splat(0.5),
            shininess: 32.,
            diffuse_maps: 0,
            specular_maps: 0,
        }
    }
}

impl Lighting {
    /// One sun, point lights hovering over the corners of `bounds`, and a
    /// flashlight that follows the camera.
    pub fn default_scene(bounds: BoundingBox) -> Self {
        let bounds = if bounds.is_empty() {
            BoundingBox::new(glam::Vec3::splat(-1.), glam::Vec3::splat(1.))
        } else {
            bounds
        };
        let center = bounds.center();
        let half = bounds.size() * 0.75;
        let reach = bounds.size().length().max(1.);

        let point_lights = [(1., 1.), (-1., 1.), (-1., -1.), (1., -1.)]
            .into_iter()
            .take(MAX_POINT_LIGHTS)
            .map(|(x, z)| PointLight {
                position: center + half * glam::vec3(x, 0.5, z),
                attenuation: Attenuation::for_range(reach * 1.5),
                ambient: glam::Vec3::splat(0.05),
                diffuse: glam::Vec3::splat(0.8),
                specular: glam::Vec3::ONE,
            })
            .collect();

        Self {
            dir_light: DirLight {
                direction: glam::vec3(-0.2, -1., -0.3),
                ambient: glam::Vec3::splat(0.05),
                diffuse: glam::Vec3::splat(0.4),
                specular: glam::Vec3::splat(0.5),
            },
            point_lights,
            spot_light: SpotLight {
                position: center,
                direction: glam::Vec3::NEG_Z,
                cut_off: 12.5_f32.to_radians().cos(),
                outer_cut_off: 15_f32.to_radians().cos(),
                attenuation: Attenuation::for_range(reach * 2.),
                ambient: glam::Vec3::ZERO,
                diffuse: glam::Vec3::ONE,
                specular: glam::Vec3::ONE,
            },
        }
    }

    pub fn follow_camera(&mut self, position: glam::Vec3, direction: glam::Vec3) {
        self.spot_light.position = position;
        self.spot_light.direction = direction;
    }

    /// Struct definitions in declaration order, for prepending to shaders.
    pub fn glsl_definitions() -> String {
        [
            Attenuation::glsl_struct_definition(),
            DirLight::glsl_struct_definition(),
            PointLight::glsl_struct_definition(),
            SpotLight::glsl_struct_definition(),
            Material::glsl_struct_definition(),
        ]
        .join("\n")
    }
}

impl Uniform for Lighting {
    /// Writes `dir_light`, `point_lights[i]`, `point_light_count` and
    /// `spot_light`. `name` is unused since the lights live at the top level.
    fn write_uniform(&self, _name: &str, sink: &mut impl UniformSink) {
        let point_lights = &self.point_lights[..self.point_lights.len().min(MAX_POINT_LIGHTS)];

        self.dir_light.write_uniform("dir_light", sink);
        point_lights.write_uniform("point_lights", sink);
        sink.set_uniform(
            "point_light_count",
            UniformValue::Int(point_lights.len() as i32),
        );
        self.spot_light.write_uniform("spot_light", sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attenuation_picks_first_covering_range() {
        let att = Attenuation::for_range(45.);
        assert_eq!((att.constant, att.linear, att.quadratic), (1., 0.09, 0.032));

        let exact = Attenuation::for_range(7.);
        assert_eq!(exact.linear, 0.7);

        let beyond = Attenuation::for_range(1e6);
        assert_eq!(beyond.quadratic, 0.000_007);
    }

    #[test]
    fn attenuation_factor_is_one_at_origin_and_falls_off() {
        let att = Attenuation::for_range(50.);
        assert!((att.factor(0.) - 1.).abs() < f32::EPSILON);
        assert!(att.factor(10.) < att.factor(5.));
        assert!((att.factor(10.) - 1. / (1. + 0.9 + 3.2)).abs() < 1e-6);
    }

    #[test]
    fn spot_intensity_is_smooth_between_cones() {
        let lighting = Lighting::default_scene(BoundingBox::default());
        let spot = lighting.spot_light;

        assert_eq!(spot.intensity(1.), 1.);
        assert_eq!(spot.intensity(0.), 0.);

        let mid = (spot.cut_off + spot.outer_cut_off) / 2.;
        assert!((spot.intensity(mid) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn default_scene_places_lights_around_bounds() {
        let bounds = BoundingBox::new(glam::Vec3::ZERO, glam::vec3(2., 2., 2.));
        let lighting = Lighting::default_scene(bounds);

        assert_eq!(lighting.point_lights.len(), MAX_POINT_LIGHTS);
        for light in &lighting.point_lights {
            assert!((light.position.y - 1.75).abs() < 1e-6);
            assert!(light.position.x != 1. && light.position.z != 1.);
        }
        assert_eq!(lighting.spot_light.position, bounds.center());
    }

    #[test]
    fn uniforms_cover_every_light() {
        let lighting = Lighting::default_scene(BoundingBox::default());
        let mut sink = Vec::new();
        lighting.write_uniform("", &mut sink);

        let names = sink.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>();
        assert!(names.contains(&"dir_light.direction"));
        assert!(names.contains(&"point_lights[3].attenuation.quadratic"));
        assert!(names.contains(&"spot_light.outer_cut_off"));
        assert!(sink.contains(&("point_light_count".to_owned(), UniformValue::Int(4))));
    }

    #[test]
    fn definitions_declare_nested_types_first() {
        let defs = Lighting::glsl_definitions();
        let attenuation = defs.find("struct Attenuation").unwrap();
        let point = defs.find("struct PointLight").unwrap();
        assert!(attenuation < point);
        assert!(defs.contains("  Attenuation attenuation;\n"));
    }
}
