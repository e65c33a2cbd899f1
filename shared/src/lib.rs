pub mod bounding_box;
pub mod inputs;
pub mod lighting;

use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

pub use bounding_box::BoundingBox;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize, Serialize, Pod, Zeroable)]
pub struct Vertex {
    pub position: glam::Vec3,
    pub normal: glam::Vec3,
    pub tex_coords: glam::Vec2,
    pub tangent: glam::Vec3,
    pub bitangent: glam::Vec3,
}

/// Float vertex attribute as bound to a shader input location.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: i32,
    pub offset: i32,
}

impl Vertex {
    pub const STRIDE: i32 = size_of::<Self>() as i32;

    pub const ATTRIBUTES: [VertexAttribute; 5] = [
        VertexAttribute::new(0, 3, offset_of!(Self, position)),
        VertexAttribute::new(1, 3, offset_of!(Self, normal)),
        VertexAttribute::new(2, 2, offset_of!(Self, tex_coords)),
        VertexAttribute::new(3, 3, offset_of!(Self, tangent)),
        VertexAttribute::new(4, 3, offset_of!(Self, bitangent)),
    ];

    pub fn new(position: &[f32], normal: &[f32], tex_coords: &[f32]) -> Self {
        Self {
            position: glam::Vec3::from_slice(position),
            normal: glam::Vec3::from_slice(normal),
            tex_coords: glam::Vec2::from_slice(tex_coords),
            ..Default::default()
        }
    }
}

type RawData = (([f32; 3], [f32; 3]), [f32; 2]); // ((position, normal), tex_coord)
impl From<RawData> for Vertex {
    fn from(((position, normal), tex_coords): RawData) -> Self {
        Self::new(&position, &normal, &tex_coords)
    }
}

impl VertexAttribute {
    const fn new(location: u32, components: i32, offset: usize) -> Self {
        Self {
            location,
            components,
            offset: offset as i32,
        }
    }
}
