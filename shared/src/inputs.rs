#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Camera {
    pub view: Transform,
    pub proj: Transform,
    pub position: glam::Vec3,
    pub direction: glam::Vec3,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Transform {
    pub forward: glam::Mat4,
    pub inverse: glam::Mat4,
}

impl Transform {
    pub fn new(mat: glam::Mat4) -> Self {
        Self {
            forward: mat,
            inverse: mat.inverse(),
        }
    }

    /// Inverse-transpose of the upper 3x3, for transforming normals.
    pub fn normal_matrix(&self) -> glam::Mat3 {
        glam::Mat3::from_mat4(self.inverse).transpose()
    }
}

impl From<glam::Mat4> for Transform {
    fn from(mat: glam::Mat4) -> Self {
        Self::new(mat)
    }
}
