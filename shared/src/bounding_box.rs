use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct BoundingBox {
    pub min: glam::Vec3,
    pub max: glam::Vec3,
}

impl BoundingBox {
    pub fn new<T: Into<glam::Vec3>>(min: T, max: T) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = glam::Vec3>) -> Self {
        points.into_iter().fold(Self::default(), Self::extend)
    }

    /// Transforms all eight corners, so rotated boxes stay conservative.
    pub fn transform(self, transform: glam::Mat4) -> Self {
        if self.is_empty() {
            return self;
        }
        Self::from_points((0..8).map(|corner| {
            let pick = |bit: u32, lo: f32, hi: f32| if corner & bit == 0 { lo } else { hi };
            transform.transform_point3(glam::vec3(
                pick(1, self.min.x, self.max.x),
                pick(2, self.min.y, self.max.y),
                pick(4, self.min.z, self.max.z),
            ))
        }))
    }

    pub fn union(self, other: Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn extend(self, point: glam::Vec3) -> Self {
        Self::new(self.min.min(point), self.max.max(point))
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn center(&self) -> glam::Vec3 {
        (self.min + self.max) / 2.
    }

    pub fn size(&self) -> glam::Vec3 {
        self.max - self.min
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(glam::Vec3::INFINITY, glam::Vec3::NEG_INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty_and_absorbed_by_union() {
        let empty = BoundingBox::default();
        assert!(empty.is_empty());

        let unit = BoundingBox::new(glam::Vec3::ZERO, glam::Vec3::ONE);
        assert_eq!(empty.union(unit), unit);
    }

    #[test]
    fn rotation_keeps_all_corners_inside() {
        let unit = BoundingBox::new(glam::Vec3::ZERO, glam::Vec3::ONE);
        let rotated = unit.transform(glam::Mat4::from_rotation_y(std::f32::consts::FRAC_PI_4));

        let half_diag = std::f32::consts::SQRT_2 / 2.;
        assert!((rotated.max.x - std::f32::consts::SQRT_2).abs() < 1e-5);
        assert!(rotated.min.x.abs() < 1e-5);
        assert!((rotated.min.z + half_diag).abs() < 1e-5);
        assert!((rotated.size().y - 1.).abs() < 1e-5);
    }

    #[test]
    fn from_points_spans_extremes() {
        let bbox = BoundingBox::from_points([
            glam::vec3(1., -2., 0.),
            glam::vec3(-1., 4., 3.),
        ]);
        assert_eq!(bbox.min, glam::vec3(-1., -2., 0.));
        assert_eq!(bbox.max, glam::vec3(1., 4., 3.));
        assert_eq!(bbox.center(), glam::vec3(0., 1., 1.5));
    }
}
