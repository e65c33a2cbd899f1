use shared::{BoundingBox, inputs};

mod conf {
    pub const Z_NEAR: f32 = 1e-1;
    pub const Z_FAR: f32 = 1e+4;
    /// Scene-size units per microsecond.
    pub const MOVE_SPEED: f32 = 5e-7;
    pub const SLOW_FACTOR: f32 = 0.1;
    /// Degrees per pixel of mouse motion.
    pub const SENSITIVITY: f32 = 0.1;
    pub const PITCH_LIMIT: f32 = 89.;
    pub const DEFAULT_YAW: f32 = -90.;
    pub const MIN_FOV: f32 = 1.;
    pub const MAX_FOV: f32 = 45.;
}

/// Free-fly camera driven by yaw and pitch in degrees.
pub struct CameraController {
    position: glam::Vec3,
    yaw: f32,
    pitch: f32,
    fov: f32,
    aspect_ratio: f32,
    scale: f32,
}

pub enum AxisMovement {
    None,
    Forward,
    Backward,
}

impl CameraController {
    pub fn new(
        position: glam::Vec3,
        target: glam::Vec3,
        resolution: (u32, u32),
        fov_deg: f32,
    ) -> Self {
        let direction = target - position;
        let (yaw, pitch) = direction.try_normalize().map_or((conf::DEFAULT_YAW, 0.), |d| {
            (d.z.atan2(d.x).to_degrees(), d.y.asin().to_degrees())
        });

        let mut controller = Self {
            position,
            yaw,
            pitch: pitch.clamp(-conf::PITCH_LIMIT, conf::PITCH_LIMIT),
            fov: fov_deg.clamp(conf::MIN_FOV, conf::MAX_FOV),
            aspect_ratio: 1.,
            scale: direction.length().max(1.),
        };
        controller.set_resolution(resolution);
        controller
    }

    /// Looks down -Z at `bounds` from far enough back for it to fill the
    /// vertical field of view.
    pub fn frame_bounds(bounds: BoundingBox, resolution: (u32, u32), fov_deg: f32) -> Self {
        if bounds.is_empty() {
            return Self::new(glam::vec3(0., 0., 3.), glam::Vec3::ZERO, resolution, fov_deg);
        }
        let center = bounds.center();
        let radius = (bounds.size().length() * 0.5).max(1e-3);
        let half_fov = fov_deg.clamp(conf::MIN_FOV, conf::MAX_FOV).to_radians() * 0.5;
        let distance = radius / half_fov.sin();

        Self::new(center + glam::Vec3::Z * distance, center, resolution, fov_deg)
    }

    pub fn set_resolution(&mut self, (width, height): (u32, u32)) {
        if width > 0 && height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    pub fn move_in_direction(&mut self, axes: &[AxisMovement; 3], slow: bool, delta_us: u128) {
        let final_direction = axes[0].factor() * self.front()
            + axes[1].factor() * self.right_axis()
            + axes[2].factor() * glam::Vec3::Y;

        let slow_factor = if slow { conf::SLOW_FACTOR } else { 1. };

        self.position += (conf::MOVE_SPEED * self.scale * slow_factor * delta_us as f32)
            * final_direction.normalize_or_zero();
    }

    /// Screen-space mouse motion: right turns right, down looks down.
    pub fn pan(&mut self, mouse_delta: glam::Vec2) {
        self.yaw += mouse_delta.x * conf::SENSITIVITY;
        self.pitch = (self.pitch - mouse_delta.y * conf::SENSITIVITY)
            .clamp(-conf::PITCH_LIMIT, conf::PITCH_LIMIT);
    }

    pub fn zoom(&mut self, scroll: f32) {
        self.fov = (self.fov - scroll).clamp(conf::MIN_FOV, conf::MAX_FOV);
    }

    pub fn front(&self) -> glam::Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        glam::vec3(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
    }

    fn right_axis(&self) -> glam::Vec3 {
        self.front().cross(glam::Vec3::Y).normalize_or_zero()
    }

    pub const fn fov(&self) -> f32 {
        self.fov
    }

    pub fn camera(&self) -> inputs::Camera {
        let direction = self.front();
        inputs::Camera {
            view: inputs::Transform::new(glam::Mat4::look_to_rh(
                self.position,
                direction,
                glam::Vec3::Y,
            )),
            proj: inputs::Transform::new(glam::Mat4::perspective_rh_gl(
                self.fov.to_radians(),
                self.aspect_ratio,
                conf::Z_NEAR,
                conf::Z_FAR,
            )),
            position: self.position,
            direction,
        }
    }
}

impl AxisMovement {
    pub const fn new(forward: bool, backward: bool) -> Self {
        match (forward, backward) {
            (true, false) => Self::Forward,
            (false, true) => Self::Backward,
            _ => Self::None,
        }
    }

    pub const fn has_some(&self) -> bool {
        !matches!(self, Self::None)
    }

    const fn factor(&self) -> f32 {
        match self {
            Self::None => 0.,
            Self::Backward => -1.,
            Self::Forward => 1.,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: glam::Vec3, b: glam::Vec3) {
        assert!((a - b).length() < 1e-5, "{a} != {b}");
    }

    fn default_controller() -> CameraController {
        CameraController::new(glam::vec3(0., 0., 3.), glam::Vec3::ZERO, (800, 600), 45.)
    }

    #[test]
    fn looking_at_origin_from_z_matches_default_yaw() {
        let controller = default_controller();
        assert!((controller.yaw - conf::DEFAULT_YAW).abs() < 1e-4);
        assert_close(controller.front(), glam::Vec3::NEG_Z);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut controller = default_controller();
        controller.pan(glam::vec2(0., -10_000.));
        assert_eq!(controller.pitch, conf::PITCH_LIMIT);
        controller.pan(glam::vec2(0., 10_000.));
        assert_eq!(controller.pitch, -conf::PITCH_LIMIT);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut controller = default_controller();
        controller.zoom(100.);
        assert_eq!(controller.fov(), conf::MIN_FOV);
        controller.zoom(-100.);
        assert_eq!(controller.fov(), conf::MAX_FOV);
    }

    #[test]
    fn forward_moves_along_front() {
        let mut controller = default_controller();
        let moves = [
            AxisMovement::new(true, false),
            AxisMovement::None,
            AxisMovement::None,
        ];
        controller.move_in_direction(&moves, false, 1_000_000);

        let expected = 3. - conf::MOVE_SPEED * controller.scale * 1e6;
        assert_close(controller.position, glam::vec3(0., 0., expected));
    }

    #[test]
    fn strafing_right_moves_along_x() {
        let mut controller = default_controller();
        let moves = [
            AxisMovement::None,
            AxisMovement::new(true, false),
            AxisMovement::None,
        ];
        controller.move_in_direction(&moves, true, 1_000_000);
        assert!(controller.position.x > 0.);
        assert!((controller.position.z - 3.).abs() < 1e-5);
    }

    #[test]
    fn framed_bounds_are_centered() {
        let bounds = BoundingBox::new(glam::vec3(-1., 0., -1.), glam::vec3(1., 2., 1.));
        let controller = CameraController::frame_bounds(bounds, (800, 600), 45.);

        let camera = controller.camera();
        let center = camera.view.forward.transform_point3(bounds.center());
        assert!(center.x.abs() < 1e-4 && center.y.abs() < 1e-4);
        assert!(center.z < 0.);
    }

    #[test]
    fn projection_uses_gl_depth_range() {
        let camera = default_controller().camera();
        let near = camera
            .proj
            .forward
            .project_point3(glam::vec3(0., 0., -conf::Z_NEAR));
        assert!((near.z + 1.).abs() < 1e-4);
    }
}
