//! Camera storage and reverse-Z projection.

use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Rotation as a unit quaternion; identity looks down -Z.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: 1.0,
            aspect_ratio: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Places the camera at `eye` looking at `target` with +Y up.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3) {
        self.set_view(Mat4::look_at_rh(eye, target, Vec3::Y));
    }

    /// Adopts an existing world-to-view matrix.
    pub fn set_view(&mut self, view: Mat4) {
        let (_, rotation, translation) = view.inverse().to_scale_rotation_translation();
        self.position = translation;
        self.rotation = rotation.normalize();
    }

    /// Inverse of the camera's world transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// Perspective projection with reverse-Z: near maps to 1.0, far to 0.0.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World position (translation of the camera transform).
    pub fn translation(&self) -> Vec3 {
        self.position
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }

    /// View-space distance for a reverse-Z depth-buffer value.
    pub fn linearize_depth(&self, ndc_depth: f32) -> f32 {
        self.near * self.far / (ndc_depth * (self.far - self.near) + self.near)
    }
}
