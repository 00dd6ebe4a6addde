//! Perspective camera and pointer unprojection

use glam::{Mat4, Vec2, Vec3};
use petal_surface::Ray;

/// A perspective camera looking at a target point
#[derive(Clone, Debug)]
pub struct Camera {
    /// Camera position
    pub position: Vec3,
    /// Target point the camera looks at
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(18.0, 18.0, 18.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance from the camera to its target
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Rotate the camera around its target by `yaw` radians about world up
    pub fn orbit_horizontal(&mut self, yaw: f32) {
        let offset = self.position - self.target;
        self.position = self.target + glam::Quat::from_rotation_y(yaw) * offset;
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Projection with wgpu's [0, 1] depth range
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray from the camera through a point in normalized device coordinates
    /// (x right, y up, both in [-1, 1])
    pub fn screen_ray(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection_matrix().inverse();
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(self.position, far - self.position)
    }

    /// Convert a pixel position to normalized device coordinates
    pub fn pixel_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
        Vec2::new(x / width * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_ray_points_at_target() {
        let camera = Camera::new();
        let ray = camera.screen_ray(Vec2::ZERO);
        assert!((ray.direction - camera.forward()).length() < 1e-4);
        assert_eq!(ray.origin, camera.position);
    }

    #[test]
    fn edge_rays_diverge_by_half_fov() {
        let camera = Camera {
            aspect: 1.0,
            ..Camera::new()
        };
        let top = camera.screen_ray(Vec2::new(0.0, 1.0));
        let angle = top.direction.angle_between(camera.forward()).to_degrees();
        assert!((angle - 37.5).abs() < 0.1, "angle = {angle}");
        // Top of the screen tilts toward world up
        assert!(top.direction.y > camera.forward().y);
    }

    #[test]
    fn pixel_mapping() {
        let corner = Camera::pixel_to_ndc(0.0, 0.0, 800.0, 600.0);
        assert_eq!(corner, Vec2::new(-1.0, 1.0));
        let center = Camera::pixel_to_ndc(400.0, 300.0, 800.0, 600.0);
        assert_eq!(center, Vec2::ZERO);
    }

    #[test]
    fn orbit_keeps_distance() {
        let mut camera = Camera::new();
        let before = camera.distance();
        camera.orbit_horizontal(1.0);
        assert!((camera.distance() - before).abs() < 1e-4);
        assert!((camera.position.y - 18.0).abs() < 1e-4);
    }
}
