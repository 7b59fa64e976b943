//! Perspective camera for point-cloud viewing.
//!
//! Produces the combined view-projection matrix carried in
//! [`FrameUniforms`](crate::vertex::FrameUniforms). The camera is plain
//! data: the desktop crate mutates it from input each frame and rebuilds
//! the uniforms, so nothing here holds per-frame GPU state.

use glam::{Mat4, Vec3};

use crate::vertex::FrameUniforms;

/// A right-handed perspective camera.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fovy: f32,
    /// Viewport width / height.
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(eye: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            fovy: std::f32::consts::FRAC_PI_4,
            aspect,
            znear: 0.01,
            zfar: 1000.0,
        }
    }

    /// Position the camera to frame a cloud with the given centroid and
    /// mean radius: looking at the centroid from far enough back that
    /// the bulk of the points fit in view.
    pub fn framing(centroid: [f32; 3], mean_radius: f32, aspect: f32) -> Self {
        let target = Vec3::from(centroid);
        // Degenerate clouds (empty, or a single point) still need a
        // sane viewing distance.
        let distance = if mean_radius > 0.0 {
            mean_radius * 3.0
        } else {
            1.0
        };
        Self::new(target + Vec3::new(0.0, 0.0, distance), target, aspect)
    }

    /// Combined view-projection matrix, column-major.
    pub fn view_projection(&self) -> Mat4 {
        let projection = Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar);
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        projection * view
    }

    /// Build the per-frame uniform block.
    ///
    /// `sprite_px` is the sprite circumradius in physical pixels; it is
    /// converted to NDC units against the viewport height, matching how
    /// a fixed-size sprite should scale with window size.
    pub fn frame_uniforms(&self, sprite_px: f32, viewport_height: u32) -> FrameUniforms {
        let pixel_size = 2.0 * sprite_px / viewport_height.max(1) as f32;
        FrameUniforms::new(self.view_projection().to_cols_array_2d(), pixel_size)
    }

    /// Move eye and target together by a camera-space delta
    /// (+x right, +y up, -z forward).
    pub fn translate(&mut self, delta: Vec3) {
        let forward = (self.target - self.eye).normalize_or_zero();
        let right = forward.cross(self.up).normalize_or_zero();
        let up = right.cross(forward);
        let world = right * delta.x + up * delta.y - forward * delta.z;
        self.eye += world;
        self.target += world;
    }

    /// Rotate the view direction around the up axis, about the eye.
    pub fn yaw(&mut self, angle: f32) {
        let rotation = Mat4::from_axis_angle(self.up, angle);
        let forward = self.target - self.eye;
        self.target = self.eye + rotation.transform_vector3(forward);
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn ndc(camera: &Camera, point: Vec3) -> Vec3 {
        let clip = camera.view_projection() * Vec4::new(point.x, point.y, point.z, 1.0);
        Vec3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w)
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 1.6);
        let center = ndc(&camera, Vec3::ZERO);
        assert!(center.x.abs() < 1e-5, "x = {}", center.x);
        assert!(center.y.abs() < 1e-5, "y = {}", center.y);
        assert!(center.z > 0.0 && center.z < 1.0, "z = {}", center.z);
    }

    #[test]
    fn test_right_of_target_lands_right_of_center() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 1.0);
        let p = ndc(&camera, Vec3::new(1.0, 0.0, 0.0));
        assert!(p.x > 0.0);
        let q = ndc(&camera, Vec3::new(0.0, 1.0, 0.0));
        assert!(q.y > 0.0);
    }

    #[test]
    fn test_framing_contains_mean_radius_sphere() {
        let camera = Camera::framing([10.0, -2.0, 3.0], 4.0, 1.0);
        // Points one mean-radius off the centroid stay well inside NDC.
        for offset in [
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(-4.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
        ] {
            let p = ndc(&camera, Vec3::new(10.0, -2.0, 3.0) + offset);
            assert!(p.x.abs() < 1.0 && p.y.abs() < 1.0, "{p:?} out of view");
        }
    }

    #[test]
    fn test_framing_empty_cloud_has_standoff() {
        let camera = Camera::framing([0.0; 3], 0.0, 1.0);
        assert!((camera.eye - camera.target).length() > 0.0);
    }

    #[test]
    fn test_translate_moves_eye_and_target_together() {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 1.0);
        camera.translate(Vec3::new(1.0, 0.0, 0.0));
        // Eye-to-target offset is invariant under translation.
        assert!(((camera.target - camera.eye).length() - 5.0).abs() < 1e-5);
        assert!((camera.eye.y).abs() < 1e-5);
        assert!(camera.eye.x.abs() > 0.9);
    }

    #[test]
    fn test_yaw_preserves_eye_and_distance() {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 1.0);
        let eye_before = camera.eye;
        camera.yaw(0.3);
        assert_eq!(camera.eye, eye_before);
        assert!(((camera.target - camera.eye).length() - 5.0).abs() < 1e-4);
        assert!(camera.target.x.abs() > 1e-3, "target should swing sideways");
    }

    #[test]
    fn test_frame_uniforms_pixel_size_scaling() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 1.0);
        let frame = camera.frame_uniforms(3.0, 600);
        // 3 px on a 600 px viewport: 2 * 3 / 600 NDC units.
        assert!((frame.pixel_size - 0.01).abs() < 1e-7);
    }
}
