//! Keyboard fly-camera controller.
//!
//! Tracks which movement keys are held and applies the corresponding
//! camera motion once per frame, so movement speed is frame-paced
//! rather than key-repeat-paced.

use cumulus_render::Camera;
use glam::Vec3;
use winit::keyboard::{Key, NamedKey};

#[derive(Debug, Default)]
pub struct CameraController {
    /// World units per frame; scaled to the cloud's size at startup.
    pub speed: f32,
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    yaw_left: bool,
    yaw_right: bool,
}

impl CameraController {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            ..Default::default()
        }
    }

    /// Record a key press or release. Returns true if the key is one
    /// of ours.
    pub fn process_key(&mut self, key: &Key, pressed: bool) -> bool {
        let held = match key {
            Key::Character(c) => match c.to_lowercase().as_str() {
                "w" => &mut self.forward,
                "s" => &mut self.backward,
                "a" => &mut self.left,
                "d" => &mut self.right,
                "q" => &mut self.yaw_left,
                "e" => &mut self.yaw_right,
                _ => return false,
            },
            Key::Named(NamedKey::ArrowUp) => &mut self.forward,
            Key::Named(NamedKey::ArrowDown) => &mut self.backward,
            Key::Named(NamedKey::ArrowLeft) => &mut self.left,
            Key::Named(NamedKey::ArrowRight) => &mut self.right,
            Key::Named(NamedKey::Space) => &mut self.up,
            Key::Named(NamedKey::Shift) => &mut self.down,
            _ => return false,
        };
        *held = pressed;
        true
    }

    /// Apply one frame of motion to the camera.
    pub fn update_camera(&self, camera: &mut Camera) {
        let mut delta = Vec3::ZERO;
        if self.forward {
            delta.z -= 1.0;
        }
        if self.backward {
            delta.z += 1.0;
        }
        if self.right {
            delta.x += 1.0;
        }
        if self.left {
            delta.x -= 1.0;
        }
        if self.up {
            delta.y += 1.0;
        }
        if self.down {
            delta.y -= 1.0;
        }
        if delta != Vec3::ZERO {
            camera.translate(delta * self.speed);
        }

        if self.yaw_left {
            camera.yaw(0.02);
        }
        if self.yaw_right {
            camera.yaw(-0.02);
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
