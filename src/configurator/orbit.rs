use bevy::prelude::*;

/// Camera orbiting the origin on the horizontal circle. Only yaw is
/// controllable: the polar angle is pinned to the horizon, zoom and pan are
/// not offered.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub distance: f32,
    /// Radians of yaw per pixel of horizontal drag.
    pub sensitivity: f32,
    /// Set while a drag that started over the scene is in progress.
    pub dragging: bool,
}

impl OrbitCamera {
    pub fn new(distance: f32, sensitivity: f32) -> Self {
        Self {
            yaw: 0.0,
            distance,
            sensitivity,
            dragging: false,
        }
    }

    /// Dragging right turns the model right, i.e. the camera moves left.
    pub fn drag(&mut self, delta_x: f32) {
        self.yaw = (self.yaw - delta_x * self.sensitivity).rem_euclid(std::f32::consts::TAU);
    }

    pub fn transform(&self) -> Transform {
        orbit_transform(self.yaw, self.distance)
    }
}

pub fn orbit_transform(yaw: f32, distance: f32) -> Transform {
    Transform::from_xyz(distance * yaw.sin(), 0.0, distance * yaw.cos())
        .looking_at(Vec3::ZERO, Vec3::Y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_default_view_matches_front_camera() {
        let t = orbit_transform(0.0, 4.0);
        assert!(t.translation.abs_diff_eq(Vec3::new(0.0, 0.0, 4.0), 1e-6));
        assert!(t.forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn test_orbit_stays_on_horizon() {
        for i in 0..16 {
            let yaw = i as f32 * 0.4;
            let t = orbit_transform(yaw, 4.0);
            assert!(t.translation.y.abs() < 1e-6);
            assert!((t.translation.length() - 4.0).abs() < 1e-4);
            assert!(t.forward().abs_diff_eq(-t.translation.normalize(), 1e-4));
        }
    }

    #[test]
    fn test_drag_wraps_yaw() {
        let mut orbit = OrbitCamera::new(4.0, 0.01);
        orbit.drag(-100.0);
        assert!((orbit.yaw - 1.0).abs() < 1e-5);
        orbit.drag(100.0 + FRAC_PI_2 * 100.0);
        assert!((0.0..std::f32::consts::TAU).contains(&orbit.yaw));
        assert!((orbit.yaw - (std::f32::consts::TAU - FRAC_PI_2)).abs() < 1e-4);
    }
}
