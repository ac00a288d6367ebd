use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Parameters of the shoe's idle bob and sway.
///
/// Every term is a periodic function of elapsed time, so the pose carries no
/// state and restarts cleanly if the clock does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdleMotion {
    /// Constant lean around Z (radians).
    pub lean: f32,
    /// Period divisor of the bob and the Z sway.
    pub bob_period: f32,
    /// Peak-to-peak bob height is `2 * bob_height`.
    pub bob_height: f32,
    /// Peak-to-peak Z sway is `2 * lean_sway`.
    pub lean_sway: f32,
    /// Period divisor of the X/Y sway.
    pub sway_period: f32,
    pub sway_amplitude: f32,
}

impl Default for IdleMotion {
    fn default() -> Self {
        Self {
            lean: -0.2,
            bob_period: 1.5,
            bob_height: 0.1,
            lean_sway: 0.05,
            sway_period: 4.0,
            sway_amplitude: 0.125,
        }
    }
}

impl IdleMotion {
    /// Pose of the shoe root at `t` seconds since startup.
    pub fn pose(&self, t: f32) -> Transform {
        let bob = 1.0 + (t / self.bob_period).sin();
        let rot_x = (t / self.sway_period).cos() * self.sway_amplitude;
        let rot_y = (t / self.sway_period).sin() * self.sway_amplitude;
        let rot_z = self.lean - bob * self.lean_sway;

        Transform::from_xyz(0.0, bob * self.bob_height, 0.0)
            .with_rotation(Quat::from_euler(EulerRot::XYZ, rot_x, rot_y, rot_z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn approx_eq(a: Transform, b: Transform) -> bool {
        a.translation.abs_diff_eq(b.translation, 1e-4) && a.rotation.abs_diff_eq(b.rotation, 1e-4)
    }

    #[test]
    fn test_pose_at_zero() {
        let pose = IdleMotion::default().pose(0.0);
        assert!((pose.translation.y - 0.1).abs() < 1e-6);
        let (x, y, z) = pose.rotation.to_euler(EulerRot::XYZ);
        assert!((x - 0.125).abs() < 1e-5);
        assert!(y.abs() < 1e-5);
        assert!((z - (-0.25)).abs() < 1e-5);
    }

    #[test]
    fn test_pose_is_periodic() {
        // lcm of 2π·1.5 and 2π·4 is 24π
        let motion = IdleMotion::default();
        for t in [0.0, 0.7, 3.3, 10.0] {
            assert!(approx_eq(motion.pose(t), motion.pose(t + 24.0 * PI)), "t = {t}");
        }
    }

    #[test]
    fn test_pose_is_a_pure_function_of_time() {
        let motion = IdleMotion::default();
        let first = motion.pose(5.25);
        let _ = motion.pose(100.0);
        assert_eq!(motion.pose(5.25), first);
    }

    #[test]
    fn test_bob_stays_above_ground() {
        let motion = IdleMotion::default();
        for i in 0..200 {
            let y = motion.pose(i as f32 * 0.1).translation.y;
            assert!((0.0..=0.2 + 1e-6).contains(&y));
        }
    }
}
