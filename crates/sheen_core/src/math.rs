//! Vector math and camera pose

use std::f32::consts::TAU;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// 3D vector
///
/// Used for camera position/target and for XYZ Euler rotations (radians).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const ONE: Vec3 = Vec3 {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(&self, other: Vec3) -> f32 {
        (*self - other).length()
    }

    /// Linear interpolation.
    ///
    /// Written as `a * (1 - t) + b * t` so both endpoints are reproduced
    /// exactly at `t = 0` and `t = 1`.
    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        Vec3::new(
            lerp(self.x, other.x, t),
            lerp(self.y, other.y, t),
            lerp(self.z, other.z, t),
        )
    }

    /// Component-wise maximum absolute difference
    pub fn max_abs_diff(&self, other: Vec3) -> f32 {
        (self.x - other.x)
            .abs()
            .max((self.y - other.y).abs())
            .max((self.z - other.z).abs())
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Vec3::new(v[0], v[1], v[2])
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Scalar linear interpolation, exact at both endpoints
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Return the angle equal to `angle` modulo a full turn that lies closest to
/// `reference`.
///
/// A rotation tween towards the result never spins more than half a turn.
/// A reference exactly half a turn away rounds to the turn farther from
/// zero.
pub fn nearest_equivalent_angle(angle: f32, reference: f32) -> f32 {
    let turns = ((reference - angle) / TAU).round();
    angle + turns * TAU
}

/// Camera position and look-at target
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub const fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    /// Largest per-component deviation between two poses
    pub fn max_abs_diff(&self, other: &CameraPose) -> f32 {
        self.position
            .max_abs_diff(other.position)
            .max(self.target.max_abs_diff(other.target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_lerp_endpoints_exact() {
        let a = Vec3::new(1.28, -1.7, 5.86);
        let b = Vec3::new(-1.83, -0.14, 6.15);

        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);

        let mid = a.lerp(b, 0.5);
        assert!((mid.x - (-0.275)).abs() < 1e-5);
    }

    #[test]
    fn test_nearest_equivalent_angle() {
        // A full turn is visually identical to no rotation
        let wrapped = nearest_equivalent_angle(2.0 * PI, -PI / 2.0);
        assert!(wrapped.abs() < 1e-5);

        let unchanged = nearest_equivalent_angle(0.3, 0.0);
        assert!((unchanged - 0.3).abs() < 1e-6);

        let up = nearest_equivalent_angle(0.0, 4.6 * PI);
        assert!((up - 4.0 * PI).abs() < 1e-4);

        let down = nearest_equivalent_angle(TAU, -1.4 * PI);
        assert!((down + 2.0 * PI).abs() < 1e-4);
    }

    #[test]
    fn test_pose_diff() {
        let a = CameraPose::new(Vec3::new(0.0, 1.0, 2.0), Vec3::ZERO);
        let mut b = a;
        b.target.y = 0.25;
        assert!((a.max_abs_diff(&b) - 0.25).abs() < 1e-6);
    }
}
