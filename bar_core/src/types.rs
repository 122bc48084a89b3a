use serde::{Deserialize, Serialize};

/// World-space position used by the errand scheduler. The scheduler only
/// needs straight-line distances, so there is no full vector algebra here.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
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

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { x, y, z }
    }

    pub fn distance(self, other: Vec3) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Unit vector pointing at `target`, or `None` when the two points are
    /// too close for a meaningful direction.
    pub fn direction_to(self, target: Vec3) -> Option<Vec3> {
        let length = self.distance(target);
        if length <= f32::EPSILON {
            return None;
        }
        Some(Vec3 {
            x: (target.x - self.x) / length,
            y: (target.y - self.y) / length,
            z: (target.z - self.z) / length,
        })
    }

    /// Heading in degrees on the ground plane when looking from `self`
    /// toward `target` (0 = +z, 90 = +x).
    pub fn yaw_to(self, target: Vec3) -> Option<f32> {
        let direction = self.direction_to(target)?;
        if direction.x.abs() <= f32::EPSILON && direction.z.abs() <= f32::EPSILON {
            return None;
        }
        Some(direction.x.atan2(direction.z).to_degrees())
    }
}

/// Turns `current` toward `target` by fraction `t` (clamped to 0..=1) along
/// the shortest arc, both angles in degrees. Matches the feel of the
/// original per-frame orientation slerp without pulling in a quaternion.
pub fn turn_toward(current: f32, target: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let mut delta = (target - current) % 360.0;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta < -180.0 {
        delta += 360.0;
    }
    normalize_degrees(current + delta * t)
}

fn normalize_degrees(angle: f32) -> f32 {
    let mut wrapped = angle % 360.0;
    if wrapped > 180.0 {
        wrapped -= 360.0;
    } else if wrapped < -180.0 {
        wrapped += 360.0;
    }
    wrapped
}
