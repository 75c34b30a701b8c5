//! Ship physics and movement constraints

use crate::util::math::Vec3;

use super::{ControlState, Ship};

/// Integration is tuned against a 60 Hz step; real deltas are scaled by this
pub const BASELINE_HZ: f32 = 60.0;

/// Ship handling constants
#[derive(Debug, Clone, Copy)]
pub struct ShipStats {
    /// Maximum speed (world units per baseline step)
    pub max_speed: f32,
    /// Thrust added per baseline step while forward is held
    pub acceleration: f32,
    /// Fraction of reverse thrust relative to forward thrust
    pub reverse_factor: f32,
    /// Velocity multiplier applied every tick
    pub drag: f32,
    /// Yaw change per tick while a turn key is held (radians)
    pub turn_rate: f32,
}

impl Default for ShipStats {
    fn default() -> Self {
        Self {
            max_speed: 0.5,
            acceleration: 0.3,
            reverse_factor: 0.5,
            drag: 0.98,
            turn_rate: 0.08,
        }
    }
}

/// Axis-aligned play volume ships are clamped into
#[derive(Debug, Clone, Copy)]
pub struct ArenaBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            min: Vec3::new(-50.0, -3.0, -50.0),
            max: Vec3::new(50.0, 20.0, 50.0),
        }
    }
}

impl ArenaBounds {
    /// Clamp each axis independently; velocity is left untouched
    pub fn clamp(&self, position: &mut Vec3) {
        for axis in 0..3 {
            position[axis] = position[axis].clamp(self.min[axis], self.max[axis]);
        }
    }

    #[cfg(test)]
    pub fn contains(&self, position: &Vec3) -> bool {
        (0..3).all(|axis| position[axis] >= self.min[axis] && position[axis] <= self.max[axis])
    }
}

/// Physics system for updating ship positions and velocities
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Apply turning, thrust, drag, speed limit, movement and the arena clamp
    pub fn update_ship(
        ship: &mut Ship,
        controls: &ControlState,
        dt: f32,
        stats: &ShipStats,
        bounds: &ArenaBounds,
    ) {
        let step = dt * BASELINE_HZ;

        // Both turn keys may be held; the effects add up
        if controls.left {
            ship.yaw += stats.turn_rate;
        }
        if controls.right {
            ship.yaw -= stats.turn_rate;
        }

        // Reverse is assigned last, so it wins when both are held
        let mut thrust = Vec3::zeros();
        if controls.forward {
            thrust = ship.forward() * stats.acceleration;
        }
        if controls.back {
            thrust = -ship.forward() * stats.acceleration * stats.reverse_factor;
        }

        ship.velocity += thrust * step;
        ship.velocity *= stats.drag;

        let speed = ship.velocity.norm();
        if speed > stats.max_speed {
            ship.velocity *= stats.max_speed / speed;
        }

        ship.position += ship.velocity * step;
        bounds.clamp(&mut ship.position);
    }
}
