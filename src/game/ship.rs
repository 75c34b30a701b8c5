//! Ship state record

use crate::util::math::Vec3;

use super::PlayerId;

/// One player's ship (authoritative)
#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    pub id: PlayerId,

    // Position and movement
    pub position: Vec3,
    pub velocity: Vec3,
    pub yaw: f32,
    pub pitch: f32,

    // Combat
    pub alive: bool,
    pub respawn_timer: f32,
    pub score: u32,
    pub shoot_held: bool,
    pub shoot_cooldown: f32,
}

impl Ship {
    /// Create a ship at its player's spawn pose
    pub fn new(id: PlayerId) -> Self {
        let (position, yaw) = Self::spawn_pose(id);
        Self {
            id,
            position,
            velocity: Vec3::zeros(),
            yaw,
            pitch: 0.0,
            alive: true,
            respawn_timer: 0.0,
            score: 0,
            shoot_held: false,
            shoot_cooldown: 0.0,
        }
    }

    /// Fixed spawn point and heading per player
    pub fn spawn_pose(id: PlayerId) -> (Vec3, f32) {
        match id {
            PlayerId::One => (Vec3::new(-10.0, 0.0, 0.0), 0.0),
            PlayerId::Two => (Vec3::new(10.0, 0.0, 0.0), std::f32::consts::PI),
        }
    }

    /// Heading vector. Pitch only tilts the Y component; this is not a full
    /// rotation and is not normalized.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), -self.pitch.sin(), self.yaw.cos())
    }

    /// Put the ship back at its spawn pose. Score survives.
    pub fn respawn(&mut self) {
        let (position, yaw) = Self::spawn_pose(self.id);
        self.position = position;
        self.velocity = Vec3::zeros();
        self.yaw = yaw;
        self.alive = true;
    }

    /// Take the ship out of play until the respawn timer runs down
    pub fn destroy(&mut self, respawn_delay: f32) {
        self.alive = false;
        self.respawn_timer = respawn_delay;
    }
}
