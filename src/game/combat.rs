//! Combat system - firing, projectiles, hit detection

use crate::util::math::Vec3;

use super::physics::BASELINE_HZ;
use super::{PlayerId, Ship};

/// Weapon and damage constants
#[derive(Debug, Clone, Copy)]
pub struct WeaponStats {
    /// Projectile speed along the ship heading (added to ship velocity)
    pub projectile_speed: f32,
    /// Reload time between shots (seconds)
    pub cooldown: f32,
    /// Projectile lifetime (seconds)
    pub projectile_lifetime: f32,
    /// Projectiles farther than this from the origin are discarded
    pub max_range: f32,
    /// Distance from the ship centre where projectiles appear
    pub muzzle_offset: f32,
    /// Projectile-to-ship distance that counts as a hit
    pub hit_radius: f32,
    /// Seconds a destroyed ship waits before respawning
    pub respawn_delay: f32,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self {
            projectile_speed: 1.0,
            cooldown: 0.3,
            projectile_lifetime: 3.0,
            max_range: 100.0,
            muzzle_offset: 2.0,
            hit_radius: 1.5,
            respawn_delay: 3.0,
        }
    }
}

/// Active projectile in the arena
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub owner: PlayerId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub lifetime_remaining: f32,
}

impl Projectile {
    /// Spawn a projectile in front of `ship`, inheriting its velocity
    pub fn fired_by(ship: &Ship, stats: &WeaponStats) -> Self {
        let forward = ship.forward();
        Self {
            owner: ship.id,
            position: ship.position + forward * stats.muzzle_offset,
            velocity: forward * stats.projectile_speed + ship.velocity,
            lifetime_remaining: stats.projectile_lifetime,
        }
    }

    /// Move and age the projectile, returns false if it expired
    pub fn update(&mut self, dt: f32, stats: &WeaponStats) -> bool {
        self.position += self.velocity * dt * BASELINE_HZ;
        self.lifetime_remaining -= dt;
        self.lifetime_remaining > 0.0 && self.position.norm() <= stats.max_range
    }

    /// Check collision with a target ship. A shot never hits its owner.
    pub fn check_hit(&self, target: &Ship, stats: &WeaponStats) -> bool {
        target.alive
            && target.id != self.owner
            && (self.position - target.position).norm() < stats.hit_radius
    }
}

/// Combat system for weapon cooldowns and firing
pub struct CombatSystem;

impl CombatSystem {
    /// Run the trigger for one tick. Fires on the press edge only: holding
    /// the trigger yields one shot until it is released and pressed again.
    pub fn update_trigger(
        ship: &mut Ship,
        fire: bool,
        dt: f32,
        stats: &WeaponStats,
    ) -> Option<Projectile> {
        // Keeps counting down below zero while idle
        ship.shoot_cooldown -= dt;

        let mut shot = None;
        if fire && !ship.shoot_held && ship.shoot_cooldown <= 0.0 {
            shot = Some(Projectile::fired_by(ship, stats));
            ship.shoot_cooldown = stats.cooldown;
        }
        ship.shoot_held = fire;

        shot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 120.0;

    #[test]
    fn fire_spawns_projectile_at_muzzle() {
        let stats = WeaponStats::default();
        let mut ship = Ship::new(PlayerId::Two);
        ship.velocity = Vec3::new(0.1, 0.0, 0.0);

        let shot = CombatSystem::update_trigger(&mut ship, true, DT, &stats).unwrap();
        assert_eq!(shot.owner, PlayerId::Two);
        assert!((shot.position - (ship.position + ship.forward() * 2.0)).norm() < 1e-6);
        assert!((shot.velocity - (ship.forward() + ship.velocity)).norm() < 1e-6);
        assert_eq!(shot.lifetime_remaining, 3.0);
        assert_eq!(ship.shoot_cooldown, stats.cooldown);
        assert!(ship.shoot_held);
    }

    #[test]
    fn holding_fire_shoots_once() {
        let stats = WeaponStats::default();
        let mut ship = Ship::new(PlayerId::One);

        let mut shots = 0;
        // Two full seconds: far longer than the reload
        for _ in 0..240 {
            if CombatSystem::update_trigger(&mut ship, true, DT, &stats).is_some() {
                shots += 1;
            }
        }
        assert_eq!(shots, 1);

        assert!(CombatSystem::update_trigger(&mut ship, false, DT, &stats).is_none());
        assert!(CombatSystem::update_trigger(&mut ship, true, DT, &stats).is_some());
    }

    #[test]
    fn repress_during_reload_is_lost() {
        let stats = WeaponStats::default();
        let mut ship = Ship::new(PlayerId::One);

        assert!(CombatSystem::update_trigger(&mut ship, true, DT, &stats).is_some());
        assert!(CombatSystem::update_trigger(&mut ship, false, DT, &stats).is_none());
        // Pressed again while still reloading, then held past the reload
        for _ in 0..100 {
            assert!(CombatSystem::update_trigger(&mut ship, true, DT, &stats).is_none());
        }
    }

    #[test]
    fn projectile_expires_on_lifetime_or_range() {
        let stats = WeaponStats::default();
        let mut shot = Projectile {
            owner: PlayerId::One,
            position: Vec3::zeros(),
            velocity: Vec3::zeros(),
            lifetime_remaining: 0.01,
        };
        assert!(!shot.update(0.02, &stats));

        let mut far = Projectile {
            owner: PlayerId::One,
            position: Vec3::new(99.5, 0.0, 0.0),
            velocity: Vec3::new(1.0, 0.0, 0.0),
            lifetime_remaining: 3.0,
        };
        assert!(!far.update(1.0 / 60.0, &stats));
    }

    #[test]
    fn owner_is_never_hit() {
        let stats = WeaponStats::default();
        let ship = Ship::new(PlayerId::One);
        let shot = Projectile {
            owner: PlayerId::One,
            position: ship.position,
            velocity: Vec3::zeros(),
            lifetime_remaining: 1.0,
        };
        assert!(!shot.check_hit(&ship, &stats));

        let enemy = Projectile {
            owner: PlayerId::Two,
            ..shot
        };
        assert!(enemy.check_hit(&ship, &stats));
    }
}
