//! Arena state and the per-tick simulation step

use tracing::debug;

use super::combat::{CombatSystem, Projectile, WeaponStats};
use super::physics::{ArenaBounds, PhysicsSystem, ShipStats};
use super::{ControlState, PlayerId, Ship};

/// Things that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Shot { shooter: PlayerId },
    Kill { killer: PlayerId, victim: PlayerId },
    Respawn { player: PlayerId },
}

/// The whole simulated arena: two ships and the shots in flight
#[derive(Debug, Clone)]
pub struct World {
    ships: [Ship; 2],
    projectiles: Vec<Projectile>,
    ship_stats: ShipStats,
    weapon_stats: WeaponStats,
    bounds: ArenaBounds,
}

impl Default for World {
    fn default() -> Self {
        Self::new(ShipStats::default(), WeaponStats::default(), ArenaBounds::default())
    }
}

impl World {
    pub fn new(ship_stats: ShipStats, weapon_stats: WeaponStats, bounds: ArenaBounds) -> Self {
        Self {
            ships: PlayerId::ALL.map(Ship::new),
            projectiles: Vec::new(),
            ship_stats,
            weapon_stats,
            bounds,
        }
    }

    pub fn ship(&self, id: PlayerId) -> &Ship {
        &self.ships[id.index()]
    }

    #[cfg(test)]
    pub fn ship_mut(&mut self, id: PlayerId) -> &mut Ship {
        &mut self.ships[id.index()]
    }

    pub fn ships(&self) -> &[Ship; 2] {
        &self.ships
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Mutable access for scenario setup
    #[cfg(test)]
    pub fn projectiles_mut(&mut self) -> &mut Vec<Projectile> {
        &mut self.projectiles
    }

    /// Score snapshot indexed by `PlayerId::index`
    pub fn scores(&self) -> [u32; 2] {
        [self.ships[0].score, self.ships[1].score]
    }

    /// Advance the arena by `dt` seconds of wall-clock time
    pub fn update(&mut self, dt: f32, controls: &[ControlState; 2]) -> Vec<GameEvent> {
        let mut events = Vec::new();

        // Ships move and fire; new shots fly on this same tick
        for id in PlayerId::ALL {
            let ship = &mut self.ships[id.index()];
            if !ship.alive {
                continue;
            }
            let input = &controls[id.index()];

            PhysicsSystem::update_ship(ship, input, dt, &self.ship_stats, &self.bounds);

            if let Some(shot) = CombatSystem::update_trigger(ship, input.fire, dt, &self.weapon_stats) {
                events.push(GameEvent::Shot { shooter: id });
                self.projectiles.push(shot);
            }
        }

        self.update_projectiles(dt, &mut events);
        self.update_respawns(dt, &mut events);

        for event in &events {
            debug!(?event, "Game event");
        }

        events
    }

    /// Move projectiles, drop expired ones and resolve at most one hit each
    fn update_projectiles(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        let ships = &mut self.ships;
        let stats = &self.weapon_stats;

        self.projectiles.retain_mut(|projectile| {
            if !projectile.update(dt, stats) {
                return false;
            }

            // Player 1 is checked first; the first hit consumes the shot
            for id in PlayerId::ALL {
                if !projectile.check_hit(&ships[id.index()], stats) {
                    continue;
                }

                ships[id.index()].destroy(stats.respawn_delay);
                let killer = id.other();
                ships[killer.index()].score += 1;
                events.push(GameEvent::Kill { killer, victim: id });
                return false;
            }

            true
        });
    }

    fn update_respawns(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        for ship in self.ships.iter_mut().filter(|s| !s.alive) {
            ship.respawn_timer -= dt;
            if ship.respawn_timer <= 0.0 {
                ship.respawn();
                events.push(GameEvent::Respawn { player: ship.id });
            }
        }
    }
}
