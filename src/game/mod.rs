//! Game simulation modules

pub mod combat;
pub mod physics;
pub mod ship;
pub mod world;

pub use combat::Projectile;
pub use ship::Ship;
pub use world::{GameEvent, World};

use std::fmt;

/// One of the two fixed player slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    /// Both players, in resolution order
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// Array slot for per-player tables
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    /// Player number as shown to clients (1 or 2)
    pub fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    pub fn other(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Wire key names for this player's controls
    pub fn key_map(self) -> &'static [(&'static str, Control); 5] {
        match self {
            PlayerId::One => &PLAYER_ONE_KEYS,
            PlayerId::Two => &PLAYER_TWO_KEYS,
        }
    }

    /// Look up a wire key in this player's fixed key set
    pub fn control_for_key(self, key: &str) -> Option<Control> {
        self.key_map()
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, control)| *control)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Logical control a key maps onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Forward,
    Back,
    Left,
    Right,
    Fire,
}

const PLAYER_ONE_KEYS: [(&str, Control); 5] = [
    ("w", Control::Forward),
    ("s", Control::Back),
    ("a", Control::Left),
    ("d", Control::Right),
    ("space", Control::Fire),
];

const PLAYER_TWO_KEYS: [(&str, Control); 5] = [
    ("up", Control::Forward),
    ("down", Control::Back),
    ("left", Control::Left),
    ("right", Control::Right),
    ("enter", Control::Fire),
];

/// Control flags for a single player on a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl ControlState {
    pub fn set(&mut self, control: Control, pressed: bool) {
        match control {
            Control::Forward => self.forward = pressed,
            Control::Back => self.back = pressed,
            Control::Left => self.left = pressed,
            Control::Right => self.right = pressed,
            Control::Fire => self.fire = pressed,
        }
    }

    /// Either source asserting a control activates it
    pub fn merge(self, other: ControlState) -> ControlState {
        ControlState {
            forward: self.forward || other.forward,
            back: self.back || other.back,
            left: self.left || other.left,
            right: self.right || other.right,
            fire: self.fire || other.fire,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_sets_are_per_player() {
        assert_eq!(PlayerId::One.control_for_key("w"), Some(Control::Forward));
        assert_eq!(PlayerId::One.control_for_key("up"), None);
        assert_eq!(PlayerId::Two.control_for_key("enter"), Some(Control::Fire));
        assert_eq!(PlayerId::Two.control_for_key("space"), None);
        // left/right exist for player 2 only
        assert_eq!(PlayerId::Two.control_for_key("left"), Some(Control::Left));
        assert_eq!(PlayerId::One.control_for_key("left"), None);
    }

    #[test]
    fn merge_is_per_flag_or() {
        let remote = ControlState {
            forward: true,
            ..Default::default()
        };
        let local = ControlState {
            fire: true,
            ..Default::default()
        };
        let merged = remote.merge(local);
        assert!(merged.forward && merged.fire);
        assert!(!merged.back && !merged.left && !merged.right);
    }

    #[test]
    fn other_player_is_symmetric() {
        for id in PlayerId::ALL {
            assert_eq!(id.other().other(), id);
            assert_ne!(id.other(), id);
        }
    }
}
