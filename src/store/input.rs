//! Input domain: remote control flags per player

use parking_lot::Mutex;
use serde_json::Value;

use crate::game::{Control, ControlState, PlayerId};

/// Written by request handlers, read once per tick by the simulation
#[derive(Debug, Default)]
pub struct InputDomain {
    flags: Mutex<[ControlState; 2]>,
}

impl InputDomain {
    pub fn apply<I>(&self, player: PlayerId, updates: I)
    where
        I: IntoIterator<Item = (Control, bool)>,
    {
        let mut flags = self.flags.lock();
        let state = &mut flags[player.index()];
        for (control, pressed) in updates {
            state.set(control, pressed);
        }
    }

    pub fn snapshot(&self) -> [ControlState; 2] {
        *self.flags.lock()
    }
}

/// Extract the flag updates a request body asks for.
///
/// Only keys from `player`'s own key set are honoured. A well-formed JSON
/// object is read entry by entry; anything else is scanned for literal
/// `"key":true` / `"key":false` pairs. Unusable bodies yield no updates.
pub fn parse_input_body(player: PlayerId, body: &[u8]) -> Vec<(Control, bool)> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map
            .iter()
            .filter_map(|(key, value)| {
                let control = player.control_for_key(key)?;
                value.as_bool().map(|pressed| (control, pressed))
            })
            .collect(),
        Ok(_) => Vec::new(),
        Err(_) => scan_pairs(player, &String::from_utf8_lossy(body)),
    }
}

fn scan_pairs(player: PlayerId, text: &str) -> Vec<(Control, bool)> {
    player
        .key_map()
        .iter()
        .filter_map(|(key, control)| find_flag(text, key).map(|pressed| (*control, pressed)))
        .collect()
}

/// Value of `key` in `text`. A `true` pair anywhere wins over `false`.
fn find_flag(text: &str, key: &str) -> Option<bool> {
    if has_pair(text, key, "true") {
        Some(true)
    } else if has_pair(text, key, "false") {
        Some(false)
    } else {
        None
    }
}

/// Whether `"key" : <literal>` occurs in `text`
fn has_pair(text: &str, key: &str, literal: &str) -> bool {
    let needle = format!("\"{key}\"");
    let mut rest = text;
    while let Some(pos) = rest.find(&needle) {
        rest = &rest[pos + needle.len()..];
        let matched = rest
            .trim_start()
            .strip_prefix(':')
            .is_some_and(|value| value.trim_start().starts_with(literal));
        if matched {
            return true;
        }
    }
    false
}
