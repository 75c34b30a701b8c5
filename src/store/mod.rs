//! Shared frame/score/input store
//!
//! The only state the simulation thread and the request handlers share.
//! Output (frames + scores) and input (control flags) sit behind two
//! independent locks; no method ever holds both.

pub mod frames;
pub mod input;

pub use frames::{FrameSnapshot, OutputDomain};
pub use input::{parse_input_body, InputDomain};

use bytes::Bytes;

use crate::game::{Control, ControlState, PlayerId};

/// Both synchronization domains, shared by reference between the tick loop
/// and the HTTP layer
#[derive(Default)]
pub struct SharedStore {
    output: OutputDomain,
    input: InputDomain,
}

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `player`'s frame and both scores in one step
    pub fn publish_frame(&self, player: PlayerId, frame: Bytes, scores: [u32; 2]) {
        self.output.publish(player, frame, scores);
    }

    /// Latest frame for `player` plus the scores published with it
    pub fn frame_snapshot(&self, player: PlayerId) -> FrameSnapshot {
        self.output.snapshot(player)
    }

    /// Apply a partial flag update; flags not mentioned keep their value
    pub fn apply_input<I>(&self, player: PlayerId, updates: I)
    where
        I: IntoIterator<Item = (Control, bool)>,
    {
        self.input.apply(player, updates);
    }

    /// Both players' full flag sets, read once per tick
    pub fn input_snapshot(&self) -> [ControlState; 2] {
        self.input.snapshot()
    }
}
