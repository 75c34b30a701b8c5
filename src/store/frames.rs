//! Output domain: latest encoded frame per player and the score pair

use bytes::Bytes;
use parking_lot::Mutex;

use crate::game::PlayerId;

/// What a frame request gets to see
#[derive(Debug, Clone, Default)]
pub struct FrameSnapshot {
    /// Absent until the first successful capture for that player
    pub frame: Option<Bytes>,
    pub scores: [u32; 2],
}

#[derive(Debug, Default)]
struct OutputState {
    frames: [Option<Bytes>; 2],
    scores: [u32; 2],
}

/// Written by the tick loop, read by request handlers
#[derive(Debug, Default)]
pub struct OutputDomain {
    state: Mutex<OutputState>,
}

impl OutputDomain {
    /// Swap in a new frame. The old buffer is replaced, never mutated, so a
    /// reader holding the previous `Bytes` keeps a complete image.
    pub fn publish(&self, player: PlayerId, frame: Bytes, scores: [u32; 2]) {
        let mut state = self.state.lock();
        state.frames[player.index()] = Some(frame);
        state.scores = scores;
    }

    pub fn snapshot(&self, player: PlayerId) -> FrameSnapshot {
        let state = self.state.lock();
        FrameSnapshot {
            frame: state.frames[player.index()].clone(),
            scores: state.scores,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_snapshot_survives_replacement() {
        let domain = OutputDomain::default();
        domain.publish(PlayerId::One, Bytes::from_static(b"first"), [0, 0]);
        let held = domain.snapshot(PlayerId::One);

        domain.publish(PlayerId::One, Bytes::from_static(b"second"), [1, 0]);
        assert_eq!(held.frame.as_deref(), Some(&b"first"[..]));
        assert_eq!(held.scores, [0, 0]);
        assert_eq!(domain.snapshot(PlayerId::One).frame.as_deref(), Some(&b"second"[..]));
    }
}
