//! Target outcomes and the shared slot they arrive through.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::EngineError;
use super::faces::Face;

pub const DICE_COUNT: usize = 3;

/// Ordered face values, one per die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome([Face; DICE_COUNT]);

impl Outcome {
    pub fn new(d1: u8, d2: u8, d3: u8) -> Result<Self, EngineError> {
        Ok(Outcome([Face::new(d1)?, Face::new(d2)?, Face::new(d3)?]))
    }

    pub fn from_faces(faces: [Face; DICE_COUNT]) -> Self {
        Outcome(faces)
    }

    #[inline]
    pub fn face(&self, die: usize) -> Face {
        self.0[die]
    }

    pub fn faces(&self) -> [Face; DICE_COUNT] {
        self.0
    }

    pub fn values(&self) -> [u8; DICE_COUNT] {
        [self.0[0].value(), self.0[1].value(), self.0[2].value()]
    }

    /// Packs into a non-zero word: one byte per die.
    fn pack(&self) -> u32 {
        let [a, b, c] = self.values();
        (a as u32) | ((b as u32) << 8) | ((c as u32) << 16)
    }

    fn unpack(word: u32) -> Option<Self> {
        if word == 0 {
            return None;
        }
        let byte = |shift: u32| ((word >> shift) & 0xff) as u8;
        Outcome::new(byte(0), byte(8), byte(16)).ok()
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.0[0], self.0[1], self.0[2])
    }
}

/// Latest authoritative outcome, shared between the frame loop and whoever
/// fetches the result.
///
/// Writes are one atomic store of the packed triple, so a reader on the next
/// sub-step sees either nothing or the complete outcome. Readers always
/// `load()`; never cache the value across frames.
#[derive(Clone, Debug, Default)]
pub struct SharedTarget {
    slot: Arc<AtomicU32>,
}

impl SharedTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, outcome: Outcome) {
        self.slot.store(outcome.pack(), Ordering::Release);
    }

    pub fn clear(&self) {
        self.slot.store(0, Ordering::Release);
    }

    pub fn load(&self) -> Option<Outcome> {
        Outcome::unpack(self.slot.load(Ordering::Acquire))
    }

    pub fn is_bound(&self) -> bool {
        self.load().is_some()
    }
}
