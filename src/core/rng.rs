//! Die-roll sources.
//!
//! The engine never draws randomness itself: every roll goes through an
//! injected [`DieSource`]. Two sources ship with the crate:
//!
//! - [`SeededDice`]: deterministic ChaCha8 stream, same seed gives the same game
//! - [`ScriptedDice`]: replays a fixed list of faces, for tests and replays
//!
//! ## Checkpointing
//!
//! ```
//! use dix_mille::core::{DieSource, SeededDice};
//!
//! let mut dice = SeededDice::new(42);
//! dice.roll(5);
//!
//! let saved = dice.state();
//! let expected = dice.roll(5);
//!
//! let mut restored = SeededDice::from_state(&saved);
//! assert_eq!(restored.roll(5), expected);
//! ```

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::dice::{DieFace, Roll, MAX_FACE, MIN_FACE};

/// Produces die faces in `1..=6`.
pub trait DieSource {
    /// Roll a single die.
    fn roll_die(&mut self) -> DieFace;

    /// Roll `count` dice.
    fn roll(&mut self, count: usize) -> Roll {
        (0..count).map(|_| self.roll_die()).collect()
    }
}

impl<D: DieSource + ?Sized> DieSource for &mut D {
    fn roll_die(&mut self) -> DieFace {
        (**self).roll_die()
    }
}

impl<D: DieSource + ?Sized> DieSource for Box<D> {
    fn roll_die(&mut self) -> DieFace {
        (**self).roll_die()
    }
}

/// Deterministic uniform dice.
///
/// Uses ChaCha8 for speed while keeping high-quality randomness.
#[derive(Clone, Debug)]
pub struct SeededDice {
    inner: ChaCha8Rng,
    seed: u64,
}

impl SeededDice {
    /// Create a new source with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this source was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the current state for checkpointing.
    #[must_use]
    pub fn state(&self) -> DiceState {
        DiceState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &DiceState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl DieSource for SeededDice {
    fn roll_die(&mut self) -> DieFace {
        self.inner.gen_range(MIN_FACE..=MAX_FACE)
    }
}

/// Serializable dice state.
///
/// Uses the ChaCha8 word position for O(1) capture regardless of
/// how many dice have been rolled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

/// Replays a fixed sequence of faces, cycling when exhausted.
///
/// Faces are returned as given; out-of-range faces surface as
/// `InvalidRoll` when the engine classifies them.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    script: Vec<DieFace>,
    queue: VecDeque<DieFace>,
}

impl ScriptedDice {
    /// Create a source that yields `faces` in order.
    pub fn new(faces: impl IntoIterator<Item = DieFace>) -> Self {
        let script: Vec<_> = faces.into_iter().collect();
        Self {
            queue: script.iter().copied().collect(),
            script,
        }
    }

    /// Append more faces after the ones already queued.
    pub fn push(&mut self, faces: &[DieFace]) {
        self.script.extend_from_slice(faces);
        self.queue.extend(faces.iter().copied());
    }

    /// Faces left before the script starts over.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl DieSource for ScriptedDice {
    fn roll_die(&mut self) -> DieFace {
        if self.queue.is_empty() {
            self.queue.extend(self.script.iter().copied());
        }
        // An empty script has nothing to replay; 0 is rejected by the classifier.
        self.queue.pop_front().unwrap_or(0)
    }
}
