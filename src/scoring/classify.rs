//! Roll classification.
//!
//! Faces are grouped by value and each group is scored on its own, except
//! for the straight: five dice showing five different faces score 500 as a
//! whole. Singles and pairs of 2, 3, 4 and 6 score nothing and are not
//! consumed; they stay available for the next roll.

use serde::{Deserialize, Serialize};

use crate::core::dice::{is_valid_face, DieFace, Roll, DICE_PER_HAND, MAX_FACE};
use crate::core::error::InvalidRoll;

/// Points for five different faces.
pub const STRAIGHT_POINTS: u32 = 500;

/// Points for five of a kind.
pub const FIVE_OF_A_KIND_POINTS: u32 = 10_000;

/// How a roll scores.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoringOutcome {
    /// Faces counted as score, grouped by ascending face.
    pub scored_dice: Roll,

    /// Total points.
    pub points: u32,

    /// Number of dice consumed by scoring groups.
    pub consumed_count: usize,
}

impl ScoringOutcome {
    /// Nothing in the roll scored.
    #[must_use]
    pub fn is_bust(&self) -> bool {
        self.consumed_count == 0
    }

    /// Every die of a roll of `roll_len` dice scored (main pleine).
    #[must_use]
    pub fn is_main_pleine(&self, roll_len: usize) -> bool {
        roll_len > 0 && self.consumed_count == roll_len
    }
}

/// Classify a roll of one to five dice.
///
/// ```
/// use dix_mille::scoring::classify;
///
/// let outcome = classify(&[1, 1, 1, 2, 3]).unwrap();
/// assert_eq!(outcome.points, 1000);
/// assert_eq!(outcome.consumed_count, 3);
/// ```
pub fn classify(roll: &[DieFace]) -> Result<ScoringOutcome, InvalidRoll> {
    if roll.is_empty() || roll.len() > DICE_PER_HAND {
        return Err(InvalidRoll::Length { len: roll.len() });
    }
    if let Some(&face) = roll.iter().find(|&&face| !is_valid_face(face)) {
        return Err(InvalidRoll::Face { face });
    }

    let counts = face_counts(roll);

    if roll.len() == DICE_PER_HAND && counts.iter().all(|&count| count <= 1) {
        let mut scored_dice: Roll = roll.into();
        scored_dice.sort_unstable();
        return Ok(ScoringOutcome {
            scored_dice,
            points: STRAIGHT_POINTS,
            consumed_count: DICE_PER_HAND,
        });
    }

    let mut outcome = ScoringOutcome::default();
    for face in 1..=MAX_FACE {
        let count = counts[face as usize];
        let (points, consumed) = score_group(face, count);
        outcome.points += points;
        outcome.consumed_count += consumed;
        outcome
            .scored_dice
            .extend(std::iter::repeat(face).take(consumed));
    }

    Ok(outcome)
}

/// Count occurrences of each face; index 0 is unused.
fn face_counts(roll: &[DieFace]) -> [usize; MAX_FACE as usize + 1] {
    let mut counts = [0; MAX_FACE as usize + 1];
    for &face in roll {
        counts[face as usize] += 1;
    }
    counts
}

/// Points and consumed dice for `count` dice showing `face`.
fn score_group(face: DieFace, count: usize) -> (u32, usize) {
    match (face, count) {
        (_, 0) => (0, 0),
        (_, 5) => (FIVE_OF_A_KIND_POINTS, 5),
        (1, 4) => (2_000, 4),
        (_, 4) => (1_000, 4),
        (1, 3) => (1_000, 3),
        (_, 3) => (u32::from(face) * 100, 3),
        (1, _) => (100 * count as u32, count),
        (5, _) => (50 * count as u32, count),
        _ => (0, 0),
    }
}
