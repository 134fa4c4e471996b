//! Dice vocabulary shared by the classifier, the policies and the turn engine.

use smallvec::SmallVec;

/// Number of dice in a full hand.
pub const DICE_PER_HAND: usize = 5;

/// Lowest face of a die.
pub const MIN_FACE: DieFace = 1;

/// Highest face of a die.
pub const MAX_FACE: DieFace = 6;

/// A single die face, valid in `1..=6`.
pub type DieFace = u8;

/// An ordered roll of up to five dice.
///
/// SmallVec keeps a whole hand inline without heap allocation.
pub type Roll = SmallVec<[DieFace; DICE_PER_HAND]>;

/// One flag per offered die: `true` sets the die aside, `false` leaves it live.
pub type KeepMask = SmallVec<[bool; DICE_PER_HAND]>;

/// Check that a face lies in `1..=6`.
#[must_use]
pub const fn is_valid_face(face: DieFace) -> bool {
    face >= MIN_FACE && face <= MAX_FACE
}

/// Select the dice whose mask flag is set.
///
/// Extra mask entries or extra dice are ignored; callers validate lengths.
#[must_use]
pub fn select(roll: &[DieFace], mask: &[bool]) -> Roll {
    roll.iter()
        .zip(mask)
        .filter_map(|(&face, &keep)| keep.then_some(face))
        .collect()
}
