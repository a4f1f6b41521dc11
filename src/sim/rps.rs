//! Rock-paper-scissors round resolution
//!
//! The outcome table is the classic beats-relation; the AI hand is drawn
//! uniformly from a seeded PCG stream keyed by round number, so replaying a
//! match with the same seed reproduces every hand.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// One of the three hands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hand {
    Rock,
    Paper,
    Scissors,
}

impl Hand {
    /// Display name, uppercased like the scoreboard expects
    pub fn as_str(&self) -> &'static str {
        match self {
            Hand::Rock => "ROCK",
            Hand::Paper => "PAPER",
            Hand::Scissors => "SCISSOR",
        }
    }

    /// The hand this one defeats
    pub fn beats(&self) -> Hand {
        match self {
            Hand::Rock => Hand::Scissors,
            Hand::Paper => Hand::Rock,
            Hand::Scissors => Hand::Paper,
        }
    }

    fn from_index(i: u8) -> Hand {
        match i % 3 {
            0 => Hand::Rock,
            1 => Hand::Paper,
            _ => Hand::Scissors,
        }
    }
}

/// Result of a single round, from the player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    PlayerWin,
    AiWin,
    Tie,
}

impl Outcome {
    /// Score delta for this outcome
    pub fn score_delta(&self) -> i8 {
        match self {
            Outcome::PlayerWin => 1,
            Outcome::AiWin => -1,
            Outcome::Tie => 0,
        }
    }

    /// Pull direction for the tug animation: a player win drags everyone
    /// toward the AI side (negative x), an AI win the other way.
    pub fn direction(&self) -> i8 {
        match self {
            Outcome::PlayerWin => -1,
            Outcome::AiWin => 1,
            Outcome::Tie => 0,
        }
    }
}

/// Judge a round by the beats-relation
pub fn judge(player: Hand, ai: Hand) -> Outcome {
    if player == ai {
        Outcome::Tie
    } else if player.beats() == ai {
        Outcome::PlayerWin
    } else {
        Outcome::AiWin
    }
}

/// Draw the AI hand for a given round, uniformly over the three hands.
/// Deterministic in (seed, round).
pub fn ai_hand(seed: u64, round: u32) -> Hand {
    let mut rng = Pcg32::seed_from_u64(seed ^ (u64::from(round)).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    Hand::from_index(rng.random_range(0..3))
}
