// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The FSRS memory model: closed-form difficulty, stability and
//! retrievability updates. Nothing here knows about learning steps.

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

/// Days until recall probability decays to the reference level.
pub type Stability = f64;

/// Unitless, in [1, 10] once initialized.
pub type Difficulty = f64;

/// Probability of recall, in [0, 1].
pub type Retrievability = f64;

/// Identifies the weight table below. Bump it whenever `W`, `DECAY` or
/// `FACTOR` change: stored card states computed with another table follow a
/// different trajectory and need migrating.
pub const PARAMETERS_VERSION: &str = "fsrs-4.5";

/// FSRS-4.5 default weights.
pub const W: [f64; 17] = [
    0.4872, 1.4003, 3.7145, 13.8206, 5.1618, 1.2298, 0.8975, 0.031, 1.6474, 0.1367, 1.0461,
    2.1072, 0.0793, 0.3246, 1.587, 0.2272, 2.8755,
];

pub const DECAY: f64 = -0.5;

pub const FACTOR: f64 = 19.0 / 81.0;

const MIN_STABILITY: Stability = 0.01;

const MIN_DIFFICULTY: Difficulty = 1.0;

const MAX_DIFFICULTY: Difficulty = 10.0;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Again = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    /// Maps any integer onto a rating. Values below 1 become `Again`, values
    /// above 4 become `Easy`.
    pub fn clamped(value: i64) -> Self {
        match value.clamp(1, 4) {
            1 => Rating::Again,
            2 => Rating::Hard,
            3 => Rating::Good,
            _ => Rating::Easy,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Again => "again",
            Rating::Hard => "hard",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }

    fn index(self) -> usize {
        self as usize - 1
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> f64 {
        rating.as_u8() as f64
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn clamp_difficulty(d: Difficulty) -> Difficulty {
    d.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

/// S_0(G) = w[G-1]
pub fn initial_stability(rating: Rating) -> Stability {
    W[rating.index()].max(MIN_STABILITY)
}

/// D_0(G) = w4 - (G-3) * w5
pub fn initial_difficulty(rating: Rating) -> Difficulty {
    let g: f64 = rating.into();
    clamp_difficulty(W[4] - (g - 3.0) * W[5])
}

/// Shifts difficulty by the rating, then reverts it a little towards the
/// difficulty of a first `Good`.
pub fn next_difficulty(d: Difficulty, rating: Rating) -> Difficulty {
    let g: f64 = rating.into();
    let shifted = d - W[6] * (g - 3.0);
    clamp_difficulty(W[7] * initial_difficulty(Rating::Good) + (1.0 - W[7]) * shifted)
}

/// R(t, S) = (1 + FACTOR * t/S)^DECAY
pub fn retrievability(elapsed_days: f64, s: Stability) -> Retrievability {
    if s <= 0.0 {
        return 0.0;
    }
    (1.0 + FACTOR * elapsed_days / s).powf(DECAY)
}

/// The number of days until retrievability falls to `retention`, rounded and
/// clamped to `[1, max_days]`.
pub fn interval_for_stability(s: Stability, retention: f64, max_days: u32) -> u32 {
    let max_days = max_days.max(1) as f64;
    let interval = s / FACTOR * (retention.powf(1.0 / DECAY) - 1.0);
    interval.round_ties_even().clamp(1.0, max_days) as u32
}

pub fn stability_after_recall(
    d: Difficulty,
    s: Stability,
    r: Retrievability,
    rating: Rating,
) -> Stability {
    let hard_penalty = if rating == Rating::Hard { W[15] } else { 1.0 };
    let easy_bonus = if rating == Rating::Easy { W[16] } else { 1.0 };
    let growth = W[8].exp()
        * (11.0 - d)
        * s.powf(-W[9])
        * ((W[10] * (1.0 - r)).exp() - 1.0)
        * hard_penalty
        * easy_bonus;
    (s * (growth + 1.0)).max(MIN_STABILITY)
}

pub fn stability_after_forgetting(d: Difficulty, s: Stability, r: Retrievability) -> Stability {
    let s_f = W[11] * d.powf(-W[12]) * ((s + 1.0).powf(W[13]) - 1.0) * (W[14] * (1.0 - r)).exp();
    s_f.max(MIN_STABILITY)
}
