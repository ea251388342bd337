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

use serde::Deserialize;
use serde::Serialize;

use crate::fsrs::Difficulty;
use crate::fsrs::Stability;
use crate::types::timestamp::Timestamp;

/// Which step list a stepped card is walking through.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Track {
    /// First-time learning.
    Learning,
    /// Learning again after a lapse from review.
    Relearning,
}

/// Where a card is in the scheduling lifecycle.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Phase {
    /// The card has never been reviewed.
    New,
    /// The card is being learned for the first time, at the given index of
    /// the learning steps.
    Learning { step: usize },
    /// The card is scheduled in days.
    Review,
    /// The card lapsed and is being relearned, at the given index of the
    /// relearning steps.
    Relearning { step: usize },
}

impl Phase {
    pub fn stepped(track: Track, step: usize) -> Self {
        match track {
            Track::Learning => Phase::Learning { step },
            Track::Relearning => Phase::Relearning { step },
        }
    }

    /// The step list this phase walks, if any.
    pub fn track(&self) -> Option<Track> {
        match self {
            Phase::Learning { .. } => Some(Track::Learning),
            Phase::Relearning { .. } => Some(Track::Relearning),
            Phase::New | Phase::Review => None,
        }
    }

    /// The step index, or zero for phases without one.
    pub fn step(&self) -> usize {
        match self {
            Phase::Learning { step } | Phase::Relearning { step } => *step,
            Phase::New | Phase::Review => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::New => "new",
            Phase::Learning { .. } => "learning",
            Phase::Review => "review",
            Phase::Relearning { .. } => "relearning",
        }
    }

    /// Rebuilds a phase from its flattened `(state, step)` form. The step is
    /// ignored for states that have none.
    pub fn from_parts(state: &str, step: usize) -> Option<Self> {
        match state {
            "new" => Some(Phase::New),
            "learning" => Some(Phase::Learning { step }),
            "review" => Some(Phase::Review),
            "relearning" => Some(Phase::Relearning { step }),
            _ => None,
        }
    }
}

/// A snapshot of a card's scheduling state.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardState {
    pub stability: Stability,
    pub difficulty: Difficulty,
    /// The last committed interval in days. Zero while on a step.
    pub interval_days: u32,
    /// Number of reviews processed.
    pub repetitions: u32,
    /// Number of times the card was forgotten.
    pub lapses: u32,
    #[serde(flatten)]
    pub phase: Phase,
    pub next_review: Option<Timestamp>,
    pub last_review: Option<Timestamp>,
}

impl CardState {
    /// The state of a freshly authored card.
    pub fn new() -> Self {
        Self {
            stability: 0.0,
            difficulty: 0.0,
            interval_days: 0,
            repetitions: 0,
            lapses: 0,
            phase: Phase::New,
            next_review: None,
            last_review: None,
        }
    }

    /// True if the card should be shown at `now`. Cards that were never
    /// scheduled are always due.
    pub fn is_due(&self, now: Timestamp) -> bool {
        match self.next_review {
            None => true,
            Some(next_review) => next_review <= now,
        }
    }
}

impl Default for CardState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_new_card() {
        let card = CardState::new();
        assert_eq!(card.phase, Phase::New);
        assert_eq!(card.repetitions, 0);
        assert_eq!(card.stability, 0.0);
        assert_eq!(card, CardState::default());
    }

    #[test]
    fn test_phase_parts() {
        for phase in [
            Phase::New,
            Phase::Learning { step: 1 },
            Phase::Review,
            Phase::Relearning { step: 0 },
        ] {
            assert_eq!(Phase::from_parts(phase.as_str(), phase.step()), Some(phase));
        }
        assert_eq!(Phase::from_parts("review", 3), Some(Phase::Review));
        assert_eq!(Phase::from_parts("suspended", 0), None);
    }

    #[test]
    fn test_phase_track() {
        assert_eq!(Phase::Learning { step: 0 }.track(), Some(Track::Learning));
        assert_eq!(Phase::Relearning { step: 0 }.track(), Some(Track::Relearning));
        assert_eq!(Phase::Review.track(), None);
        assert_eq!(Phase::stepped(Track::Relearning, 2), Phase::Relearning { step: 2 });
    }

    #[test]
    fn test_is_due() {
        let now = Timestamp::new(Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap());
        let mut card = CardState::new();
        assert!(card.is_due(now));
        card.next_review = Some(now);
        assert!(card.is_due(now));
        card.next_review = Some(now.plus_minutes(1));
        assert!(!card.is_due(now));
    }

    #[test]
    fn test_serialized_shape() {
        let now = Timestamp::new(Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap());
        let card = CardState {
            stability: 3.7145,
            difficulty: 5.1618,
            interval_days: 0,
            repetitions: 1,
            lapses: 0,
            phase: Phase::Learning { step: 1 },
            next_review: Some(now.plus_minutes(10)),
            last_review: Some(now),
        };
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["state"], "learning");
        assert_eq!(json["step"], 1);
        assert_eq!(json["next_review"], "2026-01-15T12:10:00Z");
        let back: CardState = serde_json::from_value(json).unwrap();
        assert_eq!(back, card);
    }
}
