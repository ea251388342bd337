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

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;

use serde::Serialize;

use crate::config::SchedulingConfig;
use crate::fsrs::Rating;
use crate::scheduler::ReviewOutcome;
use crate::scheduler::review;
use crate::types::card_state::CardState;
use crate::types::timestamp::Timestamp;

const MINUTES_PER_HOUR: u32 = 60;

const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;

/// What would happen to a card if it were given a particular rating.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct IntervalPreview {
    /// Days until the card is due, if it graduates.
    pub days: u32,
    /// Minutes until the card is shown again, if it does not.
    pub minutes: u32,
    pub graduated: bool,
}

impl From<&ReviewOutcome> for IntervalPreview {
    fn from(outcome: &ReviewOutcome) -> Self {
        if outcome.graduated {
            Self {
                days: outcome.card.interval_days,
                minutes: 0,
                graduated: true,
            }
        } else {
            Self {
                days: 0,
                minutes: outcome.again_in_minutes,
                graduated: false,
            }
        }
    }
}

impl Display for IntervalPreview {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.graduated {
            write!(f, "{}d", self.days)
        } else if self.minutes >= MINUTES_PER_DAY {
            write!(f, "{}d", self.minutes / MINUTES_PER_DAY)
        } else if self.minutes >= MINUTES_PER_HOUR {
            write!(f, "{}h", self.minutes / MINUTES_PER_HOUR)
        } else {
            write!(f, "{}m", self.minutes)
        }
    }
}

/// Reviews the card once with each rating, without committing anything.
pub fn preview_intervals(
    card: &CardState,
    now: Timestamp,
    config: &SchedulingConfig,
) -> BTreeMap<Rating, IntervalPreview> {
    Rating::ALL
        .into_iter()
        .map(|rating| {
            let outcome = review(card, rating, now, config);
            (rating, IntervalPreview::from(&outcome))
        })
        .collect()
}
