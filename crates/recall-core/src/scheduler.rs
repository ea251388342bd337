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

//! The review state machine. A card moves from `New` through the learning
//! steps into `Review`, and back through the relearning steps when it is
//! forgotten. Every review also updates the memory model.

use crate::config::SchedulingConfig;
use crate::config::step_minutes;
use crate::fsrs::Difficulty;
use crate::fsrs::Rating;
use crate::fsrs::Retrievability;
use crate::fsrs::Stability;
use crate::fsrs::initial_difficulty;
use crate::fsrs::initial_stability;
use crate::fsrs::interval_for_stability;
use crate::fsrs::next_difficulty;
use crate::fsrs::retrievability;
use crate::fsrs::stability_after_forgetting;
use crate::fsrs::stability_after_recall;
use crate::types::card_state::CardState;
use crate::types::card_state::Phase;
use crate::types::card_state::Track;
use crate::types::timestamp::Timestamp;

/// The result of reviewing a card.
#[derive(Clone, PartialEq, Debug)]
pub struct ReviewOutcome {
    /// The card's new state.
    pub card: CardState,
    /// Minutes until the card is shown again within the session. Zero when
    /// the card was scheduled in days.
    pub again_in_minutes: u32,
    /// True if the card is now in review with a fresh interval.
    pub graduated: bool,
}

/// How a review changes the card's stability.
#[derive(Clone, Copy, PartialEq, Debug)]
enum Memory {
    /// First review: stability and difficulty come from the rating alone.
    Initialize,
    /// Leave stability as it is.
    Keep,
    /// The card was remembered.
    Recall,
    /// The card was forgotten.
    Forget,
}

/// Where a review sends the card.
#[derive(Clone, Copy, PartialEq, Debug)]
enum Next {
    /// Onto a step of a step list, due again in `minutes`.
    Step {
        track: Track,
        step: usize,
        minutes: u32,
    },
    /// Into review, due again in days.
    Graduate,
    /// From review onto the first relearning step.
    Lapse { minutes: u32 },
}

#[derive(Clone, Copy, PartialEq, Debug)]
struct Transition {
    memory: Memory,
    next: Next,
    /// Whether the review counts as a lapse.
    lapse: bool,
}

impl Transition {
    fn new(memory: Memory, next: Next) -> Self {
        Self {
            memory,
            next,
            lapse: false,
        }
    }

    fn with_lapse(self) -> Self {
        Self {
            lapse: true,
            ..self
        }
    }
}

/// Reviews `card` with `rating` at `now`.
///
/// The input is left untouched; the new state is returned in the outcome.
pub fn review(
    card: &CardState,
    rating: Rating,
    now: Timestamp,
    config: &SchedulingConfig,
) -> ReviewOutcome {
    // A card without stability has never really been reviewed.
    let phase = if card.stability <= 0.0 {
        Phase::New
    } else {
        card.phase
    };
    let transition = plan(phase, rating, config);

    let elapsed = match card.last_review {
        Some(last_review) => now.days_since(last_review),
        None => 0.0,
    };
    let r = retrievability(elapsed, card.stability);
    let (stability, difficulty) = update_memory(card, phase, transition.memory, rating, r);

    let lapses = if transition.lapse {
        card.lapses.saturating_add(1)
    } else {
        card.lapses
    };
    let (phase, interval_days, next_review, again_in_minutes, graduated) = match transition.next
    {
        Next::Step {
            track,
            step,
            minutes,
        } => (
            Phase::stepped(track, step),
            0,
            now.plus_minutes(minutes),
            minutes,
            false,
        ),
        Next::Lapse { minutes } => {
            // Without relearning steps, come back tomorrow.
            let next_review = if minutes > 0 {
                now.plus_minutes(minutes)
            } else {
                now.plus_days(1)
            };
            (Phase::Relearning { step: 0 }, 0, next_review, minutes, false)
        }
        Next::Graduate => {
            let interval = interval_for_stability(
                stability,
                config.desired_retention,
                config.max_interval_days,
            );
            (Phase::Review, interval, now.plus_days(interval), 0, true)
        }
    };

    ReviewOutcome {
        card: CardState {
            stability,
            difficulty,
            interval_days,
            repetitions: card.repetitions.saturating_add(1),
            lapses,
            phase,
            next_review: Some(next_review),
            last_review: Some(now),
        },
        again_in_minutes,
        graduated,
    }
}

/// The transition table.
fn plan(phase: Phase, rating: Rating, config: &SchedulingConfig) -> Transition {
    use Memory::*;
    use Phase::*;
    use Rating::*;

    let track = phase.track().unwrap_or(Track::Learning);
    let steps = config.steps(track);
    // Steps may have been shortened since the card was last seen.
    let step = phase.step().min(steps.len().saturating_sub(1));

    match (phase, rating) {
        (New, Again) => Transition::new(Initialize, on_step(track, steps, 0)).with_lapse(),
        (New, Hard) => Transition::new(Initialize, hard_step(track, steps, 0)),
        (New, Good) if steps.len() < 2 => Transition::new(Initialize, Next::Graduate),
        (New, Good) => Transition::new(Initialize, on_step(track, steps, 1)),
        (New, Easy) => Transition::new(Initialize, Next::Graduate),

        (Learning { .. }, Again) => Transition::new(Forget, on_step(track, steps, 0)),
        (Relearning { .. }, Again) => {
            Transition::new(Forget, on_step(track, steps, 0)).with_lapse()
        }
        (Learning { .. } | Relearning { .. }, Hard) => {
            Transition::new(Keep, hard_step(track, steps, step))
        }
        (Learning { .. } | Relearning { .. }, Good) if step + 1 >= steps.len() => {
            Transition::new(Recall, Next::Graduate)
        }
        (Learning { .. } | Relearning { .. }, Good) => {
            Transition::new(Keep, on_step(track, steps, step + 1))
        }
        (Learning { .. } | Relearning { .. }, Easy) => Transition::new(Recall, Next::Graduate),

        (Review, Again) => {
            let minutes = step_minutes(config.steps(Track::Relearning), 0);
            Transition::new(Forget, Next::Lapse { minutes }).with_lapse()
        }
        (Review, Hard | Good | Easy) => Transition::new(Recall, Next::Graduate),
    }
}

fn on_step(track: Track, steps: &[u32], step: usize) -> Next {
    Next::Step {
        track,
        step,
        minutes: step_minutes(steps, step),
    }
}

/// Stays on `step`, waiting halfway between it and the following step.
fn hard_step(track: Track, steps: &[u32], step: usize) -> Next {
    let minutes = match (steps.get(step), steps.get(step + 1)) {
        (Some(current), Some(following)) => current.midpoint(*following),
        _ => step_minutes(steps, step),
    };
    Next::Step {
        track,
        step,
        minutes,
    }
}

/// Computes the new stability and difficulty. Stability updates use the
/// difficulty from before this review.
///
/// A stepped card without a difficulty starts from the initial difficulty,
/// while a review card always moves by `next_difficulty`. Stability formulas
/// need a positive difficulty, so a missing one reads as the initial value.
fn update_memory(
    card: &CardState,
    phase: Phase,
    memory: Memory,
    rating: Rating,
    r: Retrievability,
) -> (Stability, Difficulty) {
    if memory == Memory::Initialize {
        return (initial_stability(rating), initial_difficulty(rating));
    }
    let has_difficulty = card.difficulty > 0.0;
    let difficulty = if has_difficulty || phase == Phase::Review {
        next_difficulty(card.difficulty, rating)
    } else {
        initial_difficulty(rating)
    };
    let prior_difficulty = if has_difficulty {
        card.difficulty
    } else {
        initial_difficulty(rating)
    };
    let s = card.stability;
    let remembered_before = s > 0.0 && r > 0.0;
    let stability = match memory {
        Memory::Recall if remembered_before => {
            stability_after_recall(prior_difficulty, s, r, rating)
        }
        Memory::Recall => initial_stability(rating),
        Memory::Forget if remembered_before => stability_after_forgetting(prior_difficulty, s, r),
        Memory::Forget | Memory::Keep | Memory::Initialize => s,
    };
    (stability, difficulty)
}
