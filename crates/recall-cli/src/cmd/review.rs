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

use recall_core::IntervalPreview;
use recall_core::Rating;
use recall_core::ReviewOutcome;
use recall_core::Timestamp;

use crate::collection::Collection;
use crate::error::Fallible;

pub fn review_card(
    directory: Option<String>,
    prefix: &str,
    rating: i64,
    now: Timestamp,
) -> Fallible<()> {
    let mut collection = Collection::new(directory)?;
    let rating = parse_rating(rating);
    let hash = collection.db.resolve_prefix(prefix)?;
    let outcome = collection
        .db
        .apply_review(hash, rating, now, &collection.config)?;
    let card = &outcome.card;
    log::debug!(
        "{} {} S={:.2}d D={:.2}% due={}",
        hash.short(),
        rating,
        card.stability,
        (card.difficulty - 1.0) / 9.0 * 100.0,
        card.next_review
            .map(|ts| ts.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("{}", describe(&outcome, now));
    Ok(())
}

fn parse_rating(value: i64) -> Rating {
    let rating = Rating::clamped(value);
    if i64::from(rating.as_u8()) != value {
        log::warn!("Rating {value} is out of range, using {rating}.");
    }
    rating
}

/// A one-line summary of where the card went.
fn describe(outcome: &ReviewOutcome, now: Timestamp) -> String {
    let state = outcome.card.phase.as_str();
    let Some(next_review) = outcome.card.next_review else {
        return format!("Card is {state}.");
    };
    let interval = if outcome.graduated {
        IntervalPreview::from(outcome)
    } else {
        let minutes = (next_review.into_inner() - now.into_inner()).num_minutes();
        IntervalPreview {
            days: 0,
            minutes: u32::try_from(minutes.max(0)).unwrap_or(u32::MAX),
            graduated: false,
        }
    };
    format!("Card is {state}, due in {interval} ({next_review}).")
}
