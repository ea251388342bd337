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

use recall_core::IntervalPreview;
use recall_core::Phase;
use recall_core::Rating;
use recall_core::Timestamp;
use recall_core::preview_intervals;

use crate::cli::OutputFormat;
use crate::collection::Collection;
use crate::error::Fallible;

pub fn preview_card(
    directory: Option<String>,
    prefix: &str,
    now: Timestamp,
    format: OutputFormat,
) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let hash = collection.db.resolve_prefix(prefix)?;
    let state = collection.db.get_card_state(hash)?;
    let preview = preview_intervals(&state, now, &collection.config);
    let in_review = state.phase == Phase::Review && state.stability > 0.0;
    println!("{}", render(&preview, in_review, format)?);
    Ok(())
}

fn render(
    preview: &BTreeMap<Rating, IntervalPreview>,
    in_review: bool,
    format: OutputFormat,
) -> Fallible<String> {
    match format {
        OutputFormat::Text => Ok(preview
            .iter()
            .map(|(rating, interval)| format!("{rating}: {}", label(interval, in_review)))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(preview)?),
    }
}

/// A lapse from review with no relearning delay comes back the next day.
fn label(interval: &IntervalPreview, in_review: bool) -> String {
    if in_review && !interval.graduated && interval.minutes == 0 {
        "1d".to_string()
    } else {
        interval.to_string()
    }
}
