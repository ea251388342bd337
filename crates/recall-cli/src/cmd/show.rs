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

use recall_core::CardState;
use recall_core::Timestamp;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::card_hash::CardHash;

pub fn show_card(directory: Option<String>, prefix: &str, format: OutputFormat) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let hash = collection.db.resolve_prefix(prefix)?;
    let card = collection.db.get_card(hash)?;
    let details = CardDetails {
        hash,
        question: card.question().to_string(),
        answer: card.answer().to_string(),
        state: collection.db.get_card_state(hash)?,
        review_count: collection.db.review_count(hash)?,
    };
    println!("{}", details.render(format)?);
    Ok(())
}

#[derive(Serialize)]
struct CardDetails {
    hash: CardHash,
    question: String,
    answer: String,
    #[serde(flatten)]
    state: CardState,
    review_count: usize,
}

impl CardDetails {
    fn render(&self, format: OutputFormat) -> Fallible<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Text => {
                let state = &self.state;
                let when = |ts: Option<Timestamp>| {
                    ts.map(|ts| ts.to_string()).unwrap_or_else(|| "never".to_string())
                };
                let lines = [
                    format!("Card:        {}", self.hash),
                    format!("Question:    {}", self.question),
                    format!("Answer:      {}", self.answer),
                    format!("State:       {}", state.phase.as_str()),
                    format!("Stability:   {:.2}d", state.stability),
                    format!("Difficulty:  {:.2}", state.difficulty),
                    format!("Interval:    {}d", state.interval_days),
                    format!("Reviews:     {}", self.review_count),
                    format!("Lapses:      {}", state.lapses),
                    format!("Last review: {}", when(state.last_review)),
                    format!("Next review: {}", when(state.next_review)),
                ];
                Ok(lines.join("\n"))
            }
        }
    }
}
