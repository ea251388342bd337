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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::card_hash::CardHash;

pub fn list_due_cards(directory: Option<String>, now: Timestamp, limit: usize) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    for line in due_report(&collection, now, limit)? {
        println!("{line}");
    }
    Ok(())
}

/// One line per due card, at most `limit` of them, then the total.
fn due_report(collection: &Collection, now: Timestamp, limit: usize) -> Fallible<Vec<String>> {
    let due = collection.db.due_cards(now)?;
    let mut lines = Vec::new();
    for (hash, state) in due.iter().take(limit) {
        let card = collection.db.get_card(*hash)?;
        lines.push(due_line(*hash, state, card.question()));
    }
    if due.len() > limit {
        lines.push(format!("{} due, showing {limit}.", due.len()));
    } else {
        lines.push(format!("{} due.", due.len()));
    }
    Ok(lines)
}

fn due_line(hash: CardHash, state: &CardState, question: &str) -> String {
    let question = question.lines().next().unwrap_or_default();
    format!("{}  {:<10}  {}", hash.short(), state.phase.as_str(), question)
}
