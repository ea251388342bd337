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

use recall_core::Timestamp;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::card_hash::CardHash;

pub fn add_card(directory: Option<String>, question: String, answer: String) -> Fallible<()> {
    let mut collection = Collection::new(directory)?;
    let hash = insert(&mut collection, question, answer, Timestamp::now())?;
    println!(
        "Added card {} to {}.",
        hash.short(),
        collection.directory.display()
    );
    Ok(())
}

fn insert(
    collection: &mut Collection,
    question: String,
    answer: String,
    now: Timestamp,
) -> Fallible<CardHash> {
    let card = Card::new(question, answer);
    if card.question().is_empty() {
        return fail("the question is empty.");
    }
    if card.answer().is_empty() {
        return fail("the answer is empty.");
    }
    collection.db.insert_card(&card, now)?;
    Ok(card.hash())
}

#[cfg(test)]
mod tests {
    use recall_core::Phase;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_add_card() -> Fallible<()> {
        let dir = tempdir()?;
        let directory = Some(dir.path().display().to_string());
        add_card(directory.clone(), "2 + 2".to_string(), "4".to_string())?;
        let collection = Collection::new(directory)?;
        let hash = Card::new("2 + 2", "4").hash();
        assert_eq!(collection.db.get_card(hash)?.answer(), "4");
        assert_eq!(collection.db.get_card_state(hash)?.phase, Phase::New);
        Ok(())
    }

    #[test]
    fn test_add_duplicate() -> Fallible<()> {
        let dir = tempdir()?;
        let mut collection = Collection::new(Some(dir.path().display().to_string()))?;
        let now = Timestamp::parse("2026-01-15T12:00:00Z")?;
        insert(&mut collection, "Q".to_string(), "A".to_string(), now)?;
        assert!(insert(&mut collection, " Q ".to_string(), "A".to_string(), now).is_err());
        Ok(())
    }

    #[test]
    fn test_add_empty() -> Fallible<()> {
        let dir = tempdir()?;
        let mut collection = Collection::new(Some(dir.path().display().to_string()))?;
        let now = Timestamp::parse("2026-01-15T12:00:00Z")?;
        assert!(insert(&mut collection, "  ".to_string(), "A".to_string(), now).is_err());
        assert!(insert(&mut collection, "Q".to_string(), "".to_string(), now).is_err());
        assert!(collection.db.card_hashes()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_directory() {
        let result = add_card(
            Some("./no-such-collection".to_string()),
            "Q".to_string(),
            "A".to_string(),
        );
        assert!(result.is_err());
    }
}
