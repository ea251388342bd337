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

use std::collections::HashSet;

use recall_core::CardState;
use recall_core::Phase;
use recall_core::Rating;
use recall_core::ReviewOutcome;
use recall_core::SchedulingConfig;
use recall_core::Timestamp;
use recall_core::review;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::TransactionBehavior;
use rusqlite::config::DbConfig;
use rusqlite::params;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::card_hash::CardHash;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating schema in {database_path}");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }

    /// Insert a new card in the database, in the `New` state.
    ///
    /// If a card with the same hash exists, returns an error.
    pub fn insert_card(&mut self, card: &Card, added_at: Timestamp) -> Fallible<()> {
        let card_hash = card.hash();
        let tx = self.conn.transaction()?;
        if card_exists(&tx, card_hash)? {
            return fail(format!("card {} already exists.", card_hash.short()));
        }
        log::debug!("Adding new card: {card_hash}");
        tx.execute(
            "insert into cards (card_hash, question, answer, added_at) values (?, ?, ?, ?);",
            params![card_hash, card.question(), card.answer(), added_at.to_string()],
        )?;
        write_state(&tx, card_hash, &CardState::new())?;
        tx.commit()?;
        Ok(())
    }

    /// Return the set of all card hashes in the database.
    pub fn card_hashes(&self) -> Fallible<HashSet<CardHash>> {
        let mut hashes = HashSet::new();
        let mut stmt = self.conn.prepare("select card_hash from cards;")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let hash: CardHash = row.get(0)?;
            hashes.insert(hash);
        }
        Ok(hashes)
    }

    /// Find the one card whose hash starts with `prefix`.
    pub fn resolve_prefix(&self, prefix: &str) -> Fallible<CardHash> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return fail("empty card prefix.");
        }
        let mut matches: Vec<CardHash> = self
            .card_hashes()?
            .into_iter()
            .filter(|hash| hash.matches_prefix(prefix))
            .collect();
        match matches.len() {
            0 => fail(format!("no card matches \"{prefix}\".")),
            1 => Ok(matches.remove(0)),
            n => fail(format!("\"{prefix}\" is ambiguous: it matches {n} cards.")),
        }
    }

    /// Get a card's content.
    ///
    /// If no card with the given hash exists, returns an error.
    pub fn get_card(&self, card_hash: CardHash) -> Fallible<Card> {
        let sql = "select question, answer from cards where card_hash = ?;";
        let row: Option<(String, String)> = self
            .conn
            .query_row(sql, [card_hash], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?;
        match row {
            Some((question, answer)) => Ok(Card::new(question, answer)),
            None => fail(format!("no card with hash {card_hash}.")),
        }
    }

    /// Get a card's scheduling state.
    ///
    /// If no card with the given hash exists, returns an error.
    pub fn get_card_state(&self, card_hash: CardHash) -> Fallible<CardState> {
        read_state(&self.conn, card_hash)
    }

    /// The cards due at `now`, never-reviewed cards first, then by due time.
    pub fn due_cards(&self, now: Timestamp) -> Fallible<Vec<(CardHash, CardState)>> {
        let sql = format!("select card_hash, {STATE_COLUMNS} from card_states;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut due = Vec::new();
        while let Some(row) = rows.next()? {
            let hash: CardHash = row.get(0)?;
            let state = StateRow::read(row, 1)?.into_state()?;
            if state.is_due(now) {
                due.push((hash, state));
            }
        }
        due.sort_by(|(a_hash, a), (b_hash, b)| {
            a.next_review
                .cmp(&b.next_review)
                .then_with(|| a_hash.cmp(b_hash))
        });
        Ok(due)
    }

    /// Review a card and save the result.
    ///
    /// Reading the old state and writing the new one happen in a single
    /// write transaction, so concurrent reviews of the same card cannot
    /// overwrite each other.
    pub fn apply_review(
        &mut self,
        card_hash: CardHash,
        rating: Rating,
        now: Timestamp,
        config: &SchedulingConfig,
    ) -> Fallible<ReviewOutcome> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let state = read_state(&tx, card_hash)?;
        let outcome = review(&state, rating, now, config);
        write_state(&tx, card_hash, &outcome.card)?;
        insert_review(&tx, card_hash, rating, now, &outcome.card)?;
        tx.commit()?;
        Ok(outcome)
    }

    /// The number of reviews logged for a card.
    pub fn review_count(&self, card_hash: CardHash) -> Fallible<usize> {
        let sql = "select count(*) from reviews where card_hash = ?;";
        let count: i64 = self.conn.query_row(sql, [card_hash], |row| row.get(0))?;
        Ok(count as usize)
    }
}

const STATE_COLUMNS: &str = "stability, difficulty, interval_days, repetitions, lapses, state, learning_step, next_review, last_review";

/// A `card_states` row as stored.
struct StateRow {
    stability: f64,
    difficulty: f64,
    interval_days: u32,
    repetitions: u32,
    lapses: u32,
    state: String,
    learning_step: i64,
    next_review: Option<String>,
    last_review: Option<String>,
}

impl StateRow {
    /// Reads the `STATE_COLUMNS`, starting at column `offset`.
    fn read(row: &Row, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            stability: row.get(offset)?,
            difficulty: row.get(offset + 1)?,
            interval_days: row.get(offset + 2)?,
            repetitions: row.get(offset + 3)?,
            lapses: row.get(offset + 4)?,
            state: row.get(offset + 5)?,
            learning_step: row.get(offset + 6)?,
            next_review: row.get(offset + 7)?,
            last_review: row.get(offset + 8)?,
        })
    }

    fn into_state(self) -> Fallible<CardState> {
        let step = usize::try_from(self.learning_step)
            .map_err(|_| ErrorReport::new(format!("invalid learning step: {}", self.learning_step)))?;
        let phase = Phase::from_parts(&self.state, step)
            .ok_or_else(|| ErrorReport::new(format!("invalid card state: {}", self.state)))?;
        let next_review = self.next_review.as_deref().map(Timestamp::parse).transpose()?;
        let last_review = self.last_review.as_deref().map(Timestamp::parse).transpose()?;
        Ok(CardState {
            stability: self.stability,
            difficulty: self.difficulty,
            interval_days: self.interval_days,
            repetitions: self.repetitions,
            lapses: self.lapses,
            phase,
            next_review,
            last_review,
        })
    }
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["cards"], |row| row.get(0))?;
    Ok(count > 0)
}

fn card_exists(conn: &Connection, card_hash: CardHash) -> Fallible<bool> {
    let sql = "select count(*) from cards where card_hash = ?;";
    let count: i64 = conn.query_row(sql, [card_hash], |row| row.get(0))?;
    Ok(count > 0)
}

fn read_state(conn: &Connection, card_hash: CardHash) -> Fallible<CardState> {
    let sql = format!("select {STATE_COLUMNS} from card_states where card_hash = ?;");
    let row: Option<StateRow> = conn
        .query_row(&sql, [card_hash], |row| StateRow::read(row, 0))
        .optional()?;
    match row {
        Some(row) => row.into_state(),
        None => fail(format!("no card with hash {card_hash}.")),
    }
}

fn write_state(tx: &Transaction, card_hash: CardHash, state: &CardState) -> Fallible<()> {
    let sql = format!(
        "insert into card_states (card_hash, {STATE_COLUMNS}) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         on conflict (card_hash) do update set
             stability = excluded.stability,
             difficulty = excluded.difficulty,
             interval_days = excluded.interval_days,
             repetitions = excluded.repetitions,
             lapses = excluded.lapses,
             state = excluded.state,
             learning_step = excluded.learning_step,
             next_review = excluded.next_review,
             last_review = excluded.last_review;"
    );
    tx.execute(
        &sql,
        params![
            card_hash,
            state.stability,
            state.difficulty,
            state.interval_days,
            state.repetitions,
            state.lapses,
            state.phase.as_str(),
            state.phase.step() as i64,
            state.next_review.map(|ts| ts.to_string()),
            state.last_review.map(|ts| ts.to_string()),
        ],
    )?;
    Ok(())
}

fn insert_review(
    tx: &Transaction,
    card_hash: CardHash,
    rating: Rating,
    reviewed_at: Timestamp,
    state: &CardState,
) -> Fallible<()> {
    let sql = "insert into reviews (card_hash, reviewed_at, rating, stability, difficulty, interval_days, state, learning_step) values (?, ?, ?, ?, ?, ?, ?, ?);";
    tx.execute(
        sql,
        params![
            card_hash,
            reviewed_at.to_string(),
            rating.as_u8(),
            state.stability,
            state.difficulty,
            state.interval_days,
            state.phase.as_str(),
            state.phase.step() as i64,
        ],
    )?;
    Ok(())
}
