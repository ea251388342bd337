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

use std::cmp::Ordering;
use std::fmt::Display;
use std::fmt::Formatter;

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// Hex digits shown when a card is named in output.
const SHORT_LEN: usize = 8;

/// Identifies a card by the BLAKE3 hash of its content.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CardHash {
    inner: blake3::Hash,
}

impl CardHash {
    #[cfg(test)]
    pub fn hash_bytes(bytes: &[u8]) -> Self {
        Self {
            inner: blake3::hash(bytes),
        }
    }

    /// Hashes a card's question and answer. The fields are joined by a NUL
    /// byte, so moving text across the boundary changes the hash.
    pub fn of_content(question: &str, answer: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(question.as_bytes());
        hasher.update(&[0]);
        hasher.update(answer.as_bytes());
        Self {
            inner: hasher.finalize(),
        }
    }

    pub fn to_hex(self) -> String {
        self.inner.to_hex().to_string()
    }

    pub fn from_hex(s: &str) -> Fallible<Self> {
        let inner = blake3::Hash::from_hex(s)
            .map_err(|_| ErrorReport::new("invalid hash in card database"))?;
        Ok(Self { inner })
    }

    /// The abbreviated form used in command output.
    pub fn short(self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(SHORT_LEN);
        hex
    }

    /// True if the hex form of this hash begins with `prefix`, ignoring case.
    pub fn matches_prefix(self, prefix: &str) -> bool {
        self.to_hex().starts_with(&prefix.to_ascii_lowercase())
    }
}

impl PartialOrd for CardHash {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CardHash {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.as_bytes().cmp(other.inner.as_bytes())
    }
}

impl ToSql for CardHash {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_hex()))
    }
}

impl FromSql for CardHash {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        CardHash::from_hex(&string).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl Display for CardHash {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for CardHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let hash = CardHash::hash_bytes(b"test");
        assert_eq!(
            hash.to_string(),
            "4878ca0425c739fa427f7eda20fe845f6b2e46ba5fe2a14df5b1e32f50603215"
        );
        assert_eq!(hash.short(), "4878ca04");
    }

    #[test]
    fn test_of_content() {
        assert_eq!(
            CardHash::of_content("Q", "A"),
            CardHash::hash_bytes(b"Q\0A")
        );
        assert_ne!(CardHash::of_content("Q", "A"), CardHash::of_content("A", "Q"));
    }

    #[test]
    fn test_matches_prefix() {
        let hash = CardHash::hash_bytes(b"test");
        assert!(hash.matches_prefix("4878"));
        assert!(hash.matches_prefix("4878CA"));
        assert!(!hash.matches_prefix("4879"));
    }

    #[test]
    fn test_from_hex() -> Fallible<()> {
        let hash = CardHash::hash_bytes(b"test");
        assert_eq!(CardHash::from_hex(&hash.to_hex())?, hash);
        assert!(CardHash::from_hex("not a hash").is_err());
        Ok(())
    }

    #[test]
    fn test_ordering() -> Fallible<()> {
        let a =
            CardHash::from_hex("0000000000000000000000000000000000000000000000000000000000000000")?;
        let b =
            CardHash::from_hex("0000000000000000000000000000000000000000000000000000000000000001")?;
        assert!(a < b);
        Ok(())
    }
}
