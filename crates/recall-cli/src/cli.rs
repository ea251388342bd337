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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::Parser;
use clap::ValueEnum;
use recall_core::Timestamp;

use crate::cmd::add::add_card;
use crate::cmd::due::list_due_cards;
use crate::cmd::preview::preview_card;
use crate::cmd::review::review_card;
use crate::cmd::show::show_card;
use crate::error::Fallible;

const DEFAULT_DUE_LIMIT: usize = 20;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Add a card.
    Add {
        question: String,
        answer: String,
        /// Optional path to the collection directory.
        #[arg(long, short)]
        directory: Option<String>,
    },
    /// Review a card.
    Review {
        /// A prefix of the card's hash.
        card: String,
        /// 1 = Again, 2 = Hard, 3 = Good, 4 = Easy. Other values are clamped.
        #[arg(allow_negative_numbers = true)]
        rating: i64,
        /// Optional path to the collection directory.
        #[arg(long, short)]
        directory: Option<String>,
        /// Review time, instead of the current time.
        #[arg(long)]
        now: Option<String>,
    },
    /// Show when a card would be due for each rating, without reviewing it.
    Preview {
        /// A prefix of the card's hash.
        card: String,
        /// Optional path to the collection directory.
        #[arg(long, short)]
        directory: Option<String>,
        /// Preview time, instead of the current time.
        #[arg(long)]
        now: Option<String>,
        #[arg(long, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List the cards that are due.
    Due {
        /// Optional path to the collection directory.
        #[arg(long, short)]
        directory: Option<String>,
        /// Check against this time, instead of the current time.
        #[arg(long)]
        now: Option<String>,
        /// The most cards to list.
        #[arg(long, default_value_t = DEFAULT_DUE_LIMIT)]
        limit: usize,
    },
    /// Show a card and its scheduling state.
    Show {
        /// A prefix of the card's hash.
        card: String,
        /// Optional path to the collection directory.
        #[arg(long, short)]
        directory: Option<String>,
        #[arg(long, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, PartialEq, Debug)]
pub enum OutputFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Add {
            question,
            answer,
            directory,
        } => add_card(directory, question, answer),
        Command::Review {
            card,
            rating,
            directory,
            now,
        } => review_card(directory, &card, rating, resolve_now(now)?),
        Command::Preview {
            card,
            directory,
            now,
            format,
        } => preview_card(directory, &card, resolve_now(now)?, format),
        Command::Due {
            directory,
            now,
            limit,
        } => list_due_cards(directory, resolve_now(now)?, limit),
        Command::Show {
            card,
            directory,
            format,
        } => show_card(directory, &card, format),
    }
}

/// The `--now` override, or the current time.
fn resolve_now(now: Option<String>) -> Fallible<Timestamp> {
    match now {
        Some(text) => Ok(Timestamp::parse(&text)?),
        None => Ok(Timestamp::now()),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Command::command().debug_assert();
    }

    #[test]
    fn test_parse_review() {
        let command = Command::try_parse_from(["recall", "review", "4878", "-1", "--now", "2026-01-15T12:00:00"]);
        match command {
            Ok(Command::Review {
                card, rating, now, ..
            }) => {
                assert_eq!(card, "4878");
                assert_eq!(rating, -1);
                assert_eq!(now.as_deref(), Some("2026-01-15T12:00:00"));
            }
            _ => panic!("expected a review command"),
        }
    }

    #[test]
    fn test_parse_due_limit() {
        match Command::try_parse_from(["recall", "due"]) {
            Ok(Command::Due { limit, .. }) => assert_eq!(limit, DEFAULT_DUE_LIMIT),
            _ => panic!("expected a due command"),
        }
        match Command::try_parse_from(["recall", "due", "--limit", "5"]) {
            Ok(Command::Due { limit, .. }) => assert_eq!(limit, 5),
            _ => panic!("expected a due command"),
        }
    }

    #[test]
    fn test_resolve_now() -> Fallible<()> {
        let now = resolve_now(Some("2026-01-15T12:00:00".to_string()))?;
        assert_eq!(now.to_string(), "2026-01-15T12:00:00Z");
        assert!(resolve_now(Some("noon".to_string())).is_err());
        Ok(())
    }
}
