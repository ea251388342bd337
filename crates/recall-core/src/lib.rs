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

//! A deterministic spaced repetition scheduler.
//!
//! The engine takes a card snapshot, a rating and the current time, and
//! returns a new snapshot. It does no I/O and keeps no state between calls.

pub mod config;
pub mod fsrs;
pub mod preview;
pub mod scheduler;
pub mod types;

pub use config::SchedulingConfig;
pub use fsrs::Rating;
pub use preview::IntervalPreview;
pub use preview::preview_intervals;
pub use scheduler::ReviewOutcome;
pub use scheduler::review;
pub use types::card_state::CardState;
pub use types::card_state::Phase;
pub use types::card_state::Track;
pub use types::timestamp::Timestamp;
