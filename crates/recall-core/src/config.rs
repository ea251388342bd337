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

use serde::Deserialize;
use serde::Serialize;

use crate::types::card_state::Track;

/// Minutes between the learning steps of a new card.
pub const DEFAULT_LEARNING_STEPS: [u32; 2] = [1, 10];

/// Minutes between the relearning steps of a lapsed card.
pub const DEFAULT_RELEARNING_STEPS: [u32; 1] = [10];

/// The desired recall probability.
pub const DEFAULT_RETENTION: f64 = 0.9;

/// The maximum review interval in days.
pub const DEFAULT_MAX_INTERVAL_DAYS: u32 = 3650;

/// Per-call scheduling parameters. Values are expected to be validated by
/// whoever builds this.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SchedulingConfig {
    pub learning_steps: Vec<u32>,
    pub relearning_steps: Vec<u32>,
    pub desired_retention: f64,
    pub max_interval_days: u32,
}

impl SchedulingConfig {
    pub fn steps(&self, track: Track) -> &[u32] {
        match track {
            Track::Learning => &self.learning_steps,
            Track::Relearning => &self.relearning_steps,
        }
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            learning_steps: DEFAULT_LEARNING_STEPS.to_vec(),
            relearning_steps: DEFAULT_RELEARNING_STEPS.to_vec(),
            desired_retention: DEFAULT_RETENTION,
            max_interval_days: DEFAULT_MAX_INTERVAL_DAYS,
        }
    }
}

/// The delay of a step in minutes. Indices past the end use the last step;
/// an empty list has no delay.
pub fn step_minutes(steps: &[u32], index: usize) -> u32 {
    match steps.last() {
        None => 0,
        Some(last) => steps.get(index).copied().unwrap_or(*last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchedulingConfig::default();
        assert_eq!(config.steps(Track::Learning), &[1, 10]);
        assert_eq!(config.steps(Track::Relearning), &[10]);
        assert_eq!(config.desired_retention, 0.9);
        assert_eq!(config.max_interval_days, 3650);
    }

    #[test]
    fn test_step_minutes() {
        assert_eq!(step_minutes(&[1, 10], 0), 1);
        assert_eq!(step_minutes(&[1, 10], 1), 10);
        assert_eq!(step_minutes(&[1, 10], 7), 10);
        assert_eq!(step_minutes(&[], 0), 0);
        assert_eq!(step_minutes(&[], 3), 0);
    }
}
