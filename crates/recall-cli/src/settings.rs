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

use std::fs::read_to_string;
use std::path::Path;

use recall_core::SchedulingConfig;
use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;

const MIN_RETENTION: f64 = 0.70;

const MAX_RETENTION: f64 = 0.99;

const MIN_INTERVAL_DAYS: i64 = 1;

const MAX_INTERVAL_DAYS: i64 = 3650;

/// Per-user scheduling settings, as written in `recall.toml`.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Comma-separated minutes, e.g. `"1,10"`.
    pub learning_steps: String,
    /// Comma-separated minutes, e.g. `"10"`.
    pub relearning_steps: String,
    pub desired_retention: f64,
    pub max_interval_days: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            learning_steps: "1,10".to_string(),
            relearning_steps: "10".to_string(),
            desired_retention: 0.9,
            max_interval_days: 365,
        }
    }
}

impl Settings {
    /// Reads settings from `path`. A missing file means default settings.
    pub fn load(path: &Path) -> Fallible<Self> {
        if !path.exists() {
            log::debug!("No settings file, using defaults.");
            return Ok(Self::default());
        }
        log::debug!("Loading settings from {}", path.display());
        let content = read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        let settings: Settings = toml::from_str(content)?;
        Ok(settings)
    }

    /// Validates the settings and builds the scheduler's configuration.
    pub fn resolve(&self) -> Fallible<SchedulingConfig> {
        let learning_steps = parse_steps(&self.learning_steps)?;
        let relearning_steps = parse_steps(&self.relearning_steps)?;

        if !self.desired_retention.is_finite() {
            return fail(format!(
                "desired_retention must be a number, got {}",
                self.desired_retention
            ));
        }
        let desired_retention = self.desired_retention.clamp(MIN_RETENTION, MAX_RETENTION);
        if desired_retention != self.desired_retention {
            log::warn!(
                "desired_retention {} is out of range, using {desired_retention}.",
                self.desired_retention
            );
        }

        let max_interval_days = self
            .max_interval_days
            .clamp(MIN_INTERVAL_DAYS, MAX_INTERVAL_DAYS);
        if max_interval_days != self.max_interval_days {
            log::warn!(
                "max_interval_days {} is out of range, using {max_interval_days}.",
                self.max_interval_days
            );
        }

        Ok(SchedulingConfig {
            learning_steps,
            relearning_steps,
            desired_retention,
            max_interval_days: max_interval_days as u32,
        })
    }
}

/// Parses a comma-separated list of minute delays. An empty or blank string
/// is an empty list.
pub fn parse_steps(text: &str) -> Fallible<Vec<u32>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut steps = Vec::new();
    for item in text.split(',') {
        let item = item.trim();
        if item.is_empty() {
            return fail(format!("empty step in step list \"{text}\""));
        }
        match item.parse::<u32>() {
            Ok(minutes) => steps.push(minutes),
            Err(_) => return fail(format!("invalid step \"{item}\" in step list \"{text}\"")),
        }
    }
    Ok(steps)
}
