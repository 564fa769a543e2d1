//! Individual (roster entry) model.
//!
//! An individual is a rated participant that may be placed on a team.
//! Only eligible individuals take part in a partition; the rest of the
//! roster is carried by the caller and ignored by the engine.
//!
//! # Relationship References
//!
//! `must_with` and `must_not_with` hold free-form references. A reference
//! may be another individual's `id` or their display `name`; the engine
//! resolves both forms once, before any clustering happens.

use serde::{Deserialize, Serialize};

/// A rated participant in the pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Individual {
    /// Unique, stable identifier.
    pub id: String,
    /// Display name (also usable as a relationship reference).
    pub name: String,
    /// Skill rating (typically a half-point scale such as 1.0..=10.0).
    pub skill: f64,
    /// Whether this individual takes part in the partition.
    #[serde(default = "default_eligible")]
    pub eligible: bool,
    /// References (id or name) of individuals that must share a team.
    #[serde(default)]
    pub must_with: Vec<String>,
    /// References (id or name) of individuals that must not share a team.
    #[serde(default)]
    pub must_not_with: Vec<String>,
}

fn default_eligible() -> bool {
    true
}

impl Individual {
    /// Creates an eligible individual with the given id and skill.
    pub fn new(id: impl Into<String>, skill: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            skill,
            eligible: true,
            must_with: Vec::new(),
            must_not_with: Vec::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets eligibility.
    pub fn with_eligible(mut self, eligible: bool) -> Self {
        self.eligible = eligible;
        self
    }

    /// Adds a must-play-with reference.
    pub fn with_must_with(mut self, reference: impl Into<String>) -> Self {
        self.must_with.push(reference.into());
        self
    }

    /// Adds a must-not-play-with reference.
    pub fn with_must_not_with(mut self, reference: impl Into<String>) -> Self {
        self.must_not_with.push(reference.into());
        self
    }

    /// Name for display; falls back to the id when no name is set.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
