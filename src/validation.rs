//! Input validation for rosters.
//!
//! Checks structural integrity of a roster before partitioning.
//! Detects:
//! - Empty IDs
//! - Duplicate IDs
//! - Non-finite skill ratings
//!
//! Unresolvable relationship references are *not* errors: they are
//! treated as no-ops during reference resolution.

use crate::models::Individual;
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// An individual has an empty ID.
    EmptyId,
    /// Two individuals share the same ID.
    DuplicateId,
    /// A skill rating is NaN or infinite.
    NonFiniteSkill,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a roster.
///
/// Checks (over the whole roster, eligible or not):
/// 1. No empty IDs
/// 2. No duplicate IDs
/// 3. All skill ratings are finite
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_roster(roster: &[Individual]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for (position, individual) in roster.iter().enumerate() {
        if individual.id.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                format!("Roster entry #{position} has an empty ID"),
            ));
        } else if !ids.insert(individual.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate individual ID: {}", individual.id),
            ));
        }

        if !individual.skill.is_finite() {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonFiniteSkill,
                format!(
                    "Individual '{}' has a non-finite skill rating",
                    individual.display_name()
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_roster() -> Vec<Individual> {
        vec![
            Individual::new("1", 7.0).with_name("Yoni"),
            Individual::new("2", 5.5).with_name("Gal").with_must_with("Yoni"),
            Individual::new("3", 6.0)
                .with_name("Tal")
                .with_must_not_with("nobody")
                .with_eligible(false),
        ]
    }

    #[test]
    fn test_valid_roster() {
        assert!(validate_roster(&sample_roster()).is_ok());
    }

    #[test]
    fn test_empty_roster_is_valid() {
        assert!(validate_roster(&[]).is_ok());
    }

    #[test]
    fn test_duplicate_id() {
        let mut roster = sample_roster();
        roster.push(Individual::new("2", 4.0));

        let errors = validate_roster(&roster).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains('2')));
    }

    #[test]
    fn test_duplicate_id_across_eligibility() {
        let roster = vec![
            Individual::new("x", 4.0),
            Individual::new("x", 4.0).with_eligible(false),
        ];
        let errors = validate_roster(&roster).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateId);
    }

    #[test]
    fn test_empty_id() {
        let roster = vec![Individual::new("  ", 4.0)];
        let errors = validate_roster(&roster).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::EmptyId));
    }

    #[test]
    fn test_non_finite_skill() {
        let roster = vec![
            Individual::new("1", f64::NAN),
            Individual::new("2", f64::INFINITY),
        ];
        let errors = validate_roster(&roster).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::NonFiniteSkill)
                .count(),
            2
        );
    }

    #[test]
    fn test_unresolved_references_are_not_errors() {
        let roster = vec![Individual::new("1", 5.0)
            .with_must_with("ghost")
            .with_must_not_with("phantom")];
        assert!(validate_roster(&roster).is_ok());
    }

    #[test]
    fn test_multiple_errors() {
        let roster = vec![
            Individual::new("", 5.0),
            Individual::new("a", f64::NAN),
            Individual::new("a", 3.0),
        ];
        let errors = validate_roster(&roster).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
