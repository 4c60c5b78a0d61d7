//! Input validation for crew scheduling problems.
//!
//! Checks structural integrity of teams, jobs, and the pay period
//! before encoding. Detects:
//! - Duplicate team names and job addresses
//! - Teams with no members
//! - Jobs with zero duration
//! - Work days with zero capacity

use crate::models::{Job, PayPeriod, Team};
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
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two teams share a name.
    DuplicateTeam,
    /// Two jobs share an address.
    DuplicateJob,
    /// A team has no members.
    EmptyRoster,
    /// A job takes no time.
    ZeroDuration,
    /// A work day has no capacity.
    ZeroCapacity,
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

/// Validates the registered input of a scheduling problem.
///
/// Checks:
/// 1. No duplicate team names
/// 2. Every team has at least one member
/// 3. No duplicate job addresses
/// 4. Every job has a positive duration
/// 5. Every work day has positive capacity
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(teams: &[Team], jobs: &[Job], period: &PayPeriod) -> ValidationResult {
    let mut errors = Vec::new();

    let mut team_names = HashSet::new();
    for team in teams {
        if !team_names.insert(team.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateTeam,
                format!("Duplicate team name: {}", team.name),
            ));
        }
        if team.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyRoster,
                format!("Team '{}' has no members", team.name),
            ));
        }
    }

    let mut addresses = HashSet::new();
    for job in jobs {
        if !addresses.insert(job.address.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateJob,
                format!("Duplicate job address: {}", job.address),
            ));
        }
        if job.duration_min == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroDuration,
                format!("Job at '{}' has zero duration", job.address),
            ));
        }
    }

    for day in period.days() {
        if day.capacity_min == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroCapacity,
                format!("Work day {} has zero capacity", day.date),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
