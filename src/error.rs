//! Error types.
//!
//! Infeasibility and insufficient data are *not* errors; they are
//! ordinary [`ScheduleOutcome`](crate::models::ScheduleOutcome) values.
//! Errors here mean the pipeline could not produce an answer at all.

use thiserror::Error;

use crate::lattice::LatticeError;
use crate::validation::ValidationError;

/// Scheduling pipeline error.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Lattice invariant violation (allocator or caller defect).
    #[error("lattice invariant violated: {0}")]
    Lattice(#[from] LatticeError),

    /// The pay period cannot change after the lattice has been expanded.
    #[error("pay period is fixed once teams or jobs are registered")]
    PayPeriodLocked,

    /// Input failed validation.
    #[error("invalid input: {} problem(s), first: {}", .0.len(), first_message(.0))]
    InvalidInput(Vec<ValidationError>),

    /// The SAT oracle failed to decide the instance.
    #[error("SAT oracle failed: {0}")]
    Oracle(String),

    /// The oracle's model does not assign every variable exactly once.
    #[error("oracle model assigns {assigned} of {expected} variables (first unassigned: {missing})")]
    IncompleteModel {
        expected: usize,
        assigned: usize,
        missing: u32,
    },

    /// The oracle's model falsifies an emitted clause.
    #[error("oracle model falsifies clause #{clause}")]
    ModelViolatesClause { clause: usize },
}

fn first_message(errors: &[ValidationError]) -> &str {
    errors.first().map(|e| e.message.as_str()).unwrap_or("none")
}

/// Result alias for the scheduling pipeline.
pub type Result<T> = std::result::Result<T, ScheduleError>;
