//! Schedule (solution) model.
//!
//! A schedule is the decoded answer to "which team does which job on
//! which day". Only true job-team-day facts are committed as
//! assignments; team-active and job-team readings are kept alongside as
//! diagnostics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Result of resolving a scheduling problem.
///
/// The three cases are distinct: an infeasible instance is a valid
/// answer, and insufficient data means no instance was built at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ScheduleOutcome {
    /// The solver found a model; every job is assigned.
    Scheduled(Schedule),
    /// No assignment satisfies the constraints.
    Infeasible,
    /// Nothing to schedule (or nobody to schedule it with).
    InsufficientData(InsufficientData),
}

/// Why a problem could not be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsufficientData {
    /// No teams registered.
    NoTeams,
    /// No jobs registered.
    NoJobs,
}

impl fmt::Display for InsufficientData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTeams => write!(f, "no teams registered"),
            Self::NoJobs => write!(f, "no jobs registered"),
        }
    }
}

impl ScheduleOutcome {
    /// Whether a schedule was produced.
    pub fn is_scheduled(&self) -> bool {
        matches!(self, Self::Scheduled(_))
    }

    /// Whether the instance was proven unsatisfiable.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Self::Infeasible)
    }

    /// The schedule, if one was produced.
    pub fn schedule(&self) -> Option<&Schedule> {
        match self {
            Self::Scheduled(schedule) => Some(schedule),
            _ => None,
        }
    }

    /// Consumes the outcome, returning the schedule if one was produced.
    pub fn into_schedule(self) -> Option<Schedule> {
        match self {
            Self::Scheduled(schedule) => Some(schedule),
            _ => None,
        }
    }
}

/// A decoded schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Committed job-team-day assignments.
    pub assignments: Vec<Assignment>,
    /// Team-active and job-team readings from the model.
    pub diagnostics: Vec<Reading>,
    /// Team-days whose total load exceeds the day's capacity.
    ///
    /// Capacity is only excluded pairwise, so a solved schedule can still
    /// overload a day with three or more jobs. Non-empty means the schedule
    /// needs review; see [`Schedule::is_within_capacity`].
    pub warnings: Vec<CapacityWarning>,
}

/// One committed fact: `team` does `job` on `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Team name.
    pub team: String,
    /// Job address.
    pub job: String,
    /// Position of the day in the pay period.
    pub day: usize,
    /// Calendar date of the day.
    pub date: NaiveDate,
    /// Job duration (minutes), denormalized for load queries.
    pub duration_min: u32,
}

/// A non-committed variable reading, kept for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reading {
    /// Whether a team is active in the period.
    TeamActive { var: u32, team: String, value: bool },
    /// Whether a team holds a job.
    JobTeam {
        var: u32,
        team: String,
        job: String,
        value: bool,
    },
}

/// A team-day loaded beyond its capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityWarning {
    /// Team name.
    pub team: String,
    /// Affected date.
    pub date: NaiveDate,
    /// Job time plus travel time (minutes).
    pub load_min: u32,
    /// Capacity of the day (minutes).
    pub capacity_min: u32,
}

impl Reading {
    /// CNF variable index the reading came from.
    pub fn var(&self) -> u32 {
        match self {
            Self::TeamActive { var, .. } | Self::JobTeam { var, .. } => *var,
        }
    }

    /// Truth value in the model.
    pub fn value(&self) -> bool {
        match self {
            Self::TeamActive { value, .. } | Self::JobTeam { value, .. } => *value,
        }
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Adds a diagnostic reading.
    pub fn add_reading(&mut self, reading: Reading) {
        self.diagnostics.push(reading);
    }

    /// Adds a capacity warning.
    pub fn add_warning(&mut self, warning: CapacityWarning) {
        self.warnings.push(warning);
    }

    /// Whether no team-day exceeds its capacity.
    pub fn is_within_capacity(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Assignments grouped by date: date → (team, job) pairs, in assignment order.
    pub fn by_day(&self) -> BTreeMap<NaiveDate, Vec<(String, String)>> {
        let mut days: BTreeMap<NaiveDate, Vec<(String, String)>> = BTreeMap::new();
        for a in &self.assignments {
            days.entry(a.date)
                .or_default()
                .push((a.team.clone(), a.job.clone()));
        }
        days
    }

    /// Finds the assignment for a job.
    pub fn assignment_for_job(&self, job: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.job == job)
    }

    /// All assignments for a team.
    pub fn assignments_for_team(&self, team: &str) -> Vec<&Assignment> {
        self.assignments.iter().filter(|a| a.team == team).collect()
    }

    /// All assignments for a team on one pay-period day.
    pub fn assignments_for_team_day(&self, team: &str, day: usize) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.team == team && a.day == day)
            .collect()
    }

    /// Names of teams with at least one assignment, in first-seen order.
    pub fn active_teams(&self) -> Vec<&str> {
        let mut teams: Vec<&str> = Vec::new();
        for a in &self.assignments {
            if !teams.contains(&a.team.as_str()) {
                teams.push(&a.team);
            }
        }
        teams
    }
}
