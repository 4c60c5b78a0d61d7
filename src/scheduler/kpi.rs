//! Workload indicators (KPIs).
//!
//! Computes per-team workload figures from a decoded schedule. These are
//! reported only; the encoder does not optimize any of them.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Jobs per team | Number of assignments |
//! | Busy minutes | Sum of job durations (travel excluded) |
//! | Utilization | Busy minutes / total pay-period capacity |
//! | Active teams | Teams with at least one job |
//! | Job spread | max(jobs per team) - min(jobs per team) |

use std::collections::HashMap;

use crate::models::{PayPeriod, Schedule, Team};

/// Schedule workload indicators.
///
/// All time values are in minutes.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Jobs assigned to each team.
    pub jobs_by_team: HashMap<String, usize>,
    /// Job minutes assigned to each team.
    pub busy_min_by_team: HashMap<String, u64>,
    /// Per-team utilization of the pay period (0.0..1.0 when within capacity).
    pub utilization_by_team: HashMap<String, f64>,
    /// Average utilization across all teams.
    pub avg_utilization: f64,
    /// Teams with at least one assignment.
    pub active_teams: usize,
    /// Difference between the busiest and idlest team's job counts.
    pub job_spread: usize,
}

impl ScheduleKpi {
    /// Computes KPIs over every registered team, including idle ones.
    ///
    /// # Arguments
    /// * `schedule` - The decoded schedule.
    /// * `teams` - All registered teams.
    /// * `period` - The pay period (for capacity).
    pub fn calculate(schedule: &Schedule, teams: &[Team], period: &PayPeriod) -> Self {
        let mut jobs_by_team: HashMap<String, usize> =
            teams.iter().map(|t| (t.name.clone(), 0)).collect();
        let mut busy_min_by_team: HashMap<String, u64> =
            teams.iter().map(|t| (t.name.clone(), 0)).collect();

        for a in &schedule.assignments {
            *jobs_by_team.entry(a.team.clone()).or_default() += 1;
            *busy_min_by_team.entry(a.team.clone()).or_default() += u64::from(a.duration_min);
        }

        let capacity = period.total_capacity_min();
        let utilization_by_team: HashMap<String, f64> = busy_min_by_team
            .iter()
            .map(|(team, &busy)| {
                let u = if capacity == 0 {
                    0.0
                } else {
                    busy as f64 / capacity as f64
                };
                (team.clone(), u)
            })
            .collect();

        let avg_utilization = if utilization_by_team.is_empty() {
            0.0
        } else {
            utilization_by_team.values().sum::<f64>() / utilization_by_team.len() as f64
        };

        let active_teams = jobs_by_team.values().filter(|&&n| n > 0).count();
        let job_spread = match (jobs_by_team.values().max(), jobs_by_team.values().min()) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        };

        Self {
            jobs_by_team,
            busy_min_by_team,
            utilization_by_team,
            avg_utilization,
            active_teams,
            job_spread,
        }
    }
}
