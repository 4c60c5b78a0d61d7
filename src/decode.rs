//! Model decoding.
//!
//! Maps an oracle answer back onto the lattice. Only true job-team-day
//! variables become committed assignments; team-active and job-team
//! variables are kept as diagnostic readings. A refutation decodes to
//! [`ScheduleOutcome::Infeasible`], never to a partial schedule.

use std::collections::BTreeMap;

use tracing::warn;

use crate::encoding::{ClauseSet, OverlapOracle};
use crate::error::{Result, ScheduleError};
use crate::lattice::{CnfVar, JobIx, Lattice, LatticeError, TeamIx, VarCategory};
use crate::models::{
    Assignment, CapacityWarning, Job, PayPeriod, Reading, Schedule, ScheduleOutcome, Team,
    WorkDay,
};
use crate::solver::OracleAnswer;

/// Decodes oracle answers for one frozen lattice.
#[derive(Debug)]
pub struct Decoder<'a> {
    lattice: &'a Lattice,
    teams: &'a [Team],
    jobs: &'a [Job],
    period: &'a PayPeriod,
    oracle: OverlapOracle<'a>,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder.
    pub fn new(
        lattice: &'a Lattice,
        teams: &'a [Team],
        jobs: &'a [Job],
        period: &'a PayPeriod,
        oracle: OverlapOracle<'a>,
    ) -> Self {
        Self {
            lattice,
            teams,
            jobs,
            period,
            oracle,
        }
    }

    /// Decodes `answer`, checking it against the clause set it answers.
    pub fn decode(&self, answer: &OracleAnswer, cnf: &ClauseSet) -> Result<ScheduleOutcome> {
        let model = match answer {
            OracleAnswer::Refuted => return Ok(ScheduleOutcome::Infeasible),
            OracleAnswer::Model(model) => model,
        };

        let truth = self.model_truth(model)?;
        if let Some(clause) = cnf.first_unsatisfied(&truth) {
            return Err(ScheduleError::ModelViolatesClause { clause });
        }

        let mut schedule = Schedule::new();
        let mut committed: Vec<(&CnfVar, Assignment)> = Vec::new();
        for var in self.lattice.vars() {
            let value = truth[var.ix.slot()];
            match var.category {
                VarCategory::TeamActive => schedule.add_reading(Reading::TeamActive {
                    var: var.ix.get(),
                    team: self.team(var.mapping.team)?.name.clone(),
                    value,
                }),
                VarCategory::JobTeam => schedule.add_reading(Reading::JobTeam {
                    var: var.ix.get(),
                    team: self.team(var.mapping.team)?.name.clone(),
                    job: self.job_of(var)?.address.clone(),
                    value,
                }),
                VarCategory::JobTeamDay if value => {
                    committed.push((var, self.assignment(var)?));
                }
                VarCategory::JobTeamDay => {}
            }
        }

        committed.sort_by_key(|(var, _)| (var.mapping.day, var.mapping.team, var.mapping.job));
        self.check_loads(&committed, &mut schedule)?;
        for (_, assignment) in committed {
            schedule.add_assignment(assignment);
        }
        Ok(ScheduleOutcome::Scheduled(schedule))
    }

    /// Truth value per variable slot. The model must assign every variable
    /// `1..=N` exactly once.
    fn model_truth(&self, model: &[i32]) -> Result<Vec<bool>> {
        let n = self.lattice.var_count();
        let mut truth: Vec<Option<bool>> = vec![None; n];

        for &lit in model {
            let var = lit.unsigned_abs() as usize;
            if var == 0 || var > n {
                return Err(ScheduleError::Oracle(format!(
                    "model literal {lit} outside 1..={n}"
                )));
            }
            let slot = &mut truth[var - 1];
            if slot.is_some() {
                return Err(ScheduleError::Oracle(format!(
                    "model assigns variable {var} twice"
                )));
            }
            *slot = Some(lit > 0);
        }

        if let Some(missing) = truth.iter().position(Option::is_none) {
            return Err(ScheduleError::IncompleteModel {
                expected: n,
                assigned: truth.iter().filter(|t| t.is_some()).count(),
                missing: (missing + 1) as u32,
            });
        }
        Ok(truth.into_iter().map(|t| t.unwrap_or(false)).collect())
    }

    /// Records a warning for every team-day whose jobs, plus travel between
    /// them in job order, exceed the day's capacity.
    fn check_loads(
        &self,
        committed: &[(&CnfVar, Assignment)],
        schedule: &mut Schedule,
    ) -> Result<()> {
        let mut per_team_day: BTreeMap<(TeamIx, usize), Vec<JobIx>> = BTreeMap::new();
        for (var, assignment) in committed {
            if let Some(job) = var.mapping.job {
                per_team_day
                    .entry((var.mapping.team, assignment.day))
                    .or_default()
                    .push(job);
            }
        }

        for ((team, day), mut jobs) in per_team_day {
            jobs.sort();
            let work_day = self.work_day(day)?;
            let load = self.oracle.day_load(&jobs);
            if load > u64::from(work_day.capacity_min) {
                let team = &self.team(team)?.name;
                warn!(
                    event = "capacity_exceeded",
                    team = %team,
                    date = %work_day.date,
                    load_min = load,
                    capacity_min = work_day.capacity_min,
                );
                schedule.add_warning(CapacityWarning {
                    team: team.clone(),
                    date: work_day.date,
                    load_min: u32::try_from(load).unwrap_or(u32::MAX),
                    capacity_min: work_day.capacity_min,
                });
            }
        }
        Ok(())
    }

    fn assignment(&self, var: &CnfVar) -> Result<Assignment> {
        let job = self.job_of(var)?;
        let day = var
            .mapping
            .day
            .ok_or(LatticeError::MappingMismatch {
                category: var.category,
                mapping: var.mapping,
            })?
            .get();
        Ok(Assignment {
            team: self.team(var.mapping.team)?.name.clone(),
            job: job.address.clone(),
            day,
            date: self.work_day(day)?.date,
            duration_min: job.duration_min,
        })
    }

    fn team(&self, ix: TeamIx) -> Result<&'a Team> {
        self.teams.get(ix.get()).ok_or_else(|| {
            LatticeError::OutOfRange {
                kind: "team",
                index: ix.get(),
                len: self.teams.len(),
            }
            .into()
        })
    }

    fn job_of(&self, var: &CnfVar) -> Result<&'a Job> {
        let ix = var.mapping.job.ok_or(LatticeError::MappingMismatch {
            category: var.category,
            mapping: var.mapping,
        })?;
        self.jobs.get(ix.get()).ok_or_else(|| {
            LatticeError::OutOfRange {
                kind: "job",
                index: ix.get(),
                len: self.jobs.len(),
            }
            .into()
        })
    }

    fn work_day(&self, day: usize) -> Result<&'a WorkDay> {
        self.period.get(day).ok_or_else(|| {
            LatticeError::OutOfRange {
                kind: "day",
                index: day,
                len: self.period.len(),
            }
            .into()
        })
    }
}
