//! SAT-backed crew scheduler.
//!
//! # Pipeline
//!
//! 1. Registration expands the team×job×day lattice eagerly.
//! 2. `resolve` short-circuits degenerate input, then validates.
//! 3. The encoder compiles the frozen lattice into CNF.
//! 4. The oracle decides the clause set.
//! 5. The decoder renders the model as a schedule.
//!
//! The pay period is fixed once anything has been registered, since the
//! number of day variables per job depends on it.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::decode::Decoder;
use crate::encoding::{ConstraintEncoder, Encoding, OverlapOracle};
use crate::error::{Result, ScheduleError};
use crate::lattice::{JobIx, Lattice, TeamIx};
use crate::models::{
    Employee, FixedTravel, InsufficientData, Job, PayPeriod, ScheduleOutcome, Team, TravelModel,
};
use crate::solver::{SatOracle, SplrOracle};
use crate::validation::validate_input;

/// Default pay period length in days.
pub const DEFAULT_PERIOD_DAYS: usize = 5;

/// Default workday length in hours.
pub const DEFAULT_WORKDAY_HOURS: u32 = 8;

/// Owns the registered entities, the variable lattice, and the oracle.
///
/// # Example
/// ```no_run
/// use u_sat_schedule::scheduler::SatScheduler;
///
/// let mut scheduler = SatScheduler::default();
/// scheduler.register_team("A", ["Luis", "Leo"]).unwrap();
/// scheduler.register_job(3, "1 LMU Drive").unwrap();
/// let outcome = scheduler.resolve().unwrap();
/// assert!(outcome.is_scheduled());
/// ```
#[derive(Debug)]
pub struct SatScheduler {
    teams: Vec<Team>,
    jobs: Vec<Job>,
    period: PayPeriod,
    lattice: Lattice,
    travel: Box<dyn TravelModel>,
    oracle: Box<dyn SatOracle>,
}

impl Default for SatScheduler {
    /// Five 8-hour days starting today.
    fn default() -> Self {
        Self::new(PayPeriod::starting_today(
            DEFAULT_PERIOD_DAYS,
            DEFAULT_WORKDAY_HOURS,
        ))
    }
}

impl SatScheduler {
    /// Creates a scheduler over `period` with fixed 30-minute travel and
    /// the `splr` oracle.
    pub fn new(period: PayPeriod) -> Self {
        Self {
            teams: Vec::new(),
            jobs: Vec::new(),
            lattice: Lattice::new(period.len()),
            period,
            travel: Box::new(FixedTravel::default()),
            oracle: Box::new(SplrOracle::new()),
        }
    }

    /// Replaces the travel model.
    pub fn with_travel(mut self, travel: impl TravelModel + 'static) -> Self {
        self.travel = Box::new(travel);
        self
    }

    /// Replaces the SAT oracle.
    pub fn with_oracle(mut self, oracle: impl SatOracle + 'static) -> Self {
        self.oracle = Box::new(oracle);
        self
    }

    /// Regenerates the pay period: `length` consecutive days of
    /// `hours_per_day` hours, starting at `start` (today if `None`).
    pub fn set_pay_period(
        &mut self,
        length: usize,
        hours_per_day: u32,
        start: Option<NaiveDate>,
    ) -> Result<()> {
        let period = match start {
            Some(start) => PayPeriod::consecutive(start, length, hours_per_day),
            None => PayPeriod::starting_today(length, hours_per_day),
        };
        self.replace_period(period)
    }

    /// Replaces the pay period with an explicit one.
    pub fn replace_period(&mut self, period: PayPeriod) -> Result<()> {
        if !self.teams.is_empty() || !self.jobs.is_empty() {
            return Err(ScheduleError::PayPeriodLocked);
        }
        self.lattice = Lattice::new(period.len());
        self.period = period;
        Ok(())
    }

    /// Registers a team by name and member names.
    pub fn register_team<I, S>(&mut self, name: impl Into<String>, members: I) -> Result<TeamIx>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_team(Team::with_members(
            name,
            members.into_iter().map(Employee::new),
        ))
    }

    /// Registers a built team.
    pub fn add_team(&mut self, team: Team) -> Result<TeamIx> {
        let before = self.lattice.var_count();
        let ix = self.lattice.register_team()?;
        debug!(
            event = "register_team",
            team = %ix,
            name = %team.name,
            members = team.size(),
            variables = self.lattice.var_count() - before,
        );
        self.teams.push(team);
        Ok(ix)
    }

    /// Registers a job of `duration_hours` at `address`.
    pub fn register_job(
        &mut self,
        duration_hours: u32,
        address: impl Into<String>,
    ) -> Result<JobIx> {
        self.add_job(Job::new(address, duration_hours))
    }

    /// Registers a built job.
    pub fn add_job(&mut self, job: Job) -> Result<JobIx> {
        let before = self.lattice.var_count();
        let ix = self.lattice.register_job()?;
        debug!(
            event = "register_job",
            job = %ix,
            address = %job.address,
            duration_min = job.duration_min,
            variables = self.lattice.var_count() - before,
        );
        self.jobs.push(job);
        Ok(ix)
    }

    /// Registered teams, in registration order.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Registered jobs, in registration order.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// The pay period.
    pub fn period(&self) -> &PayPeriod {
        &self.period
    }

    /// The variable lattice.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// The travel model.
    pub fn travel(&self) -> &dyn TravelModel {
        self.travel.as_ref()
    }

    fn overlap_oracle(&self) -> OverlapOracle<'_> {
        OverlapOracle::new(&self.jobs, &self.period, self.travel.as_ref())
    }

    /// Compiles the current lattice into CNF without solving it.
    pub fn encode(&self) -> Result<Encoding> {
        let encoder = ConstraintEncoder::new(
            &self.lattice,
            &self.jobs,
            &self.period,
            self.overlap_oracle(),
        );
        Ok(encoder.encode()?)
    }

    /// Runs the full pipeline.
    ///
    /// Zero teams or zero jobs yield
    /// [`ScheduleOutcome::InsufficientData`] before anything else is checked.
    ///
    /// Capacity is encoded pairwise, so a `Scheduled` outcome may still put
    /// three or more jobs on one team-day that do not fit together. Such
    /// days are listed in [`Schedule::warnings`](crate::models::Schedule);
    /// check [`Schedule::is_within_capacity`](crate::models::Schedule::is_within_capacity)
    /// before committing.
    pub fn resolve(&self) -> Result<ScheduleOutcome> {
        if self.teams.is_empty() {
            return Ok(self.insufficient(InsufficientData::NoTeams));
        }
        if self.jobs.is_empty() {
            return Ok(self.insufficient(InsufficientData::NoJobs));
        }
        validate_input(&self.teams, &self.jobs, &self.period)
            .map_err(ScheduleError::InvalidInput)?;

        let encoding = self.encode()?;
        let answer = self.oracle.solve(&encoding.cnf)?;
        debug!(
            event = "oracle_answer",
            oracle = self.oracle.name(),
            model = answer.is_model(),
        );
        let outcome = Decoder::new(
            &self.lattice,
            &self.teams,
            &self.jobs,
            &self.period,
            self.overlap_oracle(),
        )
        .decode(&answer, &encoding.cnf)?;

        info!(
            event = "solve_end",
            oracle = self.oracle.name(),
            outcome = outcome_label(&outcome),
            assignments = outcome.schedule().map_or(0, |s| s.assignment_count()),
        );
        Ok(outcome)
    }

    fn insufficient(&self, reason: InsufficientData) -> ScheduleOutcome {
        info!(event = "solve_end", outcome = "insufficient_data", reason = %reason);
        ScheduleOutcome::InsufficientData(reason)
    }
}

fn outcome_label(outcome: &ScheduleOutcome) -> &'static str {
    match outcome {
        ScheduleOutcome::Scheduled(_) => "scheduled",
        ScheduleOutcome::Infeasible => "infeasible",
        ScheduleOutcome::InsufficientData(_) => "insufficient_data",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::VarCategory;
    use crate::solver::testing::CannedOracle;
    use crate::solver::OracleAnswer;
    use crate::validation::ValidationErrorKind;
    use std::collections::HashSet;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn scheduler(days: usize) -> SatScheduler {
        SatScheduler::new(PayPeriod::consecutive(monday(), days, 8)).with_travel(FixedTravel(0))
    }

    #[test]
    fn test_single_team_two_short_jobs() {
        let mut s = scheduler(1);
        s.register_team("A", ["Luis"]).unwrap();
        s.register_job(3, "1 LMU Drive").unwrap();
        s.register_job(3, "1062 Durness").unwrap();

        let outcome = s.resolve().unwrap();
        let schedule = outcome.schedule().unwrap();
        assert_eq!(schedule.assignment_count(), 2);
        assert!(schedule.assignments.iter().all(|a| a.team == "A" && a.day == 0));
        assert!(schedule.is_within_capacity());

        let by_day = schedule.by_day();
        assert_eq!(by_day[&monday()].len(), 2);
    }

    #[test]
    fn test_two_long_jobs_infeasible() {
        let mut s = scheduler(1);
        s.register_team("A", ["Luis"]).unwrap();
        s.register_job(6, "1 LMU Drive").unwrap();
        s.register_job(6, "1062 Durness").unwrap();

        assert_eq!(s.resolve().unwrap(), ScheduleOutcome::Infeasible);
    }

    #[test]
    fn test_two_teams_two_jobs() {
        let mut s = scheduler(1);
        s.register_team("A", ["Luis"]).unwrap();
        s.register_team("B", ["Leo"]).unwrap();
        s.register_job(3, "1 LMU Drive").unwrap();
        s.register_job(3, "1062 Durness").unwrap();

        let outcome = s.resolve().unwrap();
        let schedule = outcome.schedule().unwrap();
        assert_eq!(schedule.assignment_count(), 2);
        assert!(schedule.assignment_for_job("1 LMU Drive").is_some());
        assert!(schedule.assignment_for_job("1062 Durness").is_some());
    }

    #[test]
    fn test_no_teams_is_insufficient() {
        let mut s = scheduler(1);
        s.register_job(3, "1 LMU Drive").unwrap();
        assert_eq!(
            s.resolve().unwrap(),
            ScheduleOutcome::InsufficientData(InsufficientData::NoTeams)
        );
    }

    #[test]
    fn test_no_jobs_is_insufficient() {
        let mut s = scheduler(1);
        s.register_team("A", ["Luis"]).unwrap();
        assert_eq!(
            s.resolve().unwrap(),
            ScheduleOutcome::InsufficientData(InsufficientData::NoJobs)
        );
    }

    #[test]
    fn test_oversized_job_infeasible() {
        let mut s = scheduler(1);
        s.register_team("A", ["Luis"]).unwrap();
        s.register_job(u32::MAX / 60 + 1, "Q").unwrap();

        assert_eq!(s.jobs()[0].duration_min, u32::MAX);
        assert_eq!(s.resolve().unwrap(), ScheduleOutcome::Infeasible);
    }

    #[test]
    fn test_job_without_teams_has_no_coverage() {
        let mut s = scheduler(1);
        s.register_job(1, "J1").unwrap();

        let encoding = s.encode().unwrap();
        assert_eq!(encoding.cnf.to_vecs(), vec![Vec::<i32>::new()]);
        assert!(encoding.cnf.has_empty_clause());
        let answer = SplrOracle::new().solve(&encoding.cnf).unwrap();
        assert!(!answer.is_model());
        assert_eq!(answer, OracleAnswer::Refuted);
    }

    #[test]
    fn test_pairwise_fitting_jobs_scheduled_with_warning() {
        let mut s = scheduler(1);
        s.register_team("A", ["Luis"]).unwrap();
        s.register_job(3, "X").unwrap();
        s.register_job(3, "Y").unwrap();
        s.register_job(3, "Z").unwrap();

        let outcome = s.resolve().unwrap();
        let schedule = outcome.schedule().unwrap();
        assert_eq!(schedule.assignment_count(), 3);
        assert!(!schedule.is_within_capacity());
        assert_eq!(schedule.warnings[0].load_min, 540);
        assert_eq!(schedule.warnings[0].capacity_min, 480);
    }

    #[test]
    fn test_zero_day_period_infeasible() {
        let mut s = scheduler(0);
        s.register_team("A", ["Luis"]).unwrap();
        s.register_job(1, "1 LMU Drive").unwrap();
        assert_eq!(s.resolve().unwrap(), ScheduleOutcome::Infeasible);
    }

    #[test]
    fn test_every_job_done_once_and_single_day() {
        let mut s = scheduler(3);
        s.register_team("A", ["Luis"]).unwrap();
        s.register_job(4, "J1").unwrap();
        s.register_team("B", ["Leo"]).unwrap();
        s.register_job(5, "J2").unwrap();
        s.register_job(2, "J3").unwrap();
        s.register_job(7, "J4").unwrap();

        let outcome = s.resolve().unwrap();
        let schedule = outcome.schedule().unwrap();
        assert_eq!(schedule.assignment_count(), 4);

        let jobs: HashSet<&str> = schedule.assignments.iter().map(|a| a.job.as_str()).collect();
        assert_eq!(jobs.len(), 4);

        let pairs: HashSet<(&str, &str)> = schedule
            .assignments
            .iter()
            .map(|a| (a.team.as_str(), a.job.as_str()))
            .collect();
        assert_eq!(pairs.len(), 4);

        for a in &schedule.assignments {
            assert!(a.day < 3);
            assert_eq!(a.date, monday() + chrono::Days::new(a.day as u64));
        }
        assert!(schedule.is_within_capacity());
    }

    #[test]
    fn test_lattice_complete_after_interleaving() {
        let mut s = scheduler(2);
        s.register_job(1, "J1").unwrap();
        s.register_team("A", ["Luis"]).unwrap();
        s.register_job(1, "J2").unwrap();
        s.register_team("B", ["Leo"]).unwrap();

        assert_eq!(s.lattice().var_count(), Lattice::expected_var_count(2, 2, 2));
        assert!(s.lattice().check_complete().is_ok());
        assert_eq!(s.lattice().vars_of(VarCategory::JobTeamDay).count(), 8);
    }

    #[test]
    fn test_pay_period_locked_after_registration() {
        let mut s = scheduler(1);
        assert!(s.set_pay_period(3, 6, Some(monday())).is_ok());
        assert_eq!(s.period().len(), 3);
        assert_eq!(s.lattice().day_count(), 3);

        s.register_team("A", ["Luis"]).unwrap();
        assert!(matches!(
            s.set_pay_period(5, 8, Some(monday())),
            Err(ScheduleError::PayPeriodLocked)
        ));
    }

    #[test]
    fn test_invalid_input_rejected() {
        let mut s = scheduler(1);
        s.add_team(Team::new("Ghost")).unwrap();
        s.register_job(1, "J1").unwrap();

        match s.resolve() {
            Err(ScheduleError::InvalidInput(errs)) => {
                assert_eq!(errs[0].kind, ValidationErrorKind::EmptyRoster);
            }
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn test_refuting_oracle() {
        let mut s = scheduler(1).with_oracle(CannedOracle(OracleAnswer::Refuted));
        s.register_team("A", ["Luis"]).unwrap();
        s.register_job(1, "J1").unwrap();
        assert!(s.resolve().unwrap().is_infeasible());
    }

    #[test]
    fn test_encode_counts() {
        let mut s = scheduler(2);
        s.register_team("A", ["Luis"]).unwrap();
        s.register_job(1, "J1").unwrap();
        let encoding = s.encode().unwrap();
        assert_eq!(encoding.cnf.num_vars(), 4);
        assert_eq!(encoding.cnf.len(), encoding.stats.total());
    }
}
