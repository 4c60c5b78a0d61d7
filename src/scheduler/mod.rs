//! SAT-backed scheduler and workload KPIs.
//!
//! `SatScheduler` owns the registered entities and drives the
//! encode → solve → decode pipeline. `ScheduleKpi` summarizes the
//! workload of a decoded schedule.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 13 (workforce scheduling)
//! - Biere et al. (2009), "Handbook of Satisfiability"

mod kpi;
mod sat;

pub use kpi::ScheduleKpi;
pub use sat::{SatScheduler, DEFAULT_PERIOD_DAYS, DEFAULT_WORKDAY_HOURS};
