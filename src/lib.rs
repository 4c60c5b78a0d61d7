//! Crew scheduling by SAT encoding.
//!
//! Assigns location-bound jobs to teams over a pay period. The problem is
//! compiled into a Boolean satisfiability instance in CNF, decided by a SAT
//! oracle, and the model is decoded back into day-by-day assignments.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Team`, `Job`, `WorkDay`, `PayPeriod`,
//!   travel models, and the decoded `Schedule`
//! - **`lattice`**: The team×job×day variable arena and its typed indices
//! - **`encoding`**: Clause rules, the capacity/overlap oracle, DIMACS output
//! - **`solver`**: The `SatOracle` boundary and the `splr` backend
//! - **`decode`**: Model → schedule translation
//! - **`scheduler`**: `SatScheduler` (registration + resolve) and workload KPIs
//! - **`validation`**: Input integrity checks
//! - **`config`**: TOML problem files
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use u_sat_schedule::models::PayPeriod;
//! use u_sat_schedule::SatScheduler;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
//! let mut scheduler = SatScheduler::new(PayPeriod::consecutive(start, 5, 8));
//! scheduler.register_team("A", ["Luis", "Leo"]).unwrap();
//! scheduler.register_job(3, "1 LMU Drive").unwrap();
//! scheduler.register_job(6, "1062 Durness").unwrap();
//!
//! if let Some(schedule) = scheduler.resolve().unwrap().schedule() {
//!     for (date, pairs) in schedule.by_day() {
//!         println!("{date}: {pairs:?}");
//!     }
//! }
//! ```
//!
//! # References
//!
//! - Biere et al. (2009), "Handbook of Satisfiability"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod config;
pub mod decode;
pub mod encoding;
pub mod error;
pub mod lattice;
pub mod models;
pub mod scheduler;
pub mod solver;
pub mod validation;

pub use error::{Result, ScheduleError};
pub use models::ScheduleOutcome;
pub use scheduler::SatScheduler;
