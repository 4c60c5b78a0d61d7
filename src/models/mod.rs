//! Crew scheduling domain models.
//!
//! Provides the entities that shape a scheduling problem (teams, jobs,
//! work days) and the decoded solution types.
//!
//! # Domain Mappings
//!
//! | u-sat-schedule | Field service | Cleaning crews | Installation |
//! |----------------|---------------|----------------|--------------|
//! | Team | Technician crew | Crew | Fitter pair |
//! | Job | Service call | Site visit | Install |
//! | WorkDay | Shift | Working day | Working day |
//! | PayPeriod | Dispatch week | Roster period | Sprint |

mod calendar;
mod job;
mod schedule;
mod team;

pub use calendar::{PayPeriod, WorkDay};
pub use job::{
    FixedTravel, Job, TravelMatrix, TravelModel, DEFAULT_TRAVEL_MINUTES, MINUTES_PER_HOUR,
};
pub use schedule::{
    Assignment, CapacityWarning, InsufficientData, Reading, Schedule, ScheduleOutcome,
};
pub use team::{Employee, Team};
