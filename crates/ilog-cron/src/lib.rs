//! ilog cron: the periodic timer that drives log rotation.
//!
//! - **types**: [`RotationSchedule`]: fixed intervals (`"1h"`) or cron
//!   expressions, evaluated in UTC
//! - **service**: [`RotationService`]: sleeps until the next fire time,
//!   invokes the tick callback, stops on request

pub mod service;
pub mod types;

pub use service::{OnTickFn, RotationService};
pub use types::{RotationSchedule, ScheduleError};
