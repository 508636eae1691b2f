//! Payment schedules and the valuation time grid.

mod error;
mod frequency;
mod period;
mod schedule;
mod time_grid;

pub use error::ScheduleError;
pub use frequency::Frequency;
pub use period::Period;
pub use schedule::{Schedule, ScheduleBuilder};
pub use time_grid::{StepUnit, TimeGrid, TimeGridBuilder};
