pub mod day;
pub mod preschedule;
pub mod schedule;
pub mod worker;

pub use day::{day_span, weekend_pairs, Day};
pub use preschedule::{PrescheduleBinding, PrescheduleEntry};
pub use schedule::{Roster, SolveStatus};
pub use worker::{status_profile, StatusProfile, Worker, WorkerSpec};
