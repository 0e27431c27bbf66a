//! Check-in/check-out validation and recording.

mod locks;
mod state_machine;

pub use locks::EmployeeLocks;
pub use state_machine::AttendanceStateMachine;
