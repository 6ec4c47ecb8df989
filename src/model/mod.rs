pub mod expense;
pub mod holiday;
pub mod km_rate;
pub mod leave;
pub mod project;
pub mod role;
pub mod user;

pub use expense::{ExpenseLine, ExpenseReport, ExpenseStatus};
pub use holiday::Holiday;
pub use km_rate::KmRate;
pub use leave::{LeaveRequest, LeaveStatus, LeaveType};
pub use project::Project;
pub use role::Role;
pub use user::{User, UserResponse};
