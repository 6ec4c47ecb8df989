//! Business services. Each service is generic over the store traits it
//! consumes so tests can drive it with in-memory fakes.

pub mod expenses;
pub mod holidays;
pub mod km_rates;
pub mod leave;
pub mod locks;
pub mod projects;
pub mod users;
pub mod workdays;

pub use expenses::{ExpenseReportResponse, ExpenseService, LineInput};
pub use holidays::{HolidayPatch, HolidayService};
pub use km_rates::{KmRatePatch, KmRateService};
pub use leave::{ANNUAL_ENTITLEMENT_DAYS, LeavePatch, LeaveResponse, LeaveService};
pub use projects::{ProjectPatch, ProjectService};
pub use users::{CreateUser, UserPatch, UserService};

use crate::model::Role;

/// The authenticated principal an operation runs as, as established by the
/// HTTP boundary. Services re-check relations (owner, manager-of-record)
/// against it; pure role gates stay at the boundary.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: u64,
    pub role: Role,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
