//! Store traits and their MySQL implementations. Services are generic over
//! these traits; tests substitute in-memory fakes.

pub mod expenses;
pub mod holidays;
pub mod km_rates;
pub mod leaves;
pub mod projects;
pub mod users;

pub use expenses::{
    ExpenseLineStore, ExpenseReportStore, MySqlExpenseLineStore, MySqlExpenseReportStore,
    NewExpenseLine, NewExpenseReport,
};
pub use holidays::{HolidayStore, MySqlHolidayStore};
pub use km_rates::{KmRateStore, MySqlKmRateStore};
pub use leaves::{LeaveFilter, LeaveStore, MySqlLeaveStore, NewLeaveRequest};
pub use projects::{MySqlProjectStore, ProjectStore};
pub use users::{MySqlUserStore, NewUser, UserStore};
