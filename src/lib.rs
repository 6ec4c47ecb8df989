pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod model;
pub mod routes;
pub mod service;
pub mod store;
pub mod utils;

use service::{
    ExpenseService, HolidayService, KmRateService, LeaveService, ProjectService, UserService,
};
use store::{
    MySqlExpenseLineStore, MySqlExpenseReportStore, MySqlHolidayStore, MySqlKmRateStore,
    MySqlLeaveStore, MySqlProjectStore, MySqlUserStore,
};

// Concrete service types wired to the MySQL stores.
pub type AppLeaveService = LeaveService<MySqlLeaveStore, MySqlHolidayStore, MySqlUserStore>;
pub type AppHolidayService = HolidayService<MySqlHolidayStore>;
pub type AppUserService = UserService<MySqlUserStore>;
pub type AppExpenseService = ExpenseService<
    MySqlExpenseReportStore,
    MySqlExpenseLineStore,
    MySqlProjectStore,
    MySqlKmRateStore,
    MySqlUserStore,
>;
pub type AppProjectService = ProjectService<MySqlProjectStore>;
pub type AppKmRateService = KmRateService<MySqlKmRateStore>;
