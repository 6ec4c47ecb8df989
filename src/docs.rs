use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

use crate::api::expense_line::{CreateLine, UpdateLine};
use crate::api::expense_report::{CreateReport, UpdateReport, UpdateReportStatus};
use crate::api::holiday::{CheckResponse, CreateHoliday, UpdateHoliday};
use crate::api::km_rate::{CreateKmRate, UpdateKmRate};
use crate::api::leave::{
    BalanceResponse, CreateLeave, LeaveListResponse, LeaveQuery, LeaveWithNotices, ManagerDecision,
    UpdateLeave,
};
use crate::api::project::{CreateProject, UpdateProject};
use crate::api::user::{CreateUserRequest, UpdateUserRequest};
use crate::auth::handlers::{LoginRequest, LoginResponse, RegisterRequest};
use crate::model::{
    ExpenseLine, ExpenseStatus, Holiday, KmRate, LeaveStatus, LeaveType, Project, Role,
    UserResponse,
};
use crate::service::{ExpenseReportResponse, LeaveResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Congés API",
        version = "1.0.0",
        description = r#"
## Leave & Expense Management System

This API powers a leave ("congés") and expense management system for small
organizations.

### 🔹 Key Features
- **Leave Management**
  - Submit, update, approve/reject and delete leave requests
  - Business-day accounting: Sundays and national holidays are never charged
  - Yearly balance tracking against a fixed entitlement
- **Expense Management**
  - Per-project expense reports with validated expense lines
  - Kilometric allowances via configurable vehicle rates
- **Directory**
  - Users with a manager-of-record hierarchy; national holiday calendar

### 🔐 Security
All non-auth endpoints require **JWT Bearer authentication**. Manager-only
and admin-only operations are enforced per endpoint.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for the admin leave listing

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,

        crate::api::leave::create_leave,
        crate::api::leave::leave_list,
        crate::api::leave::my_leaves,
        crate::api::leave::team_leaves,
        crate::api::leave::leaves_by_status,
        crate::api::leave::my_balance,
        crate::api::leave::get_leave,
        crate::api::leave::update_leave,
        crate::api::leave::approve_leave,
        crate::api::leave::reject_leave,
        crate::api::leave::delete_leave,

        crate::api::holiday::list_holidays,
        crate::api::holiday::holidays_of_year,
        crate::api::holiday::check_holiday,
        crate::api::holiday::get_holiday,
        crate::api::holiday::create_holiday,
        crate::api::holiday::update_holiday,
        crate::api::holiday::delete_holiday,

        crate::api::user::list_users,
        crate::api::user::get_user,
        crate::api::user::subordinates,
        crate::api::user::create_user,
        crate::api::user::update_user,
        crate::api::user::delete_user,

        crate::api::expense_report::create_report,
        crate::api::expense_report::list_reports,
        crate::api::expense_report::my_reports,
        crate::api::expense_report::team_reports,
        crate::api::expense_report::project_reports,
        crate::api::expense_report::get_report,
        crate::api::expense_report::update_report,
        crate::api::expense_report::update_report_status,
        crate::api::expense_report::delete_report,

        crate::api::expense_line::list_lines,
        crate::api::expense_line::report_lines,
        crate::api::expense_line::get_line,
        crate::api::expense_line::create_line,
        crate::api::expense_line::update_line,
        crate::api::expense_line::delete_line,

        crate::api::project::list_projects,
        crate::api::project::get_project,
        crate::api::project::create_project,
        crate::api::project::update_project,
        crate::api::project::delete_project,

        crate::api::km_rate::list_rates,
        crate::api::km_rate::get_rate,
        crate::api::km_rate::get_rate_by_category,
        crate::api::km_rate::create_rate,
        crate::api::km_rate::update_rate,
        crate::api::km_rate::delete_rate
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            LoginResponse,

            LeaveType,
            LeaveStatus,
            Role,
            CreateLeave,
            UpdateLeave,
            ManagerDecision,
            LeaveQuery,
            LeaveResponse,
            LeaveListResponse,
            LeaveWithNotices,
            BalanceResponse,

            Holiday,
            CreateHoliday,
            UpdateHoliday,
            CheckResponse,

            UserResponse,
            CreateUserRequest,
            UpdateUserRequest,

            ExpenseStatus,
            ExpenseLine,
            ExpenseReportResponse,
            CreateReport,
            UpdateReport,
            UpdateReportStatus,
            CreateLine,
            UpdateLine,

            Project,
            CreateProject,
            UpdateProject,

            KmRate,
            CreateKmRate,
            UpdateKmRate
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and token lifecycle"),
        (name = "Leave", description = "Leave request and balance APIs"),
        (name = "Holiday", description = "National holiday calendar APIs"),
        (name = "User", description = "User directory APIs"),
        (name = "Expense", description = "Expense report and line APIs"),
        (name = "Project", description = "Project catalog APIs"),
        (name = "KmRate", description = "Kilometric rate catalog APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
