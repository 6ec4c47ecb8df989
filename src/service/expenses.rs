//! Expense workflow: one report per user and project, manager-approved, with
//! validated expense lines attached. Report-affecting writes serialize per
//! owner like the leave lifecycle does.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::error::{Error, Result};
use crate::model::{ExpenseLine, ExpenseReport, ExpenseStatus};
use crate::service::Actor;
use crate::service::locks::UserLocks;
use crate::store::{
    ExpenseLineStore, ExpenseReportStore, KmRateStore, NewExpenseLine, NewExpenseReport,
    ProjectStore, UserStore,
};

#[derive(Debug, Clone)]
pub struct LineInput {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub receipt_path: Option<String>,
    pub km_rate_id: Option<u64>,
    pub distance_km: Option<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(
    example = json!({
        "id": 4,
        "user_id": 7,
        "employee_name": "Amel Ben Salah",
        "project_id": 1,
        "project_name": "Refonte intranet",
        "status": "pending",
        "submitted_at": "2026-03-14T10:02:00Z",
        "manager_comment": null,
        "lines": []
    })
)]
pub struct ExpenseReportResponse {
    #[schema(example = 4)]
    pub id: u64,

    #[schema(example = 7)]
    pub user_id: u64,

    #[schema(example = "Amel Ben Salah")]
    pub employee_name: String,

    #[schema(example = 1, nullable = true)]
    pub project_id: Option<u64>,

    #[schema(example = "Refonte intranet", nullable = true)]
    pub project_name: Option<String>,

    pub status: ExpenseStatus,

    #[schema(example = "2026-03-14T10:02:00Z", value_type = String, format = "date-time")]
    pub submitted_at: DateTime<Utc>,

    #[schema(nullable = true)]
    pub manager_comment: Option<String>,

    pub lines: Vec<ExpenseLine>,
}

pub struct ExpenseService<R, Li, P, K, U> {
    reports: R,
    lines: Li,
    projects: P,
    km_rates: K,
    users: U,
    locks: UserLocks,
}

impl<R, Li, P, K, U> ExpenseService<R, Li, P, K, U>
where
    R: ExpenseReportStore,
    Li: ExpenseLineStore,
    P: ProjectStore,
    K: KmRateStore,
    U: UserStore,
{
    pub fn new(reports: R, lines: Li, projects: P, km_rates: K, users: U) -> Self {
        Self {
            reports,
            lines,
            projects,
            km_rates,
            users,
            locks: UserLocks::new(),
        }
    }

    /// Opens a pending report for the acting user on a project. A user may
    /// hold at most one non-rejected report per project.
    pub async fn create_report(
        &self,
        requester_id: u64,
        project_id: u64,
    ) -> Result<ExpenseReportResponse> {
        let requester = self
            .users
            .by_id(requester_id)
            .await?
            .ok_or_else(|| Error::not_found("user not found"))?;
        if requester.manager_id.is_none() {
            return Err(Error::invalid_input(
                "an expense report requires an assigned manager",
            ));
        }
        if self.projects.by_id(project_id).await?.is_none() {
            return Err(Error::not_found("project not found"));
        }

        let lock = self.locks.for_user(requester_id);
        let _serial = lock.lock().await;

        if self
            .reports
            .has_open_for_project(requester_id, project_id, None)
            .await?
        {
            return Err(Error::conflict(
                "a report for this project is already pending or approved",
            ));
        }

        let created = self
            .reports
            .create(NewExpenseReport {
                user_id: requester_id,
                project_id: Some(project_id),
                status: ExpenseStatus::Pending,
                submitted_at: Utc::now(),
            })
            .await?;
        info!(report_id = created.id, user_id = requester_id, "expense report created");

        self.to_report_response(&created).await
    }

    /// Reassigns a pending report to another project; status never changes
    /// through this path.
    pub async fn update_report(
        &self,
        id: u64,
        actor: Actor,
        project_id: u64,
    ) -> Result<ExpenseReportResponse> {
        let existing = self
            .reports
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("expense report not found"))?;
        if actor.user_id != existing.user_id && !actor.is_admin() {
            return Err(Error::unauthorized(
                "only the owner or an admin may modify this report",
            ));
        }
        if self.projects.by_id(project_id).await?.is_none() {
            return Err(Error::not_found("project not found"));
        }

        let lock = self.locks.for_user(existing.user_id);
        let _serial = lock.lock().await;

        let mut report = self
            .reports
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("expense report not found"))?;
        if report.status.is_terminal() {
            return Err(Error::invalid_state(
                "only pending reports can be modified",
            ));
        }
        if self
            .reports
            .has_open_for_project(report.user_id, project_id, Some(id))
            .await?
        {
            return Err(Error::conflict(
                "a report for this project is already pending or approved",
            ));
        }

        report.project_id = Some(project_id);
        self.reports.update(&report).await?;
        self.to_report_response(&report).await
    }

    /// One-way transition out of `Pending`, by the owner's manager-of-record
    /// or an admin.
    pub async fn update_report_status(
        &self,
        id: u64,
        actor: Actor,
        new_status: ExpenseStatus,
        manager_comment: Option<String>,
    ) -> Result<ExpenseReportResponse> {
        if new_status == ExpenseStatus::Pending {
            return Err(Error::invalid_input("status must be approved or rejected"));
        }

        let existing = self
            .reports
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("expense report not found"))?;
        let owner = self
            .users
            .by_id(existing.user_id)
            .await?
            .ok_or_else(|| Error::not_found("report owner not found"))?;
        if !actor.is_admin() && owner.manager_id != Some(actor.user_id) {
            return Err(Error::unauthorized(
                "only the employee's manager may process this report",
            ));
        }

        let lock = self.locks.for_user(existing.user_id);
        let _serial = lock.lock().await;

        let mut report = self
            .reports
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("expense report not found"))?;
        if report.status.is_terminal() {
            return Err(Error::invalid_state(
                "this report has already been processed",
            ));
        }

        report.status = new_status;
        if manager_comment.is_some() {
            report.manager_comment = manager_comment;
        }
        self.reports.update(&report).await?;
        info!(report_id = id, status = %new_status, "expense report processed");

        self.to_report_response(&report).await
    }

    pub async fn delete_report(&self, id: u64, actor: Actor) -> Result<()> {
        let report = self
            .reports
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("expense report not found"))?;
        if actor.user_id != report.user_id && !actor.is_admin() {
            return Err(Error::unauthorized(
                "only the owner or an admin may delete this report",
            ));
        }

        let lock = self.locks.for_user(report.user_id);
        let _serial = lock.lock().await;

        if !self.reports.delete(id).await? {
            return Err(Error::not_found("expense report not found"));
        }
        Ok(())
    }

    pub async fn get_report(&self, id: u64, actor: Actor) -> Result<ExpenseReportResponse> {
        let report = self
            .reports
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("expense report not found"))?;
        if actor.user_id != report.user_id && !actor.is_admin() {
            let owner = self.users.by_id(report.user_id).await?;
            let is_manager =
                owner.as_ref().and_then(|u| u.manager_id) == Some(actor.user_id);
            if !is_manager {
                return Err(Error::unauthorized("not allowed to view this report"));
            }
        }
        self.to_report_response(&report).await
    }

    pub async fn list_reports(&self) -> Result<Vec<ExpenseReportResponse>> {
        let reports = self.reports.all().await?;
        self.to_report_responses(reports).await
    }

    pub async fn list_reports_for_user(&self, user_id: u64) -> Result<Vec<ExpenseReportResponse>> {
        let reports = self.reports.by_user(user_id).await?;
        self.to_report_responses(reports).await
    }

    pub async fn list_reports_for_manager(
        &self,
        manager_id: u64,
    ) -> Result<Vec<ExpenseReportResponse>> {
        let reports = self.reports.by_manager(manager_id).await?;
        self.to_report_responses(reports).await
    }

    pub async fn list_reports_for_project(
        &self,
        project_id: u64,
    ) -> Result<Vec<ExpenseReportResponse>> {
        if self.projects.by_id(project_id).await?.is_none() {
            return Err(Error::not_found("project not found"));
        }
        let reports = self.reports.by_project(project_id).await?;
        self.to_report_responses(reports).await
    }

    /// Adds a line to the acting user's own report. Strictly owner-only,
    /// admins included out.
    pub async fn create_line(
        &self,
        report_id: u64,
        actor_user_id: u64,
        input: LineInput,
    ) -> Result<ExpenseLine> {
        let report = self
            .reports
            .by_id(report_id)
            .await?
            .ok_or_else(|| Error::not_found("expense report not found"))?;
        if report.user_id != actor_user_id {
            return Err(Error::unauthorized(
                "only the report owner may add lines",
            ));
        }

        let input = self.validate_line(input).await?;
        self.ensure_no_duplicate_line(report_id, &input, None).await?;

        self.lines
            .create(NewExpenseLine {
                report_id,
                date: input.date,
                description: input.description,
                amount: input.amount,
                receipt_path: input.receipt_path,
                km_rate_id: input.km_rate_id,
                distance_km: input.distance_km,
            })
            .await
    }

    pub async fn update_line(
        &self,
        id: u64,
        actor_user_id: u64,
        input: LineInput,
    ) -> Result<ExpenseLine> {
        let mut line = self
            .lines
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("expense line not found"))?;
        let report = self
            .reports
            .by_id(line.report_id)
            .await?
            .ok_or_else(|| Error::not_found("expense report not found"))?;
        if report.user_id != actor_user_id {
            return Err(Error::unauthorized(
                "only the report owner may modify lines",
            ));
        }

        let input = self.validate_line(input).await?;
        self.ensure_no_duplicate_line(line.report_id, &input, Some(id))
            .await?;

        line.date = input.date;
        line.description = input.description;
        line.amount = input.amount;
        line.receipt_path = input.receipt_path;
        line.km_rate_id = input.km_rate_id;
        line.distance_km = input.distance_km;
        self.lines.update(&line).await?;
        Ok(line)
    }

    pub async fn delete_line(&self, id: u64, actor_user_id: u64) -> Result<()> {
        let line = self
            .lines
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("expense line not found"))?;
        let report = self
            .reports
            .by_id(line.report_id)
            .await?
            .ok_or_else(|| Error::not_found("expense report not found"))?;
        if report.user_id != actor_user_id {
            return Err(Error::unauthorized(
                "only the report owner may delete lines",
            ));
        }
        if !self.lines.delete(id).await? {
            return Err(Error::not_found("expense line not found"));
        }
        Ok(())
    }

    pub async fn get_line(&self, id: u64, actor: Actor) -> Result<ExpenseLine> {
        let line = self
            .lines
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("expense line not found"))?;
        let report = self
            .reports
            .by_id(line.report_id)
            .await?
            .ok_or_else(|| Error::not_found("expense report not found"))?;
        if actor.user_id != report.user_id && !actor.is_admin() {
            return Err(Error::unauthorized("not allowed to view this line"));
        }
        Ok(line)
    }

    pub async fn list_lines(&self) -> Result<Vec<ExpenseLine>> {
        self.lines.all().await
    }

    pub async fn lines_for_report(
        &self,
        report_id: u64,
        actor: Actor,
    ) -> Result<Vec<ExpenseLine>> {
        let report = self
            .reports
            .by_id(report_id)
            .await?
            .ok_or_else(|| Error::not_found("expense report not found"))?;
        if actor.user_id != report.user_id && !actor.is_admin() {
            return Err(Error::unauthorized("not allowed to view these lines"));
        }
        self.lines.by_report(report_id).await
    }

    async fn validate_line(&self, mut input: LineInput) -> Result<LineInput> {
        let today = Utc::now().date_naive();
        if input.date > today {
            return Err(Error::invalid_input("expense date cannot be in the future"));
        }
        input.description = input.description.trim().to_string();
        if input.description.is_empty() {
            return Err(Error::invalid_input("description is required"));
        }
        if input.amount < Decimal::ZERO {
            return Err(Error::invalid_input("amount cannot be negative"));
        }
        if let Some(km_rate_id) = input.km_rate_id {
            if self.km_rates.by_id(km_rate_id).await?.is_none() {
                return Err(Error::not_found("km rate not found"));
            }
            match input.distance_km {
                None => {
                    return Err(Error::invalid_input(
                        "distance_km is required when a km rate is set",
                    ));
                }
                Some(d) if d < 0 => {
                    return Err(Error::invalid_input("distance cannot be negative"));
                }
                Some(_) => {}
            }
        }
        Ok(input)
    }

    async fn ensure_no_duplicate_line(
        &self,
        report_id: u64,
        input: &LineInput,
        exclude: Option<u64>,
    ) -> Result<()> {
        let siblings = self.lines.by_report(report_id).await?;
        let duplicate = siblings.iter().any(|l| {
            Some(l.id) != exclude
                && l.date == input.date
                && l.description.eq_ignore_ascii_case(&input.description)
                && l.amount == input.amount
                && l.km_rate_id == input.km_rate_id
                && l.distance_km == input.distance_km
        });
        if duplicate {
            return Err(Error::conflict("an identical expense line already exists"));
        }
        Ok(())
    }

    async fn to_report_response(
        &self,
        report: &ExpenseReport,
    ) -> Result<ExpenseReportResponse> {
        let employee_name = match self.users.by_id(report.user_id).await? {
            Some(u) => u.name,
            None => String::new(),
        };
        let project_name = match report.project_id {
            Some(pid) => self.projects.by_id(pid).await?.map(|p| p.name),
            None => None,
        };
        let lines = self.lines.by_report(report.id).await?;
        Ok(ExpenseReportResponse {
            id: report.id,
            user_id: report.user_id,
            employee_name,
            project_id: report.project_id,
            project_name,
            status: report.status,
            submitted_at: report.submitted_at,
            manager_comment: report.manager_comment.clone(),
            lines,
        })
    }

    async fn to_report_responses(
        &self,
        reports: Vec<ExpenseReport>,
    ) -> Result<Vec<ExpenseReportResponse>> {
        let mut names: HashMap<u64, String> = HashMap::new();
        let mut project_names: HashMap<u64, Option<String>> = HashMap::new();
        let mut out = Vec::with_capacity(reports.len());
        for report in &reports {
            if !names.contains_key(&report.user_id) {
                let name = match self.users.by_id(report.user_id).await? {
                    Some(u) => u.name,
                    None => String::new(),
                };
                names.insert(report.user_id, name);
            }
            let project_name = match report.project_id {
                Some(pid) => {
                    if !project_names.contains_key(&pid) {
                        let name = self.projects.by_id(pid).await?.map(|p| p.name);
                        project_names.insert(pid, name);
                    }
                    project_names[&pid].clone()
                }
                None => None,
            };
            let lines = self.lines.by_report(report.id).await?;
            out.push(ExpenseReportResponse {
                id: report.id,
                user_id: report.user_id,
                employee_name: names[&report.user_id].clone(),
                project_id: report.project_id,
                project_name,
                status: report.status,
                submitted_at: report.submitted_at,
                manager_comment: report.manager_comment.clone(),
                lines,
            });
        }
        Ok(out)
    }
}
