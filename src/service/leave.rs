//! Leave request lifecycle: creation, partial update, one-way status
//! transitions, deletion, and the annual balance computation. All
//! request-affecting paths serialize per owner through [`UserLocks`].

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::error::{Error, Result};
use crate::model::{Holiday, LeaveRequest, LeaveStatus, LeaveType};
use crate::service::locks::UserLocks;
use crate::service::{Actor, workdays};
use crate::store::{HolidayStore, LeaveFilter, LeaveStore, NewLeaveRequest, UserStore};

/// Annual entitlement used by the balance engine. Deliberately a fixed
/// constant: the per-user `leave_entitlement` column exists and is editable
/// but does not feed this computation.
pub const ANNUAL_ENTITLEMENT_DAYS: i64 = 30;

/// Patch for a pending request. Absent fields keep their stored values,
/// including for the purpose of re-validating the date range.
#[derive(Debug, Clone, Default)]
pub struct LeavePatch {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub leave_type: Option<LeaveType>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(
    example = json!({
        "id": 12,
        "user_id": 7,
        "employee_name": "Amel Ben Salah",
        "employee_email": "amel.bensalah@company.com",
        "start_date": "2026-06-01",
        "end_date": "2026-06-05",
        "leave_type": "annual",
        "status": "pending",
        "submitted_at": "2026-05-02T09:14:00Z",
        "comment": "Summer break",
        "manager_comment": null,
        "day_count": 5
    })
)]
pub struct LeaveResponse {
    #[schema(example = 12)]
    pub id: u64,

    #[schema(example = 7)]
    pub user_id: u64,

    #[schema(example = "Amel Ben Salah")]
    pub employee_name: String,

    #[schema(example = "amel.bensalah@company.com")]
    pub employee_email: String,

    #[schema(example = "2026-06-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    #[schema(example = "2026-06-05", value_type = String, format = "date")]
    pub end_date: NaiveDate,

    pub leave_type: LeaveType,

    pub status: LeaveStatus,

    #[schema(example = "2026-05-02T09:14:00Z", value_type = String, format = "date-time")]
    pub submitted_at: DateTime<Utc>,

    #[schema(example = "Summer break", nullable = true)]
    pub comment: Option<String>,

    #[schema(nullable = true)]
    pub manager_comment: Option<String>,

    /// Chargeable days of the range, holidays deducted.
    #[schema(example = 5)]
    pub day_count: i64,
}

pub struct LeaveService<L, H, U> {
    leaves: L,
    holidays: H,
    users: U,
    locks: UserLocks,
}

impl<L, H, U> LeaveService<L, H, U>
where
    L: LeaveStore,
    H: HolidayStore,
    U: UserStore,
{
    pub fn new(leaves: L, holidays: H, users: U) -> Self {
        Self {
            leaves,
            holidays,
            users,
            locks: UserLocks::new(),
        }
    }

    /// Creates a pending request for `requester_id`. On success also returns
    /// the formatted holiday dates inside the range; holidays never block a
    /// request, the list is user messaging only.
    pub async fn create(
        &self,
        requester_id: u64,
        start: NaiveDate,
        end: NaiveDate,
        leave_type: LeaveType,
        comment: Option<String>,
    ) -> Result<(LeaveResponse, Vec<String>)> {
        let requester = self
            .users
            .by_id(requester_id)
            .await?
            .ok_or_else(|| Error::not_found("user not found"))?;
        if requester.manager_id.is_none() {
            return Err(Error::invalid_input(
                "a leave request requires an assigned manager",
            ));
        }
        validate_range(start, end)?;

        let holidays = self.holidays.in_range(start, end).await?;

        let lock = self.locks.for_user(requester_id);
        let _serial = lock.lock().await;

        if self
            .leaves
            .has_approved_overlap(requester_id, start, end, None)
            .await?
        {
            return Err(Error::conflict(
                "an approved leave request already overlaps this period",
            ));
        }

        let requested = workdays::chargeable_days(start, end, holidays.len() as i64);
        let available = self.balance_of(requester_id, start.year()).await?;
        if requested > available {
            return Err(Error::InsufficientBalance {
                requested,
                available,
            });
        }

        let created = self
            .leaves
            .create(NewLeaveRequest {
                user_id: requester_id,
                start_date: start,
                end_date: end,
                leave_type,
                status: LeaveStatus::Pending,
                submitted_at: Utc::now(),
                comment,
            })
            .await?;
        info!(request_id = created.id, user_id = requester_id, "leave request created");

        let response = self.to_response(&created).await?;
        Ok((response, format_dates(&holidays)))
    }

    /// Applies a partial patch to a pending request. Date checks, the overlap
    /// check and the balance check only re-run when a date field changes.
    pub async fn update(
        &self,
        id: u64,
        actor: Actor,
        patch: LeavePatch,
    ) -> Result<(LeaveResponse, Vec<String>)> {
        let existing = self
            .leaves
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("leave request not found"))?;
        if actor.user_id != existing.user_id && !actor.is_admin() {
            return Err(Error::unauthorized(
                "only the owner or an admin may modify this request",
            ));
        }

        let lock = self.locks.for_user(existing.user_id);
        let _serial = lock.lock().await;

        // Re-read under the lock; a concurrent transition may have landed.
        let mut request = self
            .leaves
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("leave request not found"))?;
        if request.status.is_terminal() {
            return Err(Error::invalid_state(
                "only pending requests can be modified",
            ));
        }

        let dates_changed = patch.start_date.is_some() || patch.end_date.is_some();
        let start = patch.start_date.unwrap_or(request.start_date);
        let end = patch.end_date.unwrap_or(request.end_date);

        if dates_changed {
            validate_range(start, end)?;
            if self
                .leaves
                .has_approved_overlap(request.user_id, start, end, Some(id))
                .await?
            {
                return Err(Error::conflict(
                    "an approved leave request already overlaps this period",
                ));
            }
            let holiday_count = self.holidays.count_in_range(start, end).await?;
            let requested = workdays::chargeable_days(start, end, holiday_count);
            let available = self.balance_of(request.user_id, start.year()).await?;
            if requested > available {
                return Err(Error::InsufficientBalance {
                    requested,
                    available,
                });
            }
        }

        request.start_date = start;
        request.end_date = end;
        if let Some(leave_type) = patch.leave_type {
            request.leave_type = leave_type;
        }
        if let Some(comment) = patch.comment {
            request.comment = Some(comment);
        }

        self.leaves.update(&request).await?;

        let holidays = self
            .holidays
            .in_range(request.start_date, request.end_date)
            .await?;
        let response = self.to_response(&request).await?;
        Ok((response, format_dates(&holidays)))
    }

    /// One-way transition out of `Pending`. The acting user must be the
    /// owner's manager-of-record unless they are an admin; the relation is
    /// re-checked here even though the boundary already gates by role.
    /// Ranges are deliberately not re-validated against other approvals.
    pub async fn update_status(
        &self,
        id: u64,
        actor: Actor,
        new_status: LeaveStatus,
        manager_comment: Option<String>,
    ) -> Result<LeaveResponse> {
        if new_status == LeaveStatus::Pending {
            return Err(Error::invalid_input("status must be approved or rejected"));
        }

        let existing = self
            .leaves
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("leave request not found"))?;
        let owner = self
            .users
            .by_id(existing.user_id)
            .await?
            .ok_or_else(|| Error::not_found("request owner not found"))?;
        if !actor.is_admin() && owner.manager_id != Some(actor.user_id) {
            return Err(Error::unauthorized(
                "only the employee's manager may process this request",
            ));
        }

        let lock = self.locks.for_user(existing.user_id);
        let _serial = lock.lock().await;

        let mut request = self
            .leaves
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("leave request not found"))?;
        if request.status.is_terminal() {
            return Err(Error::invalid_state(
                "this request has already been processed",
            ));
        }

        request.status = new_status;
        if manager_comment.is_some() {
            request.manager_comment = manager_comment;
        }
        self.leaves.update(&request).await?;
        info!(
            request_id = id,
            user_id = request.user_id,
            status = %new_status,
            "leave request processed"
        );

        self.to_response(&request).await
    }

    /// Hard delete, owner or admin, pending requests only.
    pub async fn delete(&self, id: u64, actor: Actor) -> Result<()> {
        let existing = self
            .leaves
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("leave request not found"))?;
        if actor.user_id != existing.user_id && !actor.is_admin() {
            return Err(Error::unauthorized(
                "only the owner or an admin may delete this request",
            ));
        }

        let lock = self.locks.for_user(existing.user_id);
        let _serial = lock.lock().await;

        let request = self
            .leaves
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("leave request not found"))?;
        if request.status.is_terminal() {
            return Err(Error::invalid_state(
                "only pending requests can be deleted",
            ));
        }

        if !self.leaves.delete(id).await? {
            return Err(Error::not_found("leave request not found"));
        }
        Ok(())
    }

    /// Single request, visible to its owner, the owner's manager-of-record,
    /// and admins.
    pub async fn get(&self, id: u64, actor: Actor) -> Result<LeaveResponse> {
        let request = self
            .leaves
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("leave request not found"))?;
        if actor.user_id != request.user_id && !actor.is_admin() {
            let owner = self.users.by_id(request.user_id).await?;
            let is_manager =
                owner.as_ref().and_then(|u| u.manager_id) == Some(actor.user_id);
            if !is_manager {
                return Err(Error::unauthorized("not allowed to view this request"));
            }
        }
        self.to_response(&request).await
    }

    pub async fn list_filtered(
        &self,
        filter: &LeaveFilter,
    ) -> Result<(Vec<LeaveResponse>, i64)> {
        let (rows, total) = self.leaves.filtered(filter).await?;
        Ok((self.to_responses(rows).await?, total))
    }

    pub async fn list_for_user(&self, user_id: u64) -> Result<Vec<LeaveResponse>> {
        let rows = self.leaves.by_user(user_id).await?;
        self.to_responses(rows).await
    }

    /// Requests submitted by the manager's direct reports.
    pub async fn list_for_manager(&self, manager_id: u64) -> Result<Vec<LeaveResponse>> {
        let rows = self.leaves.by_manager(manager_id).await?;
        self.to_responses(rows).await
    }

    pub async fn list_by_status(&self, status: LeaveStatus) -> Result<Vec<LeaveResponse>> {
        let rows = self.leaves.by_status(status).await?;
        self.to_responses(rows).await
    }

    /// Remaining balance for the year: the fixed entitlement minus the
    /// chargeable days of approved requests starting in that year. May go
    /// negative; only creation and update enforce a floor.
    pub async fn balance(&self, user_id: u64, year: i32) -> Result<i64> {
        if self.users.by_id(user_id).await?.is_none() {
            return Err(Error::not_found("user not found"));
        }
        self.balance_of(user_id, year).await
    }

    async fn balance_of(&self, user_id: u64, year: i32) -> Result<i64> {
        let ranges = self.leaves.approved_ranges_in_year(user_id, year).await?;
        let mut used = 0i64;
        for (start, end) in ranges {
            let holiday_count = self.holidays.count_in_range(start, end).await?;
            used += workdays::chargeable_days(start, end, holiday_count);
        }
        Ok(ANNUAL_ENTITLEMENT_DAYS - used)
    }

    async fn to_response(&self, request: &LeaveRequest) -> Result<LeaveResponse> {
        let owner = self.users.by_id(request.user_id).await?;
        let (name, email) = match owner {
            Some(u) => (u.name, u.email),
            None => (String::new(), String::new()),
        };
        let holiday_count = self
            .holidays
            .count_in_range(request.start_date, request.end_date)
            .await?;
        Ok(build_response(request, name, email, holiday_count))
    }

    async fn to_responses(&self, requests: Vec<LeaveRequest>) -> Result<Vec<LeaveResponse>> {
        // Owners repeat across a listing; resolve each one once.
        let mut owners: HashMap<u64, (String, String)> = HashMap::new();
        let mut out = Vec::with_capacity(requests.len());
        for request in &requests {
            if !owners.contains_key(&request.user_id) {
                let resolved = match self.users.by_id(request.user_id).await? {
                    Some(u) => (u.name, u.email),
                    None => (String::new(), String::new()),
                };
                owners.insert(request.user_id, resolved);
            }
            let (name, email) = owners[&request.user_id].clone();
            let holiday_count = self
                .holidays
                .count_in_range(request.start_date, request.end_date)
                .await?;
            out.push(build_response(request, name, email, holiday_count));
        }
        Ok(out)
    }
}

fn build_response(
    request: &LeaveRequest,
    employee_name: String,
    employee_email: String,
    holiday_count: i64,
) -> LeaveResponse {
    LeaveResponse {
        id: request.id,
        user_id: request.user_id,
        employee_name,
        employee_email,
        start_date: request.start_date,
        end_date: request.end_date,
        leave_type: request.leave_type,
        status: request.status,
        submitted_at: request.submitted_at,
        comment: request.comment.clone(),
        manager_comment: request.manager_comment.clone(),
        day_count: workdays::chargeable_days(
            request.start_date,
            request.end_date,
            holiday_count,
        ),
    }
}

fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    let today = Utc::now().date_naive();
    if start < today {
        return Err(Error::invalid_input("start date cannot be in the past"));
    }
    if end < start {
        return Err(Error::invalid_input(
            "end date cannot be before start date",
        ));
    }
    Ok(())
}

fn format_dates(holidays: &[Holiday]) -> Vec<String> {
    holidays
        .iter()
        .map(|h| h.date.format("%d/%m/%Y").to_string())
        .collect()
}
