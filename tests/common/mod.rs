#![allow(dead_code, unused_imports)]

//! In-memory store fakes shared by the service-level test binaries. Each fake
//! keeps its rows behind an `Arc<Mutex<..>>` so a clone can seed and inspect
//! state while the service under test owns another clone.

use std::sync::{Arc, Mutex};

use chrono::{Datelike, Days, NaiveDate, Utc, Weekday};
use rust_decimal::Decimal;

use conges_api::error::Result;
use conges_api::model::{
    ExpenseLine, ExpenseReport, ExpenseStatus, Holiday, KmRate, LeaveRequest, LeaveStatus,
    LeaveType, Project, Role, User,
};
use conges_api::service::{Actor, ExpenseService, HolidayService, LeaveService, LineInput};
use conges_api::store::{
    ExpenseLineStore, ExpenseReportStore, HolidayStore, KmRateStore, LeaveFilter, LeaveStore,
    NewExpenseLine, NewExpenseReport, NewLeaveRequest, NewUser, ProjectStore, UserStore,
};

struct Table<T> {
    next_id: u64,
    rows: Vec<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            rows: Vec::new(),
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/* ===================== users ===================== */

#[derive(Clone, Default)]
pub struct MemUserStore {
    state: Arc<Mutex<Table<User>>>,
}

impl UserStore for MemUserStore {
    async fn all(&self) -> Result<Vec<User>> {
        let mut rows = self.state.lock().unwrap().rows.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn by_id(&self, id: u64) -> Result<Option<User>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn subordinates(&self, manager_id: u64) -> Result<Vec<User>> {
        let mut rows: Vec<User> = self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .filter(|u| u.manager_id == Some(manager_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn create(&self, new: NewUser) -> Result<User> {
        let mut state = self.state.lock().unwrap();
        let user = User {
            id: state.next_id(),
            name: new.name,
            email: new.email,
            password: new.password,
            role: new.role,
            position: new.position,
            manager_id: new.manager_id,
            leave_entitlement: new.leave_entitlement,
            last_login_at: None,
        };
        state.rows.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(row) = state.rows.iter_mut().find(|u| u.id == user.id) {
            *row = user.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.rows.len();
        state.rows.retain(|u| u.id != id);
        Ok(state.rows.len() < before)
    }
}

/* ===================== leave requests ===================== */

#[derive(Clone)]
pub struct MemLeaveStore {
    state: Arc<Mutex<Table<LeaveRequest>>>,
    users: MemUserStore,
}

impl MemLeaveStore {
    pub fn new(users: MemUserStore) -> Self {
        Self {
            state: Arc::default(),
            users,
        }
    }
}

impl LeaveStore for MemLeaveStore {
    async fn all(&self) -> Result<Vec<LeaveRequest>> {
        let mut rows = self.state.lock().unwrap().rows.clone();
        rows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(rows)
    }

    async fn by_id(&self, id: u64) -> Result<Option<LeaveRequest>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn by_user(&self, user_id: u64) -> Result<Vec<LeaveRequest>> {
        let mut rows: Vec<LeaveRequest> = self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(rows)
    }

    async fn by_manager(&self, manager_id: u64) -> Result<Vec<LeaveRequest>> {
        let team: Vec<u64> = self
            .users
            .subordinates(manager_id)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();
        let mut rows: Vec<LeaveRequest> = self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .filter(|r| team.contains(&r.user_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(rows)
    }

    async fn by_status(&self, status: LeaveStatus) -> Result<Vec<LeaveRequest>> {
        let mut rows: Vec<LeaveRequest> = self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .filter(|r| r.status == status)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(rows)
    }

    async fn filtered(&self, filter: &LeaveFilter) -> Result<(Vec<LeaveRequest>, i64)> {
        let per_page = filter.per_page.unwrap_or(10).min(100);
        let page = filter.page.unwrap_or(1).max(1);

        let mut rows: Vec<LeaveRequest> = self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .filter(|r| filter.user_id.is_none_or(|id| r.user_id == id))
            .filter(|r| filter.status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

        let total = rows.len() as i64;
        let rows = rows
            .into_iter()
            .skip(((page - 1) * per_page) as usize)
            .take(per_page as usize)
            .collect();
        Ok((rows, total))
    }

    async fn has_approved_overlap(
        &self,
        user_id: u64,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<u64>,
    ) -> Result<bool> {
        Ok(self.state.lock().unwrap().rows.iter().any(|r| {
            Some(r.id) != exclude
                && r.user_id == user_id
                && r.status == LeaveStatus::Approved
                && r.start_date <= end
                && r.end_date >= start
        }))
    }

    async fn approved_ranges_in_year(
        &self,
        user_id: u64,
        year: i32,
    ) -> Result<Vec<(NaiveDate, NaiveDate)>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .filter(|r| {
                r.user_id == user_id
                    && r.status == LeaveStatus::Approved
                    && r.start_date.year() == year
            })
            .map(|r| (r.start_date, r.end_date))
            .collect())
    }

    async fn create(&self, new: NewLeaveRequest) -> Result<LeaveRequest> {
        let mut state = self.state.lock().unwrap();
        let request = LeaveRequest {
            id: state.next_id(),
            user_id: new.user_id,
            start_date: new.start_date,
            end_date: new.end_date,
            leave_type: new.leave_type,
            status: new.status,
            submitted_at: new.submitted_at,
            comment: new.comment,
            manager_comment: None,
        };
        state.rows.push(request.clone());
        Ok(request)
    }

    async fn update(&self, request: &LeaveRequest) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(row) = state.rows.iter_mut().find(|r| r.id == request.id) {
            *row = request.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.rows.len();
        state.rows.retain(|r| r.id != id);
        Ok(state.rows.len() < before)
    }
}

/* ===================== holidays ===================== */

#[derive(Clone, Default)]
pub struct MemHolidayStore {
    state: Arc<Mutex<Table<Holiday>>>,
}

impl HolidayStore for MemHolidayStore {
    async fn all(&self) -> Result<Vec<Holiday>> {
        let mut rows = self.state.lock().unwrap().rows.clone();
        rows.sort_by_key(|h| h.date);
        Ok(rows)
    }

    async fn by_id(&self, id: u64) -> Result<Option<Holiday>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .find(|h| h.id == id)
            .cloned())
    }

    async fn by_year(&self, year: i32) -> Result<Vec<Holiday>> {
        let mut rows: Vec<Holiday> = self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .filter(|h| h.date.year() == year)
            .cloned()
            .collect();
        rows.sort_by_key(|h| h.date);
        Ok(rows)
    }

    async fn in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Holiday>> {
        let mut rows: Vec<Holiday> = self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .filter(|h| h.date >= start && h.date <= end)
            .cloned()
            .collect();
        rows.sort_by_key(|h| h.date);
        Ok(rows)
    }

    async fn count_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<i64> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .filter(|h| h.date >= start && h.date <= end)
            .count() as i64)
    }

    async fn exists_on(&self, date: NaiveDate) -> Result<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .any(|h| h.date == date))
    }

    async fn create(&self, date: NaiveDate, description: String) -> Result<Holiday> {
        let mut state = self.state.lock().unwrap();
        let holiday = Holiday {
            id: state.next_id(),
            date,
            description,
        };
        state.rows.push(holiday.clone());
        Ok(holiday)
    }

    async fn update(&self, holiday: &Holiday) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(row) = state.rows.iter_mut().find(|h| h.id == holiday.id) {
            *row = holiday.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.rows.len();
        state.rows.retain(|h| h.id != id);
        Ok(state.rows.len() < before)
    }
}

/* ===================== expense reports and lines ===================== */

#[derive(Clone)]
pub struct MemExpenseReportStore {
    state: Arc<Mutex<Table<ExpenseReport>>>,
    users: MemUserStore,
}

impl MemExpenseReportStore {
    pub fn new(users: MemUserStore) -> Self {
        Self {
            state: Arc::default(),
            users,
        }
    }
}

impl ExpenseReportStore for MemExpenseReportStore {
    async fn all(&self) -> Result<Vec<ExpenseReport>> {
        let mut rows = self.state.lock().unwrap().rows.clone();
        rows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(rows)
    }

    async fn by_id(&self, id: u64) -> Result<Option<ExpenseReport>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn by_user(&self, user_id: u64) -> Result<Vec<ExpenseReport>> {
        let mut rows: Vec<ExpenseReport> = self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(rows)
    }

    async fn by_manager(&self, manager_id: u64) -> Result<Vec<ExpenseReport>> {
        let team: Vec<u64> = self
            .users
            .subordinates(manager_id)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();
        let mut rows: Vec<ExpenseReport> = self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .filter(|r| team.contains(&r.user_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(rows)
    }

    async fn by_project(&self, project_id: u64) -> Result<Vec<ExpenseReport>> {
        let mut rows: Vec<ExpenseReport> = self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .filter(|r| r.project_id == Some(project_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(rows)
    }

    async fn has_open_for_project(
        &self,
        user_id: u64,
        project_id: u64,
        exclude: Option<u64>,
    ) -> Result<bool> {
        Ok(self.state.lock().unwrap().rows.iter().any(|r| {
            Some(r.id) != exclude
                && r.user_id == user_id
                && r.project_id == Some(project_id)
                && r.status != ExpenseStatus::Rejected
        }))
    }

    async fn create(&self, new: NewExpenseReport) -> Result<ExpenseReport> {
        let mut state = self.state.lock().unwrap();
        let report = ExpenseReport {
            id: state.next_id(),
            user_id: new.user_id,
            project_id: new.project_id,
            status: new.status,
            submitted_at: new.submitted_at,
            manager_comment: None,
        };
        state.rows.push(report.clone());
        Ok(report)
    }

    async fn update(&self, report: &ExpenseReport) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(row) = state.rows.iter_mut().find(|r| r.id == report.id) {
            *row = report.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.rows.len();
        state.rows.retain(|r| r.id != id);
        Ok(state.rows.len() < before)
    }
}

#[derive(Clone, Default)]
pub struct MemExpenseLineStore {
    state: Arc<Mutex<Table<ExpenseLine>>>,
}

impl ExpenseLineStore for MemExpenseLineStore {
    async fn all(&self) -> Result<Vec<ExpenseLine>> {
        let mut rows = self.state.lock().unwrap().rows.clone();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn by_id(&self, id: u64) -> Result<Option<ExpenseLine>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .find(|l| l.id == id)
            .cloned())
    }

    async fn by_report(&self, report_id: u64) -> Result<Vec<ExpenseLine>> {
        let mut rows: Vec<ExpenseLine> = self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .filter(|l| l.report_id == report_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn create(&self, new: NewExpenseLine) -> Result<ExpenseLine> {
        let mut state = self.state.lock().unwrap();
        let line = ExpenseLine {
            id: state.next_id(),
            report_id: new.report_id,
            date: new.date,
            description: new.description,
            amount: new.amount,
            receipt_path: new.receipt_path,
            km_rate_id: new.km_rate_id,
            distance_km: new.distance_km,
        };
        state.rows.push(line.clone());
        Ok(line)
    }

    async fn update(&self, line: &ExpenseLine) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(row) = state.rows.iter_mut().find(|l| l.id == line.id) {
            *row = line.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.rows.len();
        state.rows.retain(|l| l.id != id);
        Ok(state.rows.len() < before)
    }
}

/* ===================== projects and km rates ===================== */

#[derive(Clone, Default)]
pub struct MemProjectStore {
    state: Arc<Mutex<Table<Project>>>,
}

impl ProjectStore for MemProjectStore {
    async fn all(&self) -> Result<Vec<Project>> {
        let mut rows = self.state.lock().unwrap().rows.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn by_id(&self, id: u64) -> Result<Option<Project>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn create(&self, name: String, description: Option<String>) -> Result<Project> {
        let mut state = self.state.lock().unwrap();
        let project = Project {
            id: state.next_id(),
            name,
            description,
        };
        state.rows.push(project.clone());
        Ok(project)
    }

    async fn update(&self, project: &Project) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(row) = state.rows.iter_mut().find(|p| p.id == project.id) {
            *row = project.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.rows.len();
        state.rows.retain(|p| p.id != id);
        Ok(state.rows.len() < before)
    }
}

#[derive(Clone, Default)]
pub struct MemKmRateStore {
    state: Arc<Mutex<Table<KmRate>>>,
}

impl KmRateStore for MemKmRateStore {
    async fn all(&self) -> Result<Vec<KmRate>> {
        let mut rows = self.state.lock().unwrap().rows.clone();
        rows.sort_by(|a, b| a.vehicle_category.cmp(&b.vehicle_category));
        Ok(rows)
    }

    async fn by_id(&self, id: u64) -> Result<Option<KmRate>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn by_category(&self, category: &str) -> Result<Option<KmRate>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .rows
            .iter()
            .find(|r| r.vehicle_category == category)
            .cloned())
    }

    async fn create(&self, category: String, rate_per_km: Decimal) -> Result<KmRate> {
        let mut state = self.state.lock().unwrap();
        let rate = KmRate {
            id: state.next_id(),
            vehicle_category: category,
            rate_per_km,
        };
        state.rows.push(rate.clone());
        Ok(rate)
    }

    async fn update(&self, rate: &KmRate) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(row) = state.rows.iter_mut().find(|r| r.id == rate.id) {
            *row = rate.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.rows.len();
        state.rows.retain(|r| r.id != id);
        Ok(state.rows.len() < before)
    }
}

/* ===================== worlds and seeding ===================== */

pub type TestLeaveService = LeaveService<MemLeaveStore, MemHolidayStore, MemUserStore>;
pub type TestExpenseService = ExpenseService<
    MemExpenseReportStore,
    MemExpenseLineStore,
    MemProjectStore,
    MemKmRateStore,
    MemUserStore,
>;

pub struct LeaveWorld {
    pub users: MemUserStore,
    pub holidays: MemHolidayStore,
    pub leaves: MemLeaveStore,
    pub svc: TestLeaveService,
}

pub fn leave_world() -> LeaveWorld {
    let users = MemUserStore::default();
    let holidays = MemHolidayStore::default();
    let leaves = MemLeaveStore::new(users.clone());
    let svc = LeaveService::new(leaves.clone(), holidays.clone(), users.clone());
    LeaveWorld {
        users,
        holidays,
        leaves,
        svc,
    }
}

pub struct ExpenseWorld {
    pub users: MemUserStore,
    pub projects: MemProjectStore,
    pub km_rates: MemKmRateStore,
    pub reports: MemExpenseReportStore,
    pub lines: MemExpenseLineStore,
    pub svc: TestExpenseService,
}

pub fn expense_world() -> ExpenseWorld {
    let users = MemUserStore::default();
    let projects = MemProjectStore::default();
    let km_rates = MemKmRateStore::default();
    let reports = MemExpenseReportStore::new(users.clone());
    let lines = MemExpenseLineStore::default();
    let svc = ExpenseService::new(
        reports.clone(),
        lines.clone(),
        projects.clone(),
        km_rates.clone(),
        users.clone(),
    );
    ExpenseWorld {
        users,
        projects,
        km_rates,
        reports,
        lines,
        svc,
    }
}

pub async fn seed_user(
    users: &MemUserStore,
    name: &str,
    role: Role,
    manager_id: Option<u64>,
) -> User {
    users
        .create(NewUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            password: "$argon2id$stub".to_string(),
            role,
            position: "Engineer".to_string(),
            manager_id,
            leave_entitlement: 30,
        })
        .await
        .unwrap()
}

/// An employee reporting to a freshly seeded manager.
pub async fn seed_pair(users: &MemUserStore) -> (User, User) {
    let manager = seed_user(users, "Mongi Trabelsi", Role::Employee, None).await;
    let employee = seed_user(users, "Amel Ben Salah", Role::Employee, Some(manager.id)).await;
    (employee, manager)
}

/// Inserts a request directly, bypassing service validation; lets tests plant
/// approved or historical rows.
pub async fn seed_leave(
    leaves: &MemLeaveStore,
    user_id: u64,
    start: NaiveDate,
    end: NaiveDate,
    status: LeaveStatus,
) -> LeaveRequest {
    leaves
        .create(NewLeaveRequest {
            user_id,
            start_date: start,
            end_date: end,
            leave_type: LeaveType::Annual,
            status,
            submitted_at: Utc::now(),
            comment: None,
        })
        .await
        .unwrap()
}

pub fn actor(user: &User) -> Actor {
    Actor {
        user_id: user.id,
        role: user.role,
    }
}

pub fn admin_actor(user_id: u64) -> Actor {
    Actor {
        user_id,
        role: Role::Admin,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// First Monday at least `days_out` days ahead; keeps created ranges clear of
/// the past-date validation while making Sunday counts predictable. Tests lay
/// out up to nine weeks past the anchor, and the balance engine charges by
/// start year, so an anchor too close to December 31 shifts to the first
/// Monday of the next year.
pub fn upcoming_monday(days_out: u64) -> NaiveDate {
    let mut day = Utc::now().date_naive() + Days::new(days_out);
    while day.weekday() != Weekday::Mon {
        day = day.succ_opt().unwrap();
    }
    if (day + Days::new(63)).year() != day.year() {
        day = NaiveDate::from_ymd_opt(day.year() + 1, 1, 1).unwrap();
        while day.weekday() != Weekday::Mon {
            day = day.succ_opt().unwrap();
        }
    }
    day
}

pub fn line(day: NaiveDate, description: &str, amount: Decimal) -> LineInput {
    LineInput {
        date: day,
        description: description.to_string(),
        amount,
        receipt_path: None,
        km_rate_id: None,
        distance_km: None,
    }
}
