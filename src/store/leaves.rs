use chrono::{DateTime, NaiveDate, Utc};
use sqlx::MySqlPool;

use crate::error::Result;
use crate::model::{LeaveRequest, LeaveStatus, LeaveType};

/// Insert payload; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewLeaveRequest {
    pub user_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_type: LeaveType,
    pub status: LeaveStatus,
    pub submitted_at: DateTime<Utc>,
    pub comment: Option<String>,
}

/// Optional narrowing plus 1-based pagination for the admin listing.
#[derive(Debug, Clone, Default)]
pub struct LeaveFilter {
    pub user_id: Option<u64>,
    pub status: Option<LeaveStatus>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[allow(async_fn_in_trait)]
pub trait LeaveStore {
    async fn all(&self) -> Result<Vec<LeaveRequest>>;
    async fn by_id(&self, id: u64) -> Result<Option<LeaveRequest>>;
    async fn by_user(&self, user_id: u64) -> Result<Vec<LeaveRequest>>;
    /// Requests of the manager's direct reports, via the user hierarchy.
    async fn by_manager(&self, manager_id: u64) -> Result<Vec<LeaveRequest>>;
    async fn by_status(&self, status: LeaveStatus) -> Result<Vec<LeaveRequest>>;
    /// Filtered page plus the total row count matching the filter.
    async fn filtered(&self, filter: &LeaveFilter) -> Result<(Vec<LeaveRequest>, i64)>;
    /// True when `[start, end]` shares at least one day with an approved
    /// request of the same user. `exclude` skips a request id so updates do
    /// not collide with themselves.
    async fn has_approved_overlap(
        &self,
        user_id: u64,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<u64>,
    ) -> Result<bool>;
    /// Date ranges of approved requests starting in `year`; feeds the
    /// balance engine.
    async fn approved_ranges_in_year(
        &self,
        user_id: u64,
        year: i32,
    ) -> Result<Vec<(NaiveDate, NaiveDate)>>;
    async fn create(&self, new: NewLeaveRequest) -> Result<LeaveRequest>;
    async fn update(&self, request: &LeaveRequest) -> Result<()>;
    async fn delete(&self, id: u64) -> Result<bool>;
}

#[derive(Clone)]
pub struct MySqlLeaveStore {
    pool: MySqlPool,
}

impl MySqlLeaveStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

// Helper enum for typed sqlx binding of the dynamic WHERE clause.
enum FilterValue {
    U64(u64),
    Status(LeaveStatus),
}

impl LeaveStore for MySqlLeaveStore {
    async fn all(&self) -> Result<Vec<LeaveRequest>> {
        let rows = sqlx::query_as::<_, LeaveRequest>(
            "SELECT id, user_id, start_date, end_date, leave_type, status, \
                    submitted_at, comment, manager_comment \
             FROM leave_requests \
             ORDER BY submitted_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_id(&self, id: u64) -> Result<Option<LeaveRequest>> {
        let row = sqlx::query_as::<_, LeaveRequest>(
            "SELECT id, user_id, start_date, end_date, leave_type, status, \
                    submitted_at, comment, manager_comment \
             FROM leave_requests \
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn by_user(&self, user_id: u64) -> Result<Vec<LeaveRequest>> {
        let rows = sqlx::query_as::<_, LeaveRequest>(
            "SELECT id, user_id, start_date, end_date, leave_type, status, \
                    submitted_at, comment, manager_comment \
             FROM leave_requests \
             WHERE user_id = ? \
             ORDER BY submitted_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_manager(&self, manager_id: u64) -> Result<Vec<LeaveRequest>> {
        let rows = sqlx::query_as::<_, LeaveRequest>(
            "SELECT lr.id, lr.user_id, lr.start_date, lr.end_date, lr.leave_type, \
                    lr.status, lr.submitted_at, lr.comment, lr.manager_comment \
             FROM leave_requests lr \
             INNER JOIN users u ON u.id = lr.user_id \
             WHERE u.manager_id = ? \
             ORDER BY lr.submitted_at DESC",
        )
        .bind(manager_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_status(&self, status: LeaveStatus) -> Result<Vec<LeaveRequest>> {
        let rows = sqlx::query_as::<_, LeaveRequest>(
            "SELECT id, user_id, start_date, end_date, leave_type, status, \
                    submitted_at, comment, manager_comment \
             FROM leave_requests \
             WHERE status = ? \
             ORDER BY submitted_at DESC",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn filtered(&self, filter: &LeaveFilter) -> Result<(Vec<LeaveRequest>, i64)> {
        let per_page = filter.per_page.unwrap_or(10).min(100);
        let page = filter.page.unwrap_or(1).max(1);
        let offset = (page - 1) * per_page;

        let mut where_sql = String::from(" WHERE 1=1");
        let mut args: Vec<FilterValue> = Vec::new();

        if let Some(user_id) = filter.user_id {
            where_sql.push_str(" AND user_id = ?");
            args.push(FilterValue::U64(user_id));
        }
        if let Some(status) = filter.status {
            where_sql.push_str(" AND status = ?");
            args.push(FilterValue::Status(status));
        }

        let count_sql = format!("SELECT COUNT(*) FROM leave_requests{}", where_sql);
        let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
        for arg in &args {
            count_q = match arg {
                FilterValue::U64(v) => count_q.bind(*v),
                FilterValue::Status(s) => count_q.bind(*s),
            };
        }
        let total = count_q.fetch_one(&self.pool).await?;

        let data_sql = format!(
            "SELECT id, user_id, start_date, end_date, leave_type, status, \
                    submitted_at, comment, manager_comment \
             FROM leave_requests{} \
             ORDER BY submitted_at DESC \
             LIMIT ? OFFSET ?",
            where_sql
        );
        let mut data_q = sqlx::query_as::<_, LeaveRequest>(&data_sql);
        for arg in args {
            data_q = match arg {
                FilterValue::U64(v) => data_q.bind(v),
                FilterValue::Status(s) => data_q.bind(s),
            };
        }
        let rows = data_q
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    async fn has_approved_overlap(
        &self,
        user_id: u64,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<u64>,
    ) -> Result<bool> {
        // Inclusive ranges overlap iff each starts no later than the other ends.
        let mut sql = String::from(
            "SELECT COUNT(*) FROM leave_requests \
             WHERE user_id = ? AND status = 'approved' \
             AND start_date <= ? AND end_date >= ?",
        );
        if exclude.is_some() {
            sql.push_str(" AND id <> ?");
        }
        let mut q = sqlx::query_scalar::<_, i64>(&sql)
            .bind(user_id)
            .bind(end)
            .bind(start);
        if let Some(id) = exclude {
            q = q.bind(id);
        }
        let count = q.fetch_one(&self.pool).await?;
        Ok(count > 0)
    }

    async fn approved_ranges_in_year(
        &self,
        user_id: u64,
        year: i32,
    ) -> Result<Vec<(NaiveDate, NaiveDate)>> {
        let rows = sqlx::query_as::<_, (NaiveDate, NaiveDate)>(
            "SELECT start_date, end_date FROM leave_requests \
             WHERE user_id = ? AND status = 'approved' AND YEAR(start_date) = ?",
        )
        .bind(user_id)
        .bind(year)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create(&self, new: NewLeaveRequest) -> Result<LeaveRequest> {
        let result = sqlx::query(
            "INSERT INTO leave_requests \
             (user_id, start_date, end_date, leave_type, status, submitted_at, comment) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new.user_id)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.leave_type)
        .bind(new.status)
        .bind(new.submitted_at)
        .bind(new.comment.clone())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id();
        Ok(LeaveRequest {
            id,
            user_id: new.user_id,
            start_date: new.start_date,
            end_date: new.end_date,
            leave_type: new.leave_type,
            status: new.status,
            submitted_at: new.submitted_at,
            comment: new.comment,
            manager_comment: None,
        })
    }

    async fn update(&self, request: &LeaveRequest) -> Result<()> {
        sqlx::query(
            "UPDATE leave_requests \
             SET start_date = ?, end_date = ?, leave_type = ?, status = ?, \
                 comment = ?, manager_comment = ? \
             WHERE id = ?",
        )
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.leave_type)
        .bind(request.status)
        .bind(request.comment.as_deref())
        .bind(request.manager_comment.as_deref())
        .bind(request.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM leave_requests WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
