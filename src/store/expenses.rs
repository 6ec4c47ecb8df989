use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::error::Result;
use crate::model::{ExpenseLine, ExpenseReport, ExpenseStatus};

#[derive(Debug, Clone)]
pub struct NewExpenseReport {
    pub user_id: u64,
    pub project_id: Option<u64>,
    pub status: ExpenseStatus,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewExpenseLine {
    pub report_id: u64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub receipt_path: Option<String>,
    pub km_rate_id: Option<u64>,
    pub distance_km: Option<i32>,
}

#[allow(async_fn_in_trait)]
pub trait ExpenseReportStore {
    async fn all(&self) -> Result<Vec<ExpenseReport>>;
    async fn by_id(&self, id: u64) -> Result<Option<ExpenseReport>>;
    async fn by_user(&self, user_id: u64) -> Result<Vec<ExpenseReport>>;
    async fn by_manager(&self, manager_id: u64) -> Result<Vec<ExpenseReport>>;
    async fn by_project(&self, project_id: u64) -> Result<Vec<ExpenseReport>>;
    /// True when the user already has a report for the project that is not
    /// rejected. `exclude` skips a report id on updates.
    async fn has_open_for_project(
        &self,
        user_id: u64,
        project_id: u64,
        exclude: Option<u64>,
    ) -> Result<bool>;
    async fn create(&self, new: NewExpenseReport) -> Result<ExpenseReport>;
    async fn update(&self, report: &ExpenseReport) -> Result<()>;
    async fn delete(&self, id: u64) -> Result<bool>;
}

#[allow(async_fn_in_trait)]
pub trait ExpenseLineStore {
    async fn all(&self) -> Result<Vec<ExpenseLine>>;
    async fn by_id(&self, id: u64) -> Result<Option<ExpenseLine>>;
    async fn by_report(&self, report_id: u64) -> Result<Vec<ExpenseLine>>;
    async fn create(&self, new: NewExpenseLine) -> Result<ExpenseLine>;
    async fn update(&self, line: &ExpenseLine) -> Result<()>;
    async fn delete(&self, id: u64) -> Result<bool>;
}

#[derive(Clone)]
pub struct MySqlExpenseReportStore {
    pool: MySqlPool,
}

impl MySqlExpenseReportStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl ExpenseReportStore for MySqlExpenseReportStore {
    async fn all(&self) -> Result<Vec<ExpenseReport>> {
        let rows = sqlx::query_as::<_, ExpenseReport>(
            "SELECT id, user_id, project_id, status, submitted_at, manager_comment \
             FROM expense_reports \
             ORDER BY submitted_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_id(&self, id: u64) -> Result<Option<ExpenseReport>> {
        let row = sqlx::query_as::<_, ExpenseReport>(
            "SELECT id, user_id, project_id, status, submitted_at, manager_comment \
             FROM expense_reports \
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn by_user(&self, user_id: u64) -> Result<Vec<ExpenseReport>> {
        let rows = sqlx::query_as::<_, ExpenseReport>(
            "SELECT id, user_id, project_id, status, submitted_at, manager_comment \
             FROM expense_reports \
             WHERE user_id = ? \
             ORDER BY submitted_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_manager(&self, manager_id: u64) -> Result<Vec<ExpenseReport>> {
        let rows = sqlx::query_as::<_, ExpenseReport>(
            "SELECT er.id, er.user_id, er.project_id, er.status, er.submitted_at, \
                    er.manager_comment \
             FROM expense_reports er \
             INNER JOIN users u ON u.id = er.user_id \
             WHERE u.manager_id = ? \
             ORDER BY er.submitted_at DESC",
        )
        .bind(manager_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_project(&self, project_id: u64) -> Result<Vec<ExpenseReport>> {
        let rows = sqlx::query_as::<_, ExpenseReport>(
            "SELECT id, user_id, project_id, status, submitted_at, manager_comment \
             FROM expense_reports \
             WHERE project_id = ? \
             ORDER BY submitted_at DESC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn has_open_for_project(
        &self,
        user_id: u64,
        project_id: u64,
        exclude: Option<u64>,
    ) -> Result<bool> {
        let mut sql = String::from(
            "SELECT COUNT(*) FROM expense_reports \
             WHERE user_id = ? AND project_id = ? AND status <> 'rejected'",
        );
        if exclude.is_some() {
            sql.push_str(" AND id <> ?");
        }
        let mut q = sqlx::query_scalar::<_, i64>(&sql)
            .bind(user_id)
            .bind(project_id);
        if let Some(id) = exclude {
            q = q.bind(id);
        }
        let count = q.fetch_one(&self.pool).await?;
        Ok(count > 0)
    }

    async fn create(&self, new: NewExpenseReport) -> Result<ExpenseReport> {
        let result = sqlx::query(
            "INSERT INTO expense_reports (user_id, project_id, status, submitted_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(new.user_id)
        .bind(new.project_id)
        .bind(new.status)
        .bind(new.submitted_at)
        .execute(&self.pool)
        .await?;

        Ok(ExpenseReport {
            id: result.last_insert_id(),
            user_id: new.user_id,
            project_id: new.project_id,
            status: new.status,
            submitted_at: new.submitted_at,
            manager_comment: None,
        })
    }

    async fn update(&self, report: &ExpenseReport) -> Result<()> {
        sqlx::query(
            "UPDATE expense_reports \
             SET project_id = ?, status = ?, manager_comment = ? \
             WHERE id = ?",
        )
        .bind(report.project_id)
        .bind(report.status)
        .bind(report.manager_comment.as_deref())
        .bind(report.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expense_reports WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct MySqlExpenseLineStore {
    pool: MySqlPool,
}

impl MySqlExpenseLineStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl ExpenseLineStore for MySqlExpenseLineStore {
    async fn all(&self) -> Result<Vec<ExpenseLine>> {
        let rows = sqlx::query_as::<_, ExpenseLine>(
            "SELECT id, report_id, date, description, amount, receipt_path, \
                    km_rate_id, distance_km \
             FROM expense_lines \
             ORDER BY date DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_id(&self, id: u64) -> Result<Option<ExpenseLine>> {
        let row = sqlx::query_as::<_, ExpenseLine>(
            "SELECT id, report_id, date, description, amount, receipt_path, \
                    km_rate_id, distance_km \
             FROM expense_lines \
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn by_report(&self, report_id: u64) -> Result<Vec<ExpenseLine>> {
        let rows = sqlx::query_as::<_, ExpenseLine>(
            "SELECT id, report_id, date, description, amount, receipt_path, \
                    km_rate_id, distance_km \
             FROM expense_lines \
             WHERE report_id = ? \
             ORDER BY date DESC",
        )
        .bind(report_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create(&self, new: NewExpenseLine) -> Result<ExpenseLine> {
        let result = sqlx::query(
            "INSERT INTO expense_lines \
             (report_id, date, description, amount, receipt_path, km_rate_id, distance_km) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new.report_id)
        .bind(new.date)
        .bind(new.description.clone())
        .bind(new.amount)
        .bind(new.receipt_path.clone())
        .bind(new.km_rate_id)
        .bind(new.distance_km)
        .execute(&self.pool)
        .await?;

        Ok(ExpenseLine {
            id: result.last_insert_id(),
            report_id: new.report_id,
            date: new.date,
            description: new.description,
            amount: new.amount,
            receipt_path: new.receipt_path,
            km_rate_id: new.km_rate_id,
            distance_km: new.distance_km,
        })
    }

    async fn update(&self, line: &ExpenseLine) -> Result<()> {
        sqlx::query(
            "UPDATE expense_lines \
             SET date = ?, description = ?, amount = ?, receipt_path = ?, \
                 km_rate_id = ?, distance_km = ? \
             WHERE id = ?",
        )
        .bind(line.date)
        .bind(line.description.as_str())
        .bind(line.amount)
        .bind(line.receipt_path.as_deref())
        .bind(line.km_rate_id)
        .bind(line.distance_km)
        .bind(line.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expense_lines WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
