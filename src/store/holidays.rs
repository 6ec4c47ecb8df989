use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::error::Result;
use crate::model::Holiday;

#[allow(async_fn_in_trait)]
pub trait HolidayStore {
    async fn all(&self) -> Result<Vec<Holiday>>;
    async fn by_id(&self, id: u64) -> Result<Option<Holiday>>;
    async fn by_year(&self, year: i32) -> Result<Vec<Holiday>>;
    async fn in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Holiday>>;
    async fn count_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<i64>;
    async fn exists_on(&self, date: NaiveDate) -> Result<bool>;
    async fn create(&self, date: NaiveDate, description: String) -> Result<Holiday>;
    async fn update(&self, holiday: &Holiday) -> Result<()>;
    async fn delete(&self, id: u64) -> Result<bool>;
}

#[derive(Clone)]
pub struct MySqlHolidayStore {
    pool: MySqlPool,
}

impl MySqlHolidayStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl HolidayStore for MySqlHolidayStore {
    async fn all(&self) -> Result<Vec<Holiday>> {
        let rows = sqlx::query_as::<_, Holiday>(
            "SELECT id, date, description FROM holidays ORDER BY date ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_id(&self, id: u64) -> Result<Option<Holiday>> {
        let row = sqlx::query_as::<_, Holiday>(
            "SELECT id, date, description FROM holidays WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn by_year(&self, year: i32) -> Result<Vec<Holiday>> {
        let rows = sqlx::query_as::<_, Holiday>(
            "SELECT id, date, description FROM holidays \
             WHERE YEAR(date) = ? ORDER BY date ASC",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Holiday>> {
        let rows = sqlx::query_as::<_, Holiday>(
            "SELECT id, date, description FROM holidays \
             WHERE date BETWEEN ? AND ? ORDER BY date ASC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM holidays WHERE date BETWEEN ? AND ?",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn exists_on(&self, date: NaiveDate) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM holidays WHERE date = ?",
        )
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    async fn create(&self, date: NaiveDate, description: String) -> Result<Holiday> {
        let result = sqlx::query("INSERT INTO holidays (date, description) VALUES (?, ?)")
            .bind(date)
            .bind(description.clone())
            .execute(&self.pool)
            .await?;
        Ok(Holiday {
            id: result.last_insert_id(),
            date,
            description,
        })
    }

    async fn update(&self, holiday: &Holiday) -> Result<()> {
        sqlx::query("UPDATE holidays SET date = ?, description = ? WHERE id = ?")
            .bind(holiday.date)
            .bind(holiday.description.as_str())
            .bind(holiday.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM holidays WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
