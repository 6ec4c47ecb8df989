use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::error::Result;
use crate::model::KmRate;

#[allow(async_fn_in_trait)]
pub trait KmRateStore {
    async fn all(&self) -> Result<Vec<KmRate>>;
    async fn by_id(&self, id: u64) -> Result<Option<KmRate>>;
    async fn by_category(&self, category: &str) -> Result<Option<KmRate>>;
    async fn create(&self, category: String, rate_per_km: Decimal) -> Result<KmRate>;
    async fn update(&self, rate: &KmRate) -> Result<()>;
    async fn delete(&self, id: u64) -> Result<bool>;
}

#[derive(Clone)]
pub struct MySqlKmRateStore {
    pool: MySqlPool,
}

impl MySqlKmRateStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl KmRateStore for MySqlKmRateStore {
    async fn all(&self) -> Result<Vec<KmRate>> {
        let rows = sqlx::query_as::<_, KmRate>(
            "SELECT id, vehicle_category, rate_per_km FROM km_rates \
             ORDER BY vehicle_category ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_id(&self, id: u64) -> Result<Option<KmRate>> {
        let row = sqlx::query_as::<_, KmRate>(
            "SELECT id, vehicle_category, rate_per_km FROM km_rates WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn by_category(&self, category: &str) -> Result<Option<KmRate>> {
        let row = sqlx::query_as::<_, KmRate>(
            "SELECT id, vehicle_category, rate_per_km FROM km_rates \
             WHERE vehicle_category = ?",
        )
        .bind(category)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create(&self, category: String, rate_per_km: Decimal) -> Result<KmRate> {
        let result =
            sqlx::query("INSERT INTO km_rates (vehicle_category, rate_per_km) VALUES (?, ?)")
                .bind(category.clone())
                .bind(rate_per_km)
                .execute(&self.pool)
                .await?;
        Ok(KmRate {
            id: result.last_insert_id(),
            vehicle_category: category,
            rate_per_km,
        })
    }

    async fn update(&self, rate: &KmRate) -> Result<()> {
        sqlx::query("UPDATE km_rates SET vehicle_category = ?, rate_per_km = ? WHERE id = ?")
            .bind(rate.vehicle_category.as_str())
            .bind(rate.rate_per_km)
            .bind(rate.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM km_rates WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
