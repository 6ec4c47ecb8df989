use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::model::KmRate;
use crate::store::KmRateStore;

#[derive(Debug, Clone, Default)]
pub struct KmRatePatch {
    pub vehicle_category: Option<String>,
    pub rate_per_km: Option<Decimal>,
}

pub struct KmRateService<K> {
    km_rates: K,
}

impl<K: KmRateStore> KmRateService<K> {
    pub fn new(km_rates: K) -> Self {
        Self { km_rates }
    }

    pub async fn list(&self) -> Result<Vec<KmRate>> {
        self.km_rates.all().await
    }

    pub async fn get(&self, id: u64) -> Result<KmRate> {
        self.km_rates
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("km rate not found"))
    }

    pub async fn by_category(&self, category: &str) -> Result<KmRate> {
        self.km_rates
            .by_category(category.trim())
            .await?
            .ok_or_else(|| Error::not_found("km rate not found"))
    }

    pub async fn create(&self, vehicle_category: String, rate_per_km: Decimal) -> Result<KmRate> {
        let vehicle_category = self.normalize_category(vehicle_category)?;
        if rate_per_km <= Decimal::ZERO {
            return Err(Error::invalid_input("rate must be positive"));
        }
        if self
            .km_rates
            .by_category(&vehicle_category)
            .await?
            .is_some()
        {
            return Err(Error::conflict(
                "a rate for this vehicle category already exists",
            ));
        }
        self.km_rates.create(vehicle_category, rate_per_km).await
    }

    pub async fn update(&self, id: u64, patch: KmRatePatch) -> Result<KmRate> {
        let mut rate = self.get(id).await?;
        if let Some(vehicle_category) = patch.vehicle_category {
            let vehicle_category = self.normalize_category(vehicle_category)?;
            // Uniqueness check skips the row being updated.
            if let Some(other) = self.km_rates.by_category(&vehicle_category).await? {
                if other.id != id {
                    return Err(Error::conflict(
                        "a rate for this vehicle category already exists",
                    ));
                }
            }
            rate.vehicle_category = vehicle_category;
        }
        if let Some(rate_per_km) = patch.rate_per_km {
            if rate_per_km <= Decimal::ZERO {
                return Err(Error::invalid_input("rate must be positive"));
            }
            rate.rate_per_km = rate_per_km;
        }
        self.km_rates.update(&rate).await?;
        Ok(rate)
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        if !self.km_rates.delete(id).await? {
            return Err(Error::not_found("km rate not found"));
        }
        Ok(())
    }

    fn normalize_category(&self, raw: String) -> Result<String> {
        let category = raw.trim().to_string();
        if category.is_empty() {
            return Err(Error::invalid_input("vehicle category is required"));
        }
        Ok(category)
    }
}
