//! Holiday calendar administration. One holiday per calendar date; the
//! calendar feeds every day-count in the leave lifecycle.

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::model::Holiday;
use crate::store::HolidayStore;

#[derive(Debug, Clone, Default)]
pub struct HolidayPatch {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

pub struct HolidayService<H> {
    holidays: H,
}

impl<H> HolidayService<H>
where
    H: HolidayStore,
{
    pub fn new(holidays: H) -> Self {
        Self { holidays }
    }

    pub async fn list(&self) -> Result<Vec<Holiday>> {
        self.holidays.all().await
    }

    pub async fn get(&self, id: u64) -> Result<Holiday> {
        self.holidays
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("holiday not found"))
    }

    pub async fn by_year(&self, year: i32) -> Result<Vec<Holiday>> {
        self.holidays.by_year(year).await
    }

    pub async fn is_holiday(&self, date: NaiveDate) -> Result<bool> {
        self.holidays.exists_on(date).await
    }

    pub async fn create(&self, date: NaiveDate, description: String) -> Result<Holiday> {
        let description = description.trim().to_string();
        if description.is_empty() {
            return Err(Error::invalid_input("description is required"));
        }
        if self.holidays.exists_on(date).await? {
            return Err(Error::conflict("a holiday already exists on this date"));
        }
        self.holidays.create(date, description).await
    }

    pub async fn update(&self, id: u64, patch: HolidayPatch) -> Result<Holiday> {
        let mut holiday = self
            .holidays
            .by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("holiday not found"))?;

        if let Some(date) = patch.date {
            if date != holiday.date && self.holidays.exists_on(date).await? {
                return Err(Error::conflict("a holiday already exists on this date"));
            }
            holiday.date = date;
        }
        if let Some(description) = patch.description {
            let description = description.trim().to_string();
            if description.is_empty() {
                return Err(Error::invalid_input("description is required"));
            }
            holiday.description = description;
        }

        self.holidays.update(&holiday).await?;
        Ok(holiday)
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        if !self.holidays.delete(id).await? {
            return Err(Error::not_found("holiday not found"));
        }
        Ok(())
    }
}
