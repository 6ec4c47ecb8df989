mod common;

use chrono::Datelike;
use common::*;
use conges_api::error::Error;
use conges_api::service::{HolidayPatch, HolidayService};

fn service() -> HolidayService<MemHolidayStore> {
    HolidayService::new(MemHolidayStore::default())
}

#[actix_web::test]
async fn one_holiday_per_calendar_date() {
    let svc = service();

    svc.create(date(2026, 1, 1), "Jour de l'An".to_string())
        .await
        .unwrap();
    let err = svc
        .create(date(2026, 1, 1), "Doublon".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
}

#[actix_web::test]
async fn descriptions_are_trimmed_and_required() {
    let svc = service();

    let created = svc
        .create(date(2026, 5, 1), "  Fête du Travail  ".to_string())
        .await
        .unwrap();
    assert_eq!(created.description, "Fête du Travail");

    let err = svc
        .create(date(2026, 5, 2), "   ".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[actix_web::test]
async fn update_cannot_move_onto_a_taken_date() {
    let svc = service();

    let jan = svc
        .create(date(2026, 1, 1), "Jour de l'An".to_string())
        .await
        .unwrap();
    let mars = svc
        .create(date(2026, 3, 20), "Fête de l'Indépendance".to_string())
        .await
        .unwrap();

    let err = svc
        .update(
            mars.id,
            HolidayPatch {
                date: Some(jan.date),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    // Re-stating the holiday's own date only touches the description.
    let renamed = svc
        .update(
            jan.id,
            HolidayPatch {
                date: Some(jan.date),
                description: Some("Nouvel An".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.date, jan.date);
    assert_eq!(renamed.description, "Nouvel An");
}

#[actix_web::test]
async fn year_listing_filters_by_calendar_year() {
    let svc = service();

    svc.create(date(2025, 1, 1), "Jour de l'An".to_string())
        .await
        .unwrap();
    svc.create(date(2026, 1, 1), "Jour de l'An".to_string())
        .await
        .unwrap();
    svc.create(date(2026, 5, 1), "Fête du Travail".to_string())
        .await
        .unwrap();

    let of_2026 = svc.by_year(2026).await.unwrap();
    assert_eq!(of_2026.len(), 2);
    assert!(of_2026.iter().all(|h| h.date.year() == 2026));
}

#[actix_web::test]
async fn is_holiday_reflects_the_calendar() {
    let svc = service();

    svc.create(date(2026, 8, 13), "Fête de la Femme".to_string())
        .await
        .unwrap();

    assert!(svc.is_holiday(date(2026, 8, 13)).await.unwrap());
    assert!(!svc.is_holiday(date(2026, 8, 14)).await.unwrap());
}

#[actix_web::test]
async fn missing_holidays_are_not_found() {
    let svc = service();

    let err = svc.get(7).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    let err = svc.delete(7).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    let err = svc.update(7, HolidayPatch::default()).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}
