mod common;

use chrono::{Days, NaiveDate, Utc};
use common::*;
use conges_api::error::Error;
use conges_api::model::{ExpenseStatus, Role};
use conges_api::service::LineInput;
use conges_api::store::{KmRateStore, ProjectStore};
use rust_decimal::Decimal;

fn yesterday() -> NaiveDate {
    Utc::now().date_naive() - Days::new(1)
}

#[actix_web::test]
async fn a_report_requires_an_assigned_manager() {
    let w = expense_world();
    let boss = seed_user(&w.users, "Mongi Trabelsi", Role::Employee, None).await;
    let project = w
        .projects
        .create("Refonte intranet".to_string(), None)
        .await
        .unwrap();

    let err = w.svc.create_report(boss.id, project.id).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let err = w.svc.create_report(999, project.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[actix_web::test]
async fn the_project_must_exist() {
    let w = expense_world();
    let (emp, _mgr) = seed_pair(&w.users).await;

    let err = w.svc.create_report(emp.id, 999).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[actix_web::test]
async fn one_open_report_per_user_and_project() {
    let w = expense_world();
    let (emp, mgr) = seed_pair(&w.users).await;
    let project = w
        .projects
        .create("Refonte intranet".to_string(), None)
        .await
        .unwrap();

    let first = w.svc.create_report(emp.id, project.id).await.unwrap();
    let err = w.svc.create_report(emp.id, project.id).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    // A rejection frees the slot.
    w.svc
        .update_report_status(first.id, actor(&mgr), ExpenseStatus::Rejected, None)
        .await
        .unwrap();
    let second = w.svc.create_report(emp.id, project.id).await.unwrap();

    // An approval keeps holding it.
    w.svc
        .update_report_status(second.id, actor(&mgr), ExpenseStatus::Approved, None)
        .await
        .unwrap();
    let err = w.svc.create_report(emp.id, project.id).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
}

#[actix_web::test]
async fn the_open_report_rule_is_scoped_to_user_and_project() {
    let w = expense_world();
    let (emp, mgr) = seed_pair(&w.users).await;
    let colleague = seed_user(&w.users, "Karim Gharbi", Role::Employee, Some(mgr.id)).await;
    let intranet = w
        .projects
        .create("Refonte intranet".to_string(), None)
        .await
        .unwrap();
    let mobile = w
        .projects
        .create("App mobile".to_string(), None)
        .await
        .unwrap();

    w.svc.create_report(emp.id, intranet.id).await.unwrap();
    w.svc.create_report(emp.id, mobile.id).await.unwrap();
    w.svc.create_report(colleague.id, intranet.id).await.unwrap();
}

#[actix_web::test]
async fn report_updates_are_for_the_owner_or_an_admin_while_pending() {
    let w = expense_world();
    let (emp, mgr) = seed_pair(&w.users).await;
    let colleague = seed_user(&w.users, "Karim Gharbi", Role::Employee, Some(mgr.id)).await;
    let intranet = w
        .projects
        .create("Refonte intranet".to_string(), None)
        .await
        .unwrap();
    let mobile = w
        .projects
        .create("App mobile".to_string(), None)
        .await
        .unwrap();

    let report = w.svc.create_report(emp.id, intranet.id).await.unwrap();

    let err = w
        .svc
        .update_report(report.id, actor(&colleague), mobile.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));

    let moved = w
        .svc
        .update_report(report.id, actor(&emp), mobile.id)
        .await
        .unwrap();
    assert_eq!(moved.project_id, Some(mobile.id));

    let back = w
        .svc
        .update_report(report.id, admin_actor(999), intranet.id)
        .await
        .unwrap();
    assert_eq!(back.project_id, Some(intranet.id));

    w.svc
        .update_report_status(report.id, actor(&mgr), ExpenseStatus::Approved, None)
        .await
        .unwrap();
    let err = w
        .svc
        .update_report(report.id, actor(&emp), mobile.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidState(_)));

    let err = w
        .svc
        .update_report(999, actor(&emp), mobile.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[actix_web::test]
async fn moving_a_report_cannot_collide_with_another_open_one() {
    let w = expense_world();
    let (emp, _mgr) = seed_pair(&w.users).await;
    let intranet = w
        .projects
        .create("Refonte intranet".to_string(), None)
        .await
        .unwrap();
    let mobile = w
        .projects
        .create("App mobile".to_string(), None)
        .await
        .unwrap();

    w.svc.create_report(emp.id, intranet.id).await.unwrap();
    let second = w.svc.create_report(emp.id, mobile.id).await.unwrap();

    let err = w
        .svc
        .update_report(second.id, actor(&emp), intranet.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    // Re-stating the report's own project is not a collision.
    let kept = w
        .svc
        .update_report(second.id, actor(&emp), mobile.id)
        .await
        .unwrap();
    assert_eq!(kept.project_id, Some(mobile.id));
}

#[actix_web::test]
async fn only_the_manager_of_record_or_an_admin_processes_a_report() {
    let w = expense_world();
    let (emp, mgr) = seed_pair(&w.users).await;
    let outsider = seed_user(&w.users, "Leila Haddad", Role::Employee, None).await;
    let intranet = w
        .projects
        .create("Refonte intranet".to_string(), None)
        .await
        .unwrap();
    let mobile = w
        .projects
        .create("App mobile".to_string(), None)
        .await
        .unwrap();

    let report = w.svc.create_report(emp.id, intranet.id).await.unwrap();

    let err = w
        .svc
        .update_report_status(report.id, actor(&emp), ExpenseStatus::Approved, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));

    let err = w
        .svc
        .update_report_status(report.id, actor(&outsider), ExpenseStatus::Approved, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));

    let done = w
        .svc
        .update_report_status(
            report.id,
            actor(&mgr),
            ExpenseStatus::Approved,
            Some("ok".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(done.status, ExpenseStatus::Approved);
    assert_eq!(done.manager_comment.as_deref(), Some("ok"));

    // Admins may process anyone's report.
    let other = w.svc.create_report(emp.id, mobile.id).await.unwrap();
    let done = w
        .svc
        .update_report_status(other.id, admin_actor(999), ExpenseStatus::Rejected, None)
        .await
        .unwrap();
    assert_eq!(done.status, ExpenseStatus::Rejected);
}

#[actix_web::test]
async fn report_processing_is_one_shot() {
    let w = expense_world();
    let (emp, mgr) = seed_pair(&w.users).await;
    let project = w
        .projects
        .create("Refonte intranet".to_string(), None)
        .await
        .unwrap();
    let report = w.svc.create_report(emp.id, project.id).await.unwrap();

    let err = w
        .svc
        .update_report_status(report.id, actor(&mgr), ExpenseStatus::Pending, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    w.svc
        .update_report_status(report.id, actor(&mgr), ExpenseStatus::Approved, None)
        .await
        .unwrap();
    let err = w
        .svc
        .update_report_status(report.id, actor(&mgr), ExpenseStatus::Rejected, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidState(_)));
}

#[actix_web::test]
async fn owners_delete_their_reports_in_any_status() {
    let w = expense_world();
    let (emp, mgr) = seed_pair(&w.users).await;
    let colleague = seed_user(&w.users, "Karim Gharbi", Role::Employee, Some(mgr.id)).await;
    let project = w
        .projects
        .create("Refonte intranet".to_string(), None)
        .await
        .unwrap();
    let report = w.svc.create_report(emp.id, project.id).await.unwrap();

    let err = w
        .svc
        .delete_report(report.id, actor(&colleague))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));

    // Deletion stays open after processing, unlike leave requests.
    w.svc
        .update_report_status(report.id, actor(&mgr), ExpenseStatus::Approved, None)
        .await
        .unwrap();
    w.svc.delete_report(report.id, actor(&emp)).await.unwrap();

    let err = w.svc.get_report(report.id, actor(&emp)).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    let err = w
        .svc
        .delete_report(report.id, actor(&emp))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[actix_web::test]
async fn lines_are_written_by_the_report_owner_only() {
    let w = expense_world();
    let (emp, mgr) = seed_pair(&w.users).await;
    let project = w
        .projects
        .create("Refonte intranet".to_string(), None)
        .await
        .unwrap();
    let report = w.svc.create_report(emp.id, project.id).await.unwrap();
    let day = yesterday();

    let err = w
        .svc
        .create_line(report.id, mgr.id, line(day, "Taxi", Decimal::new(1850, 2)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));

    // No admin override on this path.
    let err = w
        .svc
        .create_line(report.id, 999, line(day, "Taxi", Decimal::new(1850, 2)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));

    let created = w
        .svc
        .create_line(
            report.id,
            emp.id,
            line(day, "Taxi aéroport", Decimal::new(1850, 2)),
        )
        .await
        .unwrap();
    assert_eq!(created.report_id, report.id);
    assert_eq!(created.description, "Taxi aéroport");
}

#[actix_web::test]
async fn line_dates_descriptions_and_amounts_are_validated() {
    let w = expense_world();
    let (emp, _mgr) = seed_pair(&w.users).await;
    let project = w
        .projects
        .create("Refonte intranet".to_string(), None)
        .await
        .unwrap();
    let report = w.svc.create_report(emp.id, project.id).await.unwrap();

    let tomorrow = Utc::now().date_naive() + Days::new(1);
    let err = w
        .svc
        .create_line(report.id, emp.id, line(tomorrow, "Taxi", Decimal::new(1850, 2)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let err = w
        .svc
        .create_line(report.id, emp.id, line(yesterday(), "   ", Decimal::new(1850, 2)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let err = w
        .svc
        .create_line(
            report.id,
            emp.id,
            line(yesterday(), "Taxi", Decimal::new(-100, 2)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    // Descriptions are trimmed on the way in.
    let created = w
        .svc
        .create_line(
            report.id,
            emp.id,
            line(yesterday(), "  Déjeuner client  ", Decimal::new(3400, 2)),
        )
        .await
        .unwrap();
    assert_eq!(created.description, "Déjeuner client");
}

#[actix_web::test]
async fn km_lines_need_a_real_rate_and_a_distance() {
    let w = expense_world();
    let (emp, _mgr) = seed_pair(&w.users).await;
    let project = w
        .projects
        .create("Refonte intranet".to_string(), None)
        .await
        .unwrap();
    let report = w.svc.create_report(emp.id, project.id).await.unwrap();
    let rate = w
        .km_rates
        .create("Voiture 4 CV".to_string(), Decimal::new(512, 3))
        .await
        .unwrap();
    let day = yesterday();

    let err = w
        .svc
        .create_line(
            report.id,
            emp.id,
            LineInput {
                km_rate_id: Some(999),
                distance_km: Some(38),
                ..line(day, "Trajet client", Decimal::new(1945, 2))
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = w
        .svc
        .create_line(
            report.id,
            emp.id,
            LineInput {
                km_rate_id: Some(rate.id),
                distance_km: None,
                ..line(day, "Trajet client", Decimal::new(1945, 2))
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let err = w
        .svc
        .create_line(
            report.id,
            emp.id,
            LineInput {
                km_rate_id: Some(rate.id),
                distance_km: Some(-5),
                ..line(day, "Trajet client", Decimal::new(1945, 2))
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let created = w
        .svc
        .create_line(
            report.id,
            emp.id,
            LineInput {
                km_rate_id: Some(rate.id),
                distance_km: Some(38),
                ..line(day, "Trajet client", Decimal::new(1945, 2))
            },
        )
        .await
        .unwrap();
    assert_eq!(created.km_rate_id, Some(rate.id));
    assert_eq!(created.distance_km, Some(38));
}

#[actix_web::test]
async fn identical_lines_within_a_report_conflict() {
    let w = expense_world();
    let (emp, _mgr) = seed_pair(&w.users).await;
    let project = w
        .projects
        .create("Refonte intranet".to_string(), None)
        .await
        .unwrap();
    let report = w.svc.create_report(emp.id, project.id).await.unwrap();
    let day = yesterday();

    w.svc
        .create_line(
            report.id,
            emp.id,
            line(day, "Déjeuner client", Decimal::new(3400, 2)),
        )
        .await
        .unwrap();

    // Description matching is case-insensitive.
    let err = w
        .svc
        .create_line(
            report.id,
            emp.id,
            line(day, "DÉJEUNER CLIENT", Decimal::new(3400, 2)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    // A different amount is a different expense.
    w.svc
        .create_line(
            report.id,
            emp.id,
            line(day, "Déjeuner client", Decimal::new(2100, 2)),
        )
        .await
        .unwrap();
}

#[actix_web::test]
async fn updating_a_line_excludes_itself_from_the_duplicate_check() {
    let w = expense_world();
    let (emp, mgr) = seed_pair(&w.users).await;
    let project = w
        .projects
        .create("Refonte intranet".to_string(), None)
        .await
        .unwrap();
    let report = w.svc.create_report(emp.id, project.id).await.unwrap();
    let day = yesterday();

    let taxi = w
        .svc
        .create_line(report.id, emp.id, line(day, "Taxi", Decimal::new(1850, 2)))
        .await
        .unwrap();
    w.svc
        .create_line(report.id, emp.id, line(day, "Parking", Decimal::new(450, 2)))
        .await
        .unwrap();

    let kept = w
        .svc
        .update_line(taxi.id, emp.id, line(day, "Taxi", Decimal::new(1850, 2)))
        .await
        .unwrap();
    assert_eq!(kept.id, taxi.id);

    let err = w
        .svc
        .update_line(taxi.id, emp.id, line(day, "Parking", Decimal::new(450, 2)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    let err = w
        .svc
        .update_line(taxi.id, mgr.id, line(day, "Taxi", Decimal::new(1850, 2)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));
}

#[actix_web::test]
async fn line_reads_are_for_the_owner_or_an_admin() {
    let w = expense_world();
    let (emp, mgr) = seed_pair(&w.users).await;
    let colleague = seed_user(&w.users, "Karim Gharbi", Role::Employee, Some(mgr.id)).await;
    let project = w
        .projects
        .create("Refonte intranet".to_string(), None)
        .await
        .unwrap();
    let report = w.svc.create_report(emp.id, project.id).await.unwrap();
    let taxi = w
        .svc
        .create_line(report.id, emp.id, line(yesterday(), "Taxi", Decimal::new(1850, 2)))
        .await
        .unwrap();

    w.svc.get_line(taxi.id, actor(&emp)).await.unwrap();
    w.svc.get_line(taxi.id, admin_actor(999)).await.unwrap();
    let err = w.svc.get_line(taxi.id, actor(&colleague)).await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));

    let listed = w
        .svc
        .lines_for_report(report.id, actor(&emp))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    let err = w
        .svc
        .lines_for_report(report.id, actor(&colleague))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));

    let err = w.svc.delete_line(taxi.id, colleague.id).await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));
    w.svc.delete_line(taxi.id, emp.id).await.unwrap();
    let err = w.svc.delete_line(taxi.id, emp.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[actix_web::test]
async fn report_responses_join_the_owner_project_and_lines() {
    let w = expense_world();
    let (emp, mgr) = seed_pair(&w.users).await;
    let project = w
        .projects
        .create("Refonte intranet".to_string(), None)
        .await
        .unwrap();

    let report = w.svc.create_report(emp.id, project.id).await.unwrap();
    assert_eq!(report.employee_name, "Amel Ben Salah");
    assert_eq!(report.project_name.as_deref(), Some("Refonte intranet"));
    assert_eq!(report.status, ExpenseStatus::Pending);
    assert!(report.lines.is_empty());

    w.svc
        .create_line(report.id, emp.id, line(yesterday(), "Taxi", Decimal::new(1850, 2)))
        .await
        .unwrap();

    // The manager of record may read the full report.
    let got = w.svc.get_report(report.id, actor(&mgr)).await.unwrap();
    assert_eq!(got.lines.len(), 1);

    let listed = w.svc.list_reports_for_manager(mgr.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(w
        .svc
        .list_reports_for_manager(emp.id)
        .await
        .unwrap()
        .is_empty());

    let on_project = w.svc.list_reports_for_project(project.id).await.unwrap();
    assert_eq!(on_project.len(), 1);
    let err = w.svc.list_reports_for_project(999).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}
