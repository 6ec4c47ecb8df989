use std::sync::Arc;

use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

use crate::{
    api::{expense_line, expense_report, holiday, km_rate, leave, project, user},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes. Static segments are registered before `/{id}` so
    // e.g. /leave/my never matches as an id.
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(protected_limiter)
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::post().to(leave::create_leave))
                            .route(web::get().to(leave::leave_list)),
                    )
                    // /leave/my
                    .service(web::resource("/my").route(web::get().to(leave::my_leaves)))
                    // /leave/team
                    .service(web::resource("/team").route(web::get().to(leave::team_leaves)))
                    // /leave/status/{status}
                    .service(
                        web::resource("/status/{status}")
                            .route(web::get().to(leave::leaves_by_status)),
                    )
                    // /leave/balance/{year}
                    .service(
                        web::resource("/balance/{year}").route(web::get().to(leave::my_balance)),
                    )
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve").route(web::put().to(leave::approve_leave)),
                    )
                    // /leave/{id}/reject
                    .service(
                        web::resource("/{id}/reject").route(web::put().to(leave::reject_leave)),
                    )
                    // /leave/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(leave::get_leave))
                            .route(web::put().to(leave::update_leave))
                            .route(web::delete().to(leave::delete_leave)),
                    ),
            )
            .service(
                web::scope("/holidays")
                    // /holidays
                    .service(
                        web::resource("")
                            .route(web::get().to(holiday::list_holidays))
                            .route(web::post().to(holiday::create_holiday)),
                    )
                    // /holidays/check?date=
                    .service(web::resource("/check").route(web::get().to(holiday::check_holiday)))
                    // /holidays/year/{year}
                    .service(
                        web::resource("/year/{year}")
                            .route(web::get().to(holiday::holidays_of_year)),
                    )
                    // /holidays/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(holiday::get_holiday))
                            .route(web::put().to(holiday::update_holiday))
                            .route(web::delete().to(holiday::delete_holiday)),
                    ),
            )
            .service(
                web::scope("/users")
                    // /users
                    .service(
                        web::resource("")
                            .route(web::get().to(user::list_users))
                            .route(web::post().to(user::create_user)),
                    )
                    // /users/{id}/subordinates
                    .service(
                        web::resource("/{id}/subordinates")
                            .route(web::get().to(user::subordinates)),
                    )
                    // /users/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(user::get_user))
                            .route(web::put().to(user::update_user))
                            .route(web::delete().to(user::delete_user)),
                    ),
            )
            .service(
                web::scope("/expense-reports")
                    // /expense-reports
                    .service(
                        web::resource("")
                            .route(web::post().to(expense_report::create_report))
                            .route(web::get().to(expense_report::list_reports)),
                    )
                    // /expense-reports/my
                    .service(
                        web::resource("/my").route(web::get().to(expense_report::my_reports)),
                    )
                    // /expense-reports/team
                    .service(
                        web::resource("/team").route(web::get().to(expense_report::team_reports)),
                    )
                    // /expense-reports/project/{project_id}
                    .service(
                        web::resource("/project/{project_id}")
                            .route(web::get().to(expense_report::project_reports)),
                    )
                    // /expense-reports/{id}/status
                    .service(
                        web::resource("/{id}/status")
                            .route(web::put().to(expense_report::update_report_status)),
                    )
                    // /expense-reports/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(expense_report::get_report))
                            .route(web::put().to(expense_report::update_report))
                            .route(web::delete().to(expense_report::delete_report)),
                    ),
            )
            .service(
                web::scope("/expense-lines")
                    // /expense-lines
                    .service(
                        web::resource("")
                            .route(web::post().to(expense_line::create_line))
                            .route(web::get().to(expense_line::list_lines)),
                    )
                    // /expense-lines/report/{report_id}
                    .service(
                        web::resource("/report/{report_id}")
                            .route(web::get().to(expense_line::report_lines)),
                    )
                    // /expense-lines/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(expense_line::get_line))
                            .route(web::put().to(expense_line::update_line))
                            .route(web::delete().to(expense_line::delete_line)),
                    ),
            )
            .service(
                web::scope("/projects")
                    // /projects
                    .service(
                        web::resource("")
                            .route(web::get().to(project::list_projects))
                            .route(web::post().to(project::create_project)),
                    )
                    // /projects/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(project::get_project))
                            .route(web::put().to(project::update_project))
                            .route(web::delete().to(project::delete_project)),
                    ),
            )
            .service(
                web::scope("/km-rates")
                    // /km-rates
                    .service(
                        web::resource("")
                            .route(web::get().to(km_rate::list_rates))
                            .route(web::post().to(km_rate::create_rate)),
                    )
                    // /km-rates/category/{category}
                    .service(
                        web::resource("/category/{category}")
                            .route(web::get().to(km_rate::get_rate_by_category)),
                    )
                    // /km-rates/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(km_rate::get_rate))
                            .route(web::put().to(km_rate::update_rate))
                            .route(web::delete().to(km_rate::delete_rate)),
                    ),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)
//
// API REQUEST
//  └─ Authorization: Bearer access_token
//
// ACCESS EXPIRED
//  └─ POST /refresh with refresh_token
//       └─ returns new access_token
