use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use conges_api::config::Config;
use conges_api::db::init_db;
use conges_api::docs::ApiDoc;
use conges_api::routes;
use conges_api::store::{
    MySqlExpenseLineStore, MySqlExpenseReportStore, MySqlHolidayStore, MySqlKmRateStore,
    MySqlLeaveStore, MySqlProjectStore, MySqlUserStore,
};
use conges_api::utils::{email_cache, email_filter};
use conges_api::{
    AppExpenseService, AppHolidayService, AppKmRateService, AppLeaveService, AppProjectService,
    AppUserService,
};

#[get("/")]
async fn index() -> impl Responder {
    "Congés API"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await;

    let pool_for_filter_warmup = pool.clone();
    let pool_for_cache_warmup = pool.clone();
    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    actix_web::rt::spawn(async move {
        if let Err(e) = email_filter::warmup_email_filter(&pool_for_filter_warmup, 100).await {
            error!(error = ?e, "Failed to warmup email filter");
        }
    });

    actix_web::rt::spawn(async move {
        // Warm up the last 30 days of active accounts in batches of 250
        if let Err(e) = email_cache::warmup_email_cache(&pool_for_cache_warmup, 30, 250).await {
            error!(error = ?e, "Failed to warmup email cache");
        }
    });

    let leave_service = Data::new(AppLeaveService::new(
        MySqlLeaveStore::new(pool.clone()),
        MySqlHolidayStore::new(pool.clone()),
        MySqlUserStore::new(pool.clone()),
    ));
    let holiday_service = Data::new(AppHolidayService::new(MySqlHolidayStore::new(pool.clone())));
    let user_service = Data::new(AppUserService::new(MySqlUserStore::new(pool.clone())));
    let expense_service = Data::new(AppExpenseService::new(
        MySqlExpenseReportStore::new(pool.clone()),
        MySqlExpenseLineStore::new(pool.clone()),
        MySqlProjectStore::new(pool.clone()),
        MySqlKmRateStore::new(pool.clone()),
        MySqlUserStore::new(pool.clone()),
    ));
    let project_service = Data::new(AppProjectService::new(MySqlProjectStore::new(pool.clone())));
    let km_rate_service = Data::new(AppKmRateService::new(MySqlKmRateStore::new(pool.clone())));

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config.clone()))
            .app_data(leave_service.clone())
            .app_data(holiday_service.clone())
            .app_data(user_service.clone())
            .app_data(expense_service.clone())
            .app_data(project_service.clone())
            .app_data(km_rate_service.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
