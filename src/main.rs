use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;

mod api;
mod config;
mod core;
mod db;
mod docs;
mod model;
mod routes;

use config::Config;
use db::init_db;

use crate::core::qr::{IssueRequest, QrSessionManager};
use crate::docs::ApiDoc;
use crate::model::qr_session::QrKind;
use std::time::Duration;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Presensi service up"
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

    let pool = init_db(&config.database_url)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let qr_manager = Data::new(QrSessionManager::new());

    // Periodic re-issue for the default tag, mirroring the admin client's
    // refresh interval. Earlier unexpired tokens stay valid.
    let refresh_manager = qr_manager.clone();
    let refresh_tag = config.default_location_tag.clone();
    let validity_minutes = config.qr_validity_minutes;
    actix_web::rt::spawn(async move {
        let mut ticker =
            actix_web::rt::time::interval(Duration::from_secs(validity_minutes.max(1) as u64 * 60));
        loop {
            ticker.tick().await;
            let session = refresh_manager.issue(
                IssueRequest {
                    kind: QrKind::Masuk,
                    location_tag: refresh_tag.clone(),
                    validity_minutes,
                },
                chrono::Local::now().naive_local(),
            );
            info!(
                token = %session.token,
                location_tag = %session.location_tag,
                "QR session auto-refreshed"
            );
        }
    });

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

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
            .app_data(qr_manager.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
