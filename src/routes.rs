use crate::{
    api::{attendance, leave_request, qr, settings, timeline},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

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

    let scan_limiter = Arc::new(build_limiter(config.rate_scan_per_min));
    let admin_limiter = Arc::new(build_limiter(config.rate_admin_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(protected_limiter)
            .service(
                web::scope("/qr")
                    .service(
                        web::resource("")
                            .wrap(admin_limiter.clone())
                            .route(web::post().to(qr::issue_qr)),
                    )
                    .service(web::resource("/current").route(web::get().to(qr::current_qr))),
            )
            .service(
                web::scope("/attendance")
                    // /attendance/scan
                    .service(
                        web::resource("/scan")
                            .wrap(scan_limiter)
                            .route(web::post().to(attendance::submit_scan)),
                    )
                    // /attendance
                    .service(
                        web::resource("").route(web::get().to(attendance::list_attendance)),
                    )
                    // /attendance/{id}/status
                    .service(
                        web::resource("/{id}/status")
                            .wrap(admin_limiter.clone())
                            .route(web::put().to(attendance::override_status)),
                    )
                    // /attendance/{id}
                    .service(
                        web::resource("/{id}")
                            .wrap(admin_limiter.clone())
                            .route(web::delete().to(attendance::delete_record)),
                    ),
            )
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // /leave/{id}
                    .service(
                        web::resource("/{id}").route(web::get().to(leave_request::get_leave)),
                    )
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .wrap(admin_limiter.clone())
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    // /leave/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .wrap(admin_limiter.clone())
                            .route(web::put().to(leave_request::reject_leave)),
                    )
                    // /leave/{id}/reopen
                    .service(
                        web::resource("/{id}/reopen")
                            .wrap(admin_limiter.clone())
                            .route(web::put().to(leave_request::reopen_leave)),
                    ),
            )
            .service(
                web::scope("/timeline")
                    .service(web::resource("").route(web::get().to(timeline::unified_timeline))),
            )
            .service(
                web::scope("/settings").service(
                    web::resource("")
                        .route(web::get().to(settings::get_settings))
                        .route(web::put().to(settings::update_settings)),
                ),
            ),
    );
}
