use crate::{
    api::{attendance, leave, reports, roster, working_days},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-scope limiter
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

    let reports_limiter = Arc::new(build_limiter(config.rate_reports_per_min));
    let ingest_limiter = Arc::new(build_limiter(config.rate_ingest_per_min));
    let admin_limiter = Arc::new(build_limiter(config.rate_admin_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/reports")
                    .wrap(reports_limiter)
                    .service(
                        web::resource("/summary").route(web::get().to(reports::monthly_summary)),
                    )
                    .service(
                        web::resource("/summary/export")
                            .route(web::get().to(reports::monthly_summary_export)),
                    )
                    .service(web::resource("/daily").route(web::get().to(reports::daily_grid)))
                    .service(
                        web::resource("/daily/export")
                            .route(web::get().to(reports::daily_grid_export)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .wrap(ingest_limiter)
                    .service(
                        web::resource("/check-in").route(web::post().to(attendance::check_in)),
                    )
                    .service(
                        web::resource("/check-out").route(web::post().to(attendance::check_out)),
                    )
                    .service(
                        web::resource("/check-ins/{user_id}")
                            .route(web::get().to(attendance::list_check_ins)),
                    )
                    .service(
                        web::resource("/check-outs/{user_id}")
                            .route(web::get().to(attendance::list_check_outs)),
                    ),
            )
            .service(
                web::scope("/working-days")
                    .wrap(admin_limiter.clone())
                    .service(
                        web::resource("")
                            .route(web::get().to(working_days::get_working_days))
                            .route(web::post().to(working_days::set_working_days)),
                    )
                    .service(
                        web::resource("/year/{year}")
                            .route(web::get().to(working_days::year_working_days)),
                    ),
            )
            .service(
                web::scope("/leave")
                    .wrap(admin_limiter.clone())
                    .service(
                        web::resource("/user/{user_id}/monthly")
                            .route(web::get().to(leave::monthly_leaves)),
                    )
                    .service(
                        web::resource("/pending-count")
                            .route(web::get().to(leave::pending_count)),
                    ),
            )
            .service(
                web::scope("/roster")
                    .wrap(admin_limiter)
                    .service(web::resource("").route(web::get().to(roster::list_roster))),
            ),
    );
}
