use crate::{
    api::{
        availability, booking, department, employee, holiday, leave_request, meeting_room,
        permission, settings,
    },
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
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

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::resource("/permissions").route(web::get().to(permission::my_permissions)),
            )
            .service(
                web::scope("/employees")
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/departments")
                    .service(
                        web::resource("")
                            .route(web::post().to(department::create_department))
                            .route(web::get().to(department::list_departments)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(department::update_department))
                            .route(web::delete().to(department::delete_department)),
                    )
                    .service(
                        web::resource("/{id}/lead").route(web::put().to(department::assign_lead)),
                    ),
            )
            .service(
                web::scope("/leave")
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    .service(web::resource("/{id}").route(web::get().to(leave_request::get_leave)))
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    .service(
                        web::resource("/{id}/hr-approve")
                            .route(web::put().to(leave_request::hr_approve_leave)),
                    )
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(leave_request::reject_leave)),
                    )
                    .service(
                        web::resource("/{id}/cancel")
                            .route(web::put().to(leave_request::cancel_leave)),
                    ),
            )
            .service(
                web::scope("/holidays")
                    .service(
                        web::resource("")
                            .route(web::post().to(holiday::create_holiday))
                            .route(web::get().to(holiday::list_holidays)),
                    )
                    .service(
                        web::resource("/import").route(web::post().to(holiday::import_holidays)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(holiday::update_holiday))
                            .route(web::delete().to(holiday::delete_holiday)),
                    ),
            )
            .service(
                web::scope("/rooms")
                    .service(
                        web::resource("")
                            .route(web::post().to(meeting_room::create_room))
                            .route(web::get().to(meeting_room::list_rooms)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(meeting_room::update_room))
                            .route(web::delete().to(meeting_room::delete_room)),
                    ),
            )
            .service(
                web::scope("/bookings")
                    .service(
                        web::resource("")
                            .route(web::post().to(booking::create_booking))
                            .route(web::get().to(booking::list_bookings)),
                    )
                    .service(web::resource("/slots").route(web::get().to(booking::list_slots)))
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(booking::update_booking))
                            .route(web::delete().to(booking::delete_booking)),
                    ),
            )
            .service(
                web::scope("/availability")
                    .service(
                        web::resource("")
                            .route(web::get().to(availability::my_availability))
                            .route(web::post().to(availability::submit_availability)),
                    )
                    .service(
                        web::resource("/team").route(web::get().to(availability::team_schedule)),
                    ),
            )
            .service(
                web::scope("/settings")
                    .service(
                        web::resource("")
                            .route(web::get().to(settings::get_settings))
                            .route(web::put().to(settings::update_settings)),
                    )
                    .service(
                        web::resource("/accrual").route(web::post().to(settings::run_accrual)),
                    ),
            ),
    );
}
