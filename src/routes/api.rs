use actix_web::web;

use crate::handlers;

pub fn scoped_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(web::resource("/register").route(web::post().to(handlers::auth::register)))
            .service(web::resource("/login").route(web::post().to(handlers::auth::login)))
            .service(web::resource("/me").route(web::get().to(handlers::auth::me))),
    )
    .service(
        web::scope("/users")
            .service(web::resource("").route(web::get().to(handlers::users::index)))
            .service(
                web::resource("/{id}/toggle-active")
                    .route(web::patch().to(handlers::users::toggle_user_active)),
            ),
    )
    .service(
        web::scope("/establishments")
            .service(
                web::resource("")
                    .route(web::get().to(handlers::establishments::index))
                    .route(web::post().to(handlers::establishments::create)),
            )
            .service(web::resource("/mine").route(web::get().to(handlers::establishments::mine)))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(handlers::establishments::get_by_id))
                    .route(web::put().to(handlers::establishments::update))
                    .route(web::delete().to(handlers::establishments::delete)),
            )
            .service(
                web::resource("/{id}/manager")
                    .route(web::post().to(handlers::establishments::assign_manager)),
            )
            .service(
                web::resource("/{id}/parking-lots")
                    .route(web::get().to(handlers::parking_lots::by_establishment)),
            )
            .service(
                web::resource("/{id}/opinions")
                    .route(web::get().to(handlers::opinions::by_establishment)),
            ),
    )
    .service(
        web::scope("/parking-lots")
            .service(
                web::resource("")
                    .route(web::get().to(handlers::parking_lots::index))
                    .route(web::post().to(handlers::parking_lots::create)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(handlers::parking_lots::get_by_id))
                    .route(web::put().to(handlers::parking_lots::update))
                    .route(web::delete().to(handlers::parking_lots::delete)),
            )
            .service(
                web::resource("/{id}/occupancy")
                    .route(web::get().to(handlers::parking_lots::occupancy)),
            )
            .service(
                web::resource("/{id}/slots")
                    .route(web::get().to(handlers::slots::by_parking_lot)),
            ),
    )
    .service(
        web::scope("/slots")
            .service(web::resource("").route(web::post().to(handlers::slots::create)))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(handlers::slots::get_by_id))
                    .route(web::put().to(handlers::slots::update))
                    .route(web::delete().to(handlers::slots::delete)),
            ),
    )
    .service(
        web::scope("/tariffs")
            .service(
                web::resource("")
                    .route(web::get().to(handlers::tariffs::index))
                    .route(web::post().to(handlers::tariffs::create)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(handlers::tariffs::get_by_id))
                    .route(web::put().to(handlers::tariffs::update))
                    .route(web::delete().to(handlers::tariffs::delete)),
            ),
    )
    .service(
        web::scope("/cancellation-policies")
            .service(
                web::resource("")
                    .route(web::get().to(handlers::cancellation_policies::index))
                    .route(web::post().to(handlers::cancellation_policies::create)),
            )
            .service(
                web::resource("/mine")
                    .route(web::get().to(handlers::cancellation_policies::mine)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(handlers::cancellation_policies::get_by_id))
                    .route(web::put().to(handlers::cancellation_policies::update))
                    .route(web::delete().to(handlers::cancellation_policies::delete)),
            ),
    )
    .service(
        web::scope("/reservations")
            .service(web::resource("").route(web::post().to(handlers::reservations::create)))
            .service(
                web::resource("/mine")
                    .route(web::get().to(handlers::reservations::my_reservations)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(handlers::reservations::get_by_id))
                    .route(web::put().to(handlers::reservations::update)),
            )
            .service(
                web::resource("/{id}/confirm")
                    .route(web::post().to(handlers::reservations::confirm)),
            )
            .service(
                web::resource("/{id}/cancel")
                    .route(web::post().to(handlers::reservations::cancel)),
            )
            .service(
                web::resource("/{id}/payments")
                    .route(web::post().to(handlers::reservations::create_payment))
                    .route(web::get().to(handlers::payments::list_by_reservation)),
            ),
    )
    .service(
        web::scope("/payments")
            .service(web::resource("").route(web::post().to(handlers::payments::create_intent)))
            // Provider notifications, unauthenticated. GET kept for
            // compatibility with query-string delivery.
            .service(
                web::resource("/webhook")
                    .route(web::post().to(handlers::payments::webhook))
                    .route(web::get().to(handlers::payments::webhook)),
            )
            .service(
                web::resource("/return/success")
                    .route(web::get().to(handlers::payments::return_success)),
            )
            .service(
                web::resource("/return/pending")
                    .route(web::get().to(handlers::payments::return_pending)),
            )
            .service(
                web::resource("/return/failure")
                    .route(web::get().to(handlers::payments::return_failure)),
            )
            .service(web::resource("/{id}").route(web::get().to(handlers::payments::get_payment))),
    )
    .service(
        web::scope("/alerts")
            .service(
                web::resource("")
                    .route(web::get().to(handlers::alerts::index))
                    .route(web::post().to(handlers::alerts::create)),
            )
            .service(web::resource("/stream").route(web::get().to(handlers::alerts::stream)))
            .service(
                web::resource("/{id}/read").route(web::patch().to(handlers::alerts::mark_read)),
            )
            .service(
                web::resource("/{id}/status")
                    .route(web::patch().to(handlers::alerts::update_status)),
            )
            .service(
                web::resource("/{id}/resolve").route(web::post().to(handlers::alerts::resolve)),
            ),
    )
    .service(
        web::scope("/opinions")
            .service(web::resource("").route(web::post().to(handlers::opinions::create)))
            .service(web::resource("/mine").route(web::get().to(handlers::opinions::mine)))
            .service(web::resource("/{id}").route(web::put().to(handlers::opinions::update))),
    )
    .service(
        web::scope("/notifications")
            .service(web::resource("").route(web::get().to(handlers::notifications::mine)))
            .service(
                web::resource("/{id}/read")
                    .route(web::patch().to(handlers::notifications::mark_read)),
            ),
    );
}
