use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, web};
use dotenv::dotenv;
use tracing::info;

mod config;
mod database;
mod handlers;
mod middleware;
mod models;
mod requests;
mod routes;
mod services;
mod utils;

use crate::config::Settings;
use crate::services::alerts::AlertBroadcaster;
use crate::services::email::Mailer;
use crate::services::mercado_pago::MercadoPagoClient;
use crate::services::paypal::PayPalClient;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let settings = Settings::new()?;
    let pool = database::connection::establish_pool(&settings.database).await?;
    database::connection::run_migrations(&pool).await?;

    let paypal = PayPalClient::new(settings.paypal.clone())?;
    let mercado_pago = MercadoPagoClient::new(settings.mercado_pago.clone())?;
    let mailer = Mailer::from_env();
    let alert_hub = AlertBroadcaster::new();

    let bind_address = (settings.server.host.clone(), settings.server.port);
    info!("Starting server on {}:{}", bind_address.0, bind_address.1);

    let settings_data = web::Data::new(settings);
    let pool_data = web::Data::new(pool);
    let paypal_data = web::Data::new(paypal);
    let mercado_pago_data = web::Data::new(mercado_pago);
    let mailer_data = web::Data::new(mailer);
    let alert_hub_data = web::Data::new(alert_hub);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(settings_data.clone())
            .app_data(pool_data.clone())
            .app_data(paypal_data.clone())
            .app_data(mercado_pago_data.clone())
            .app_data(mailer_data.clone())
            .app_data(alert_hub_data.clone())
            .route("/", web::get().to(|| async { HttpResponse::Ok().body("API OK") }))
            .service(web::scope("/api").configure(routes::api::scoped_config))
    })
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}
