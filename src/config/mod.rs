use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub public_base_url: Option<String>,
}

impl ServerSettings {
    /// Base URL advertised to payment providers for return redirects.
    pub fn public_url(&self) -> String {
        self.public_base_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.host, self.port))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayPalSettings {
    pub client_id: String,
    pub client_secret: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MercadoPagoSettings {
    pub access_token: String,
    pub api_base: String,
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentSettings {
    /// Ordered list of method tags the payments table accepts. Intent
    /// creation resolves the caller's hint against this list.
    pub accepted_methods: Vec<String>,
    pub default_currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub paypal: PayPalSettings,
    pub mercado_pago: MercadoPagoSettings,
    pub payments: PaymentSettings,
}

impl Settings {
    /// Loads `config.toml` (optional) and `APP__`-prefixed environment
    /// variables, e.g. `APP__PAYPAL__CLIENT_ID`. `DATABASE_URL` overrides
    /// the database section for compatibility with sqlx tooling.
    pub fn new() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 4001)?
            .set_default("database.max_connections", 10)?
            .set_default("auth.jwt_secret", "change-me")?
            .set_default("auth.token_ttl_hours", 24)?
            .set_default("paypal.client_id", "")?
            .set_default("paypal.client_secret", "")?
            .set_default("paypal.api_base", "https://api-m.sandbox.paypal.com")?
            .set_default("mercado_pago.access_token", "")?
            .set_default("mercado_pago.api_base", "https://api.mercadopago.com")?
            .set_default(
                "payments.accepted_methods",
                vec![
                    "paypal".to_string(),
                    "mercadopago".to_string(),
                    "mp".to_string(),
                    "online".to_string(),
                    "tarjeta".to_string(),
                    "efectivo".to_string(),
                ],
            )?
            .set_default("payments.default_currency", "ARS")?
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("payments.accepted_methods"),
            );

        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", url)?;
        }

        builder.build()?.try_deserialize()
    }
}
