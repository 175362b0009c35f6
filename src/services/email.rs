use lettre::message::{MultiPart, SinglePart, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::env;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::payment::Payment;
use crate::models::reservation::Reservation;
use crate::models::user::User;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("SMTP configuration error: {0}")]
    Config(String),
    #[error("Email sending failed: {0}")]
    Send(#[from] lettre::transport::smtp::Error),
    #[error("Message building failed: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("Address parsing failed: {0}")]
    Address(#[from] lettre::address::AddressError),
}

#[derive(Debug, Clone)]
pub struct EmailTemplate {
    pub subject: String,
    pub html_body: String,
    pub text_body: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
}

impl EmailConfig {
    pub fn from_env() -> Result<Self, EmailError> {
        Ok(Self {
            smtp_server: env::var("SMTP_SERVER")
                .map_err(|_| EmailError::Config("SMTP_SERVER not set".to_string()))?,
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .map_err(|_| EmailError::Config("Invalid SMTP_PORT".to_string()))?,
            username: env::var("SMTP_USERNAME")
                .map_err(|_| EmailError::Config("SMTP_USERNAME not set".to_string()))?,
            password: env::var("SMTP_PASSWORD")
                .map_err(|_| EmailError::Config("SMTP_PASSWORD not set".to_string()))?,
            from_email: env::var("FROM_EMAIL")
                .map_err(|_| EmailError::Config("FROM_EMAIL not set".to_string()))?,
            from_name: env::var("FROM_NAME").unwrap_or_else(|_| "Parkeo".to_string()),
        })
    }
}

pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    config: EmailConfig,
}

impl EmailService {
    pub fn new() -> Result<Self, EmailError> {
        let config = EmailConfig::from_env()?;

        let creds = Credentials::new(config.username.clone(), config.password.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_server)
            .map_err(|e| EmailError::Config(format!("SMTP relay error: {}", e)))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        Ok(Self { mailer, config })
    }

    pub async fn send_email(
        &self,
        to_email: &str,
        to_name: Option<&str>,
        template: EmailTemplate,
    ) -> Result<(), EmailError> {
        let to_address = match to_name {
            Some(name) => format!("{} <{}>", name, to_email),
            None => to_email.to_string(),
        };
        let from_address = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let builder = Message::builder()
            .from(from_address.parse()?)
            .to(to_address.parse()?)
            .subject(&template.subject);

        let message = if let Some(text_body) = &template.text_body {
            builder.multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(template.html_body.clone()),
                    ),
            )?
        } else {
            builder
                .header(ContentType::TEXT_HTML)
                .body(template.html_body.clone())?
        };

        self.mailer.send(message).await?;
        info!("Email sent to: {}", to_email);

        Ok(())
    }

    pub fn payment_approved_template(&self, user: &User, payment: &Payment) -> EmailTemplate {
        let html_body = format!(
            r#"
            <html>
            <body style="font-family: Arial, sans-serif; color: #333;">
                <h2>Hi {}!</h2>
                <p>Your payment of <strong>{} {}</strong> was approved and your
                parking reservation is confirmed.</p>
                <p>You can present the QR code from the app at the entrance.</p>
                <p>Thanks for parking with Parkeo.</p>
            </body>
            </html>
            "#,
            user.first_name, payment.amount, payment.currency
        );

        EmailTemplate {
            subject: "Your parking reservation is confirmed".to_string(),
            html_body,
            text_body: Some(format!(
                "Hi {}!\n\nYour payment of {} {} was approved and your parking reservation is confirmed.",
                user.first_name, payment.amount, payment.currency
            )),
        }
    }

    pub fn reservation_cancelled_template(&self, user: &User, reservation: &Reservation) -> EmailTemplate {
        EmailTemplate {
            subject: "Your parking reservation was cancelled".to_string(),
            html_body: format!(
                r#"
                <html>
                <body style="font-family: Arial, sans-serif; color: #333;">
                    <h2>Hi {}!</h2>
                    <p>Your reservation from {} to {} was cancelled.</p>
                </body>
                </html>
                "#,
                user.first_name, reservation.starts_at, reservation.ends_at
            ),
            text_body: Some(format!(
                "Hi {}!\n\nYour reservation from {} to {} was cancelled.",
                user.first_name, reservation.starts_at, reservation.ends_at
            )),
        }
    }
}

/// Optional mail sender. Settlement and cancellation flows call it
/// best-effort: failures are logged and never bubble up.
pub struct Mailer(pub Option<EmailService>);

impl Mailer {
    pub fn from_env() -> Self {
        match EmailService::new() {
            Ok(service) => Mailer(Some(service)),
            Err(e) => {
                warn!("Email disabled: {}", e);
                Mailer(None)
            }
        }
    }

    pub async fn send_payment_approved(&self, user: &User, payment: &Payment) {
        if let Some(service) = &self.0 {
            let template = service.payment_approved_template(user, payment);
            if let Err(e) = service
                .send_email(&user.email, Some(&user.first_name), template)
                .await
            {
                warn!("Failed to send payment-approved email: {}", e);
            }
        }
    }

    pub async fn send_reservation_cancelled(&self, user: &User, reservation: &Reservation) {
        if let Some(service) = &self.0 {
            let template = service.reservation_cancelled_template(user, reservation);
            if let Err(e) = service
                .send_email(&user.email, Some(&user.first_name), template)
                .await
            {
                warn!("Failed to send cancellation email: {}", e);
            }
        }
    }
}
