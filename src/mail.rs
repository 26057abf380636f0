use anyhow::{Context, Result};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};

use crate::config::AppConfig;

/// SMTP mail collaborator. OTP delivery is fire-and-forget: callers spawn
/// `send_otp` and only log failures.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl Mailer {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let transport = if config.smtp_username.is_empty() {
            // No auth (local Mailpit/Mailhog style relay).
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            );
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                .context("failed to create SMTP relay")?
                .credentials(creds)
                .port(config.smtp_port)
                .build()
        };

        Ok(Self {
            transport,
            from: config.mail_from.clone(),
        })
    }

    pub async fn send_otp(&self, email: &str, code: &str) -> Result<()> {
        let message = Message::builder()
            .from(self.from.parse().context("invalid MAIL_FROM address")?)
            .to(email.parse().context("invalid recipient address")?)
            .subject("Your marketplace verification code")
            .header(ContentType::TEXT_PLAIN)
            .body(format!(
                "Thank you for registering. Your verification code is: {code}"
            ))?;

        self.transport.send(message).await?;
        Ok(())
    }
}

/// Deliver an OTP in the background; failures are logged, never surfaced.
pub fn send_otp_in_background(mailer: &Mailer, email: &str, code: &str) {
    let mailer = mailer.clone();
    let email = email.to_string();
    let code = code.to_string();
    tokio::spawn(async move {
        if let Err(err) = mailer.send_otp(&email, &code).await {
            tracing::warn!(error = %err, email = %email, "failed to send OTP mail");
        }
    });
}
