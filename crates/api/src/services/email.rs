//! Email delivery for password-reset links.
//!
//! Uses SMTP via lettre. When SMTP is not configured the application runs
//! without a mailer and the forgot-password flow logs a warning instead of
//! sending.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use clover_core::Email;

use crate::config::SmtpConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for transactional mail.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP transport cannot be constructed.
    pub fn new(config: &SmtpConfig) -> Result<Self, EmailError> {
        let credentials = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from.clone(),
        })
    }

    /// Send a password-reset email carrying the reset link.
    ///
    /// The link embeds a short-lived token; the message states the expiry so
    /// stale links don't surprise anyone.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be built or sent.
    pub async fn send_password_reset(
        &self,
        to: &Email,
        name: &str,
        reset_link: &str,
    ) -> Result<(), EmailError> {
        let body = format!(
            "Hi {name},\n\n\
             We received a request to reset your Clover Market password.\n\
             Use the link below within 15 minutes:\n\n\
             {reset_link}\n\n\
             If you didn't request this, you can ignore this email.\n"
        );

        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .as_str()
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.as_str().to_string()))?)
            .subject("Reset your Clover Market password")
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.mailer.send(message).await?;

        tracing::info!(to = %to, "Password reset email sent");
        Ok(())
    }
}
