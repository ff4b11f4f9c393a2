//! # omnimind-mailer
//!
//! HTML email templates and SMTP dispatch for the OmniMind backend.
//!
//! The [`Mailer`] wraps an async SMTP transport. When SMTP is not
//! configured it degrades to a logging no-op, so callers can always send
//! best-effort without checking configuration themselves.

pub mod templates;

use std::collections::HashMap;

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info, warn};

use omnimind_core::{Error, Result};

pub use templates::{by_name, EmailTemplate, DAILY_DIGEST, TASK_REMINDER, WELCOME};

/// SMTP configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender address, e.g. `"OmniMind <no-reply@omnimind.app>"`.
    pub from: String,
}

impl SmtpConfig {
    /// Read SMTP settings from the environment. Returns `None` when no host
    /// is configured, which disables sending.
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            host,
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            username: std::env::var("SMTP_USER").unwrap_or_default(),
            password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
            from: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| "OmniMind <no-reply@omnimind.app>".to_string()),
        })
    }
}

/// Email dispatcher over SMTP.
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl Mailer {
    /// Create a mailer from config; `None` disables sending.
    pub fn new(config: Option<SmtpConfig>) -> Result<Self> {
        match config {
            Some(config) => {
                let mut builder =
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                        .map_err(|e| Error::Mail(format!("Invalid SMTP relay: {e}")))?
                        .port(config.port);

                if !config.username.is_empty() {
                    builder = builder.credentials(Credentials::new(
                        config.username.clone(),
                        config.password.clone(),
                    ));
                }

                info!(
                    subsystem = "mailer",
                    component = "smtp",
                    host = %config.host,
                    port = config.port,
                    "SMTP transport configured"
                );

                Ok(Self {
                    transport: Some(builder.build()),
                    from: config.from,
                })
            }
            None => {
                info!(
                    subsystem = "mailer",
                    component = "smtp",
                    "SMTP not configured, email dispatch disabled"
                );
                Ok(Self {
                    transport: None,
                    from: String::new(),
                })
            }
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(SmtpConfig::from_env())
    }

    /// Whether a transport is configured.
    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Send an HTML email. A disabled mailer logs and returns Ok.
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<()> {
        let Some(transport) = &self.transport else {
            debug!(
                subsystem = "mailer",
                component = "smtp",
                to,
                subject,
                "Email dispatch disabled, dropping message"
            );
            return Ok(());
        };

        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| Error::Mail(format!("Invalid from address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| Error::Mail(format!("Invalid recipient address: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .map_err(|e| Error::Mail(format!("Failed to build message: {e}")))?;

        transport.send(message).await.map_err(|e| {
            warn!(
                subsystem = "mailer",
                component = "smtp",
                to,
                error = %e,
                "SMTP send failed"
            );
            Error::Mail(format!("SMTP send failed: {e}"))
        })?;

        info!(
            subsystem = "mailer",
            component = "smtp",
            op = "send",
            to,
            subject,
            "Email sent"
        );
        Ok(())
    }

    /// Render and send a named template.
    pub async fn send_template(
        &self,
        to: &str,
        template: &EmailTemplate,
        vars: &HashMap<&str, String>,
    ) -> Result<()> {
        let (subject, html) = template.render(vars);
        self.send(to, &subject, &html).await
    }

    /// Send the post-registration welcome email.
    pub async fn send_welcome(&self, to: &str, name: &str, dashboard_url: &str) -> Result<()> {
        let mut vars = HashMap::new();
        vars.insert("name", name.to_string());
        vars.insert("dashboardUrl", dashboard_url.to_string());
        self.send_template(to, &WELCOME, &vars).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_mailer() {
        let mailer = Mailer::new(None).unwrap();
        assert!(!mailer.is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_mailer_send_is_noop_ok() {
        let mailer = Mailer::new(None).unwrap();
        let result = mailer.send("user@example.com", "Hi", "<p>Hi</p>").await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_smtp_config_defaults() {
        let config = SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from: "OmniMind <no-reply@omnimind.app>".to_string(),
        };
        assert_eq!(config.port, 587);
        assert!(config.from.contains("no-reply"));
    }
}
