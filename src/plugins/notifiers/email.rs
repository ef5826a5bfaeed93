use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::models::SHORT_TITLE_CHARS;
use crate::plugins::traits::{NotificationResult, NotifierPlugin, PriceDropEvent};
use crate::utils::truncate_chars;
use crate::Result;

/// Sends plain-text price drop alerts over implicit-TLS SMTP.
pub struct EmailNotifier {
    config: SmtpConfig,
}

impl EmailNotifier {
    pub fn new(config: SmtpConfig) -> Self {
        EmailNotifier { config }
    }

    pub fn format_subject(&self, event: &PriceDropEvent) -> String {
        format!(
            "Price Drop Alert: {}...",
            truncate_chars(&event.product_title, SHORT_TITLE_CHARS)
        )
    }

    pub fn format_text_body(&self, event: &PriceDropEvent) -> String {
        format!(
            "Hello,\n\
             \n\
             A price drop has been detected for a product you are tracking!\n\
             \n\
             Product: {title}\n\
             \n\
             Old Price: {old} EUR\n\
             NEW PRICE: {new} EUR\n\
             \n\
             You can check it out here:\n\
             {url}\n\
             \n\
             Sincerely,\n\
             {signature}\n",
            title = event.product_title,
            old = event.old_price,
            new = event.new_price,
            url = event.product_url,
            signature = self.config.from_name,
        )
    }

    pub fn build_message(&self, sender_email: &str, event: &PriceDropEvent) -> Result<Message> {
        let from = Mailbox::new(Some(self.config.from_name.clone()), sender_email.parse()?);
        let to: Mailbox = event.recipient.parse()?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(self.format_subject(event))
            .header(ContentType::TEXT_PLAIN)
            .body(self.format_text_body(event))?;
        Ok(message)
    }

    async fn send(&self, sender_email: &str, sender_password: &str, event: &PriceDropEvent) -> Result<String> {
        let message = self.build_message(sender_email, event)?;

        // relay() speaks implicit TLS (SMTPS)
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)?
            .port(self.config.port)
            .credentials(Credentials::new(sender_email.to_string(), sender_password.to_string()))
            .build();

        mailer.send(message).await?;
        Ok(format!("email-{}", chrono::Utc::now().timestamp_millis()))
    }
}

#[async_trait]
impl NotifierPlugin for EmailNotifier {
    fn name(&self) -> &str {
        "Email Notifier"
    }

    fn plugin_type(&self) -> &str {
        "email"
    }

    fn description(&self) -> &str {
        "Sends plain-text price drop alerts via SMTPS"
    }

    async fn notify(&self, event: &PriceDropEvent) -> NotificationResult {
        let Some((sender_email, sender_password)) = self.config.credentials() else {
            tracing::warn!("Sender email credentials are not set; skipping alert to {}", event.recipient);
            return NotificationResult::failed("sender email credentials are not set");
        };

        tracing::info!("Attempting to send email to {}...", event.recipient);
        match self.send(sender_email, sender_password, event).await {
            Ok(message_id) => {
                tracing::info!("Email successfully sent to {}", event.recipient);
                NotificationResult::sent(message_id)
            }
            Err(e) => {
                tracing::error!("An error occurred while sending email to {}: {}", event.recipient, e);
                NotificationResult::failed(e.to_string())
            }
        }
    }
}
