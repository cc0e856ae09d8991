//! Contact form notifications.
//!
//! Uses SMTP via lettre for delivery with Askama HTML and text templates.
//! Two emails go out per submission: a notification to the site owner and
//! an auto-reply to the visitor. Delivery problems never fail the request.

use askama::Template;
use futures::future::BoxFuture;
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use portfolio_core::ContactMessage;

use crate::config::EmailConfig;

/// HTML template for the owner notification.
#[derive(Template)]
#[template(path = "email/contact_notification.html")]
struct ContactNotificationHtml<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message: &'a str,
}

/// Plain text template for the owner notification.
#[derive(Template)]
#[template(path = "email/contact_notification.txt")]
struct ContactNotificationText<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message: &'a str,
}

/// HTML template for the visitor auto-reply.
#[derive(Template)]
#[template(path = "email/auto_reply.html")]
struct AutoReplyHtml<'a> {
    name: &'a str,
    subject: &'a str,
    message: &'a str,
    owner_name: &'a str,
}

/// Plain text template for the visitor auto-reply.
#[derive(Template)]
#[template(path = "email/auto_reply.txt")]
struct AutoReplyText<'a> {
    name: &'a str,
    subject: &'a str,
    message: &'a str,
    owner_name: &'a str,
}

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

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Something that tells the site owner about a new contact message.
pub trait ContactNotifier: Send + Sync {
    /// Notify the owner about `message` and acknowledge the sender.
    ///
    /// The result reflects the owner notification only. A failed
    /// auto-reply is logged and otherwise ignored.
    fn notify<'a>(&'a self, message: &'a ContactMessage) -> BoxFuture<'a, Result<(), EmailError>>;
}

/// SMTP-backed [`ContactNotifier`].
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    admin: Mailbox,
    admin_name: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Smtp` if the relay cannot be configured and
    /// `EmailError::InvalidAddress` if a configured address is malformed.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(
                username.clone(),
                password.expose_secret().to_string(),
            ));
        }

        Ok(Self {
            mailer: builder.build(),
            from: mailbox(Some("Portfolio Contact Form"), &config.from_address)?,
            admin: mailbox(Some(&config.admin_name), &config.admin_email)?,
            admin_name: config.admin_name.clone(),
        })
    }

    /// Send the owner a copy of the message with `Reply-To` set to the visitor.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_contact_notification(
        &self,
        message: &ContactMessage,
    ) -> Result<(), EmailError> {
        let html = ContactNotificationHtml {
            name: &message.name,
            email: message.email.as_str(),
            subject: &message.subject,
            message: &message.message,
        }
        .render()?;
        let text = ContactNotificationText {
            name: &message.name,
            email: message.email.as_str(),
            subject: &message.subject,
            message: &message.message,
        }
        .render()?;

        let visitor = mailbox(Some(&message.name), message.email.as_str())?;
        let email = Message::builder()
            .from(self.from.clone())
            .reply_to(visitor)
            .to(self.admin.clone())
            .subject(format!("New Contact Form Submission: {}", message.subject))
            .multipart(alternative(text, html))?;

        self.mailer.send(email).await?;

        tracing::info!(message_id = %message.id, "Contact notification sent");
        Ok(())
    }

    /// Send the visitor an acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_auto_reply(&self, message: &ContactMessage) -> Result<(), EmailError> {
        let html = AutoReplyHtml {
            name: &message.name,
            subject: &message.subject,
            message: &message.message,
            owner_name: &self.admin_name,
        }
        .render()?;
        let text = AutoReplyText {
            name: &message.name,
            subject: &message.subject,
            message: &message.message,
            owner_name: &self.admin_name,
        }
        .render()?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(mailbox(Some(&message.name), message.email.as_str())?)
            .subject(format!(
                "Thank you for contacting me - Re: {}",
                message.subject
            ))
            .multipart(alternative(text, html))?;

        self.mailer.send(email).await?;

        tracing::info!(message_id = %message.id, "Auto-reply sent");
        Ok(())
    }
}

impl ContactNotifier for EmailService {
    fn notify<'a>(&'a self, message: &'a ContactMessage) -> BoxFuture<'a, Result<(), EmailError>> {
        Box::pin(async move {
            let notified = self.send_contact_notification(message).await;

            if let Err(e) = self.send_auto_reply(message).await {
                tracing::warn!(error = %e, message_id = %message.id, "Failed to send auto-reply");
            }

            notified
        })
    }
}

fn mailbox(name: Option<&str>, address: &str) -> Result<Mailbox, EmailError> {
    let address: Address = address
        .parse()
        .map_err(|_| EmailError::InvalidAddress(address.to_string()))?;
    Ok(Mailbox::new(name.map(String::from), address))
}

fn alternative(text: String, html: String) -> MultiPart {
    MultiPart::alternative()
        .singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_PLAIN)
                .body(text),
        )
        .singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_HTML)
                .body(html),
        )
}
