use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::{Message, SmtpTransport, Transport};

use diffpost_core::{DiffpostError, Result, SmtpSettings};

/// Sends the report email over STARTTLS, without authentication.
pub struct Mailer {
    settings: SmtpSettings,
}

impl Mailer {
    /// Create a mailer for the given SMTP settings.
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    /// Builds the message and hands it to the SMTP relay.
    pub fn send(&self, subject: &str, html_body: String) -> Result<()> {
        let message = build_message(&self.settings, subject, html_body)?;
        let transport = SmtpTransport::starttls_relay(&self.settings.server)
            .map_err(|err| DiffpostError::Mail(err.to_string()))?
            .port(self.settings.port)
            .build();
        transport
            .send(&message)
            .map_err(|err| DiffpostError::Mail(err.to_string()))?;
        log::info!("Email sent successfully!");
        Ok(())
    }
}

/// Builds the MIME message: HTML body, `From` the sender, `To` the review
/// team, `Cc` the team list.
pub fn build_message(
    settings: &SmtpSettings,
    subject: &str,
    html_body: String,
) -> Result<Message> {
    let from: Mailbox = settings
        .sender
        .parse()
        .map_err(|err| DiffpostError::Mail(format!("invalid sender address: {err}")))?;
    let to: Mailbox = settings
        .review_team
        .parse()
        .map_err(|err| DiffpostError::Mail(format!("invalid recipient address: {err}")))?;
    let cc: Mailbox = settings
        .team_email
        .parse()
        .map_err(|err| DiffpostError::Mail(format!("invalid cc address: {err}")))?;

    Message::builder()
        .from(from)
        .to(to)
        .cc(cc)
        .subject(subject)
        .multipart(MultiPart::mixed().singlepart(SinglePart::html(html_body)))
        .map_err(|err| DiffpostError::Mail(err.to_string()))
}
