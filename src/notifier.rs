use crate::config::Config;
use crate::evaluator::{ReminderMatch, describe_offset};
use crate::invite::CalendarInvite;
use lettre::address::AddressError;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, Message, MultiPart, SinglePart};
use lettre::transport::smtp;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{SmtpTransport, Transport};
use log::{error, info};
use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum SendError {
    Address(AddressError),
    Compose(lettre::error::Error),
    Smtp(String),
    Attachment(String),
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::Address(err) => write!(f, "invalid email address: {err}"),
            SendError::Compose(err) => write!(f, "message build error: {err}"),
            SendError::Smtp(msg) => write!(f, "smtp error: {msg}"),
            SendError::Attachment(msg) => write!(f, "attachment error: {msg}"),
        }
    }
}

impl std::error::Error for SendError {}

impl From<AddressError> for SendError {
    fn from(value: AddressError) -> Self {
        Self::Address(value)
    }
}

impl From<lettre::error::Error> for SendError {
    fn from(value: lettre::error::Error) -> Self {
        Self::Compose(value)
    }
}

impl From<smtp::Error> for SendError {
    fn from(value: smtp::Error) -> Self {
        Self::Smtp(value.to_string())
    }
}

/// Delivery seam so the batch pass can run against a test double.
pub trait Mailer {
    fn send(&self, message: &Message) -> Result<(), SendError>;
}

/// STARTTLS SMTP delivery with the configured credentials and timeout.
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn from_config(config: &Config) -> Result<Self, SendError> {
        let credentials = Credentials::new(
            config.sender_email.clone(),
            config.sender_password.clone(),
        );
        let transport = SmtpTransport::starttls_relay(&config.smtp_server)?
            .port(config.smtp_port)
            .credentials(credentials)
            .timeout(Some(Duration::from_secs(config.smtp_timeout_secs)))
            .build();
        Ok(Self { transport })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, message: &Message) -> Result<(), SendError> {
        self.transport.send(message)?;
        Ok(())
    }
}

/// Totals for one batch pass. Individual failures never abort the batch, so
/// both counters can be nonzero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sent: usize,
    pub failed: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sent {} reminder(s), {} failure(s)",
            self.sent, self.failed
        )
    }
}

/// Subject and body for a due reminder, keyed by offset sign.
pub fn compose(reminder: &ReminderMatch<'_>) -> (String, String) {
    let record = reminder.record;
    let subject = format!("Course Reminder: {}", record.name);

    let end_date = record
        .end_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let details = format!(
        "Course Details:\n- Course: {}\n- Program: {}\n- Start Date: {}\n- End Date: {}\n",
        record.name,
        record.program.as_deref().unwrap_or("N/A"),
        record.start_date,
        end_date
    );

    let phrase = describe_offset(reminder.offset);
    let body = if reminder.is_before_start() {
        format!(
            "Dear Team,\n\nThis is a reminder that {} {}.\n\n{}",
            record.name, phrase, details
        )
    } else {
        format!(
            "Dear Team,\n\nThis is a follow-up reminder for {} which {}.\n\n{}",
            record.name, phrase, details
        )
    };
    (subject, body)
}

/// Build one plain-text message, with the invite attached when available.
pub fn build_message(
    sender: &str,
    recipient: &str,
    subject: &str,
    body: &str,
    invite: Option<&CalendarInvite>,
) -> Result<Message, SendError> {
    let from: Mailbox = sender.parse()?;
    let to: Mailbox = recipient.parse()?;
    let builder = Message::builder().from(from).to(to).subject(subject);

    match invite {
        Some(invite) => {
            let content_type = ContentType::parse("text/calendar")
                .map_err(|err| SendError::Attachment(err.to_string()))?;
            let attachment =
                Attachment::new(invite.filename()).body(invite.to_ics(), content_type);
            let message = builder.multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body.to_string()))
                    .singlepart(attachment),
            )?;
            Ok(message)
        }
        None => Ok(builder.body(body.to_string())?),
    }
}

/// Send every due reminder to every recipient, one message per pair. A failed
/// send is logged and the batch moves on; no retry.
pub fn send_reminders(
    mailer: &impl Mailer,
    config: &Config,
    matches: &[ReminderMatch<'_>],
) -> RunSummary {
    let mut summary = RunSummary::default();
    for reminder in matches {
        let (subject, body) = compose(reminder);
        let invite =
            CalendarInvite::for_record(reminder.record, config.invite_location.as_deref());
        for recipient in &config.recipients {
            let outcome = build_message(
                &config.sender_email,
                recipient,
                &subject,
                &body,
                invite.as_ref(),
            )
            .and_then(|message| mailer.send(&message));
            match outcome {
                Ok(()) => {
                    info!("sent '{subject}' to {recipient}");
                    summary.sent += 1;
                }
                Err(err) => {
                    error!("failed to send '{subject}' to {recipient}: {err}");
                    summary.failed += 1;
                }
            }
        }
    }
    info!("{summary}");
    summary
}
