//! Email envelope derived from a contact submission.

use once_cell::sync::Lazy;
use regex::Regex;

use super::metadata::ContactMetadata;
use super::submission::ContactSubmission;

/// A plaintext notification email, ready for an [`EmailSender`].
///
/// [`EmailSender`]: crate::ports::EmailSender
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailEnvelope {
    pub from: String,
    pub to: String,
    /// Always the submitter's address, so replying goes straight back.
    pub reply_to: String,
    pub subject: String,
    pub body: String,
}

impl EmailEnvelope {
    /// Builds the envelope. Deterministic for a given input.
    pub fn compose(
        submission: &ContactSubmission,
        metadata: &ContactMetadata,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        let subject = single_line(&format!("New contact from {}", submission.name));
        let body = [
            format!("Name: {}", submission.name),
            format!("Email: {}", submission.email),
            String::new(),
            submission.message.clone(),
            String::new(),
            format!("IP: {}", metadata.ip),
            format!("User-Agent: {}", metadata.user_agent),
            format!("Sent: {}", metadata.sent_at),
        ]
        .join("\n");

        Self {
            from: from.into(),
            to: to.into(),
            reply_to: submission.email.clone(),
            subject,
            body,
        }
    }

    /// Renders a raw RFC 822 message (headers, blank line, body).
    ///
    /// Senders use the structured fields; this rendering is a diagnostic
    /// view of what a mail client would show, used in assertions.
    pub fn to_raw(&self) -> String {
        [
            format!("From: {}", self.from),
            format!("To: {}", self.to),
            format!("Reply-To: {}", self.reply_to),
            format!("Subject: {}", self.subject),
            "Content-Type: text/plain; charset=\"UTF-8\"".to_string(),
            "Content-Transfer-Encoding: 8bit".to_string(),
            String::new(),
            self.body.clone(),
        ]
        .join("\n")
    }
}

static LINE_BREAKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\r\n]+").expect("valid line break pattern"));

/// Collapses every run of CR/LF into one space and trims the result.
pub fn single_line(value: &str) -> String {
    LINE_BREAKS.replace_all(value, " ").trim().to_string()
}
