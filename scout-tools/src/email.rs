//! Email digest: best-effort SMTP delivery of a formatted record list
//!
//! SMTP handling stays isolated from the pipeline; the mailer takes an
//! already-sorted record list and a config built once at process start.
//! One attempt per call, no retry loop.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use scout_common::config::SmtpConfig;
use scout_common::{Error, Record, Result};

/// Render the plain-text digest body, capped at `limit` entries.
pub fn format_records(records: &[Record], limit: usize) -> String {
    let mut lines = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        if idx >= limit {
            lines.push(format!("...and {} more", records.len() - limit));
            break;
        }
        let remote_flag = if record.remote { " 🌍REMOTE" } else { "" };
        let score = record
            .score
            .map(|s| format!("{:.1}", s))
            .unwrap_or_else(|| "-".into());
        lines.push(format!(
            "#{} {} — {}{}",
            idx + 1,
            record.organization_or_venue,
            record.title,
            remote_flag
        ));
        lines.push(format!("   ⭐ Score: {}", score));
        lines.push(format!(
            "   📍 {} | source: {}",
            record.location.as_deref().unwrap_or(""),
            record.source
        ));
        lines.push(format!("   🔗 {}", record.url));
        lines.push("-".into());
    }
    lines.join("\n")
}

/// Send the digest to `recipient` via the configured relay.
pub fn send_digest(
    records: &[Record],
    recipient: &str,
    subject: &str,
    limit: usize,
    config: &SmtpConfig,
) -> Result<()> {
    let message = Message::builder()
        .from(config
            .from_address
            .parse()
            .map_err(|e| Error::Config(format!("Bad from address '{}': {}", config.from_address, e)))?)
        .to(recipient
            .parse()
            .map_err(|e| Error::Config(format!("Bad recipient '{}': {}", recipient, e)))?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(format_records(records, limit))
        .map_err(|e| Error::Config(format!("Cannot build message: {}", e)))?;

    let credentials = Credentials::new(config.username.clone(), config.password.clone());
    let transport = if config.use_tls {
        SmtpTransport::starttls_relay(&config.host)
            .map_err(|e| Error::Config(format!("Bad SMTP relay '{}': {}", config.host, e)))?
            .port(config.port)
            .credentials(credentials)
            .build()
    } else {
        SmtpTransport::builder_dangerous(&config.host)
            .port(config.port)
            .credentials(credentials)
            .build()
    };

    transport
        .send(&message)
        .map(|_| ())
        .map_err(|e| Error::SourceUnavailable {
            source: "smtp".into(),
            reason: format!("Delivery to {} failed: {}", recipient, e),
        })?;

    tracing::info!(to = %recipient, count = records.len().min(limit), "Digest sent");
    Ok(())
}
