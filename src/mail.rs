use tracing::info;

/// Outbound mail seam.
///
/// Actual delivery is an operational concern handled outside this service;
/// the default implementation records the message so operators can follow
/// the reset flow in the logs.
pub trait Mailer: Send + Sync {
    fn send_password_reset(&self, email: &str, token: &str);
}

#[derive(Debug, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send_password_reset(&self, email: &str, token: &str) {
        info!("Password reset requested for {}: token {}", email, token);
    }
}
