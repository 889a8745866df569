use std::env;

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// SMTP settings for outbound mail (password resets, reminder
/// notifications). With `SMTP_ENABLED` unset the mailer logs and skips
/// sending, which is the right behavior for local development.
#[derive(Clone, Debug)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_email: String,
    pub from_name: String,
    /// Base URL the password-reset link points at.
    pub frontend_url: String,
}

impl EmailConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: env::var("SMTP_ENABLED")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
            smtp_host: env_or("SMTP_HOST", "localhost"),
            // 1025 is the conventional local mail-catcher port
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1025),
            smtp_username: env_or("SMTP_USERNAME", ""),
            smtp_password: env_or("SMTP_PASSWORD", ""),
            from_email: env_or("FROM_EMAIL", "noreply@propdesk.io"),
            from_name: env_or("FROM_NAME", "Propdesk"),
            frontend_url: env_or("FRONTEND_URL", "http://localhost:4200"),
        }
    }
}
