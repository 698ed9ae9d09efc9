/// Gift service configuration loaded from environment variables.
#[derive(Debug)]
pub struct GiftConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3117). Env var: `GIFT_PORT`.
    pub gift_port: u16,
    /// HTTP endpoint of the mail-delivery collaborator
    /// (e.g. "http://mailer:8080/send"). Env var: `MAILER_URL`.
    pub mailer_url: String,
}

impl GiftConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            gift_port: std::env::var("GIFT_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3117),
            mailer_url: std::env::var("MAILER_URL").expect("MAILER_URL"),
        }
    }
}
