use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub access_token_hours: i64,
    pub refresh_token_days: i64,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub mail_from: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let access_token_secret = env::var("ACCESS_TOKEN_SECRET")?;
        let refresh_token_secret = env::var("REFRESH_TOKEN_SECRET")?;
        let access_token_hours = env::var("ACCESS_TOKEN_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(24);
        let refresh_token_days = env::var("REFRESH_TOKEN_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(30);
        let smtp_host = env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let smtp_port = env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(1025);
        let smtp_username = env::var("SMTP_USERNAME").unwrap_or_default();
        let smtp_password = env::var("SMTP_PASSWORD").unwrap_or_default();
        let mail_from = env::var("MAIL_FROM").unwrap_or_else(|_| "noreply@localhost".to_string());
        Ok(Self {
            database_url,
            host,
            port,
            access_token_secret,
            refresh_token_secret,
            access_token_hours,
            refresh_token_days,
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            mail_from,
        })
    }
}
