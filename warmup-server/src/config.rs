use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub aws_region: Option<String>,
    pub refresh_interval_secs: u64,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let refresh_interval_secs: u64 = env::var("REFRESH_INTERVAL_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()?;
        anyhow::ensure!(
            refresh_interval_secs > 0,
            "REFRESH_INTERVAL_SECS must be greater than zero"
        );

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            aws_region: env::var("AWS_REGION").ok().filter(|r| !r.is_empty()),
            refresh_interval_secs,
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
