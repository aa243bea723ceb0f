use std::env;
use std::path::PathBuf;
use tracing::warn;

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: String,
    /// Optional JSON file replacing the standard prakriti question bank.
    pub question_bank_path: Option<PathBuf>,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: required_var("SUPABASE_URL"),
            supabase_anon_key: required_var("SUPABASE_ANON_PUBLIC_KEY"),
            supabase_jwt_secret: required_var("SUPABASE_JWT_SECRET"),
            question_bank_path: env::var("PRAKRITI_QUESTION_BANK")
                .ok()
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            port: parse_port(env::var("PORT").ok()),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.supabase_jwt_secret.is_empty()
    }
}

fn required_var(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| {
        warn!("{} not set, using empty value", name);
        String::new()
    })
}

fn parse_port(raw: Option<String>) -> u16 {
    match raw {
        None => DEFAULT_PORT,
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("PORT value {:?} is not a valid port, using {}", value, DEFAULT_PORT);
            DEFAULT_PORT
        }),
    }
}
