use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use tutor_algo::CurriculumConfig;

const APP_DATA_DIR: &str = "smart-tutor";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub database_url: String,
    pub curriculum: CurriculumConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(default_database_url);

        Self {
            host,
            port,
            log_level,
            database_url,
            curriculum: curriculum_from_env(),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

pub fn default_sqlite_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DATA_DIR)
        .join("tutor.db")
}

fn default_database_url() -> String {
    format!("sqlite:{}?mode=rwc", default_sqlite_path().display())
}

/// Default curriculum with optional `QUIZ_*` overrides
pub fn curriculum_from_env() -> CurriculumConfig {
    let mut curriculum = CurriculumConfig::default();
    if let Some(list) = env_list("QUIZ_CATEGORIES") {
        curriculum.categories = list;
    }
    if let Some(list) = env_list("QUIZ_CORE_TOPICS") {
        curriculum.core_topics = list;
    }
    if let Some(list) = env_list("QUIZ_MIXED_SENTINELS") {
        curriculum.mixed_sentinels = list;
    }
    curriculum
}

fn env_list(key: &str) -> Option<Vec<String>> {
    let raw = std::env::var(key).ok()?;
    let items = parse_list(&raw);
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_trims_and_lowercases() {
        assert_eq!(
            parse_list(" ABC, numbers ,,Colors "),
            vec!["abc", "numbers", "colors"]
        );
        assert!(parse_list(" , ").is_empty());
    }

    #[test]
    fn test_default_database_url_is_sqlite() {
        let url = default_database_url();
        assert!(url.starts_with("sqlite:"));
        assert!(url.ends_with("tutor.db?mode=rwc"));
    }
}
