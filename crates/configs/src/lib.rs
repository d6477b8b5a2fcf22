use std::io::ErrorKind;

use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub quotes: QuotesConfig,
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// `compact` or `json`
    #[serde(default)]
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: Some(DEFAULT_WORKER_THREADS),
            log_format: String::new(),
        }
    }
}

/// Where the quote corpus lives: `<base_path>/data/{quotes,authors}.txt`.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotesConfig {
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self { base_path: default_base_path() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    #[serde(default = "default_static_dir")]
    pub dir: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self { dir: default_static_dir() }
    }
}

const DEFAULT_WORKER_THREADS: usize = 4;

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8080 }
fn default_base_path() -> String { "wwwroot".into() }
fn default_static_dir() -> String { "wwwroot".into() }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), validated.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Like `load_and_validate`, but a missing file falls back to environment
    /// variables and defaults. A file that exists must read and parse.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_from(&config_path())
    }

    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = match std::fs::read_to_string(path) {
            Ok(content) => parse(&content).map_err(|e| anyhow!("invalid config {path}: {e}"))?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::from_env(),
            Err(e) => return Err(anyhow!("cannot read config {path}: {e}")),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Build from `SERVER_HOST`, `SERVER_PORT`, `TOKIO_WORKER_THREADS`,
    /// `LOG_FORMAT`, `QUOTES_BASE_PATH` and `STATIC_DIR`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            cfg.server.worker_threads = Some(w);
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            cfg.server.log_format = format;
        }
        if let Ok(base) = std::env::var("QUOTES_BASE_PATH") {
            cfg.quotes.base_path = base;
        }
        if let Ok(dir) = std::env::var("STATIC_DIR") {
            cfg.static_files.dir = dir;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.quotes.normalize();
        self.static_files.normalize();
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(DEFAULT_WORKER_THREADS),
        }
        let format = self.log_format.trim().to_ascii_lowercase();
        if !matches!(format.as_str(), "" | "compact" | "text" | "json") {
            return Err(anyhow!("server.log_format must be `compact` or `json`, got `{}`", self.log_format));
        }
        self.log_format = format;
        Ok(())
    }
}

impl QuotesConfig {
    fn normalize(&mut self) {
        // 空路径表示当前工作目录
        if self.base_path.trim().is_empty() {
            self.base_path = ".".into();
        }
    }
}

impl StaticFilesConfig {
    fn normalize(&mut self) {
        if self.dir.trim().is_empty() {
            self.dir = default_static_dir();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() -> Result<()> {
        let mut cfg = parse("")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.quotes.base_path, "wwwroot");
        assert_eq!(cfg.static_files.dir, "wwwroot");
        assert_eq!(cfg.bind_addr(), "127.0.0.1:8080");
        Ok(())
    }

    #[test]
    fn parses_all_sections() -> Result<()> {
        let mut cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000
            worker_threads = 0
            log_format = "JSON"

            [quotes]
            base_path = "/srv/taka"

            [static_files]
            dir = "public"
            "#,
        )?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.bind_addr(), "0.0.0.0:9000");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.server.log_format, "json");
        assert_eq!(cfg.quotes.base_path, "/srv/taka");
        assert_eq!(cfg.static_files.dir, "public");
        Ok(())
    }

    #[test]
    fn blank_base_path_means_current_dir() -> Result<()> {
        let mut cfg = parse("[quotes]\nbase_path = \"  \"\n")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.quotes.base_path, ".");
        Ok(())
    }

    #[test]
    fn rejects_port_zero_and_unknown_log_format() {
        let mut cfg = parse("[server]\nport = 0\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = parse("[server]\nlog_format = \"xml\"\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn load_from_file_reads_toml() -> Result<()> {
        let path = std::env::temp_dir().join(format!("configs_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[server]\nport = 8123\n")?;
        let cfg = load_from_file(&path.to_string_lossy())?;
        assert_eq!(cfg.server.port, 8123);
        assert!(load_from_file("/nonexistent-config-for-tests.toml").is_err());
        let _ = std::fs::remove_file(&path);
        Ok(())
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("configs_bad_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[quotes]\nbase_path = /srv/taka\n").unwrap();

        let res = AppConfig::load_or_env_from(&path.to_string_lossy());
        assert!(res.is_err(), "malformed TOML must not fall back to defaults");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_config_file_falls_back() -> Result<()> {
        let cfg = AppConfig::load_or_env_from("/nonexistent-config-for-tests.toml")?;
        assert_eq!(cfg.server.port, AppConfig::from_env().server.port);
        Ok(())
    }

    #[test]
    fn existing_config_file_wins_over_env() -> Result<()> {
        let path = std::env::temp_dir().join(format!("configs_ok_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[quotes]\nbase_path = \"/srv/taka\"\n")?;
        let cfg = AppConfig::load_or_env_from(&path.to_string_lossy())?;
        assert_eq!(cfg.quotes.base_path, "/srv/taka");
        let _ = std::fs::remove_file(&path);
        Ok(())
    }
}
