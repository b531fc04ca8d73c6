use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize, Serializer};

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "HADITH_ENV";
const CONFIG_DIR_ENV: &str = "HADITH_CONFIG_DIR";
const ENV_PREFIX: &str = "HADITH";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub api: ApiSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay
    /// and `HADITH_*` variables (`__` separates nested keys).
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .context("unable to resolve current directory")?
                .join("config"),
        };

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // The selector variable wins over any `environment` key in the files.
        settings.environment = environment.parse()?;

        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Development mode: the shared-secret check is skipped.
    #[serde(default)]
    pub debug: bool,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        5000
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
            debug: false,
        }
    }
}

/// Which store implementation backs the API.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    MySql,
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub backend: DatabaseBackend,
    #[serde(default = "DatabaseSettings::default_url")]
    pub url: String,
    #[serde(default = "DatabaseSettings::default_max_connections")]
    pub max_connections: u32,
    /// JSON dataset loaded by the memory backend.
    #[serde(default)]
    pub fixture_path: Option<String>,
}

impl DatabaseSettings {
    fn default_url() -> String {
        "mysql://root@127.0.0.1:3306/hadithdb".to_string()
    }

    fn default_max_connections() -> u32 {
        10
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::default(),
            url: Self::default_url(),
            max_connections: Self::default_max_connections(),
            fixture_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info,tower_http=info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default = "AuthSettings::default_header")]
    pub header: String,
    #[serde(default, serialize_with = "redact")]
    pub secret: Option<String>,
}

fn redact<S: Serializer>(secret: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    secret.as_ref().map(|_| "********").serialize(serializer)
}

impl AuthSettings {
    fn default_header() -> String {
        "x-aws-secret".to_string()
    }
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("header", &self.header)
            .field("secret", &self.secret.as_ref().map(|_| "********"))
            .finish()
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            header: Self::default_header(),
            secret: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    /// Path prefix every module is mounted under.
    #[serde(default = "ApiSettings::default_prefix")]
    pub prefix: String,
    /// Collection sampled by the random hadith route.
    #[serde(default = "ApiSettings::default_random_collection")]
    pub random_collection: String,
}

impl ApiSettings {
    fn default_prefix() -> String {
        "/v1".to_string()
    }

    fn default_random_collection() -> String {
        "riyadussalihin".to_string()
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            prefix: Self::default_prefix(),
            random_collection: Self::default_random_collection(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_backend_is_mysql() {
        let settings = Settings::default();
        assert_eq!(settings.database.backend, DatabaseBackend::MySql);
        assert_eq!(settings.database.url, "mysql://root@127.0.0.1:3306/hadithdb");
    }

    #[test]
    fn default_api_settings() {
        let settings = Settings::default();
        assert_eq!(settings.api.prefix, "/v1");
        assert_eq!(settings.api.random_collection, "riyadussalihin");
        assert_eq!(settings.auth.header, "x-aws-secret");
        assert!(settings.auth.secret.is_none());
        assert!(!settings.server.debug);
    }

    #[test]
    fn parses_known_environments() {
        assert_eq!("staging".parse::<Environment>().unwrap(), Environment::Staging);
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("qa".parse::<Environment>().is_err());
    }

    #[test]
    fn deserializes_nested_sections() {
        let cfg = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [server]
                port = 8081
                debug = true

                [database]
                backend = "memory"
                fixture_path = "fixtures/sample.json"

                [telemetry]
                log_format = "json"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let settings: Settings = cfg.try_deserialize().unwrap();
        assert_eq!(settings.server.port, 8081);
        assert!(settings.server.debug);
        assert_eq!(settings.database.backend, DatabaseBackend::Memory);
        assert_eq!(
            settings.database.fixture_path.as_deref(),
            Some("fixtures/sample.json")
        );
        assert_eq!(settings.telemetry.log_format, LogFormat::Json);
        assert_eq!(settings.server.host, "0.0.0.0");
    }

    #[test]
    fn serialized_settings_hide_secret() {
        let mut settings = Settings::default();
        settings.auth.secret = Some("s3cret".to_string());

        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["auth"]["secret"], "********");
        assert_eq!(value["database"]["backend"], "mysql");
        assert!(!value.to_string().contains("s3cret"));
    }
}
