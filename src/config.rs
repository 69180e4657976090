//! CLI configuration
//!
//! Each setting is taken from the first layer that has it: command-line flag,
//! environment (`GRAPHWIRE_*`, `.env` included), `--config` TOML file, then
//! the library defaults.

use anyhow::{Context, Result};
use graphwire_client::{ClientConfig, StreamConfig};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const ENV_BASE_URL: &str = "GRAPHWIRE_BASE_URL";
pub const ENV_API_PREFIX: &str = "GRAPHWIRE_API_PREFIX";
pub const ENV_TIMEOUT_MS: &str = "GRAPHWIRE_TIMEOUT_MS";
pub const ENV_WS_PATH: &str = "GRAPHWIRE_WS_PATH";
pub const ENV_RETRY_MS: &str = "GRAPHWIRE_RETRY_MS";

/// Values set on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub api_prefix: Option<String>,
    pub timeout_ms: Option<u64>,
    pub ws_path: Option<String>,
    pub retry_ms: Option<u64>,
}

/// Contents of a `--config` file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub api_prefix: Option<String>,
    pub timeout_ms: Option<u64>,
    pub ws_path: Option<String>,
    pub retry_ms: Option<u64>,
    /// Sub-protocols offered during the WebSocket handshake.
    pub protocols: Vec<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub client: ClientConfig,
    pub stream: StreamConfig,
}

/// Load `.env`, the optional config file and the process environment.
pub fn load(flags: &Overrides, config_path: Option<&Path>) -> Result<Settings> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e).context("Failed to load .env"),
    }

    let file = match config_path {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    resolve(flags, |key| std::env::var(key).ok(), file)
}

/// Merge the layers. `env` looks up a variable by name.
pub fn resolve(
    flags: &Overrides,
    env: impl Fn(&str) -> Option<String>,
    file: FileConfig,
) -> Result<Settings> {
    // The env var is only consulted (and parsed) when no flag is given.
    let millis = |flag: Option<u64>, key: &str, file: Option<u64>| -> Result<Option<u64>> {
        if flag.is_some() {
            return Ok(flag);
        }
        let from_env = env(key)
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("{} must be a whole number of milliseconds, got {:?}", key, raw))
            })
            .transpose()?;
        Ok(from_env.or(file))
    };

    let mut client = ClientConfig::default();
    let mut stream = StreamConfig::default();

    if let Some(base_url) = flags.base_url.clone().or_else(|| env(ENV_BASE_URL)).or(file.base_url) {
        client.base_url = base_url;
    }
    if let Some(prefix) = flags.api_prefix.clone().or_else(|| env(ENV_API_PREFIX)).or(file.api_prefix) {
        client.api_prefix = prefix;
    }
    if let Some(ms) = millis(flags.timeout_ms, ENV_TIMEOUT_MS, file.timeout_ms)? {
        client.timeout = Duration::from_millis(ms);
    }
    if let Some(path) = flags.ws_path.clone().or_else(|| env(ENV_WS_PATH)).or(file.ws_path) {
        stream.path = path;
    }
    if let Some(ms) = millis(flags.retry_ms, ENV_RETRY_MS, file.retry_ms)? {
        stream.retry_delay = Duration::from_millis(ms);
    }
    stream.protocols = file.protocols;

    client
        .parsed_base_url()
        .with_context(|| format!("Invalid base URL {:?}", client.base_url))?;

    Ok(Settings { client, stream })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let settings = resolve(&Overrides::default(), env_from(&[]), FileConfig::default()).unwrap();
        assert_eq!(settings.client.base_url, "http://127.0.0.1:4000");
        assert_eq!(settings.client.api_prefix, "/api/v1");
        assert_eq!(settings.client.timeout, Duration::from_secs(10));
        assert_eq!(settings.stream.path, "/ws");
        assert_eq!(settings.stream.retry_delay, Duration::from_millis(5000));
    }

    #[test]
    fn test_flag_beats_env_beats_file() {
        let file = FileConfig {
            base_url: Some("http://file:1".into()),
            api_prefix: Some("/file".into()),
            timeout_ms: Some(1000),
            retry_ms: Some(3000),
            ..FileConfig::default()
        };
        let env = env_from(&[(ENV_BASE_URL, "http://env:2"), (ENV_TIMEOUT_MS, "2000")]);
        let flags = Overrides {
            base_url: Some("http://flag:3".into()),
            ..Overrides::default()
        };

        let settings = resolve(&flags, env, file).unwrap();
        assert_eq!(settings.client.base_url, "http://flag:3");
        assert_eq!(settings.client.timeout, Duration::from_millis(2000));
        assert_eq!(settings.client.api_prefix, "/file");
        assert_eq!(settings.stream.retry_delay, Duration::from_millis(3000));
    }

    #[test]
    fn test_bad_env_number_is_an_error() {
        let env = env_from(&[(ENV_RETRY_MS, "soon")]);
        let err = resolve(&Overrides::default(), env, FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains(ENV_RETRY_MS));
    }

    #[test]
    fn test_flag_shadows_bad_env_number() {
        let env = env_from(&[(ENV_TIMEOUT_MS, "ten seconds"), (ENV_RETRY_MS, "soon")]);
        let flags = Overrides {
            timeout_ms: Some(1500),
            retry_ms: Some(250),
            ..Overrides::default()
        };
        let settings = resolve(&flags, env, FileConfig::default()).unwrap();
        assert_eq!(settings.client.timeout, Duration::from_millis(1500));
        assert_eq!(settings.stream.retry_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let flags = Overrides {
            base_url: Some("not a url".into()),
            ..Overrides::default()
        };
        assert!(resolve(&flags, env_from(&[]), FileConfig::default()).is_err());
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
base_url = "https://graph.example.com"
ws_path = "/live"
retry_ms = 250
protocols = ["graphwire.v1"]
"#
        )
        .unwrap();

        let parsed = FileConfig::load(file.path()).unwrap();
        let settings = resolve(&Overrides::default(), env_from(&[]), parsed).unwrap();
        assert_eq!(settings.client.base_url, "https://graph.example.com");
        assert_eq!(settings.stream.path, "/live");
        assert_eq!(settings.stream.retry_delay, Duration::from_millis(250));
        assert_eq!(settings.stream.protocols, vec!["graphwire.v1"]);
    }

    #[test]
    fn test_unknown_file_key_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_ulr = \"http://typo\"").unwrap();
        assert!(FileConfig::load(file.path()).is_err());
    }
}
