use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key; normally supplied through `GEMINI_API_KEY` rather than the file
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    /// Transport timeout for one generateContent call (default: 60s)
    #[serde(deserialize_with = "deserialize_duration_secs")]
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// The configured key, treating blank values as unset.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }
}

impl Config {
    /// Load configuration with environment variable override support
    ///
    /// Loading order:
    /// 1. Load from the given TOML file, or the first default location found
    /// 2. Override with environment variables
    /// 3. Validate the final configuration
    ///
    /// `.env` is expected to be loaded into the environment before this runs.
    pub fn load(path: Option<&Path>) -> Result<Self, anyhow::Error> {
        Self::load_from(path, |key| std::env::var(key).ok())
    }

    /// [`Config::load`] for process startup, before the real subscriber exists.
    ///
    /// Events emitted while loading (missing file, overrides, invalid values)
    /// go to stderr through a temporary subscriber instead of being dropped.
    pub fn load_at_startup(path: Option<&Path>) -> Result<Self, anyhow::Error> {
        Self::load_reporting(path, |key| std::env::var(key).ok(), std::io::stderr)
    }

    fn load_reporting<E, W>(path: Option<&Path>, env: E, writer: W) -> Result<Self, anyhow::Error>
    where
        E: Fn(&str) -> Option<String>,
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let bootstrap = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(writer)
            .finish();
        tracing::subscriber::with_default(bootstrap, || Self::load_from(path, env))
    }

    fn load_from<E>(path: Option<&Path>, env: E) -> Result<Self, anyhow::Error>
    where
        E: Fn(&str) -> Option<String>,
    {
        // 1. Load from config file
        let mut config = match path {
            Some(path) => Self::from_toml(path)?,
            None => match Self::find_config_file() {
                Some(found) => Self::from_toml(Path::new(&found))?,
                None => {
                    tracing::warn!("Configuration file not found, using defaults");
                    Config::default()
                },
            },
        };

        // 2. Override with environment variables
        config.apply_env_overrides(env);

        // 3. Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - APP_SERVER_HOST: Server host (default: 0.0.0.0)
    /// - APP_SERVER_PORT: Server port (default: 5000)
    /// - APP_LOG_LEVEL: Logging level (e.g., "info,langdetect_server=debug")
    /// - APP_LOG_FILE: Log file path, empty to disable file logging
    /// - GEMINI_API_KEY: Gemini API key
    /// - APP_GEMINI_MODEL: Model name (default: gemini-2.0-flash)
    /// - APP_GEMINI_API_BASE: API base URL
    /// - APP_GEMINI_TIMEOUT_SECS: Request timeout (accepts "30s", "2m")
    fn apply_env_overrides<E>(&mut self, env: E)
    where
        E: Fn(&str) -> Option<String>,
    {
        if let Some(host) = env("APP_SERVER_HOST") {
            self.server.host = host;
            tracing::info!("Override server.host from env: {}", self.server.host);
        }

        if let Some(port) = env("APP_SERVER_PORT") {
            match port.trim().parse() {
                Ok(val) => {
                    self.server.port = val;
                    tracing::info!("Override server.port from env: {}", self.server.port);
                },
                Err(e) => tracing::warn!(
                    "Invalid APP_SERVER_PORT '{}': {} (keep {})",
                    port,
                    e,
                    self.server.port
                ),
            }
        }

        if let Some(level) = env("APP_LOG_LEVEL") {
            self.logging.level = level;
            tracing::info!("Override logging.level from env: {}", self.logging.level);
        }

        if let Some(file) = env("APP_LOG_FILE") {
            self.logging.file = if file.trim().is_empty() { None } else { Some(file) };
            tracing::info!("Override logging.file from env: {:?}", self.logging.file);
        }

        if let Some(key) = env("GEMINI_API_KEY") {
            self.gemini.api_key = Some(key);
            tracing::info!("Override gemini.api_key from env");
        }

        if let Some(model) = env("APP_GEMINI_MODEL") {
            self.gemini.model = model;
            tracing::info!("Override gemini.model from env: {}", self.gemini.model);
        }

        if let Some(base) = env("APP_GEMINI_API_BASE") {
            self.gemini.api_base = base;
            tracing::info!("Override gemini.api_base from env: {}", self.gemini.api_base);
        }

        if let Some(timeout) = env("APP_GEMINI_TIMEOUT_SECS") {
            match parse_duration_to_secs(&timeout) {
                Ok(val) => {
                    self.gemini.timeout_secs = val;
                    tracing::info!(
                        "Override gemini.timeout_secs from env: {}",
                        self.gemini.timeout_secs
                    );
                },
                Err(e) => tracing::warn!(
                    "Invalid APP_GEMINI_TIMEOUT_SECS '{}': {} (keep {})",
                    timeout,
                    e,
                    self.gemini.timeout_secs
                ),
            }
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), anyhow::Error> {
        // A missing key keeps the server up; only /api/detect is disabled
        if !self.gemini.is_configured() {
            tracing::warn!("GEMINI_API_KEY not set. Copy env.example to .env and set your key.");
        }

        // Logging falls back to "info" at startup rather than refusing to boot
        if let Err(e) = EnvFilter::try_new(&self.logging.level) {
            tracing::warn!(
                "Invalid logging.level '{}': {} (falling back to info)",
                self.logging.level,
                e
            );
        }

        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if self.gemini.model.trim().is_empty() {
            anyhow::bail!("gemini.model cannot be empty");
        }
        if self.gemini.api_base.trim().is_empty() {
            anyhow::bail!("gemini.api_base cannot be empty");
        }
        if self.gemini.timeout_secs == 0 {
            anyhow::bail!("gemini.timeout_secs must be > 0");
        }

        Ok(())
    }

    fn find_config_file() -> Option<String> {
        let possible_paths =
            ["conf/config.toml", "config.toml", "./conf/config.toml", "./config.toml"];

        for path in &possible_paths {
            if Path::new(path).exists() {
                return Some(path.to_string());
            }
        }
        None
    }

    fn from_toml(path: &Path) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn from_toml_str(content: &str) -> Result<Self, anyhow::Error> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 5000 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info,langdetect_server=debug".to_string(), file: None }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash".to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 60,
        }
    }
}

// =========================
// Helpers for parsing values
// =========================

fn parse_duration_to_secs(input: &str) -> Result<u64, String> {
    // Accept plain numbers (treated as seconds)
    if let Ok(val) = input.parse::<u64>() {
        return Ok(val);
    }

    let s = input.trim().to_lowercase();
    let (num_str, unit) = s.split_at(s.chars().take_while(|c| c.is_ascii_digit()).count());
    if num_str.is_empty() || unit.is_empty() {
        return Err("missing number or unit".into());
    }
    let n: u64 = num_str.parse().map_err(|_| "invalid number".to_string())?;
    match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => Ok(n),
        "m" | "min" | "mins" | "minute" | "minutes" => Ok(n * 60),
        _ => Err(format!("unsupported unit: {}", unit)),
    }
}

// Accepts either a number of seconds or a human-friendly string
fn deserialize_duration_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Visitor;
    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = u64;
        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number of seconds or a string like '30s', '2m'")
        }
        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v)
        }
        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if v >= 0 { Ok(v as u64) } else { Err(E::custom("negative not allowed")) }
        }
        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            parse_duration_to_secs(v).map_err(E::custom)
        }
    }
    deserializer.deserialize_any(Visitor)
}
