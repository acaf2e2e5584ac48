use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const WORKSPACE_PLACEHOLDER: &str = "<workspace-id>";
pub const DEFAULT_ENGINE_URL: &str = "https://gateway.watsonplatform.net/conversation/api";
pub const DEFAULT_ENGINE_VERSION_DATE: &str = "2016-10-21";
pub const DEFAULT_BACKEND_BASE_URL: &str = "https://workforce-server.herokuapp.com/v1";
pub const DEFAULT_TENANT_HEADER: &str = "x-app-id";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub backend: BackendConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Connection settings for the conversational engine.
///
/// `workspace_id` is not validated on load. A missing workspace is
/// reported per request through [`EngineConfig::workspace_id`].
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub url: String,
    pub version_date: String,
    pub workspace_id: Option<String>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub base_url: String,
    pub tenant_header: String,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub workspace_id: Option<String>,
    pub engine_url: Option<String>,
    pub engine_username: Option<String>,
    pub engine_password: Option<String>,
    pub backend_base_url: Option<String>,
    pub backend_tenant_header: Option<String>,
    pub server_bind_address: Option<String>,
    pub server_port: Option<u16>,
    pub server_static_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig {
                url: DEFAULT_ENGINE_URL.to_string(),
                version_date: DEFAULT_ENGINE_VERSION_DATE.to_string(),
                workspace_id: None,
                username: None,
                password: None,
            },
            backend: BackendConfig {
                base_url: DEFAULT_BACKEND_BASE_URL.to_string(),
                tenant_header: DEFAULT_TENANT_HEADER.to_string(),
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 3000,
                static_dir: PathBuf::from("./public"),
                graceful_shutdown_secs: 15,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl EngineConfig {
    /// The configured workspace, or `None` when it is unset or still the placeholder.
    pub fn workspace_id(&self) -> Option<&str> {
        self.workspace_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty() && *value != WORKSPACE_PLACEHOLDER)
    }

    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("workforce.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(engine) = patch.engine {
            if let Some(url) = engine.url {
                self.engine.url = url;
            }
            if let Some(version_date) = engine.version_date {
                self.engine.version_date = version_date;
            }
            if let Some(workspace_id) = engine.workspace_id {
                self.engine.workspace_id = Some(workspace_id);
            }
            if let Some(username) = engine.username {
                self.engine.username = Some(username);
            }
            if let Some(engine_password_value) = engine.password {
                self.engine.password = Some(secret_value(engine_password_value));
            }
        }

        if let Some(backend) = patch.backend {
            if let Some(base_url) = backend.base_url {
                self.backend.base_url = base_url;
            }
            if let Some(tenant_header) = backend.tenant_header {
                self.backend.tenant_header = tenant_header;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(static_dir) = server.static_dir {
                self.server.static_dir = static_dir;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("WORKFORCE_ENGINE_URL") {
            self.engine.url = value;
        }
        if let Some(value) = read_env("WORKFORCE_ENGINE_VERSION_DATE") {
            self.engine.version_date = value;
        }
        let workspace_id =
            read_env("WORKFORCE_WORKSPACE_ID").or_else(|| read_env("WORKSPACE_ID"));
        if let Some(value) = workspace_id {
            self.engine.workspace_id = Some(value);
        }
        let username =
            read_env("WORKFORCE_ENGINE_USERNAME").or_else(|| read_env("CONVERSATION_USERNAME"));
        if let Some(value) = username {
            self.engine.username = Some(value);
        }
        let password =
            read_env("WORKFORCE_ENGINE_PASSWORD").or_else(|| read_env("CONVERSATION_PASSWORD"));
        if let Some(value) = password {
            self.engine.password = Some(secret_value(value));
        }

        let base_url = read_env("WORKFORCE_BACKEND_BASE_URL").or_else(|| read_env("WF_HOST_URL"));
        if let Some(value) = base_url {
            self.backend.base_url = value;
        }
        if let Some(value) = read_env("WORKFORCE_BACKEND_TENANT_HEADER") {
            self.backend.tenant_header = value;
        }

        if let Some(value) = read_env("WORKFORCE_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("WORKFORCE_SERVER_PORT") {
            self.server.port = parse_u16("WORKFORCE_SERVER_PORT", &value)?;
        } else if let Some(value) = read_env("PORT") {
            self.server.port = parse_u16("PORT", &value)?;
        }
        if let Some(value) = read_env("WORKFORCE_SERVER_STATIC_DIR") {
            self.server.static_dir = PathBuf::from(value);
        }
        if let Some(value) = read_env("WORKFORCE_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("WORKFORCE_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level =
            read_env("WORKFORCE_LOGGING_LEVEL").or_else(|| read_env("WORKFORCE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("WORKFORCE_LOGGING_FORMAT").or_else(|| read_env("WORKFORCE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(workspace_id) = overrides.workspace_id {
            self.engine.workspace_id = Some(workspace_id);
        }
        if let Some(engine_url) = overrides.engine_url {
            self.engine.url = engine_url;
        }
        if let Some(engine_username) = overrides.engine_username {
            self.engine.username = Some(engine_username);
        }
        if let Some(engine_password) = overrides.engine_password {
            self.engine.password = Some(secret_value(engine_password));
        }
        if let Some(base_url) = overrides.backend_base_url {
            self.backend.base_url = base_url;
        }
        if let Some(tenant_header) = overrides.backend_tenant_header {
            self.backend.tenant_header = tenant_header;
        }
        if let Some(bind_address) = overrides.server_bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.server_port {
            self.server.port = port;
        }
        if let Some(static_dir) = overrides.server_static_dir {
            self.server.static_dir = static_dir;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_engine(&self.engine)?;
        validate_backend(&self.backend)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("workforce.toml"), PathBuf::from("config/workforce.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("http://") || value.starts_with("https://")
}

fn validate_engine(engine: &EngineConfig) -> Result<(), ConfigError> {
    if !is_http_url(&engine.url) {
        return Err(ConfigError::Validation(
            "engine.url must start with http:// or https://".to_string(),
        ));
    }

    if engine.version_date.trim().is_empty() {
        return Err(ConfigError::Validation("engine.version_date must not be empty".to_string()));
    }

    let password_missing = engine
        .password
        .as_ref()
        .map(|value| value.expose_secret().trim().is_empty())
        .unwrap_or(true);
    if engine.username.is_some() && password_missing {
        return Err(ConfigError::Validation(
            "engine.password is required when engine.username is set".to_string(),
        ));
    }
    if engine.username.is_none() && engine.password.is_some() {
        return Err(ConfigError::Validation(
            "engine.username is required when engine.password is set".to_string(),
        ));
    }

    Ok(())
}

fn validate_backend(backend: &BackendConfig) -> Result<(), ConfigError> {
    if !is_http_url(&backend.base_url) {
        return Err(ConfigError::Validation(
            "backend.base_url must start with http:// or https://".to_string(),
        ));
    }

    let header = backend.tenant_header.trim();
    let valid_header = !header.is_empty()
        && header.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_');
    if !valid_header {
        return Err(ConfigError::Validation(
            "backend.tenant_header must be a non-empty HTTP header name".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    if server.static_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation("server.static_dir must not be empty".to_string()));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    engine: Option<EnginePatch>,
    backend: Option<BackendPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct EnginePatch {
    url: Option<String>,
    version_date: Option<String>,
    workspace_id: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BackendPatch {
    base_url: Option<String>,
    tenant_header: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    static_dir: Option<PathBuf>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{
        AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, DEFAULT_BACKEND_BASE_URL,
    };

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    const MANAGED_VARS: &[&str] = &[
        "WORKFORCE_ENGINE_URL",
        "WORKFORCE_ENGINE_VERSION_DATE",
        "WORKFORCE_WORKSPACE_ID",
        "WORKSPACE_ID",
        "WORKFORCE_ENGINE_USERNAME",
        "CONVERSATION_USERNAME",
        "WORKFORCE_ENGINE_PASSWORD",
        "CONVERSATION_PASSWORD",
        "WORKFORCE_BACKEND_BASE_URL",
        "WF_HOST_URL",
        "WORKFORCE_BACKEND_TENANT_HEADER",
        "WORKFORCE_SERVER_BIND_ADDRESS",
        "WORKFORCE_SERVER_PORT",
        "PORT",
        "WORKFORCE_SERVER_STATIC_DIR",
        "WORKFORCE_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "WORKFORCE_LOGGING_LEVEL",
        "WORKFORCE_LOGGING_FORMAT",
        "WORKFORCE_LOG_LEVEL",
        "WORKFORCE_LOG_FORMAT",
        "TEST_ENGINE_PASSWORD",
    ];

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_load_without_workspace() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(MANAGED_VARS);

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.engine.workspace_id().is_none(), "workspace should be unset by default")?;
        ensure(
            config.backend.base_url == DEFAULT_BACKEND_BASE_URL,
            "backend should default to the workforce host",
        )?;
        ensure(config.backend.tenant_header == "x-app-id", "tenant header should be x-app-id")?;
        ensure(config.server.port == 3000, "server should listen on 3000 by default")
    }

    #[test]
    fn clearing_managed_vars_resets_every_env_layer() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        env::set_var("WORKFORCE_ENGINE_URL", "not-a-url");
        env::set_var("WORKFORCE_ENGINE_VERSION_DATE", "2099-01-01");
        env::set_var("WORKFORCE_BACKEND_TENANT_HEADER", "bad header");
        env::set_var("WORKFORCE_SERVER_BIND_ADDRESS", "0.0.0.0");
        env::set_var("WORKFORCE_SERVER_STATIC_DIR", "/srv/chat");
        env::set_var("WORKFORCE_SERVER_GRACEFUL_SHUTDOWN_SECS", "0");
        env::set_var("WORKFORCE_LOGGING_LEVEL", "loud");
        env::set_var("WORKFORCE_LOGGING_FORMAT", "xml");
        clear_vars(MANAGED_VARS);

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        let defaults = AppConfig::default();
        ensure(config.engine.url == defaults.engine.url, "engine url back to default")?;
        ensure(
            config.engine.version_date == defaults.engine.version_date,
            "version date back to default",
        )?;
        ensure(config.server.bind_address == "127.0.0.1", "bind address back to default")?;
        ensure(config.server.graceful_shutdown_secs == 15, "shutdown grace back to default")?;
        ensure(config.logging.level == "info", "log level back to default")?;
        ensure(config.logging.format == LogFormat::Compact, "log format back to default")
    }

    #[test]
    fn placeholder_workspace_is_treated_as_missing() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(MANAGED_VARS);
        env::set_var("WORKSPACE_ID", "<workspace-id>");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            ensure(config.engine.workspace_id().is_none(), "placeholder must not count as set")
        })();

        clear_vars(MANAGED_VARS);
        result
    }

    #[test]
    fn legacy_env_names_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(MANAGED_VARS);
        env::set_var("WORKSPACE_ID", "ws-legacy");
        env::set_var("WF_HOST_URL", "http://localhost:9000/v1");
        env::set_var("CONVERSATION_USERNAME", "bot");
        env::set_var("CONVERSATION_PASSWORD", "hunter2");
        env::set_var("PORT", "8081");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.engine.workspace_id() == Some("ws-legacy"),
                "workspace from WORKSPACE_ID",
            )?;
            ensure(
                config.backend.base_url == "http://localhost:9000/v1",
                "backend host from WF_HOST_URL",
            )?;
            ensure(config.engine.has_credentials(), "engine credentials from legacy names")?;
            ensure(config.server.port == 8081, "port from PORT")
        })();

        clear_vars(MANAGED_VARS);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(MANAGED_VARS);
        env::set_var("WORKFORCE_BACKEND_BASE_URL", "http://from-env.local/v1");
        env::set_var("TEST_ENGINE_PASSWORD", "pw-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("workforce.toml");
            fs::write(
                &path,
                r#"
[engine]
workspace_id = "ws-from-file"
username = "bot"
password = "${TEST_ENGINE_PASSWORD}"

[backend]
base_url = "http://from-file.local/v1"

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    workspace_id: Some("ws-from-override".to_string()),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.engine.workspace_id() == Some("ws-from-override"),
                "override workspace should win",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(
                config.backend.base_url == "http://from-env.local/v1",
                "env backend url should win over file",
            )?;
            ensure(
                config
                    .engine
                    .password
                    .as_ref()
                    .map(|value| value.expose_secret() == "pw-from-env")
                    .unwrap_or(false),
                "password should be interpolated from environment",
            )
        })();

        clear_vars(MANAGED_VARS);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(MANAGED_VARS);
        env::set_var("WF_HOST_URL", "ftp://workforce");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("backend.base_url")
            );
            ensure(has_message, "validation failure should mention backend.base_url")
        })();

        clear_vars(MANAGED_VARS);
        result
    }

    #[test]
    fn username_without_password_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(MANAGED_VARS);

        let error = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                engine_username: Some("bot".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .err()
        .ok_or_else(|| "expected validation failure".to_string())?;

        ensure(
            matches!(error, ConfigError::Validation(ref message) if message.contains("engine.password")),
            "validation failure should mention engine.password",
        )
    }

    #[test]
    fn secret_values_are_not_leaked_by_debug() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(MANAGED_VARS);
        env::set_var("WORKFORCE_ENGINE_USERNAME", "bot");
        env::set_var("WORKFORCE_ENGINE_PASSWORD", "engine-secret-value");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            let debug = format!("{config:?}");

            ensure(
                !debug.contains("engine-secret-value"),
                "debug output should not contain the engine password",
            )?;
            ensure(
                matches!(config.logging.format, LogFormat::Compact),
                "default logging format should be compact",
            )
        })();

        clear_vars(&["WORKFORCE_ENGINE_USERNAME", "WORKFORCE_ENGINE_PASSWORD"]);
        result
    }
}
