use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use toml::Value;
use workforce_core::config::{AppConfig, LoadOptions};

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let file_path = detect_config_path();
    let file_doc = load_config_file_doc(file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, file_doc.as_ref(), file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "engine.url",
        &config.engine.url,
        source("engine.url", &["WORKFORCE_ENGINE_URL"]),
    ));
    lines.push(render_line(
        "engine.version_date",
        &config.engine.version_date,
        source("engine.version_date", &["WORKFORCE_ENGINE_VERSION_DATE"]),
    ));
    lines.push(render_line(
        "engine.workspace_id",
        config.engine.workspace_id().unwrap_or("<unset>"),
        source("engine.workspace_id", &["WORKFORCE_WORKSPACE_ID", "WORKSPACE_ID"]),
    ));
    lines.push(render_line(
        "engine.username",
        config.engine.username.as_deref().unwrap_or("<unset>"),
        source("engine.username", &["WORKFORCE_ENGINE_USERNAME", "CONVERSATION_USERNAME"]),
    ));

    let password = config
        .engine
        .password
        .as_ref()
        .map(|value| redact_secret(value.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());
    lines.push(render_line(
        "engine.password",
        &password,
        source("engine.password", &["WORKFORCE_ENGINE_PASSWORD", "CONVERSATION_PASSWORD"]),
    ));

    lines.push(render_line(
        "backend.base_url",
        &config.backend.base_url,
        source("backend.base_url", &["WORKFORCE_BACKEND_BASE_URL", "WF_HOST_URL"]),
    ));
    lines.push(render_line(
        "backend.tenant_header",
        &config.backend.tenant_header,
        source("backend.tenant_header", &["WORKFORCE_BACKEND_TENANT_HEADER"]),
    ));

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", &["WORKFORCE_SERVER_BIND_ADDRESS"]),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", &["WORKFORCE_SERVER_PORT", "PORT"]),
    ));
    lines.push(render_line(
        "server.static_dir",
        &config.server.static_dir.display().to_string(),
        source("server.static_dir", &["WORKFORCE_SERVER_STATIC_DIR"]),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["WORKFORCE_LOGGING_LEVEL", "WORKFORCE_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["WORKFORCE_LOGGING_FORMAT", "WORKFORCE_LOG_FORMAT"]),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("workforce.toml"), PathBuf::from("config/workforce.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let env_key = env_keys
        .iter()
        .find(|key| env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false));
    if let Some(env_key) = env_key {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_secret(secret: &str) -> String {
    if secret.trim().is_empty() {
        "<empty>".to_string()
    } else {
        "<redacted>".to_string()
    }
}
