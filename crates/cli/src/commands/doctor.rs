use serde::Serialize;
use workforce_core::config::{AppConfig, LoadOptions};
use workforce_core::IntentRouter;

use crate::commands::escape_json;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

const DEPENDENT_CHECKS: [&str; 3] = ["workspace_readiness", "engine_credentials", "intent_routes"];

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_workspace(&config));
            checks.push(check_engine_credentials(&config));
            checks.push(check_routes(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.extend(DEPENDENT_CHECKS.iter().map(|name| DoctorCheck {
                name,
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            }));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_workspace(config: &AppConfig) -> DoctorCheck {
    match config.engine.workspace_id() {
        Some(workspace_id) => DoctorCheck {
            name: "workspace_readiness",
            status: CheckStatus::Pass,
            details: format!("workspace `{workspace_id}` configured"),
        },
        None => DoctorCheck {
            name: "workspace_readiness",
            status: CheckStatus::Fail,
            details: "set WORKFORCE_WORKSPACE_ID (or WORKSPACE_ID); chat turns return the configuration notice until then".to_string(),
        },
    }
}

fn check_engine_credentials(config: &AppConfig) -> DoctorCheck {
    if config.engine.has_credentials() {
        DoctorCheck {
            name: "engine_credentials",
            status: CheckStatus::Pass,
            details: format!("basic auth configured for `{}`", config.engine.url),
        }
    } else {
        DoctorCheck {
            name: "engine_credentials",
            status: CheckStatus::Fail,
            details: "engine.username and engine.password are not set".to_string(),
        }
    }
}

fn check_routes(config: &AppConfig) -> DoctorCheck {
    let router = IntentRouter::with_default_routes(&config.backend.tenant_header);
    DoctorCheck {
        name: "intent_routes",
        status: CheckStatus::Pass,
        details: format!(
            "{} intents ({}) served from `{}` with tenant header `{}`",
            router.len(),
            router.intent_names().join(", "),
            config.backend.base_url,
            config.backend.tenant_header
        ),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
