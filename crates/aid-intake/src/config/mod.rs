use crate::workflows::intake::{IntakeFields, SubmissionLayout};
use crate::workflows::routing::RoutingSheets;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Distinguishes runtime behavior for different stages of the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the worker.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub intake: IntakeFields,
    pub layout: SubmissionLayout,
    pub routing: RoutingConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let mut intake = IntakeFields::default();
        override_from_env("INTAKE_APPLICATION_FORM", &mut intake.application_form)?;
        override_from_env("INTAKE_PERSONAL_FORM", &mut intake.personal_form)?;
        override_from_env(
            "INTAKE_DOCUMENTATION_FIELD",
            &mut intake.documentation_upload_field,
        )?;

        let mut sheets = RoutingSheets::default();
        override_from_env("INTAKE_ORGANIZATION_SHEET", &mut sheets.organization)?;
        override_from_env("INTAKE_CASE_AREA_SHEET", &mut sheets.case_area)?;

        let rules_path = match env::var("INTAKE_RULES_PATH") {
            Ok(value) if value.trim().is_empty() => {
                return Err(ConfigError::EmptyValue {
                    var: "INTAKE_RULES_PATH",
                })
            }
            Ok(value) => Some(PathBuf::from(value.trim())),
            Err(_) => None,
        };

        Ok(Self {
            environment,
            intake,
            layout: SubmissionLayout::default(),
            routing: RoutingConfig { rules_path, sheets },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn override_from_env(var: &'static str, target: &mut String) -> Result<(), ConfigError> {
    if let Ok(value) = env::var(var) {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyValue { var });
        }
        *target = trimmed.to_string();
    }
    Ok(())
}

/// Location of the rule table and the sheets consulted for routing.
#[derive(Debug, Clone, Default)]
pub struct RoutingConfig {
    pub rules_path: Option<PathBuf>,
    pub sheets: RoutingSheets,
}

impl RoutingConfig {
    pub fn rules_path(&self) -> Result<&Path, ConfigError> {
        self.rules_path
            .as_deref()
            .ok_or(ConfigError::MissingRulesPath)
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyValue { var: &'static str },
    MissingRulesPath,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyValue { var } => write!(f, "{var} must not be blank when set"),
            ConfigError::MissingRulesPath => write!(
                f,
                "INTAKE_RULES_PATH (or --rules) must point at the routing rule table"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
