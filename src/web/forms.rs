//! # Form Validation
//!
//! Validates sandbox creation form submissions against the configured
//! feature flag definitions. Unknown fields and unparsable values are
//! reported per field; a flag missing from the submission takes its
//! configured default. Disabled flags are not part of the form and a
//! submission naming one is rejected as unknown.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::config::DashboardConfig;
use crate::error::{DashboardError, FieldError};
use crate::sandbox::application::HelmParameter;

/// One form field as described to the client on `GET /add`.
#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub name: String,
    pub description: String,
    pub default: bool,
}

/// Describe the creation form: the enabled feature flags in order.
pub fn form_fields(config: &DashboardConfig) -> Vec<FormField> {
    config
        .enabled_features()
        .map(|flag| FormField {
            name: flag.name.clone(),
            description: flag.description.clone(),
            default: flag.default,
        })
        .collect()
}

/// Validate a submission into the ordered helm parameter list.
pub fn validate(
    config: &DashboardConfig,
    submitted: &HashMap<String, String>,
) -> Result<Vec<HelmParameter>, DashboardError> {
    let known: HashSet<&str> = config
        .enabled_features()
        .map(|flag| flag.name.as_str())
        .collect();

    let mut errors = Vec::new();
    for field in submitted.keys() {
        if !known.contains(field.as_str()) {
            errors.push(FieldError::new(field.clone(), "unknown field"));
        }
    }

    let mut parameters = Vec::new();
    for flag in config.enabled_features() {
        let value = match submitted.get(&flag.name) {
            None => flag.default,
            Some(raw) => match parse_bool(raw) {
                Some(value) => value,
                None => {
                    errors.push(FieldError::new(
                        flag.name.clone(),
                        format!("expected a boolean, got {raw:?}"),
                    ));
                    flag.default
                }
            },
        };
        parameters.push(HelmParameter::new(flag.name.clone(), value.to_string()));
    }

    if errors.is_empty() {
        Ok(parameters)
    } else {
        Err(DashboardError::Validation(errors))
    }
}

/// Parse checkbox-style boolean input.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => Some(true),
        "false" | "off" | "0" | "" => Some(false),
        _ => None,
    }
}
