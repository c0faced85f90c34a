use std::collections::BTreeMap;

use super::{Analysis, Invocation, Software};
use crate::error::FieldError;
use crate::model::File;

/// A user script run inside a named conda environment.
#[derive(Debug, Clone)]
pub struct CondaScript {
    pub invocation: Invocation,
    pub environment: String,
}

impl CondaScript {
    pub fn new(
        version: impl Into<String>,
        command: impl Into<String>,
        input_files: Vec<File>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            invocation: Invocation::new(version, command, input_files),
            environment: environment.into(),
        }
    }
}

impl Software for CondaScript {
    const CODE: &'static str = "miniconda";
    const DISPLAY_NAME: &'static str = "Miniconda";
}

impl Analysis for CondaScript {
    fn software_code(&self) -> &'static str {
        Self::CODE
    }

    fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    fn validate_variant(&self, field: &str, errors: &mut Vec<FieldError>) {
        let env = self.environment.trim();
        if env.is_empty() {
            errors.push(FieldError::new(
                format!("{field}.environment"),
                "must not be empty",
            ));
        } else if env.chars().any(char::is_whitespace) {
            errors.push(FieldError::new(
                format!("{field}.environment"),
                format!("'{env}' must not contain whitespace"),
            ));
        }
    }

    fn env_vars(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(
            "CONDA_DEFAULT_ENV".to_string(),
            self.environment.trim().to_string(),
        )])
    }
}
