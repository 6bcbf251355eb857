use crate::catalog::Catalog;
use crate::domain::model::{ScopeAnswer, Submission, IN_SCOPE_ANSWER, OUT_OF_SCOPE_ANSWER};
use crate::utils::error::{Result, ScopingError};
use crate::utils::validation::{
    validate_non_empty_string, validate_non_negative, validate_one_of, validate_unique_names,
    Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One engagement to estimate, as written in a TOML file.
///
/// ```toml
/// selected_roles = ["PM USA", "App Lead India"]
///
/// [engagement]
/// client_name = "ABC Corp"
/// project_name = "FCCS Implementation"
///
/// [[scope]]
/// name = "Account"
/// in_scope = "YES"
/// details = 2000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementConfig {
    pub engagement: EngagementInfo,
    #[serde(default)]
    pub selected_roles: Vec<String>,
    #[serde(default)]
    pub scope: Vec<ScopeAnswer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementInfo {
    pub client_name: String,
    pub project_name: String,
    pub comments: Option<String>,
}

impl EngagementConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;

        toml::from_str(&processed).map_err(|e| ScopingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value. Unset variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ScopingError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn submission(&self) -> Submission {
        Submission {
            answers: self.scope.clone(),
            selected_roles: self.selected_roles.clone(),
        }
    }

    pub fn in_scope_count(&self) -> usize {
        self.scope
            .iter()
            .filter(|a| a.in_scope == IN_SCOPE_ANSWER)
            .count()
    }

    /// Role names must exist in the catalog's allocation matrix.
    pub fn validate_roles(&self, catalog: &Catalog) -> Result<()> {
        for role in &self.selected_roles {
            if !catalog.allocation().has_role(role) {
                return Err(ScopingError::InvalidConfigValueError {
                    field: "selected_roles".to_string(),
                    value: role.clone(),
                    reason: format!("Unknown role. Known roles: {}", catalog.roles().join(", ")),
                });
            }
        }
        Ok(())
    }
}

impl Validate for EngagementConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("engagement.client_name", &self.engagement.client_name)?;
        validate_non_empty_string("engagement.project_name", &self.engagement.project_name)?;

        for answer in &self.scope {
            validate_non_empty_string("scope.name", &answer.name)?;
            validate_one_of(
                &format!("scope.{}.in_scope", answer.name),
                &answer.in_scope,
                &[IN_SCOPE_ANSWER, OUT_OF_SCOPE_ANSWER],
            )?;
            if let Some(details) = answer.details {
                validate_non_negative(&format!("scope.{}.details", answer.name), details)?;
            }
        }
        validate_unique_names("scope", self.scope.iter().map(|a| a.name.as_str()))?;
        validate_unique_names("selected_roles", self.selected_roles.iter().map(String::as_str))?;

        Ok(())
    }
}
