/// Submission contracts: the set of methods a submission class must expose
use crate::config::types::{Result, ValidationError};
use crate::judge::signature::{MethodSignature, SignatureValidator, ValidatedMethod};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodContract {
    pub name: String,
    #[serde(default)]
    pub input: Vec<String>,
    pub output: String,
}

/// Expected class shape, as stored alongside a challenge's verification data
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionContract {
    pub class_name: String,
    pub methods: Vec<MethodContract>,
}

impl SubmissionContract {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn signatures(&self) -> Vec<MethodSignature> {
        self.methods
            .iter()
            .map(|m| MethodSignature::new(&self.class_name, &m.name, &m.output, &m.input))
            .collect()
    }

    /// Resolve every method in declaration order; the first failure wins
    pub fn validate(
        &self,
        validator: &SignatureValidator<'_>,
    ) -> std::result::Result<Vec<ValidatedMethod>, ValidationError> {
        log::info!(
            "Validating contract for {} ({} method(s))",
            self.class_name,
            self.methods.len()
        );
        self.methods
            .iter()
            .map(|m| validator.resolve(&self.class_name, &m.name, &m.output, &m.input))
            .collect()
    }
}

impl SignatureValidator<'_> {
    /// Validate every method of a contract, returning their handles
    pub fn validate_contract(
        &self,
        contract: &SubmissionContract,
    ) -> std::result::Result<Vec<ValidatedMethod>, ValidationError> {
        contract.validate(self)
    }
}
