//! Signature validation.
//!
//! Confirms, before anything is invoked, that a class exposes a public
//! instance method with exactly the declared name, parameter types and
//! return type. Types are compared by descriptor equality only: a method
//! taking `long` or `object` never satisfies a declared `int` or `string`.
//!
//! Checks run in a fixed order so the reported error is deterministic:
//! 1. declared output type, then each input type, against the vocabulary
//! 2. class resolution
//! 3. public method lookup by name and exact parameter descriptors
//! 4. return descriptor
//! 5. instance receiver

use crate::config::types::ValidationError;
use crate::judge::vocabulary::supported_types;
use crate::observability::audit::events;
use crate::reflect::class::MethodDescriptor;
use crate::reflect::registry::TypeResolver;
use crate::reflect::types::TypeDescriptor;
use serde::{Deserialize, Serialize};

/// Declared shape of a method to validate
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSignature {
    pub class_name: String,
    pub method_name: String,
    pub output_type: String,
    #[serde(default)]
    pub input_types: Vec<String>,
}

impl MethodSignature {
    pub fn new<S: AsRef<str>>(
        class_name: &str,
        method_name: &str,
        output_type: &str,
        input_types: &[S],
    ) -> Self {
        Self {
            class_name: class_name.to_string(),
            method_name: method_name.to_string(),
            output_type: output_type.to_string(),
            input_types: input_types.iter().map(|t| t.as_ref().to_string()).collect(),
        }
    }
}

/// Handle to a method that passed validation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedMethod {
    class_name: String,
    method: MethodDescriptor,
}

impl ValidatedMethod {
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn name(&self) -> &str {
        &self.method.name
    }

    pub fn descriptor(&self) -> &MethodDescriptor {
        &self.method
    }
}

pub struct SignatureValidator<'a> {
    resolver: &'a dyn TypeResolver,
}

impl<'a> SignatureValidator<'a> {
    pub fn new(resolver: &'a dyn TypeResolver) -> Self {
        Self { resolver }
    }

    /// Check that `class_name` has a public instance method of the given shape
    pub fn validate<S: AsRef<str>>(
        &self,
        class_name: &str,
        method_name: &str,
        output_type: &str,
        input_types: &[S],
    ) -> Result<(), ValidationError> {
        self.resolve(class_name, method_name, output_type, input_types)
            .map(|_| ())
    }

    pub fn validate_signature(&self, signature: &MethodSignature) -> Result<(), ValidationError> {
        self.validate(
            &signature.class_name,
            &signature.method_name,
            &signature.output_type,
            &signature.input_types,
        )
    }

    /// Same checks as `validate`, returning a handle for the invoker
    pub fn resolve<S: AsRef<str>>(
        &self,
        class_name: &str,
        method_name: &str,
        output_type: &str,
        input_types: &[S],
    ) -> Result<ValidatedMethod, ValidationError> {
        let result = self.check(class_name, method_name, output_type, input_types);
        match &result {
            Ok(validated) => {
                events::validation_accepted(class_name, &validated.method.signature());
            }
            Err(e) => {
                events::validation_rejected(class_name, method_name, &e.to_string());
            }
        }
        result
    }

    fn check<S: AsRef<str>>(
        &self,
        class_name: &str,
        method_name: &str,
        output_type: &str,
        input_types: &[S],
    ) -> Result<ValidatedMethod, ValidationError> {
        let vocabulary = supported_types();

        let expected_return = vocabulary
            .lookup(output_type)
            .ok_or_else(|| ValidationError::UnsupportedType(output_type.to_string()))?;

        let parameter_types = input_types
            .iter()
            .map(|name| {
                let name = name.as_ref();
                vocabulary
                    .lookup(name)
                    .cloned()
                    .ok_or_else(|| ValidationError::UnsupportedType(name.to_string()))
            })
            .collect::<Result<Vec<TypeDescriptor>, _>>()?;

        let class = self
            .resolver
            .resolve(class_name)
            .ok_or_else(|| ValidationError::ClassNotFound(class_name.to_string()))?;

        let method = class
            .get_method(method_name, &parameter_types)
            .ok_or_else(|| {
                ValidationError::MethodNotFound(method_name.to_string(), class_name.to_string())
            })?;

        if &method.return_type != expected_return {
            log::debug!(
                "{}.{} returns {}, declared {}",
                class_name,
                method.signature(),
                method.return_type,
                output_type
            );
            return Err(ValidationError::ReturnTypeMismatch(output_type.to_string()));
        }

        if method.is_static() {
            return Err(ValidationError::UnexpectedStaticModifier(
                method_name.to_string(),
                class_name.to_string(),
            ));
        }

        Ok(ValidatedMethod {
            class_name: class_name.to_string(),
            method: method.clone(),
        })
    }
}
