/// Class registry: resolves class names to descriptors and constructors
use crate::config::types::{ProbeError, Result};
use crate::reflect::class::ClassDescriptor;
use crate::reflect::submission::{Submission, SubmissionClass};
use std::collections::HashMap;

/// Resolves a class name to its descriptor
pub trait TypeResolver: Send + Sync {
    fn resolve(&self, class_name: &str) -> Option<&ClassDescriptor>;
}

type Factory = Box<dyn Fn() -> Box<dyn Submission> + Send + Sync>;

struct ClassEntry {
    descriptor: ClassDescriptor,
    factory: Factory,
}

/// Registry of loadable submission classes
#[derive(Default)]
pub struct ClassRegistry {
    classes: HashMap<String, ClassEntry>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a submission type under its descriptor's class name
    pub fn register<S: SubmissionClass>(&mut self) -> Result<()> {
        self.register_with(S::descriptor(), || Box::new(S::instantiate()))
    }

    /// Register a descriptor with an explicit constructor
    pub fn register_with<F>(&mut self, descriptor: ClassDescriptor, factory: F) -> Result<()>
    where
        F: Fn() -> Box<dyn Submission> + Send + Sync + 'static,
    {
        if descriptor.name.trim().is_empty() {
            return Err(ProbeError::Config(
                "class descriptor has an empty name".to_string(),
            ));
        }
        if self.classes.contains_key(&descriptor.name) {
            return Err(ProbeError::Config(format!(
                "class {} is already registered",
                descriptor.name
            )));
        }
        if let Some(dup) = descriptor.duplicate_signature() {
            return Err(ProbeError::Config(format!(
                "class {} declares {} more than once",
                descriptor.name,
                dup.signature()
            )));
        }

        log::debug!(
            "Registered class {} with {} method(s)",
            descriptor.name,
            descriptor.methods.len()
        );
        self.classes.insert(
            descriptor.name.clone(),
            ClassEntry {
                descriptor,
                factory: Box::new(factory),
            },
        );
        Ok(())
    }

    /// Construct a fresh instance of a registered class
    pub fn instantiate(&self, class_name: &str) -> Result<Box<dyn Submission>> {
        let entry = self.classes.get(class_name).ok_or_else(|| {
            ProbeError::Config(format!("class {} is not registered", class_name))
        })?;
        Ok((entry.factory)())
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.classes.contains_key(class_name)
    }

    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl TypeResolver for ClassRegistry {
    fn resolve(&self, class_name: &str) -> Option<&ClassDescriptor> {
        self.classes.get(class_name).map(|entry| &entry.descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::SubmissionError;
    use crate::judge::statistics::{Profiled, Statistics};
    use crate::reflect::class::MethodDescriptor;
    use crate::reflect::submission::int_arg;
    use crate::reflect::types::{TypeDescriptor, Value};

    #[derive(Default)]
    struct Echo {
        statistics: Statistics,
    }

    impl Profiled for Echo {
        fn statistics(&self) -> &Statistics {
            &self.statistics
        }

        fn statistics_mut(&mut self) -> &mut Statistics {
            &mut self.statistics
        }
    }

    impl Submission for Echo {
        fn class_name(&self) -> &str {
            "Echo"
        }

        fn call(&mut self, method: &str, args: &[Value]) -> std::result::Result<Value, SubmissionError> {
            match method {
                "echo" => Ok(Value::Int(int_arg(args, 0)?)),
                other => Err(SubmissionError::NoSuchMethod(other.to_string())),
            }
        }
    }

    impl SubmissionClass for Echo {
        fn descriptor() -> ClassDescriptor {
            ClassDescriptor::new("Echo").method(
                MethodDescriptor::public("echo")
                    .params([TypeDescriptor::Int])
                    .returns(TypeDescriptor::Int),
            )
        }

        fn instantiate() -> Self {
            Echo::default()
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = ClassRegistry::new();
        assert!(registry.is_empty());
        registry.register::<Echo>().unwrap();

        assert!(registry.contains("Echo"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.class_names(), vec!["Echo"]);
        let descriptor = registry.resolve("Echo").unwrap();
        assert_eq!(descriptor.methods.len(), 1);
        assert!(registry.resolve("echo").is_none());
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let mut registry = ClassRegistry::new();
        registry.register::<Echo>().unwrap();
        let err = registry.register::<Echo>().unwrap_err();
        assert!(matches!(err, ProbeError::Config(_)));
    }

    #[test]
    fn test_duplicate_method_signature_rejected() {
        let mut registry = ClassRegistry::new();
        let descriptor = Echo::descriptor().method(
            MethodDescriptor::public("echo")
                .params([TypeDescriptor::Int])
                .returns(TypeDescriptor::Void)
                .as_static(),
        );
        let err = registry
            .register_with(descriptor, || Box::new(Echo::default()))
            .unwrap_err();
        assert!(err.to_string().contains("echo(int)"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_instantiate_builds_fresh_objects() {
        let mut registry = ClassRegistry::new();
        registry.register::<Echo>().unwrap();

        let mut submission = registry.instantiate("Echo").unwrap();
        assert_eq!(submission.class_name(), "Echo");
        assert_eq!(submission.call("echo", &[Value::Int(9)]), Ok(Value::Int(9)));
        assert_eq!(submission.statistics().execute_time(), 0);

        assert!(matches!(
            registry.instantiate("Missing"),
            Err(ProbeError::Config(_))
        ));
    }
}
