//! Integration tests for signature validation through the class registry
//!
//! Calc exposes `int add(int, int)` as an instance method and
//! `static int sub(int, int)`; nothing named `mul`.

use probebox::reflect::submission::int_arg;
use probebox::{
    ClassDescriptor, ClassRegistry, MethodDescriptor, Profiled, SignatureValidator, Statistics,
    Submission, SubmissionClass, SubmissionContract, SubmissionError, TypeDescriptor,
    ValidationError, Value,
};

#[derive(Default)]
struct Calc {
    statistics: Statistics,
}

impl Profiled for Calc {
    fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    fn statistics_mut(&mut self) -> &mut Statistics {
        &mut self.statistics
    }
}

impl Submission for Calc {
    fn class_name(&self) -> &str {
        "Calc"
    }

    fn call(&mut self, method: &str, args: &[Value]) -> Result<Value, SubmissionError> {
        match method {
            "add" => Ok(Value::Int(int_arg(args, 0)? + int_arg(args, 1)?)),
            other => Err(SubmissionError::NoSuchMethod(other.to_string())),
        }
    }
}

impl SubmissionClass for Calc {
    fn descriptor() -> ClassDescriptor {
        ClassDescriptor::new("Calc")
            .method(
                MethodDescriptor::public("add")
                    .params([TypeDescriptor::Int, TypeDescriptor::Int])
                    .returns(TypeDescriptor::Int),
            )
            .method(
                MethodDescriptor::public("sub")
                    .params([TypeDescriptor::Int, TypeDescriptor::Int])
                    .returns(TypeDescriptor::Int)
                    .as_static(),
            )
    }

    fn instantiate() -> Self {
        Calc::default()
    }
}

fn registry() -> ClassRegistry {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut registry = ClassRegistry::new();
    registry.register::<Calc>().unwrap();
    registry
}

#[test]
fn test_add_accepted() {
    let registry = registry();
    let validator = SignatureValidator::new(&registry);
    assert_eq!(validator.validate("Calc", "add", "int", &["int", "int"]), Ok(()));
}

#[test]
fn test_add_with_wrong_output_type() {
    let registry = registry();
    let validator = SignatureValidator::new(&registry);
    assert_eq!(
        validator.validate("Calc", "add", "string", &["int", "int"]),
        Err(ValidationError::ReturnTypeMismatch("string".to_string()))
    );
}

#[test]
fn test_static_sub_rejected() {
    let registry = registry();
    let validator = SignatureValidator::new(&registry);
    assert_eq!(
        validator.validate("Calc", "sub", "int", &["int", "int"]),
        Err(ValidationError::UnexpectedStaticModifier(
            "sub".to_string(),
            "Calc".to_string()
        ))
    );
}

#[test]
fn test_missing_mul() {
    let registry = registry();
    let validator = SignatureValidator::new(&registry);
    assert_eq!(
        validator.validate("Calc", "mul", "int", &["int", "int"]),
        Err(ValidationError::MethodNotFound(
            "mul".to_string(),
            "Calc".to_string()
        ))
    );
}

#[test]
fn test_float_outside_vocabulary() {
    let registry = registry();
    let validator = SignatureValidator::new(&registry);
    assert_eq!(
        validator.validate("Calc", "add", "float", &["int", "int"]),
        Err(ValidationError::UnsupportedType("float".to_string()))
    );
}

#[test]
fn test_unregistered_class() {
    let registry = registry();
    let validator = SignatureValidator::new(&registry);
    assert_eq!(
        validator.validate("GuessRandom", "guess", "int", &[] as &[&str]),
        Err(ValidationError::ClassNotFound("GuessRandom".to_string()))
    );
}

#[test]
fn test_concurrent_validation_agrees() {
    let registry = registry();
    let validator = SignatureValidator::new(&registry);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    (
                        validator.validate("Calc", "add", "int", &["int", "int"]),
                        validator.validate("Calc", "sub", "int", &["int", "int"]),
                    )
                })
            })
            .collect();

        for handle in handles {
            let (add, sub) = handle.join().unwrap();
            assert_eq!(add, Ok(()));
            assert!(matches!(
                sub,
                Err(ValidationError::UnexpectedStaticModifier(..))
            ));
        }
    });
}

#[test]
fn test_contract_then_instantiate() {
    let registry = registry();
    let validator = SignatureValidator::new(&registry);
    let contract = SubmissionContract::from_json(
        r#"{"className": "Calc", "methods": [{"name": "add", "input": ["int", "int"], "output": "int"}]}"#,
    )
    .unwrap();

    let methods = validator.validate_contract(&contract).unwrap();
    assert_eq!(methods.len(), 1);

    let mut calc = registry.instantiate(&contract.class_name).unwrap();
    assert_eq!(
        calc.call(methods[0].name(), &[Value::Int(2), Value::Int(3)]),
        Ok(Value::Int(5))
    );
}
