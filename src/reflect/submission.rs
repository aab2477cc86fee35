use crate::config::types::SubmissionError;
use crate::judge::statistics::Profiled;
use crate::reflect::class::ClassDescriptor;
use crate::reflect::types::Value;

/// Contract every submission object implements.
///
/// `call` dispatches by method name; argument values arrive in declared
/// order. Implementations return `SubmissionError::NoSuchMethod` for names
/// they do not handle.
pub trait Submission: Profiled + Send {
    fn class_name(&self) -> &str;
    fn call(&mut self, method: &str, args: &[Value]) -> Result<Value, SubmissionError>;
}

/// Static side of a submission type: its descriptor and constructor
pub trait SubmissionClass: Submission + Sized + 'static {
    fn descriptor() -> ClassDescriptor;
    fn instantiate() -> Self;
}

/// Fetch argument `index` as an int
pub fn int_arg(args: &[Value], index: usize) -> Result<i32, SubmissionError> {
    args.get(index)
        .and_then(Value::as_int)
        .ok_or_else(|| SubmissionError::invalid_argument(index, "int"))
}

pub fn double_arg(args: &[Value], index: usize) -> Result<f64, SubmissionError> {
    args.get(index)
        .and_then(Value::as_double)
        .ok_or_else(|| SubmissionError::invalid_argument(index, "double"))
}

pub fn str_arg(args: &[Value], index: usize) -> Result<&str, SubmissionError> {
    args.get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| SubmissionError::invalid_argument(index, "string"))
}

pub fn int_array_arg(args: &[Value], index: usize) -> Result<&[i32], SubmissionError> {
    args.get(index)
        .and_then(Value::as_int_array)
        .ok_or_else(|| SubmissionError::invalid_argument(index, "int[]"))
}

pub fn double_array_arg(args: &[Value], index: usize) -> Result<&[f64], SubmissionError> {
    args.get(index)
        .and_then(Value::as_double_array)
        .ok_or_else(|| SubmissionError::invalid_argument(index, "double[]"))
}

pub fn string_array_arg(args: &[Value], index: usize) -> Result<&[String], SubmissionError> {
    args.get(index)
        .and_then(Value::as_string_array)
        .ok_or_else(|| SubmissionError::invalid_argument(index, "string[]"))
}
