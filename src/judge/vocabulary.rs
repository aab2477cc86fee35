//! Supported type vocabulary.
//!
//! The closed set of type names a contract may use for method inputs and
//! outputs, each mapped to exactly one runtime descriptor. Built once on
//! first access and read-only afterwards.

use crate::reflect::types::TypeDescriptor;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Vocabulary entries in declaration order
const ENTRIES: [&str; 7] = ["void", "int", "double", "string", "int[]", "double[]", "string[]"];

#[derive(Debug)]
pub struct SupportedTypes {
    types: HashMap<&'static str, TypeDescriptor>,
}

impl SupportedTypes {
    fn build() -> Self {
        let mut types = HashMap::with_capacity(ENTRIES.len());
        types.insert("void", TypeDescriptor::Void);
        types.insert("int", TypeDescriptor::Int);
        types.insert("double", TypeDescriptor::Double);
        types.insert("string", TypeDescriptor::String);
        types.insert("int[]", TypeDescriptor::array_of(TypeDescriptor::Int));
        types.insert("double[]", TypeDescriptor::array_of(TypeDescriptor::Double));
        types.insert("string[]", TypeDescriptor::array_of(TypeDescriptor::String));
        Self { types }
    }

    /// Descriptor for a vocabulary name; names are case-sensitive
    pub fn lookup(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn names(&self) -> &'static [&'static str] {
        &ENTRIES
    }
}

static SUPPORTED_TYPES: OnceLock<SupportedTypes> = OnceLock::new();

/// Process-wide vocabulary
pub fn supported_types() -> &'static SupportedTypes {
    SUPPORTED_TYPES.get_or_init(SupportedTypes::build)
}
