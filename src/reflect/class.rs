//! Class and method descriptors.
//!
//! A `ClassDescriptor` is the introspection record a submission publishes
//! about itself: every method it declares, with parameter and return
//! descriptors and modifiers. Lookup is exact-type; there is no overload
//! resolution by assignability.

use crate::reflect::types::TypeDescriptor;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Private,
}

/// Whether a method needs a receiver object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Receiver {
    Instance,
    Static,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    pub parameter_types: Vec<TypeDescriptor>,
    pub return_type: TypeDescriptor,
    pub visibility: Visibility,
    pub receiver: Receiver,
}

impl MethodDescriptor {
    /// Public instance method with no parameters returning void
    pub fn public(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameter_types: Vec::new(),
            return_type: TypeDescriptor::Void,
            visibility: Visibility::Public,
            receiver: Receiver::Instance,
        }
    }

    pub fn params<I>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        self.parameter_types = params.into_iter().collect();
        self
    }

    pub fn returns(mut self, return_type: TypeDescriptor) -> Self {
        self.return_type = return_type;
        self
    }

    pub fn as_static(mut self) -> Self {
        self.receiver = Receiver::Static;
        self
    }

    pub fn as_private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn is_static(&self) -> bool {
        self.receiver == Receiver::Static
    }

    /// Name and parameter list, e.g. `add(int, int)`
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .parameter_types
            .iter()
            .map(|p| p.to_string())
            .collect();
        format!("{}({})", self.name, params.join(", "))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub name: String,
    pub methods: Vec<MethodDescriptor>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// Find a public method by name and exact parameter descriptors.
    ///
    /// Static methods are returned too; callers decide whether a static
    /// receiver is acceptable.
    pub fn get_method(
        &self,
        name: &str,
        parameter_types: &[TypeDescriptor],
    ) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| {
            m.is_public() && m.name == name && m.parameter_types.as_slice() == parameter_types
        })
    }

    /// First method that shares a name and parameter list with an earlier one
    pub fn duplicate_signature(&self) -> Option<&MethodDescriptor> {
        self.methods.iter().enumerate().find_map(|(i, m)| {
            self.methods[..i]
                .iter()
                .any(|earlier| {
                    earlier.name == m.name && earlier.parameter_types == m.parameter_types
                })
                .then_some(m)
        })
    }
}
