//! Component contracts
//!
//! A contract is the declared shape of a UI component: which sub-components
//! it exposes, which properties it accepts (and with which values), whether
//! it runs on the client, and which other components it imports.

mod registry;

use std::{fmt, path::PathBuf, sync::Arc};

use im::OrdMap;
use itertools::Itertools;
use serde_json::Value;

pub use registry::{BuildError, ContractRegistry};

use crate::config::ContractConfig;

/// Predicate over a property value.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Constraint on a single declared property.
#[derive(Clone)]
pub enum PropertyConstraint {
    /// Declared, any value accepted
    Any,
    /// Value must equal one of these
    OneOf(Vec<Value>),
    /// Value must satisfy the predicate
    Predicate(Predicate),
}

impl fmt::Debug for PropertyConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::OneOf(values) => f.debug_tuple("OneOf").field(values).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl PropertyConstraint {
    pub fn one_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::OneOf(values.into_iter().map(Into::into).collect())
    }

    pub fn predicate(check: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(check))
    }

    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::OneOf(values) => values.contains(value),
            Self::Predicate(check) => check(value),
        }
    }
}

/// Declared shape of one component. Owned by the [`ContractRegistry`].
#[derive(Debug, Clone)]
pub struct ComponentContract {
    pub name: String,
    pub is_client_boundary: bool,
    /// Ordered, without duplicates
    pub expected_sub_components: Vec<String>,
    pub expected_properties: OrdMap<String, PropertyConstraint>,
    /// Names of components this one depends on
    pub imports: Vec<String>,
    /// Helper functions the source file must declare
    pub required_functions: Vec<String>,
    /// Source path, relative to the project root
    pub file: PathBuf,
}

impl ComponentContract {
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            is_client_boundary: false,
            expected_sub_components: Vec::new(),
            expected_properties: OrdMap::new(),
            imports: Vec::new(),
            required_functions: Vec::new(),
            file: file.into(),
        }
    }

    pub fn client(mut self, is_client_boundary: bool) -> Self {
        self.is_client_boundary = is_client_boundary;
        self
    }

    pub fn with_sub_components<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_sub_components = self
            .expected_sub_components
            .into_iter()
            .chain(names.into_iter().map(Into::into))
            .unique()
            .collect();
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, constraint: PropertyConstraint) -> Self {
        self.expected_properties.insert(name.into(), constraint);
        self
    }

    pub fn with_imports<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_functions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_functions
            .extend(names.into_iter().map(Into::into));
        self
    }
}

impl From<&ContractConfig> for ComponentContract {
    fn from(config: &ContractConfig) -> Self {
        let contract = Self::new(config.name.clone(), config.file.clone())
            .client(config.client)
            .with_sub_components(config.sub_components.iter().cloned())
            .with_imports(config.imports.iter().cloned())
            .with_functions(config.functions.iter().cloned());
        config
            .properties
            .iter()
            .fold(contract, |contract, (name, values)| {
                let constraint = if values.is_empty() {
                    PropertyConstraint::Any
                } else {
                    PropertyConstraint::OneOf(values.clone())
                };
                contract.with_property(name.clone(), constraint)
            })
    }
}
