//! Property validation for mounted component instances.
//!
//! A [`PropValidator`] belongs to one mounted instance. The first render
//! checks the received properties and logs one warning per violation; later
//! renders stay quiet until [`PropValidator::remount`]. Every render hands
//! back the effective property bag with rejected values replaced.

use std::fmt;

use itertools::Itertools;
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    component::Props,
    contracts::{ComponentContract, Predicate, PropertyConstraint},
    logger::{ContextLogger, Logger},
};

/// Rule for one property.
#[derive(Clone)]
pub struct PropRule {
    pub property: String,
    pub valid_values: Option<Vec<Value>>,
    pub validator: Option<Predicate>,
    pub message: Option<String>,
    pub fallback: Option<Value>,
}

impl fmt::Debug for PropRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropRule")
            .field("property", &self.property)
            .field("valid_values", &self.valid_values)
            .field("validator", &self.validator.as_ref().map(|_| ".."))
            .field("message", &self.message)
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl PropRule {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            valid_values: None,
            validator: None,
            message: None,
            fallback: None,
        }
    }

    pub fn one_of<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.valid_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn check(mut self, validator: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.validator = Some(std::sync::Arc::new(validator));
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn fallback(mut self, value: impl Into<Value>) -> Self {
        self.fallback = Some(value.into());
        self
    }

    /// Rule derived from a contract's declared constraint. `Any` yields
    /// `None`: there is nothing to check.
    fn from_constraint(property: &str, constraint: &PropertyConstraint) -> Option<Self> {
        match constraint {
            PropertyConstraint::Any => None,
            PropertyConstraint::OneOf(values) => {
                Some(Self::new(property).one_of(values.iter().cloned()))
            }
            PropertyConstraint::Predicate(check) => Some(Self {
                validator: Some(check.clone()),
                ..Self::new(property)
            }),
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        let listed = self
            .valid_values
            .as_ref()
            .map_or(true, |values| values.contains(value));
        let checked = self.validator.as_ref().map_or(true, |check| check(value));
        listed && checked
    }

    fn describe(&self, value: &Value) -> String {
        self.message.clone().unwrap_or_else(|| {
            let expected = self
                .valid_values
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(display_value)
                .join(", ");
            format!(
                "Invalid value for {}: {}. Expected one of: {expected}",
                self.property,
                display_value(value)
            )
        })
    }

    /// Value to use instead of a rejected one, `None` to drop the property.
    fn substitute(&self) -> Option<Value> {
        self.fallback.clone().or_else(|| {
            self.valid_values
                .as_ref()
                .and_then(|values| values.first().cloned())
        })
    }
}

/// One rejected property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropViolation {
    pub property: String,
    pub value: Value,
    pub message: String,
}

/// Render-time property guard for one mounted instance.
#[derive(Debug)]
pub struct PropValidator {
    component: String,
    rules: Vec<PropRule>,
    logger: ContextLogger,
    validated: bool,
}

impl PropValidator {
    pub fn new(component: impl Into<String>, rules: Vec<PropRule>, logger: &Logger) -> Self {
        Self {
            component: component.into(),
            rules,
            logger: logger.for_context("UI"),
            validated: false,
        }
    }

    /// Validator checking the properties a contract constrains.
    pub fn from_contract(contract: &ComponentContract, logger: &Logger) -> Self {
        let rules = contract
            .expected_properties
            .iter()
            .filter_map(|(property, constraint)| PropRule::from_constraint(property, constraint))
            .collect();
        Self::new(contract.name.clone(), rules, logger)
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub const fn has_validated(&self) -> bool {
        self.validated
    }

    /// Violations in rule order. Missing and `null` properties are skipped.
    pub fn check(&self, props: &Props) -> Vec<PropViolation> {
        self.rules
            .iter()
            .filter_map(|rule| {
                props
                    .get(&rule.property)
                    .filter(|value| !value.is_null())
                    .filter(|value| !rule.accepts(value))
                    .map(|value| PropViolation {
                        property: rule.property.clone(),
                        value: value.clone(),
                        message: rule.describe(value),
                    })
            })
            .collect()
    }

    /// Effective properties for this render.
    ///
    /// Logging happens on the first render after mount only.
    pub fn render(&mut self, props: &Props) -> Props {
        let violations = self.check(props);

        if !self.validated {
            self.validated = true;
            self.logger
                .debug(format!("Component rendered: {}", self.component), None);
            violations.iter().for_each(|violation| {
                self.logger.warn(
                    format!("{}: {}", self.component, violation.message),
                    Some(json!({
                        "property": &violation.property,
                        "value": &violation.value,
                    })),
                );
            });
        }

        violations
            .iter()
            .fold(props.clone(), |mut effective, violation| {
                let replacement = self
                    .rules
                    .iter()
                    .find(|rule| rule.property == violation.property)
                    .and_then(PropRule::substitute);
                match replacement {
                    Some(value) => {
                        effective.insert(violation.property.clone(), value);
                    }
                    None => {
                        effective.remove(&violation.property);
                    }
                }
                effective
            })
    }

    /// Treat the next render as a fresh mount.
    pub fn remount(&mut self) {
        self.validated = false;
    }

    /// Debug-level telemetry for a UI event.
    pub fn log_event(&self, event: &str, details: Option<Value>) {
        self.logger
            .debug(format!("{} event: {event}", self.component), details);
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
