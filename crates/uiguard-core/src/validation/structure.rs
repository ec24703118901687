//! Structural presence checks.

use serde_json::json;

use crate::{
    component::ComponentShape,
    contracts::ComponentContract,
    logger::{ContextLogger, Logger},
    validation::ValidationResult,
};

/// Checks that compound components, external dependencies and imports are
/// present. Every missing item is reported; nothing stops at the first one.
#[derive(Debug, Clone)]
pub struct StructuralValidator {
    logger: ContextLogger,
}

impl StructuralValidator {
    pub fn new(logger: &Logger) -> Self {
        Self {
            logger: logger.for_context("Structure"),
        }
    }

    /// Every name in `expected` must be an attached part of `component`.
    ///
    /// Errors follow the order of `expected`. A missing component yields a
    /// single error.
    pub fn validate_structure<S: AsRef<str>>(
        &self,
        component: Option<&dyn ComponentShape>,
        expected: &[S],
        component_name: &str,
    ) -> ValidationResult {
        let Some(component) = component else {
            let message = format!("Component {component_name} is undefined");
            self.logger.error(message.clone(), None);
            return ValidationResult::failure(message);
        };

        let result = expected
            .iter()
            .map(AsRef::as_ref)
            .filter(|part| !component.has_part(part))
            .fold(ValidationResult::ok(), |mut result, part| {
                let message = format!(
                    "Component {component_name} is missing expected sub-component '{part}'"
                );
                self.logger.error(
                    message.clone(),
                    Some(json!({ "component": component_name, "part": part })),
                );
                result.push_error(message);
                result
            });

        if result.valid {
            self.logger.debug(
                format!("Component {component_name} exposes all {} sub-components", expected.len()),
                None,
            );
        }
        result
    }

    /// Structure check driven by a registered contract.
    pub fn validate_against_contract(
        &self,
        component: Option<&dyn ComponentShape>,
        contract: &ComponentContract,
    ) -> ValidationResult {
        self.validate_structure(component, &contract.expected_sub_components, &contract.name)
    }

    /// Presence check for something the UI pulls in from outside.
    pub fn validate_external_dependency<T>(
        &self,
        dependency: Option<&T>,
        name: &str,
    ) -> ValidationResult {
        if dependency.is_some() {
            return ValidationResult::ok();
        }
        let message = format!("External dependency {name} is not available");
        self.logger.error(message.clone(), None);
        ValidationResult::failure(message)
    }

    /// Every `(name, resolved)` pair must be resolved.
    pub fn validate_imports<'a, I>(&self, imports: I, source_file: &str) -> ValidationResult
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        imports
            .into_iter()
            .filter(|(_, resolved)| !resolved)
            .fold(ValidationResult::ok(), |mut result, (name, _)| {
                let message = format!("Import {name} in {source_file} could not be resolved");
                self.logger.error(
                    message.clone(),
                    Some(json!({ "import": name, "file": source_file })),
                );
                result.push_error(message);
                result
            })
    }
}
