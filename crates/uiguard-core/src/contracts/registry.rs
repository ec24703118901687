//! Registry of component contracts.

use chrono::{DateTime, Utc};
use im::OrdMap;
use serde::Serialize;
use serde_json::json;

use super::ComponentContract;
use crate::{
    component::ComponentShape,
    logger::{ContextLogger, Logger},
    validation::ValidationResult,
};

/// A registry-level failure, kept in the registry's ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildError {
    pub component: String,
    pub file: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Single source of truth for component contracts.
///
/// Contracts are keyed by name; the last registration under a name wins.
/// Whole-registry checks walk contracts in name order so reports are stable.
#[derive(Debug)]
pub struct ContractRegistry {
    contracts: OrdMap<String, ComponentContract>,
    logger: ContextLogger,
    build_errors: Vec<BuildError>,
}

impl ContractRegistry {
    pub fn new(logger: &Logger) -> Self {
        Self {
            contracts: OrdMap::new(),
            logger: logger.for_context("Contracts"),
            build_errors: Vec::new(),
        }
    }

    /// Store `contract` under its name, replacing any earlier one.
    ///
    /// A missing component is logged and recorded, and nothing is stored.
    /// Returns whether the contract was stored.
    pub fn register(
        &mut self,
        component: Option<&dyn ComponentShape>,
        contract: ComponentContract,
    ) -> bool {
        let Some(component) = component else {
            self.record(
                &contract,
                "Component registration failed: component is undefined".to_string(),
            );
            return false;
        };

        if contract.is_client_boundary && !component.declares_client_directive() {
            self.record(
                &contract,
                "Client component missing 'use client' directive".to_string(),
            );
        }

        if self.contracts.contains_key(&contract.name) {
            self.logger.debug(
                format!("Replacing contract for {}", contract.name),
                None,
            );
        }
        self.contracts.insert(contract.name.clone(), contract);
        true
    }

    pub fn lookup(&self, name: &str) -> Option<&ComponentContract> {
        self.contracts.get(name)
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Contracts in name order.
    pub fn contracts(&self) -> impl Iterator<Item = &ComponentContract> {
        self.contracts.values()
    }

    /// Every declared import must name a registered contract.
    pub fn validate_cross_references(&mut self) -> ValidationResult {
        let contracts = &self.contracts;
        let unresolved: Vec<(ComponentContract, String)> = contracts
            .values()
            .flat_map(move |contract| {
                contract
                    .imports
                    .iter()
                    .filter(move |import| !contracts.contains_key(*import))
                    .map(move |import| (contract.clone(), import.clone()))
            })
            .collect();

        unresolved
            .into_iter()
            .fold(ValidationResult::ok(), |mut result, (contract, import)| {
                let message = format!("Component depends on unregistered component: {import}");
                result.push_error(format!("{}: {message}", contract.name));
                self.record(&contract, message);
                result
            })
    }

    /// Components outside the client boundary must not import components
    /// inside it.
    pub fn validate_client_server_boundary(&mut self) -> ValidationResult {
        let contracts = &self.contracts;
        let violations: Vec<(ComponentContract, String)> = contracts
            .values()
            .filter(|contract| !contract.is_client_boundary)
            .flat_map(move |contract| {
                contract
                    .imports
                    .iter()
                    .filter(move |import| {
                        contracts
                            .get(*import)
                            .is_some_and(|imported| imported.is_client_boundary)
                    })
                    .map(move |import| (contract.clone(), import.clone()))
            })
            .collect();

        violations
            .into_iter()
            .fold(ValidationResult::ok(), |mut result, (contract, import)| {
                let message = format!("Server component imports client component: {import}");
                result.push_error(format!("{}: {message}", contract.name));
                self.record(&contract, message);
                result
            })
    }

    /// Cross-reference check followed by the boundary check.
    pub fn run_all_validations(&mut self) -> ValidationResult {
        let references = self.validate_cross_references();
        let boundary = self.validate_client_server_boundary();
        let result = references.merge(boundary);
        if result.valid {
            self.logger.info(
                format!("All {} component contracts are consistent", self.contracts.len()),
                None,
            );
        }
        result
    }

    /// Copy of the build-error ledger, oldest first.
    pub fn build_errors(&self) -> Vec<BuildError> {
        self.build_errors.clone()
    }

    pub fn clear_build_errors(&mut self) {
        self.build_errors.clear();
    }

    fn record(&mut self, contract: &ComponentContract, message: String) {
        let error = BuildError {
            component: contract.name.clone(),
            file: contract.file.display().to_string(),
            message,
            timestamp: Utc::now(),
        };
        self.logger.error(
            format!(
                "BUILD ERROR [{}] in {}: {}",
                error.component, error.file, error.message
            ),
            Some(json!({ "component": &error.component, "file": &error.file })),
        );
        self.build_errors.push(error);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        component::CompoundComponent,
        contracts::PropertyConstraint,
        logger::{Level, LoggerOptions, MemorySink},
    };

    fn setup() -> (ContractRegistry, Logger, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::new(LoggerOptions::default(), sink.clone());
        (ContractRegistry::new(&logger), logger, sink)
    }

    fn shape(name: &str, client: bool) -> CompoundComponent {
        CompoundComponent::builder(name).client(client).build()
    }

    #[test]
    fn test_register_and_lookup() {
        let (mut registry, _, _) = setup();
        let button = shape("Button", true);
        assert!(registry.register(
            Some(&button),
            ComponentContract::new("Button", "button.tsx").client(true)
        ));
        assert!(registry.lookup("Button").is_some());
        assert!(registry.lookup("Missing").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_without_component_is_a_logged_noop() {
        let (mut registry, _, sink) = setup();
        let stored = registry.register(None, ComponentContract::new("Ghost", "ghost.tsx"));
        assert!(!stored);
        assert!(registry.is_empty());
        assert_eq!(registry.build_errors().len(), 1);
        assert_eq!(sink.lines_at(Level::Error).len(), 1);
        assert!(sink.lines_at(Level::Error)[0].contains("Ghost"));
    }

    #[test]
    fn test_second_registration_replaces_first() {
        let (mut registry, _, _) = setup();
        let card = shape("Card", false);
        registry.register(
            Some(&card),
            ComponentContract::new("Card", "old.tsx")
                .with_sub_components(["Header", "Body"])
                .with_property("tone", PropertyConstraint::Any),
        );
        registry.register(
            Some(&card),
            ComponentContract::new("Card", "new.tsx").with_sub_components(["Footer"]),
        );

        let Some(contract) = registry.lookup("Card") else {
            panic!("Card should be registered");
        };
        assert_eq!(contract.file.to_str(), Some("new.tsx"));
        assert_eq!(contract.expected_sub_components, vec!["Footer"]);
        assert!(contract.expected_properties.is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_client_contract_without_directive_is_recorded() {
        let (mut registry, _, _) = setup();
        let button = shape("Button", false);
        assert!(registry.register(
            Some(&button),
            ComponentContract::new("Button", "button.tsx").client(true)
        ));
        let errors = registry.build_errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("use client"));
    }

    #[test]
    fn test_unresolved_import_is_reported_once() {
        let (mut registry, _, _) = setup();
        let a = shape("A", false);
        registry.register(
            Some(&a),
            ComponentContract::new("A", "a.tsx").with_imports(["Z"]),
        );

        let result = registry.validate_cross_references();
        assert!(!result.valid);
        assert_eq!(result.error_count(), 1);
        assert!(result.errors[0].contains('Z'));
    }

    #[test]
    fn test_resolved_imports_pass() {
        let (mut registry, _, _) = setup();
        let a = shape("A", false);
        let b = shape("B", false);
        registry.register(Some(&a), ComponentContract::new("A", "a.tsx").with_imports(["B"]));
        registry.register(Some(&b), ComponentContract::new("B", "b.tsx"));
        assert!(registry.validate_cross_references().valid);
    }

    #[test]
    fn test_server_importing_client_is_reported() {
        let (mut registry, _, _) = setup();
        let page = shape("Page", false);
        let button = shape("Button", true);
        registry.register(
            Some(&page),
            ComponentContract::new("Page", "page.tsx").with_imports(["Button"]),
        );
        registry.register(
            Some(&button),
            ComponentContract::new("Button", "button.tsx").client(true),
        );

        let result = registry.validate_client_server_boundary();
        assert_eq!(result.error_count(), 1);
        assert!(result.errors[0].contains("Server component imports client component: Button"));
    }

    #[test]
    fn test_client_importing_client_is_allowed() {
        let (mut registry, _, _) = setup();
        let form = shape("Form", true);
        let button = shape("Button", true);
        registry.register(
            Some(&form),
            ComponentContract::new("Form", "form.tsx")
                .client(true)
                .with_imports(["Button"]),
        );
        registry.register(
            Some(&button),
            ComponentContract::new("Button", "button.tsx").client(true),
        );
        assert!(registry.validate_client_server_boundary().valid);
    }

    #[test]
    fn test_run_all_merges_and_ledger_clears() {
        let (mut registry, _, _) = setup();
        let page = shape("Page", false);
        let button = shape("Button", true);
        registry.register(
            Some(&page),
            ComponentContract::new("Page", "page.tsx").with_imports(["Button", "Missing"]),
        );
        registry.register(
            Some(&button),
            ComponentContract::new("Button", "button.tsx").client(true),
        );

        let result = registry.run_all_validations();
        assert_eq!(result.error_count(), 2);
        assert!(result.errors[0].contains("Missing"));
        assert!(result.errors[1].contains("Button"));
        assert_eq!(registry.build_errors().len(), 2);

        registry.clear_build_errors();
        assert!(registry.build_errors().is_empty());
    }
}
