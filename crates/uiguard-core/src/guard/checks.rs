//! The individual checks. Each one appends to a [`BuildCheckReport`] and
//! never returns early on a failed file: read failures are isolated to the
//! file that caused them.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde_json::Value;
use walkdir::WalkDir;

use super::{
    report::{BuildCheckReport, CheckKind},
    scan,
};
use crate::{
    config::{compile_pattern, resolve, ConfigFileRule, ConfigFormat, GuardConfig, Heuristic},
    contracts::{ComponentContract, PropertyConstraint},
};

fn display(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

/// Each configured client file must open with the client directive.
pub fn client_directives(root: &Path, config: &GuardConfig, report: &mut BuildCheckReport) {
    let kind = CheckKind::ClientDirectives;
    for relative in &config.client_files {
        match fs::read_to_string(resolve(root, relative)) {
            Ok(content) if scan::has_client_directive(&content) => {
                report.success(kind, format!("\"use client\" directive found in: {relative}"));
            }
            Ok(_) => {
                report.error(kind, format!("\"use client\" directive missing in: {relative}"));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                report.warning(kind, format!("File not found: {relative}"));
            }
            Err(e) => {
                report.error(kind, format!("Error reading {relative}: {e}"));
            }
        }
    }
}

/// Page entry files under `dir`, sorted by path, plus the walk errors met
/// on the way. A missing `dir` yields neither.
pub fn find_pages(dir: &Path, file_name: &str) -> (Vec<PathBuf>, Vec<walkdir::Error>) {
    if !dir.exists() {
        return (Vec::new(), Vec::new());
    }
    let (entries, errors): (Vec<_>, Vec<_>) = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .partition(Result::is_ok);
    let pages = entries
        .into_iter()
        .flatten()
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == file_name)
        .map(walkdir::DirEntry::into_path)
        .collect();
    let errors = errors.into_iter().filter_map(Result::err).collect();
    (pages, errors)
}

/// Pages importing a client-only primitive must carry the client directive.
pub fn page_scan(root: &Path, config: &GuardConfig, report: &mut BuildCheckReport) {
    let kind = CheckKind::PageScan;
    let primitives = match scan::PrimitiveImports::new(&config.client_primitives) {
        Ok(primitives) => primitives,
        Err(e) => {
            report.error(kind, format!("Cannot scan pages: {e}"));
            return;
        }
    };
    let (pages, walk_errors) =
        find_pages(&resolve(root, &config.pages_dir), &config.page_file_name);
    tracing::debug!(count = pages.len(), errors = walk_errors.len(), "scanning page entries");

    for error in &walk_errors {
        let shown = error
            .path()
            .map_or_else(|| config.pages_dir.clone(), |path| display(root, path));
        report.error(kind, format!("Error scanning {shown}: {error}"));
    }

    for page in &pages {
        let shown = display(root, page);
        match fs::read_to_string(page) {
            Ok(content) if primitives.found_in(&content) => {
                if scan::has_client_directive(&content) {
                    report.success(kind, format!("\"use client\" directive found in: {shown}"));
                } else {
                    report.error(
                        kind,
                        format!(
                            "\"use client\" directive missing in: {shown} - required for client components"
                        ),
                    );
                }
            }
            Ok(_) => {}
            Err(e) => report.error(kind, format!("Error analysing {shown}: {e}")),
        }
    }
}

/// The representative page must import every configured `{name, from}`.
pub fn imports(root: &Path, config: &GuardConfig, report: &mut BuildCheckReport) {
    let kind = CheckKind::Imports;
    let page = &config.representative_page;
    let content = fs::read_to_string(resolve(root, page));

    for expected in &config.required_imports {
        match &content {
            Ok(text) if scan::has_named_import(text, &expected.name, &expected.from) => {
                report.success(
                    kind,
                    format!("Import found: {} from {}", expected.name, expected.from),
                );
            }
            Ok(_) => report.error(
                kind,
                format!(
                    "Import missing in {page}: {} from {}",
                    expected.name, expected.from
                ),
            ),
            Err(e) => report.error(
                kind,
                format!("Error checking imports of {} in {page}: {e}", expected.name),
            ),
        }
    }
}

/// Presence and shallow shape of each configured config file.
pub fn config_files(root: &Path, config: &GuardConfig, report: &mut BuildCheckReport) {
    for rule in &config.config_files {
        config_file(root, rule, report);
    }
}

fn config_file(root: &Path, rule: &ConfigFileRule, report: &mut BuildCheckReport) {
    let kind = CheckKind::ConfigFiles;
    let path = resolve(root, &rule.path);
    let name = &rule.path;

    if !path.exists() {
        if rule.required {
            report.error(kind, format!("{name} not found"));
        } else {
            report.warning(kind, format!("{name} not found (optional)"));
        }
        return;
    }
    report.success(kind, format!("{name} found"));

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            report.error(kind, format!("Error reading {name}: {e}"));
            return;
        }
    };

    let manifest = match rule.format {
        ConfigFormat::Text => None,
        ConfigFormat::Json => match serde_json::from_str::<Value>(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                report.error(kind, format!("{name} is not valid JSON: {e}"));
                return;
            }
        },
    };

    for heuristic in &rule.heuristics {
        match heuristic {
            Heuristic::Expect { pattern, label } => match compile_pattern(pattern) {
                Ok(re) if re.is_match(&content) => {}
                Ok(_) => report.warning(kind, format!("{name}: missing {label}")),
                Err(e) => report.error(kind, format!("{name}: {e}")),
            },
            Heuristic::Discourage { all_of, label } => {
                if all_of.iter().all(|needle| content.contains(needle.as_str())) {
                    report.warning(kind, format!("{name}: {label} detected"));
                }
            }
            Heuristic::Dependency { name: dependency } => {
                let declared = manifest.as_ref().map_or_else(
                    || content.contains(&format!("\"{dependency}\"")),
                    |manifest| declares_dependency(manifest, dependency),
                );
                if !declared {
                    report.warning(kind, format!("{name}: dependency {dependency} not declared"));
                }
            }
        }
    }
}

fn declares_dependency(manifest: &Value, dependency: &str) -> bool {
    ["dependencies", "devDependencies"]
        .iter()
        .filter_map(|table| manifest.get(table).and_then(Value::as_object))
        .any(|table| table.contains_key(dependency))
}

/// A contract's source file must mention what the contract declares.
///
/// One success line per contract whose source passes every check.
pub fn component_source(root: &Path, contract: &ComponentContract, report: &mut BuildCheckReport) {
    let kind = CheckKind::ComponentSources;
    let name = &contract.name;
    let file = contract.file.display().to_string();

    let content = match fs::read_to_string(root.join(&contract.file)) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            report.error(kind, format!("{name}: source file not found: {file}"));
            return;
        }
        Err(e) => {
            report.error(kind, format!("{name}: error reading {file}: {e}"));
            return;
        }
    };

    let errors_before = report.error_count;

    contract
        .expected_properties
        .keys()
        .filter(|property| !scan::mentions(&content, property))
        .for_each(|property| {
            report.error(kind, format!("{name}: property '{property}' not found in {file}"));
        });

    contract
        .expected_properties
        .iter()
        .filter_map(|(property, constraint)| match constraint {
            PropertyConstraint::OneOf(values) => Some((property, values)),
            PropertyConstraint::Any | PropertyConstraint::Predicate(_) => None,
        })
        .flat_map(|(property, values)| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(move |value| (property, value))
        })
        .filter(|(_, value)| !scan::has_string_literal(&content, value))
        .for_each(|(property, value)| {
            report.error(
                kind,
                format!("{name}: value \"{value}\" of '{property}' not found in {file}"),
            );
        });

    contract
        .required_functions
        .iter()
        .filter(|function| !scan::declares_function(&content, function))
        .for_each(|function| {
            report.error(kind, format!("{name}: function '{function}' not declared in {file}"));
        });

    contract
        .expected_sub_components
        .iter()
        .filter(|part| !scan::attaches_part(&content, name, part))
        .for_each(|part| {
            report.error(
                kind,
                format!("{name}: sub-component '{part}' is not attached ({name}.{part})"),
            );
        });

    if report.error_count == errors_before {
        report.success(kind, format!("{name}: source matches its contract"));
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::config::ImportExpectation;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok();
        }
        fs::write(path, content).ok();
    }

    fn guard_config() -> GuardConfig {
        GuardConfig {
            client_files: vec!["src/ui/button.tsx".to_string(), "src/ui/card.tsx".to_string()],
            required_imports: vec![ImportExpectation::new("Card", "../../components/ui/card")],
            ..GuardConfig::default()
        }
    }

    #[test]
    fn test_client_directives_outcomes() {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        write(dir.path(), "src/ui/button.tsx", "'use client';\nexport const Button = 1;");
        let mut report = BuildCheckReport::new();

        client_directives(dir.path(), &guard_config(), &mut report);

        assert_eq!(report.success_count, 1);
        assert_eq!(report.warning_count, 1);
        assert_eq!(report.error_count, 0);

        write(dir.path(), "src/ui/card.tsx", "export const Card = 1;");
        let mut report = BuildCheckReport::new();
        client_directives(dir.path(), &guard_config(), &mut report);
        assert_eq!(report.error_count, 1);
    }

    #[test]
    fn test_page_scan_flags_missing_directive() {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        write(dir.path(), "src/app/a/page.tsx", "import { Button } from 'x';");
        write(dir.path(), "src/app/b/page.tsx", "\"use client\"\nimport { Card } from 'y';");
        write(dir.path(), "src/app/c/page.tsx", "export default function Page() {}");
        let mut report = BuildCheckReport::new();

        page_scan(dir.path(), &guard_config(), &mut report);

        assert_eq!(report.error_count, 1);
        assert_eq!(report.success_count, 1);
        assert!(report.lines[0].message.contains("a/page.tsx"));
    }

    #[test]
    fn test_find_pages_is_sorted() {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        write(dir.path(), "z/page.tsx", "");
        write(dir.path(), "a/page.tsx", "");
        write(dir.path(), "a/layout.tsx", "");
        let (pages, errors) = find_pages(dir.path(), "page.tsx");
        assert_eq!(pages.len(), 2);
        assert!(pages[0].ends_with("a/page.tsx"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_missing_pages_dir_is_silent() {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let (pages, errors) = find_pages(&dir.path().join("src/app"), "page.tsx");
        assert!(pages.is_empty());
        assert!(errors.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_pages_subtree_is_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        write(dir.path(), "src/app/open/page.tsx", "export default 1;");
        write(dir.path(), "src/app/locked/page.tsx", "import { Card } from 'x';");
        let locked = dir.path().join("src/app/locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).ok();

        // Permission bits do not bind a privileged user.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).ok();
            return;
        }

        let mut report = BuildCheckReport::new();
        page_scan(dir.path(), &guard_config(), &mut report);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).ok();

        assert_eq!(report.error_count, 1);
        assert!(report.lines[0].message.contains("locked"));
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_client_directive_after_byte_order_mark() {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        write(dir.path(), "src/ui/button.tsx", "\u{feff}\"use client\";\nexport {};");
        write(dir.path(), "src/ui/card.tsx", "\u{feff}'use client';\nexport {};");
        let mut report = BuildCheckReport::new();

        client_directives(dir.path(), &guard_config(), &mut report);

        assert_eq!(report.success_count, 2);
        assert_eq!(report.error_count, 0);
    }

    #[test]
    fn test_component_source_requires_declared_values() {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        write(
            dir.path(),
            "button.tsx",
            "'use client';\ntype Size = \"sm\" | \"md\";\nconst Button = ({ size }) => null;",
        );
        let contract = ComponentContract::new("Button", "button.tsx")
            .with_property("size", PropertyConstraint::one_of(["xs", "sm", "md", "lg"]));
        let mut report = BuildCheckReport::new();

        component_source(dir.path(), &contract, &mut report);

        assert_eq!(report.error_count, 2);
        assert_eq!(report.success_count, 0);
        assert!(report.lines[0].message.contains("\"xs\""));
        assert!(report.lines[1].message.contains("\"lg\""));
    }

    #[test]
    fn test_imports_unreadable_page_errors_per_import() {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let config = GuardConfig::default();
        let mut report = BuildCheckReport::new();
        imports(dir.path(), &config, &mut report);
        assert_eq!(report.error_count, config.required_imports.len());
    }

    #[test]
    fn test_config_file_heuristics_warn() {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        write(dir.path(), "next.config.js", "module.exports = { experimental: { optimizeCss: true } }");
        write(dir.path(), "tsconfig.json", "{}");
        write(dir.path(), "tailwind.config.js", "module.exports = { darkMode: 'class', theme: { screens: {} } }");
        write(
            dir.path(),
            "package.json",
            r#"{ "dependencies": { "tailwindcss": "3" }, "devDependencies": { "postcss": "8" } }"#,
        );
        let mut report = BuildCheckReport::new();

        config_files(dir.path(), &GuardConfig::default(), &mut report);

        assert_eq!(report.error_count, 0);
        assert_eq!(report.success_count, 4);
        // optimizeCss, fontSize, optional postcss config, autoprefixer
        assert_eq!(report.warning_count, 4);
    }

    #[test]
    fn test_malformed_manifest_is_error() {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        write(dir.path(), "package.json", "{ not json");
        let config = GuardConfig {
            config_files: vec![ConfigFileRule {
                path: "package.json".to_string(),
                required: true,
                format: ConfigFormat::Json,
                heuristics: vec![Heuristic::Dependency {
                    name: "postcss".to_string(),
                }],
            }],
            ..GuardConfig::default()
        };
        let mut report = BuildCheckReport::new();
        config_files(dir.path(), &config, &mut report);
        assert_eq!(report.success_count, 1);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.warning_count, 0);
    }

    #[test]
    fn test_component_source_reports_each_gap() {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        write(
            dir.path(),
            "card.tsx",
            "'use client';\nconst Card = ({ tone }) => null;\nCard.Header = Header;\nexport { Card };",
        );
        let contract = ComponentContract::new("Card", "card.tsx")
            .with_sub_components(["Header", "Body", "Footer"])
            .with_functions(["getToneClasses"]);
        let mut report = BuildCheckReport::new();

        component_source(dir.path(), &contract, &mut report);

        assert_eq!(report.error_count, 3);
        assert_eq!(report.success_count, 0);
        assert!(report.lines[0].message.contains("getToneClasses"));
        assert!(report.lines[1].message.contains("Card.Body"));
        assert!(report.lines[2].message.contains("Card.Footer"));
    }

    #[test]
    fn test_component_source_missing_file() {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let contract = ComponentContract::new("Dialog", "dialog.tsx");
        let mut report = BuildCheckReport::new();
        component_source(dir.path(), &contract, &mut report);
        assert_eq!(report.error_count, 1);
        assert!(report.lines[0].message.contains("source file not found"));
    }
}
