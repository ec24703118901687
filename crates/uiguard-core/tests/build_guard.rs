//! End-to-end build checks over fixture project trees.

// Integration tests have relaxed clippy settings for test ergonomics.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::{fs, path::Path};

use tempfile::TempDir;
use uiguard_core::{
    config::Config,
    guard::{BuildGuard, CheckKind, Verdict},
};

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

const CLIENT_FILES: [&str; 7] = [
    "src/components/ui/button.tsx",
    "src/components/ui/card.tsx",
    "src/app/appointments/page.tsx",
    "src/utils/logger.ts",
    "src/utils/build-logger.ts",
    "src/utils/component-validator.ts",
    "src/hooks/useComponentLogger.ts",
];

/// A project laid out the way the default configuration expects.
fn healthy_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    for file in CLIENT_FILES {
        write(root, file, "\"use client\";\n\nexport {};\n");
    }
    write(
        root,
        "src/app/appointments/page.tsx",
        "\"use client\";\nimport { Card } from \"../../components/ui/card\";\nimport { Button } from \"../../components/ui/button\";\n",
    );
    write(root, "next.config.js", "module.exports = { reactStrictMode: true };\n");
    write(root, "tsconfig.json", "{ \"compilerOptions\": {} }\n");
    write(
        root,
        "tailwind.config.js",
        "module.exports = { darkMode: 'class', theme: { screens: {}, fontSize: {} } };\n",
    );
    write(root, "postcss.config.js", "module.exports = { plugins: { autoprefixer: {} } };\n");
    write(
        root,
        "package.json",
        r#"{ "devDependencies": { "tailwindcss": "3", "postcss": "8", "autoprefixer": "10" } }"#,
    );
    dir
}

fn guard(root: &Path) -> BuildGuard {
    BuildGuard::new(root, Config::default().guard)
}

#[test]
fn test_healthy_project_passes_cleanly() {
    let dir = healthy_project();
    let report = guard(dir.path()).check();

    assert_eq!(report.error_count, 0, "{:#?}", report.lines);
    assert_eq!(report.warning_count, 0, "{:#?}", report.lines);
    // 7 directives, 1 page, 2 imports, 5 config files
    assert_eq!(report.success_count, 15);
    assert_eq!(report.verdict(), Verdict::Pass);
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn test_missing_client_file_is_only_a_warning() {
    let dir = healthy_project();
    fs::remove_file(dir.path().join("src/utils/logger.ts")).unwrap();

    let report = guard(dir.path()).check();

    assert_eq!(report.warning_count, 1);
    assert_eq!(report.error_count, 0);
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn test_page_importing_card_without_directive_fails() {
    let dir = healthy_project();
    write(
        dir.path(),
        "src/app/clients/page.tsx",
        "import {\n  Card,\n} from '../../components/ui/card';\nexport default function Page() {}\n",
    );

    let report = guard(dir.path()).check();

    let errors: Vec<_> = report
        .lines_for(CheckKind::PageScan)
        .filter(|line| line.message.contains("missing"))
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("clients/page.tsx"));
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn test_missing_required_config_fails() {
    let dir = healthy_project();
    fs::remove_file(dir.path().join("tsconfig.json")).unwrap();

    let report = guard(dir.path()).check();

    assert_eq!(report.error_count, 1);
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn test_runs_are_idempotent() {
    let dir = healthy_project();
    write(dir.path(), "src/app/reports/page.tsx", "import { Dialog } from './dialog';");
    fs::remove_file(dir.path().join("postcss.config.js")).unwrap();
    let guard = guard(dir.path());

    let first = guard.check();
    let second = guard.check();

    assert_eq!(first, second);
    assert_eq!(first.error_count, 1);
    assert_eq!(first.warning_count, 1);
}
