//! Check command - validate configuration and content

use std::{fs, path::Path};

use color_eyre::eyre::{Result, bail};
use folio_collections::{CodeGenerator, ContentLoader, ContentRegistry, Entry};
use folio_core::Config;

use super::load_config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates configuration, every entry and the generated registry module.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    match load_config(config_path) {
        Ok(config) => {
            println!("  ✓ Configuration valid");
            check_content(&config, &mut result);
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e:#}"));
            println!("  ✗ Configuration invalid: {e:#}");
        }
    }

    // Print summary
    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    // Determine exit status
    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Load every collection and record what is wrong with it.
pub fn check_content(config: &Config, result: &mut ValidationResult) {
    let content_dir = config.content_dir();
    if !content_dir.is_dir() {
        result.add_warning(format!(
            "Content directory {} does not exist",
            content_dir.display()
        ));
    }

    println!("\nChecking entries...");
    let registry = match ContentLoader::new(config.clone()).load_unchecked() {
        Ok(registry) => registry,
        Err(e) => {
            result.add_error(e.to_string());
            return;
        }
    };

    for issue in registry.validate() {
        result.add_error(issue.to_string());
    }
    check_frontmatter(&registry, result);

    for collection in registry.collections() {
        if !collection.is_configured() {
            result.add_warning(format!(
                "Collection `{}` has no configuration and no schema",
                collection.name()
            ));
        }
        println!(
            "  ✓ {} ({} {})",
            collection.name(),
            collection.len(),
            if collection.len() == 1 { "entry" } else { "entries" }
        );
    }

    if !result.has_errors() {
        println!("\nChecking registry module...");
        check_registry_module(config, &registry, result);
    }
}

/// Content entries whose frontmatter does not fit the well-known fields.
///
/// The collection schema decides validity, so these are only warnings.
fn check_frontmatter(registry: &ContentRegistry, result: &mut ValidationResult) {
    let entries = registry
        .collections()
        .flat_map(|c| c.entries())
        .filter_map(Entry::as_content);

    for entry in entries {
        if let Err(e) = entry.frontmatter() {
            result.add_warning(format!("{}: {e}", entry.source_path.display()));
        }
    }
}

/// Warn when the generated module is missing or out of date.
fn check_registry_module(
    config: &Config,
    registry: &ContentRegistry,
    result: &mut ValidationResult,
) {
    let output = config.codegen_output();

    let expected = match CodeGenerator::new(&config.codegen.crate_path).generate(registry) {
        Ok(source) => source,
        Err(e) => {
            result.add_error(format!("Registry generation failed: {e}"));
            return;
        }
    };

    match fs::read_to_string(&output) {
        Ok(current) if current == expected => {
            println!("  ✓ {} is up to date", output.display());
        }
        Ok(_) => result.add_warning(format!(
            "{} is out of date, run `folio sync`",
            output.display()
        )),
        Err(_) => result.add_warning(format!(
            "{} does not exist, run `folio sync`",
            output.display()
        )),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn site(files: &[(&str, &str)]) -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        for (relative, content) in files {
            let path = dir.path().join("src/content").join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let config = Config::default().with_root(dir.path());
        (dir, config)
    }

    #[test]
    fn test_valid_site_warns_about_missing_module() {
        let (_dir, config) = site(&[("docs/welcome.md", "---\ntitle: Welcome\n---\n")]);
        let mut result = ValidationResult::default();
        check_content(&config, &mut result);

        assert!(!result.has_errors());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("run `folio sync`"));
    }

    #[test]
    fn test_reports_schema_violations() {
        let (_dir, config) = site(&[
            ("docs/welcome.md", "---\ntitle: Welcome\n---\n"),
            ("docs/broken.md", "---\ntitle: [not, a, string]\n---\n"),
        ]);
        let mut result = ValidationResult::default();
        check_content(&config, &mut result);

        assert!(result.has_errors());
        assert!(result.errors.iter().any(|e| e.contains("broken.md")));
    }

    #[test]
    fn test_odd_frontmatter_field_only_warns() {
        let (_dir, config) = site(&[(
            "docs/welcome.md",
            "---\ntitle: Welcome\ntags: guide\norder: first\n---\n",
        )]);
        super::super::sync::generate(&config, &config.codegen_output()).unwrap();

        let mut result = ValidationResult::default();
        check_content(&config, &mut result);

        assert!(!result.has_errors());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("welcome.md"));
    }

    #[test]
    fn test_unconfigured_collection_warns() {
        let (_dir, config) = site(&[("blog/first.md", "# First\n")]);
        let mut result = ValidationResult::default();
        check_content(&config, &mut result);

        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.contains("`blog` has no configuration"))
        );
    }

    #[test]
    fn test_up_to_date_module_passes() {
        let (_dir, config) = site(&[("docs/welcome.md", "---\ntitle: Welcome\n---\n")]);
        super::super::sync::generate(&config, &config.codegen_output()).unwrap();

        let mut result = ValidationResult::default();
        check_content(&config, &mut result);
        assert!(!result.has_errors());
        assert!(!result.has_warnings());
    }
}
