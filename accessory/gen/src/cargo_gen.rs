//! Cargo.toml generation for the output package.
//!
//! The generated modules only depend on the `accessory` runtime crate. The
//! runtime is referenced either from the registry or from a local path.

use std::path::{Path, PathBuf};

use crate::errors::GeneratorError;
use crate::output::write_atomic;

/// Where the generated package finds the `accessory` runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeSource {
    /// A registry version requirement, e.g. `"0.1"`.
    Registry(String),
    /// A local checkout of the runtime crate.
    Path(PathBuf),
}

impl Default for RuntimeSource {
    fn default() -> Self {
        Self::Registry(env!("CARGO_PKG_VERSION").to_string())
    }
}

impl RuntimeSource {
    fn dependency(&self) -> String {
        match self {
            Self::Registry(version) => format!("accessory = \"{version}\""),
            Self::Path(path) => format!(
                "accessory = {{ path = \"{}\" }}",
                path.display().to_string().replace('\\', "/")
            ),
        }
    }
}

/// Renders the Cargo.toml of the generated package.
///
/// ## Examples
///
/// ```
/// use accessory_gen::cargo_gen::{RuntimeSource, cargo_toml_content};
///
/// let toml = cargo_toml_content("people", &RuntimeSource::Registry("0.1".to_string()));
/// assert!(toml.contains("name = \"people\""));
/// assert!(toml.contains("accessory = \"0.1\""));
/// ```
pub fn cargo_toml_content(package_name: &str, runtime: &RuntimeSource) -> String {
    format!(
        r#"# This file was automatically generated by accessory-gen. Do not edit manually.

[package]
name = "{package_name}"
version = "0.1.0"
edition = "2024"

[lib]
path = "src/lib.rs"

[dependencies]
{}

[lints.rust]
non_snake_case = "allow"
non_camel_case_types = "allow"
"#,
        runtime.dependency()
    )
}

/// Writes `Cargo.toml` into `package_dir`, or prints it in dry-run mode.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if the file cannot be written.
pub fn write_cargo_toml(
    package_dir: &Path,
    package_name: &str,
    runtime: &RuntimeSource,
    dry_run: bool,
) -> Result<(), GeneratorError> {
    let content = cargo_toml_content(package_name, runtime);
    if dry_run {
        println!("=== Cargo.toml ===\n{}\n", content);
        return Ok(());
    }
    write_atomic(&package_dir.join("Cargo.toml"), &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn cargo_toml_is_valid_toml() {
        let content = cargo_toml_content("people", &RuntimeSource::Path(PathBuf::from("/opt/accessory")));
        let parsed: toml::Value = toml::from_str(&content).unwrap();
        assert_eq!(parsed["package"]["name"].as_str(), Some("people"));
        assert_eq!(
            parsed["dependencies"]["accessory"]["path"].as_str(),
            Some("/opt/accessory")
        );
    }

    #[test]
    fn registry_source_defaults_to_generator_version() {
        let RuntimeSource::Registry(version) = RuntimeSource::default() else {
            panic!("expected a registry source");
        };
        assert_eq!(version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn write_cargo_toml_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        write_cargo_toml(temp_dir.path(), "people", &RuntimeSource::default(), true).unwrap();
        assert!(!temp_dir.path().join("Cargo.toml").exists());

        write_cargo_toml(temp_dir.path(), "people", &RuntimeSource::default(), false).unwrap();
        assert!(temp_dir.path().join("Cargo.toml").exists());
    }
}
