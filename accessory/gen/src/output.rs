//! Output assembly and file writing for generated code.
//!
//! This module handles the final phase of code generation: assembling all generated
//! pieces into complete Rust files, validating the output, formatting it, and
//! writing it to disk atomically.
//!
//! ## Output Structure
//!
//! The generator produces one module file per struct:
//! ```text
//! src/
//! ├── lib.rs            # Module declarations and re-exports
//! ├── person.rs         # Person struct and accessors
//! └── restrictions.rs   # Restriction helper types (when the model has any)
//! ```
//!
//! ## Safety Guarantees
//!
//! - **Validation**: All generated code is validated with `syn` before writing
//! - **Formatting**: Output is formatted with `prettyplease` for consistent style
//! - **Atomic writes**: Uses temp file + rename pattern to prevent partial writes

use std::fs;
use std::path::Path;

use accessory_define::Restriction;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use tracing::{debug, info};

use crate::codegen::{ModuleDocBuilder, generate_restrictions, generate_struct};
use crate::errors::GeneratorError;
use crate::ir::StructPlan;
use crate::naming::{NameContext, NameResolver, type_name};
use crate::options::GeneratorOptions;

const RESTRICTIONS_MODULE: &str = "restrictions";

/// A formatted file ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name relative to the output directory.
    pub name: String,
    pub content: String,
}

/// A struct module and the type it re-exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEntry {
    pub module: String,
    pub type_name: String,
}

/// Assigns a unique module name and type name to every plan, in plan order.
///
/// Struct names that map to the same module or type name get `_N`
/// suffixes, so `lib.rs` never re-exports two types under one name.
pub fn module_entries(plans: &[StructPlan], options: &GeneratorOptions) -> Vec<ModuleEntry> {
    let mut resolver = NameResolver::new();
    resolver.resolve(RESTRICTIONS_MODULE, NameContext::Property);
    resolver.resolve("lib", NameContext::Property);
    plans
        .iter()
        .map(|plan| ModuleEntry {
            module: resolver
                .resolve(&options.module_name(&plan.name), NameContext::Property)
                .to_string(),
            type_name: resolver
                .resolve(&type_name(&plan.name), NameContext::Type)
                .to_string(),
        })
        .collect()
}

/// Assembles the module for one struct: module docs followed by the
/// struct, named `type_name`, and its impls.
pub fn assemble_struct_module(plan: &StructPlan, type_name: &str) -> TokenStream {
    let module_docs = ModuleDocBuilder::new(plan).build();
    let item = generate_struct(plan, type_name);

    quote! {
        #module_docs

        #item
    }
}

/// Assembles the lib.rs content for the generated crate.
///
/// ## Arguments
///
/// * `entries` - Module and type name of every struct
/// * `with_restrictions` - Whether a restrictions module is declared
pub fn assemble_lib_rs(entries: &[ModuleEntry], with_restrictions: bool) -> TokenStream {
    let module_decls: Vec<_> = entries
        .iter()
        .map(|entry| {
            let module_name = format_ident!("{}", entry.module);
            let type_name = format_ident!("{}", entry.type_name);
            quote! {
                pub mod #module_name;
                pub use #module_name::#type_name;
            }
        })
        .collect();
    let restrictions = with_restrictions.then(|| {
        let module_name = format_ident!("{}", RESTRICTIONS_MODULE);
        quote! { pub mod #module_name; }
    });

    quote! {
        //! Generated accessor structs.
        //!
        //! Every struct stores its attributes in an `accessory::Record` and
        //! exposes `get`/`set`/`addTo` accessors that validate their input.

        #restrictions

        #(#module_decls)*
    }
}

/// Validates generated code using syn.
///
/// Parses the token stream as a complete Rust file to ensure it's syntactically
/// valid before writing to disk.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the code fails to parse.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {}", e)))
}

/// Formats generated code using prettyplease.
///
/// Converts a parsed syn::File back to a nicely formatted string,
/// prepending an auto-generated notice as a regular comment.
pub fn format_code(file: &syn::File) -> String {
    let formatted = prettyplease::unparse(file);
    format!(
        "// This code was automatically generated by accessory-gen. Do not edit manually.\n\n{}",
        formatted
    )
}

/// Writes content to a file atomically using temp file + rename.
///
/// This pattern ensures that:
/// - The file is never left in a partially-written state
/// - Other processes see either the old or new content, never a mix
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if:
/// - Parent directories cannot be created
/// - The temp file cannot be written
/// - The rename operation fails
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

fn render(name: String, tokens: &TokenStream) -> Result<GeneratedFile, GeneratorError> {
    let file = validate_code(tokens)?;
    Ok(GeneratedFile {
        name,
        content: format_code(&file),
    })
}

/// Renders every file of the generated crate without touching the disk.
///
/// `lib.rs` comes first, then `restrictions.rs` (when there are
/// restrictions), then one module per plan in plan order.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if any file is not valid Rust.
pub fn render_crate(
    plans: &[StructPlan],
    restrictions: &[Restriction],
    options: &GeneratorOptions,
) -> Result<Vec<GeneratedFile>, GeneratorError> {
    let entries = module_entries(plans, options);
    let with_restrictions = !restrictions.is_empty();

    let mut files = vec![render(
        "lib.rs".to_string(),
        &assemble_lib_rs(&entries, with_restrictions),
    )?];
    if with_restrictions {
        files.push(render(
            format!("{RESTRICTIONS_MODULE}.rs"),
            &generate_restrictions(restrictions),
        )?);
    }
    for (plan, entry) in plans.iter().zip(&entries) {
        let file = render(format!("{}.rs", entry.module), &assemble_struct_module(plan, &entry.type_name))?;
        debug!(struct_name = %plan.name, file = %file.name, "module rendered");
        files.push(file);
    }
    Ok(files)
}

/// Generates and writes all struct modules to the output directory.
///
/// This is the main entry point for code generation. In dry-run mode the
/// files are printed instead of written.
///
/// ## Returns
///
/// The rendered files, in the order of [`render_crate`].
///
/// ## Errors
///
/// Returns an error if:
/// - Code generation produces invalid Rust
/// - File writing fails
pub fn generate_and_write(
    plans: &[StructPlan],
    restrictions: &[Restriction],
    output_dir: &Path,
    options: &GeneratorOptions,
    dry_run: bool,
) -> Result<Vec<GeneratedFile>, GeneratorError> {
    let files = render_crate(plans, restrictions, options)?;

    if dry_run {
        for file in &files {
            println!("=== {} ===\n{}\n", file.name, file.content);
        }
    } else {
        for file in &files {
            write_atomic(&output_dir.join(&file.name), &file.content)?;
        }
        info!(
            files = files.len(),
            output = %output_dir.display(),
            "generated files written"
        );
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{person_model, plan_all};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn module_entries_are_unique() {
        let model = accessory_define::Model::new()
            .with_struct(accessory_define::Struct::new("UserName"))
            .with_struct(accessory_define::Struct::new("user_name"))
            .with_struct(accessory_define::Struct::new("Restrictions"));
        let plans = plan_all(&model);
        let entries = module_entries(&plans, &GeneratorOptions::default());
        let modules: Vec<&str> = entries.iter().map(|e| e.module.as_str()).collect();
        assert_eq!(modules, ["user_name", "user_name_1", "restrictions_1"]);
    }

    #[test]
    fn colliding_type_names_get_suffixes() {
        let model = accessory_define::Model::new()
            .with_struct(accessory_define::Struct::new("a-b"))
            .with_struct(accessory_define::Struct::new("a_b"));
        let plans = plan_all(&model);
        let entries = module_entries(&plans, &GeneratorOptions::default());
        let types: Vec<&str> = entries.iter().map(|e| e.type_name.as_str()).collect();
        assert_eq!(types, ["A_b", "A_b_1"]);

        let files = render_crate(&plans, &[], &GeneratorOptions::default()).unwrap();
        let lib = &files[0].content;
        assert!(lib.contains("pub use a_b::A_b;"), "got:\n{lib}");
        assert!(lib.contains("pub use a_b_1::A_b_1;"), "got:\n{lib}");
        assert!(files[2].content.contains("pub struct A_b_1 {"), "got:\n{}", files[2].content);
    }

    #[test]
    fn validate_code_rejects_invalid_code() {
        let invalid = quote! { pub struct ; };
        assert!(validate_code(&invalid).is_err());
    }

    #[test]
    fn format_code_prepends_notice() {
        let file = validate_code(&quote! { pub struct A; }).unwrap();
        let code = format_code(&file);
        assert!(code.starts_with("// This code was automatically generated by accessory-gen."));
        assert!(code.contains("pub struct A;"));
    }

    // === write_atomic tests ===

    #[test]
    fn write_atomic_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested/deep/test.rs");

        write_atomic(&file_path, "// Nested content").unwrap();

        assert!(file_path.exists());
        assert!(!file_path.with_extension("tmp").exists());
    }

    #[test]
    fn write_atomic_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("existing.rs");
        fs::write(&file_path, "// Old content").unwrap();

        write_atomic(&file_path, "// New content").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "// New content");
    }

    // === generate_and_write tests ===

    #[test]
    fn generate_and_write_dry_run_no_file_created() {
        let model = person_model();
        let temp_dir = TempDir::new().unwrap();

        let files = generate_and_write(
            &plan_all(&model),
            &model.restrictions,
            temp_dir.path(),
            &GeneratorOptions::default(),
            true,
        )
        .unwrap();

        assert!(files.iter().any(|f| f.name == "person.rs"));
        assert!(!temp_dir.path().join("lib.rs").exists());
    }

    #[test]
    fn generate_and_write_creates_every_file() {
        let model = person_model();
        let temp_dir = TempDir::new().unwrap();

        let files = generate_and_write(
            &plan_all(&model),
            &model.restrictions,
            temp_dir.path(),
            &GeneratorOptions::default(),
            false,
        )
        .unwrap();

        for file in &files {
            let written = fs::read_to_string(temp_dir.path().join(&file.name)).unwrap();
            assert_eq!(written, file.content);
        }
        let lib = fs::read_to_string(temp_dir.path().join("lib.rs")).unwrap();
        assert!(lib.contains("pub mod person;"), "got:\n{}", lib);
        assert!(lib.contains("pub use person::Person;"));
    }

    #[test]
    fn module_prefix_is_applied() {
        let model = person_model();
        let options = GeneratorOptions::default().with_module_prefix("ws");
        let files = render_crate(&plan_all(&model), &[], &options).unwrap();
        assert!(files.iter().any(|f| f.name == "ws_person.rs"));
        assert!(!files.iter().any(|f| f.name == "restrictions.rs"));
    }

    #[test]
    fn generated_module_has_module_documentation() {
        let model = person_model();
        let files = render_crate(&plan_all(&model), &[], &GeneratorOptions::default()).unwrap();
        let person = files.iter().find(|f| f.name == "person.rs").unwrap();
        assert!(person.content.contains("//! Accessors for `Person`"), "got:\n{}", person.content);
    }
}
