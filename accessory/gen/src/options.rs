//! Generator configuration.

use crate::errors::GeneratorError;

/// Options for one generation pass.
///
/// ## Examples
///
/// ```
/// use accessory_gen::options::GeneratorOptions;
///
/// let options = GeneratorOptions::default();
/// assert!(options.validation);
///
/// let options = GeneratorOptions::default().without_validation().with_module_prefix("ws");
/// assert!(!options.validation);
/// assert_eq!(options.module_name("Person"), "ws_person");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Emit guard chains in setters and add-to methods.
    pub validation: bool,
    /// Prefix prepended to every generated module name.
    pub module_prefix: Option<String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            validation: true,
            module_prefix: None,
        }
    }
}

impl GeneratorOptions {
    pub fn without_validation(mut self) -> Self {
        self.validation = false;
        self
    }

    pub fn with_module_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.module_prefix = Some(prefix.into());
        self
    }

    /// Checks that the module prefix can start a Rust identifier.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if let Some(prefix) = &self.module_prefix {
            let valid = prefix
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
                && prefix
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
            if !valid {
                return Err(GeneratorError::ConfigError(format!(
                    "module prefix '{prefix}' must be a lowercase identifier"
                )));
            }
        }
        Ok(())
    }

    /// Module file stem for a struct.
    pub fn module_name(&self, struct_name: &str) -> String {
        let stem = to_snake_case(struct_name);
        match &self.module_prefix {
            Some(prefix) => format!("{prefix}_{stem}"),
            None => stem,
        }
    }
}

/// Converts a struct name to a snake_case module name.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else if c.is_ascii_alphanumeric() {
            out.push(c);
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        } else {
            if !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        return "_module".to_string();
    }
    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{trimmed}");
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_module_names() {
        assert_eq!(to_snake_case("Person"), "person");
        assert_eq!(to_snake_case("PurchaseOrder"), "purchase_order");
        assert_eq!(to_snake_case("HTTPHeader"), "httpheader");
        assert_eq!(to_snake_case("ns.Order-Line"), "ns_order_line");
        assert_eq!(to_snake_case("2Fast"), "_2_fast");
    }

    #[test]
    fn rejects_bad_prefix() {
        let options = GeneratorOptions::default().with_module_prefix("Bad-Prefix");
        assert!(matches!(options.validate(), Err(GeneratorError::ConfigError(_))));
        assert!(GeneratorOptions::default().with_module_prefix("ok_1").validate().is_ok());
    }
}
