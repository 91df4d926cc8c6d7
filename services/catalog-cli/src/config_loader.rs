//! Catalog file loader.
//!
//! Reads a YAML catalog definition, substitutes environment variables using
//! `${VAR}` or `${VAR:-default}` syntax, and builds an [`InMemoryCatalog`]
//! from it. Name and reference validation happens while building the store.

use anyhow::{Context, Result};
use coverage_catalog::{CatalogDefinition, ConfigurationStore, InMemoryCatalog};
use std::fs;
use std::path::Path;
use tracing::info;

// ============================================================================
// Loading Functions
// ============================================================================

/// Load and parse a catalog definition with environment variable substitution.
pub fn load_catalog_definition<P: AsRef<Path>>(path: P) -> Result<CatalogDefinition> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read catalog from {:?}", path.as_ref()))?;

    parse_catalog_definition(&content)
        .with_context(|| format!("Failed to parse catalog from {:?}", path.as_ref()))
}

/// Parse catalog YAML held in memory.
pub fn parse_catalog_definition(content: &str) -> Result<CatalogDefinition> {
    let expanded = expand_env_vars(content)?;

    serde_yaml::from_str(&expanded).with_context(|| "Failed to parse catalog YAML")
}

/// Load a catalog file into a validated in-memory store.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<InMemoryCatalog> {
    let definition = load_catalog_definition(path.as_ref())?;

    let catalog = InMemoryCatalog::from_definition(definition)
        .with_context(|| format!("Invalid catalog in {:?}", path.as_ref()))?;

    info!(
        path = ?path.as_ref(),
        configurations = catalog.configurations().len(),
        "Loaded catalog"
    );

    Ok(catalog)
}

// ============================================================================
// Environment Variable Expansion
// ============================================================================

/// Expand environment variables in YAML content
/// Supports ${VAR} and ${VAR:-default} syntax
pub fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut var_expr = String::new();
            let mut brace_count = 1;

            while brace_count > 0 {
                match chars.next() {
                    Some('{') => {
                        brace_count += 1;
                        var_expr.push('{');
                    }
                    Some('}') => {
                        brace_count -= 1;
                        if brace_count > 0 {
                            var_expr.push('}');
                        }
                    }
                    Some(c) => var_expr.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
                }
            }

            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

/// Resolve variable expression (supports VAR and VAR:-default syntax)
fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim()).with_context(|| format!("Environment variable {} not set", expr))
    }
}

// ============================================================================
// Tests
// ============================================================================
