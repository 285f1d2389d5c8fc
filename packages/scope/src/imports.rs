//! # Import Table
//!
//! Collects the imports a generated module needs and gives each one a
//! local alias from the module scope.
//!
//! ```text
//! ImportTable (collecting)  ──seal()──►  SealedImports (read only)
//!   import_named("mui", "Text")            alias_of("mui", "Text") -> "Text"
//!   import_namespace("react", "React")     render() -> import block
//! ```

use crate::error::{ImportError, NamingConflictError};
use crate::scope::{to_identifier, Scope};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// What a local alias refers to
#[derive(Debug, Clone, PartialEq, Eq)]
enum ImportKey {
    Named { source: String, name: String },
    Namespace { source: String },
}

impl fmt::Display for ImportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportKey::Named { source, name } => write!(f, "{{ {} }} from {:?}", name, source),
            ImportKey::Namespace { source } => write!(f, "* from {:?}", source),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct ModuleImports {
    namespace: Option<String>,
    /// imported name → local alias
    named: BTreeMap<String, String>,
}

/// Imports of one generated module, still open for additions
#[derive(Debug, Default)]
pub struct ImportTable {
    scope: Scope,
    modules: BTreeMap<String, ModuleImports>,
    aliases: BTreeMap<String, ImportKey>,
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build on an existing module scope (e.g. one with reserved globals)
    pub fn with_scope(scope: Scope) -> Self {
        Self {
            scope,
            modules: BTreeMap::new(),
            aliases: BTreeMap::new(),
        }
    }

    /// Import `name` from `source`, aliasing it to a free identifier close
    /// to `name`. Repeated requests return the same alias.
    pub fn import_named(&mut self, source: &str, name: &str) -> String {
        if let Some(alias) = self.modules.get(source).and_then(|m| m.named.get(name)) {
            return alias.clone();
        }

        let alias = self.scope.create_unique_binding(name);
        self.record_named(source, name, &alias);
        alias
    }

    /// Import `name` from `source` under exactly `alias`.
    ///
    /// Fails if the alias already means something else, or if `name` was
    /// already imported from `source` under a different alias.
    pub fn import_named_as(
        &mut self,
        source: &str,
        name: &str,
        alias: &str,
    ) -> Result<String, ImportError> {
        if to_identifier(alias) != alias {
            return Err(ImportError::InvalidIdentifier(alias.to_string()));
        }

        let requested = ImportKey::Named {
            source: source.to_string(),
            name: name.to_string(),
        };

        if let Some(existing) = self.modules.get(source).and_then(|m| m.named.get(name)) {
            if existing == alias {
                return Ok(alias.to_string());
            }
            // One alias per import, so earlier lookups stay valid
            return Err(NamingConflictError {
                alias: existing.clone(),
                existing: requested.to_string(),
                requested: format!("{} as {}", requested, alias),
            }
            .into());
        }
        self.claim_alias(alias, &requested)?;
        self.record_named(source, name, alias);
        Ok(alias.to_string())
    }

    /// Import the whole module under one namespace alias
    pub fn import_namespace(
        &mut self,
        source: &str,
        suggested_alias: &str,
    ) -> Result<String, ImportError> {
        if let Some(alias) = self.modules.get(source).and_then(|m| m.namespace.as_ref()) {
            return Ok(alias.clone());
        }

        let requested = ImportKey::Namespace {
            source: source.to_string(),
        };
        self.claim_alias(suggested_alias, &requested)?;

        self.modules.entry(source.to_string()).or_default().namespace =
            Some(suggested_alias.to_string());
        self.aliases.insert(suggested_alias.to_string(), requested);
        Ok(suggested_alias.to_string())
    }

    fn claim_alias(&mut self, alias: &str, requested: &ImportKey) -> Result<(), ImportError> {
        if let Some(existing) = self.aliases.get(alias) {
            if existing != requested {
                return Err(NamingConflictError {
                    alias: alias.to_string(),
                    existing: existing.to_string(),
                    requested: requested.to_string(),
                }
                .into());
            }
            return Ok(());
        }

        if !self.scope.reserve(alias) {
            return Err(NamingConflictError {
                alias: alias.to_string(),
                existing: "a module binding".to_string(),
                requested: requested.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn record_named(&mut self, source: &str, name: &str, alias: &str) {
        self.modules
            .entry(source.to_string())
            .or_default()
            .named
            .insert(name.to_string(), alias.to_string());
        self.aliases.insert(
            alias.to_string(),
            ImportKey::Named {
                source: source.to_string(),
                name: name.to_string(),
            },
        );
    }

    /// Reserve a module-level name that isn't an import
    pub fn reserve(&mut self, name: &str) -> bool {
        self.scope.reserve(name)
    }

    /// Bind a fresh module-level name close to `suggested_name`
    pub fn declare(&mut self, suggested_name: &str) -> String {
        self.scope.create_unique_binding(suggested_name)
    }

    /// Stop accepting imports
    pub fn seal(self) -> SealedImports {
        tracing::debug!(modules = self.modules.len(), "Sealed import table");
        SealedImports {
            scope: Rc::new(self.scope),
            modules: self.modules,
        }
    }
}

/// Read-only view of a finished import table
#[derive(Debug, Clone)]
pub struct SealedImports {
    scope: Rc<Scope>,
    modules: BTreeMap<String, ModuleImports>,
}

impl SealedImports {
    /// Module scope, to nest function scopes under
    pub fn scope(&self) -> Rc<Scope> {
        self.scope.clone()
    }

    pub fn alias_of(&self, source: &str, name: &str) -> Option<&str> {
        self.modules
            .get(source)
            .and_then(|m| m.named.get(name))
            .map(String::as_str)
    }

    pub fn namespace_of(&self, source: &str) -> Option<&str> {
        self.modules
            .get(source)
            .and_then(|m| m.namespace.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Import statements, one module per line (two if it has both a
    /// namespace and named imports), sorted by module
    pub fn render(&self) -> String {
        let mut out = String::new();

        for (source, imports) in &self.modules {
            if let Some(namespace) = &imports.namespace {
                out.push_str(&format!("import * as {} from {:?};\n", namespace, source));
            }

            if !imports.named.is_empty() {
                let specifiers: Vec<String> = imports
                    .named
                    .iter()
                    .map(|(name, alias)| {
                        if name == alias {
                            name.clone()
                        } else {
                            format!("{} as {}", name, alias)
                        }
                    })
                    .collect();
                out.push_str(&format!(
                    "import {{ {} }} from {:?};\n",
                    specifiers.join(", "),
                    source
                ));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_import_same_alias() {
        let mut table = ImportTable::new();
        let a = table.import_named("@ui/core", "Text");
        let b = table.import_named("@ui/core", "Text");
        assert_eq!(a, "Text");
        assert_eq!(a, b);
    }

    #[test]
    fn test_same_name_from_two_sources() {
        let mut table = ImportTable::new();
        let a = table.import_named("@ui/core", "Button");
        let b = table.import_named("@ui/lab", "Button");
        assert_eq!(a, "Button");
        assert_eq!(b, "Button1");

        let sealed = table.seal();
        assert_eq!(
            sealed.render(),
            "import { Button } from \"@ui/core\";\nimport { Button as Button1 } from \"@ui/lab\";\n"
        );
    }

    #[test]
    fn test_explicit_alias_conflict_is_fatal() {
        let mut table = ImportTable::new();
        table.import_named_as("@ui/core", "Text", "Label").unwrap();
        assert!(table.import_named_as("@ui/core", "Text", "Label").is_ok());

        let err = table.import_named_as("@ui/core", "Typography", "Label").unwrap_err();
        assert!(matches!(err, ImportError::NamingConflict(_)));
    }

    #[test]
    fn test_imported_name_keeps_its_alias() {
        let mut table = ImportTable::new();
        assert_eq!(table.import_named("@ui/core", "Text"), "Text");

        let err = table.import_named_as("@ui/core", "Text", "Label").unwrap_err();
        assert!(matches!(err, ImportError::NamingConflict(_)));
        assert_eq!(table.import_named("@ui/core", "Text"), "Text");

        let sealed = table.seal();
        assert_eq!(sealed.alias_of("@ui/core", "Text"), Some("Text"));
        assert_eq!(sealed.render(), "import { Text } from \"@ui/core\";\n");
    }

    #[test]
    fn test_namespace_conflict_with_named() {
        let mut table = ImportTable::new();
        table.import_named("@ui/core", "React");
        let err = table.import_namespace("react", "React").unwrap_err();
        assert!(matches!(err, ImportError::NamingConflict(_)));
    }

    #[test]
    fn test_namespace_import_is_reused() {
        let mut table = ImportTable::new();
        assert_eq!(table.import_namespace("react", "React").unwrap(), "React");
        assert_eq!(table.import_namespace("react", "React").unwrap(), "React");

        let sealed = table.seal();
        assert_eq!(sealed.namespace_of("react"), Some("React"));
        assert_eq!(sealed.render(), "import * as React from \"react\";\n");
    }

    #[test]
    fn test_named_imports_avoid_namespace_aliases() {
        let mut table = ImportTable::new();
        table.import_namespace("react", "React").unwrap();
        assert_eq!(table.import_named("@ui/core", "React"), "React1");
    }

    #[test]
    fn test_sealed_scope_is_parent_of_function_scope() {
        let mut table = ImportTable::new();
        table.import_named("@ui/core", "Text");
        let sealed = table.seal();

        let mut function_scope = Scope::with_parent(sealed.scope());
        assert_eq!(function_scope.create_unique_binding("Text"), "Text1");
        assert_eq!(sealed.alias_of("@ui/core", "Text"), Some("Text"));
        assert_eq!(sealed.alias_of("@ui/core", "Button"), None);
    }

    #[test]
    fn test_declared_names_avoid_imports() {
        let mut table = ImportTable::new();
        table.import_named("@ui/core", "Home");
        assert_eq!(table.declare("Home"), "Home1");
        assert_eq!(table.import_named("@ui/lab", "Home1"), "Home11");
    }

    #[test]
    fn test_invalid_explicit_alias() {
        let mut table = ImportTable::new();
        let err = table.import_named_as("x", "y", "not valid").unwrap_err();
        assert_eq!(err, ImportError::InvalidIdentifier("not valid".to_string()));
    }
}
