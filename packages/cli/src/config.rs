use anyhow::Context;
use pagecraft_compiler_react::{
    CompileOptions, ComponentCatalog, ComponentDefinition, DEFAULT_RUNTIME_MODULE,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Pagecraft configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Serialized application document
    #[serde(default = "default_document_path")]
    pub document_path: String,

    /// Directory generated page modules are written to
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Wrap elements in node markers for the editor overlay
    #[serde(default)]
    pub editor_mode: bool,

    /// Run the pretty printer on generated source
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// Module providing data hooks and the node marker
    #[serde(default = "default_runtime_module")]
    pub runtime_module: String,

    /// Component definitions added to the built-in catalog
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentDefinition>,
}

fn default_document_path() -> String {
    "app.json".to_string()
}

fn default_out_dir() -> String {
    "generated".to_string()
}

fn default_pretty() -> bool {
    true
}

fn default_runtime_module() -> String {
    DEFAULT_RUNTIME_MODULE.to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Invalid {}", config_path.display()))?;
            tracing::debug!(path = %config_path.display(), "Loaded config");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn get_document_path(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.document_path)
    }

    pub fn get_out_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.out_dir)
    }

    /// Compile options, with editor mode forced on by `editor`
    pub fn compile_options(&self, editor: bool) -> CompileOptions {
        CompileOptions {
            editor_mode: self.editor_mode || editor,
            pretty: self.pretty,
            runtime_module: self.runtime_module.clone(),
        }
    }

    /// Built-in catalog extended with the configured components
    pub fn catalog(&self) -> ComponentCatalog {
        let mut catalog = ComponentCatalog::builtin();
        catalog.extend(self.components.iter().cloned());
        catalog
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document_path: default_document_path(),
            out_dir: default_out_dir(),
            editor_mode: false,
            pretty: default_pretty(),
            runtime_module: default_runtime_module(),
            components: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_compiler_react::ComponentRegistry;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "documentPath": "docs/shop.json",
            "outDir": "src/pages",
            "editorMode": true,
            "components": [
                {
                    "name": "Rating",
                    "source": "@acme/widgets",
                    "props": {
                        "value": { "kind": "number", "controlled": { "changeEvent": "onRate" } }
                    }
                }
            ]
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.document_path, "docs/shop.json");
        assert_eq!(config.out_dir, "src/pages");
        assert!(config.editor_mode);
        assert!(config.pretty);
        assert_eq!(config.runtime_module, "@pagecraft/runtime");

        let catalog = config.catalog();
        assert_eq!(
            catalog.definition("Rating").map(|d| d.source.as_str()),
            Some("@acme/widgets")
        );
        assert!(catalog.definition("Text").is_some());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.document_path, "app.json");
        assert_eq!(config.out_dir, "generated");
        assert_eq!(config.compile_options(false), CompileOptions::default());
        assert!(config.compile_options(true).editor_mode);
    }

    #[test]
    fn test_default_config_omits_components() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(!json.contains("components"));
        assert!(json.contains("\"documentPath\":\"app.json\""));
    }
}
