use std::collections::BTreeSet;
use std::rc::Rc;

/// Words that can never be used as a generated binding
const RESERVED_WORDS: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while",
    "with", "yield",
];

/// Lexical scope of reserved identifiers.
/// Uses Rc for cheap nesting without copying the parent chain.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    parent: Option<Rc<Scope>>,
    bindings: BTreeSet<String>,
}

impl Scope {
    /// Create a new root scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a child scope. The parent is frozen from here on.
    pub fn with_parent(parent: Rc<Scope>) -> Self {
        Self {
            parent: Some(parent),
            bindings: BTreeSet::new(),
        }
    }

    /// Check if a name is bound in this scope or any parent
    pub fn has_binding(&self, name: &str) -> bool {
        self.bindings.contains(name)
            || self
                .parent
                .as_ref()
                .map(|p| p.has_binding(name))
                .unwrap_or(false)
    }

    /// Bind `name` as is. Returns false if it was already taken.
    pub fn reserve(&mut self, name: &str) -> bool {
        if self.has_binding(name) || is_reserved_word(name) {
            return false;
        }
        self.bindings.insert(name.to_string())
    }

    /// Bind a fresh identifier derived from `suggested_name`.
    ///
    /// The name is made a valid identifier first, then an increasing
    /// counter is appended until it's free in the whole chain.
    pub fn create_unique_binding(&mut self, suggested_name: &str) -> String {
        let base = to_identifier(suggested_name);
        let mut binding = base.clone();
        let mut index = 1;

        while self.has_binding(&binding) || is_reserved_word(&binding) {
            binding = format!("{}{}", base, index);
            index += 1;
        }

        self.bindings.insert(binding.clone());
        binding
    }

    /// Bindings made directly in this scope
    pub fn local_bindings(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(String::as_str)
    }
}

fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Turn arbitrary text into a valid identifier.
///
/// Characters outside `[A-Za-z0-9_$]` become `_`, and a leading digit
/// gets an `_` prefix.
pub fn to_identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if ident.is_empty() {
        return "_".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_binding_suffixes() {
        let mut scope = Scope::new();
        assert_eq!(scope.create_unique_binding("value"), "value");
        assert_eq!(scope.create_unique_binding("value"), "value1");
        assert_eq!(scope.create_unique_binding("value"), "value2");
        assert!(scope.has_binding("value1"));
    }

    #[test]
    fn test_parent_chain_is_checked() {
        let mut root = Scope::new();
        root.create_unique_binding("Text");

        let mut child = Scope::with_parent(Rc::new(root));
        assert!(child.has_binding("Text"));
        assert_eq!(child.create_unique_binding("Text"), "Text1");
    }

    #[test]
    fn test_child_bindings_dont_leak() {
        let root = Rc::new(Scope::new());
        let mut child = Scope::with_parent(root.clone());
        child.create_unique_binding("local");

        assert!(!root.has_binding("local"));
    }

    #[test]
    fn test_digit_prefix_and_sanitizing() {
        let mut scope = Scope::new();
        assert_eq!(scope.create_unique_binding("1st"), "_1st");
        assert_eq!(scope.create_unique_binding("1st"), "_1st1");
        assert_eq!(scope.create_unique_binding("my text-field"), "my_text_field");
        assert_eq!(scope.create_unique_binding(""), "_");
    }

    #[test]
    fn test_reserved_words_are_avoided() {
        let mut scope = Scope::new();
        assert_eq!(scope.create_unique_binding("default"), "default1");
        assert!(!scope.reserve("class"));
    }

    #[test]
    fn test_reserve() {
        let mut scope = Scope::new();
        assert!(scope.reserve("props"));
        assert!(!scope.reserve("props"));
        assert_eq!(scope.create_unique_binding("props"), "props1");
    }
}
