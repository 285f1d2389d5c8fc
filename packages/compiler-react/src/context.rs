use std::cell::RefCell;
use std::rc::Rc;

/// Module the data hooks and the editor marker are imported from
pub const DEFAULT_RUNTIME_MODULE: &str = "@pagecraft/runtime";

/// Options for React compilation
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    /// Wrap every element in a marker carrying its node id
    pub editor_mode: bool,
    /// Run the best-effort pretty printer on the output
    pub pretty: bool,
    /// Source of `useDataQuery`, `useFetchedState`, `evaluateExpression`
    /// and `NodeMarker`
    pub runtime_module: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            editor_mode: false,
            pretty: true,
            runtime_module: DEFAULT_RUNTIME_MODULE.to_string(),
        }
    }
}

impl CompileOptions {
    pub fn editor() -> Self {
        Self {
            editor_mode: true,
            ..Self::default()
        }
    }
}

/// Compilation context for managing state during code generation
pub struct CompilerContext {
    buffer: Rc<RefCell<String>>,
    indent_level: Rc<RefCell<usize>>,
    pub options: CompileOptions,
}

impl CompilerContext {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            buffer: Rc::new(RefCell::new(String::new())),
            indent_level: Rc::new(RefCell::new(0)),
            options,
        }
    }

    pub fn add(&self, text: &str) {
        self.buffer.borrow_mut().push_str(text);
    }

    pub fn add_line(&self, text: &str) {
        self.add_indented(text);
        self.add("\n");
    }

    /// Add multi-line text, indenting every line at the current level
    pub fn add_lines(&self, text: &str) {
        for line in text.lines() {
            if line.is_empty() {
                self.add("\n");
            } else {
                self.add_line(line);
            }
        }
    }

    pub fn add_indented(&self, text: &str) {
        let indent = "  ".repeat(*self.indent_level.borrow());
        self.buffer.borrow_mut().push_str(&indent);
        self.buffer.borrow_mut().push_str(text);
    }

    pub fn indent(&self) {
        *self.indent_level.borrow_mut() += 1;
    }

    pub fn dedent(&self) {
        let mut level = self.indent_level.borrow_mut();
        if *level > 0 {
            *level -= 1;
        }
    }

    pub fn get_output(&self) -> String {
        self.buffer.borrow().clone()
    }
}
