//! Indentation-aware text accumulator for generated migration code.
//!
//! The first appended fragment is written bare: the stub that receives the
//! text already sits at the right indentation for it. Every later fragment
//! starts a new line indented by the current level, unless the caller asks
//! to continue the previous line.

/// Tab level of a method body inside the migration stub.
pub const DEFAULT_INDENT: usize = 2;

const TAB: char = '\t';

/// One direction (up or down) of a migration under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    text: String,
    level: usize,
}

impl Default for Definition {
    fn default() -> Self {
        Self::new()
    }
}

impl Definition {
    pub fn new() -> Self {
        Self::with_indent(DEFAULT_INDENT)
    }

    /// Start at a custom base level.
    pub fn with_indent(level: usize) -> Self {
        Self {
            text: String::new(),
            level,
        }
    }

    /// Append a fragment, optionally on a new line and indented.
    pub fn append(&mut self, fragment: &str, newline: bool, indent: bool) {
        if !self.text.is_empty() {
            if newline {
                self.text.push('\n');
            }
            if indent {
                self.text.extend(std::iter::repeat_n(TAB, self.level));
            }
        }
        self.text.push_str(fragment);
    }

    /// Append a fragment on its own indented line.
    pub fn line(&mut self, fragment: &str) {
        self.append(fragment, true, true);
    }

    /// Continue the current line, e.g. with a terminator or chained call.
    pub fn push(&mut self, fragment: &str) {
        self.append(fragment, false, false);
    }

    pub fn increase_indent(&mut self, n: usize) {
        self.level += n;
    }

    /// Never drops below zero.
    pub fn decrease_indent(&mut self, n: usize) {
        self.level = self.level.saturating_sub(n);
    }

    pub fn indent(&mut self) {
        self.increase_indent(1);
    }

    pub fn dedent(&mut self) {
        self.decrease_indent(1);
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn get(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_fragment_is_bare() {
        let mut def = Definition::new();
        def.line("Schema::create('users', function (Blueprint $table) {");
        assert_eq!(def.get(), "Schema::create('users', function (Blueprint $table) {");
    }

    #[test]
    fn test_lines_and_continuations() {
        let mut def = Definition::with_indent(0);
        def.line("open {");
        def.indent();
        def.line("$table->integer('id')");
        def.indent();
        def.line("->unsigned()");
        def.push(";");
        def.dedent();
        def.dedent();
        def.line("});");
        assert_eq!(
            def.get(),
            "open {\n\t$table->integer('id')\n\t\t->unsigned();\n});"
        );
    }

    #[test]
    fn test_append_without_indent_keeps_newline() {
        let mut def = Definition::with_indent(3);
        def.line("a");
        def.append("b", true, false);
        assert_eq!(def.get(), "a\nb");
    }

    #[test]
    fn test_indent_never_negative() {
        let mut def = Definition::with_indent(1);
        def.decrease_indent(5);
        assert_eq!(def.level(), 0);
        def.line("x");
        def.line("y");
        assert_eq!(def.get(), "x\ny");
    }

    #[test]
    fn test_balanced_indent_returns_to_start() {
        let mut def = Definition::new();
        let start = def.level();
        def.increase_indent(2);
        def.indent();
        def.dedent();
        def.decrease_indent(2);
        assert_eq!(def.level(), start);
    }
}
