//! Append-only text buffer for generated source.
//!
//! Emitters never format into `String` directly; they go through a
//! `SourceWriter` so indentation and line endings stay uniform across the
//! declarations and definitions artifacts.

const INDENT: &str = "    ";

#[derive(Debug, Clone, Default)]
pub struct SourceWriter {
    output: String,
    indent_level: u32,
}

impl SourceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            output: String::with_capacity(capacity),
            indent_level: 0,
        }
    }

    pub fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    pub fn write_line(&mut self) {
        self.output.push('\n');
    }

    pub fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(INDENT);
        }
    }

    /// Write one full line at the current indentation.
    pub fn line(&mut self, s: &str) {
        if !s.is_empty() {
            self.write_indent();
            self.write(s);
        }
        self.write_line();
    }

    pub fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    pub const fn indent_level(&self) -> u32 {
        self.indent_level
    }

    /// Append an already rendered fragment verbatim.
    pub fn append(&mut self, fragment: &str) {
        self.output.push_str(fragment);
    }

    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.output
    }

    pub fn finish(self) -> String {
        self.output
    }
}
