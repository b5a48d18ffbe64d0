//! Where formatted text goes.

use crate::INDENT_WIDTH;

/// Sink for the formatter. Line structure is explicit: the formatter asks
/// for every newline and every indent itself.
pub trait Emitter {
    fn emit(&mut self, text: &str);

    fn emit_newline(&mut self);

    /// Indent to `level`, counted in nesting levels rather than columns.
    fn emit_indent(&mut self, level: usize);
}

/// Collects formatted text into a `String`.
#[derive(Default)]
pub struct StringEmitter {
    buffer: String,
}

impl StringEmitter {
    pub fn new() -> Self {
        StringEmitter::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        StringEmitter {
            buffer: String::with_capacity(capacity),
        }
    }

    pub fn into_string(self) -> String {
        self.buffer
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Trim trailing blank lines so that non-empty output ends in a single
    /// `\n`.
    pub fn finish_lines(&mut self) {
        let end = self.buffer.trim_end_matches('\n').len();
        self.buffer.truncate(end);
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
    }
}

impl Emitter for StringEmitter {
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn emit_newline(&mut self) {
        self.buffer.push('\n');
    }

    fn emit_indent(&mut self, level: usize) {
        self.buffer.push_str(&" ".repeat(level * INDENT_WIDTH));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indent_levels_are_four_columns() {
        let mut emitter = StringEmitter::new();
        emitter.emit_indent(2);
        emitter.emit("x;");
        assert_eq!(emitter.as_str(), "        x;");
    }

    #[test]
    fn output_ends_in_one_newline() {
        let mut emitter = StringEmitter::new();
        emitter.emit("a;");
        emitter.emit_newline();
        emitter.emit_newline();
        emitter.finish_lines();
        assert_eq!(emitter.into_string(), "a;\n");

        let mut emitter = StringEmitter::new();
        emitter.emit("b;");
        emitter.finish_lines();
        assert_eq!(emitter.as_str(), "b;\n");

        let mut emitter = StringEmitter::new();
        emitter.finish_lines();
        assert_eq!(emitter.into_string(), "");
    }
}
