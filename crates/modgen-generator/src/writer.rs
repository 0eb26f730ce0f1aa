//! Line writer with nesting.

/// Writes lines prefixed by the current indentation.
///
/// ```
/// use modgen_generator::IndentedWriter;
///
/// let mut writer = IndentedWriter::new("    ");
/// writer.write_line("class A");
/// writer.write_wrapped_indented("{", "}", |w| w.write_line("int x;"));
/// assert_eq!(writer.finish(), "class A\n{\n    int x;\n}\n");
/// ```
#[derive(Debug, Clone)]
pub struct IndentedWriter {
    buffer: String,
    unit: String,
    depth: usize,
}

impl IndentedWriter {
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            unit: unit.into(),
            depth: 0,
        }
    }

    /// Write `text` as one line at the current depth.
    pub fn write_line(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buffer.push_str(&self.unit);
            }
            self.buffer.push_str(text);
        }
        self.buffer.push('\n');
    }

    /// `open`, then `f`, then `close`, all at the current depth.
    pub fn write_wrapped(&mut self, open: &str, close: &str, f: impl FnOnce(&mut Self)) {
        self.write_line(open);
        f(self);
        self.write_line(close);
    }

    /// `f` one level deeper.
    pub fn write_indented(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    /// `open`, then `f` one level deeper, then `close`.
    pub fn write_wrapped_indented(&mut self, open: &str, close: &str, f: impl FnOnce(&mut Self)) {
        self.write_wrapped(open, close, |w| w.write_indented(f));
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}
