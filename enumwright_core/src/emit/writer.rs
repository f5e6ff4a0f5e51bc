/// Line-oriented text buffer with an indentation stack.
///
/// Every line ends in `\n`; the caller converts line endings once the whole
/// file has been assembled.
#[derive(Debug, Clone)]
pub struct CodeWriter {
    out: String,
    indent_unit: String,
    depth: usize,
}

impl CodeWriter {
    pub fn new(indent_unit: &str) -> Self {
        Self {
            out: String::new(),
            indent_unit: indent_unit.to_string(),
            depth: 0,
        }
    }

    /// Writes one indented line. Empty text yields an empty line with no
    /// trailing whitespace.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(&self.indent_unit);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
        self
    }

    pub fn lines<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.line(line);
        }
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.out.push('\n');
        self
    }

    pub fn indent(&mut self) -> &mut Self {
        self.depth += 1;
        self
    }

    pub fn dedent(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self
    }

    /// Writes `header` and an opening brace on its own line, then indents.
    pub fn open(&mut self, header: impl AsRef<str>) -> &mut Self {
        self.line(header);
        self.line("{");
        self.indent()
    }

    /// Dedents and writes the closing line (`}` or `};`).
    pub fn close(&mut self, closer: &str) -> &mut Self {
        self.dedent();
        self.line(closer)
    }

    /// Writes a single-statement function body on separate lines.
    pub fn function(&mut self, signature: impl AsRef<str>, statement: impl AsRef<str>) -> &mut Self {
        self.open(signature);
        self.line(statement);
        self.close("}")
    }

    /// Appends pre-rendered text verbatim.
    pub fn raw(&mut self, text: &str) -> &mut Self {
        self.out.push_str(text);
        self
    }

    pub fn into_string(self) -> String {
        self.out
    }
}
