//! Indentation-aware text printer used by all generators.

const INDENT: &str = "  ";

#[derive(Debug, Default)]
pub struct CodeWriter {
    buf: String,
    depth: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one line at the current depth. Empty text writes a bare newline.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buf.push_str(INDENT);
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.line("")
    }

    /// Writes every line of `text` at the current depth
    pub fn lines(&mut self, text: &str) -> &mut Self {
        for line in text.lines() {
            self.line(line);
        }
        self
    }

    /// Writes each non-empty item of `items` as its own line
    pub fn each<I, S>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for item in items {
            if !item.as_ref().is_empty() {
                self.lines(item.as_ref());
            }
        }
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

    /// Writes `open`, the body one level deeper, then `close`
    pub fn block(&mut self, open: &str, close: &str, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.line(open);
        self.indent();
        body(self);
        self.dedent();
        self.line(close)
    }

    /// Runs `body` one level deeper without surrounding lines
    pub fn nested(&mut self, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.indent();
        body(self);
        self.dedent()
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// Single-quoted TypeScript string literal
pub fn ts_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Text safe to place between JSX tags or inside a double-quoted attribute
pub fn jsx_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('{', "&#123;")
        .replace('}', "&#125;")
        .replace('"', "&quot;")
}

/// JSX string attribute value, braced when it cannot be written literally
pub fn jsx_attr(value: &str) -> String {
    if value.contains(['"', '{', '}', '\\', '\n']) {
        format!("{{{}}}", ts_string(value))
    } else {
        format!("\"{value}\"")
    }
}

pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Object key: bare when it is an identifier, quoted otherwise
pub fn ts_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        ts_string(name)
    }
}

/// Property access: `obj.name` or `obj['na-me']`
pub fn ts_access(object: &str, name: &str) -> String {
    if is_identifier(name) {
        format!("{object}.{name}")
    } else {
        format!("{object}[{}]", ts_string(name))
    }
}

/// Converts `purchase_orders` or `purchase-orders` into `PurchaseOrders`
pub fn pascal_case(name: &str) -> String {
    let converted: String = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect();

    match converted.chars().next() {
        None => "Table".to_string(),
        Some(c) if c.is_ascii_digit() => format!("T{converted}"),
        Some(_) => converted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_blocks_indent() {
        let mut w = CodeWriter::new();
        w.block("export interface A {", "}", |w| {
            w.line("id: string;");
            w.block("meta: {", "};", |w| {
                w.line("x: number;");
            });
        });

        assert_eq!(
            w.finish(),
            "export interface A {\n  id: string;\n  meta: {\n    x: number;\n  };\n}\n"
        );
    }

    #[test]
    fn blank_lines_carry_no_indent() {
        let mut w = CodeWriter::new();
        w.nested(|w| {
            w.lines("a\n\nb");
        });
        assert_eq!(w.finish(), "  a\n\n  b\n");
    }

    #[test]
    fn string_literals_escape_quotes() {
        assert_eq!(ts_string("it's"), r"'it\'s'");
        assert_eq!(ts_string(r"a\b"), r"'a\\b'");
    }

    #[test]
    fn keys_and_access() {
        assert_eq!(ts_key("amount"), "amount");
        assert_eq!(ts_key("unit-price"), "'unit-price'");
        assert_eq!(ts_access("row", "amount"), "row.amount");
        assert_eq!(ts_access("row", "2nd"), "row['2nd']");
    }

    #[test]
    fn case_conversion() {
        assert_eq!(pascal_case("invoices"), "Invoices");
        assert_eq!(pascal_case("purchase_orders"), "PurchaseOrders");
        assert_eq!(pascal_case("stock-corrections"), "StockCorrections");
        assert_eq!(pascal_case("2024_stats"), "T2024Stats");
    }

    #[test]
    fn jsx_attributes() {
        assert_eq!(jsx_attr("amount"), "\"amount\"");
        assert_eq!(jsx_attr("say \"hi\""), "{'say \"hi\"'}");
    }

    #[test]
    fn jsx_text_escapes_braces() {
        assert_eq!(jsx_text("a < {b}"), "a &lt; &#123;b&#125;");
    }
}
