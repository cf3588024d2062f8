use std::path::PathBuf;

use colored::Colorize;

use self::lexer::Span;

pub mod ast;
pub mod lexer;
pub mod parser;

#[derive(Debug)]
pub struct SourceFile {
    pub contents: String,
    pub origin: SourceFileOrigin,
}

impl SourceFile {
    pub fn memory(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            origin: SourceFileOrigin::Memory,
        }
    }

    pub fn value_of_span(&self, span: Span) -> &str {
        &self.contents[span.start..span.end]
    }

    /// 1-based line of the given byte offset
    pub fn row_for_position(&self, position: usize) -> usize {
        let position = position.min(self.contents.len());

        self.contents.as_bytes()[..position]
            .iter()
            .filter(|b| **b == b'\n')
            .count()
            + 1
    }

    /// 1-based column of the given byte offset
    pub fn column_for_position(&self, position: usize) -> usize {
        let position = position.min(self.contents.len());
        let line_start = self.contents[..position]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);

        position - line_start + 1
    }

    pub fn format_span_position(&self, span: Span) -> String {
        format!(
            "{}:{}:{}",
            self.origin,
            self.row_for_position(span.start),
            self.column_for_position(span.start)
        )
    }

    /// Renders the line containing `span` with the spanned columns underlined.
    pub fn highlight_span(&self, span: Span) -> String {
        let row = self.row_for_position(span.start);
        let column = self.column_for_position(span.start);
        let line = self.contents.lines().nth(row - 1).unwrap_or_default();

        // Carets are laid out in characters, columns count bytes
        let prefix = line.get(..column - 1).unwrap_or(line);
        let underlined = line.get(column - 1..).unwrap_or_default();
        let padding = prefix.chars().count();

        // Spans crossing a newline are only underlined up to the end of the
        // first line
        let spanned = span.end.saturating_sub(span.start);
        let width = underlined
            .char_indices()
            .take_while(|(offset, _)| *offset < spanned)
            .count()
            .max(1);

        let gutter = row.to_string();

        format!(
            "{} {} {}\n{} {} {}{}",
            gutter.blue(),
            "|".blue(),
            line,
            " ".repeat(gutter.len()),
            "|".blue(),
            " ".repeat(padding),
            "^".repeat(width).red()
        )
    }
}

#[derive(Debug)]
pub enum SourceFileOrigin {
    Memory,
    File(PathBuf),
}

impl core::fmt::Display for SourceFileOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFileOrigin::Memory => f.write_str("<memory>"),
            SourceFileOrigin::File(path) => f.write_fmt(format_args!("{}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_one_based() {
        let source = SourceFile::memory("int x;\nx = 1;\n");

        assert_eq!(source.row_for_position(0), 1);
        assert_eq!(source.column_for_position(0), 1);
        assert_eq!(source.row_for_position(7), 2);
        assert_eq!(source.column_for_position(9), 3);
        assert_eq!(
            source.format_span_position(Span::new(7, 8)),
            "<memory>:2:1"
        );
    }

    #[test]
    fn highlight_underlines_span() {
        let source = SourceFile::memory("int x;\nx = y + 1;\n");
        let highlighted = strip_ansi_escapes::strip_str(source.highlight_span(Span::new(11, 12)));

        assert_eq!(highlighted, "2 | x = y + 1;\n  |     ^");
    }

    #[test]
    fn highlight_counts_characters_not_bytes() {
        let source = SourceFile::memory("print \"héllo\" $;");
        let dollar = source.contents.find('$').unwrap();
        let highlighted =
            strip_ansi_escapes::strip_str(source.highlight_span(Span::new(dollar, dollar + 1)));

        assert_eq!(highlighted, "1 | print \"héllo\" $;\n  |               ^");

        let word = source.contents.find('h').unwrap();
        let highlighted =
            strip_ansi_escapes::strip_str(source.highlight_span(Span::new(word, word + 6)));

        assert_eq!(highlighted, "1 | print \"héllo\" $;\n  |        ^^^^^");
    }
}
