//! Markup parsing front end
//!
//! Each input format has a [`MarkupParser`] that produces a [`MarkupNode`]
//! tree. [`Parser`] runs one of them and compiles the tree into a
//! [`Document`] with line numbers.

use log::debug;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::diagnostics::Diagnostics;
use crate::error::ParseError;
use crate::model::Document;
use crate::sentence::SentenceExtractor;

pub mod compiler;
pub mod markdown;
pub mod markup;
pub mod plain;
pub mod wiki;

pub use compiler::compile;
pub use markdown::MarkdownParser;
pub use markup::{MarkupNode, OmittedKind, SpecialText};
pub use plain::PlainTextParser;
pub use wiki::WikiParser;

/// Turns raw input into the closed markup tree
pub trait MarkupParser: Send + Sync {
    fn parse(&self, input: &str) -> Result<MarkupNode, ParseError>;
}

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputFormat {
    Markdown,
    Wiki,
    Plain,
}

impl InputFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension().and_then(|ext| ext.to_str())?;
        match extension.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Some(InputFormat::Markdown),
            "wiki" => Some(InputFormat::Wiki),
            "txt" | "text" => Some(InputFormat::Plain),
            _ => None,
        }
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(InputFormat::Markdown),
            "wiki" => Ok(InputFormat::Wiki),
            "plain" | "text" => Ok(InputFormat::Plain),
            other => Err(format!("unknown input format '{}'", other)),
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Markdown => write!(f, "markdown"),
            InputFormat::Wiki => write!(f, "wiki"),
            InputFormat::Plain => write!(f, "plain"),
        }
    }
}

/// Byte-offset to line-number lookup
///
/// Holds the cumulative end offset (newline included) of every source line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineIndex {
    ends: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut ends = Vec::new();
        let mut total = 0;
        for line in text.split_inclusive('\n') {
            total += line.len();
            ends.push(total);
        }
        Self { ends }
    }

    pub fn from_boundaries(ends: Vec<usize>) -> Self {
        Self { ends }
    }

    /// 0-based index of the line holding `offset`: the first boundary that
    /// is greater than the offset
    pub fn line_index(&self, offset: usize) -> usize {
        self.ends.partition_point(|&end| end <= offset)
    }

    /// 1-based line number of `offset`
    pub fn line_number(&self, offset: usize) -> usize {
        self.line_index(offset) + 1
    }

    pub fn line_count(&self) -> usize {
        self.ends.len()
    }
}

/// Format adapter plus the sentence extractor, producing documents
pub struct Parser {
    format: InputFormat,
    markup: Box<dyn MarkupParser>,
    extractor: SentenceExtractor,
}

impl Parser {
    pub fn new(format: InputFormat) -> Self {
        Self::with_extractor(format, SentenceExtractor::default())
    }

    pub fn with_extractor(format: InputFormat, extractor: SentenceExtractor) -> Self {
        let markup: Box<dyn MarkupParser> = match format {
            InputFormat::Markdown => Box::new(MarkdownParser::new()),
            InputFormat::Wiki => Box::new(WikiParser::new()),
            InputFormat::Plain => Box::new(PlainTextParser::new()),
        };

        Self {
            format,
            markup,
            extractor,
        }
    }

    pub fn format(&self) -> InputFormat {
        self.format
    }

    pub fn parse(
        &self,
        name: &str,
        content: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Document, ParseError> {
        let tree = self.markup.parse(content)?;
        let lines = LineIndex::new(content);
        let document = compile(name, &tree, &lines, &self.extractor, diagnostics);

        debug!(
            "Parsed {} document '{}' ({} chars, {} sections)",
            self.format,
            name,
            content.len(),
            document.section_count()
        );

        Ok(document)
    }

    /// Read and parse a file; the document is named after the path
    pub fn parse_file(
        &self,
        path: &Path,
        diagnostics: &mut Diagnostics,
    ) -> Result<Document, ParseError> {
        let bytes = std::fs::read(path).map_err(|source| ParseError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8(bytes).map_err(|_| ParseError::InvalidEncoding {
            path: path.to_path_buf(),
        })?;

        self.parse(&path.display().to_string(), &content, diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_line_index_lookup() {
        let lines = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(lines.line_count(), 4);
        assert_eq!(lines.line_index(0), 0);
        assert_eq!(lines.line_index(2), 0);
        assert_eq!(lines.line_index(3), 1);
        assert_eq!(lines.line_index(6), 2);
        assert_eq!(lines.line_number(7), 4);
    }

    #[test]
    fn test_line_index_from_boundaries() {
        let lines = LineIndex::from_boundaries(vec![5, 10, 15]);
        assert_eq!(lines.line_index(4), 0);
        assert_eq!(lines.line_index(5), 1);
        assert_eq!(lines.line_index(14), 2);
    }

    #[test]
    fn test_input_format_detection() {
        assert_eq!(
            InputFormat::from_path(Path::new("guide.md")),
            Some(InputFormat::Markdown)
        );
        assert_eq!(
            InputFormat::from_path(Path::new("notes.WIKI")),
            Some(InputFormat::Wiki)
        );
        assert_eq!(InputFormat::from_path(Path::new("image.png")), None);
        assert_eq!("plain".parse::<InputFormat>(), Ok(InputFormat::Plain));
        assert!("rtf".parse::<InputFormat>().is_err());
    }

    #[test]
    fn test_parse_file_names_document_after_path() {
        let mut temp_file = NamedTempFile::with_suffix(".md").unwrap();
        temp_file.write_all(b"# Title\n\nBody text.\n").unwrap();
        temp_file.flush().unwrap();

        let parser = Parser::new(InputFormat::Markdown);
        let mut diagnostics = Diagnostics::new();
        let doc = parser.parse_file(temp_file.path(), &mut diagnostics).unwrap();

        assert_eq!(doc.name(), temp_file.path().display().to_string());
        assert_eq!(doc.sentences().count(), 2);
    }

    #[test]
    fn test_parse_file_rejects_invalid_utf8() {
        let mut temp_file = NamedTempFile::with_suffix(".txt").unwrap();
        temp_file.write_all(&[0xff, 0xfe, 0x00]).unwrap();
        temp_file.flush().unwrap();

        let parser = Parser::new(InputFormat::Plain);
        let result = parser.parse_file(temp_file.path(), &mut Diagnostics::new());
        assert!(matches!(result, Err(ParseError::InvalidEncoding { .. })));
    }

    #[test]
    fn test_parse_missing_file() {
        let parser = Parser::new(InputFormat::Plain);
        let result = parser.parse_file(Path::new("/no/such/file.txt"), &mut Diagnostics::new());
        assert!(matches!(result, Err(ParseError::Read { .. })));
    }
}
