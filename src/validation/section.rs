//! Section-scope rules

use crate::config::ConfigNode;
use crate::error::{CheckError, ConfigError};
use crate::model::{Document, Section};

use super::{SectionRule, ValidationError};

pub const DEFAULT_MAX_SECTION_CHARS: usize = 1000;
pub const DEFAULT_MAX_PARAGRAPHS: usize = 6;

/// Line of the header, or of the first sentence for headerless sections
fn section_line(section: &Section) -> usize {
    section.sentences().next().map_or(0, |s| s.line)
}

/// Flags sections whose body text exceeds `max_char_num` characters
#[derive(Debug, Clone)]
pub struct SectionLengthRule {
    max_chars: usize,
}

impl SectionLengthRule {
    pub const NAME: &'static str = "SectionLength";

    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn from_config(node: ConfigNode<'_>) -> Result<Self, ConfigError> {
        Ok(Self::new(
            node.usize_or("max_char_num", DEFAULT_MAX_SECTION_CHARS)?,
        ))
    }
}

impl SectionRule for SectionLengthRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check(
        &self,
        section: &Section,
        _document: &Document,
    ) -> Result<Vec<ValidationError>, CheckError> {
        // header sentences are not body text
        let length: usize = section
            .blocks()
            .flat_map(|block| block.sentences())
            .map(|s| s.content.chars().count())
            .sum();
        if length <= self.max_chars {
            return Ok(Vec::new());
        }
        Ok(vec![ValidationError::new(
            Self::NAME,
            format!(
                "The number of characters in the section ({}) exceeds the maximum of {}.",
                length, self.max_chars
            ),
            section_line(section),
        )])
    }
}

/// Flags sections with more than `max_paragraph_num` paragraphs
#[derive(Debug, Clone)]
pub struct ParagraphNumberRule {
    max_paragraphs: usize,
}

impl ParagraphNumberRule {
    pub const NAME: &'static str = "ParagraphNumber";

    pub fn new(max_paragraphs: usize) -> Self {
        Self { max_paragraphs }
    }

    pub fn from_config(node: ConfigNode<'_>) -> Result<Self, ConfigError> {
        Ok(Self::new(
            node.usize_or("max_paragraph_num", DEFAULT_MAX_PARAGRAPHS)?,
        ))
    }
}

impl SectionRule for ParagraphNumberRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check(
        &self,
        section: &Section,
        _document: &Document,
    ) -> Result<Vec<ValidationError>, CheckError> {
        let count = section.paragraphs().len();
        if count <= self.max_paragraphs {
            return Ok(Vec::new());
        }
        Ok(vec![ValidationError::new(
            Self::NAME,
            format!(
                "The number of paragraphs ({}) exceeds the maximum of {}.",
                count, self.max_paragraphs
            ),
            section_line(section),
        )])
    }
}

/// Requires every paragraph to open with `start_from` (a single space unless
/// configured). The paragraph's recorded indent counts as part of its text;
/// an empty `start_from` disables the check.
#[derive(Debug, Clone)]
pub struct ParagraphStartWithRule {
    start_from: String,
}

impl ParagraphStartWithRule {
    pub const NAME: &'static str = "ParagraphStartWith";
    pub const DEFAULT_START: &'static str = " ";

    pub fn new(start_from: impl Into<String>) -> Self {
        Self {
            start_from: start_from.into(),
        }
    }

    pub fn from_config(node: ConfigNode<'_>) -> Result<Self, ConfigError> {
        Ok(Self::new(node.str_or("start_from", Self::DEFAULT_START)))
    }
}

impl SectionRule for ParagraphStartWithRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check(
        &self,
        section: &Section,
        _document: &Document,
    ) -> Result<Vec<ValidationError>, CheckError> {
        if self.start_from.is_empty() {
            return Ok(Vec::new());
        }

        let errors = section
            .paragraphs()
            .iter()
            .filter(|paragraph| {
                paragraph
                    .opening()
                    .map_or(false, |text| !text.starts_with(&self.start_from))
            })
            .filter_map(|paragraph| paragraph.sentences.first())
            .map(|first| {
                ValidationError::for_sentence(
                    Self::NAME,
                    format!(
                        "Paragraph does not start with \"{}\".",
                        self.start_from
                    ),
                    first,
                )
            })
            .collect();
        Ok(errors)
    }
}
