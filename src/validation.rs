//! Rule contracts and validation results
//!
//! A rule works at exactly one scope: the whole document, one section, or
//! one sentence. [`Validator`] tags a boxed rule with its scope so the engine
//! knows which parts of a document to hand it.

pub mod document;
pub mod engine;
pub mod registry;
pub mod section;
pub mod sentence;

use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::config::CharacterTable;
use crate::error::CheckError;
use crate::model::{Document, Section, Sentence};

pub use document::SectionNumberRule;
pub use engine::ValidationEngine;
pub use registry::{Constructor, ValidatorRegistry};
pub use section::{ParagraphNumberRule, ParagraphStartWithRule, SectionLengthRule};
pub use sentence::{
    InvalidCharacterRule, InvalidWordRule, SentenceLengthRule, SymbolWithSpaceRule, WordNumberRule,
};

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\w+(?:['\u{2019}-]\w+)*").unwrap();
}

/// Words of a text, punctuation stripped
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    WORD.find_iter(text).map(|m| m.as_str())
}

/// A detected rule violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Name of the rule that produced the error
    pub validator: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence: Option<Sentence>,
}

impl ValidationError {
    pub fn new(validator: impl Into<String>, message: impl Into<String>, line: usize) -> Self {
        Self {
            validator: validator.into(),
            message: message.into(),
            file: None,
            line,
            sentence: None,
        }
    }

    /// An error pointing at a sentence, taking its line
    pub fn for_sentence(
        validator: impl Into<String>,
        message: impl Into<String>,
        sentence: &Sentence,
    ) -> Self {
        Self {
            sentence: Some(sentence.clone()),
            ..Self::new(validator, message, sentence.line)
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// File name, or an empty string when unknown
    pub fn file_name(&self) -> &str {
        self.file.as_deref().unwrap_or("")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] line {}: {}", self.validator, self.line, self.message)
    }
}

/// Part of a document a rule looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Document,
    Section,
    Sentence,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Document => write!(f, "document"),
            Scope::Section => write!(f, "section"),
            Scope::Sentence => write!(f, "sentence"),
        }
    }
}

pub trait DocumentRule: Send + Sync {
    fn name(&self) -> &str;

    fn check(&self, document: &Document) -> Result<Vec<ValidationError>, CheckError>;
}

pub trait SectionRule: Send + Sync {
    fn name(&self) -> &str;

    /// `document` is the section's owner, for rules that need context
    fn check(
        &self,
        section: &Section,
        document: &Document,
    ) -> Result<Vec<ValidationError>, CheckError>;
}

pub trait SentenceRule: Send + Sync {
    fn name(&self) -> &str;

    fn check(&self, sentence: &Sentence) -> Result<Vec<ValidationError>, CheckError>;
}

/// A configured rule tagged with its scope
pub enum Validator {
    Document(Box<dyn DocumentRule>),
    Section(Box<dyn SectionRule>),
    Sentence(Box<dyn SentenceRule>),
}

impl Validator {
    pub fn scope(&self) -> Scope {
        match self {
            Validator::Document(_) => Scope::Document,
            Validator::Section(_) => Scope::Section,
            Validator::Sentence(_) => Scope::Sentence,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Validator::Document(rule) => rule.name(),
            Validator::Section(rule) => rule.name(),
            Validator::Sentence(rule) => rule.name(),
        }
    }

    /// Run the rule over every unit of its scope in `document`, in document
    /// order. The first failing unit aborts the whole document.
    pub fn check_document(&self, document: &Document) -> Result<Vec<ValidationError>, CheckError> {
        match self {
            Validator::Document(rule) => rule.check(document),
            Validator::Section(rule) => {
                let mut errors = Vec::new();
                for (_, section) in document.sections() {
                    errors.extend(rule.check(section, document)?);
                }
                Ok(errors)
            }
            Validator::Sentence(rule) => {
                let mut errors = Vec::new();
                for sentence in document.sentences() {
                    errors.extend(rule.check(sentence)?);
                }
                Ok(errors)
            }
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("name", &self.name())
            .field("scope", &self.scope())
            .finish()
    }
}

/// Read-only resources shared by every validator
#[derive(Debug, Clone, Default)]
pub struct SharedResources {
    pub character_table: Option<Arc<CharacterTable>>,
}

impl SharedResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_character_table(mut self, table: CharacterTable) -> Self {
        self.character_table = Some(Arc::new(table));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentBuilder;

    struct CountingSentences;

    impl SentenceRule for CountingSentences {
        fn name(&self) -> &str {
            "Counting"
        }

        fn check(&self, sentence: &Sentence) -> Result<Vec<ValidationError>, CheckError> {
            Ok(vec![ValidationError::for_sentence(
                self.name(),
                "seen",
                sentence,
            )])
        }
    }

    struct CountingSections;

    impl SectionRule for CountingSections {
        fn name(&self) -> &str {
            "Sections"
        }

        fn check(
            &self,
            section: &Section,
            _document: &Document,
        ) -> Result<Vec<ValidationError>, CheckError> {
            Ok(vec![ValidationError::new(
                self.name(),
                section.header_text(),
                0,
            )])
        }
    }

    fn two_section_document() -> Document {
        let mut builder = DocumentBuilder::new("doc.md");
        let top = builder.add_section(1, vec![Sentence::new("Top", 1)]);
        builder.add_root(top);
        builder.add_sentence(Sentence::new("One.", 2));
        let child = builder.add_section(2, vec![Sentence::new("Child", 3)]);
        builder.attach_child(top, child);
        builder.add_sentence(Sentence::new("Two.", 4));
        builder.build()
    }

    #[test]
    fn test_words() {
        let found: Vec<_> = words("It's a well-known fact, isn't it?").collect();
        assert_eq!(found, vec!["It's", "a", "well-known", "fact", "isn't", "it"]);
        assert_eq!(words("").count(), 0);
    }

    #[test]
    fn test_sentence_scope_visits_every_sentence_in_order() {
        let doc = two_section_document();
        let validator = Validator::Sentence(Box::new(CountingSentences));
        assert_eq!(validator.scope(), Scope::Sentence);

        let lines: Vec<_> = validator
            .check_document(&doc)
            .unwrap()
            .iter()
            .map(|e| e.line)
            .collect();
        assert_eq!(lines, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_section_scope_is_pre_order() {
        let doc = two_section_document();
        let validator = Validator::Section(Box::new(CountingSections));
        let headers: Vec<_> = validator
            .check_document(&doc)
            .unwrap()
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(headers, vec!["Top", "Child"]);
    }

    #[test]
    fn test_error_constructors() {
        let sentence = Sentence::new("Bad sentence.", 7);
        let error = ValidationError::for_sentence("Rule", "too bad", &sentence).with_file("a.md");
        assert_eq!(error.line, 7);
        assert_eq!(error.file_name(), "a.md");
        assert_eq!(error.sentence.as_ref().map(|s| s.content.as_str()), Some("Bad sentence."));
        assert_eq!(ValidationError::new("Rule", "m", 1).file_name(), "");
    }
}
