//! Sentence-scope rules

use std::sync::Arc;

use crate::config::{CharacterTable, ConfigNode};
use crate::error::{CheckError, ConfigError};
use crate::model::Sentence;

use super::{words, SentenceRule, SharedResources, ValidationError};

pub const DEFAULT_MAX_SENTENCE_LENGTH: usize = 30;
pub const DEFAULT_MAX_WORD_NUMBER: usize = 30;

/// Flags sentences longer than `max_length` characters
#[derive(Debug, Clone)]
pub struct SentenceLengthRule {
    max_length: usize,
}

impl SentenceLengthRule {
    pub const NAME: &'static str = "SentenceLength";

    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    pub fn from_config(node: ConfigNode<'_>) -> Result<Self, ConfigError> {
        Ok(Self::new(
            node.usize_or("max_length", DEFAULT_MAX_SENTENCE_LENGTH)?,
        ))
    }
}

impl SentenceRule for SentenceLengthRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check(&self, sentence: &Sentence) -> Result<Vec<ValidationError>, CheckError> {
        let length = sentence.content.chars().count();
        if length <= self.max_length {
            return Ok(Vec::new());
        }
        Ok(vec![ValidationError::for_sentence(
            Self::NAME,
            format!(
                "The length of the sentence ({}) exceeds the maximum of {}.",
                length, self.max_length
            ),
            sentence,
        )])
    }
}

/// Flags sentences with more than `max_num` words
#[derive(Debug, Clone)]
pub struct WordNumberRule {
    max_words: usize,
}

impl WordNumberRule {
    pub const NAME: &'static str = "WordNumber";

    pub fn new(max_words: usize) -> Self {
        Self { max_words }
    }

    pub fn from_config(node: ConfigNode<'_>) -> Result<Self, ConfigError> {
        Ok(Self::new(node.usize_or("max_num", DEFAULT_MAX_WORD_NUMBER)?))
    }
}

impl SentenceRule for WordNumberRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check(&self, sentence: &Sentence) -> Result<Vec<ValidationError>, CheckError> {
        let count = words(&sentence.content).count();
        if count <= self.max_words {
            return Ok(Vec::new());
        }
        Ok(vec![ValidationError::for_sentence(
            Self::NAME,
            format!(
                "The number of words ({}) exceeds the maximum of {}.",
                count, self.max_words
            ),
            sentence,
        )])
    }
}

/// Flags variants of table characters, at most once per table entry
#[derive(Debug, Clone)]
pub struct InvalidCharacterRule {
    table: Arc<CharacterTable>,
}

impl InvalidCharacterRule {
    pub const NAME: &'static str = "InvalidCharacter";

    pub fn new(table: Arc<CharacterTable>) -> Self {
        Self { table }
    }

    pub fn from_resources(resources: &SharedResources) -> Result<Self, ConfigError> {
        resources
            .character_table
            .clone()
            .map(Self::new)
            .ok_or_else(|| ConfigError::MissingResource {
                validator: Self::NAME.to_string(),
                resource: "character table".to_string(),
            })
    }
}

impl SentenceRule for InvalidCharacterRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check(&self, sentence: &Sentence) -> Result<Vec<ValidationError>, CheckError> {
        let errors = self
            .table
            .iter()
            .filter_map(|character| {
                character
                    .invalid_chars
                    .iter()
                    .find(|invalid| sentence.content.contains(invalid.as_str()))
            })
            .map(|invalid| {
                ValidationError::for_sentence(
                    Self::NAME,
                    format!("Invalid symbol found: \"{}\"", invalid),
                    sentence,
                )
            })
            .collect();
        Ok(errors)
    }
}

/// Requires whitespace around table characters marked `before-space` or
/// `after-space`. The start and end of a sentence count as space.
#[derive(Debug, Clone)]
pub struct SymbolWithSpaceRule {
    table: Arc<CharacterTable>,
}

impl SymbolWithSpaceRule {
    pub const NAME: &'static str = "SymbolWithSpace";

    pub fn new(table: Arc<CharacterTable>) -> Self {
        Self { table }
    }

    pub fn from_resources(resources: &SharedResources) -> Result<Self, ConfigError> {
        resources
            .character_table
            .clone()
            .map(Self::new)
            .ok_or_else(|| ConfigError::MissingResource {
                validator: Self::NAME.to_string(),
                resource: "character table".to_string(),
            })
    }
}

impl SentenceRule for SymbolWithSpaceRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check(&self, sentence: &Sentence) -> Result<Vec<ValidationError>, CheckError> {
        let content = sentence.content.as_str();
        let mut errors = Vec::new();

        for character in self.table.iter() {
            if character.value.is_empty() || !(character.before_space || character.after_space) {
                continue;
            }
            for (start, symbol) in content.match_indices(character.value.as_str()) {
                let before = content[..start].chars().next_back();
                let after = content[start + symbol.len()..].chars().next();

                if character.before_space && before.map_or(false, |c| !c.is_whitespace()) {
                    errors.push(ValidationError::for_sentence(
                        Self::NAME,
                        format!("Need whitespace before symbol \"{}\"", symbol),
                        sentence,
                    ));
                }
                if character.after_space && after.map_or(false, |c| !c.is_whitespace()) {
                    errors.push(ValidationError::for_sentence(
                        Self::NAME,
                        format!("Need whitespace after symbol \"{}\"", symbol),
                        sentence,
                    ));
                }
            }
        }
        Ok(errors)
    }
}

/// Flags words from a configured list, compared case-insensitively
#[derive(Debug, Clone)]
pub struct InvalidWordRule {
    words: Vec<String>,
}

impl InvalidWordRule {
    pub const NAME: &'static str = "InvalidWord";

    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    pub fn from_config(node: ConfigNode<'_>) -> Result<Self, ConfigError> {
        let list = node.required("list")?;
        let rule = Self::new(list.split(','));
        if rule.words.is_empty() {
            return Err(ConfigError::InvalidParameter {
                validator: node.name().to_string(),
                parameter: "list".to_string(),
                value: list.to_string(),
            });
        }
        Ok(rule)
    }
}

impl SentenceRule for InvalidWordRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check(&self, sentence: &Sentence) -> Result<Vec<ValidationError>, CheckError> {
        let errors = words(&sentence.content)
            .filter(|word| self.words.contains(&word.to_lowercase()))
            .map(|word| {
                ValidationError::for_sentence(
                    Self::NAME,
                    format!("Invalid word found: \"{}\"", word),
                    sentence,
                )
            })
            .collect();
        Ok(errors)
    }
}
