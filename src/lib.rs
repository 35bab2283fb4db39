//! Prose Lint
//!
//! Checks Markdown, wiki and plain text documents against configurable style
//! and structure rules.

pub mod config;
pub mod diagnostics;
pub mod distributor;
pub mod error;
pub mod model;
pub mod parser;
pub mod sentence;
pub mod validation;

pub use config::{
    load_character_table, load_configuration, load_configuration_file, CharacterTable,
    ConfigNode, Configuration,
};
pub use diagnostics::{Diagnostic, DiagnosticLevel, Diagnostics};
pub use distributor::{
    CollectingDistributor, ResultDistributor, ResultFormat, WriterDistributor,
};
pub use error::{CheckError, ConfigError, ParseError};
pub use model::{Document, DocumentBuilder, Paragraph, Section, SectionId, Sentence};
pub use parser::{InputFormat, MarkupNode, MarkupParser, Parser};
pub use sentence::{CandidateSpan, SentenceExtractor, Terminators};
pub use validation::{
    Scope, SharedResources, ValidationEngine, ValidationError, Validator, ValidatorRegistry,
};
