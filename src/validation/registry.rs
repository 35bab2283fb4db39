//! Name-to-constructor registry for validators

use std::collections::HashMap;

use log::debug;

use crate::config::ConfigNode;
use crate::error::ConfigError;

use super::document::SectionNumberRule;
use super::section::{ParagraphNumberRule, ParagraphStartWithRule, SectionLengthRule};
use super::sentence::{
    InvalidCharacterRule, InvalidWordRule, SentenceLengthRule, SymbolWithSpaceRule, WordNumberRule,
};
use super::{SharedResources, Validator};

/// Builds one validator from its configuration node
pub type Constructor =
    Box<dyn Fn(ConfigNode<'_>, &SharedResources) -> Result<Validator, ConfigError> + Send + Sync>;

/// Registry for validator constructors
#[derive(Default)]
pub struct ValidatorRegistry {
    constructors: HashMap<String, Constructor>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in rules
    pub fn with_builtin_validators() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_validators();
        registry
    }

    /// Registers a constructor, replacing any previous one with that name
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(ConfigNode<'_>, &SharedResources) -> Result<Validator, ConfigError>
            + Send
            + Sync
            + 'static,
    {
        self.constructors.insert(name.into(), Box::new(constructor));
    }

    pub fn register_builtin_validators(&mut self) {
        self.register(SentenceLengthRule::NAME, |node, _| {
            Ok(Validator::Sentence(Box::new(
                SentenceLengthRule::from_config(node)?,
            )))
        });
        for name in ["MaxWordNumber", WordNumberRule::NAME] {
            self.register(name, |node, _| {
                Ok(Validator::Sentence(Box::new(WordNumberRule::from_config(
                    node,
                )?)))
            });
        }
        self.register(InvalidCharacterRule::NAME, |_, resources| {
            Ok(Validator::Sentence(Box::new(
                InvalidCharacterRule::from_resources(resources)?,
            )))
        });
        self.register(SymbolWithSpaceRule::NAME, |_, resources| {
            Ok(Validator::Sentence(Box::new(
                SymbolWithSpaceRule::from_resources(resources)?,
            )))
        });
        self.register(InvalidWordRule::NAME, |node, _| {
            Ok(Validator::Sentence(Box::new(InvalidWordRule::from_config(
                node,
            )?)))
        });
        self.register(SectionLengthRule::NAME, |node, _| {
            Ok(Validator::Section(Box::new(SectionLengthRule::from_config(
                node,
            )?)))
        });
        self.register(ParagraphNumberRule::NAME, |node, _| {
            Ok(Validator::Section(Box::new(
                ParagraphNumberRule::from_config(node)?,
            )))
        });
        self.register(ParagraphStartWithRule::NAME, |node, _| {
            Ok(Validator::Section(Box::new(
                ParagraphStartWithRule::from_config(node)?,
            )))
        });
        self.register(SectionNumberRule::NAME, |node, _| {
            Ok(Validator::Document(Box::new(SectionNumberRule::from_config(
                node,
            )?)))
        });
    }

    /// Build the validator named by `node`
    pub fn create(
        &self,
        node: ConfigNode<'_>,
        resources: &SharedResources,
    ) -> Result<Validator, ConfigError> {
        let constructor =
            self.constructors
                .get(node.name())
                .ok_or_else(|| ConfigError::UnknownValidator {
                    name: node.name().to_string(),
                })?;

        let validator = constructor(node, resources)?;
        debug!(
            "Created {} validator '{}' from '{}'",
            validator.scope(),
            validator.name(),
            node.name()
        );
        Ok(validator)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names, sorted
    pub fn registered_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.constructors.keys().cloned().collect();
        names.sort();
        names
    }
}
