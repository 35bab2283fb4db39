//! Document-scope rules

use crate::config::ConfigNode;
use crate::error::{CheckError, ConfigError};
use crate::model::Document;

use super::{DocumentRule, ValidationError};

pub const DEFAULT_MAX_SECTIONS: usize = 100;

/// Flags documents with more than `max_num` headed sections. The preamble
/// before the first header is not counted.
#[derive(Debug, Clone)]
pub struct SectionNumberRule {
    max_sections: usize,
}

impl SectionNumberRule {
    pub const NAME: &'static str = "MaxSectionNumber";

    pub fn new(max_sections: usize) -> Self {
        Self { max_sections }
    }

    pub fn from_config(node: ConfigNode<'_>) -> Result<Self, ConfigError> {
        Ok(Self::new(node.usize_or("max_num", DEFAULT_MAX_SECTIONS)?))
    }
}

impl DocumentRule for SectionNumberRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check(&self, document: &Document) -> Result<Vec<ValidationError>, CheckError> {
        let count = document
            .sections()
            .filter(|(_, section)| !section.is_preamble())
            .count();
        if count <= self.max_sections {
            return Ok(Vec::new());
        }
        Ok(vec![ValidationError::new(
            Self::NAME,
            format!(
                "The number of sections ({}) exceeds the maximum of {}.",
                count, self.max_sections
            ),
            0,
        )])
    }
}
