//! Runs configured validators over documents
//!
//! Every (validator, document) pair is isolated: a rule that returns an
//! error or panics is logged and contributes nothing, and the run carries on
//! with the next pair.

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, error, info, warn};
use rayon::prelude::*;

use crate::config::Configuration;
use crate::distributor::ResultDistributor;
use crate::error::ConfigError;
use crate::model::Document;

use super::registry::ValidatorRegistry;
use super::{SharedResources, ValidationError, Validator};

#[derive(Debug, Default)]
pub struct ValidationEngine {
    validators: Vec<Validator>,
}

impl ValidationEngine {
    pub fn new(validators: Vec<Validator>) -> Self {
        Self { validators }
    }

    /// One validator per child of the configuration root, in declaration
    /// order. The first construction failure aborts setup.
    pub fn from_configuration(
        config: &Configuration,
        resources: &SharedResources,
        registry: &ValidatorRegistry,
    ) -> Result<Self, ConfigError> {
        let validators = config
            .root()
            .children()
            .map(|node| registry.create(node, resources))
            .collect::<Result<Vec<_>, _>>()?;

        info!("Configured {} validators", validators.len());
        Ok(Self::new(validators))
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// Check every document with every validator. Errors are returned
    /// validator-major, document-minor, and reported in the same order.
    pub fn check(
        &self,
        documents: &[Document],
        distributor: &mut dyn ResultDistributor,
    ) -> Vec<ValidationError> {
        self.start(documents, distributor);

        let mut errors = Vec::new();
        for validator in &self.validators {
            for document in documents {
                for error in run_pair(validator, document) {
                    signal(distributor.report(&error), "report");
                    errors.push(error);
                }
            }
        }

        self.finish(&errors, distributor);
        errors
    }

    /// Same result and order as [`check`](Self::check), with the documents
    /// of each validator checked on the rayon pool
    pub fn check_parallel(
        &self,
        documents: &[Document],
        distributor: &mut dyn ResultDistributor,
    ) -> Vec<ValidationError> {
        self.start(documents, distributor);

        let mut errors = Vec::new();
        for validator in &self.validators {
            let per_document: Vec<Vec<ValidationError>> = documents
                .par_iter()
                .map(|document| run_pair(validator, document))
                .collect();

            for error in per_document.into_iter().flatten() {
                signal(distributor.report(&error), "report");
                errors.push(error);
            }
        }

        self.finish(&errors, distributor);
        errors
    }

    fn start(&self, documents: &[Document], distributor: &mut dyn ResultDistributor) {
        if documents.is_empty() {
            warn!("No documents to check");
        }
        debug!(
            "Checking {} documents with {} validators",
            documents.len(),
            self.validators.len()
        );
        signal(distributor.begin(), "begin");
    }

    fn finish(&self, errors: &[ValidationError], distributor: &mut dyn ResultDistributor) {
        signal(distributor.end(), "end");
        info!("Validation finished with {} errors", errors.len());
    }
}

fn signal(result: io::Result<()>, what: &str) {
    if let Err(e) = result {
        error!("Result distributor failed on {}: {}", what, e);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

/// Errors of one pair, or nothing when the rule fails
fn run_pair(validator: &Validator, document: &Document) -> Vec<ValidationError> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| validator.check_document(document)));

    match outcome {
        Ok(Ok(mut errors)) => {
            if !document.name().is_empty() {
                for error in errors.iter_mut().filter(|e| e.file_name().is_empty()) {
                    error.file = Some(document.name().to_string());
                }
            }
            errors
        }
        Ok(Err(e)) => {
            error!(
                "Validator '{}' failed on document '{}': {}",
                validator.name(),
                document.name(),
                e
            );
            Vec::new()
        }
        Err(payload) => {
            error!(
                "Validator '{}' panicked on document '{}': {}",
                validator.name(),
                document.name(),
                panic_message(payload.as_ref())
            );
            Vec::new()
        }
    }
}
