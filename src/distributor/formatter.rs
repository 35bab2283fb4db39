//! Text renderings of a [`ValidationError`]

use html_escape::encode_text;
use log::warn;

use crate::validation::ValidationError;

pub trait Formatter: Send + Sync {
    /// Written once before the first error
    fn header(&self) -> Option<&str> {
        None
    }

    /// Written once after the last error
    fn footer(&self) -> Option<&str> {
        None
    }

    /// Placed between consecutive errors, before the line break
    fn separator(&self) -> Option<&str> {
        None
    }

    fn format(&self, error: &ValidationError) -> String;
}

/// `ValidationError[<rule>][<file> : <line> (<message>)] at line: <sentence>`
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl Formatter for PlainFormatter {
    fn format(&self, error: &ValidationError) -> String {
        let mut out = format!("ValidationError[{}][", error.validator);
        if !error.file_name().is_empty() {
            out.push_str(error.file_name());
            out.push_str(" : ");
        }
        out.push_str(&format!("{} ({})]", error.line, error.message));
        if let Some(sentence) = &error.sentence {
            out.push_str(" at line: ");
            out.push_str(&sentence.content);
        }
        out
    }
}

/// One `<error>` element per error inside `<validation-result>`
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlFormatter;

fn element(out: &mut String, name: &str, text: &str) {
    out.push('<');
    out.push_str(name);
    out.push('>');
    out.push_str(&encode_text(text));
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

impl Formatter for XmlFormatter {
    fn header(&self) -> Option<&str> {
        Some("<validation-result>")
    }

    fn footer(&self) -> Option<&str> {
        Some("</validation-result>")
    }

    fn format(&self, error: &ValidationError) -> String {
        let mut out = String::from("<error>");
        element(&mut out, "validator", &error.validator);
        if !error.message.is_empty() {
            element(&mut out, "message", &error.message);
        }
        if !error.file_name().is_empty() {
            element(&mut out, "file", error.file_name());
        }
        element(&mut out, "lineNum", &error.line.to_string());
        if let Some(sentence) = error.sentence.as_ref().filter(|s| !s.content.is_empty()) {
            element(&mut out, "sentence", &sentence.content);
        }
        out.push_str("</error>");
        out
    }
}

/// A JSON array of error objects
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn header(&self) -> Option<&str> {
        Some("[")
    }

    fn footer(&self) -> Option<&str> {
        Some("]")
    }

    fn separator(&self) -> Option<&str> {
        Some(",")
    }

    fn format(&self, error: &ValidationError) -> String {
        serde_json::to_string(error).unwrap_or_else(|e| {
            warn!("Failed to serialize error from '{}': {}", error.validator, e);
            "{}".to_string()
        })
    }
}
