//! Plain text: paragraphs separated by blank lines, no other structure

use crate::error::ParseError;

use super::markup::MarkupNode;
use super::MarkupParser;

#[derive(Debug, Default)]
pub struct PlainTextParser;

impl PlainTextParser {
    pub fn new() -> Self {
        Self
    }
}

impl MarkupParser for PlainTextParser {
    fn parse(&self, input: &str) -> Result<MarkupNode, ParseError> {
        let mut paragraphs = Vec::new();
        let mut current: Vec<MarkupNode> = Vec::new();
        let mut line_start: usize = 0;

        for raw in input.split_inclusive('\n') {
            let line = raw.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() {
                if !current.is_empty() {
                    paragraphs.push(MarkupNode::Paragraph(std::mem::take(&mut current)));
                }
            } else {
                if !current.is_empty() {
                    current.push(MarkupNode::text(line_start.saturating_sub(1), " "));
                }
                current.push(MarkupNode::text(line_start, line));
            }
            line_start += raw.len();
        }

        if !current.is_empty() {
            paragraphs.push(MarkupNode::Paragraph(current));
        }
        Ok(MarkupNode::Root(paragraphs))
    }
}
