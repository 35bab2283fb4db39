//! Markup-to-model compiler
//!
//! Walks a [`MarkupNode`] tree and fills a [`DocumentBuilder`]. Inline content
//! is buffered as candidate spans and handed to the sentence extractor at
//! structural boundaries (paragraph, header, list item).

use crate::diagnostics::Diagnostics;
use crate::model::{Document, DocumentBuilder, SectionId, Sentence};
use crate::sentence::{CandidateSpan, SentenceExtractor};

use super::markup::MarkupNode;
use super::LineIndex;

/// Compile a markup tree into a document named `name`
pub fn compile(
    name: &str,
    root: &MarkupNode,
    lines: &LineIndex,
    extractor: &SentenceExtractor,
    diagnostics: &mut Diagnostics,
) -> Document {
    let mut compiler = MarkupCompiler {
        builder: DocumentBuilder::new(name),
        extractor,
        lines,
        diagnostics,
        pending: Vec::new(),
        list_depth: 0,
    };
    compiler.visit(root);
    compiler.flush();
    compiler.builder.build()
}

struct MarkupCompiler<'a> {
    builder: DocumentBuilder,
    extractor: &'a SentenceExtractor,
    lines: &'a LineIndex,
    diagnostics: &'a mut Diagnostics,
    pending: Vec<CandidateSpan>,
    list_depth: usize,
}

impl<'a> MarkupCompiler<'a> {
    fn visit(&mut self, node: &MarkupNode) {
        match node {
            MarkupNode::Root(children) | MarkupNode::BlockQuote(children) => {
                self.visit_children(children)
            }
            MarkupNode::Header { level, children } => self.visit_header(*level, children),
            MarkupNode::Paragraph(children) => {
                if self.list_depth > 0 {
                    // the enclosing list item collects the text
                    self.visit_children(children);
                } else {
                    self.flush();
                    self.builder.add_paragraph();
                    self.visit_children(children);
                    let indent = self.pending_indent();
                    self.flush();
                    if !indent.is_empty() {
                        self.builder.set_paragraph_indent(indent);
                    }
                }
            }
            MarkupNode::BulletList(items) | MarkupNode::OrderedList(items) => {
                self.visit_list(items)
            }
            MarkupNode::ListItem(children) => {
                self.visit_children(children);
                let sentences = self.take_sentences();
                if !sentences.is_empty() {
                    self.builder.add_list_element(self.list_depth, sentences);
                }
            }
            MarkupNode::Text { offset, text } | MarkupNode::Code { offset, text } => {
                self.push_span(*offset, text.clone(), None)
            }
            MarkupNode::Emphasis(children) => self.visit_children(children),
            MarkupNode::AutoLink { offset, url } => {
                self.push_span(*offset, url.clone(), Some(url.clone()))
            }
            MarkupNode::Link { url, children } => {
                self.visit_children(children);
                match self.pending.last_mut() {
                    Some(span) => span.link = Some(url.clone()),
                    None => self
                        .diagnostics
                        .warn(format!("link to '{}' has no text to attach to", url), None),
                }
            }
            MarkupNode::Special { offset, kind } => {
                self.push_span(*offset, kind.glyph().to_string(), None)
            }
            MarkupNode::Omitted(kind) => self
                .diagnostics
                .note(format!("{} omitted from the document model", kind), None),
        }
    }

    fn visit_children(&mut self, children: &[MarkupNode]) {
        for child in children {
            self.visit(child);
        }
    }

    fn visit_header(&mut self, level: usize, children: &[MarkupNode]) {
        if self.list_depth > 0 {
            self.visit_nested_header(children);
            return;
        }

        self.flush();
        self.visit_children(children);
        let header = self.take_sentences();

        let previous = self.builder.last_section();
        let id = self.builder.add_section(level, header);
        self.attach_section(previous, id);
    }

    /// A header inside a list item stays part of the list: the item text so
    /// far and the header text each become an element at the current depth.
    fn visit_nested_header(&mut self, children: &[MarkupNode]) {
        let before = self.take_sentences();
        if !before.is_empty() {
            self.builder.add_list_element(self.list_depth, before);
        }

        self.visit_children(children);
        let header = self.take_sentences();
        if let Some(first) = header.first() {
            self.diagnostics.note(
                format!("header '{}' inside a list item kept as list text", first.content),
                Some(first.line),
            );
            self.builder.add_list_element(self.list_depth, header);
        }
    }

    fn visit_list(&mut self, items: &[MarkupNode]) {
        if self.list_depth == 0 {
            self.flush();
            self.builder.add_list_block();
        } else {
            // text of the enclosing item that precedes the nested list
            let sentences = self.take_sentences();
            if !sentences.is_empty() {
                self.builder.add_list_element(self.list_depth, sentences);
            }
        }

        self.list_depth += 1;
        self.visit_children(items);
        self.list_depth -= 1;
    }

    /// Place a new section in the forest: under the nearest section, starting
    /// from the previous one and walking up its parents, whose level is
    /// lower. Without such an ancestor the section becomes a new root.
    fn attach_section(&mut self, previous: Option<SectionId>, id: SectionId) {
        let level = self.builder.level_of(id);
        let mut candidate = previous;
        let mut topmost = None;

        while let Some(current) = candidate {
            if self.builder.level_of(current) < level {
                self.builder.attach_child(current, id);
                return;
            }
            topmost = Some(current);
            candidate = self.builder.parent_of(current);
        }

        self.builder.add_root(id);

        if let Some(root) = topmost {
            let root_level = self.builder.level_of(root);
            if root_level != level {
                let line = self.builder.header_of(id).first().map(|s| s.line);
                let header = self
                    .builder
                    .header_of(id)
                    .first()
                    .map(|s| s.content.clone())
                    .unwrap_or_default();
                self.diagnostics.warn(
                    format!(
                        "no parent section for level {} header '{}' (previous root is level {}); promoted to root",
                        level, header, root_level
                    ),
                    line,
                );
            }
        }
    }

    fn push_span(&mut self, offset: usize, text: String, link: Option<String>) {
        self.pending.push(CandidateSpan {
            line: self.lines.line_number(offset),
            text,
            link,
        });
    }

    /// Leading whitespace of the buffered text; the extractor drops it
    fn pending_indent(&self) -> String {
        self.pending
            .iter()
            .flat_map(|span| span.text.chars())
            .take_while(|c| c.is_whitespace())
            .collect()
    }

    fn take_sentences(&mut self) -> Vec<Sentence> {
        let spans = std::mem::take(&mut self.pending);
        self.extractor.extract(spans)
    }

    /// Move buffered text into the current section
    fn flush(&mut self) {
        for sentence in self.take_sentences() {
            self.builder.add_sentence(sentence);
        }
    }
}
