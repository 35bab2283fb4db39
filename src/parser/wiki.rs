//! Line-oriented wiki dialect
//!
//! Recognized block syntax: `h1.` .. `h6.` headers, `*`/`-`/`#` list markers
//! (marker count is the nesting depth), `|` table rows, `{code}` blocks and
//! `----` rules. Inline syntax: `[label|url]`, `[scheme://url]`, `*strong*`
//! and `_emphasis_`. Blank lines separate paragraphs.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ParseError;

use super::markup::{MarkupNode, OmittedKind};
use super::MarkupParser;

lazy_static! {
    static ref HEADER: Regex = Regex::new(r"^h([1-6])\.\s*(.*)$").unwrap();
    static ref LIST_ITEM: Regex = Regex::new(r"^\s*([*#-]+)\s+(.*)$").unwrap();
    static ref RULE: Regex = Regex::new(r"^\s*-{4,}\s*$").unwrap();
    static ref INLINE: Regex = Regex::new(
        r"\[([^\]|]+)\|([^\]]+)\]|\[([A-Za-z][A-Za-z0-9+.-]*://[^\]|]+)\]|\*([^*]+)\*|_([^_]+)_"
    )
    .unwrap();
}

#[derive(Debug, Default)]
pub struct WikiParser;

impl WikiParser {
    pub fn new() -> Self {
        Self
    }
}

impl MarkupParser for WikiParser {
    fn parse(&self, input: &str) -> Result<MarkupNode, ParseError> {
        let mut state = WikiState::default();
        let mut line_start = 0;

        for raw in input.split_inclusive('\n') {
            let line = raw.trim_end_matches(['\n', '\r']);
            state.line(line, line_start);
            line_start += raw.len();
        }

        Ok(state.finish())
    }
}

#[derive(Debug)]
struct OpenList {
    ordered: bool,
    items: Vec<Vec<MarkupNode>>,
}

impl OpenList {
    fn into_node(self) -> MarkupNode {
        let items = self.items.into_iter().map(MarkupNode::ListItem).collect();
        if self.ordered {
            MarkupNode::OrderedList(items)
        } else {
            MarkupNode::BulletList(items)
        }
    }
}

#[derive(Debug, Default)]
struct WikiState {
    root: Vec<MarkupNode>,
    paragraph: Option<Vec<MarkupNode>>,
    lists: Vec<OpenList>,
    in_code: bool,
    in_table: bool,
}

impl WikiState {
    fn line(&mut self, line: &str, start: usize) {
        let trimmed = line.trim();

        if self.in_code {
            if trimmed.starts_with("{code") {
                self.in_code = false;
            }
            return;
        }

        if let Some(rest) = trimmed.strip_prefix("{code") {
            self.close_blocks();
            self.root.push(MarkupNode::Omitted(OmittedKind::CodeBlock));
            // `{code}x{code}` opens and closes on one line
            self.in_code = !rest.contains("{code");
            return;
        }

        if trimmed.is_empty() {
            self.close_blocks();
            return;
        }

        if trimmed.starts_with('|') {
            if !self.in_table {
                self.close_blocks();
                self.root.push(MarkupNode::Omitted(OmittedKind::Table));
                self.in_table = true;
            }
            return;
        }
        self.in_table = false;

        if RULE.is_match(line) {
            self.close_blocks();
            self.root.push(MarkupNode::Omitted(OmittedKind::Rule));
            return;
        }

        if let Some(caps) = HEADER.captures(line) {
            self.close_blocks();
            let level = caps[1].parse::<usize>().unwrap_or(1);
            let children = caps
                .get(2)
                .map(|body| inline(body.as_str(), start + body.start()))
                .unwrap_or_default();
            self.root.push(MarkupNode::header(level, children));
            return;
        }

        if let Some(caps) = LIST_ITEM.captures(line) {
            self.close_paragraph();
            let markers = &caps[1];
            let content = caps
                .get(2)
                .map(|body| inline(body.as_str(), start + body.start()))
                .unwrap_or_default();
            self.push_item(markers.chars().count(), markers.starts_with('#'), content);
            return;
        }

        self.close_lists();
        let nodes = inline(line, start);
        match self.paragraph.as_mut() {
            Some(paragraph) => {
                // the newline that ended the previous line
                paragraph.push(MarkupNode::text(start.saturating_sub(1), " "));
                paragraph.extend(nodes);
            }
            None => self.paragraph = Some(nodes),
        }
    }

    fn push_item(&mut self, depth: usize, ordered: bool, content: Vec<MarkupNode>) {
        while self.lists.len() > depth {
            self.close_innermost_list();
        }
        while self.lists.len() < depth {
            self.lists.push(OpenList {
                ordered,
                items: Vec::new(),
            });
        }
        if let Some(list) = self.lists.last_mut() {
            list.items.push(content);
        }
    }

    /// Nested lists hang off the last item of their parent list
    fn close_innermost_list(&mut self) {
        let Some(list) = self.lists.pop() else {
            return;
        };
        let node = list.into_node();
        match self.lists.last_mut() {
            Some(parent) => match parent.items.last_mut() {
                Some(item) => item.push(node),
                None => parent.items.push(vec![node]),
            },
            None => self.root.push(node),
        }
    }

    fn close_lists(&mut self) {
        while !self.lists.is_empty() {
            self.close_innermost_list();
        }
    }

    fn close_paragraph(&mut self) {
        if let Some(children) = self.paragraph.take() {
            self.root.push(MarkupNode::Paragraph(children));
        }
    }

    fn close_blocks(&mut self) {
        self.close_paragraph();
        self.close_lists();
        self.in_table = false;
    }

    fn finish(mut self) -> MarkupNode {
        self.close_blocks();
        MarkupNode::Root(self.root)
    }
}

/// Inline markup of one line; `base` is the byte offset of `text`
fn inline(text: &str, base: usize) -> Vec<MarkupNode> {
    let mut nodes = Vec::new();
    let mut cursor = 0;

    for caps in INLINE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > cursor {
            nodes.push(MarkupNode::text(base + cursor, &text[cursor..whole.start()]));
        }

        if let (Some(label), Some(url)) = (caps.get(1), caps.get(2)) {
            nodes.push(MarkupNode::Link {
                url: url.as_str().trim().to_string(),
                children: vec![MarkupNode::text(base + label.start(), label.as_str())],
            });
        } else if let Some(url) = caps.get(3) {
            nodes.push(MarkupNode::AutoLink {
                offset: base + url.start(),
                url: url.as_str().to_string(),
            });
        } else if let Some(inner) = caps.get(4).or_else(|| caps.get(5)) {
            nodes.push(MarkupNode::Emphasis(inline(
                inner.as_str(),
                base + inner.start(),
            )));
        }

        cursor = whole.end();
    }

    if cursor < text.len() {
        nodes.push(MarkupNode::text(base + cursor, &text[cursor..]));
    }
    nodes
}
