//! Markdown adapter backed by `pulldown-cmark`
//!
//! The event stream is folded into a [`MarkupNode`] tree with a stack of open
//! frames. Smart punctuation arrives as separate text events and is mapped to
//! [`SpecialText`] nodes here.

use pulldown_cmark::{Event, LinkType, Options, Parser as CmarkParser, Tag};

use crate::error::ParseError;

use super::markup::{MarkupNode, OmittedKind, SpecialText};
use super::MarkupParser;

pub struct MarkdownParser {
    options: Options,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownParser {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
        options.insert(Options::ENABLE_DEFINITION_LIST);
        options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
        Self { options }
    }

    pub fn with_options(options: Options) -> Self {
        Self { options }
    }
}

#[derive(Debug)]
enum FrameKind {
    Root,
    Header(usize),
    Paragraph,
    BulletList,
    OrderedList,
    Item,
    BlockQuote,
    Emphasis,
    Link(String),
    AutoLink { offset: usize, url: String },
    Omitted(OmittedKind),
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    children: Vec<MarkupNode>,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    fn into_node(self) -> MarkupNode {
        let children = self.children;
        match self.kind {
            FrameKind::Root => MarkupNode::Root(children),
            FrameKind::Header(level) => MarkupNode::Header { level, children },
            FrameKind::Paragraph => MarkupNode::Paragraph(children),
            FrameKind::BulletList => MarkupNode::BulletList(children),
            FrameKind::OrderedList => MarkupNode::OrderedList(children),
            FrameKind::Item => MarkupNode::ListItem(children),
            FrameKind::BlockQuote => MarkupNode::BlockQuote(children),
            FrameKind::Emphasis => MarkupNode::Emphasis(children),
            FrameKind::Link(url) => MarkupNode::Link { url, children },
            FrameKind::AutoLink { offset, url } => MarkupNode::AutoLink { offset, url },
            FrameKind::Omitted(kind) => MarkupNode::Omitted(kind),
        }
    }
}

fn frame_kind(tag: &Tag<'_>, offset: usize) -> FrameKind {
    match tag {
        Tag::Paragraph => FrameKind::Paragraph,
        Tag::Heading { level, .. } => FrameKind::Header(*level as usize),
        Tag::BlockQuote(_) => FrameKind::BlockQuote,
        Tag::CodeBlock(_) => FrameKind::Omitted(OmittedKind::CodeBlock),
        Tag::HtmlBlock => FrameKind::Omitted(OmittedKind::RawMarkup),
        Tag::List(Some(_)) => FrameKind::OrderedList,
        Tag::List(None) => FrameKind::BulletList,
        Tag::Item => FrameKind::Item,
        Tag::FootnoteDefinition(_) => FrameKind::Omitted(OmittedKind::Footnote),
        Tag::DefinitionList | Tag::DefinitionListTitle | Tag::DefinitionListDefinition => {
            FrameKind::Omitted(OmittedKind::DefinitionList)
        }
        Tag::Table(_) | Tag::TableHead | Tag::TableRow | Tag::TableCell => {
            FrameKind::Omitted(OmittedKind::Table)
        }
        Tag::Image { .. } => FrameKind::Omitted(OmittedKind::Image),
        Tag::MetadataBlock(_) => FrameKind::Omitted(OmittedKind::Metadata),
        Tag::Link {
            link_type,
            dest_url,
            ..
        } => match link_type {
            LinkType::Autolink | LinkType::Email => FrameKind::AutoLink {
                offset,
                url: dest_url.to_string(),
            },
            _ => FrameKind::Link(dest_url.to_string()),
        },
        // emphasis, strong, strikethrough and any other inline container
        _ => FrameKind::Emphasis,
    }
}

fn leaf(event: Event<'_>, offset: usize) -> Option<MarkupNode> {
    match event {
        Event::Text(text) => Some(match SpecialText::from_glyph(&text) {
            Some(kind) => MarkupNode::Special { offset, kind },
            None => MarkupNode::text(offset, text.to_string()),
        }),
        Event::Code(text) => Some(MarkupNode::Code {
            offset,
            text: text.to_string(),
        }),
        Event::SoftBreak | Event::HardBreak => Some(MarkupNode::text(offset, " ")),
        Event::Html(_) | Event::InlineHtml(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
            Some(MarkupNode::Omitted(OmittedKind::RawMarkup))
        }
        Event::FootnoteReference(_) => Some(MarkupNode::Omitted(OmittedKind::FootnoteReference)),
        Event::Rule => Some(MarkupNode::Omitted(OmittedKind::Rule)),
        _ => None,
    }
}

impl MarkupParser for MarkdownParser {
    fn parse(&self, input: &str) -> Result<MarkupNode, ParseError> {
        let mut stack = vec![Frame::new(FrameKind::Root)];

        for (event, range) in CmarkParser::new_ext(input, self.options).into_offset_iter() {
            match event {
                Event::Start(tag) => stack.push(Frame::new(frame_kind(&tag, range.start))),
                Event::End(_) => {
                    if stack.len() < 2 {
                        return Err(ParseError::Malformed(format!(
                            "unbalanced end tag at byte {}",
                            range.start
                        )));
                    }
                    if let Some(frame) = stack.pop() {
                        let node = frame.into_node();
                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(node);
                        }
                    }
                }
                other => {
                    if let Some(node) = leaf(other, range.start) {
                        if let Some(frame) = stack.last_mut() {
                            frame.children.push(node);
                        }
                    }
                }
            }
        }

        // fold anything left open into its parent
        while stack.len() > 1 {
            if let Some(frame) = stack.pop() {
                let node = frame.into_node();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(node);
                }
            }
        }

        stack
            .pop()
            .map(Frame::into_node)
            .ok_or_else(|| ParseError::Malformed("empty parse stack".to_string()))
    }
}
