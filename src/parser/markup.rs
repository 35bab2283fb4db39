//! Closed set of markup node kinds
//!
//! Every format adapter translates its own parse result into this tree, so the
//! compiler never depends on a third-party node hierarchy. Offsets are byte
//! offsets into the adapter's input text.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Root(Vec<MarkupNode>),
    Header {
        level: usize,
        children: Vec<MarkupNode>,
    },
    Paragraph(Vec<MarkupNode>),
    BulletList(Vec<MarkupNode>),
    OrderedList(Vec<MarkupNode>),
    ListItem(Vec<MarkupNode>),
    BlockQuote(Vec<MarkupNode>),
    Text {
        offset: usize,
        text: String,
    },
    /// Inline code span
    Code {
        offset: usize,
        text: String,
    },
    /// Strong, emphasis or strikethrough; only the children matter
    Emphasis(Vec<MarkupNode>),
    /// A bare URL that is its own label
    AutoLink {
        offset: usize,
        url: String,
    },
    /// A labelled link; the label is in `children`
    Link {
        url: String,
        children: Vec<MarkupNode>,
    },
    Special {
        offset: usize,
        kind: SpecialText,
    },
    /// Content deliberately left out of the model
    Omitted(OmittedKind),
}

/// Typographic punctuation produced by smart-punctuation handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialText {
    Ellipsis,
    EmDash,
    EnDash,
    Apostrophe,
}

impl SpecialText {
    pub fn glyph(self) -> &'static str {
        match self {
            SpecialText::Ellipsis => "\u{2026}",
            SpecialText::EmDash => "\u{2014}",
            SpecialText::EnDash => "\u{2013}",
            SpecialText::Apostrophe => "'",
        }
    }

    pub fn from_glyph(text: &str) -> Option<Self> {
        match text {
            "\u{2026}" => Some(SpecialText::Ellipsis),
            "\u{2014}" => Some(SpecialText::EmDash),
            "\u{2013}" => Some(SpecialText::EnDash),
            "\u{2019}" | "\u{2018}" => Some(SpecialText::Apostrophe),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OmittedKind {
    Table,
    DefinitionList,
    RawMarkup,
    Image,
    CodeBlock,
    Footnote,
    FootnoteReference,
    Metadata,
    Rule,
}

impl fmt::Display for OmittedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OmittedKind::Table => "table",
            OmittedKind::DefinitionList => "definition list",
            OmittedKind::RawMarkup => "raw markup",
            OmittedKind::Image => "image",
            OmittedKind::CodeBlock => "code block",
            OmittedKind::Footnote => "footnote",
            OmittedKind::FootnoteReference => "footnote reference",
            OmittedKind::Metadata => "metadata block",
            OmittedKind::Rule => "horizontal rule",
        };
        write!(f, "{}", name)
    }
}

impl MarkupNode {
    pub fn text(offset: usize, text: impl Into<String>) -> Self {
        MarkupNode::Text {
            offset,
            text: text.into(),
        }
    }

    pub fn header(level: usize, children: Vec<MarkupNode>) -> Self {
        MarkupNode::Header { level, children }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_text_glyph_round_trip() {
        assert_eq!(SpecialText::from_glyph("\u{2014}"), Some(SpecialText::EmDash));
        assert_eq!(SpecialText::from_glyph("\u{2019}").map(|s| s.glyph()), Some("'"));
        assert_eq!(SpecialText::from_glyph("x"), None);
    }
}
