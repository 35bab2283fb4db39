//! Canonical document model
//!
//! A [`Document`] owns an arena of [`Section`]s. Sections refer to their
//! parent and children by [`SectionId`], so the hierarchy is a forest of
//! indices rather than a web of owning pointers. Documents are produced by
//! [`DocumentBuilder`] and are read-only afterwards.

pub mod builder;

use serde::Serialize;

pub use builder::DocumentBuilder;

/// One sentence of prose
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sentence {
    pub content: String,
    /// Source line (1-based, 0 when unknown)
    pub line: usize,
    /// First sentence of a paragraph or header
    pub is_first_sentence: bool,
    /// URLs of links that appear inside the sentence
    pub links: Vec<String>,
}

impl Sentence {
    pub fn new(content: impl Into<String>, line: usize) -> Self {
        Self {
            content: content.into(),
            line,
            is_first_sentence: false,
            links: Vec::new(),
        }
    }

    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.links.push(url.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub sentences: Vec<Sentence>,
    /// Whitespace in front of the first sentence in the source
    pub indent: String,
}

impl Paragraph {
    /// The paragraph text as it starts in the source, indent included
    pub fn opening(&self) -> Option<String> {
        self.sentences
            .first()
            .map(|first| format!("{}{}", self.indent, first.content))
    }
}

/// An element of a list block, tagged with its nesting depth (1 = outermost)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListElement {
    pub level: usize,
    pub sentences: Vec<Sentence>,
}

/// A list block: a flat run of elements, nesting expressed by `level`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListBlock {
    pub elements: Vec<ListElement>,
}

/// Index of a section inside its document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(pub(crate) usize);

impl SectionId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockSlot {
    Paragraph(usize),
    List(usize),
}

/// A paragraph or list block, in source order
#[derive(Debug, Clone, Copy)]
pub enum Block<'a> {
    Paragraph(&'a Paragraph),
    List(&'a ListBlock),
}

impl<'a> Block<'a> {
    pub fn sentences(self) -> Box<dyn Iterator<Item = &'a Sentence> + 'a> {
        match self {
            Block::Paragraph(paragraph) => Box::new(paragraph.sentences.iter()),
            Block::List(list) => Box::new(
                list.elements
                    .iter()
                    .flat_map(|element| element.sentences.iter()),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    level: usize,
    header: Vec<Sentence>,
    paragraphs: Vec<Paragraph>,
    lists: Vec<ListBlock>,
    blocks: Vec<BlockSlot>,
    children: Vec<SectionId>,
    parent: Option<SectionId>,
}

impl Section {
    pub(crate) fn new(level: usize, header: Vec<Sentence>) -> Self {
        Self {
            level,
            header,
            paragraphs: Vec::new(),
            lists: Vec::new(),
            blocks: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// The implicit level-0 section holding text before the first header
    pub fn is_preamble(&self) -> bool {
        self.level == 0 && self.header.is_empty()
    }

    pub fn header(&self) -> &[Sentence] {
        &self.header
    }

    /// Header sentences joined into one string
    pub fn header_text(&self) -> String {
        self.header
            .iter()
            .map(|s| s.content.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn lists(&self) -> &[ListBlock] {
        &self.lists
    }

    /// Paragraphs and lists interleaved as they appeared in the source
    pub fn blocks(&self) -> impl Iterator<Item = Block<'_>> {
        self.blocks.iter().map(move |slot| match *slot {
            BlockSlot::Paragraph(i) => Block::Paragraph(&self.paragraphs[i]),
            BlockSlot::List(i) => Block::List(&self.lists[i]),
        })
    }

    pub fn children(&self) -> &[SectionId] {
        &self.children
    }

    pub fn parent(&self) -> Option<SectionId> {
        self.parent
    }

    /// Header sentences, then body sentences in source order
    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.header
            .iter()
            .chain(self.blocks().flat_map(|block| block.sentences()))
    }

    pub(crate) fn last_block(&self) -> Option<BlockSlot> {
        self.blocks.last().copied()
    }

    pub(crate) fn push_paragraph(&mut self) {
        self.blocks.push(BlockSlot::Paragraph(self.paragraphs.len()));
        self.paragraphs.push(Paragraph::default());
    }

    pub(crate) fn push_list(&mut self) {
        self.blocks.push(BlockSlot::List(self.lists.len()));
        self.lists.push(ListBlock::default());
    }

    pub(crate) fn last_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        self.paragraphs.last_mut()
    }

    pub(crate) fn last_list_mut(&mut self) -> Option<&mut ListBlock> {
        self.lists.last_mut()
    }

    pub(crate) fn set_parent(&mut self, parent: SectionId) {
        self.parent = Some(parent);
    }

    pub(crate) fn push_child(&mut self, child: SectionId) {
        self.children.push(child);
    }
}

/// A parsed input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    sections: Vec<Section>,
    roots: Vec<SectionId>,
}

impl Document {
    pub(crate) fn from_parts(name: String, sections: Vec<Section>, roots: Vec<SectionId>) -> Self {
        Self {
            name,
            sections,
            roots,
        }
    }

    /// File name, empty when the input was not a file
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn roots(&self) -> &[SectionId] {
        &self.roots
    }

    pub fn section(&self, id: SectionId) -> &Section {
        &self.sections[id.0]
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// All sections, parents before children, siblings left to right
    pub fn sections(&self) -> PreOrder<'_> {
        PreOrder {
            document: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    /// Every sentence in document order
    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.sections().flat_map(|(_, section)| section.sentences())
    }
}

/// Pre-order walk over a document's section forest
pub struct PreOrder<'a> {
    document: &'a Document,
    stack: Vec<SectionId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (SectionId, &'a Section);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let section = self.document.section(id);
        self.stack.extend(section.children().iter().rev().copied());
        Some((id, section))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut builder = DocumentBuilder::new("sample.md");
        let top = builder.add_section(1, vec![Sentence::new("Top", 1)]);
        builder.add_root(top);
        builder.add_paragraph();
        builder.add_sentence(Sentence::new("First.", 2));
        builder.add_list_block();
        builder.add_list_element(1, vec![Sentence::new("Item", 3)]);
        builder.add_paragraph();
        builder.add_sentence(Sentence::new("After list.", 4));

        let child = builder.add_section(2, vec![Sentence::new("Child", 5)]);
        builder.attach_child(top, child);
        builder.add_paragraph();
        builder.add_sentence(Sentence::new("Inside.", 6));

        let sibling = builder.add_section(1, vec![Sentence::new("Next", 7)]);
        builder.add_root(sibling);
        builder.build()
    }

    #[test]
    fn test_sentences_follow_source_order() {
        let doc = sample();
        let contents: Vec<_> = doc.sentences().map(|s| s.content.as_str()).collect();
        assert_eq!(
            contents,
            vec!["Top", "First.", "Item", "After list.", "Child", "Inside.", "Next"]
        );
    }

    #[test]
    fn test_pre_order_walk() {
        let doc = sample();
        let levels: Vec<_> = doc.sections().map(|(_, s)| s.level()).collect();
        assert_eq!(levels, vec![1, 2, 1]);
        assert_eq!(doc.roots().len(), 2);

        let (child_id, child) = doc.sections().nth(1).unwrap();
        assert_eq!(child.parent(), Some(doc.roots()[0]));
        assert_eq!(doc.section(doc.roots()[0]).children(), &[child_id]);
    }

    #[test]
    fn test_header_text_joins_sentences() {
        let section = Section::new(
            1,
            vec![Sentence::new("Part one.", 1), Sentence::new("Part two", 1)],
        );
        assert_eq!(section.header_text(), "Part one. Part two");
    }

    #[test]
    fn test_empty_document() {
        let doc = DocumentBuilder::new("").build();
        assert!(doc.is_empty());
        assert_eq!(doc.sections().count(), 0);
        assert_eq!(doc.sentences().count(), 0);
    }
}
