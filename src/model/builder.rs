//! Append-only construction of a [`Document`]
//!
//! The builder keeps a cursor on the most recently added section. Paragraph,
//! list and sentence operations always target that section. Content that
//! arrives before any section exists lands in an implicit level-0 root
//! section (the preamble).

use super::{BlockSlot, Document, ListElement, Section, SectionId, Sentence};

#[derive(Debug, Default)]
pub struct DocumentBuilder {
    name: String,
    sections: Vec<Section>,
    roots: Vec<SectionId>,
}

impl DocumentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sections: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Add a section to the arena and make it current. The caller places it
    /// with [`add_root`](Self::add_root) or [`attach_child`](Self::attach_child).
    pub fn add_section(&mut self, level: usize, header: Vec<Sentence>) -> SectionId {
        let mut header = header;
        if let Some(first) = header.first_mut() {
            first.is_first_sentence = true;
        }
        let id = SectionId(self.sections.len());
        self.sections.push(Section::new(level, header));
        id
    }

    pub fn add_root(&mut self, id: SectionId) {
        self.roots.push(id);
    }

    pub fn attach_child(&mut self, parent: SectionId, child: SectionId) {
        self.sections[parent.0].push_child(child);
        self.sections[child.0].set_parent(parent);
    }

    /// The most recently added section
    pub fn last_section(&self) -> Option<SectionId> {
        if self.sections.is_empty() {
            None
        } else {
            Some(SectionId(self.sections.len() - 1))
        }
    }

    pub fn level_of(&self, id: SectionId) -> usize {
        self.sections[id.0].level()
    }

    pub fn parent_of(&self, id: SectionId) -> Option<SectionId> {
        self.sections[id.0].parent()
    }

    pub fn header_of(&self, id: SectionId) -> &[Sentence] {
        self.sections[id.0].header()
    }

    pub fn add_paragraph(&mut self) {
        self.current_section().push_paragraph();
    }

    /// Append a sentence to the current paragraph, opening one if the
    /// section's last block is not a paragraph.
    pub fn add_sentence(&mut self, sentence: Sentence) {
        let section = self.current_section();
        if section.last_block().map_or(true, |slot| !matches!(slot, BlockSlot::Paragraph(_))) {
            section.push_paragraph();
        }
        if let Some(paragraph) = section.last_paragraph_mut() {
            let mut sentence = sentence;
            sentence.is_first_sentence = paragraph.sentences.is_empty();
            paragraph.sentences.push(sentence);
        }
    }

    /// Record the indent of the current paragraph; ignored when the
    /// section's last block is not a paragraph.
    pub fn set_paragraph_indent(&mut self, indent: impl Into<String>) {
        let section = self.current_section();
        if matches!(section.last_block(), Some(BlockSlot::Paragraph(_))) {
            if let Some(paragraph) = section.last_paragraph_mut() {
                paragraph.indent = indent.into();
            }
        }
    }

    pub fn add_list_block(&mut self) {
        self.current_section().push_list();
    }

    /// Append an element to the current list block, opening one if needed
    pub fn add_list_element(&mut self, level: usize, sentences: Vec<Sentence>) {
        let section = self.current_section();
        if section.last_block().map_or(true, |slot| !matches!(slot, BlockSlot::List(_))) {
            section.push_list();
        }
        if let Some(list) = section.last_list_mut() {
            list.elements.push(ListElement { level, sentences });
        }
    }

    pub fn build(self) -> Document {
        Document::from_parts(self.name, self.sections, self.roots)
    }

    fn current_section(&mut self) -> &mut Section {
        if self.sections.is_empty() {
            let preamble = self.add_section(0, Vec::new());
            self.add_root(preamble);
        }
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }
}
