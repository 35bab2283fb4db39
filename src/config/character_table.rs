//! Character table: canonical symbols and their unwanted variants
//!
//! ```xml
//! <character-table>
//!   <character name="FULL_STOP" value="." invalid-chars="．。" after-space="true"/>
//! </character-table>
//! ```

use std::path::Path;

use indexmap::IndexMap;
use log::{debug, error, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub name: String,
    pub value: String,
    /// Variants that must not appear in place of `value`
    pub invalid_chars: Vec<String>,
    pub before_space: bool,
    pub after_space: bool,
}

impl Character {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            invalid_chars: Vec::new(),
            before_space: false,
            after_space: false,
        }
    }

    pub fn with_invalid_chars(mut self, chars: &str) -> Self {
        self.invalid_chars = chars.chars().map(String::from).collect();
        self
    }
}

/// Characters keyed by name, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterTable {
    characters: IndexMap<String, Character>,
}

impl CharacterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, character: Character) {
        self.characters.insert(character.name.clone(), character);
    }

    pub fn get(&self, name: &str) -> Option<&Character> {
        self.characters.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.characters.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

fn flag(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("true") | Some("yes") | Some("1"))
}

/// Parse a character table; logs and returns `None` on malformed input
pub fn load_character_table(source: &str) -> Option<CharacterTable> {
    let document = match roxmltree::Document::parse(source) {
        Ok(document) => document,
        Err(e) => {
            error!("Failed to parse character table: {}", e);
            return None;
        }
    };

    let root = document.root_element();
    if root.tag_name().name() != "character-table" {
        error!(
            "Expected <character-table> root element, found <{}>",
            root.tag_name().name()
        );
        return None;
    }

    let mut table = CharacterTable::new();
    for element in root.children().filter(|n| n.is_element()) {
        if element.tag_name().name() != "character" {
            warn!(
                "Skipping unknown element <{}> in character table",
                element.tag_name().name()
            );
            continue;
        }
        let (Some(name), Some(value)) = (element.attribute("name"), element.attribute("value"))
        else {
            warn!("Skipping <character> without name and value");
            continue;
        };

        let mut character = Character::new(name, value)
            .with_invalid_chars(element.attribute("invalid-chars").unwrap_or(""));
        character.before_space = flag(element.attribute("before-space"));
        character.after_space = flag(element.attribute("after-space"));
        table.insert(character);
    }

    debug!("Loaded character table with {} entries", table.len());
    Some(table)
}

pub fn load_character_table_file(path: &Path) -> Option<CharacterTable> {
    match std::fs::read_to_string(path) {
        Ok(source) => load_character_table(&source),
        Err(e) => {
            error!("Failed to read character table {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_table() {
        let table = load_character_table(
            r#"<character-table>
                 <character name="FULL_STOP" value="." invalid-chars="．。" after-space="true"/>
                 <character name="COMMA" value="," invalid-chars="、，"/>
                 <character name="BROKEN"/>
               </character-table>"#,
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        let names: Vec<_> = table.names().collect();
        assert_eq!(names, vec!["FULL_STOP", "COMMA"]);

        let stop = table.get("FULL_STOP").unwrap();
        assert_eq!(stop.value, ".");
        assert_eq!(stop.invalid_chars, vec!["．".to_string(), "。".to_string()]);
        assert!(stop.after_space);
        assert!(!stop.before_space);
    }

    #[test]
    fn test_wrong_root_or_garbage() {
        assert!(load_character_table("<configuration/>").is_none());
        assert!(load_character_table("not xml").is_none());
        assert!(load_character_table_file(Path::new("/no/such/table.xml")).is_none());
    }
}
