//! XML configuration loader
//!
//! ```xml
//! <configuration>
//!   <component name="Validator">
//!     <component name="SentenceLength">
//!       <property name="max_length" value="120"/>
//!     </component>
//!   </component>
//! </configuration>
//! ```
//!
//! Loading never fails loudly: problems are logged and `None` is returned,
//! leaving the caller to decide whether a missing configuration is fatal.

use std::path::Path;

use log::{debug, error, warn};
use roxmltree::Node;

use super::{Configuration, NodeId};

const COMPONENT: &str = "component";
const PROPERTY: &str = "property";

pub fn load_configuration(source: &str) -> Option<Configuration> {
    let document = match roxmltree::Document::parse(source) {
        Ok(document) => document,
        Err(e) => {
            error!("Failed to parse configuration: {}", e);
            return None;
        }
    };

    let Some(component) = root_component(document.root_element()) else {
        error!("Configuration has no <{}> element", COMPONENT);
        return None;
    };
    let Some(name) = component.attribute("name") else {
        error!("Root <{}> has no name attribute", COMPONENT);
        return None;
    };

    let mut config = Configuration::new(name);
    let root = config.root_id();
    fill(&mut config, root, component);

    debug!(
        "Loaded configuration '{}' with {} validators",
        name,
        config.root().child_count()
    );
    Some(config)
}

pub fn load_configuration_file(path: &Path) -> Option<Configuration> {
    match std::fs::read_to_string(path) {
        Ok(source) => load_configuration(&source),
        Err(e) => {
            error!("Failed to read configuration {}: {}", path.display(), e);
            None
        }
    }
}

fn is_element(node: &Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && node.tag_name().name() == tag
}

/// The document element itself, or its first `component` child
fn root_component<'a, 'input>(element: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    if is_element(&element, COMPONENT) {
        return Some(element);
    }

    let mut components = element.children().filter(|child| is_element(child, COMPONENT));
    let first = components.next();
    let extra = components.count();
    if extra > 0 {
        warn!(
            "Configuration has {} top-level components; using the first",
            extra + 1
        );
    }
    first
}

fn fill(config: &mut Configuration, id: NodeId, element: Node<'_, '_>) {
    for child in element.children().filter(Node::is_element) {
        let line = child.document().text_pos_at(child.range().start).row;
        match child.tag_name().name() {
            COMPONENT => match child.attribute("name") {
                Some(name) => {
                    let child_id = config.add_child(id, name);
                    fill(config, child_id, child);
                }
                None => warn!("Skipping <{}> without a name at line {}", COMPONENT, line),
            },
            PROPERTY => match (child.attribute("name"), child.attribute("value")) {
                (Some(name), Some(value)) => config.set_attribute(id, name, value),
                _ => warn!(
                    "Skipping <{}> without name and value at line {}",
                    PROPERTY, line
                ),
            },
            other => warn!("Skipping unknown element <{}> at line {}", other, line),
        }
    }
}
