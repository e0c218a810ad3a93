//! XML adapter.
//!
//! Elements map one-to-one onto tree nodes: the element name is the tag,
//! attributes become text attributes and child elements become children in
//! document order. Text, comments and processing instructions are ignored.
//!
//! ```xml
//! <Chain>
//!   <Effect type="Gain" gain_db="-6"/>
//!   <Group mode="parallel">
//!     <Effect type="Delay" time="0.25"/>
//!     <Effect type="Reverb"/>
//!   </Group>
//! </Chain>
//! ```

use rackgraph_core::ConfigNode;
use roxmltree::{Document, Node};

use crate::error::ConfigError;

/// Parse an XML chain description.
pub fn parse_xml(text: &str) -> Result<ConfigNode, ConfigError> {
    let doc = Document::parse(text)?;
    Ok(lower_element(doc.root_element()))
}

fn lower_element(element: Node<'_, '_>) -> ConfigNode {
    let mut node = ConfigNode::new(element.tag_name().name());
    for attr in element.attributes() {
        node.set_attribute(attr.name(), attr.value());
    }
    for child in element.children().filter(Node::is_element) {
        node.push_child(lower_element(child));
    }
    node
}
