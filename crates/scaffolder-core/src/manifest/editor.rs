//! Non-destructive edits over tagged children
//!
//! Every mutator returns a modified copy and leaves `self` untouched. Lookups
//! match direct children only; the first match in document order wins.

use super::xml::{Document, Element, Node, XmlError};

/// Anything that owns an ordered list of child nodes
pub trait TagContainer: Clone {
    fn child_nodes(&self) -> &[Node];

    fn child_nodes_mut(&mut self) -> &mut Vec<Node>;

    /// Index of the first child element named `tag` whose attributes include `filter`
    fn find_child_index(&self, tag: &str, filter: &[(&str, &str)]) -> Option<usize> {
        self.child_nodes().iter().position(|node| match node {
            Node::Element(element) => element.matches(tag, filter),
            _ => false,
        })
    }

    /// The first child element matched by [`TagContainer::find_child_index`]
    fn first_child(&self, tag: &str, filter: &[(&str, &str)]) -> Option<&Element> {
        self.find_child_index(tag, filter)
            .and_then(|index| self.child_nodes()[index].as_element())
    }

    /// Replace the first matching child; returns an unchanged copy when nothing matches
    fn replace_first_child(&self, tag: &str, filter: &[(&str, &str)], replacement: Element) -> Self {
        let mut copy = self.clone();
        if let Some(index) = copy.find_child_index(tag, filter) {
            copy.child_nodes_mut()[index] = Node::Element(replacement);
        }
        copy
    }

    /// Like [`TagContainer::replace_first_child`] but fails when nothing matches
    fn try_replace_first_child(
        &self,
        tag: &str,
        filter: &[(&str, &str)],
        replacement: Element,
    ) -> Result<Self, XmlError> {
        let index = self
            .find_child_index(tag, filter)
            .ok_or_else(|| XmlError::TagNotFound(describe(tag, filter)))?;
        let mut copy = self.clone();
        copy.child_nodes_mut()[index] = Node::Element(replacement);
        Ok(copy)
    }

    /// A copy with `child` appended
    fn with_child(&self, child: impl Into<Node>) -> Self {
        let mut copy = self.clone();
        copy.child_nodes_mut().push(child.into());
        copy
    }
}

impl TagContainer for Element {
    fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    fn child_nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }
}

impl TagContainer for Document {
    fn child_nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn child_nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }
}

/// Render a lookup as `tag name="value"` for error messages
pub fn describe(tag: &str, filter: &[(&str, &str)]) -> String {
    let mut description = tag.to_string();
    for (name, value) in filter {
        description.push_str(&format!(" {}=\"{}\"", name, value));
    }
    description
}
