//! The element tree the loader reads from.
//!
//! XML syntax, entities and file access belong to whoever produces the tree;
//! the loader only needs tag names, string attributes and child elements.

/// One element of a parsed SVG document.
pub trait SvgNode: Sized {
    /// Local tag name, without namespace prefix.
    fn tag_name(&self) -> &str;

    fn attribute(&self, name: &str) -> Option<&str>;

    /// Child elements in document order. Text and comments are not included.
    fn child_elements(&self) -> impl Iterator<Item = Self>;
}

impl<'a, 'input: 'a> SvgNode for roxmltree::Node<'a, 'input> {
    fn tag_name(&self) -> &str {
        roxmltree::Node::tag_name(self).name()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        roxmltree::Node::attribute(self, name)
    }

    fn child_elements(&self) -> impl Iterator<Item = Self> {
        self.children().filter(|n| n.is_element())
    }
}
