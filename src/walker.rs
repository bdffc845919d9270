//! Depth-first traversal of the document, unioning every leaf's outline.

use crate::config::{LoadOptions, UnknownElementPolicy};
use crate::document::SvgNode;
use crate::error::{Result, ShapeError};
use crate::resolve::{GeometryResolver, UnifiedPath};
use crate::shapes::translate_element;
use tracing::{debug, warn};

pub struct DocumentWalker<'a, R: GeometryResolver> {
    options: &'a LoadOptions,
    resolver: &'a R,
}

impl<'a, R: GeometryResolver> DocumentWalker<'a, R> {
    pub fn new(options: &'a LoadOptions, resolver: &'a R) -> Self {
        Self { options, resolver }
    }

    /// Union of every geometry element below `root`, which must be `<svg>`.
    ///
    /// The first failing element aborts the walk; nothing accumulated so far
    /// is returned.
    pub fn walk<E: SvgNode>(&self, root: &E) -> Result<UnifiedPath> {
        if root.tag_name() != "svg" {
            return Err(ShapeError::DocumentStructureInvalid(format!(
                "root element is <{}>, expected <svg>",
                root.tag_name()
            )));
        }
        self.visit_group(root, UnifiedPath::new(), 0)
    }

    fn visit_group<E: SvgNode>(&self, group: &E, mut acc: UnifiedPath, depth: usize) -> Result<UnifiedPath> {
        for child in group.child_elements() {
            acc = if child.tag_name() == "g" {
                if depth >= self.options.max_group_depth {
                    return Err(ShapeError::DocumentStructureInvalid(format!(
                        "groups nested deeper than {}",
                        self.options.max_group_depth
                    )));
                }
                self.visit_group(&child, acc, depth + 1)?
            } else {
                self.visit_leaf(&child, acc)?
            };
        }
        Ok(acc)
    }

    fn visit_leaf<E: SvgNode>(&self, element: &E, acc: UnifiedPath) -> Result<UnifiedPath> {
        let tag = element.tag_name();
        match translate_element(element, self.options)? {
            Some(path) if path.is_empty() => {
                debug!(element = tag, "element has no area");
                Ok(acc)
            }
            Some(path) => {
                debug!(element = tag, commands = path.len(), "unioning element");
                self.resolver.union(acc, path)
            }
            None => match self.options.unknown_elements {
                UnknownElementPolicy::Skip => {
                    warn!(element = tag, "skipping element without outline geometry");
                    Ok(acc)
                }
                UnknownElementPolicy::Fail => Err(ShapeError::UnresolvableElement {
                    element: tag.to_string(),
                }),
            },
        }
    }
}
