//! Inserts implicit predicate nodes into a parsed tree.
//!
//! The grammar cannot tell `/Items/(/Name == "x")` (filter `Items`) apart from
//! a plain comparison. The difference is positional: a comparison or boolean
//! combinator whose nearest non-group ancestor is a path operator filters the
//! value that path produces. Such subtrees get wrapped in a
//! [`Symbol::Predicate`] node before the AST is built.

use crate::ast::{NodeId, Symbol, SyntaxTree};
use crate::parser::ParseError;

/// Rewrites `tree` in place, wrapping predicate positions.
pub fn contextualize(mut tree: SyntaxTree) -> Result<SyntaxTree, ParseError> {
    if let Some(root) = tree.root() {
        let mut contextualizer = Contextualizer {
            tree: &mut tree,
            context: None,
        };
        contextualizer.visit(root)?;
    }
    Ok(tree)
}

/// Tracks the subtree that may become a predicate.
#[derive(Debug, Clone, Copy)]
struct PredicateContext {
    needed: bool,
    cancelled: bool,
}

struct Contextualizer<'t> {
    tree: &'t mut SyntaxTree,
    context: Option<PredicateContext>,
}

impl Contextualizer<'_> {
    fn visit(&mut self, id: NodeId) -> Result<(), ParseError> {
        let owns_context = if self.context.is_none() && self.starts_predicate(id) {
            self.context = Some(PredicateContext {
                needed: true,
                cancelled: false,
            });
            true
        } else {
            if let Some(context) = self.context.as_mut()
                && self.tree.symbol(id) == Symbol::Assign
            {
                context.cancelled = true;
            }
            false
        };

        let children = self.tree.children(id).to_vec();
        for child in children {
            self.visit(child)?;
        }

        if owns_context && let Some(context) = self.context.take() {
            if context.needed && context.cancelled {
                return Err(ParseError::ConflictingPredicate);
            }
            if context.needed {
                tracing::trace!(symbol = %self.tree.symbol(id), "inserting implicit predicate");
                self.tree.wrap(id, Symbol::Predicate);
            }
        }
        Ok(())
    }

    fn starts_predicate(&self, id: NodeId) -> bool {
        self.tree.symbol(id).is_comparison()
            && self
                .effective_parent(id)
                .is_some_and(|parent| self.tree.symbol(parent) == Symbol::Path)
    }

    /// Nearest ancestor that is not a parenthesised group.
    fn effective_parent(&self, id: NodeId) -> Option<NodeId> {
        let mut parent = self.tree.parent(id);
        while let Some(candidate) = parent {
            if self.tree.symbol(candidate) != Symbol::Open {
                return Some(candidate);
            }
            parent = self.tree.parent(candidate);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_under_path_is_wrapped() {
        // (/ (/ a) (== (/ b) c))
        let mut tree = SyntaxTree::new();
        let a = tree.leaf(Symbol::String, "a");
        let path_a = tree.branch(Symbol::Path, &[a]);
        let b = tree.leaf(Symbol::String, "b");
        let path_b = tree.branch(Symbol::Path, &[b]);
        let c = tree.leaf(Symbol::String, "c");
        let eql = tree.branch(Symbol::Eql, &[path_b, c]);
        let root = tree.branch(Symbol::Path, &[path_a, eql]);
        tree.set_root(root);

        let tree = contextualize(tree).unwrap();
        assert_eq!(tree.to_string(), "(/ (/ a) (predicate (== (/ b) c)))");
    }

    #[test]
    fn top_level_comparison_is_untouched() {
        let mut tree = SyntaxTree::new();
        let a = tree.leaf(Symbol::String, "a");
        let b = tree.leaf(Symbol::String, "b");
        let eql = tree.branch(Symbol::Eql, &[a, b]);
        tree.set_root(eql);

        let tree = contextualize(tree).unwrap();
        assert_eq!(tree.to_string(), "(== a b)");
    }
}
