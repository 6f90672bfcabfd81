use std::fmt;

use crate::ast::{Symbol, Token};

/// Index of a node inside a [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A node of the parse tree.
///
/// `parent` is an index back into the owning arena. It is only read by the
/// contextualizer when it needs to look upward; children are owned top-down.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub symbol: Symbol,
    pub text: String,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

/// Arena-backed parse tree produced by the parser and rewritten by the
/// contextualizer.
///
/// Nodes are never removed; a rewrite only adds nodes and relinks indices.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    root: Option<NodeId>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a detached node for `token`.
    pub fn push(&mut self, token: Token) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SyntaxNode {
            symbol: token.symbol,
            text: token.text,
            children: Vec::new(),
            parent: None,
        });
        id
    }

    /// Adds a leaf. Shorthand for building trees by hand.
    pub fn leaf(&mut self, symbol: Symbol, text: &str) -> NodeId {
        self.push(Token::new(symbol, text))
    }

    /// Adds a node with the given children, using the symbol's own spelling.
    pub fn branch(&mut self, symbol: Symbol, children: &[NodeId]) -> NodeId {
        let id = self.push(Token::new(symbol, symbol.info().text));
        for &child in children {
            self.add_child(id, child);
        }
        id
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.0]
    }

    pub fn symbol(&self, id: NodeId) -> Symbol {
        self.nodes[id.0].symbol
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.nodes[id.0].parent = None;
        self.root = Some(id);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes on the longest root-to-leaf path; 0 without a root.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending: Vec<(NodeId, usize)> = self.root.into_iter().map(|id| (id, 1)).collect();
        while let Some((id, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            pending.extend(self.children(id).iter().map(|&child| (child, depth + 1)));
        }
        deepest
    }

    /// Inserts a new `symbol` node between `id` and its parent and returns it.
    ///
    /// If `id` was the root, the new node becomes the root.
    pub fn wrap(&mut self, id: NodeId, symbol: Symbol) -> NodeId {
        let parent = self.parent(id);
        let wrapper = self.push(Token::new(symbol, symbol.info().text));
        self.nodes[wrapper.0].children.push(id);
        self.nodes[id.0].parent = Some(wrapper);
        self.nodes[wrapper.0].parent = parent;

        match parent {
            Some(parent) => {
                for slot in self.nodes[parent.0].children.iter_mut() {
                    if *slot == id {
                        *slot = wrapper;
                    }
                }
            }
            None => {
                if self.root == Some(id) {
                    self.root = Some(wrapper);
                }
            }
        }
        wrapper
    }

    fn fmt_node(&self, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node(id);
        if node.children.is_empty() {
            return match node.symbol {
                Symbol::Int | Symbol::Float | Symbol::String => f.write_str(&node.text),
                other => write!(f, "({})", other.label()),
            };
        }

        write!(f, "({}", node.symbol.label())?;
        for &child in &node.children {
            f.write_str(" ")?;
            self.fmt_node(child, f)?;
        }
        f.write_str(")")
    }
}

/// S-expression rendering, e.g. `(== (/ (/ a) b) "c")`.
impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Some(root) => self.fmt_node(root, f),
            None => f.write_str("()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_relinks_parent_and_child() {
        let mut tree = SyntaxTree::new();
        let a = tree.leaf(Symbol::String, "a");
        let b = tree.leaf(Symbol::String, "b");
        let eql = tree.branch(Symbol::Eql, &[a, b]);
        let path = tree.branch(Symbol::Path, &[eql]);
        tree.set_root(path);

        let wrapper = tree.wrap(eql, Symbol::Predicate);

        assert_eq!(tree.children(path), &[wrapper]);
        assert_eq!(tree.parent(wrapper), Some(path));
        assert_eq!(tree.parent(eql), Some(wrapper));
        assert_eq!(tree.to_string(), "(/ (predicate (== a b)))");
    }

    #[test]
    fn wrapping_the_root_moves_the_root() {
        let mut tree = SyntaxTree::new();
        let a = tree.leaf(Symbol::String, "a");
        tree.set_root(a);

        let wrapper = tree.wrap(a, Symbol::Predicate);
        assert_eq!(tree.root(), Some(wrapper));
    }

    #[test]
    fn depth_follows_the_longest_branch() {
        let mut tree = SyntaxTree::new();
        assert_eq!(tree.depth(), 0);

        let a = tree.leaf(Symbol::String, "a");
        let b = tree.leaf(Symbol::String, "b");
        let inner = tree.branch(Symbol::Path, &[b]);
        let eql = tree.branch(Symbol::Eql, &[a, inner]);
        tree.set_root(eql);
        assert_eq!(tree.depth(), 3);
    }
}
