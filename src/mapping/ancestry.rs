//! Enclosing-function lookup over reconstructed syntax trees.

/// Maximum number of nodes inspected before giving up on an ancestry chain.
pub const MAX_ANCESTRY_DEPTH: usize = 1000;

/// A node of a reconstructed syntax tree, as seen by the location mapper.
///
/// Implementations are expected to be cheap handles (references, indices or shared
/// pointers) into a tree owned by the decompiler frontend. Nothing prevents a broken
/// frontend from reporting a node as its own parent, so walkers must bound their walks.
pub trait SyntaxNode: Sized {
    /// Annotation a node carries when it is the root of a decompiled function.
    type Function;

    /// The parent node, or `None` at the root.
    fn parent(&self) -> Option<Self>;

    /// The function annotation of this node, if it has one.
    fn function_annotation(&self) -> Option<Self::Function>;
}

/// Walks from `node` towards the root and returns the first function annotation found.
///
/// At most [`MAX_ANCESTRY_DEPTH`] nodes are inspected, so cyclic chains (for example a
/// node that is its own parent) resolve to `None` instead of hanging.
pub fn find_enclosing_function<N: SyntaxNode>(node: N) -> Option<N::Function> {
    let mut next = Some(node);
    let mut visited = 0;

    while visited < MAX_ANCESTRY_DEPTH {
        let current = next?;
        visited += 1;

        if let Some(function) = current.function_annotation() {
            return Some(function);
        }

        next = current.parent();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Arena-backed node; `parents[i]` is the parent of node `i`.
    #[derive(Clone, Copy)]
    struct Node<'a> {
        index: usize,
        parents: &'a [Option<usize>],
        functions: &'a [Option<u32>],
        hops: &'a Cell<usize>,
    }

    impl SyntaxNode for Node<'_> {
        type Function = u32;

        fn parent(&self) -> Option<Self> {
            self.hops.set(self.hops.get() + 1);
            self.parents[self.index].map(|index| Node { index, ..*self })
        }

        fn function_annotation(&self) -> Option<u32> {
            self.functions[self.index]
        }
    }

    fn node<'a>(
        parents: &'a [Option<usize>],
        functions: &'a [Option<u32>],
        hops: &'a Cell<usize>,
    ) -> Node<'a> {
        Node {
            index: 0,
            parents,
            functions,
            hops,
        }
    }

    #[test]
    fn parent_function_found() {
        let hops = Cell::new(0);
        let found = find_enclosing_function(node(&[Some(1), None], &[None, Some(7)], &hops));
        assert_eq!(found, Some(7));
        assert_eq!(hops.get(), 1);
    }

    #[test]
    fn own_function_found() {
        let hops = Cell::new(0);
        let found = find_enclosing_function(node(&[Some(1), None], &[Some(3), Some(7)], &hops));
        assert_eq!(found, Some(3));
        assert_eq!(hops.get(), 0);
    }

    #[test]
    fn chain_ends_without_function() {
        let hops = Cell::new(0);
        let found = find_enclosing_function(node(&[Some(1), None], &[None, None], &hops));
        assert_eq!(found, None);
        assert_eq!(hops.get(), 2);
    }

    #[test]
    fn self_reference_terminates() {
        let hops = Cell::new(0);
        let found = find_enclosing_function(node(&[Some(0)], &[None], &hops));
        assert_eq!(found, None);
        assert_eq!(hops.get(), MAX_ANCESTRY_DEPTH);
    }

    #[test]
    fn deep_chain_is_cut_off() {
        let len = MAX_ANCESTRY_DEPTH + 5;
        let parents: Vec<Option<usize>> = (0..len)
            .map(|i| if i + 1 < len { Some(i + 1) } else { None })
            .collect();
        let mut functions = vec![None; len];
        functions[len - 1] = Some(1);

        let hops = Cell::new(0);
        assert_eq!(
            find_enclosing_function(node(&parents, &functions, &hops)),
            None
        );
        assert!(hops.get() <= MAX_ANCESTRY_DEPTH);
    }
}
