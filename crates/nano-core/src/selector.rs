//! Structural selectors: re-finding an element after an async round trip.
//!
//! A selector is the chain of 1-based element-child indices from the top of
//! a tree (the document element, or the top level of a shadow root) down to
//! the element. For documents it renders as a CSS selector
//! (`:root > :nth-child(2) > :nth-child(1)`) that a single `querySelector`
//! resolves.

use std::fmt;
use std::str::FromStr;

/// Anything element-shaped that can be walked by parent and child index.
pub trait ElementTree {
    type Element: Clone;

    /// Parent element, or `None` at the top of the tree.
    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;

    /// 1-based position of `element` among its element siblings.
    fn index_in_parent(&self, element: &Self::Element) -> u32;

    /// The `index`th (1-based) element child of `parent`, or of the tree's
    /// top level when `parent` is `None`.
    fn nth_child(&self, parent: Option<&Self::Element>, index: u32) -> Option<Self::Element>;

    fn same_element(&self, a: &Self::Element, b: &Self::Element) -> bool;
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StructuralSelector {
    steps: Vec<u32>,
}

impl StructuralSelector {
    pub fn steps(&self) -> &[u32] {
        &self.steps
    }
}

/// Selector for `element`, walking parents up to the top of the tree.
pub fn compute<T: ElementTree>(tree: &T, element: &T::Element) -> StructuralSelector {
    let mut steps = Vec::new();
    let mut current = Some(element.clone());
    while let Some(el) = current {
        steps.push(tree.index_in_parent(&el));
        current = tree.parent(&el);
    }
    steps.reverse();
    StructuralSelector { steps }
}

/// Walk the selector's steps down from the top of the tree.
pub fn resolve<T: ElementTree>(tree: &T, selector: &StructuralSelector) -> Option<T::Element> {
    let mut current: Option<T::Element> = None;
    for &index in &selector.steps {
        current = Some(tree.nth_child(current.as_ref(), index)?);
    }
    current
}

/// Resolve and insist on getting `expected` back.
pub fn resolve_same<T: ElementTree>(
    tree: &T,
    selector: &StructuralSelector,
    expected: &T::Element,
) -> Option<T::Element> {
    resolve(tree, selector).filter(|found| tree.same_element(found, expected))
}

impl fmt::Display for StructuralSelector {
    /// The first step is the document element itself, written `:root`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(":root")?;
        for index in self.steps.iter().skip(1) {
            write!(f, " > :nth-child({index})")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a structural selector: {0:?}")]
pub struct SelectorParseError(String);

impl FromStr for StructuralSelector {
    type Err = SelectorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || SelectorParseError(s.to_string());
        let mut parts = s.split('>').map(str::trim);
        if parts.next() != Some(":root") {
            return Err(err());
        }
        let mut steps = vec![1];
        for part in parts {
            let index = part
                .strip_prefix(":nth-child(")
                .and_then(|rest| rest.strip_suffix(')'))
                .and_then(|n| n.parse::<u32>().ok())
                .filter(|&n| n > 0)
                .ok_or_else(err)?;
            steps.push(index);
        }
        Ok(StructuralSelector { steps })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Arena tree: node i has `parent[i]` and ordered `children[i]`.
    struct Arena {
        parent: Vec<Option<usize>>,
        children: Vec<Vec<usize>>,
        top: Vec<usize>,
    }

    impl Arena {
        fn new() -> Self {
            Self {
                parent: Vec::new(),
                children: Vec::new(),
                top: Vec::new(),
            }
        }

        fn add(&mut self, parent: Option<usize>) -> usize {
            let id = self.parent.len();
            self.parent.push(parent);
            self.children.push(Vec::new());
            match parent {
                Some(p) => self.children[p].push(id),
                None => self.top.push(id),
            }
            id
        }

        fn remove_child(&mut self, parent: usize, child: usize) {
            self.children[parent].retain(|&c| c != child);
        }
    }

    impl ElementTree for Arena {
        type Element = usize;

        fn parent(&self, element: &usize) -> Option<usize> {
            self.parent[*element]
        }

        fn index_in_parent(&self, element: &usize) -> u32 {
            let siblings = match self.parent[*element] {
                Some(p) => &self.children[p],
                None => &self.top,
            };
            siblings.iter().position(|c| c == element).unwrap() as u32 + 1
        }

        fn nth_child(&self, parent: Option<&usize>, index: u32) -> Option<usize> {
            let siblings = match parent {
                Some(p) => &self.children[*p],
                None => &self.top,
            };
            siblings.get(index.checked_sub(1)? as usize).copied()
        }

        fn same_element(&self, a: &usize, b: &usize) -> bool {
            a == b
        }
    }

    fn sample() -> (Arena, Vec<usize>) {
        let mut t = Arena::new();
        let html = t.add(None);
        let head = t.add(Some(html));
        let body = t.add(Some(html));
        let div = t.add(Some(body));
        let form = t.add(Some(body));
        let label = t.add(Some(form));
        let input = t.add(Some(form));
        (t, vec![html, head, body, div, form, label, input])
    }

    #[test]
    fn test_round_trip_every_node() {
        let (tree, nodes) = sample();
        for node in nodes {
            let sel = compute(&tree, &node);
            assert_eq!(resolve(&tree, &sel), Some(node));
        }
    }

    #[test]
    fn test_css_form() {
        let (tree, nodes) = sample();
        let input = nodes[6];
        let sel = compute(&tree, &input);
        assert_eq!(sel.steps(), &[1, 2, 2, 2]);
        assert_eq!(
            sel.to_string(),
            ":root > :nth-child(2) > :nth-child(2) > :nth-child(2)"
        );
        assert_eq!(compute(&tree, &nodes[0]).to_string(), ":root");
    }

    #[test]
    fn test_parse_matches_display() {
        let sel: StructuralSelector = ":root > :nth-child(2) > :nth-child(10)".parse().unwrap();
        assert_eq!(sel.steps(), &[1, 2, 10]);
        assert_eq!(sel.to_string(), ":root > :nth-child(2) > :nth-child(10)");
        assert!(":root".parse::<StructuralSelector>().is_ok());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("div > p".parse::<StructuralSelector>().is_err());
        assert!(":root > :nth-child(0)".parse::<StructuralSelector>().is_err());
        assert!(":root > :nth-child(x)".parse::<StructuralSelector>().is_err());
    }

    #[test]
    fn test_resolve_same_after_mutation() {
        let (mut tree, nodes) = sample();
        let (body, div, input) = (nodes[2], nodes[3], nodes[6]);
        let sel = compute(&tree, &input);
        assert_eq!(resolve_same(&tree, &sel, &input), Some(input));

        // Removing an earlier sibling shifts indices: the path now points
        // somewhere else, or nowhere, and must not be accepted.
        tree.remove_child(body, div);
        assert_eq!(resolve_same(&tree, &sel, &input), None);
    }
}
