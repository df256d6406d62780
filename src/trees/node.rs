use std::fmt;

/// Multiway decision tree node.
///
/// An internal node is labelled with the attribute it splits on and owns
/// one child per branch value, in the order the values were first
/// observed. A node without branches is a leaf labelled with a class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    label: String,
    branches: Vec<(String, Node)>,
}

impl Node {
    pub fn leaf(class: &str) -> Self {
        Self {
            label: class.to_string(),
            branches: Vec::new(),
        }
    }

    pub fn split(attribute: &str) -> Self {
        Self {
            label: attribute.to_string(),
            branches: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
    }

    pub fn is_leaf(&self) -> bool {
        self.branches.is_empty()
    }

    /// Attaches `child` under `value`. A value that is already present has its subtree replaced.
    pub fn add_branch(&mut self, value: &str, child: Node) {
        match self.branches.iter_mut().find(|(seen, _)| seen == value) {
            Some((_, existing)) => *existing = child,
            None => self.branches.push((value.to_string(), child)),
        }
    }

    /// Drops every branch, turning the node into a leaf labelled `class`.
    pub fn make_leaf(&mut self, class: &str) {
        self.branches.clear();
        self.set_label(class);
    }

    pub fn branches(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.branches
            .iter()
            .map(|(value, child)| (value.as_str(), child))
    }

    pub fn child(&self, value: &str) -> Option<&Node> {
        self.branches
            .iter()
            .find(|(seen, _)| seen == value)
            .map(|(_, child)| child)
    }

    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            return 1;
        }
        self.branches.iter().map(|(_, child)| child.leaf_count()).sum()
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.branches
            .iter()
            .map(|(_, child)| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        if self.is_leaf() {
            return writeln!(f, "{:indent$}=> {}", "", self.label, indent = indent);
        }
        for (value, child) in &self.branches {
            writeln!(f, "{:indent$}{} = {}", "", self.label, value, indent = indent)?;
            child.fmt_indented(f, indent + 2)?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
