//! File tree expansion state
//!
//! The hierarchy itself is fixed when the session starts. Only the set of
//! expanded folders changes.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Kind of tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

/// A node of the static file hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a file leaf
    pub fn file(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::File,
            children: Vec::new(),
        }
    }

    /// Create a folder with children
    pub fn folder(id: impl Into<String>, name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::Folder,
            children,
        }
    }

    /// Whether this node can be expanded
    pub fn is_expandable(&self) -> bool {
        self.kind == NodeKind::Folder && !self.children.is_empty()
    }
}

/// Parse a hierarchy from a JSON array of nodes
pub fn tree_from_json(json: &str) -> Result<Vec<TreeNode>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Sample project hierarchy shown by a fresh session
pub fn default_tree() -> Vec<TreeNode> {
    vec![
        TreeNode::folder(
            "src",
            "src",
            vec![
                TreeNode::folder(
                    "components",
                    "components",
                    vec![
                        TreeNode::file("App.tsx", "App.tsx"),
                        TreeNode::file("Sidebar.tsx", "Sidebar.tsx"),
                        TreeNode::file("EditorArea.tsx", "EditorArea.tsx"),
                    ],
                ),
                TreeNode::file("index.css", "index.css"),
                TreeNode::file("main.tsx", "main.tsx"),
            ],
        ),
        TreeNode::folder("public", "public", vec![TreeNode::file("vite.svg", "vite.svg")]),
        TreeNode::file("package.json", "package.json"),
        TreeNode::file("tsconfig.json", "tsconfig.json"),
        TreeNode::file("README.md", "README.md"),
    ]
}

/// A visible node with its nesting depth (0-based)
#[derive(Debug, Clone, Copy)]
pub struct VisibleNode<'a> {
    pub node: &'a TreeNode,
    pub depth: usize,
}

/// Expansion state over an immutable hierarchy
#[derive(Debug, Clone, Default)]
pub struct FileTreeState {
    roots: Vec<TreeNode>,
    open_ids: HashSet<String>,
}

impl FileTreeState {
    /// Create with every folder collapsed
    pub fn new(roots: Vec<TreeNode>) -> Self {
        Self {
            roots,
            open_ids: HashSet::new(),
        }
    }

    /// Create with some folders already expanded
    pub fn with_open<I, S>(roots: Vec<TreeNode>, open: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = Self::new(roots);
        for id in open {
            let id = id.into();
            state.toggle(&id, true);
        }
        state
    }

    /// Expand or collapse a folder. Unknown ids, files and empty folders are
    /// left alone.
    pub fn toggle(&mut self, node_id: &str, is_opening: bool) {
        let expandable = self.find(node_id).is_some_and(TreeNode::is_expandable);
        if !expandable {
            return;
        }

        if is_opening {
            self.open_ids.insert(node_id.to_string());
        } else {
            self.open_ids.remove(node_id);
        }
    }

    /// Check if a folder is expanded
    pub fn is_open(&self, node_id: &str) -> bool {
        self.open_ids.contains(node_id)
    }

    /// Top-level nodes
    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    /// Find a node anywhere in the hierarchy
    pub fn find(&self, node_id: &str) -> Option<&TreeNode> {
        fn walk<'a>(nodes: &'a [TreeNode], id: &str) -> Option<&'a TreeNode> {
            nodes.iter().find_map(|node| {
                if node.id == id {
                    Some(node)
                } else {
                    walk(&node.children, id)
                }
            })
        }
        walk(&self.roots, node_id)
    }

    /// Depth-first list of nodes whose ancestors are all expanded
    pub fn visible_nodes(&self) -> Vec<VisibleNode<'_>> {
        let mut visible = Vec::new();
        let mut stack: Vec<(&TreeNode, usize)> =
            self.roots.iter().rev().map(|node| (node, 0)).collect();

        while let Some((node, depth)) = stack.pop() {
            visible.push(VisibleNode { node, depth });
            if self.is_open(&node.id) {
                stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
            }
        }
        visible
    }
}
