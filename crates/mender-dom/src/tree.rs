use crate::node::{AttributesMap, DocumentNode, TagNode, TextNode};

/// A type-safe index into a [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// Payload of an arena node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// An element with its type and attributes.
    Tag {
        /// The tag type, e.g. `"td"`.
        tag_type: String,
        /// Attributes copied from the start tag.
        attributes: AttributesMap,
    },
    /// A run of text.
    Text(String),
}

/// An arena node: payload plus index links.
#[derive(Debug, Clone)]
pub struct Node {
    /// What this node is.
    pub data: NodeData,
    /// Parent index, `None` for the root and for detached nodes.
    pub parent: Option<NodeId>,
    /// Child indices in document order.
    pub children: Vec<NodeId>,
}

/// Arena-based tree with O(1) node access.
///
/// All nodes live in one vector and refer to each other by [`NodeId`], so the
/// tree builder can keep handles to open elements while it keeps appending.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`. The root is at index 0.
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only a root tag node of the given type.
    #[must_use]
    pub fn new(root_type: &str) -> Self {
        let root = Node {
            data: NodeData::Tag {
                tag_type: root_type.to_string(),
                attributes: AttributesMap::new(),
            },
            parent: None,
            children: Vec::new(),
        };
        Self { nodes: vec![root] }
    }

    /// Get the root node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of allocated nodes, attached or not.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists from construction.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate a detached tag node.
    pub fn alloc_tag(&mut self, tag_type: impl Into<String>, attributes: AttributesMap) -> NodeId {
        self.alloc(NodeData::Tag {
            tag_type: tag_type.into(),
            attributes,
        })
    }

    /// Allocate a detached text node.
    pub fn alloc_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Text(text.into()))
    }

    /// Append `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Insert `child` at `index` among `parent`'s children, clamped to the end.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Tag type of a tag node; `None` for text nodes and unknown IDs.
    #[must_use]
    pub fn tag_type(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Tag { tag_type, .. } => Some(tag_type.as_str()),
            NodeData::Text(_) => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) => Some(s.as_str()),
            NodeData::Tag { .. } => None,
        })
    }

    /// Convert into an owned [`DocumentNode`] tree rooted at [`NodeId::ROOT`].
    ///
    /// Nodes never attached below the root are dropped. The walk uses an
    /// explicit stack, so deep nesting cannot overflow the call stack here.
    #[must_use]
    pub fn into_document_node(mut self) -> DocumentNode {
        let mut built: Vec<Option<DocumentNode>> =
            std::iter::repeat_with(|| None).take(self.nodes.len()).collect();

        // Post-order: a node is assembled once all of its children are.
        let mut pending = vec![(NodeId::ROOT, false)];
        while let Some((id, children_built)) = pending.pop() {
            if children_built {
                let node = &mut self.nodes[id.0];
                let data = std::mem::replace(&mut node.data, NodeData::Text(String::new()));
                let children = node
                    .children
                    .iter()
                    .filter_map(|child| built[child.0].take())
                    .collect();
                built[id.0] = Some(match data {
                    NodeData::Tag {
                        tag_type,
                        attributes,
                    } => DocumentNode::Tag(TagNode::with_children(tag_type, attributes, children)),
                    NodeData::Text(text) => DocumentNode::Text(TextNode::new(text)),
                });
            } else {
                pending.push((id, true));
                pending.extend(self.nodes[id.0].children.iter().map(|&child| (child, false)));
            }
        }

        built
            .into_iter()
            .next()
            .flatten()
            .unwrap_or_else(|| DocumentNode::tag("html", Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_child_clamps_index() {
        let mut tree = DomTree::new("html");
        let a = tree.alloc_tag("a", AttributesMap::new());
        let b = tree.alloc_tag("b", AttributesMap::new());
        tree.insert_child(NodeId::ROOT, 5, a);
        tree.insert_child(NodeId::ROOT, 0, b);
        assert_eq!(tree.children(NodeId::ROOT), &[b, a]);
        assert_eq!(tree.parent(a), Some(NodeId::ROOT));
    }

    #[test]
    fn detached_nodes_are_dropped_on_conversion() {
        let mut tree = DomTree::new("html");
        let _ = tree.alloc_text("orphan");
        let kept = tree.alloc_text("kept");
        tree.append_child(NodeId::ROOT, kept);

        let root = tree.into_document_node();
        assert_eq!(root, DocumentNode::tag("html", vec![DocumentNode::text("kept")]));
    }
}
