/*!
The document tree: `Identifier`, `DDLNode`, and the `Document` arena
that owns every node produced by one `parse()` call.

Grounded on `kaydle-primitives::node`, but adapted from its lazy
"processor" style (built to let a serde deserializer skip allocating
nodes it never visits) to the eager, fully-owned tree this crate's
consumers navigate directly. Per §9's redesign note, `DDLNode` is
arena-allocated: a [`NodeId`] stands in for the source's owning pointer,
and `parent` is resolved by index into the same arena rather than a
borrowed reference or a raw back-pointer.
*/

use std::fmt;

use crate::{
    name::Name,
    primdata::{PrimData, PrimitiveType},
};

/// An owned identifier matching `[A-Za-z_][A-Za-z0-9_]*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Wrap an already-validated identifier string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::ops::Deref for Identifier {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// An index into a [`Document`]'s arena. Stable for the lifetime of the
/// `Document` that produced it; meaningless against any other document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// The declared shape of a node's body. A node is either structural or a
/// data list, never both (§3's core invariant) — the driver decides
/// which at construction time, from whether the node's type keyword
/// names a reserved primitive type or a user type.
#[derive(Debug)]
pub enum NodeBody {
    /// An ordered list of child nodes.
    Structural(Vec<NodeId>),
    /// The declared element type (and array width, if the declaration
    /// used `type[N]`), plus the parsed literal values. For an
    /// array-typed declaration, each value is itself a
    /// [`PrimData::Array`] element group.
    DataList {
        /// The primitive type named in the node's header.
        declared_type: PrimitiveType,
        /// The `N` of a `type[N]` declaration, if present.
        array_width: Option<usize>,
        /// The parsed, comma-separated literals (or element groups).
        values: Vec<PrimData>,
    },
}

/// One node in the parsed document tree.
#[derive(Debug)]
pub struct DDLNode {
    kind: Identifier,
    name: Option<Name>,
    properties: Vec<(Identifier, PrimData)>,
    body: NodeBody,
    parent: Option<NodeId>,
}

impl DDLNode {
    pub(crate) fn new(kind: Identifier, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            name: None,
            properties: Vec::new(),
            body: NodeBody::Structural(Vec::new()),
            parent,
        }
    }

    /// The node's type keyword (e.g. `Metric`, or `float` for a
    /// data-list node).
    pub fn kind(&self) -> &Identifier {
        &self.kind
    }

    /// The node's declared instance name, if any.
    pub fn name(&self) -> Option<&Name> {
        self.name.as_ref()
    }

    /// The `(key = literal, ...)` properties attached to this node, in
    /// declaration order.
    pub fn properties(&self) -> &[(Identifier, PrimData)] {
        &self.properties
    }

    /// True if this node carries a data list rather than children.
    pub fn is_data_list(&self) -> bool {
        matches!(self.body, NodeBody::DataList { .. })
    }

    /// The parsed literal values, for a data-list node. `None` for a
    /// structural node.
    pub fn values(&self) -> Option<&[PrimData]> {
        match &self.body {
            NodeBody::DataList { values, .. } => Some(values),
            NodeBody::Structural(_) => None,
        }
    }

    /// The declared element type, for a data-list node.
    pub fn declared_type(&self) -> Option<PrimitiveType> {
        match &self.body {
            NodeBody::DataList { declared_type, .. } => Some(*declared_type),
            NodeBody::Structural(_) => None,
        }
    }

    /// The `N` of a `type[N]` declaration, for a data-list node.
    pub fn array_width(&self) -> Option<usize> {
        match &self.body {
            NodeBody::DataList { array_width, .. } => *array_width,
            NodeBody::Structural(_) => None,
        }
    }

    fn child_ids(&self) -> &[NodeId] {
        match &self.body {
            NodeBody::Structural(children) => children,
            NodeBody::DataList { .. } => &[],
        }
    }
}

/// A borrowed view of one node, resolving child/parent links against the
/// [`Document`] it came from. This is the public accessor type: callers
/// navigate the tree through `NodeRef`, never through a raw [`NodeId`].
#[derive(Clone, Copy)]
pub struct NodeRef<'doc> {
    doc: &'doc Document,
    id: NodeId,
}

impl<'doc> NodeRef<'doc> {
    fn node(&self) -> &'doc DDLNode {
        self.doc.get(self.id)
    }

    /// The node's type keyword.
    pub fn kind(&self) -> &'doc Identifier {
        self.node().kind()
    }

    /// The node's declared instance name, if any.
    pub fn name(&self) -> Option<&'doc Name> {
        self.node().name()
    }

    /// The node's `(key = literal, ...)` properties.
    pub fn properties(&self) -> &'doc [(Identifier, PrimData)] {
        self.node().properties()
    }

    /// True if this node carries a data list rather than children.
    pub fn is_data_list(&self) -> bool {
        self.node().is_data_list()
    }

    /// The parsed literal values, for a data-list node.
    pub fn values(&self) -> Option<&'doc [PrimData]> {
        self.node().values()
    }

    /// The declared element type, for a data-list node.
    pub fn declared_type(&self) -> Option<PrimitiveType> {
        self.node().declared_type()
    }

    /// The `N` of a `type[N]` declaration, for a data-list node.
    pub fn array_width(&self) -> Option<usize> {
        self.node().array_width()
    }

    /// This node's children, for a structural node. Empty for a
    /// data-list node.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'doc>> + 'doc {
        let doc = self.doc;
        self.node()
            .child_ids()
            .iter()
            .map(move |&id| NodeRef { doc, id })
    }

    /// This node's parent, or `None` if this is the document root.
    pub fn parent(&self) -> Option<NodeRef<'doc>> {
        let doc = self.doc;
        self.node().parent.map(|id| NodeRef { doc, id })
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("kind", &self.kind().as_str())
            .field("children", &self.node().child_ids().len())
            .finish()
    }
}

/// The arena owning every node produced by one `parse()` call. Node `0`
/// is reserved as an implicit document root, whose children are the
/// buffer's top-level declarations; dropping the `Document` releases
/// the entire tree at once, same as dropping the source's root
/// `DDLNode`.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<DDLNode>,
}

const ROOT: NodeId = NodeId(0);

impl Document {
    /// Create an empty document, already containing its implicit root.
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![DDLNode::new(Identifier::new(""), None)],
        }
    }

    pub(crate) fn root_id() -> NodeId {
        ROOT
    }

    /// Add a node to the arena without linking it under any parent yet.
    /// The driver uses this so a node under construction can acquire a
    /// stable [`NodeId`] (and accept children of its own) before it's
    /// known whether the node will parse successfully; a node that's
    /// never [`attach`][Self::attach]ed is simply unreachable from
    /// [`root`][Self::root], the arena equivalent of discarding it.
    pub(crate) fn insert(&mut self, node: DDLNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Link `child` as the next child of `parent`. `parent` must be a
    /// structural node.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
        match &mut self.nodes[parent.0].body {
            NodeBody::Structural(children) => children.push(child),
            NodeBody::DataList { .. } => {
                unreachable!("data-list nodes never receive children")
            }
        }
    }

    pub(crate) fn set_name(&mut self, id: NodeId, name: Name) {
        self.nodes[id.0].name = Some(name);
    }

    pub(crate) fn set_properties(&mut self, id: NodeId, properties: Vec<(Identifier, PrimData)>) {
        self.nodes[id.0].properties = properties;
    }

    pub(crate) fn set_data_list(
        &mut self,
        id: NodeId,
        declared_type: PrimitiveType,
        array_width: Option<usize>,
        values: Vec<PrimData>,
    ) {
        self.nodes[id.0].body = NodeBody::DataList {
            declared_type,
            array_width,
            values,
        };
    }

    fn get(&self, id: NodeId) -> &DDLNode {
        &self.nodes[id.0]
    }

    /// The implicit document root, or `None` if no top-level node was
    /// ever attached to it (i.e. the source buffer was empty or
    /// contained only whitespace/comments).
    pub fn root(&self) -> Option<NodeRef<'_>> {
        if self.get(ROOT).child_ids().is_empty() {
            None
        } else {
            Some(NodeRef {
                doc: self,
                id: ROOT,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> Document {
        let mut doc = Document::new();
        let root = Document::root_id();
        let metric = doc.insert(DDLNode::new(Identifier::new("Metric"), Some(root)));
        doc.attach(root, metric);
        doc.set_properties(
            metric,
            vec![(Identifier::new("key"), PrimData::String("distance".into()))],
        );
        let float_node = doc.insert(DDLNode::new(Identifier::new("float"), Some(metric)));
        doc.attach(metric, float_node);
        doc
    }

    #[test]
    fn empty_document_has_no_root() {
        let doc = Document::new();
        assert!(doc.root().is_none());
    }

    #[test]
    fn root_exposes_top_level_children() {
        let doc = sample_document();
        let root = doc.root().expect("root should be present");
        let children: Vec<_> = root.children().collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].kind().as_str(), "Metric");
    }

    #[test]
    fn children_have_correct_parent() {
        let doc = sample_document();
        let root = doc.root().unwrap();
        let metric = root.children().next().unwrap();
        let float_node = metric.children().next().unwrap();
        assert_eq!(float_node.parent().unwrap().kind().as_str(), "Metric");
    }

    #[test]
    fn properties_are_visible() {
        let doc = sample_document();
        let root = doc.root().unwrap();
        let metric = root.children().next().unwrap();
        assert_eq!(metric.properties().len(), 1);
        assert_eq!(metric.properties()[0].0.as_str(), "key");
    }
}
