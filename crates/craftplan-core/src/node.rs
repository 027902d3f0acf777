//! Acquisition tree nodes.
//!
//! A [`TreeNode::Root`] answers "how do I obtain X" as an OR over strategies.
//! Craft and smelt nodes are ANDs over their workstation, fuel and
//! ingredient subtrees; mine and hunt nodes are leaves (or ORs over leaves)
//! that only carry tool dependencies.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::inventory::Inventory;
use crate::types::{ActionKind, ItemStack, Operator};
use crate::variant::{VariantGroup, VariantMode};

/// State captured when a node was built. Never re-derived afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeContext {
    /// Inventory visible to the branch when the node was created.
    pub inventory: Inventory,

    /// Recursion depth of the owning root.
    pub depth: usize,

    /// Item names resolved on the way down to this node.
    pub parent_path: Vec<String>,
}

/// "How do I obtain `what`".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootNode {
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_mode: Option<VariantMode>,
    pub what: VariantGroup<String>,
    pub count: u32,
    pub children: VariantGroup<TreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<NodeContext>,
}

/// Craft `count` times one of the aligned result/ingredient variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftNode {
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_mode: Option<VariantMode>,
    /// `crafting_table` or `inventory`.
    pub what: VariantGroup<String>,
    /// Number of crafting operations.
    pub count: u32,
    /// Output per crafting operation, one entry per variant.
    pub result: VariantGroup<ItemStack>,
    /// Input per crafting operation; index `i` belongs to `result` index `i`.
    pub ingredients: VariantGroup<Vec<ItemStack>>,
    pub children: VariantGroup<TreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<NodeContext>,
}

/// Break `count` blocks of one of the `what` variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineNode {
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_mode: Option<VariantMode>,
    /// Block names.
    pub what: VariantGroup<String>,
    pub count: u32,
    /// Item dropped by each block; index `i` belongs to `what` index `i`.
    pub target_item: VariantGroup<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<VariantGroup<String>>,
    pub children: VariantGroup<TreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<NodeContext>,
}

/// Smelt `count` units of `input` into `result` in a furnace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmeltNode {
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_mode: Option<VariantMode>,
    /// Always the furnace.
    pub what: VariantGroup<String>,
    pub count: u32,
    pub input: VariantGroup<ItemStack>,
    pub result: VariantGroup<ItemStack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel: Option<VariantGroup<ItemStack>>,
    pub children: VariantGroup<TreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<NodeContext>,
}

/// Kill `count` of one of the `what` mobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HuntNode {
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_mode: Option<VariantMode>,
    /// Mob names.
    pub what: VariantGroup<String>,
    pub count: u32,
    /// Requested items this mob's loot produces.
    pub target_item: VariantGroup<String>,
    pub children: VariantGroup<TreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<NodeContext>,
}

/// A node of the acquisition tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TreeNode {
    Root(RootNode),
    Craft(CraftNode),
    Mine(MineNode),
    Smelt(SmeltNode),
    Hunt(HuntNode),
}

macro_rules! common_field {
    (mut $self:expr, $field:ident) => {
        match $self {
            TreeNode::Root(n) => &mut n.$field,
            TreeNode::Craft(n) => &mut n.$field,
            TreeNode::Mine(n) => &mut n.$field,
            TreeNode::Smelt(n) => &mut n.$field,
            TreeNode::Hunt(n) => &mut n.$field,
        }
    };
    ($self:expr, $field:ident) => {
        match $self {
            TreeNode::Root(n) => &n.$field,
            TreeNode::Craft(n) => &n.$field,
            TreeNode::Mine(n) => &n.$field,
            TreeNode::Smelt(n) => &n.$field,
            TreeNode::Hunt(n) => &n.$field,
        }
    };
}

impl RootNode {
    /// Root with no children yet.
    pub fn new(what: VariantGroup<String>, count: u32, context: NodeContext) -> Self {
        Self {
            operator: Operator::Or,
            variant_mode: Some(what.mode),
            what,
            count,
            children: VariantGroup::empty(VariantMode::AnyOf),
            context: Some(context),
        }
    }

    /// Name the root asks for first.
    pub fn primary_item(&self) -> Option<&str> {
        self.what.first().map(String::as_str)
    }
}

impl TreeNode {
    pub fn action(&self) -> ActionKind {
        match self {
            TreeNode::Root(_) => ActionKind::Root,
            TreeNode::Craft(_) => ActionKind::Craft,
            TreeNode::Mine(_) => ActionKind::Mine,
            TreeNode::Smelt(_) => ActionKind::Smelt,
            TreeNode::Hunt(_) => ActionKind::Hunt,
        }
    }

    pub fn operator(&self) -> Operator {
        *common_field!(self, operator)
    }

    pub fn variant_mode(&self) -> Option<VariantMode> {
        *common_field!(self, variant_mode)
    }

    pub fn what(&self) -> &VariantGroup<String> {
        common_field!(self, what)
    }

    pub fn count(&self) -> u32 {
        *common_field!(self, count)
    }

    pub fn children(&self) -> &VariantGroup<TreeNode> {
        common_field!(self, children)
    }

    pub fn children_mut(&mut self) -> &mut VariantGroup<TreeNode> {
        common_field!(mut self, children)
    }

    pub fn context(&self) -> Option<&NodeContext> {
        common_field!(self, context).as_ref()
    }

    pub fn as_root(&self) -> Option<&RootNode> {
        match self {
            TreeNode::Root(root) => Some(root),
            _ => None,
        }
    }

    /// Root node with no ways to obtain its item.
    pub fn is_empty_root(&self) -> bool {
        matches!(self, TreeNode::Root(root) if root.children.is_empty())
    }

    /// Number of alternatives the node's primary variant group carries.
    pub fn variant_count(&self) -> usize {
        match self {
            TreeNode::Craft(n) => n.result.len(),
            TreeNode::Smelt(n) => n.input.len(),
            other => other.what().len(),
        }
    }

    /// Drop the variant mode once a node carries a single variant.
    pub fn simplify_variants(&mut self) {
        let single = self.variant_count() <= 1;
        let mode = common_field!(mut self, variant_mode);
        if single {
            *mode = None;
        }
    }

    /// Items this node yields when it runs.
    pub fn outputs(&self) -> Vec<&str> {
        match self {
            TreeNode::Root(n) => n.what.values().map(String::as_str).collect(),
            TreeNode::Craft(n) => n.result.values().map(|s| s.name.as_str()).collect(),
            TreeNode::Mine(n) => n.target_item.values().map(String::as_str).collect(),
            TreeNode::Smelt(n) => n.result.values().map(|s| s.name.as_str()).collect(),
            TreeNode::Hunt(n) => n.target_item.values().map(String::as_str).collect(),
        }
    }

    /// Visit this node and every descendant, parents first.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a TreeNode)) {
        visit(self);
        for child in self.children().values() {
            child.walk(visit);
        }
    }

    /// Collect every node (this one included) matching `predicate`.
    pub fn find_all(&self, predicate: impl Fn(&TreeNode) -> bool) -> Vec<&TreeNode> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if predicate(node) {
                found.push(node);
            }
        });
        found
    }

    /// Total number of nodes in the subtree.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }

    /// Longest root-to-leaf path length, in nodes.
    pub fn height(&self) -> usize {
        1 + self
            .children()
            .values()
            .map(TreeNode::height)
            .max()
            .unwrap_or(0)
    }

    /// Content hash of the subtree, used to detect filter convergence.
    pub fn fingerprint(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}

impl From<RootNode> for TreeNode {
    fn from(root: RootNode) -> Self {
        TreeNode::Root(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(block: &str, item: &str) -> TreeNode {
        TreeNode::Mine(MineNode {
            operator: Operator::And,
            variant_mode: None,
            what: VariantGroup::single(block.to_string()),
            count: 1,
            target_item: VariantGroup::single(item.to_string()),
            tool: None,
            children: VariantGroup::default(),
            context: None,
        })
    }

    #[test]
    fn test_root_serializes_with_action_tag() {
        let mut root = RootNode::new(
            VariantGroup::single("cobblestone".to_string()),
            3,
            NodeContext::default(),
        );
        root.children.push(leaf("stone", "cobblestone"));
        let json = serde_json::to_value(TreeNode::Root(root)).unwrap();
        assert_eq!(json["action"], "root");
        assert_eq!(json["operator"], "OR");
        assert_eq!(json["children"]["variants"][0]["value"]["action"], "mine");
    }

    #[test]
    fn test_walk_and_counts() {
        let mut root = RootNode::new(
            VariantGroup::single("cobblestone".to_string()),
            1,
            NodeContext::default(),
        );
        root.children.push(leaf("stone", "cobblestone"));
        root.children.push(leaf("cobblestone", "cobblestone"));
        let node = TreeNode::Root(root);
        assert_eq!(node.node_count(), 3);
        assert_eq!(node.height(), 2);
        assert_eq!(node.find_all(|n| n.action() == ActionKind::Mine).len(), 2);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = leaf("stone", "cobblestone");
        let b = leaf("deepslate", "cobbled_deepslate");
        assert_eq!(a.fingerprint(), a.clone().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_simplify_drops_mode_for_single_variant() {
        let mut root = TreeNode::Root(RootNode::new(
            VariantGroup::single("stick".to_string()),
            1,
            NodeContext::default(),
        ));
        assert_eq!(root.variant_mode(), Some(VariantMode::OneOf));
        root.simplify_variants();
        assert_eq!(root.variant_mode(), None);
    }

    #[test]
    fn test_empty_root_round_trips_without_context() {
        let json = r#"{"action":"root","operator":"OR","what":{"mode":"one_of","variants":[{"value":"stick"}]},"count":2,"children":{"mode":"any_of","variants":[]}}"#;
        let node: TreeNode = serde_json::from_str(json).unwrap();
        assert!(node.is_empty_root());
        assert!(node.context().is_none());
    }
}
