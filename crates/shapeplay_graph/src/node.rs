// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the behavior graph.
//!
//! Every node is one value of the closed [`NodeKind`] set. `Node::new`
//! installs the terminals, default properties and UI connection slots the
//! kind needs, so a freshly created node is ready to be wired.

use crate::behavior::PlayResult;
use crate::target::Target;
use crate::terminal::{Connector, Terminal, TerminalBrand, TerminalId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Intent classification of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeBrand {
    /// Behavior tree structure, conditions and scene actions
    Behavior,
    /// Variables and property holders
    Property,
    /// Roots and scene level functions
    Function,
    /// Variable arithmetic
    Arithmetic,
}

/// Leaf node kinds: conditions and actions without behavior children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum LeafKind {
    KeyDown,
    ClickInSceneArea,
    ResetFloatVariable,
    AddConstFloatVariable,
    SubtractConstFloatVariable,
    TestFloatVariable,
    CopyFloatVariables,
    SetFloatVariable,
    AnimateFloatVariable,
    RandomDirection,
    AddFloat2Variables,
    SubtractFloat2Variables,
    CopyFloat2Variables,
    MultiplyConstFloat2Variable,
    TestFloat2Variable,
    LimitFloat2Range,
    ReflectFloat2Variables,
    StopVariableAnimations,
    ObjectApplyForce,
    ObjectApplyDirectionalForce,
    ObjectDistanceTo,
    ObjectCollisionAny,
    ObjectCollisionWith,
    ObjectTouchSceneArea,
    ResetObject,
    SceneGravity,
    SceneFinished,
    PlayScene,
}

impl LeafKind {
    /// Every leaf kind, in palette order
    pub const ALL: [LeafKind; 28] = [
        LeafKind::KeyDown,
        LeafKind::ClickInSceneArea,
        LeafKind::ResetFloatVariable,
        LeafKind::AddConstFloatVariable,
        LeafKind::SubtractConstFloatVariable,
        LeafKind::TestFloatVariable,
        LeafKind::CopyFloatVariables,
        LeafKind::SetFloatVariable,
        LeafKind::AnimateFloatVariable,
        LeafKind::RandomDirection,
        LeafKind::AddFloat2Variables,
        LeafKind::SubtractFloat2Variables,
        LeafKind::CopyFloat2Variables,
        LeafKind::MultiplyConstFloat2Variable,
        LeafKind::TestFloat2Variable,
        LeafKind::LimitFloat2Range,
        LeafKind::ReflectFloat2Variables,
        LeafKind::StopVariableAnimations,
        LeafKind::ObjectApplyForce,
        LeafKind::ObjectApplyDirectionalForce,
        LeafKind::ObjectDistanceTo,
        LeafKind::ObjectCollisionAny,
        LeafKind::ObjectCollisionWith,
        LeafKind::ObjectTouchSceneArea,
        LeafKind::ResetObject,
        LeafKind::SceneGravity,
        LeafKind::SceneFinished,
        LeafKind::PlayScene,
    ];
}

/// The closed set of node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Game root, plays scenes
    Game,
    /// Scene root, owns object instances
    Scene,
    /// Object root (one per instance)
    Object,
    /// Execution root of a behavior subtree
    BehaviorTree,
    /// Runs children until one fails
    Sequence,
    /// Runs children until one succeeds
    Selector,
    /// Flips the child result
    Inverter,
    /// Always succeeds
    Succeeder,
    /// Re-arms the root's run-once ledger
    Repeater,
    /// Delegates to another behavior tree
    ExecuteBehaviorTree,
    /// Float register
    FloatVariable,
    /// Float2 register
    Float2Variable,
    /// Float3 register
    Float3Variable,
    /// Direction register
    DirectionVariable,
    /// Exposes an object instance's properties as data terminals
    ObjectProperties,
    /// A box shaped area inside a scene
    SceneArea,
    /// Condition or action
    Leaf(LeafKind),
}

impl NodeKind {
    /// Every node kind
    pub fn all() -> impl Iterator<Item = NodeKind> {
        [
            NodeKind::Game,
            NodeKind::Scene,
            NodeKind::Object,
            NodeKind::BehaviorTree,
            NodeKind::Sequence,
            NodeKind::Selector,
            NodeKind::Inverter,
            NodeKind::Succeeder,
            NodeKind::Repeater,
            NodeKind::ExecuteBehaviorTree,
            NodeKind::FloatVariable,
            NodeKind::Float2Variable,
            NodeKind::Float3Variable,
            NodeKind::DirectionVariable,
            NodeKind::ObjectProperties,
            NodeKind::SceneArea,
        ]
        .into_iter()
        .chain(LeafKind::ALL.into_iter().map(NodeKind::Leaf))
    }

    /// Type name used by the registry and in saved graphs
    pub fn type_name(self) -> &'static str {
        match self {
            NodeKind::Game => "Game",
            NodeKind::Scene => "Scene",
            NodeKind::Object => "Object",
            NodeKind::BehaviorTree => "Behavior Tree",
            NodeKind::Sequence => "Sequence",
            NodeKind::Selector => "Selector",
            NodeKind::Inverter => "Inverter",
            NodeKind::Succeeder => "Succeeder",
            NodeKind::Repeater => "Repeater",
            NodeKind::ExecuteBehaviorTree => "Execute Behavior Tree",
            NodeKind::FloatVariable => "Float Variable",
            NodeKind::Float2Variable => "Float2 Variable",
            NodeKind::Float3Variable => "Float3 Variable",
            NodeKind::DirectionVariable => "Direction Variable",
            NodeKind::ObjectProperties => "Object Instance Props",
            NodeKind::SceneArea => "Scene Area",
            NodeKind::Leaf(leaf) => match leaf {
                LeafKind::KeyDown => "Key Down",
                LeafKind::ClickInSceneArea => "Click In Scene Area",
                LeafKind::ResetFloatVariable => "Reset Float Variable",
                LeafKind::AddConstFloatVariable => "Add Float Variable",
                LeafKind::SubtractConstFloatVariable => "Subtract Float Variable",
                LeafKind::TestFloatVariable => "Test Float Variable",
                LeafKind::CopyFloatVariables => "Copy Float Variables",
                LeafKind::SetFloatVariable => "Set Float Variable",
                LeafKind::AnimateFloatVariable => "Animate Float Variable",
                LeafKind::RandomDirection => "Random Direction",
                LeafKind::AddFloat2Variables => "Add Float2 Variables",
                LeafKind::SubtractFloat2Variables => "Subtract Float2 Variables",
                LeafKind::CopyFloat2Variables => "Copy Float2 Variables",
                LeafKind::MultiplyConstFloat2Variable => "Multiply Const Float2 Variable",
                LeafKind::TestFloat2Variable => "Test Float2 Variable",
                LeafKind::LimitFloat2Range => "Limit Float2 Range",
                LeafKind::ReflectFloat2Variables => "Reflect Float2 Variables",
                LeafKind::StopVariableAnimations => "Stop Variable Animations",
                LeafKind::ObjectApplyForce => "Object Apply Force",
                LeafKind::ObjectApplyDirectionalForce => "Object Apply Directional Force",
                LeafKind::ObjectDistanceTo => "Object Distance To",
                LeafKind::ObjectCollisionAny => "Object Collision Any",
                LeafKind::ObjectCollisionWith => "Object Collision With",
                LeafKind::ObjectTouchSceneArea => "Object Touch Scene Area",
                LeafKind::ResetObject => "Reset Object",
                LeafKind::SceneGravity => "Scene Gravity",
                LeafKind::SceneFinished => "Scene Finished",
                LeafKind::PlayScene => "Game Play Scene",
            },
        }
    }

    /// Default display name of a new node
    pub fn default_name(self) -> &'static str {
        match self {
            NodeKind::ExecuteBehaviorTree => "Execute Tree",
            NodeKind::FloatVariable => "Float",
            NodeKind::Float2Variable => "Float2",
            NodeKind::Float3Variable => "Float3",
            NodeKind::DirectionVariable => "Direction",
            NodeKind::Leaf(LeafKind::AddConstFloatVariable) => "Const + Float",
            NodeKind::Leaf(LeafKind::SubtractConstFloatVariable) => "Float - Const",
            NodeKind::Leaf(LeafKind::SetFloatVariable) => "Float = Const",
            NodeKind::Leaf(LeafKind::CopyFloatVariables) => "Float = Float",
            NodeKind::Leaf(LeafKind::ClickInSceneArea) => "Click In Area",
            NodeKind::Leaf(LeafKind::PlayScene) => "Play Scene",
            other => other.type_name(),
        }
    }

    /// Brand of nodes of this kind
    pub fn brand(self) -> NodeBrand {
        match self {
            NodeKind::Game | NodeKind::Scene | NodeKind::Object => NodeBrand::Function,
            NodeKind::FloatVariable
            | NodeKind::Float2Variable
            | NodeKind::Float3Variable
            | NodeKind::DirectionVariable
            | NodeKind::ObjectProperties
            | NodeKind::SceneArea => NodeBrand::Property,
            NodeKind::Leaf(LeafKind::PlayScene) => NodeBrand::Function,
            NodeKind::Leaf(
                LeafKind::ResetFloatVariable
                | LeafKind::AddConstFloatVariable
                | LeafKind::SubtractConstFloatVariable
                | LeafKind::TestFloatVariable
                | LeafKind::CopyFloatVariables
                | LeafKind::SetFloatVariable
                | LeafKind::AnimateFloatVariable
                | LeafKind::RandomDirection
                | LeafKind::AddFloat2Variables
                | LeafKind::SubtractFloat2Variables
                | LeafKind::CopyFloat2Variables
                | LeafKind::MultiplyConstFloat2Variable
                | LeafKind::TestFloat2Variable
                | LeafKind::LimitFloat2Range
                | LeafKind::ReflectFloat2Variables,
            ) => NodeBrand::Arithmetic,
            _ => NodeBrand::Behavior,
        }
    }

    /// Whether nodes of this kind own behavior trees and get an execution root
    pub fn is_root(self) -> bool {
        matches!(self, NodeKind::Game | NodeKind::Scene | NodeKind::Object)
    }

    /// Whether this kind folds the results of behavior children
    pub fn is_composite(self) -> bool {
        matches!(
            self,
            NodeKind::Sequence
                | NodeKind::Selector
                | NodeKind::Inverter
                | NodeKind::Succeeder
                | NodeKind::Repeater
        )
    }

    /// Whether this kind is a typed variable register
    pub fn is_variable(self) -> bool {
        matches!(
            self,
            NodeKind::FloatVariable
                | NodeKind::Float2Variable
                | NodeKind::Float3Variable
                | NodeKind::DirectionVariable
        )
    }

    /// Whether a node of this kind is skipped once its id is in the root's run ledger
    pub fn is_run_once(self) -> bool {
        matches!(self, NodeKind::Leaf(LeafKind::PlayScene))
    }
}

/// When a behavior tree is executed during play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// Every tick
    #[default]
    Always,
    /// Once, when the session starts
    OnStartup,
    /// Only through an `ExecuteBehaviorTree` node
    OnDemand,
}

impl ExecutionMode {
    /// Decode the `status` selector property
    pub fn from_property(value: f32) -> Self {
        match value.round() as i32 {
            1 => Self::OnStartup,
            2 => Self::OnDemand,
            _ => Self::Always,
        }
    }

    /// Encode as the `status` selector property
    pub fn to_property(self) -> f32 {
        match self {
            Self::Always => 0.0,
            Self::OnStartup => 1.0,
            Self::OnDemand => 2.0,
        }
    }
}

/// What a UI connection slot may point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiConnectionKind {
    /// A `FloatVariable` node
    FloatVariable,
    /// A `Float2Variable` node
    Float2Variable,
    /// A `Float3Variable` node
    Float3Variable,
    /// A `DirectionVariable` node
    DirectionVariable,
    /// A `BehaviorTree` node
    BehaviorTree,
    /// A `SceneArea` node inside a scene
    SceneArea,
    /// A `Scene` node
    Scene,
    /// An `Object` node instance
    ObjectInstance,
}

/// A UI-configured reference from a node to another node.
///
/// These are authored in the editor and persisted; they are turned into
/// [`Target`]s by `Graph::resolve_targets` before play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConnection {
    /// Expected kind of the referenced node
    pub kind: UiConnectionKind,
    /// Owning root of the target (the scene of a scene area)
    pub master: Option<NodeId>,
    /// The referenced node
    pub target: Option<NodeId>,
}

impl UiConnection {
    /// Create an empty slot
    pub fn new(kind: UiConnectionKind) -> Self {
        Self {
            kind,
            master: None,
            target: None,
        }
    }
}

/// A node instance in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Node kind
    pub kind: NodeKind,
    /// Display name (can be customized)
    pub name: String,
    /// Intent classification
    pub brand: NodeBrand,
    /// Parameters and runtime registers, keyed by property name
    pub properties: IndexMap<String, f32>,
    /// Attachment points, in authoring order
    pub terminals: Vec<Terminal>,
    /// UI-configured references
    pub ui_connections: Vec<UiConnection>,
    /// Position in the graph UI
    pub position: [f32; 2],
    /// Nodes owned by a root node (its trees, variables and property nodes)
    #[serde(default)]
    pub subset: Option<Vec<NodeId>>,
    /// Object instances placed in a scene
    #[serde(default)]
    pub instances: Vec<NodeId>,
    /// The behavior tree this node is laid out under
    #[serde(skip)]
    pub behavior_tree: Option<NodeId>,
    /// Resolved UI connections, one per slot
    #[serde(skip)]
    pub targets: Vec<Target>,
    /// Result of the last evaluation in the current tick
    #[serde(skip)]
    pub play_result: PlayResult,
}

impl Node {
    /// Create a new node of the given kind with its default layout
    pub fn new(kind: NodeKind) -> Self {
        let mut node = Self {
            id: NodeId::new(),
            kind,
            name: kind.default_name().to_string(),
            brand: kind.brand(),
            properties: IndexMap::new(),
            terminals: Vec::new(),
            ui_connections: Vec::new(),
            position: [0.0, 0.0],
            subset: None,
            instances: Vec::new(),
            behavior_tree: None,
            targets: Vec::new(),
            play_result: PlayResult::Unused,
        };
        node.setup();
        node
    }

    fn setup(&mut self) {
        use UiConnectionKind as Ui;

        type Layout = (Vec<Terminal>, Vec<Ui>, Vec<(&'static str, f32)>);

        let (terminals, slots, defaults): Layout = match self.kind {
            NodeKind::Game => (vec![], vec![], vec![]),
            NodeKind::Scene => (
                vec![],
                vec![],
                vec![("physicsGravityX", 0.0), ("physicsGravityY", -10.0)],
            ),
            NodeKind::Object => (
                vec![],
                vec![],
                vec![
                    ("posX", 0.0),
                    ("posY", 0.0),
                    ("rotate", 0.0),
                    ("scaleX", 1.0),
                    ("scaleY", 1.0),
                    ("diskX", 0.0),
                    ("diskY", 0.0),
                    ("diskRadius", 0.0),
                ],
            ),
            NodeKind::BehaviorTree => (
                vec![Terminal::behavior_out("Behavior").multi()],
                vec![],
                vec![("status", 0.0), ("treeScale", 1.0)],
            ),
            NodeKind::Sequence | NodeKind::Selector => (
                std::iter::once(Terminal::behavior_in())
                    .chain((1..=5).map(|i| Terminal::behavior_out(format!("Behavior{i}"))))
                    .collect(),
                vec![],
                vec![],
            ),
            NodeKind::Inverter | NodeKind::Succeeder | NodeKind::Repeater => (
                vec![Terminal::behavior_in(), Terminal::behavior_out("Behavior")],
                vec![],
                vec![],
            ),
            NodeKind::ExecuteBehaviorTree => (
                vec![Terminal::behavior_in()],
                vec![Ui::BehaviorTree],
                vec![],
            ),
            NodeKind::FloatVariable => (
                vec![Terminal::new("In", Connector::Left, TerminalBrand::FloatVariable)],
                vec![],
                vec![("value", 0.0), ("defaultValue", 0.0)],
            ),
            NodeKind::Float2Variable => (
                vec![Terminal::new("In", Connector::Left, TerminalBrand::Float2Variable)],
                vec![],
                vec![("x", 0.0), ("y", 0.0), ("defaultValueX", 0.0), ("defaultValueY", 0.0)],
            ),
            NodeKind::Float3Variable => (
                vec![Terminal::new("In", Connector::Left, TerminalBrand::Float3Variable)],
                vec![],
                vec![
                    ("x", 0.0),
                    ("y", 0.0),
                    ("z", 0.0),
                    ("defaultValueX", 0.0),
                    ("defaultValueY", 0.0),
                    ("defaultValueZ", 0.0),
                ],
            ),
            NodeKind::DirectionVariable => (
                vec![Terminal::new("In", Connector::Left, TerminalBrand::DirectionVariable)],
                vec![],
                vec![("angle", 0.0), ("random", 0.0), ("defaultValue", 0.0)],
            ),
            NodeKind::ObjectProperties => (
                vec![
                    Terminal::new("pos", Connector::Right, TerminalBrand::Float2Variable),
                    Terminal::new("rotate", Connector::Right, TerminalBrand::FloatVariable),
                    Terminal::new("scale", Connector::Right, TerminalBrand::Float2Variable),
                ],
                vec![Ui::ObjectInstance],
                vec![],
            ),
            NodeKind::SceneArea => (
                vec![],
                vec![],
                vec![
                    ("posX", 0.0),
                    ("posY", 0.0),
                    ("rotate", 0.0),
                    ("scaleX", 1.0),
                    ("scaleY", 1.0),
                    ("width", 10.0),
                    ("height", 10.0),
                ],
            ),
            NodeKind::Leaf(leaf) => {
                let (slots, defaults) = leaf_layout(leaf);
                (vec![Terminal::behavior_in()], slots, defaults)
            }
        };

        self.terminals = terminals;
        self.ui_connections = slots.into_iter().map(UiConnection::new).collect();
        for (key, value) in defaults {
            self.properties.insert(key.to_string(), value);
        }
        if self.kind.is_root() {
            self.subset = Some(Vec::new());
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Set a property, builder style
    pub fn with_property(mut self, key: &str, value: f32) -> Self {
        self.set_property(key, value);
        self
    }

    /// Read a property, `0.0` when unset
    pub fn property(&self, key: &str) -> f32 {
        self.properties.get(key).copied().unwrap_or(0.0)
    }

    /// Write a property
    pub fn set_property(&mut self, key: &str, value: f32) {
        match self.properties.get_mut(key) {
            Some(slot) => *slot = value,
            None => {
                self.properties.insert(key.to_string(), value);
            }
        }
    }

    /// Get a terminal by ID
    pub fn terminal(&self, terminal_id: TerminalId) -> Option<&Terminal> {
        self.terminals.iter().find(|t| t.id == terminal_id)
    }

    /// Get a mutable terminal by ID
    pub fn terminal_mut(&mut self, terminal_id: TerminalId) -> Option<&mut Terminal> {
        self.terminals.iter_mut().find(|t| t.id == terminal_id)
    }

    /// Get a terminal by name
    pub fn terminal_named(&self, name: &str) -> Option<&Terminal> {
        self.terminals.iter().find(|t| t.name == name)
    }

    /// The behavior input terminal, if the node has one
    pub fn input_terminal(&self) -> Option<&Terminal> {
        self.terminals.iter().find(|t| t.connector == Connector::Top)
    }

    /// Behavior output terminals in authoring order
    pub fn bottom_terminals(&self) -> impl Iterator<Item = &Terminal> {
        self.terminals.iter().filter(|t| t.connector == Connector::Bottom)
    }

    /// The resolved target of a UI connection slot
    pub fn target(&self, index: usize) -> Target {
        self.targets.get(index).copied().unwrap_or(Target::Unbound)
    }

    /// Point a UI connection slot at another node
    pub fn set_ui_target(
        &mut self,
        index: usize,
        master: Option<NodeId>,
        target: Option<NodeId>,
    ) -> bool {
        match self.ui_connections.get_mut(index) {
            Some(slot) => {
                slot.master = master;
                slot.target = target;
                true
            }
            None => false,
        }
    }

    /// Execution mode of a behavior tree node
    pub fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::from_property(self.property("status"))
    }
}

/// UI slots and default properties for each leaf kind
fn leaf_layout(leaf: LeafKind) -> (Vec<UiConnectionKind>, Vec<(&'static str, f32)>) {
    use UiConnectionKind::{
        DirectionVariable as Dir, Float2Variable as F2, FloatVariable as F, ObjectInstance as Inst,
        Scene, SceneArea as Area,
    };

    match leaf {
        LeafKind::KeyDown => (vec![], vec![("keyCode", 0.0)]),
        LeafKind::ClickInSceneArea => (vec![Area], vec![]),
        LeafKind::ResetFloatVariable => (vec![F], vec![]),
        LeafKind::AddConstFloatVariable => (vec![F], vec![("value", 1.0), ("max", 100.0)]),
        LeafKind::SubtractConstFloatVariable => (vec![F], vec![("value", 1.0), ("min", 0.0)]),
        LeafKind::TestFloatVariable => (vec![F], vec![("mode", 0.0), ("value", 1.0)]),
        LeafKind::CopyFloatVariables => (vec![F, F], vec![]),
        LeafKind::SetFloatVariable => (vec![F], vec![("value", 1.0)]),
        LeafKind::AnimateFloatVariable => (
            vec![F],
            vec![("mode", 0.0), ("from", 0.0), ("to", 0.0), ("duration", 1.0)],
        ),
        LeafKind::RandomDirection => (vec![Dir], vec![("from", 0.0), ("to", 90.0)]),
        LeafKind::AddFloat2Variables
        | LeafKind::SubtractFloat2Variables
        | LeafKind::ReflectFloat2Variables => (vec![F2, F2, F2], vec![]),
        LeafKind::CopyFloat2Variables => (vec![F2, F2], vec![]),
        LeafKind::MultiplyConstFloat2Variable => (
            vec![F2],
            vec![("coordinate", 0.0), ("x", 1.0), ("y", 1.0)],
        ),
        LeafKind::TestFloat2Variable => (
            vec![F2],
            vec![("coordinate", 0.0), ("mode", 0.0), ("value", 0.0)],
        ),
        LeafKind::LimitFloat2Range => (
            vec![F2],
            vec![("coordinate", 0.0), ("lower", -100.0), ("upper", 100.0)],
        ),
        LeafKind::StopVariableAnimations | LeafKind::SceneFinished => (vec![], vec![]),
        LeafKind::ObjectApplyForce => (vec![Inst, F], vec![("scale", 10.0)]),
        LeafKind::ObjectApplyDirectionalForce => (vec![Inst, F, Dir], vec![("scale", 10.0)]),
        LeafKind::ObjectDistanceTo => (vec![Inst, Inst], vec![("mode", 0.0), ("value", 0.0)]),
        LeafKind::ObjectCollisionAny | LeafKind::ResetObject => (vec![Inst], vec![]),
        LeafKind::ObjectCollisionWith => (vec![Inst, Inst], vec![]),
        LeafKind::ObjectTouchSceneArea => (vec![Inst, Area], vec![]),
        LeafKind::SceneGravity => (vec![], vec![("angle", 90.0), ("strength", 1.0)]),
        LeafKind::PlayScene => (vec![Scene], vec![]),
    }
}

/// Registry of available node types, keyed by type name
pub struct NodeRegistry {
    types: IndexMap<&'static str, NodeKind>,
}

impl NodeRegistry {
    /// Create a registry holding every built-in kind
    pub fn new() -> Self {
        Self {
            types: NodeKind::all().map(|kind| (kind.type_name(), kind)).collect(),
        }
    }

    /// Get a node kind by type name
    pub fn get(&self, type_name: &str) -> Option<NodeKind> {
        self.types.get(type_name).copied()
    }

    /// Get all registered type names
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.types.keys().copied()
    }

    /// Get kinds of a brand
    pub fn kinds_with_brand(&self, brand: NodeBrand) -> impl Iterator<Item = NodeKind> + '_ {
        self.types.values().copied().filter(move |k| k.brand() == brand)
    }

    /// Create a node from a type name
    pub fn create_node(&self, type_name: &str) -> Option<Node> {
        self.get(type_name).map(Node::new)
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
