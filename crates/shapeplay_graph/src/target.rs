// SPDX-License-Identifier: MIT OR Apache-2.0
//! Resolved UI connection targets.
//!
//! UI connection slots hold raw node ids. Before play they are checked
//! against the graph once and turned into typed [`Target`]s so evaluation
//! never has to inspect the kind of a referenced node again.

use crate::node::{NodeId, NodeKind, UiConnection, UiConnectionKind};

/// A typed handle to a variable register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableRef {
    /// A `FloatVariable` node
    Float(NodeId),
    /// A `Float2Variable` node
    Float2(NodeId),
    /// A `Float3Variable` node
    Float3(NodeId),
    /// A `DirectionVariable` node
    Direction(NodeId),
    /// Slot not set, or pointing at something that is not a variable of the expected type
    Unbound,
}

/// The resolved form of one UI connection slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    /// Slot not set or unresolvable
    #[default]
    Unbound,
    /// A variable register
    Variable(VariableRef),
    /// A behavior tree
    Tree(NodeId),
    /// A scene root
    Scene(NodeId),
    /// A scene area and the scene that owns it
    Area {
        /// Owning scene, if known
        scene: Option<NodeId>,
        /// The area node
        area: NodeId,
    },
    /// An object instance
    Instance(NodeId),
}

impl Target {
    /// The referenced float register
    pub fn float(self) -> Option<NodeId> {
        match self {
            Target::Variable(VariableRef::Float(id)) => Some(id),
            _ => None,
        }
    }

    /// The referenced float2 register
    pub fn float2(self) -> Option<NodeId> {
        match self {
            Target::Variable(VariableRef::Float2(id)) => Some(id),
            _ => None,
        }
    }

    /// The referenced float3 register
    pub fn float3(self) -> Option<NodeId> {
        match self {
            Target::Variable(VariableRef::Float3(id)) => Some(id),
            _ => None,
        }
    }

    /// The referenced direction register
    pub fn direction(self) -> Option<NodeId> {
        match self {
            Target::Variable(VariableRef::Direction(id)) => Some(id),
            _ => None,
        }
    }

    /// The referenced behavior tree
    pub fn tree(self) -> Option<NodeId> {
        match self {
            Target::Tree(id) => Some(id),
            _ => None,
        }
    }

    /// The referenced scene
    pub fn scene(self) -> Option<NodeId> {
        match self {
            Target::Scene(id) => Some(id),
            _ => None,
        }
    }

    /// The referenced scene area
    pub fn area(self) -> Option<NodeId> {
        match self {
            Target::Area { area, .. } => Some(area),
            _ => None,
        }
    }

    /// The referenced object instance
    pub fn instance(self) -> Option<NodeId> {
        match self {
            Target::Instance(id) => Some(id),
            _ => None,
        }
    }

    /// Whether the slot resolved to something usable
    pub fn is_bound(self) -> bool {
        !matches!(self, Target::Unbound | Target::Variable(VariableRef::Unbound))
    }
}

/// Resolve one slot, given a way to look up the kind of a node
pub fn resolve(slot: &UiConnection, kind_of: impl Fn(NodeId) -> Option<NodeKind>) -> Target {
    let found = slot.target.and_then(|id| kind_of(id).map(|kind| (id, kind)));

    match slot.kind {
        UiConnectionKind::FloatVariable => Target::Variable(match found {
            Some((id, NodeKind::FloatVariable)) => VariableRef::Float(id),
            _ => VariableRef::Unbound,
        }),
        UiConnectionKind::Float2Variable => Target::Variable(match found {
            Some((id, NodeKind::Float2Variable)) => VariableRef::Float2(id),
            _ => VariableRef::Unbound,
        }),
        UiConnectionKind::Float3Variable => Target::Variable(match found {
            Some((id, NodeKind::Float3Variable)) => VariableRef::Float3(id),
            _ => VariableRef::Unbound,
        }),
        UiConnectionKind::DirectionVariable => Target::Variable(match found {
            Some((id, NodeKind::DirectionVariable)) => VariableRef::Direction(id),
            _ => VariableRef::Unbound,
        }),
        UiConnectionKind::BehaviorTree => match found {
            Some((id, NodeKind::BehaviorTree)) => Target::Tree(id),
            _ => Target::Unbound,
        },
        UiConnectionKind::Scene => match found {
            Some((id, NodeKind::Scene)) => Target::Scene(id),
            _ => Target::Unbound,
        },
        UiConnectionKind::SceneArea => match found {
            Some((area, NodeKind::SceneArea)) => Target::Area {
                scene: slot.master,
                area,
            },
            _ => Target::Unbound,
        },
        UiConnectionKind::ObjectInstance => match found {
            Some((id, NodeKind::Object)) => Target::Instance(id),
            _ => Target::Unbound,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_kind_is_unbound() {
        let float_id = NodeId::new();
        let mut slot = UiConnection::new(UiConnectionKind::Float2Variable);
        slot.target = Some(float_id);

        let target = resolve(&slot, |_| Some(NodeKind::FloatVariable));
        assert_eq!(target, Target::Variable(VariableRef::Unbound));
        assert!(!target.is_bound());
        assert_eq!(target.float2(), None);
    }

    #[test]
    fn test_missing_node_is_unbound() {
        let mut slot = UiConnection::new(UiConnectionKind::BehaviorTree);
        slot.target = Some(NodeId::new());
        assert_eq!(resolve(&slot, |_| None), Target::Unbound);
    }

    #[test]
    fn test_area_keeps_its_scene() {
        let (scene, area) = (NodeId::new(), NodeId::new());
        let mut slot = UiConnection::new(UiConnectionKind::SceneArea);
        slot.master = Some(scene);
        slot.target = Some(area);

        let target = resolve(&slot, |_| Some(NodeKind::SceneArea));
        assert_eq!(target, Target::Area { scene: Some(scene), area });
        assert_eq!(target.area(), Some(area));
    }

    #[test]
    fn test_float_resolves() {
        let id = NodeId::new();
        let mut slot = UiConnection::new(UiConnectionKind::FloatVariable);
        slot.target = Some(id);
        let target = resolve(&slot, |_| Some(NodeKind::FloatVariable));
        assert_eq!(target.float(), Some(id));
        assert!(target.is_bound());
    }
}
