// SPDX-License-Identifier: MIT OR Apache-2.0
//! Typed variable registers and their data bindings to object properties.
//!
//! A variable whose `In` terminal is wired to a Right terminal of an
//! `ObjectProperties` node is bound to a property of that node's object
//! instance. Writing the variable pushes the value to the instance (write
//! binding); once per tick the driver pulls the instance's value back into
//! the variable (read binding). Float2 terminals map to `<name>X`/`<name>Y`.

use crate::graph::Graph;
use crate::node::{NodeId, NodeKind};
use crate::terminal::{Connector, TerminalBrand};
use rand::Rng;

/// Current value of a float register
pub fn float(graph: &Graph, id: NodeId) -> Option<f32> {
    let node = graph.node(id)?;
    (node.kind == NodeKind::FloatVariable).then(|| node.property("value"))
}

/// Write a float register and its binding
pub fn set_float(graph: &mut Graph, id: NodeId, value: f32) -> bool {
    match graph.node_mut(id) {
        Some(node) if node.kind == NodeKind::FloatVariable => node.set_property("value", value),
        _ => return false,
    }
    write_binding(graph, id);
    true
}

/// Current value of a float2 register
pub fn float2(graph: &Graph, id: NodeId) -> Option<[f32; 2]> {
    let node = graph.node(id)?;
    (node.kind == NodeKind::Float2Variable).then(|| [node.property("x"), node.property("y")])
}

/// Write a float2 register and its binding
pub fn set_float2(graph: &mut Graph, id: NodeId, value: [f32; 2]) -> bool {
    match graph.node_mut(id) {
        Some(node) if node.kind == NodeKind::Float2Variable => {
            node.set_property("x", value[0]);
            node.set_property("y", value[1]);
        }
        _ => return false,
    }
    write_binding(graph, id);
    true
}

/// Current value of a float3 register
pub fn float3(graph: &Graph, id: NodeId) -> Option<[f32; 3]> {
    let node = graph.node(id)?;
    (node.kind == NodeKind::Float3Variable)
        .then(|| [node.property("x"), node.property("y"), node.property("z")])
}

/// Write a float3 register
pub fn set_float3(graph: &mut Graph, id: NodeId, value: [f32; 3]) -> bool {
    match graph.node_mut(id) {
        Some(node) if node.kind == NodeKind::Float3Variable => {
            node.set_property("x", value[0]);
            node.set_property("y", value[1]);
            node.set_property("z", value[2]);
            true
        }
        _ => false,
    }
}

/// Current angle of a direction register with its random spread applied
pub fn direction(graph: &Graph, id: NodeId, rng: &mut impl Rng) -> Option<f32> {
    let node = graph.node(id)?;
    if node.kind != NodeKind::DirectionVariable {
        return None;
    }
    let angle = node.property("angle");
    let spread = node.property("random");
    if spread > 0.0 {
        Some(angle + rng.gen_range(0.0..=spread) - spread / 2.0)
    } else {
        Some(angle)
    }
}

/// Write a direction register
pub fn set_direction(graph: &mut Graph, id: NodeId, angle: f32) -> bool {
    match graph.node_mut(id) {
        Some(node) if node.kind == NodeKind::DirectionVariable => {
            node.set_property("angle", angle);
            true
        }
        _ => false,
    }
}

/// Restore a variable's default value. Other node kinds are left alone.
pub fn restore_default(graph: &mut Graph, id: NodeId) {
    let Some(node) = graph.node_mut(id) else {
        return;
    };
    let pairs: &[(&str, &str)] = match node.kind {
        NodeKind::FloatVariable => &[("value", "defaultValue")],
        NodeKind::Float2Variable => &[("x", "defaultValueX"), ("y", "defaultValueY")],
        NodeKind::Float3Variable => &[
            ("x", "defaultValueX"),
            ("y", "defaultValueY"),
            ("z", "defaultValueZ"),
        ],
        NodeKind::DirectionVariable => &[("angle", "defaultValue")],
        _ => return,
    };
    for (key, default) in pairs {
        let value = node.property(default);
        node.set_property(key, value);
    }
}

/// Instance and property key a variable is bound to
fn bound_property(graph: &Graph, variable: NodeId) -> Option<(NodeId, String, TerminalBrand)> {
    let node = graph.node(variable)?;
    let connection = node
        .terminals
        .iter()
        .find(|t| t.connector == Connector::Left)?
        .connections
        .first()?;
    let props = graph.node(connection.to_node)?;
    if props.kind != NodeKind::ObjectProperties {
        return None;
    }
    let instance = props.target(0).instance()?;
    let terminal = props.terminal(connection.to_terminal)?;
    Some((instance, terminal.name.clone(), terminal.brand))
}

/// Push a variable's value into the property it is bound to
pub fn write_binding(graph: &mut Graph, variable: NodeId) {
    let Some((instance, key, brand)) = bound_property(graph, variable) else {
        return;
    };
    let values: Vec<(String, f32)> = match brand {
        TerminalBrand::FloatVariable => float(graph, variable)
            .map(|v| vec![(key, v)])
            .unwrap_or_default(),
        TerminalBrand::Float2Variable => float2(graph, variable)
            .map(|v| vec![(format!("{key}X"), v[0]), (format!("{key}Y"), v[1])])
            .unwrap_or_default(),
        _ => Vec::new(),
    };
    if let Some(object) = graph.node_mut(instance) {
        for (key, value) in values {
            object.set_property(&key, value);
        }
    }
}

/// `ObjectProperties` nodes among `scope` that have at least one wired data terminal
pub fn collect_bindings(graph: &Graph, scope: &[NodeId]) -> Vec<NodeId> {
    scope
        .iter()
        .copied()
        .filter(|id| {
            graph.node(*id).is_some_and(|n| {
                n.kind == NodeKind::ObjectProperties
                    && n.terminals
                        .iter()
                        .any(|t| t.connector == Connector::Right && t.is_connected())
            })
        })
        .collect()
}

/// Pull the bound instance's properties into every variable wired to a properties node
pub fn read_binding(graph: &mut Graph, properties_node: NodeId) {
    let Some(node) = graph.node(properties_node) else {
        return;
    };
    let Some(instance) = node.target(0).instance() else {
        tracing::debug!(node = %node.name, "Read binding without instance");
        return;
    };
    let Some(object) = graph.node(instance) else {
        return;
    };

    let mut writes: Vec<(NodeId, TerminalBrand, [f32; 2])> = Vec::new();
    for terminal in node.terminals.iter().filter(|t| t.connector == Connector::Right) {
        let value = match terminal.brand {
            TerminalBrand::Float2Variable => [
                object.property(&format!("{}X", terminal.name)),
                object.property(&format!("{}Y", terminal.name)),
            ],
            _ => [object.property(&terminal.name), 0.0],
        };
        for connection in &terminal.connections {
            writes.push((connection.to_node, terminal.brand, value));
        }
    }

    for (variable, brand, value) in writes {
        if let Some(target) = graph.node_mut(variable) {
            match (brand, target.kind) {
                (TerminalBrand::FloatVariable, NodeKind::FloatVariable) => {
                    target.set_property("value", value[0]);
                }
                (TerminalBrand::Float2Variable, NodeKind::Float2Variable) => {
                    target.set_property("x", value[0]);
                    target.set_property("y", value[1]);
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bound_graph() -> (Graph, NodeId, NodeId, NodeId, NodeId) {
        let mut graph = Graph::new("test");
        let object = graph.add_node(Node::new(NodeKind::Object).with_property("posX", 3.0));
        let mut props = Node::new(NodeKind::ObjectProperties);
        props.set_ui_target(0, None, Some(object));
        let props = graph.add_node(props);
        let rotate = graph.add_node(Node::new(NodeKind::FloatVariable));
        let pos = graph.add_node(Node::new(NodeKind::Float2Variable));
        graph.connect_named(props, "rotate", rotate, "In").unwrap();
        graph.connect_named(props, "pos", pos, "In").unwrap();
        graph.resolve_targets();
        (graph, object, props, rotate, pos)
    }

    #[test]
    fn test_typed_access() {
        let mut graph = Graph::new("test");
        let f = graph.add_node(Node::new(NodeKind::FloatVariable));
        let f2 = graph.add_node(Node::new(NodeKind::Float2Variable));

        assert!(set_float(&mut graph, f, 4.0));
        assert_eq!(float(&graph, f), Some(4.0));
        assert!(!set_float(&mut graph, f2, 4.0));
        assert_eq!(float(&graph, f2), None);
        assert!(set_float2(&mut graph, f2, [1.0, 2.0]));
        assert_eq!(float2(&graph, f2), Some([1.0, 2.0]));
    }

    #[test]
    fn test_write_binding() {
        let (mut graph, object, _, rotate, pos) = bound_graph();
        set_float(&mut graph, rotate, 45.0);
        set_float2(&mut graph, pos, [7.0, 8.0]);

        let object = graph.node(object).unwrap();
        assert_eq!(object.property("rotate"), 45.0);
        assert_eq!(object.property("posX"), 7.0);
        assert_eq!(object.property("posY"), 8.0);
    }

    #[test]
    fn test_read_binding() {
        let (mut graph, object, props, rotate, pos) = bound_graph();
        graph.node_mut(object).unwrap().set_property("rotate", 90.0);

        assert_eq!(collect_bindings(&graph, &[props, rotate]), vec![props]);
        read_binding(&mut graph, props);
        assert_eq!(float(&graph, rotate), Some(90.0));
        assert_eq!(float2(&graph, pos), Some([3.0, 0.0]));
    }

    #[test]
    fn test_direction_spread() {
        let mut graph = Graph::new("test");
        let dir = graph.add_node(
            Node::new(NodeKind::DirectionVariable)
                .with_property("angle", 90.0)
                .with_property("random", 20.0),
        );
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let angle = direction(&graph, dir, &mut rng).unwrap();
            assert!((80.0..=100.0).contains(&angle));
        }
    }

    #[test]
    fn test_restore_default() {
        let mut graph = Graph::new("test");
        let f = graph
            .add_node(Node::new(NodeKind::FloatVariable).with_property("defaultValue", 2.0));
        set_float(&mut graph, f, 9.0);
        restore_default(&mut graph, f);
        assert_eq!(float(&graph, f), Some(2.0));
    }
}
