// SPDX-License-Identifier: MIT OR Apache-2.0
//! Minimal rigid body state for object instances.
//!
//! Bodies are point masses with an optional collision disk taken from the
//! object's `diskX`, `diskY` and `diskRadius` properties. The world keeps the
//! per pair distances that the collision and distance nodes query.

use crate::graph::Graph;
use crate::node::NodeId;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Contact threshold used by collision queries
pub const CONTACT_DISTANCE: f32 = 0.2;

/// Physics state of one object instance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Body {
    /// Linear velocity
    pub velocity: [f32; 2],
    /// Angular velocity in degrees per second
    pub angular_velocity: f32,
    /// Force accumulated for the next step
    pub force: [f32; 2],
    /// Whether the body touched another body in the last step
    pub manifold: bool,
    /// Gap to every other body's disk after the last step
    pub distance_infos: HashMap<NodeId, f32>,
}

/// All bodies of a play session
#[derive(Debug, Clone, Default)]
pub struct PhysicsWorld {
    bodies: IndexMap<NodeId, Body>,
    /// Gravity applied to every body
    pub gravity: [f32; 2],
}

impl PhysicsWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a body for an object instance
    pub fn add_body(&mut self, instance: NodeId) {
        self.bodies.entry(instance).or_default();
    }

    /// Get a body
    pub fn body(&self, instance: NodeId) -> Option<&Body> {
        self.bodies.get(&instance)
    }

    /// Get a mutable body
    pub fn body_mut(&mut self, instance: NodeId) -> Option<&mut Body> {
        self.bodies.get_mut(&instance)
    }

    /// Number of bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the world has no bodies
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Drop every body
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    /// Integrate forces and velocities, write positions back, refresh distances
    pub fn step(&mut self, graph: &mut Graph, dt: f32) {
        let gravity = self.gravity;
        let mut disks = Vec::with_capacity(self.bodies.len());

        for (id, body) in &mut self.bodies {
            let Some(node) = graph.node_mut(*id) else {
                continue;
            };
            body.velocity[0] += (body.force[0] + gravity[0]) * dt;
            body.velocity[1] += (body.force[1] + gravity[1]) * dt;
            body.force = [0.0, 0.0];

            let x = node.property("posX") + body.velocity[0] * dt;
            let y = node.property("posY") + body.velocity[1] * dt;
            let rotate = node.property("rotate") + body.angular_velocity * dt;
            node.set_property("posX", x);
            node.set_property("posY", y);
            node.set_property("rotate", rotate);

            let center = [x + node.property("diskX"), y + node.property("diskY")];
            disks.push((*id, center, node.property("diskRadius")));
        }

        for (id, center, radius) in &disks {
            let Some(body) = self.bodies.get_mut(id) else {
                continue;
            };
            body.distance_infos.clear();
            for (other, other_center, other_radius) in &disks {
                if other == id {
                    continue;
                }
                let gap = (center[0] - other_center[0]).hypot(center[1] - other_center[1])
                    - radius
                    - other_radius;
                body.distance_infos.insert(*other, gap);
            }
            body.manifold = body.distance_infos.values().any(|gap| *gap < CONTACT_DISTANCE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, NodeKind};

    #[test]
    fn test_step_applies_force_and_gravity() {
        let mut graph = Graph::new("test");
        let ball = graph.add_node(Node::new(NodeKind::Object));
        let mut world = PhysicsWorld::new();
        world.add_body(ball);
        world.gravity = [0.0, -10.0];
        world.body_mut(ball).unwrap().force = [10.0, 0.0];

        world.step(&mut graph, 0.5);
        let body = world.body(ball).unwrap();
        assert_eq!(body.velocity, [5.0, -5.0]);
        assert_eq!(body.force, [0.0, 0.0]);
        assert_eq!(graph.node(ball).unwrap().property("posX"), 2.5);
        assert_eq!(graph.node(ball).unwrap().property("posY"), -2.5);
    }

    #[test]
    fn test_distances_and_contacts() {
        let mut graph = Graph::new("test");
        let a = graph.add_node(Node::new(NodeKind::Object).with_property("diskRadius", 1.0));
        let b = graph.add_node(
            Node::new(NodeKind::Object)
                .with_property("posX", 3.0)
                .with_property("diskRadius", 1.0),
        );
        let mut world = PhysicsWorld::new();
        world.add_body(a);
        world.add_body(b);

        world.step(&mut graph, 0.0);
        assert_eq!(world.body(a).unwrap().distance_infos[&b], 1.0);
        assert!(!world.body(a).unwrap().manifold);

        graph.node_mut(b).unwrap().set_property("posX", 2.1);
        world.step(&mut graph, 0.0);
        assert!(world.body(a).unwrap().manifold);
        assert!(world.body(b).unwrap().manifold);
    }
}
