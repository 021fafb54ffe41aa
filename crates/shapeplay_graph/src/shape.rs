// SPDX-License-Identifier: MIT OR Apache-2.0
//! Box shaped scene areas and the signed distance tests run against them.

use crate::node::Node;

/// A rotated box in scene space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxArea {
    /// Center of the box
    pub center: [f32; 2],
    /// Rotation in degrees
    pub rotate: f32,
    /// Half width and half height, scale applied
    pub half_extents: [f32; 2],
}

impl BoxArea {
    /// Build the box described by a `SceneArea` node's properties
    pub fn from_node(node: &Node) -> Self {
        Self {
            center: [node.property("posX"), node.property("posY")],
            rotate: node.property("rotate"),
            half_extents: [
                node.property("width") * node.property("scaleX"),
                node.property("height") * node.property("scaleY"),
            ],
        }
    }

    /// Signed distance from a point to the box outline, negative inside
    pub fn distance(&self, point: [f32; 2]) -> f32 {
        let local = rotate_cw(
            [point[0] - self.center[0], point[1] - self.center[1]],
            self.rotate.to_radians(),
        );
        let d = [
            local[0].abs() - self.half_extents[0],
            local[1].abs() - self.half_extents[1],
        ];
        let outside = d[0].max(0.0).hypot(d[1].max(0.0));
        outside + d[0].max(d[1]).min(0.0)
    }

    /// Whether a point lies strictly inside the box
    pub fn contains(&self, point: [f32; 2]) -> bool {
        self.distance(point) < 0.0
    }

    /// Whether a disk overlaps the box
    pub fn touches_disk(&self, center: [f32; 2], radius: f32) -> bool {
        self.distance(center) < radius
    }
}

/// Rotate a vector by `angle` radians in the area's local frame
pub fn rotate_cw(pos: [f32; 2], angle: f32) -> [f32; 2] {
    let (sa, ca) = angle.sin_cos();
    [pos[0] * ca - pos[1] * sa, pos[0] * sa + pos[1] * ca]
}

/// Unit vector for a direction angle in degrees, measured clockwise
pub fn direction_vector(angle: f32) -> [f32; 2] {
    let radians = (360.0 - angle).to_radians();
    [radians.cos(), radians.sin()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> BoxArea {
        BoxArea {
            center: [0.0, 0.0],
            rotate: 0.0,
            half_extents: [10.0, 10.0],
        }
    }

    #[test]
    fn test_point_in_box() {
        let area = unit_box();
        assert!(area.contains([5.0, 5.0]));
        assert!(!area.contains([11.0, 0.0]));
        assert!((area.distance([11.0, 0.0]) - 1.0).abs() < 1e-5);
        assert!((area.distance([0.0, 0.0]) + 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotated_box() {
        let area = BoxArea {
            center: [0.0, 0.0],
            rotate: 90.0,
            half_extents: [10.0, 2.0],
        };
        assert!(area.contains([0.0, 8.0]));
        assert!(!area.contains([8.0, 0.0]));
    }

    #[test]
    fn test_disk_touch() {
        let area = unit_box();
        assert!(area.touches_disk([12.0, 0.0], 3.0));
        assert!(!area.touches_disk([12.0, 0.0], 1.0));
    }

    #[test]
    fn test_direction_vector() {
        let right = direction_vector(0.0);
        assert!((right[0] - 1.0).abs() < 1e-5 && right[1].abs() < 1e-5);
        let down = direction_vector(90.0);
        assert!(down[0].abs() < 1e-5 && (down[1] + 1.0).abs() < 1e-5);
    }
}
