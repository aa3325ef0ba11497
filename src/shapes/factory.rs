use std::f32::consts::{PI, TAU};

use crate::math::Vector2;
use crate::shapes::Vertices;

/// Creates a rectangle centered on the origin
pub fn rectangle(width: f32, height: f32) -> Vertices {
    let hw = width * 0.5;
    let hh = height * 0.5;

    let mut vertices: Vertices = vec![
        Vector2::new(-hw, -hh),
        Vector2::new(-hw, hh),
        Vector2::new(hw, hh),
        Vector2::new(hw, -hh),
    ]
    .into();
    vertices.force_counter_clockwise_order();
    vertices
}

/// Creates a regular polygon approximating a circle
pub fn circle(radius: f32, edge_count: usize) -> Vertices {
    ellipse(radius, radius, edge_count)
}

/// Creates a polygon approximating an ellipse with the given radii
pub fn ellipse(x_radius: f32, y_radius: f32, edge_count: usize) -> Vertices {
    let edge_count = edge_count.max(3);
    let step = TAU / edge_count as f32;

    let mut vertices: Vertices = (0..edge_count)
        .map(|i| {
            let angle = step * i as f32;
            Vector2::new(x_radius * angle.cos(), y_radius * angle.sin())
        })
        .collect();
    vertices.force_counter_clockwise_order();
    vertices
}

/// Creates a vertical capsule: a rectangle of total height `height` capped
/// by two half circles of `end_radius`.
pub fn capsule(height: f32, end_radius: f32, edges_per_cap: usize) -> Vertices {
    let edges_per_cap = edges_per_cap.max(1);
    let half_straight = (height * 0.5 - end_radius).max(0.0);
    let step = PI / edges_per_cap as f32;

    let mut vertices = Vertices::with_capacity(2 * (edges_per_cap + 1));

    // top cap, right to left
    for i in 0..=edges_per_cap {
        let angle = step * i as f32;
        vertices.push(Vector2::new(end_radius * angle.cos(), half_straight + end_radius * angle.sin()));
    }

    // bottom cap, left to right
    for i in 0..=edges_per_cap {
        let angle = PI + step * i as f32;
        vertices.push(Vector2::new(end_radius * angle.cos(), -half_straight + end_radius * angle.sin()));
    }

    vertices.force_counter_clockwise_order();
    vertices
}

/// Creates a gear outline. `tip_percentage` is the share of each tooth
/// spent on its flat tip, in `[0, 1]`.
pub fn gear(radius: f32, number_of_teeth: usize, tip_percentage: f32, tooth_height: f32) -> Vertices {
    let teeth = number_of_teeth.max(3);
    let tip = crate::math::clamp(tip_percentage, 0.0, 1.0);
    let step = TAU / teeth as f32;
    let tip_angle = step * tip * 0.5;
    let flank = (step * 0.5 - tip_angle) * 0.5;

    let mut vertices = Vertices::with_capacity(teeth * 4);
    let outer = radius + tooth_height;

    for i in 0..teeth {
        let base = step * i as f32;
        let angles = [
            (base, radius),
            (base + flank, outer),
            (base + flank + tip_angle * 2.0, outer),
            (base + flank * 2.0 + tip_angle * 2.0, radius),
        ];

        for (angle, r) in angles {
            vertices.push(Vector2::new(r * angle.cos(), r * angle.sin()));
        }
    }

    vertices.force_counter_clockwise_order();
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rectangle_area_and_order() {
        let rect = rectangle(2.0, 3.0);
        assert_eq!(rect.len(), 4);
        assert_relative_eq!(rect.get_area(), 6.0);
        assert!(rect.is_counter_clockwise());
        assert!(rect.is_convex());
    }

    #[test]
    fn circle_converges_to_pi_r_squared() {
        let c = circle(1.0, 64);
        assert_relative_eq!(c.get_area(), PI, epsilon = 0.01);
        assert!(c.is_convex());
    }

    #[test]
    fn capsule_is_convex() {
        let c = capsule(4.0, 1.0, 8);
        assert!(c.is_convex());
        assert!(c.is_counter_clockwise());
    }

    #[test]
    fn gear_is_not_convex() {
        let g = gear(2.0, 8, 0.5, 0.5);
        assert_eq!(g.len(), 32);
        assert!(!g.is_convex());
    }
}
