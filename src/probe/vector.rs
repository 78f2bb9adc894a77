//! Stateless 2D vector helpers.

use bevy::math::Vec2;

/// Rotates `v` counter-clockwise by `angle_degrees`.
pub fn rotate_vector(v: Vec2, angle_degrees: f32) -> Vec2 {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Moves `current` toward `target` by at most `max_delta`, never overshooting.
pub fn move_towards(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_delta || distance == 0.0 {
        target
    } else {
        current + delta / distance * max_delta
    }
}
