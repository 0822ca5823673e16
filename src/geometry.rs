use std::f32::consts::TAU;

use eframe::egui::{Pos2, pos2};

/// Per-index angle nudge that keeps late spiral feet off earlier rays.
const SPIRAL_ANGLE_DRIFT: f32 = 0.0005;

pub fn squared_distance(a: Pos2, b: Pos2) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx) + (dy * dy)
}

pub fn centroid(points: &[Pos2]) -> Option<Pos2> {
    if points.is_empty() {
        return None;
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for point in points {
        sum_x += point.x;
        sum_y += point.y;
    }

    let count = points.len() as f32;
    Some(pos2(sum_x / count, sum_y / count))
}

/// Radius of the circle [`circle_points`] lays `count` feet on.
pub fn circle_leg_length(count: usize, foot_separation: f32) -> f32 {
    let circumference = foot_separation * (count as f32 + 2.0);
    circumference / TAU
}

/// Evenly spaced feet on a circle around `center`, starting at `start_angle`.
///
/// The circumference is padded by two foot separations so small clusters do
/// not crowd the center.
pub fn circle_points(
    count: usize,
    center: Pos2,
    start_angle: f32,
    foot_separation: f32,
) -> Vec<Pos2> {
    if count == 0 {
        return Vec::new();
    }

    let leg_length = circle_leg_length(count, foot_separation);
    let angle_step = TAU / count as f32;

    (0..count)
        .map(|index| {
            let angle = start_angle + (index as f32 * angle_step);
            pos2(
                center.x + (leg_length * angle.cos()),
                center.y + (leg_length * angle.sin()),
            )
        })
        .collect()
}

/// Feet on an outward spiral around `center`, tightest first.
///
/// Each foot depends on the leg length and angle left behind by the previous
/// one, so the sequence is generated strictly in order.
pub fn spiral_points(
    count: usize,
    center: Pos2,
    length_start: f32,
    foot_separation: f32,
    length_factor: f32,
) -> Vec<Pos2> {
    let mut leg_length = length_start;
    let mut angle = 0.0_f32;
    let mut points = Vec::with_capacity(count);

    for index in 0..count {
        angle += (foot_separation / leg_length) + (index as f32 * SPIRAL_ANGLE_DRIFT);
        points.push(pos2(
            center.x + (leg_length * angle.cos()),
            center.y + (leg_length * angle.sin()),
        ));
        leg_length += (TAU * length_factor) / angle;
    }

    points
}

/// Removes and returns the item with the smallest key.
///
/// The remaining items keep their relative order. Ties go to the earliest
/// item.
pub fn extract_closest<T, F>(items: &mut Vec<T>, key: F) -> Option<T>
where
    F: Fn(&T) -> f32,
{
    let mut best: Option<(usize, f32)> = None;
    for (index, item) in items.iter().enumerate() {
        let value = key(item);
        match best {
            Some((_, best_value)) if value >= best_value => {}
            _ => best = Some((index, value)),
        }
    }

    best.map(|(index, _)| items.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-3;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() <= EPSILON
    }

    #[test]
    fn squared_distance_skips_the_root() {
        assert_eq!(squared_distance(pos2(0.0, 0.0), pos2(3.0, 4.0)), 25.0);
        assert_eq!(squared_distance(pos2(-1.0, 2.0), pos2(-1.0, 2.0)), 0.0);
    }

    #[test]
    fn centroid_averages_both_axes() {
        let points = [pos2(0.0, 0.0), pos2(4.0, 0.0), pos2(4.0, 6.0), pos2(0.0, 6.0)];
        assert_eq!(centroid(&points), Some(pos2(2.0, 3.0)));
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn circle_feet_share_radius_and_spacing() {
        let center = pos2(100.0, 50.0);
        for count in 1..=12 {
            let points = circle_points(count, center, std::f32::consts::PI / 6.0, 25.0);
            assert_eq!(points.len(), count);

            let expected_radius = circle_leg_length(count, 25.0);
            let step = TAU / count as f32;
            for (index, point) in points.iter().enumerate() {
                let offset = *point - center;
                assert!(close(offset.length(), expected_radius));

                let angle = offset.y.atan2(offset.x);
                let expected = std::f32::consts::PI / 6.0 + (index as f32 * step);
                let diff = (angle - expected).rem_euclid(TAU);
                assert!(diff < EPSILON || (TAU - diff) < EPSILON);
            }
        }
    }

    #[test]
    fn circle_with_no_feet_is_empty() {
        assert!(circle_points(0, pos2(0.0, 0.0), 0.0, 25.0).is_empty());
    }

    #[test]
    fn spiral_leg_length_grows_monotonically() {
        let center = pos2(10.0, -5.0);
        for factor in [0.5, 1.0, 5.0, 12.0] {
            let points = spiral_points(40, center, 11.0, 28.0, factor);
            assert_eq!(points.len(), 40);

            let radii = points
                .iter()
                .map(|point| (*point - center).length())
                .collect::<Vec<_>>();
            assert!(close(radii[0], 11.0));
            for pair in radii.windows(2) {
                assert!(pair[1] > pair[0], "spiral shrank: {pair:?}");
            }
        }
    }

    #[test]
    fn spiral_first_foot_follows_recurrence() {
        let points = spiral_points(2, pos2(0.0, 0.0), 11.0, 28.0, 5.0);
        let first_angle = 28.0_f32 / 11.0;
        assert!(close(points[0].x, 11.0 * first_angle.cos()));
        assert!(close(points[0].y, 11.0 * first_angle.sin()));

        let second_length = 11.0 + (TAU * 5.0) / first_angle;
        let second_angle = first_angle + (28.0 / second_length) + SPIRAL_ANGLE_DRIFT;
        assert!(close(points[1].x, second_length * second_angle.cos()));
        assert!(close(points[1].y, second_length * second_angle.sin()));
    }

    #[test]
    fn extract_closest_keeps_remaining_order() {
        let mut items = vec![5.0_f32, 2.0, 9.0, 2.0, 7.0];
        let picked = extract_closest(&mut items, |value| *value);
        assert_eq!(picked, Some(2.0));
        assert_eq!(items, vec![5.0, 9.0, 2.0, 7.0]);
    }

    #[test]
    fn extract_closest_prefers_first_tie() {
        let mut items = vec![("a", 1.0_f32), ("b", 1.0), ("c", 3.0)];
        let picked = extract_closest(&mut items, |item| item.1);
        assert_eq!(picked.map(|item| item.0), Some("a"));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].0, "b");
    }

    #[test]
    fn extract_closest_on_empty_returns_none() {
        let mut items: Vec<f32> = Vec::new();
        assert_eq!(extract_closest(&mut items, |value| *value), None);
    }
}
