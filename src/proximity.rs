use eframe::egui::Pos2;

use crate::geometry::squared_distance;

/// A nearby marker paired with the screen point it was measured at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusterMember<M> {
    pub marker: M,
    pub screen_point: Pos2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NearbyPartition<M> {
    pub nearby: Vec<ClusterMember<M>>,
    pub non_nearby: Vec<M>,
}

/// Splits the visible `markers` by screen distance to `reference`.
///
/// A marker is nearby when its squared distance is strictly below
/// `pixel_threshold²`. Hidden markers appear in neither list. Both lists keep
/// the order of `markers`.
pub fn find_nearby<M, P, V>(
    reference: M,
    markers: &[M],
    pixel_threshold: f32,
    project: P,
    is_visible: V,
) -> NearbyPartition<M>
where
    M: Copy,
    P: Fn(M) -> Pos2,
    V: Fn(M) -> bool,
{
    let threshold_sq = pixel_threshold * pixel_threshold;
    let reference_point = project(reference);

    let mut nearby = Vec::new();
    let mut non_nearby = Vec::new();
    for &marker in markers {
        if !is_visible(marker) {
            continue;
        }

        let screen_point = project(marker);
        if squared_distance(screen_point, reference_point) < threshold_sq {
            nearby.push(ClusterMember {
                marker,
                screen_point,
            });
        } else {
            non_nearby.push(marker);
        }
    }

    NearbyPartition { nearby, non_nearby }
}
