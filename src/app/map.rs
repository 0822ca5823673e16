use std::collections::HashMap;

use eframe::egui::{Color32, Pos2, Rect, Vec2, vec2};
use marker_spiderfier::{LegStyle, ListenerId, ListenerKind, MapHost, MarkerEventKind};

use crate::util::stable_pair;

use super::render_utils::{circle_visible, screen_to_world, world_to_screen};

pub(super) const MARKER_RADIUS: f32 = 7.0;
const CLUSTER_SPREAD: f32 = 520.0;
const MEMBER_JITTER: f32 = 2.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct DemoMarkerId(pub(crate) usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct LegId(u64);

pub(super) struct DemoMarker {
    pub(super) label: String,
    pub(super) cluster: usize,
    pub(super) world_pos: Vec2,
    pub(super) stack_offset: i32,
}

pub(super) struct DemoLeg {
    pub(super) from: Vec2,
    pub(super) to: Vec2,
    pub(super) style: LegStyle,
}

/// Pannable, zoomable canvas standing in for a slippy map. World coordinates
/// play the role of geographic positions.
pub(crate) struct DemoMap {
    pub(super) markers: Vec<DemoMarker>,
    pub(super) legs: HashMap<LegId, DemoLeg>,
    next_leg: u64,
    listeners: Vec<(ListenerId, DemoMarkerId, ListenerKind)>,
    pub(super) rect: Rect,
    pub(super) pan: Vec2,
    pub(super) zoom: f32,
}

impl DemoMap {
    pub(super) fn generate(clusters: usize, cluster_size: usize) -> Self {
        let mut markers = Vec::new();
        for cluster in 0..clusters {
            let cluster_id = format!("cluster-{cluster}");
            let (cx, cy) = stable_pair(&cluster_id);
            let (size_jitter, _) = stable_pair(&format!("{cluster_id}/size"));
            let size = ((size_jitter.abs() * cluster_size as f32).round() as usize)
                .clamp(1, cluster_size.max(1));
            let center = vec2(cx, cy) * CLUSTER_SPREAD;

            for member in 0..size {
                let label = format!("{cluster_id}/marker-{member}");
                let (jx, jy) = stable_pair(&label);
                markers.push(DemoMarker {
                    label,
                    cluster,
                    world_pos: center + vec2(jx, jy) * MEMBER_JITTER,
                    stack_offset: 0,
                });
            }
        }

        Self {
            markers,
            legs: HashMap::new(),
            next_leg: 0,
            listeners: Vec::new(),
            rect: Rect::NOTHING,
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }

    pub(super) fn ids(&self) -> impl Iterator<Item = DemoMarkerId> + use<> {
        (0..self.markers.len()).map(DemoMarkerId)
    }

    pub(super) fn marker(&self, id: DemoMarkerId) -> &DemoMarker {
        &self.markers[id.0]
    }

    pub(super) fn screen_pos(&self, id: DemoMarkerId) -> Pos2 {
        world_to_screen(self.rect, self.pan, self.zoom, self.markers[id.0].world_pos)
    }

    pub(super) fn listeners_for(
        &self,
        marker: DemoMarkerId,
        kind: MarkerEventKind,
    ) -> Vec<ListenerId> {
        self.listeners
            .iter()
            .filter(|(_, owner, listener_kind)| *owner == marker && listener_kind.accepts(kind))
            .map(|(listener, _, _)| *listener)
            .collect()
    }

    /// Markers in paint order: spiderfied ones last so they sit on top.
    pub(super) fn draw_order(&self) -> Vec<DemoMarkerId> {
        let mut order = self.ids().collect::<Vec<_>>();
        order.sort_by_key(|id| self.markers[id.0].stack_offset);
        order
    }
}

impl MapHost for DemoMap {
    type Marker = DemoMarkerId;
    type Position = Vec2;
    type Line = LegId;

    fn project(&self, position: Vec2) -> Pos2 {
        world_to_screen(self.rect, self.pan, self.zoom, position)
    }

    fn unproject(&self, point: Pos2) -> Vec2 {
        screen_to_world(self.rect, self.pan, self.zoom, point)
    }

    fn add_line(&mut self, from: Vec2, to: Vec2, style: LegStyle) -> LegId {
        let id = LegId(self.next_leg);
        self.next_leg += 1;
        self.legs.insert(id, DemoLeg { from, to, style });
        id
    }

    fn set_line_color(&mut self, line: &LegId, color: Color32) {
        if let Some(leg) = self.legs.get_mut(line) {
            leg.style.color = color;
        }
    }

    fn remove_line(&mut self, line: LegId) {
        self.legs.remove(&line);
    }

    fn marker_position(&self, marker: DemoMarkerId) -> Vec2 {
        self.markers[marker.0].world_pos
    }

    fn set_marker_position(&mut self, marker: DemoMarkerId, position: Vec2) {
        self.markers[marker.0].world_pos = position;
    }

    fn stack_offset(&self, marker: DemoMarkerId) -> i32 {
        self.markers[marker.0].stack_offset
    }

    fn set_stack_offset(&mut self, marker: DemoMarkerId, offset: i32) {
        self.markers[marker.0].stack_offset = offset;
    }

    fn is_marker_visible(&self, marker: DemoMarkerId) -> bool {
        circle_visible(self.rect, self.screen_pos(marker), MARKER_RADIUS)
    }

    fn attach_listener(&mut self, marker: DemoMarkerId, listener: ListenerId, kind: ListenerKind) {
        self.listeners.push((listener, marker, kind));
    }

    fn detach_listener(&mut self, marker: DemoMarkerId, listener: ListenerId) {
        self.listeners
            .retain(|(id, owner, _)| !(*id == listener && *owner == marker));
    }
}
