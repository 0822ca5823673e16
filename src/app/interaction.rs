use eframe::egui::{self, Pos2, Rect, Ui};
use marker_spiderfier::{HostEvent, MarkerEventKind};

use super::map::{DemoMarkerId, MARKER_RADIUS};
use super::render_utils::screen_to_world;
use super::MapView;

impl MapView {
    /// Returns `true` when the zoom level changed this frame.
    pub(super) fn handle_map_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) -> bool {
        if !response.hovered() {
            return false;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return false;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let map = &mut self.map;
        let world_before = screen_to_world(rect, map.pan, map.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        let zoom = (map.zoom * zoom_factor).clamp(0.05, 12.0);
        if (zoom - map.zoom).abs() <= f32::EPSILON {
            return false;
        }

        map.zoom = zoom;
        map.pan = pointer - rect.center() - (world_before * map.zoom);
        true
    }

    pub(super) fn handle_map_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.map.pan += response.drag_delta();
        }
    }

    /// Topmost marker under the pointer.
    pub(super) fn hovered_marker(&self, pointer: Option<Pos2>) -> Option<DemoMarkerId> {
        let pointer = pointer?;
        self.map
            .draw_order()
            .into_iter()
            .rev()
            .find(|id| self.map.screen_pos(*id).distance(pointer) <= MARKER_RADIUS)
    }

    pub(super) fn collect_pointer_events(
        &mut self,
        ui: &Ui,
        response: &egui::Response,
    ) -> Vec<(Option<DemoMarkerId>, MarkerEventKind)> {
        let (pointer, pointer_moved) = ui.input(|input| {
            (
                input.pointer.hover_pos(),
                input.pointer.delta() != egui::Vec2::ZERO,
            )
        });
        let hovered = if response.hovered() {
            self.hovered_marker(pointer)
        } else {
            None
        };

        let mut events = Vec::new();
        if hovered != self.hovered {
            if let Some(previous) = self.hovered {
                events.push((Some(previous), MarkerEventKind::PointerLeave));
            }
            if let Some(current) = hovered {
                events.push((Some(current), MarkerEventKind::PointerEnter));
            }
            self.hovered = hovered;
        } else if pointer_moved && hovered.is_some() {
            events.push((hovered, MarkerEventKind::PointerOver));
        }

        if response.clicked() {
            events.push((hovered, MarkerEventKind::Click));
        }

        events
    }

    pub(super) fn dispatch_pointer_events(
        &mut self,
        events: Vec<(Option<DemoMarkerId>, MarkerEventKind)>,
    ) {
        for (marker, kind) in events {
            match marker {
                Some(marker) => {
                    for listener in self.map.listeners_for(marker, kind) {
                        self.spiderfier
                            .handle_event(&mut self.map, HostEvent::Marker { listener, kind });
                    }
                }
                None if kind == MarkerEventKind::Click => {
                    self.spiderfier
                        .handle_event(&mut self.map, HostEvent::BackgroundClick);
                }
                None => {}
            }
        }
    }
}
