use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use marker_spiderfier::HostEvent;

use crate::util::short_label;

use super::map::{DemoMarkerId, MARKER_RADIUS};
use super::render_utils::{circle_visible, cluster_color, draw_background, world_to_screen};
use super::MapView;

impl MapView {
    pub(super) fn search_matches(&self) -> HashSet<DemoMarkerId> {
        let query = self.search.trim();
        if query.is_empty() {
            return HashSet::new();
        }

        let matcher = SkimMatcherV2::default();
        self.map
            .ids()
            .filter(|id| {
                matcher
                    .fuzzy_match(&self.map.marker(*id).label, query)
                    .is_some()
            })
            .collect()
    }

    pub(super) fn draw_map(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.map.rect = rect;

        if self.handle_map_zoom(ui, rect, &response) {
            self.spiderfier
                .handle_event(&mut self.map, HostEvent::ZoomChanged);
        }
        self.handle_map_pan(&response);

        let pointer_events = self.collect_pointer_events(ui, &response);
        self.dispatch_pointer_events(pointer_events);

        let painter = ui.painter_at(rect);
        let map = &self.map;
        draw_background(&painter, rect, map.pan, map.zoom);

        for leg in map.legs.values() {
            let from = world_to_screen(rect, map.pan, map.zoom, leg.from);
            let to = world_to_screen(rect, map.pan, map.zoom, leg.to);
            painter.line_segment([from, to], Stroke::new(leg.style.weight, leg.style.color));
        }

        let matches = self.search_matches();
        for id in map.draw_order() {
            let position = map.screen_pos(id);
            if !circle_visible(rect, position, MARKER_RADIUS) {
                continue;
            }

            let marker = map.marker(id);
            let hovered = self.hovered == Some(id);
            let fill = cluster_color(marker.cluster);
            painter.circle_filled(position, MARKER_RADIUS, fill);
            painter.circle_stroke(
                position,
                MARKER_RADIUS,
                Stroke::new(if hovered { 2.5 } else { 1.2 }, Color32::WHITE),
            );
            if matches.contains(&id) {
                painter.circle_stroke(
                    position,
                    MARKER_RADIUS + 4.0,
                    Stroke::new(2.0, Color32::from_rgb(250, 200, 40)),
                );
            }

            if hovered || self.spiderfier.spider_state(id).is_some() {
                painter.text(
                    position + egui::vec2(MARKER_RADIUS + 4.0, 0.0),
                    Align2::LEFT_CENTER,
                    short_label(&marker.label),
                    FontId::proportional(11.0),
                    Color32::from_rgb(30, 34, 40),
                );
            }
        }

        if response.hovered() || response.dragged() {
            ui.ctx().request_repaint();
        }
    }
}
