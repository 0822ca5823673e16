use eframe::egui::{self, Align, Layout, Ui};

use super::super::MapView;

impl MapView {
    pub(in crate::app) fn draw_top_bar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("spiderfy-demo");
            ui.separator();
            ui.label(format!("markers: {}", self.spiderfier.markers().len()));
            ui.label(format!("phase: {:?}", self.spiderfier.phase()));
            ui.label(format!("legs: {}", self.map.legs.len()));
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(format!("zoom {:.2}x", self.map.zoom));
                ui.label("scroll to zoom, right-drag to pan");
            });
        });
    }

    pub(in crate::app) fn draw_event_log(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.strong("Events");
            if ui.small_button("Clear").clicked() {
                self.event_log.borrow_mut().clear();
            }
        });

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for line in self.event_log.borrow().iter() {
                    ui.monospace(line);
                }
            });
    }
}
