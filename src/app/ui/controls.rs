use eframe::egui::{self, Ui};
use marker_spiderfier::SpiderfyConfig;

use super::super::MapView;

impl MapView {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Spiderfier");
        ui.separator();

        let mut config: SpiderfyConfig = *self.spiderfier.config();
        let mut changed = false;

        changed |= ui
            .checkbox(&mut config.keep_spiderfied, "Keep spiderfied on click")
            .on_hover_text("Leave the cluster expanded when one of its markers is clicked.")
            .changed();

        changed |= ui
            .add(
                egui::Slider::new(&mut config.nearby_distance, 2.0..=80.0)
                    .text("Nearby distance (px)")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Markers closer than this on screen are spiderfied together.")
            .changed();

        changed |= ui
            .add(
                egui::Slider::new(&mut config.circle_spiral_switchover, 2..=30)
                    .text("Spiral from")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Clusters with at least this many markers fan out as a spiral.")
            .changed();

        ui.collapsing("Layout tuning", |ui| {
            changed |= ui
                .add(
                    egui::Slider::new(&mut config.circle_foot_separation, 8.0..=60.0)
                        .text("Circle foot separation"),
                )
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut config.spiral_foot_separation, 8.0..=60.0)
                        .text("Spiral foot separation"),
                )
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut config.spiral_length_start, 4.0..=40.0)
                        .text("Spiral start length"),
                )
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut config.spiral_length_factor, 0.5..=12.0)
                        .text("Spiral growth"),
                )
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut config.leg_weight, 0.5..=5.0).text("Leg weight"))
                .changed();
        });

        if changed {
            match self.spiderfier.set_config(config) {
                Ok(()) => self.config_error = None,
                Err(error) => {
                    log::warn!("rejected spiderfier config: {error}");
                    self.config_error = Some(error.to_string());
                }
            }
        }
        if let Some(error) = &self.config_error {
            ui.colored_label(egui::Color32::from_rgb(200, 60, 60), error);
        }

        ui.separator();

        ui.horizontal(|ui| {
            ui.label("Search");
            ui.text_edit_singleline(&mut self.search)
                .on_hover_text("Fuzzy-match marker labels; matches get a ring.");
        });

        ui.separator();

        ui.add(egui::Slider::new(&mut self.clusters, 1..=40).text("Clusters"));
        ui.add(egui::Slider::new(&mut self.cluster_size, 1..=40).text("Max cluster size"));
        ui.horizontal(|ui| {
            if ui.button("Regenerate markers").clicked() {
                self.regenerate();
            }
            let collapse = ui.add_enabled(
                self.spiderfier.is_spiderfied(),
                egui::Button::new("Collapse"),
            );
            if collapse.clicked() {
                self.spiderfier.unspiderfy(&mut self.map);
            }
        });

        ui.separator();
        self.draw_event_log(ui);
    }
}
