use std::f32::consts::PI;

use eframe::egui::Color32;
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegColors {
    pub usual: Color32,
    pub highlighted: Color32,
}

impl LegColors {
    pub fn highlights(self) -> bool {
        self.usual != self.highlighted
    }
}

impl Default for LegColors {
    fn default() -> Self {
        Self {
            usual: Color32::from_rgb(0x22, 0x22, 0x22),
            highlighted: Color32::from_rgb(0xff, 0x00, 0x00),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpiderfyConfig {
    pub keep_spiderfied: bool,
    pub nearby_distance: f32,
    pub circle_spiral_switchover: usize,
    pub circle_foot_separation: f32,
    pub circle_start_angle: f32,
    pub spiral_foot_separation: f32,
    pub spiral_length_start: f32,
    pub spiral_length_factor: f32,
    pub leg_weight: f32,
    pub leg_colors: LegColors,
}

impl Default for SpiderfyConfig {
    fn default() -> Self {
        Self {
            keep_spiderfied: false,
            nearby_distance: 20.0,
            circle_spiral_switchover: 9,
            circle_foot_separation: 25.0,
            circle_start_angle: PI / 6.0,
            spiral_foot_separation: 28.0,
            spiral_length_start: 11.0,
            spiral_length_factor: 5.0,
            leg_weight: 1.5,
            leg_colors: LegColors::default(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SpiderfyOptions {
    #[serde(default)]
    pub keep_spiderfied: Option<bool>,
    #[serde(default)]
    pub nearby_distance: Option<f32>,
    #[serde(default)]
    pub circle_spiral_switchover: Option<usize>,
    #[serde(default)]
    pub circle_foot_separation: Option<f32>,
    #[serde(default)]
    pub circle_start_angle: Option<f32>,
    #[serde(default)]
    pub spiral_foot_separation: Option<f32>,
    #[serde(default)]
    pub spiral_length_start: Option<f32>,
    #[serde(default)]
    pub spiral_length_factor: Option<f32>,
    #[serde(default)]
    pub leg_weight: Option<f32>,
    #[serde(default)]
    pub leg_colors: Option<LegColorOptions>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegColorOptions {
    pub usual: String,
    pub highlighted: String,
}

fn parse_color(field: &'static str, value: &str) -> Result<Color32, ConfigError> {
    Color32::from_hex(value.trim()).map_err(|_| ConfigError::InvalidColor {
        field,
        value: value.to_owned(),
    })
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

impl SpiderfyConfig {
    pub fn from_options(options: SpiderfyOptions) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let leg_colors = match options.leg_colors {
            Some(colors) => LegColors {
                usual: parse_color("legColors.usual", &colors.usual)?,
                highlighted: parse_color("legColors.highlighted", &colors.highlighted)?,
            },
            None => defaults.leg_colors,
        };

        let config = Self {
            keep_spiderfied: options.keep_spiderfied.unwrap_or(defaults.keep_spiderfied),
            nearby_distance: options.nearby_distance.unwrap_or(defaults.nearby_distance),
            circle_spiral_switchover: options
                .circle_spiral_switchover
                .unwrap_or(defaults.circle_spiral_switchover),
            circle_foot_separation: options
                .circle_foot_separation
                .unwrap_or(defaults.circle_foot_separation),
            circle_start_angle: options
                .circle_start_angle
                .unwrap_or(defaults.circle_start_angle),
            spiral_foot_separation: options
                .spiral_foot_separation
                .unwrap_or(defaults.spiral_foot_separation),
            spiral_length_start: options
                .spiral_length_start
                .unwrap_or(defaults.spiral_length_start),
            spiral_length_factor: options
                .spiral_length_factor
                .unwrap_or(defaults.spiral_length_factor),
            leg_weight: options.leg_weight.unwrap_or(defaults.leg_weight),
            leg_colors,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let options: SpiderfyOptions = serde_json::from_str(raw)?;
        Self::from_options(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("nearbyDistance", self.nearby_distance)?;
        require_positive("circleFootSeparation", self.circle_foot_separation)?;
        require_positive("spiralFootSeparation", self.spiral_foot_separation)?;
        require_positive("spiralLengthStart", self.spiral_length_start)?;
        require_positive("spiralLengthFactor", self.spiral_length_factor)?;
        require_positive("legWeight", self.leg_weight)?;

        if !self.circle_start_angle.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "circleStartAngle",
                value: self.circle_start_angle,
            });
        }
        if self.circle_spiral_switchover == 0 {
            return Err(ConfigError::ZeroSwitchover);
        }

        Ok(())
    }
}
