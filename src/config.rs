// Tunables of the particle field. Every field has a default, so the host page
// may pass a partial options object (or nothing at all):
//
//     new ParticleNetwork({ maxParticles: 60, seed: 7 });

use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::color::Color;
use crate::error::FieldError;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldConfig {
    // viewport pixels of width per particle
    pub pixels_per_particle: f64,
    // at most MAX_PARTICLES_LIMIT, the pair pass is O(n^2) per frame
    pub max_particles: usize,
    // velocity components are (rand - 0.5) * speed
    pub speed: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    // pairs closer than this get a connecting line
    pub link_distance: f64,
    // line alpha is link_alpha - distance / link_falloff, independent of
    // link_distance even though the defaults fade to zero at the cutoff
    pub link_falloff: f64,
    pub link_alpha: f64,
    pub link_width: f64,
    pub fill_alpha: f64,
    pub color: Color,
    // fixed seed for reproducible generations, None seeds from entropy
    pub seed: Option<u64>,
}

impl FieldConfig {
    pub const PIXELS_PER_PARTICLE: f64 = 10.0;
    pub const MAX_PARTICLES: usize = 100;
    // 500 particles is ~125k distance checks a frame
    pub const MAX_PARTICLES_LIMIT: usize = 500;
    pub const SPEED: f64 = 0.5;
    pub const LINK_DISTANCE: f64 = 150.0;
    pub const LINK_FALLOFF: f64 = 1500.0;
    pub const LINK_ALPHA: f64 = 0.1;
    pub const FILL_ALPHA: f64 = 0.2;

    // undefined and null give the defaults
    pub fn from_js(value: JsValue) -> Result<FieldConfig, FieldError> {
        if value.is_undefined() || value.is_null() {
            return Ok(FieldConfig::default());
        }
        let config: FieldConfig = serde_wasm_bindgen::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        if !(self.pixels_per_particle.is_finite() && self.pixels_per_particle > 0.0) {
            return Err(FieldError::InvalidConfig(
                "pixelsPerParticle must be a positive number",
            ));
        }
        if self.max_particles > FieldConfig::MAX_PARTICLES_LIMIT {
            return Err(FieldError::InvalidConfig("maxParticles must be at most 500"));
        }
        if !(self.speed.is_finite() && self.speed >= 0.0) {
            return Err(FieldError::InvalidConfig("speed must not be negative"));
        }
        if !(self.min_radius.is_finite() && self.min_radius > 0.0) {
            return Err(FieldError::InvalidConfig("minRadius must be positive"));
        }
        if !(self.max_radius.is_finite() && self.max_radius >= self.min_radius) {
            return Err(FieldError::InvalidConfig(
                "maxRadius must not be smaller than minRadius",
            ));
        }
        if !(self.link_distance.is_finite() && self.link_distance > 0.0) {
            return Err(FieldError::InvalidConfig("linkDistance must be positive"));
        }
        if !(self.link_falloff.is_finite() && self.link_falloff > 0.0) {
            return Err(FieldError::InvalidConfig("linkFalloff must be positive"));
        }
        if !(self.link_width.is_finite() && self.link_width > 0.0) {
            return Err(FieldError::InvalidConfig("linkWidth must be positive"));
        }
        let unit = 0.0..=1.0;
        if !unit.contains(&self.link_alpha) || !unit.contains(&self.fill_alpha) {
            return Err(FieldError::InvalidConfig("alphas must lie in [0, 1]"));
        }
        Ok(())
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            pixels_per_particle: FieldConfig::PIXELS_PER_PARTICLE,
            max_particles: FieldConfig::MAX_PARTICLES,
            speed: FieldConfig::SPEED,
            min_radius: 1.0,
            max_radius: 3.0,
            link_distance: FieldConfig::LINK_DISTANCE,
            link_falloff: FieldConfig::LINK_FALLOFF,
            link_alpha: FieldConfig::LINK_ALPHA,
            link_width: 1.0,
            fill_alpha: FieldConfig::FILL_ALPHA,
            color: Color::BRAND,
            seed: None,
        }
    }
}
