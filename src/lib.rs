#[macro_use]
mod utils;

pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod network;
pub mod particle;
pub mod renderer;
pub mod scramble;
pub mod typewriter;

use wasm_bindgen::prelude::*;
use web_sys::console;

pub use crate::color::Color;
pub use crate::config::FieldConfig;
pub use crate::error::FieldError;
pub use crate::field::{connection_alpha, particle_count, Link, ParticleField, Viewport};
pub use crate::network::ParticleNetwork;
pub use crate::particle::Particle;
pub use crate::renderer::{CanvasRenderer, Surface};
pub use crate::scramble::{HeroScramble, Scramble};
pub use crate::typewriter::{HeroTypewriter, Typewriter};

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
}

// console.time/timeEnd pair around a scope
pub struct Timer<'a> {
    name: &'a str,
}

impl<'a> Timer<'a> {
    pub fn new(name: &'a str) -> Timer<'a> {
        console::time_with_label(name);
        Timer { name }
    }
}

impl<'a> Drop for Timer<'a> {
    fn drop(&mut self) {
        console::time_end_with_label(self.name);
    }
}
