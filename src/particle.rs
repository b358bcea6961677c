// Simple particle struct to keep track of individual position, velocity, and size

use nalgebra_glm as glm;
use rand::Rng;

use crate::config::FieldConfig;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: glm::DVec2,
    pub vel: glm::DVec2,
    pub radius: f64,
}

impl Particle {
    pub fn new(pos_x: f64, pos_y: f64, vel_x: f64, vel_y: f64, radius: f64) -> Particle {
        Particle {
            pos: glm::vec2(pos_x, pos_y),
            vel: glm::vec2(vel_x, vel_y),
            radius,
        }
    }

    // Uniform position inside the surface, small velocity centered on zero
    pub fn random<R: Rng>(
        rng: &mut R,
        width: f64,
        height: f64,
        config: &FieldConfig,
    ) -> Particle {
        let pos_x = rng.gen::<f64>() * width;
        let pos_y = rng.gen::<f64>() * height;
        let vel_x = (rng.gen::<f64>() - 0.5) * config.speed;
        let vel_y = (rng.gen::<f64>() - 0.5) * config.speed;
        let radius = rng.gen::<f64>() * (config.max_radius - config.min_radius) + config.min_radius;
        Particle::new(pos_x, pos_y, vel_x, vel_y, radius)
    }

    // Moves one step and flips the velocity on any axis that ended up outside
    // [0, bound]. Position is not clamped, so a particle can sit up to one step
    // past the edge before it comes back.
    pub fn advance(&mut self, width: f64, height: f64) {
        self.pos += self.vel;
        if self.pos.x < 0.0 || self.pos.x > width {
            self.vel.x *= -1.0;
        }
        if self.pos.y < 0.0 || self.pos.y > height {
            self.vel.y *= -1.0;
        }
    }

    pub fn distance_to(&self, other: &Particle) -> f64 {
        glm::distance(&self.pos, &other.pos)
    }
}
