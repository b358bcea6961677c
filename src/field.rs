// The particle network simulation.
//
// A ParticleField owns one generation of particles sized to the current
// surface. Every frame it moves each particle by its velocity, bounces it off
// the surface edges, draws it, and joins it to every later particle closer
// than `link_distance` with a line that fades out as the distance grows.
//
// The field has no clock of its own: one call to frame() is one animation
// frame, whatever the real time between frames was.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::FieldConfig;
use crate::particle::Particle;
use crate::renderer::Surface;

// floor(width / pixels_per_particle), capped at max_particles. Zero, negative
// and non-finite widths give an empty generation.
pub fn particle_count(width: f64, config: &FieldConfig) -> usize {
    if !(width.is_finite() && width > 0.0) {
        return 0;
    }
    let count = (width / config.pixels_per_particle).floor();
    if count >= config.max_particles as f64 {
        config.max_particles
    } else {
        count as usize
    }
}

pub fn connection_alpha(distance: f64, config: &FieldConfig) -> f64 {
    (config.link_alpha - distance / config.link_falloff).max(0.0)
}

// Source of the surface size; the browser window in production.
pub trait Viewport {
    // (width, height) in CSS pixels
    fn size(&self) -> (f64, f64);
}

// Fixed-size viewport
impl Viewport for (f64, f64) {
    fn size(&self) -> (f64, f64) {
        *self
    }
}

// Proximity edge between particles a < b
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub distance: f64,
    pub alpha: f64,
}

pub struct ParticleField {
    particles: Vec<Particle>,
    width: f64,
    height: f64,
    generation: u64,
    config: FieldConfig,
    rng: ChaCha8Rng,
}

impl ParticleField {
    // Empty until the first resize
    pub fn new(config: FieldConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        ParticleField {
            particles: Vec::new(),
            width: 0.0,
            height: 0.0,
            generation: 0,
            config,
            rng,
        }
    }

    // Field holding exactly `particles`, counted as one generation
    pub fn from_particles(
        config: FieldConfig,
        width: f64,
        height: f64,
        particles: Vec<Particle>,
    ) -> Self {
        let mut field = ParticleField::new(config);
        field.width = width.max(0.0);
        field.height = height.max(0.0);
        field.particles = particles;
        field.generation = 1;
        field
    }

    // New dimensions always mean a whole new generation
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);

        let count = particle_count(self.width, &self.config);
        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            particles.push(Particle::random(
                &mut self.rng,
                self.width,
                self.height,
                &self.config,
            ));
        }
        self.particles = particles;
        self.generation += 1;
    }

    // Reads the viewport and regenerates for it, returning the size used
    pub fn fit_to<V: Viewport>(&mut self, viewport: &V) -> (f64, f64) {
        let (width, height) = viewport.size();
        self.resize(width, height);
        (self.width, self.height)
    }

    // Particles are advanced and drawn in order; each one is linked to the
    // particles after it, which have not moved yet this frame.
    pub fn frame<S: Surface>(&mut self, surface: &mut S) {
        surface.clear(self.width, self.height);
        let fill = self.config.color.to_rgba(self.config.fill_alpha);

        for i in 0..self.particles.len() {
            self.particles[i].advance(self.width, self.height);
            let p = self.particles[i];
            surface.fill_circle(&p.pos, p.radius, &fill);

            for link in self.links_from(i) {
                let style = self.config.color.to_rgba(link.alpha);
                surface.stroke_line(
                    &p.pos,
                    &self.particles[link.b].pos,
                    self.config.link_width,
                    &style,
                );
            }
        }
    }

    pub fn step(&mut self) {
        for particle in &mut self.particles {
            particle.advance(self.width, self.height);
        }
    }

    // each unordered pair at most once
    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        (0..self.particles.len()).flat_map(move |i| self.links_from(i))
    }

    fn links_from(&self, i: usize) -> impl Iterator<Item = Link> + '_ {
        let a = self.particles[i];
        let config = &self.config;
        self.particles
            .iter()
            .enumerate()
            .skip(i + 1)
            .filter_map(move |(j, b)| {
                let distance = a.distance_to(b);
                if distance < config.link_distance {
                    Some(Link {
                        a: i,
                        b: j,
                        distance,
                        alpha: connection_alpha(distance, config),
                    })
                } else {
                    None
                }
            })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_glm as glm;
    use proptest::prelude::*;

    #[derive(Debug, PartialEq)]
    enum Draw {
        Clear(f64, f64),
        Circle(glm::DVec2, f64, String),
        Line(glm::DVec2, glm::DVec2, String),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Draw>,
    }

    impl Recorder {
        fn lines(&self) -> Vec<&Draw> {
            self.calls
                .iter()
                .filter(|c| matches!(c, Draw::Line(..)))
                .collect()
        }

        fn circles(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Draw::Circle(..)))
                .count()
        }
    }

    impl Surface for Recorder {
        fn clear(&mut self, width: f64, height: f64) {
            self.calls.push(Draw::Clear(width, height));
        }

        fn fill_circle(&mut self, center: &glm::DVec2, radius: f64, style: &str) {
            self.calls.push(Draw::Circle(*center, radius, style.to_string()));
        }

        fn stroke_line(&mut self, from: &glm::DVec2, to: &glm::DVec2, _width: f64, style: &str) {
            self.calls.push(Draw::Line(*from, *to, style.to_string()));
        }
    }

    fn seeded(seed: u64) -> FieldConfig {
        FieldConfig {
            seed: Some(seed),
            ..FieldConfig::default()
        }
    }

    #[test]
    fn count_follows_width_and_cap() {
        let config = FieldConfig::default();
        assert_eq!(particle_count(800.0, &config), 80);
        assert_eq!(particle_count(805.0, &config), 80);
        assert_eq!(particle_count(9.0, &config), 0);
        assert_eq!(particle_count(1000.0, &config), 100);
        assert_eq!(particle_count(1200.0, &config), 100);
        assert_eq!(particle_count(0.0, &config), 0);
        assert_eq!(particle_count(-300.0, &config), 0);
        assert_eq!(particle_count(f64::NAN, &config), 0);
        assert_eq!(particle_count(f64::INFINITY, &config), 0);
    }

    #[test]
    fn alpha_fades_to_zero_at_cutoff() {
        let config = FieldConfig::default();
        assert_eq!(connection_alpha(0.0, &config), 0.1);
        assert_eq!(connection_alpha(150.0, &config), 0.0);
        assert_eq!(connection_alpha(400.0, &config), 0.0);
        assert!((connection_alpha(75.0, &config) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn empty_field_draws_only_the_clear() {
        let mut field = ParticleField::new(seeded(1));
        field.resize(0.0, 600.0);
        assert!(field.is_empty());

        let mut surface = Recorder::default();
        field.frame(&mut surface);
        assert_eq!(surface.calls, vec![Draw::Clear(0.0, 600.0)]);
    }

    #[test]
    fn same_seed_same_generation() {
        let mut a = ParticleField::new(seeded(9));
        let mut b = ParticleField::new(seeded(9));
        a.resize(640.0, 480.0);
        b.resize(640.0, 480.0);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn frame_draws_every_particle_and_close_pairs() {
        let particles = vec![
            Particle::new(100.0, 100.0, 0.0, 0.0, 2.0),
            Particle::new(200.0, 100.0, 0.0, 0.0, 2.0),
            Particle::new(500.0, 500.0, 0.0, 0.0, 2.0),
        ];
        let config = FieldConfig::default();
        let mut field = ParticleField::from_particles(config.clone(), 800.0, 600.0, particles);
        let mut surface = Recorder::default();
        field.frame(&mut surface);

        assert_eq!(surface.calls[0], Draw::Clear(800.0, 600.0));
        assert_eq!(surface.circles(), 3);
        assert_eq!(
            surface.calls[1],
            Draw::Circle(glm::vec2(100.0, 100.0), 2.0, "rgba(59, 130, 246, 0.2)".to_string())
        );

        let lines = surface.lines();
        assert_eq!(lines.len(), 1);
        let style = config.color.to_rgba(connection_alpha(100.0, &config));
        assert_eq!(
            lines[0],
            &Draw::Line(glm::vec2(100.0, 100.0), glm::vec2(200.0, 100.0), style)
        );
    }

    #[test]
    fn links_use_unmoved_positions_of_later_particles() {
        let particles = vec![
            Particle::new(100.0, 100.0, 0.0, 0.0, 1.0),
            Particle::new(249.9, 100.0, 0.2, 0.0, 1.0),
        ];
        let mut field =
            ParticleField::from_particles(FieldConfig::default(), 800.0, 600.0, particles);
        let mut surface = Recorder::default();
        field.frame(&mut surface);

        let lines = surface.lines();
        assert_eq!(lines.len(), 1);
        match lines[0] {
            Draw::Line(_, to, _) => assert_eq!(to.x, 249.9),
            other => panic!("unexpected draw call {:?}", other),
        }
        // After the frame the pair is past the cutoff.
        assert_eq!(field.links().count(), 0);
    }

    #[test]
    fn links_cover_each_pair_once() {
        let particles = (0..5)
            .map(|i| Particle::new(10.0 * i as f64, 0.0, 0.0, 0.0, 1.0))
            .collect();
        let field = ParticleField::from_particles(FieldConfig::default(), 800.0, 600.0, particles);
        let links: Vec<Link> = field.links().collect();
        assert_eq!(links.len(), 10);
        assert!(links.iter().all(|l| l.a < l.b));
    }

    #[test]
    fn end_to_end_frame_and_resize() {
        let mut field = ParticleField::new(seeded(2024));
        field.resize(800.0, 600.0);
        assert_eq!(field.len(), 80);
        assert_eq!(field.generation(), 1);
        for p in field.particles() {
            assert!(p.pos.x >= 0.0 && p.pos.x < 800.0);
            assert!(p.pos.y >= 0.0 && p.pos.y < 600.0);
        }

        let before: Vec<Particle> = field.particles().to_vec();
        let mut surface = Recorder::default();
        field.frame(&mut surface);
        for (old, new) in before.iter().zip(field.particles()) {
            assert_eq!(new.pos, old.pos + old.vel);
            assert!(new.pos.x >= -0.5 && new.pos.x <= 800.5);
            assert!(new.pos.y >= -0.5 && new.pos.y <= 600.5);
        }

        field.resize(1200.0, 600.0);
        assert_eq!(field.len(), 100);
        assert_eq!(field.generation(), 2);
        assert_eq!(field.width(), 1200.0);
        for p in field.particles() {
            assert!(!before.contains(p));
        }
    }

    #[test]
    fn fit_to_reads_the_viewport() {
        let mut field = ParticleField::new(seeded(4));
        assert_eq!(field.fit_to(&(640.0, 480.0)), (640.0, 480.0));
        assert_eq!(field.len(), 64);
        assert_eq!(field.generation(), 1);

        assert_eq!(field.fit_to(&(-5.0, 480.0)), (0.0, 480.0));
        assert!(field.is_empty());
        assert_eq!(field.generation(), 2);
    }

    #[test]
    fn resize_to_nothing_empties_the_field() {
        let mut field = ParticleField::new(seeded(3));
        field.resize(500.0, 500.0);
        assert_eq!(field.len(), 50);
        field.resize(-20.0, 500.0);
        assert!(field.is_empty());
        assert_eq!(field.width(), 0.0);
        assert_eq!(field.generation(), 2);
    }

    proptest! {
        #[test]
        fn count_matches_formula(width in -100.0f64..5000.0) {
            let config = FieldConfig::default();
            let expected = if width <= 0.0 {
                0
            } else {
                ((width / 10.0).floor() as usize).min(100)
            };
            prop_assert_eq!(particle_count(width, &config), expected);
        }

        #[test]
        fn particles_stay_within_one_step(
            seed in any::<u64>(),
            width in 1.0f64..2000.0,
            height in 0.0f64..1500.0,
            steps in 1usize..400,
        ) {
            let mut field = ParticleField::new(seeded(seed));
            field.resize(width, height);
            for _ in 0..steps {
                field.step();
            }
            let slack = FieldConfig::SPEED / 2.0 + 1e-9;
            for p in field.particles() {
                prop_assert!(p.pos.x >= -slack && p.pos.x <= width + slack);
                prop_assert!(p.pos.y >= -slack && p.pos.y <= height + slack);
            }
        }

        #[test]
        fn alpha_never_increases_with_distance(d1 in 0.0f64..150.0, d2 in 0.0f64..150.0) {
            let config = FieldConfig::default();
            let (near, far) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
            prop_assert!(connection_alpha(near, &config) >= connection_alpha(far, &config));
            prop_assert!(connection_alpha(far, &config) >= 0.0);
        }
    }
}
