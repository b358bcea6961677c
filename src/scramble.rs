// Hover "decode" effect for the hero name: every letter starts out as a random
// glyph and the real letters lock in from left to right, one per three ticks.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::prelude::*;

pub const TICK_MS: u32 = 30;
pub const GLYPHS: &[u8] = b"!@#$%^&*()_+~`|}{[]:;?><,./-=";
const TICKS_PER_LETTER: usize = 3;

pub struct Scramble {
    target: Vec<char>,
    // ticks since the run started; letter i is resolved once ticks > 3 * i
    ticks: usize,
    text: String,
    rng: ChaCha8Rng,
}

impl Scramble {
    pub fn new(target: &str, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Scramble {
            target: target.chars().collect(),
            ticks: 0,
            text: target.to_string(),
            rng,
        }
    }

    // new run, rng state is kept
    pub fn restart(&mut self) {
        self.ticks = 0;
    }

    // Renders the next frame into text(). Returns false on the frame that
    // shows the fully resolved target, the host stops ticking after that.
    pub fn tick(&mut self) -> bool {
        let resolved = self.resolved();
        let rng = &mut self.rng;
        self.text = self
            .target
            .iter()
            .enumerate()
            .map(|(i, &letter)| {
                if i < resolved {
                    letter
                } else {
                    GLYPHS.choose(rng).map(|&g| g as char).unwrap_or(letter)
                }
            })
            .collect();

        let done = self.is_done();
        self.ticks += 1;
        !done
    }

    pub fn is_done(&self) -> bool {
        self.ticks >= self.target.len() * TICKS_PER_LETTER
    }

    // letters locked in on the current tick
    fn resolved(&self) -> usize {
        (self.ticks + TICKS_PER_LETTER - 1) / TICKS_PER_LETTER
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[wasm_bindgen]
pub struct HeroScramble {
    inner: Scramble,
}

#[wasm_bindgen]
impl HeroScramble {
    #[wasm_bindgen(constructor)]
    pub fn new(target: &str, seed: Option<u64>) -> HeroScramble {
        HeroScramble {
            inner: Scramble::new(target, seed),
        }
    }

    pub fn tick(&mut self) -> bool {
        self.inner.tick()
    }

    pub fn restart(&mut self) {
        self.inner.restart();
    }

    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.inner.text().to_string()
    }

    #[wasm_bindgen(getter, js_name = tickMs)]
    pub fn tick_ms(&self) -> u32 {
        TICK_MS
    }
}
