// Hero role ticker: types a role title one character at a time, holds it,
// deletes it, then moves on to the next role.
//
// The host owns the timer. Each tick() performs one step and returns how many
// milliseconds to wait before the next one:
//
//     const roles = new HeroTypewriter();
//     const loop = () => {
//         const delay = roles.tick();
//         label.textContent = roles.text;
//         setTimeout(loop, delay);
//     };
//     loop();

use wasm_bindgen::prelude::*;

use crate::error::FieldError;

pub const TYPE_MS: u32 = 150;
pub const DELETE_MS: u32 = 50;
pub const HOLD_MS: u32 = 2000;

pub const DEFAULT_ROLES: [&str; 4] = [
    "Full Stack Developer",
    "UI/UX Enthusiast",
    "Open Source Contributor",
    "System Architect",
];

#[derive(Clone, Debug)]
pub struct Typewriter {
    roles: Vec<String>,
    role_index: usize,
    // chars of the current role currently shown
    typed: usize,
    deleting: bool,
    text: String,
}

impl Typewriter {
    pub fn new(roles: Vec<String>) -> Self {
        Typewriter {
            roles,
            role_index: 0,
            typed: 0,
            deleting: false,
            text: String::new(),
        }
    }

    pub fn tick(&mut self) -> u32 {
        let role_len = match self.roles.get(self.role_index) {
            Some(role) => role.chars().count(),
            None => return TYPE_MS,
        };

        let delay = if !self.deleting && self.typed >= role_len {
            self.deleting = true;
            HOLD_MS
        } else if self.deleting && self.typed == 0 {
            self.deleting = false;
            self.role_index = (self.role_index + 1) % self.roles.len();
            TYPE_MS
        } else if self.deleting {
            self.typed -= 1;
            DELETE_MS
        } else {
            self.typed += 1;
            TYPE_MS
        };

        self.text = self.roles[self.role_index].chars().take(self.typed).collect();
        delay
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn role_index(&self) -> usize {
        self.role_index
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }
}

impl Default for Typewriter {
    fn default() -> Self {
        Typewriter::new(DEFAULT_ROLES.iter().map(|r| r.to_string()).collect())
    }
}

#[wasm_bindgen]
pub struct HeroTypewriter {
    inner: Typewriter,
}

#[wasm_bindgen]
impl HeroTypewriter {
    // roles is an optional array of strings, the built-in roles are used
    // when it is omitted
    #[wasm_bindgen(constructor)]
    pub fn new(roles: JsValue) -> Result<HeroTypewriter, JsValue> {
        let inner = if roles.is_undefined() || roles.is_null() {
            Typewriter::default()
        } else {
            let roles: Vec<String> =
                serde_wasm_bindgen::from_value(roles).map_err(FieldError::from)?;
            Typewriter::new(roles)
        };
        Ok(HeroTypewriter { inner })
    }

    pub fn tick(&mut self) -> u32 {
        self.inner.tick()
    }

    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.inner.text().to_string()
    }

    #[wasm_bindgen(getter, js_name = roleIndex)]
    pub fn role_index(&self) -> usize {
        self.inner.role_index()
    }
}
