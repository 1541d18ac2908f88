//! Keyboard model: which keys exist, which are enabled for the current
//! skill, and which are free to receive a toon.
//!
//! Key ids are opaque integers assigned by the input layer (here: the ASCII
//! code of the unshifted character). The model only compares them for
//! equality and ordering; `KeyId::NONE` is the reserved "no key" sentinel.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geom::{RectF, Vec2};
use crate::rng::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyId(pub u32);

impl KeyId {
    pub const NONE: KeyId = KeyId(0);

    pub fn from_char(c: char) -> Self {
        KeyId(c as u32)
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

#[derive(Debug, Clone)]
pub struct Key {
    pub glyph: char,
    pub row: u8,
    pub col: u8,
    pub enabled: bool,
    pub available: bool,
}

// Drawing metrics for the on-screen keyboard block, anchored to the bottom
// of the play area. Rows stagger rightward like a physical keyboard.
pub const KEY_CELL: f64 = 64.0;
pub const KEY_SIZE: f64 = 48.0;
pub const ROW_STAGGER: f64 = 14.0;
pub const ROW_PITCH: f64 = 58.0;
pub const BOTTOM_MARGIN: f64 = 20.0;

const COLS: u8 = 10;
const ROWS: u8 = 4;

const LAYOUT: [(&str, u8); 4] = [
    ("1234567890", 0),
    ("qwertyuiop", 1),
    ("asdfghjkl;", 2),
    ("zxcvbnm,./", 3),
];

#[derive(Debug, Clone)]
pub struct Keyboard {
    keys: BTreeMap<KeyId, Key>,
}

impl Keyboard {
    /// Builds the 4x10 map. Every key starts disabled and available; a
    /// [`Skill`] preset then enables the rows it wants in play.
    pub fn qwerty() -> Self {
        let mut keys = BTreeMap::new();
        for (row_chars, row) in LAYOUT {
            for (col, c) in row_chars.chars().enumerate() {
                keys.insert(
                    KeyId::from_char(c),
                    Key {
                        glyph: c.to_ascii_uppercase(),
                        row,
                        col: col as u8,
                        enabled: false,
                        available: true,
                    },
                );
            }
        }
        Self { keys }
    }

    pub fn contains(&self, id: KeyId) -> bool {
        self.keys.contains_key(&id)
    }

    pub fn key(&self, id: KeyId) -> &Key {
        self.keys.get(&id).expect("unknown key id")
    }

    pub fn iter(&self) -> impl Iterator<Item = (KeyId, &Key)> {
        self.keys.iter().map(|(id, key)| (*id, key))
    }

    fn set_row_enabled(&mut self, row: u8, enabled: bool) {
        for key in self.keys.values_mut() {
            if key.row == row {
                key.enabled = enabled;
            }
        }
    }

    fn set_col_enabled(&mut self, col: u8, enabled: bool) {
        for key in self.keys.values_mut() {
            if key.col == col {
                key.enabled = enabled;
            }
        }
    }

    pub fn enable_row(&mut self, row: u8) {
        self.set_row_enabled(row, true);
    }

    pub fn disable_row(&mut self, row: u8) {
        self.set_row_enabled(row, false);
    }

    pub fn enable_col(&mut self, col: u8) {
        self.set_col_enabled(col, true);
    }

    pub fn disable_col(&mut self, col: u8) {
        self.set_col_enabled(col, false);
    }

    pub fn eligible_count(&self) -> usize {
        self.keys
            .values()
            .filter(|k| k.enabled && k.available)
            .count()
    }

    /// Uniform pick among keys that are enabled and available, or
    /// `KeyId::NONE` when no key is eligible. Counting first and then taking
    /// the n-th eligible key keeps the pick uniform whatever the map order.
    pub fn rand_select_key(&self, rng: &mut Rng) -> KeyId {
        let eligible = self.eligible_count();
        if eligible == 0 {
            return KeyId::NONE;
        }
        let mut nth = rng.range_usize(eligible);
        for (id, key) in &self.keys {
            if key.enabled && key.available {
                if nth == 0 {
                    return *id;
                }
                nth -= 1;
            }
        }
        unreachable!("eligible count out of sync with key map");
    }

    /// Marks a key occupied by a toon. Unknown ids are an invariant breach.
    pub fn select_key(&mut self, id: KeyId) {
        self.keys.get_mut(&id).expect("unknown key id").available = false;
    }

    pub fn deselect_key(&mut self, id: KeyId) {
        self.keys.get_mut(&id).expect("unknown key id").available = true;
    }

    pub fn key_center(&self, id: KeyId, play: Vec2) -> Vec2 {
        let key = self.key(id);
        key_center_for(key, play)
    }

    pub fn key_rect(&self, id: KeyId, play: Vec2) -> RectF {
        RectF::from_center(self.key_center(id, play), KEY_SIZE, KEY_SIZE)
    }
}

fn key_center_for(key: &Key, play: Vec2) -> Vec2 {
    let base_x = (play.x - COLS as f64 * KEY_CELL) * 0.5;
    let x = base_x + key.row as f64 * ROW_STAGGER + key.col as f64 * KEY_CELL + KEY_CELL * 0.5;
    let y = play.y - BOTTOM_MARGIN - (ROWS - 1 - key.row) as f64 * ROW_PITCH - KEY_SIZE * 0.5;
    Vec2::new(x, y)
}

/// Difficulty tier: a key-eligibility policy plus pacing parameters applied
/// at round construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Skill {
    Positioning,
    HomeRow,
    Letters,
    Numbers,
}

impl Default for Skill {
    fn default() -> Self {
        Skill::Positioning
    }
}

impl Skill {
    pub const ALL: [Skill; 4] = [
        Skill::Positioning,
        Skill::HomeRow,
        Skill::Letters,
        Skill::Numbers,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Skill::Positioning => "Basic positioning",
            Skill::HomeRow => "Home row",
            Skill::Letters => "Letters only",
            Skill::Numbers => "Letters and numbers",
        }
    }

    pub fn apply(self, kb: &mut Keyboard) {
        match self {
            Skill::Positioning | Skill::HomeRow => {
                kb.enable_row(2);
            }
            Skill::Letters => {
                for row in 1..=3 {
                    kb.enable_row(row);
                }
            }
            Skill::Numbers => {
                for row in 0..=3 {
                    kb.enable_row(row);
                }
            }
        }
    }

    /// Speed coefficient for toon lifetimes. Zero disables escaping entirely
    /// (beginner tier); below 1.0 shortens the reaction window.
    pub fn speed_coef(self) -> f64 {
        match self {
            Skill::Positioning => 0.0,
            Skill::HomeRow => 1.0,
            Skill::Letters => 0.85,
            Skill::Numbers => 0.7,
        }
    }

    pub fn max_toons(self) -> usize {
        match self {
            Skill::Positioning => 2,
            Skill::HomeRow => 3,
            Skill::Letters => 4,
            Skill::Numbers => 5,
        }
    }
}
