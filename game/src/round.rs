//! Round controller: spawn scheduling, scoring, streaks and round timing.
//!
//! Side effects (audio cues, host requests) are returned as [`RoundEffect`]
//! values from [`Round::update`] / [`Round::key_down`]; the shell performs
//! them. Key availability is released in exactly two places — a successful
//! hit in `key_down`, and the escape/off-screen reclaim in `update` — so a
//! key can never be left stuck unavailable after its toon leaves play.

use crate::geom::{RectF, Vec2};
use crate::keyboard::{KEY_SIZE, KeyId, Keyboard, Skill};
use crate::rng::Rng;
use crate::round_clock::RoundClock;
use crate::sfx::{SfxCue, boing_for_score};
use crate::toon::{Placement, Toon, ToonEvent, ToonState};

pub const STREAK_BONUS_LIFETIME: f64 = 1.0;
pub const WRONG_KEY_PENALTY: f64 = 1.0;
pub const INITIAL_SPAWN_DELAY: f64 = 3.0;
pub const INITIAL_STREAK_THRESHOLD: u32 = 5;
pub const STREAK_MAX_INCREMENT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Preset,
    Playing,
    GameOver,
}

/// Key events as the shell reports them; gameplay keys arrive as opaque ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundInput {
    Escape,
    Screenshot,
    Key(KeyId),
}

/// Fire-and-forget side effects for the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEffect {
    Cue(SfxCue),
    LeaveRound,
    SaveScreenshot,
}

/// Ephemeral bonus popup; filtered out once the round time passes
/// `expiration`.
#[derive(Debug, Clone)]
pub struct BonusPopup {
    pub text: String,
    pub pos: Vec2,
    pub expiration: f64,
}

/// One in-play pairing: the key id and the index of the owning pool slot.
/// The pool owns the toons; holding an index avoids dangling references when
/// slots are reset. Spawn order is list order.
#[derive(Debug, Clone)]
pub struct ActiveToon {
    pub key: KeyId,
    pub toon: usize,
    pub placement: Option<Placement>,
}

#[derive(Debug)]
pub struct Round {
    duration: f64,
    speed_coef: f64,
    max_toons: usize,
    play: Vec2,

    phase: RoundPhase,
    clock: RoundClock,
    keyboard: Keyboard,
    toons: Vec<Toon>,
    toon_sizes: Vec<Vec2>,
    pairs: Vec<ActiveToon>,
    popups: Vec<BonusPopup>,

    score: f64,
    time_penalty: f64,
    streak_count: u32,
    streak_floor: u32,
    streak_threshold: u32,
    next_spawn_time: f64,
    perfect_game: bool,
    perfect_bonus_awarded: bool,
    leave_requested: bool,

    rng: Rng,
}

impl Round {
    /// `toon_sizes` carries the unscaled sprite dimensions of the pool, one
    /// entry per slot; the effective concurrency clamps to the pool size, so
    /// a short sprite sequence silently lowers the cap.
    pub fn new(skill: Skill, duration: f64, play: Vec2, toon_sizes: Vec<Vec2>, rng: Rng) -> Self {
        let mut keyboard = Keyboard::qwerty();
        skill.apply(&mut keyboard);

        let speed_coef = skill.speed_coef();
        let toons = toon_sizes.iter().map(|_| Toon::new(speed_coef)).collect();

        Self {
            duration,
            speed_coef,
            max_toons: skill.max_toons().min(toon_sizes.len()),
            play,
            phase: RoundPhase::Preset,
            clock: RoundClock::new(),
            keyboard,
            toons,
            toon_sizes,
            pairs: Vec::new(),
            popups: Vec::new(),
            score: 0.0,
            time_penalty: 0.0,
            streak_count: 0,
            streak_floor: 0,
            streak_threshold: INITIAL_STREAK_THRESHOLD,
            next_spawn_time: INITIAL_SPAWN_DELAY,
            perfect_game: true,
            perfect_bonus_awarded: false,
            leave_requested: false,
            rng,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn seconds(&self) -> f64 {
        self.clock.seconds()
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn time_penalty(&self) -> f64 {
        self.time_penalty
    }

    pub fn streak_count(&self) -> u32 {
        self.streak_count
    }

    pub fn streak_floor(&self) -> u32 {
        self.streak_floor
    }

    pub fn streak_threshold(&self) -> u32 {
        self.streak_threshold
    }

    pub fn is_perfect(&self) -> bool {
        self.perfect_game
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn toons(&self) -> &[Toon] {
        &self.toons
    }

    pub fn active(&self) -> &[ActiveToon] {
        &self.pairs
    }

    pub fn popups(&self) -> &[BonusPopup] {
        &self.popups
    }

    /// One frame of round logic. Order matters: a pending leave request
    /// preempts everything else this tick.
    pub fn update(&mut self, dt: f64) -> Vec<RoundEffect> {
        let mut effects = Vec::new();

        if self.leave_requested {
            self.leave_requested = false;
            effects.push(RoundEffect::LeaveRound);
            return effects;
        }

        if self.clock.is_paused() {
            self.clock.resume();
        }
        self.clock.tick(dt);

        if self.phase != RoundPhase::GameOver {
            if self.clock.seconds() + self.time_penalty > self.duration {
                self.enter_game_over(&mut effects);
            } else {
                self.run_active_tick(dt, &mut effects);
            }
        }

        self.expire_popups();
        effects
    }

    fn run_active_tick(&mut self, dt: f64, effects: &mut Vec<RoundEffect>) {
        if self.clock.seconds() > self.next_spawn_time {
            if self.phase == RoundPhase::Preset {
                // The round proper starts at the first spawn; restart so
                // duration and penalty comparisons are round-relative.
                self.phase = RoundPhase::Playing;
                self.clock.restart();
            }
            self.try_spawn(effects);
            self.schedule_next_spawn();
        }

        self.advance_toons(dt, effects);

        let toons = &self.toons;
        self.pairs.retain(|pair| !toons[pair.toon].is_available());
    }

    fn try_spawn(&mut self, effects: &mut Vec<RoundEffect>) {
        let Some(toon_idx) = self.rand_available_toon() else {
            return;
        };
        let key = self.keyboard.rand_select_key(&mut self.rng);
        if key.is_none() {
            return;
        }
        self.keyboard.select_key(key);
        self.toons[toon_idx].spawn();
        self.pairs.push(ActiveToon {
            key,
            toon: toon_idx,
            placement: None,
        });
        effects.push(RoundEffect::Cue(SfxCue::Grow));
    }

    fn advance_toons(&mut self, dt: f64, effects: &mut Vec<RoundEffect>) {
        let play_rect = RectF::new(0.0, 0.0, self.play.x, self.play.y);

        for i in 0..self.pairs.len() {
            let key = self.pairs[i].key;
            let toon_idx = self.pairs[i].toon;

            if self.toons[toon_idx].update(dt) == Some(ToonEvent::Escaped) {
                // The single authoritative escape path: release the key,
                // break the streak, report the shrink cue.
                self.keyboard.deselect_key(key);
                self.reset_streak();
                effects.push(RoundEffect::Cue(SfxCue::Shrink));
                self.pairs[i].placement = None;
                continue;
            }

            let anchor = self.toon_anchor(key, toon_idx);
            let size = self.toon_sizes[toon_idx];
            let placement = self.toons[toon_idx].placement(anchor, size, &mut self.rng);

            if let Some(p) = placement {
                if p.scale > 0.0 {
                    let rect = RectF::from_center(p.pos, size.x * p.scale, size.y * p.scale);
                    if !rect.intersects(&play_rect) {
                        // Never leave an active toon rendered off-screen. A
                        // hurled toon was already hit (key released, streak
                        // banked); anything else left play unhit.
                        let was_unhit = self.toons[toon_idx].state() != ToonState::Hurled;
                        self.toons[toon_idx].reset();
                        if was_unhit {
                            self.keyboard.deselect_key(key);
                            self.reset_streak();
                        }
                        self.pairs[i].placement = None;
                        continue;
                    }
                }
            }
            self.pairs[i].placement = placement;
        }
    }

    fn enter_game_over(&mut self, effects: &mut Vec<RoundEffect>) {
        self.phase = RoundPhase::GameOver;
        if self.perfect_game && !self.perfect_bonus_awarded {
            // Latched: awarded exactly once however many ticks follow.
            self.perfect_bonus_awarded = true;
            let bonus = self.score;
            let center = Vec2::new(self.play.x * 0.5, self.play.y * 0.5);
            self.add_popup(bonus, center);
            effects.push(RoundEffect::Cue(SfxCue::StreakBonus));
        }
    }

    pub fn key_down(&mut self, input: RoundInput) -> Vec<RoundEffect> {
        match input {
            RoundInput::Escape => {
                self.leave_requested = true;
                self.clock.pause();
                Vec::new()
            }
            RoundInput::Screenshot => vec![RoundEffect::SaveScreenshot],
            RoundInput::Key(code) => {
                if self.phase != RoundPhase::Playing {
                    return Vec::new();
                }
                self.gameplay_key(code)
            }
        }
    }

    fn gameplay_key(&mut self, code: KeyId) -> Vec<RoundEffect> {
        // First match in spawn order wins.
        for i in 0..self.pairs.len() {
            let key = self.pairs[i].key;
            let toon_idx = self.pairs[i].toon;
            if key == code && self.toons[toon_idx].is_in_game() {
                self.keyboard.deselect_key(key);
                let score = self.toons[toon_idx].hurl(&mut self.rng);
                self.score += score;
                let mut effects = vec![RoundEffect::Cue(boing_for_score(score))];
                if let Some(cue) = self.inc_streak(key) {
                    effects.push(cue);
                }
                return effects;
            }
        }

        // Wrong key, or a key with no live toon: costs time, breaks the
        // streak.
        self.time_penalty += WRONG_KEY_PENALTY;
        self.reset_streak();
        vec![RoundEffect::Cue(SfxCue::Buzz)]
    }

    fn inc_streak(&mut self, key: KeyId) -> Option<RoundEffect> {
        self.streak_count += 1;
        if self.streak_count != self.streak_threshold {
            return None;
        }
        // Milestone: bank the floor, pay the bonus at the struck key, grow
        // the threshold with decelerating increments.
        self.streak_floor = self.streak_count;
        let bonus = f64::from(10 * self.streak_threshold);
        let pos = self.keyboard.key_center(key, self.play);
        self.add_popup(bonus, pos);
        self.streak_threshold += self.streak_threshold.min(STREAK_MAX_INCREMENT);
        Some(RoundEffect::Cue(SfxCue::StreakBonus))
    }

    fn reset_streak(&mut self) {
        self.streak_count = self.streak_floor;
        self.perfect_game = false;
    }

    fn add_popup(&mut self, bonus: f64, pos: Vec2) {
        self.popups.push(BonusPopup {
            text: format!("+{}", bonus as i64),
            pos,
            expiration: self.clock.seconds() + STREAK_BONUS_LIFETIME,
        });
        self.score += bonus;
    }

    fn expire_popups(&mut self) {
        let now = self.clock.seconds();
        self.popups.retain(|p| now <= p.expiration);
    }

    fn schedule_next_spawn(&mut self) {
        // Rescheduled whether or not the spawn attempt succeeded, so a full
        // board retries after a bounded delay.
        let coef = if self.speed_coef > 0.0 {
            self.speed_coef
        } else {
            1.0
        };
        self.next_spawn_time = self.clock.seconds() + coef * self.rng.range_f64(0.3, 1.0);
    }

    fn rand_available_toon(&mut self) -> Option<usize> {
        let in_game = self.toons.iter().filter(|t| t.is_in_game()).count();
        if in_game >= self.max_toons {
            return None;
        }
        let available = self.toons.iter().filter(|t| t.is_available()).count();
        if available == 0 {
            return None;
        }
        let mut nth = self.rng.range_usize(available);
        for (i, toon) in self.toons.iter().enumerate() {
            if toon.is_available() {
                if nth == 0 {
                    return Some(i);
                }
                nth -= 1;
            }
        }
        None
    }

    /// Resting center for a paired toon: just above its key.
    pub fn toon_anchor(&self, key: KeyId, toon_idx: usize) -> Vec2 {
        let center = self.keyboard.key_center(key, self.play);
        let size = self.toon_sizes[toon_idx];
        center - Vec2::new(0.0, 0.5 * (KEY_SIZE + size.y))
    }

    /// Time-bar fill: counts down to the first spawn during Preset, then up
    /// toward the round end (penalties shorten the effective remainder).
    pub fn fill_ratio(&self) -> f64 {
        if self.phase == RoundPhase::Preset {
            return 1.0 - (self.clock.seconds() / self.next_spawn_time).min(1.0);
        }
        ((self.clock.seconds() + self.time_penalty) / self.duration).min(1.0)
    }
}
