//! Toon lifecycle: one pooled entity per on-screen character slot.
//!
//! A toon cycles Available -> Spawning -> InGame -> (Hurled | Escaping) ->
//! Available many times per round. All timing is dt-driven; the per-state
//! timer restarts on every transition.

use crate::geom::Vec2;
use crate::rng::Rng;

pub const SPAWNING_DURATION: f64 = 0.15;
pub const ESCAPING_DURATION: f64 = 0.1;
pub const INGAME_DURATION: f64 = 5.0;
pub const SHAKING_DURATION: f64 = 2.0;
pub const GRAVITY: f64 = 1000.0;
pub const MAX_HIT_SCORE: f64 = 10.0;

const SHAKE_RADIUS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToonState {
    Available,
    Spawning,
    InGame,
    Hurled,
    Escaping,
}

/// Reported by [`Toon::update`] when the escape animation completes; emitted
/// exactly once per escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToonEvent {
    Escaped,
}

/// Where and how large to draw a toon this frame. `scale` multiplies the
/// sprite size; `pos` is the sprite center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pos: Vec2,
    pub scale: f64,
}

#[derive(Debug, Clone)]
pub struct Toon {
    state: ToonState,
    state_elapsed: f64,
    score: f64,
    angle_deg: f64,
    ingame_duration: f64,
    shaking_duration: f64,
    can_escape: bool,
}

impl Toon {
    /// A positive speed coefficient enables the escape mechanic and scales
    /// the in-game and shake-warning windows; zero or below disables
    /// escaping entirely.
    pub fn new(speed_coef: f64) -> Self {
        let can_escape = speed_coef > 0.0;
        let scale = if can_escape { speed_coef } else { 1.0 };
        Self {
            state: ToonState::Available,
            state_elapsed: 0.0,
            score: 0.0,
            angle_deg: 0.0,
            ingame_duration: INGAME_DURATION * scale,
            shaking_duration: SHAKING_DURATION * scale,
            can_escape,
        }
    }

    pub fn state(&self) -> ToonState {
        self.state
    }

    pub fn is_available(&self) -> bool {
        self.state == ToonState::Available
    }

    pub fn is_in_game(&self) -> bool {
        self.state == ToonState::InGame
    }

    pub fn is_hurled(&self) -> bool {
        self.state == ToonState::Hurled
    }

    fn enter(&mut self, state: ToonState) {
        self.state = state;
        self.state_elapsed = 0.0;
    }

    /// Brings an Available toon into play. Calling this in any other state is
    /// an invariant breach in the round controller.
    pub fn spawn(&mut self) {
        assert_eq!(
            self.state,
            ToonState::Available,
            "spawn on a toon already in play"
        );
        self.enter(ToonState::Spawning);
    }

    /// Advances the state machine by elapsed time alone.
    pub fn update(&mut self, dt: f64) -> Option<ToonEvent> {
        self.state_elapsed += dt;
        match self.state {
            ToonState::Spawning => {
                if self.state_elapsed > SPAWNING_DURATION {
                    self.enter(ToonState::InGame);
                }
            }
            ToonState::InGame => {
                if self.can_escape && self.state_elapsed > self.ingame_duration {
                    self.enter(ToonState::Escaping);
                }
            }
            ToonState::Escaping => {
                if self.state_elapsed > ESCAPING_DURATION {
                    self.reset();
                    return Some(ToonEvent::Escaped);
                }
            }
            ToonState::Available | ToonState::Hurled => {}
        }
        None
    }

    /// Strikes an in-game toon: picks a launch angle, scores the hit by how
    /// quickly the player reacted (full marks at zero elapsed, zero at or
    /// past the in-game window) and starts the ballistic exit.
    pub fn hurl(&mut self, rng: &mut Rng) -> f64 {
        assert_eq!(self.state, ToonState::InGame, "hurl on a toon not in game");
        let reaction =
            (self.ingame_duration - self.state_elapsed) / self.ingame_duration;
        self.score = (MAX_HIT_SCORE * reaction.max(0.0)).ceil();
        self.angle_deg = rng.range_f64(70.0, 110.0);
        self.enter(ToonState::Hurled);
        self.score
    }

    pub fn reset(&mut self) {
        self.enter(ToonState::Available);
        self.score = 0.0;
        self.angle_deg = 0.0;
    }

    /// Sprite placement for the current frame, or `None` while Available.
    ///
    /// `anchor` is the resting center (just above the paired key) and `size`
    /// the unscaled sprite dimensions. Needs the RNG for the end-of-life
    /// shake jitter.
    pub fn placement(&self, anchor: Vec2, size: Vec2, rng: &mut Rng) -> Option<Placement> {
        match self.state {
            ToonState::Available => None,
            ToonState::Spawning => {
                let scale = (self.state_elapsed / SPAWNING_DURATION).min(1.0);
                Some(Placement { pos: anchor, scale })
            }
            ToonState::InGame => {
                let mut pos = anchor;
                if self.can_escape {
                    let remaining = self.ingame_duration - self.state_elapsed;
                    if remaining > 0.0 && remaining < self.shaking_duration {
                        let d = rng.range_f64(0.0, SHAKE_RADIUS);
                        let dir = rng.range_f64(0.0, std::f64::consts::TAU);
                        pos = pos + Vec2::new(d * dir.cos(), d * dir.sin());
                    }
                }
                Some(Placement { pos, scale: 1.0 })
            }
            ToonState::Hurled => Some(Placement {
                pos: self.ballistic_pos(anchor, size),
                scale: 1.0,
            }),
            ToonState::Escaping => {
                let scale = 1.0 - (self.state_elapsed / ESCAPING_DURATION).min(1.0);
                Some(Placement { pos: anchor, scale })
            }
        }
    }

    // Projectile motion in screen coordinates (y grows downward). The launch
    // velocity is sized so a full-score hurl would peak around the anchor's
    // height above the top edge, then attenuated quadratically by the score:
    // a slow hit barely hops off the key, a fast one clears the screen.
    fn ballistic_pos(&self, anchor: Vec2, size: Vec2) -> Vec2 {
        let peak = anchor.y + 0.5 * size.y + 10.0;
        let alpha = self.angle_deg.to_radians();
        let v0 = (2.0 * GRAVITY * peak).sqrt() / alpha.sin();
        let attenuation = 0.1 * self.score;
        let velocity = v0 * attenuation * attenuation;

        let t = self.state_elapsed;
        let x = anchor.x + velocity * alpha.cos() * t;
        let y = anchor.y + 0.5 * GRAVITY * t * t - velocity * alpha.sin() * t;
        Vec2::new(x, y)
    }
}
