//! App-state dispatch: which screen owns input and drawing.
//!
//! A tagged variant plus a pure transition function. Side effects (starting
//! a round, quitting) are reported as [`ViewEffect`] values so the shell
//! stays the only place that owns resources.

use crate::keyboard::Skill;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    MainMenu,
    SkillMenu,
    DurationMenu,
    Round,
}

impl Default for AppView {
    fn default() -> Self {
        Self::MainMenu
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewEvent {
    NewGame,
    OpenSkillMenu,
    OpenDurationMenu,
    SkillChosen(Skill),
    DurationChosen(f64),
    /// Escape pressed, or a menu cancelled.
    Back,
    /// The round asked to return to the menu.
    LeaveRound,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewEffect {
    None,
    /// Build a fresh round from the current settings.
    StartRound,
    SetSkill(Skill),
    SetDuration(f64),
    Quit,
}

impl AppView {
    /// Pure transition table. `round_active` tells whether a round exists to
    /// return to: Escape in the main menu resumes it instead of quitting.
    pub fn handle(self, event: ViewEvent, round_active: bool) -> (AppView, ViewEffect) {
        match (self, event) {
            (AppView::MainMenu, ViewEvent::NewGame) => (AppView::Round, ViewEffect::StartRound),
            (AppView::MainMenu, ViewEvent::OpenSkillMenu) => {
                (AppView::SkillMenu, ViewEffect::None)
            }
            (AppView::MainMenu, ViewEvent::OpenDurationMenu) => {
                (AppView::DurationMenu, ViewEffect::None)
            }
            (AppView::MainMenu, ViewEvent::Quit) => (AppView::MainMenu, ViewEffect::Quit),
            (AppView::MainMenu, ViewEvent::Back) if round_active => {
                (AppView::Round, ViewEffect::None)
            }

            (AppView::SkillMenu, ViewEvent::SkillChosen(skill)) => {
                (AppView::MainMenu, ViewEffect::SetSkill(skill))
            }
            (AppView::SkillMenu, ViewEvent::Back) => (AppView::MainMenu, ViewEffect::None),

            (AppView::DurationMenu, ViewEvent::DurationChosen(secs)) => {
                (AppView::MainMenu, ViewEffect::SetDuration(secs))
            }
            (AppView::DurationMenu, ViewEvent::Back) => (AppView::MainMenu, ViewEffect::None),

            (AppView::Round, ViewEvent::LeaveRound) => (AppView::MainMenu, ViewEffect::None),

            // Everything else is irrelevant in the current view.
            (view, _) => (view, ViewEffect::None),
        }
    }
}
