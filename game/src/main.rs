use std::error::Error;
use std::time::Duration;

use engine::{App, AppConfig, AppFlow, Frame, Sprite};
use winit::event::VirtualKeyCode;

use game::assets;
use game::audio::AudioOutput;
use game::geom::Vec2;
use game::hud::{self, PLAY_HEIGHT, PLAY_WIDTH};
use game::keyboard::{KeyId, Skill};
use game::menu::{Menu, MenuAction, MenuKey};
use game::rng::Rng;
use game::round::{Round, RoundEffect, RoundInput};
use game::settings::{PlayerSettings, SettingsStore};
use game::view::{AppView, ViewEffect, ViewEvent};

// Main menu option order; must match `main_menu()` below.
const MAIN_NEW_GAME: usize = 0;
const MAIN_SKILL: usize = 1;
const MAIN_DURATION: usize = 2;
const MAIN_QUIT: usize = 3;

const DURATION_CHOICES: [f64; 5] = [60.0, 120.0, 180.0, 240.0, 300.0];

struct Shell {
    view: AppView,
    settings: PlayerSettings,
    store: SettingsStore,
    sprites: Vec<Sprite>,
    audio: Option<AudioOutput>,
    round: Option<Round>,
    main_menu: Menu,
    skill_menu: Menu,
    duration_menu: Menu,
    screenshot_pending: bool,
    quit: bool,
}

impl Shell {
    fn new(settings: PlayerSettings, store: SettingsStore, sprites: Vec<Sprite>) -> Self {
        let audio = AudioOutput::try_new(settings.music_enabled);

        let mut skill_menu = Menu::new(
            "SKILL LEVEL",
            Skill::ALL.iter().map(|s| s.label().to_string()).collect(),
        );
        skill_menu.set_selected(
            Skill::ALL
                .iter()
                .position(|&s| s == settings.skill)
                .unwrap_or(0),
        );

        let mut duration_menu = Menu::new(
            "GAME DURATION",
            DURATION_CHOICES
                .iter()
                .map(|secs| {
                    let minutes = (secs / 60.0) as u32;
                    if minutes == 1 {
                        "1 minute".to_string()
                    } else {
                        format!("{minutes} minutes")
                    }
                })
                .collect(),
        );
        duration_menu.set_selected(
            DURATION_CHOICES
                .iter()
                .position(|&d| d == settings.round_duration_secs)
                .unwrap_or(2),
        );

        Self {
            view: AppView::default(),
            settings,
            store,
            sprites,
            audio,
            round: None,
            main_menu: main_menu(),
            skill_menu,
            duration_menu,
            screenshot_pending: false,
            quit: false,
        }
    }

    fn start_round(&mut self) {
        let sizes = self
            .sprites
            .iter()
            .map(|s| Vec2::new(s.width() as f64, s.height() as f64))
            .collect();
        self.round = Some(Round::new(
            self.settings.skill,
            self.settings.round_duration_secs,
            hud::play_vec(),
            sizes,
            Rng::from_entropy(),
        ));
        log::debug!(
            "round started: skill {:?}, {}s",
            self.settings.skill,
            self.settings.round_duration_secs
        );
    }

    fn dispatch_view_event(&mut self, event: ViewEvent) {
        let (view, effect) = self.view.handle(event, self.round.is_some());
        self.view = view;
        match effect {
            ViewEffect::None => {}
            ViewEffect::StartRound => self.start_round(),
            ViewEffect::SetSkill(skill) => {
                self.settings.skill = skill;
                self.save_settings();
            }
            ViewEffect::SetDuration(secs) => {
                self.settings.round_duration_secs = secs;
                self.save_settings();
            }
            ViewEffect::Quit => self.quit = true,
        }
    }

    fn save_settings(&self) {
        if let Err(err) = self.store.save(&self.settings) {
            log::warn!("could not save settings: {err}");
        }
    }

    fn apply_round_effects(&mut self, effects: Vec<RoundEffect>) {
        for effect in effects {
            match effect {
                RoundEffect::Cue(cue) => {
                    if let Some(audio) = &self.audio {
                        audio.play(cue);
                    }
                }
                RoundEffect::LeaveRound => self.dispatch_view_event(ViewEvent::LeaveRound),
                RoundEffect::SaveScreenshot => self.screenshot_pending = true,
            }
        }
    }

    fn toggle_music(&mut self) {
        if let Some(audio) = &self.audio {
            audio.toggle_music();
            self.settings.music_enabled = audio.music_playing();
            self.save_settings();
        }
    }

    fn round_key(&mut self, key: VirtualKeyCode) {
        let input = match key {
            VirtualKeyCode::Escape => RoundInput::Escape,
            VirtualKeyCode::F1 => RoundInput::Screenshot,
            other => match gameplay_key_id(other) {
                Some(id) => RoundInput::Key(id),
                None => return,
            },
        };
        if let Some(round) = self.round.as_mut() {
            let effects = round.key_down(input);
            self.apply_round_effects(effects);
        }
    }

    fn menu_key(&mut self, key: VirtualKeyCode) {
        let Some(menu_key) = menu_key_for(key) else {
            return;
        };
        match self.view {
            AppView::MainMenu => match self.main_menu.key_down(menu_key) {
                MenuAction::Commit(MAIN_NEW_GAME) => self.dispatch_view_event(ViewEvent::NewGame),
                MenuAction::Commit(MAIN_SKILL) => {
                    self.dispatch_view_event(ViewEvent::OpenSkillMenu)
                }
                MenuAction::Commit(MAIN_DURATION) => {
                    self.dispatch_view_event(ViewEvent::OpenDurationMenu)
                }
                MenuAction::Commit(MAIN_QUIT) => self.dispatch_view_event(ViewEvent::Quit),
                MenuAction::Commit(_) => {}
                MenuAction::Cancel => self.dispatch_view_event(ViewEvent::Back),
                MenuAction::None => {}
            },
            AppView::SkillMenu => match self.skill_menu.key_down(menu_key) {
                MenuAction::Commit(i) => {
                    self.dispatch_view_event(ViewEvent::SkillChosen(Skill::ALL[i]))
                }
                MenuAction::Cancel => self.dispatch_view_event(ViewEvent::Back),
                MenuAction::None => {}
            },
            AppView::DurationMenu => match self.duration_menu.key_down(menu_key) {
                MenuAction::Commit(i) => {
                    self.dispatch_view_event(ViewEvent::DurationChosen(DURATION_CHOICES[i]))
                }
                MenuAction::Cancel => self.dispatch_view_event(ViewEvent::Back),
                MenuAction::None => {}
            },
            AppView::Round => {}
        }
    }
}

impl App for Shell {
    fn key_pressed(&mut self, key: VirtualKeyCode) {
        if key == VirtualKeyCode::F2 {
            self.toggle_music();
            return;
        }
        match self.view {
            AppView::Round => self.round_key(key),
            _ => self.menu_key(key),
        }
    }

    fn update(&mut self, dt: Duration) -> AppFlow {
        if self.quit {
            return AppFlow::Exit;
        }
        if self.view == AppView::Round {
            if let Some(mut round) = self.round.take() {
                let effects = round.update(dt.as_secs_f64());
                self.round = Some(round);
                self.apply_round_effects(effects);
            }
        }
        if self.quit {
            AppFlow::Exit
        } else {
            AppFlow::Continue
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        hud::draw_backdrop(frame);
        match self.view {
            AppView::Round => {
                if let Some(round) = &self.round {
                    hud::draw_round(frame, round, &self.sprites);
                }
            }
            AppView::MainMenu => hud::draw_menu(frame, &self.main_menu),
            AppView::SkillMenu => hud::draw_menu(frame, &self.skill_menu),
            AppView::DurationMenu => hud::draw_menu(frame, &self.duration_menu),
        }

        if self.screenshot_pending {
            self.screenshot_pending = false;
            match assets::save_screenshot(frame.data(), frame.width(), frame.height()) {
                Ok(path) => log::info!("screenshot saved to {}", path.display()),
                Err(err) => log::warn!("screenshot failed: {err}"),
            }
        }
    }
}

fn main_menu() -> Menu {
    Menu::new(
        "MAIN MENU",
        vec![
            "New game".to_string(),
            "Select skill level".to_string(),
            "Select game duration".to_string(),
            "Quit".to_string(),
        ],
    )
}

fn menu_key_for(key: VirtualKeyCode) -> Option<MenuKey> {
    match key {
        VirtualKeyCode::Up => Some(MenuKey::Up),
        VirtualKeyCode::Down => Some(MenuKey::Down),
        VirtualKeyCode::Return | VirtualKeyCode::NumpadEnter => Some(MenuKey::Enter),
        VirtualKeyCode::Escape => Some(MenuKey::Escape),
        _ => None,
    }
}

// The input layer owns the id assignment: ids are the ASCII of the unshifted
// character, matching the keyboard model's layout table.
fn gameplay_key_id(key: VirtualKeyCode) -> Option<KeyId> {
    use VirtualKeyCode::*;
    let c = match key {
        Key1 => '1',
        Key2 => '2',
        Key3 => '3',
        Key4 => '4',
        Key5 => '5',
        Key6 => '6',
        Key7 => '7',
        Key8 => '8',
        Key9 => '9',
        Key0 => '0',
        Q => 'q',
        W => 'w',
        E => 'e',
        R => 'r',
        T => 't',
        Y => 'y',
        U => 'u',
        I => 'i',
        O => 'o',
        P => 'p',
        A => 'a',
        S => 's',
        D => 'd',
        F => 'f',
        G => 'g',
        H => 'h',
        J => 'j',
        K => 'k',
        L => 'l',
        Semicolon => ';',
        Z => 'z',
        X => 'x',
        C => 'c',
        V => 'v',
        B => 'b',
        N => 'n',
        M => 'm',
        Comma => ',',
        Period => '.',
        Slash => '/',
        _ => return None,
    };
    Some(KeyId::from_char(c))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let store = SettingsStore::from_env();
    let settings = store.load();
    let sprites = assets::load_toon_sprites(&assets::default_assets_dir());

    let shell = Shell::new(settings, store, sprites);
    engine::run_app(
        AppConfig {
            title: "Keytoon".to_string(),
            width: PLAY_WIDTH,
            height: PLAY_HEIGHT,
        },
        shell,
    )
}
