//! All round and menu drawing, rendered through the engine frame API.
//!
//! Draw order inside a round: keyboard, time bar, score/streak, toons
//! (oldest pairing on top), key hints for live toons, banners, popups.

use engine::{Color, Frame, Sprite};

use crate::geom::Vec2;
use crate::keyboard::KEY_SIZE;
use crate::menu::Menu;
use crate::round::{Round, RoundPhase, STREAK_BONUS_LIFETIME};
use crate::time_bar;

pub const PLAY_WIDTH: u32 = 960;
pub const PLAY_HEIGHT: u32 = 600;

pub const GREEN: Color = [75, 170, 66, 255];
pub const YELLOW: Color = [255, 223, 27, 255];
pub const WHITE: Color = [255, 255, 255, 255];
const BG_TOP: [u8; 3] = [24, 26, 44];
const BG_BOTTOM: [u8; 3] = [8, 9, 16];
const KEY_BG: Color = [30, 32, 40, 255];
const KEY_BG_LIVE: Color = [58, 60, 72, 255];
const SHADOW_ALPHA: u8 = 178;

pub fn play_vec() -> Vec2 {
    Vec2::new(PLAY_WIDTH as f64, PLAY_HEIGHT as f64)
}

// Per-column accent colors for key glyphs, one per finger zone.
fn column_color(col: u8) -> Color {
    match col {
        0 => [238, 52, 66, 255],
        1 => [249, 166, 28, 255],
        2 => [112, 194, 122, 255],
        3 | 4 => [2, 174, 236, 255],
        5 | 6 => [89, 134, 193, 255],
        7 => [151, 214, 245, 255],
        8 => [255, 233, 160, 255],
        _ => [191, 225, 192, 255],
    }
}

pub fn draw_backdrop(frame: &mut Frame) {
    let h = frame.height();
    let w = frame.width();
    for y in 0..h {
        let t = y as f64 / h as f64;
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t) as u8;
        let color = [
            lerp(BG_TOP[0], BG_BOTTOM[0]),
            lerp(BG_TOP[1], BG_BOTTOM[1]),
            lerp(BG_TOP[2], BG_BOTTOM[2]),
            255,
        ];
        frame.fill_rect(0, y as i32, w, 1, color);
    }
}

fn draw_text_shadowed(frame: &mut Frame, x: i32, y: i32, text: &str, color: Color, scale: u32) {
    let off = scale.max(1) as i32 / 2 + 1;
    frame.draw_text(x + off, y + off, text, [0, 0, 0, SHADOW_ALPHA], scale);
    frame.draw_text(x, y, text, color, scale);
}

fn draw_text_centered(frame: &mut Frame, cx: i32, y: i32, text: &str, color: Color, scale: u32) {
    let x = cx - Frame::text_width(text, scale) as i32 / 2;
    draw_text_shadowed(frame, x, y, text, color, scale);
}

pub fn draw_round(frame: &mut Frame, round: &Round, sprites: &[Sprite]) {
    draw_text_centered(
        frame,
        PLAY_WIDTH as i32 / 2,
        6,
        "ESC: MAIN MENU   F1: SCREENSHOT   F2: MUSIC",
        WHITE,
        2,
    );

    draw_keyboard(frame, round);
    draw_time_bar(frame, round);
    draw_score(frame, round);
    draw_streak(frame, round);
    draw_toons(frame, round, sprites);
    draw_key_hints(frame, round);

    if round.phase() == RoundPhase::GameOver {
        let banner = if round.is_perfect() {
            "PERFECT GAME!"
        } else {
            "GAME OVER"
        };
        draw_text_centered(
            frame,
            PLAY_WIDTH as i32 / 2,
            (PLAY_HEIGHT as f64 * 0.3) as i32,
            banner,
            WHITE,
            10,
        );
    }

    draw_popups(frame, round);
}

fn draw_keyboard(frame: &mut Frame, round: &Round) {
    let play = play_vec();
    let kb = round.keyboard();
    for (id, key) in kb.iter() {
        if !key.enabled {
            continue;
        }
        let rect = kb.key_rect(id, play);
        let bg = if key.available { KEY_BG } else { KEY_BG_LIVE };
        frame.blend_rect(rect.x as i32, rect.y as i32, rect.w as u32, rect.h as u32, bg, 210);
        frame.rect_outline(
            rect.x as i32,
            rect.y as i32,
            rect.w as u32,
            rect.h as u32,
            [70, 74, 86, 255],
        );
        let center = rect.center();
        let glyph = key.glyph.to_string();
        let scale = 3;
        let x = center.x as i32 - Frame::text_width(&glyph, scale) as i32 / 2;
        let y = center.y as i32 - Frame::text_height(scale) as i32 / 2;
        frame.draw_text(x, y, &glyph, column_color(key.col), scale);
    }
}

// A live key glyph pops brighter and larger so the player knows what to hit.
fn draw_key_hints(frame: &mut Frame, round: &Round) {
    let play = play_vec();
    for pair in round.active() {
        if !round.toons()[pair.toon].is_in_game() {
            continue;
        }
        let rect = round.keyboard().key_rect(pair.key, play);
        frame.rect_outline(
            rect.x as i32 - 2,
            rect.y as i32 - 2,
            rect.w as u32 + 4,
            rect.h as u32 + 4,
            YELLOW,
        );
        let glyph = round.keyboard().key(pair.key).glyph.to_string();
        let center = rect.center();
        let scale = 4;
        let x = center.x as i32 - Frame::text_width(&glyph, scale) as i32 / 2;
        let y = center.y as i32 - Frame::text_height(scale) as i32 / 2;
        draw_text_shadowed(frame, x, y, &glyph, YELLOW, scale);
    }
}

fn draw_time_bar(frame: &mut Frame, round: &Round) {
    let outer = time_bar::bounds(play_vec());
    frame.blend_rect(
        outer.x as i32,
        outer.y as i32,
        outer.w as u32,
        outer.h as u32,
        [0, 0, 0, 255],
        SHADOW_ALPHA,
    );
    let fill = time_bar::fill_rect(outer, round.fill_ratio());
    frame.fill_rect(
        fill.x as i32,
        fill.y as i32,
        fill.w as u32,
        fill.h as u32,
        GREEN,
    );
    for (start, stop) in time_bar::minute_marks(outer, round.duration()) {
        frame.blend_rect(
            start.x as i32,
            start.y as i32,
            (stop.x - start.x) as u32,
            1,
            WHITE,
            128,
        );
    }
}

fn draw_score(frame: &mut Frame, round: &Round) {
    let text = format!("{}", round.score() as i64);
    draw_text_centered(frame, PLAY_WIDTH as i32 / 2, 26, &text, WHITE, 8);
}

fn draw_streak(frame: &mut Frame, round: &Round) {
    let text = format!("{}/{}", round.streak_count(), round.streak_threshold());
    let scale = 4;
    let x = PLAY_WIDTH as i32 - Frame::text_width(&text, scale) as i32 - 12;
    let y = PLAY_HEIGHT as i32 - 45;
    draw_text_shadowed(frame, x, y, &text, WHITE, scale);
}

fn draw_toons(frame: &mut Frame, round: &Round, sprites: &[Sprite]) {
    // Newest pairing first, so long-lived toons end up drawn on top.
    for pair in round.active().iter().rev() {
        let Some(placement) = pair.placement else {
            continue;
        };
        let sprite = &sprites[pair.toon];
        frame.blit_centered(
            sprite,
            placement.pos.x as i32,
            placement.pos.y as i32,
            placement.scale,
        );
    }
}

fn draw_popups(frame: &mut Frame, round: &Round) {
    let now = round.seconds();
    for popup in round.popups() {
        // Popups drift upward as they age.
        let age = STREAK_BONUS_LIFETIME - (popup.expiration - now).max(0.0);
        let y = popup.pos.y - 10.0 * age - KEY_SIZE;
        draw_text_centered(frame, popup.pos.x as i32, y as i32, &popup.text, YELLOW, 7);
    }
}

pub fn draw_menu(frame: &mut Frame, menu: &Menu) {
    let cx = PLAY_WIDTH as i32 / 2;
    let mut y = (PLAY_HEIGHT as f64 * 0.25) as i32;

    draw_text_centered(frame, cx, y, menu.header(), GREEN, 7);
    y += Frame::text_height(7) as i32 + 40;

    for (i, option) in menu.options().iter().enumerate() {
        let color = if i == menu.selected() { YELLOW } else { GREEN };
        let text = option.to_ascii_uppercase();
        draw_text_centered(frame, cx, y, &text, color, 4);
        y += Frame::text_height(4) as i32 + 18;
    }

    draw_text_centered(
        frame,
        cx,
        PLAY_HEIGHT as i32 - 40,
        "UP/DOWN: SELECT   ENTER: CONFIRM   ESC: BACK",
        WHITE,
        2,
    );
}
