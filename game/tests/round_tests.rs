use game::geom::Vec2;
use game::keyboard::{KeyId, Skill};
use game::rng::Rng;
use game::round::{
    INITIAL_SPAWN_DELAY, Round, RoundEffect, RoundInput, RoundPhase, WRONG_KEY_PENALTY,
};
use game::sfx::SfxCue;

fn play() -> Vec2 {
    Vec2::new(960.0, 600.0)
}

fn toon_sizes(n: usize) -> Vec<Vec2> {
    vec![Vec2::new(64.0, 64.0); n]
}

fn new_round(skill: Skill, duration: f64, seed: u64) -> Round {
    Round::new(skill, duration, play(), toon_sizes(6), Rng::new(seed))
}

/// Steps past the preset delay so the first toon is spawned and in game.
fn start_playing(round: &mut Round) {
    let effects = round.update(INITIAL_SPAWN_DELAY + 0.01);
    assert_eq!(round.phase(), RoundPhase::Playing);
    assert!(effects.contains(&RoundEffect::Cue(SfxCue::Grow)));
    assert_eq!(round.active().len(), 1);
}

/// Steps until some toon is in game, then hits its key.
fn hit_one(round: &mut Round) -> Vec<RoundEffect> {
    for _ in 0..10_000 {
        let key = round
            .active()
            .iter()
            .find(|p| round.toons()[p.toon].is_in_game())
            .map(|p| p.key);
        if let Some(key) = key {
            return round.key_down(RoundInput::Key(key));
        }
        round.update(0.05);
    }
    panic!("no toon ever became hittable");
}

#[test]
fn preset_counts_down_then_first_spawn_starts_the_round() {
    let mut round = new_round(Skill::Positioning, 60.0, 1);
    assert_eq!(round.phase(), RoundPhase::Preset);
    assert!((round.fill_ratio() - 1.0).abs() < 1e-9);

    round.update(1.5);
    assert_eq!(round.phase(), RoundPhase::Preset);
    let mid = round.fill_ratio();
    assert!(mid > 0.0 && mid < 1.0, "preset bar counts down, was {mid}");
    assert!(round.active().is_empty());

    round.update(INITIAL_SPAWN_DELAY);
    assert_eq!(round.phase(), RoundPhase::Playing);
    // The clock restarted at the first spawn, so the playing ratio is near 0.
    assert!(round.fill_ratio() < 0.05);
    assert_eq!(round.active().len(), 1);
}

#[test]
fn scenario_a_immediate_hit_scores_full_marks_and_recycles() {
    let mut round = new_round(Skill::Positioning, 60.0, 2);
    start_playing(&mut round);

    let pair_key = round.active()[0].key;
    let pair_toon = round.active()[0].toon;
    assert!(round.toons()[pair_toon].is_in_game());
    assert!(!round.keyboard().key(pair_key).available);

    let effects = round.key_down(RoundInput::Key(pair_key));
    assert_eq!(round.score(), 10.0);
    assert_eq!(round.streak_count(), 1);
    assert!(effects.contains(&RoundEffect::Cue(SfxCue::BoingHigh)));
    assert!(round.keyboard().key(pair_key).available);
    assert!(round.toons()[pair_toon].is_hurled());

    // The hurled toon flies off-screen and returns to the pool.
    for _ in 0..600 {
        round.update(0.016);
        if round.toons()[pair_toon].is_available() {
            break;
        }
    }
    assert!(round.toons()[pair_toon].is_available());
    // A full-strength hit leaving the screen is not an escape: the streak
    // survives.
    assert_eq!(round.streak_count(), 1);
    assert!(round.is_perfect());
}

#[test]
fn scenario_b_wrong_key_costs_time_and_the_streak() {
    let mut round = new_round(Skill::Positioning, 60.0, 3);
    start_playing(&mut round);
    hit_one(&mut round);
    assert_eq!(round.streak_count(), 1);

    // '1' is not enabled for Positioning and has no toon bound.
    let effects = round.key_down(RoundInput::Key(KeyId::from_char('1')));
    assert_eq!(round.time_penalty(), WRONG_KEY_PENALTY);
    assert_eq!(round.streak_count(), 0);
    assert_eq!(round.streak_floor(), 0);
    assert!(!round.is_perfect());
    assert_eq!(effects, vec![RoundEffect::Cue(SfxCue::Buzz)]);
}

#[test]
fn wrong_key_is_ignored_during_preset() {
    let mut round = new_round(Skill::Positioning, 60.0, 4);
    let effects = round.key_down(RoundInput::Key(KeyId::from_char('a')));
    assert!(effects.is_empty());
    assert_eq!(round.time_penalty(), 0.0);
    assert!(round.is_perfect());
}

#[test]
fn scenario_c_streak_milestone_banks_floor_and_grows_threshold() {
    let mut round = new_round(Skill::Positioning, 300.0, 5);
    start_playing(&mut round);

    for expected in 1..=4u32 {
        hit_one(&mut round);
        assert_eq!(round.streak_count(), expected);
        assert_eq!(round.streak_floor(), 0);
    }
    assert_eq!(round.streak_threshold(), 5);

    let effects = hit_one(&mut round);
    assert_eq!(round.streak_count(), 5);
    assert_eq!(round.streak_floor(), 5);
    assert_eq!(round.streak_threshold(), 10);
    assert!(effects.contains(&RoundEffect::Cue(SfxCue::StreakBonus)));
    assert!(round.popups().iter().any(|p| p.text == "+50"));
    // 5 immediate hits at 10 points plus the 50 bonus.
    assert_eq!(round.score(), 100.0);

    // A miss now resets to the banked floor, not zero.
    round.key_down(RoundInput::Key(KeyId::from_char('1')));
    assert_eq!(round.streak_count(), 5);
    assert_eq!(round.streak_floor(), 5);
}

#[test]
fn streak_floor_is_monotonically_non_decreasing() {
    let mut round = new_round(Skill::Positioning, 300.0, 6);
    start_playing(&mut round);

    let mut last_floor = 0;
    for i in 0..20 {
        if i % 7 == 6 {
            round.key_down(RoundInput::Key(KeyId::from_char('1')));
        } else {
            hit_one(&mut round);
        }
        assert!(round.streak_floor() >= last_floor);
        last_floor = round.streak_floor();
    }
    assert!(last_floor >= 5, "at least one milestone should have banked");
}

#[test]
fn threshold_growth_is_capped_per_milestone() {
    let mut round = new_round(Skill::Positioning, 300.0, 7);
    start_playing(&mut round);

    let mut prev_threshold = round.streak_threshold();
    // Thresholds run 5, 10, 20, 30, ... (increment capped at 10).
    for _ in 0..25 {
        hit_one(&mut round);
        let t = round.streak_threshold();
        assert!(t - prev_threshold <= 10, "threshold jumped by more than cap");
        prev_threshold = t;
    }
    assert_eq!(prev_threshold, 30);
}

#[test]
fn scenario_d_game_over_awards_the_perfect_bonus_exactly_once() {
    let mut round = new_round(Skill::Positioning, 60.0, 8);
    start_playing(&mut round);
    hit_one(&mut round);
    hit_one(&mut round);
    let banked = round.score();
    assert_eq!(banked, 20.0);
    assert!(round.is_perfect());

    let effects = round.update(61.0);
    assert_eq!(round.phase(), RoundPhase::GameOver);
    assert!(effects.contains(&RoundEffect::Cue(SfxCue::StreakBonus)));
    assert_eq!(round.popups().len(), 1);
    assert_eq!(round.popups()[0].text, "+20");
    // The bonus is added to the score like any popup.
    assert_eq!(round.score(), 40.0);

    // Later ticks never duplicate the bonus, and expiry is a no-op once the
    // popup is gone.
    round.update(0.016);
    assert!(round.popups().len() <= 1);
    round.update(2.0);
    assert!(round.popups().is_empty());
    assert_eq!(round.score(), 40.0);
    round.update(0.016);
    assert!(round.popups().is_empty());
    assert_eq!(round.phase(), RoundPhase::GameOver);
}

#[test]
fn a_miss_forfeits_the_perfect_bonus() {
    let mut round = new_round(Skill::Positioning, 60.0, 9);
    start_playing(&mut round);
    round.key_down(RoundInput::Key(KeyId::from_char('1')));
    assert!(!round.is_perfect());

    round.update(120.0);
    assert_eq!(round.phase(), RoundPhase::GameOver);
    assert!(round.popups().is_empty());
}

#[test]
fn time_penalty_shortens_the_round() {
    let mut round = new_round(Skill::Positioning, 60.0, 10);
    start_playing(&mut round);
    for _ in 0..70 {
        round.key_down(RoundInput::Key(KeyId::from_char('1')));
    }
    assert!(round.time_penalty() >= 60.0);
    round.update(0.016);
    assert_eq!(round.phase(), RoundPhase::GameOver);
}

#[test]
fn escape_pauses_and_leaves_on_the_next_tick() {
    let mut round = new_round(Skill::Positioning, 60.0, 11);
    start_playing(&mut round);

    let effects = round.key_down(RoundInput::Escape);
    assert!(effects.is_empty());
    let before = round.seconds();

    let effects = round.update(5.0);
    assert_eq!(effects, vec![RoundEffect::LeaveRound]);
    // The leave tick does no game logic and no time passes while paused.
    assert_eq!(round.seconds(), before);

    // Resuming works: the next tick runs the round again.
    round.update(0.016);
    assert!(round.seconds() > before);
    assert_eq!(round.phase(), RoundPhase::Playing);
}

#[test]
fn screenshot_requests_pass_through_without_touching_state() {
    let mut round = new_round(Skill::Positioning, 60.0, 12);
    start_playing(&mut round);
    let score = round.score();
    let effects = round.key_down(RoundInput::Screenshot);
    assert_eq!(effects, vec![RoundEffect::SaveScreenshot]);
    assert_eq!(round.score(), score);
    assert!(round.is_perfect());
}

#[test]
fn escaping_toon_releases_its_key_and_breaks_the_streak() {
    let mut round = new_round(Skill::HomeRow, 300.0, 13);
    start_playing(&mut round);
    let pair_key = round.active()[0].key;

    let mut saw_shrink = false;
    // HomeRow toons live 5 seconds; never press anything and let it escape.
    for _ in 0..200 {
        let effects = round.update(0.05);
        if effects.contains(&RoundEffect::Cue(SfxCue::Shrink)) {
            saw_shrink = true;
            break;
        }
    }
    assert!(saw_shrink, "an unattended toon should escape");
    assert!(round.keyboard().key(pair_key).available);
    assert!(!round.is_perfect());
    assert_eq!(round.streak_count(), 0);
}

#[test]
fn concurrency_is_clamped_to_the_pool_size() {
    let play = play();
    let mut round = Round::new(Skill::Numbers, 300.0, play, toon_sizes(2), Rng::new(14));
    // Numbers allows 5 concurrent toons, but only 2 slots exist.
    for _ in 0..400 {
        round.update(0.05);
        assert!(round.active().len() <= 2);
    }
}

#[test]
fn keys_are_unavailable_exactly_while_an_unhit_toon_holds_them() {
    // A key is released the moment its toon is hit (hurled toons keep their
    // pairing only until they leave the screen) or when the toon escapes.
    let mut round = new_round(Skill::HomeRow, 300.0, 15);
    start_playing(&mut round);

    for i in 0..400 {
        if i % 17 == 0 {
            hit_one(&mut round);
        }
        round.update(0.05);
        let held: Vec<KeyId> = round
            .active()
            .iter()
            .filter(|p| {
                let toon = &round.toons()[p.toon];
                !toon.is_available() && !toon.is_hurled()
            })
            .map(|p| p.key)
            .collect();
        for (id, key) in round.keyboard().iter() {
            if key.enabled {
                assert_eq!(!key.available, held.contains(&id), "key {id:?} out of sync");
            }
        }
    }
}
