use std::collections::HashSet;

use game::keyboard::{KeyId, Keyboard, Skill};
use game::rng::Rng;

fn home_row_board() -> Keyboard {
    let mut kb = Keyboard::qwerty();
    kb.enable_row(2);
    kb
}

#[test]
fn rand_select_returns_none_when_nothing_is_enabled() {
    let kb = Keyboard::qwerty();
    let mut rng = Rng::new(1);
    assert_eq!(kb.rand_select_key(&mut rng), KeyId::NONE);
}

#[test]
fn rand_select_eventually_covers_every_eligible_key() {
    let kb = home_row_board();
    let mut rng = Rng::new(42);

    let mut seen = HashSet::new();
    for _ in 0..500 {
        let key = kb.rand_select_key(&mut rng);
        assert!(!key.is_none());
        assert_eq!(kb.key(key).row, 2);
        seen.insert(key);
    }
    assert_eq!(seen.len(), 10, "every home-row key should be drawable");
}

#[test]
fn selected_key_is_excluded_until_deselected() {
    let mut kb = home_row_board();
    let mut rng = Rng::new(7);
    let held = KeyId::from_char('f');

    kb.select_key(held);
    for _ in 0..500 {
        assert_ne!(kb.rand_select_key(&mut rng), held);
    }

    kb.deselect_key(held);
    let mut seen = false;
    for _ in 0..500 {
        if kb.rand_select_key(&mut rng) == held {
            seen = true;
            break;
        }
    }
    assert!(seen, "deselected key should come back into the pool");
}

#[test]
fn disabled_row_is_never_selected_even_if_available() {
    let mut kb = Keyboard::qwerty();
    kb.enable_row(1);
    kb.enable_row(2);
    kb.disable_row(2);

    let mut rng = Rng::new(9);
    for _ in 0..500 {
        let key = kb.rand_select_key(&mut rng);
        assert_eq!(kb.key(key).row, 1);
    }
}

#[test]
fn disable_col_prunes_a_single_column() {
    let mut kb = home_row_board();
    kb.disable_col(0);

    let mut rng = Rng::new(3);
    for _ in 0..500 {
        let key = kb.rand_select_key(&mut rng);
        assert_ne!(kb.key(key).col, 0);
    }

    kb.enable_col(0);
    // Re-enabling a column also drags in keys from rows that were never
    // enabled; the eligible pool should grow accordingly.
    assert_eq!(kb.eligible_count(), 13);
}

#[test]
fn selecting_all_keys_exhausts_the_pool() {
    let mut kb = home_row_board();
    let ids: Vec<KeyId> = kb
        .iter()
        .filter(|(_, k)| k.enabled)
        .map(|(id, _)| id)
        .collect();
    for id in &ids {
        kb.select_key(*id);
    }
    let mut rng = Rng::new(5);
    assert_eq!(kb.rand_select_key(&mut rng), KeyId::NONE);
}

#[test]
#[should_panic(expected = "unknown key id")]
fn selecting_an_unknown_key_panics() {
    let mut kb = Keyboard::qwerty();
    kb.select_key(KeyId(0xDEAD));
}

#[test]
#[should_panic(expected = "unknown key id")]
fn deselecting_an_unknown_key_panics() {
    let mut kb = Keyboard::qwerty();
    kb.deselect_key(KeyId::NONE);
}

#[test]
fn positioning_disables_escape_and_harder_skills_speed_up() {
    assert_eq!(Skill::Positioning.speed_coef(), 0.0);
    assert!(Skill::HomeRow.speed_coef() > Skill::Letters.speed_coef());
    assert!(Skill::Letters.speed_coef() > Skill::Numbers.speed_coef());
    assert!(Skill::Numbers.max_toons() > Skill::Positioning.max_toons());
}
