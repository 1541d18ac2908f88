//! List menus: a header, options, a wrap-around cursor.
//!
//! Escape cancels and restores the last committed selection, so backing out
//! of the skill menu never silently changes the skill.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKey {
    Up,
    Down,
    Enter,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    None,
    /// Enter pressed on the given option index; the selection is saved.
    Commit(usize),
    /// Escape pressed; the selection snapped back to the saved one.
    Cancel,
}

#[derive(Debug, Clone)]
pub struct Menu {
    header: &'static str,
    options: Vec<String>,
    selected: usize,
    saved: usize,
}

impl Menu {
    pub fn new(header: &'static str, options: Vec<String>) -> Self {
        assert!(!options.is_empty(), "menu needs at least one option");
        Self {
            header,
            options,
            selected: 0,
            saved: 0,
        }
    }

    pub fn header(&self) -> &str {
        self.header
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Marks an externally chosen option (e.g. loaded from settings) as both
    /// current and saved.
    pub fn set_selected(&mut self, index: usize) {
        let index = index.min(self.options.len() - 1);
        self.selected = index;
        self.saved = index;
    }

    pub fn key_down(&mut self, key: MenuKey) -> MenuAction {
        let len = self.options.len();
        match key {
            MenuKey::Up => {
                self.selected = (self.selected + len - 1) % len;
                MenuAction::None
            }
            MenuKey::Down => {
                self.selected = (self.selected + 1) % len;
                MenuAction::None
            }
            MenuKey::Enter => {
                self.saved = self.selected;
                MenuAction::Commit(self.selected)
            }
            MenuKey::Escape => {
                self.selected = self.saved;
                MenuAction::Cancel
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> Menu {
        Menu::new(
            "MAIN MENU",
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
        )
    }

    #[test]
    fn cursor_wraps_both_ways() {
        let mut m = menu();
        m.key_down(MenuKey::Up);
        assert_eq!(m.selected(), 2);
        m.key_down(MenuKey::Down);
        assert_eq!(m.selected(), 0);
        m.key_down(MenuKey::Down);
        assert_eq!(m.selected(), 1);
    }

    #[test]
    fn enter_commits_the_current_option() {
        let mut m = menu();
        m.key_down(MenuKey::Down);
        assert_eq!(m.key_down(MenuKey::Enter), MenuAction::Commit(1));
    }

    #[test]
    fn escape_restores_the_saved_selection() {
        let mut m = menu();
        m.key_down(MenuKey::Down);
        m.key_down(MenuKey::Enter);
        m.key_down(MenuKey::Down);
        assert_eq!(m.selected(), 2);
        assert_eq!(m.key_down(MenuKey::Escape), MenuAction::Cancel);
        assert_eq!(m.selected(), 1);
    }

    #[test]
    fn set_selected_clamps_and_saves() {
        let mut m = menu();
        m.set_selected(99);
        assert_eq!(m.selected(), 2);
        m.key_down(MenuKey::Down);
        m.key_down(MenuKey::Escape);
        assert_eq!(m.selected(), 2);
    }
}
