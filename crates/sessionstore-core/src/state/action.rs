//! Actions and the reducer that applies them.

use super::model::{AppState, RECENTLY_VIEWED_LIMIT, ThemeMode};
use serde::{Deserialize, Serialize};

/// An update dispatched to a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Action {
    AddFavorite(String),
    RemoveFavorite(String),
    ToggleFavorite(String),
    ClearFavorites,
    SetTheme(ThemeMode),
    ToggleTheme,
    /// Moves the course to the front of the recently viewed list
    RecordView(String),
}

/// Applies `action` to `state` in place.
///
/// Returns `true` when the state changed.
pub fn reduce(state: &mut AppState, action: Action) -> bool {
    match action {
        Action::AddFavorite(id) => {
            if state.favorites.contains(&id) {
                return false;
            }
            state.favorites.favorite_ids.push(id);
            true
        }
        Action::RemoveFavorite(id) => {
            let before = state.favorites.favorite_ids.len();
            state.favorites.favorite_ids.retain(|existing| existing != &id);
            before != state.favorites.favorite_ids.len()
        }
        Action::ToggleFavorite(id) => {
            if state.favorites.contains(&id) {
                reduce(state, Action::RemoveFavorite(id))
            } else {
                reduce(state, Action::AddFavorite(id))
            }
        }
        Action::ClearFavorites => {
            let changed = !state.favorites.favorite_ids.is_empty();
            state.favorites.favorite_ids.clear();
            changed
        }
        Action::SetTheme(mode) => {
            let changed = state.theme.mode != mode;
            state.theme.mode = mode;
            changed
        }
        Action::ToggleTheme => {
            state.theme.mode = state.theme.mode.toggled();
            true
        }
        Action::RecordView(id) => {
            let viewed = &mut state.recently_viewed.course_ids;
            if viewed.first() == Some(&id) {
                return false;
            }
            viewed.retain(|existing| existing != &id);
            viewed.insert(0, id);
            viewed.truncate(RECENTLY_VIEWED_LIMIT);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_favorite_is_idempotent() {
        let mut state = AppState::new();
        assert!(reduce(&mut state, Action::AddFavorite("a".into())));
        assert!(!reduce(&mut state, Action::AddFavorite("a".into())));
        assert_eq!(state.favorites.favorite_ids, vec!["a"]);
    }

    #[test]
    fn test_toggle_favorite() {
        let mut state = AppState::demo();
        reduce(&mut state, Action::ToggleFavorite("1".into()));
        assert_eq!(state.favorites.favorite_ids, vec!["3"]);
        reduce(&mut state, Action::ToggleFavorite("1".into()));
        assert_eq!(state.favorites.favorite_ids, vec!["3", "1"]);
    }

    #[test]
    fn test_remove_missing_favorite_reports_no_change() {
        let mut state = AppState::new();
        assert!(!reduce(&mut state, Action::RemoveFavorite("x".into())));
    }

    #[test]
    fn test_theme_actions() {
        let mut state = AppState::new();
        assert!(!reduce(&mut state, Action::SetTheme(ThemeMode::Light)));
        assert!(reduce(&mut state, Action::ToggleTheme));
        assert_eq!(state.theme.mode, ThemeMode::Dark);
    }

    #[test]
    fn test_record_view_moves_to_front_and_caps() {
        let mut state = AppState::new();
        for i in 0..12 {
            reduce(&mut state, Action::RecordView(i.to_string()));
        }
        reduce(&mut state, Action::RecordView("5".into()));

        let viewed = &state.recently_viewed.course_ids;
        assert_eq!(viewed.len(), RECENTLY_VIEWED_LIMIT);
        assert_eq!(viewed[0], "5");
        assert_eq!(viewed[1], "11");
        assert_eq!(viewed.iter().filter(|id| *id == "5").count(), 1);
    }

    #[test]
    fn test_action_wire_shape() {
        let json = serde_json::to_string(&Action::AddFavorite("a".into())).unwrap();
        assert_eq!(json, r#"{"type":"addFavorite","payload":"a"}"#);
    }
}
