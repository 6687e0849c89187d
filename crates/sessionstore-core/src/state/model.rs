//! State container domain models.
//!
//! `AppState` is the full value held by one session's store. Each field is a
//! "slice" that consumers read and update independently.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of entries kept in the recently viewed slice.
pub const RECENTLY_VIEWED_LIMIT: usize = 10;

/// Course IDs marked as favorites in the fallback demo session.
pub const DEMO_FAVORITE_IDS: [&str; 2] = ["1", "3"];

/// Colour scheme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// Returns the opposite mode.
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

/// Courses the user has marked as favorite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesState {
    /// Favorite course IDs in insertion order, no duplicates
    #[serde(default)]
    pub favorite_ids: Vec<String>,
}

impl FavoritesState {
    pub fn contains(&self, course_id: &str) -> bool {
        self.favorite_ids.iter().any(|id| id == course_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeState {
    #[serde(default)]
    pub mode: ThemeMode,
}

/// Courses opened during this session, most recent first.
///
/// Purely client-side bookkeeping; not part of the default hydration payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentlyViewedState {
    #[serde(default)]
    pub course_ids: Vec<String>,
}

/// The complete state held by one store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub favorites: FavoritesState,
    pub theme: ThemeState,
    pub recently_viewed: RecentlyViewedState,
}

impl AppState {
    /// Creates a new AppState with every slice at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// The hard-coded starter state used when no server payload is available.
    pub fn demo() -> Self {
        Self {
            favorites: FavoritesState {
                favorite_ids: DEMO_FAVORITE_IDS.iter().map(|id| id.to_string()).collect(),
            },
            theme: ThemeState {
                mode: ThemeMode::Light,
            },
            recently_viewed: RecentlyViewedState::default(),
        }
    }

    /// Builds a full state from a partial seed; absent slices take their defaults.
    pub fn from_partial(seed: PartialState) -> Self {
        Self {
            favorites: seed.favorites.unwrap_or_default(),
            theme: seed.theme.unwrap_or_default(),
            recently_viewed: seed.recently_viewed.unwrap_or_default(),
        }
    }
}

/// A seed covering zero or more slices.
///
/// This is also the shape of a hydration payload: unknown keys are ignored,
/// missing keys stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorites: Option<FavoritesState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recently_viewed: Option<RecentlyViewedState>,
}

impl From<AppState> for PartialState {
    fn from(state: AppState) -> Self {
        Self {
            favorites: Some(state.favorites),
            theme: Some(state.theme),
            recently_viewed: Some(state.recently_viewed),
        }
    }
}

/// Names of the slices in `AppState`, as they appear in serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SliceName {
    Favorites,
    Theme,
    RecentlyViewed,
}

impl SliceName {
    /// The JSON object key for this slice.
    pub fn key(self) -> &'static str {
        match self {
            SliceName::Favorites => "favorites",
            SliceName::Theme => "theme",
            SliceName::RecentlyViewed => "recentlyViewed",
        }
    }

    /// Slices transferred from server to client unless configured otherwise.
    pub fn default_hydrated() -> Vec<SliceName> {
        vec![SliceName::Favorites, SliceName::Theme]
    }
}

impl fmt::Display for SliceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
