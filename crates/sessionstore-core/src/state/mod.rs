//! State container domain module.
//!
//! # Module Structure
//!
//! - `model`: The state value and its slices (`AppState`, `PartialState`, `SliceName`)
//! - `action`: Updates and the reducer (`Action`, `reduce`)

mod action;
mod model;

pub use action::{Action, reduce};
pub use model::{
    AppState, DEMO_FAVORITE_IDS, FavoritesState, PartialState, RECENTLY_VIEWED_LIMIT,
    RecentlyViewedState, SliceName, ThemeMode, ThemeState,
};
