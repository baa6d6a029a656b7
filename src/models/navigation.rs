use serde::{Deserialize, Serialize};

/// Which view a session is looking at
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// Full or filtered catalog
    #[default]
    Browse,
    /// Recommendations for the selected movie
    Recommend,
}

/// Two-state browse/recommend flow for one session
///
/// `select` and `back` are the only mutators.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavigationState {
    page: Page,
    selected_movie: Option<String>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn selected_movie(&self) -> Option<&str> {
        self.selected_movie.as_deref()
    }

    /// User picked a movie: switch to the recommend view
    pub fn select(&mut self, name: impl Into<String>) {
        self.selected_movie = Some(name.into());
        self.page = Page::Recommend;
    }

    /// Return to the browse view. The selection is kept.
    pub fn back(&mut self) {
        self.page = Page::Browse;
    }
}

/// Color scheme for rendered pages
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Parses a theme name, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_browse() {
        let state = NavigationState::new();
        assert_eq!(state.page(), Page::Browse);
        assert_eq!(state.selected_movie(), None);
    }

    #[test]
    fn test_select_then_back_keeps_selection() {
        let mut state = NavigationState::new();

        state.select("Inception");
        assert_eq!(state.page(), Page::Recommend);
        assert_eq!(state.selected_movie(), Some("Inception"));

        state.back();
        assert_eq!(state.page(), Page::Browse);
        assert_eq!(state.selected_movie(), Some("Inception"));
    }

    #[test]
    fn test_select_replaces_previous_selection() {
        let mut state = NavigationState::new();
        state.select("Inception");
        state.back();
        state.select("Heat");
        assert_eq!(state.page(), Page::Recommend);
        assert_eq!(state.selected_movie(), Some("Heat"));
    }

    #[test]
    fn test_navigation_serialization() {
        let mut state = NavigationState::new();
        state.select("Inception");
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["page"], "recommend");
        assert_eq!(json["selected_movie"], "Inception");
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!(Theme::parse("Dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse(" light "), Some(Theme::Light));
        assert_eq!(Theme::parse("sepia"), None);
    }
}
