//! Light/dark theme and its change notifications.

use std::fmt;
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};

/// Active color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// The other theme.
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Name used for display and persistence.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseThemeError(String);

impl fmt::Display for ParseThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme `{}` (expected `dark` or `light`)", self.0)
    }
}

impl std::error::Error for ParseThemeError {}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(ParseThemeError(s.to_string())),
        }
    }
}

/// Holds the current theme and notifies subscribers when it changes.
///
/// Renderers never read this directly; the host drains a subscription between
/// frames and hands the new [`Theme`] to each renderer's update hook.
#[derive(Debug, Default)]
pub struct ThemeState {
    current: Theme,
    subscribers: Vec<Sender<Theme>>,
}

impl ThemeState {
    /// Create a theme state starting at `initial`.
    pub fn new(initial: Theme) -> Self {
        Self {
            current: initial,
            subscribers: Vec::new(),
        }
    }

    /// Current theme.
    pub fn get(&self) -> Theme {
        self.current
    }

    /// Switch to `theme`. Does nothing when it is already current.
    pub fn set(&mut self, theme: Theme) {
        if theme == self.current {
            return;
        }
        self.current = theme;
        self.notify();
    }

    /// Flip between dark and light, returning the new theme.
    pub fn toggle(&mut self) -> Theme {
        self.current = self.current.toggle();
        self.notify();
        self.current
    }

    /// Receive every future change.
    pub fn subscribe(&mut self) -> Receiver<Theme> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn notify(&mut self) {
        let theme = self.current;
        tracing::debug!(%theme, "theme changed");
        // Dropped receivers are pruned here.
        self.subscribers.retain(|tx| tx.send(theme).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_dark() {
        assert_eq!(ThemeState::default().get(), Theme::Dark);
        assert_eq!(Theme::default(), Theme::Dark);
    }

    #[test]
    fn test_toggle_twice_restores_and_notifies_twice() {
        let mut state = ThemeState::new(Theme::Dark);
        let rx = state.subscribe();

        assert_eq!(state.toggle(), Theme::Light);
        assert_eq!(state.toggle(), Theme::Dark);
        assert_eq!(state.get(), Theme::Dark);

        let seen: Vec<Theme> = rx.try_iter().collect();
        assert_eq!(seen, vec![Theme::Light, Theme::Dark]);
    }

    #[test]
    fn test_set_then_toggle() {
        let mut state = ThemeState::default();
        state.set(Theme::Light);
        assert_eq!(state.get(), Theme::Light);
        state.toggle();
        assert_eq!(state.get(), Theme::Dark);
    }

    #[test]
    fn test_set_current_value_is_silent() {
        let mut state = ThemeState::new(Theme::Light);
        let rx = state.subscribe();
        state.set(Theme::Light);
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let mut state = ThemeState::default();
        let kept = state.subscribe();
        drop(state.subscribe());
        assert_eq!(state.subscriber_count(), 2);

        state.toggle();
        assert_eq!(state.subscriber_count(), 1);
        assert_eq!(kept.try_recv(), Ok(Theme::Light));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!(" Light ".parse::<Theme>(), Ok(Theme::Light));
        assert!("sepia".parse::<Theme>().is_err());
        assert_eq!(Theme::Light.to_string(), "light");
    }
}
