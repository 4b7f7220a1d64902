use tracing::{debug, warn};

use crate::datastore::StateStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

impl ThemeMode {
    pub fn name(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, ThemeMode::Dark)
    }

    fn flipped(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    /// The toggle affordance shows the mode a switch would land on: a sun
    /// while dark, a moon while light.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            ThemeMode::Dark => "☀",
            ThemeMode::Light => "☾",
        }
    }
}

/// ANSI SGR tokens for one mode. Row and control colors all come from
/// here, so switching modes recolors every surface on the next render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub text: &'static str,
    pub done: &'static str,
    pub accent: &'static str,
    pub danger: &'static str,
    pub dim: &'static str,
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            text: "97",
            done: "90",
            accent: "96",
            danger: "91",
            dim: "37",
        }
    }

    pub fn light() -> Self {
        Self {
            text: "30",
            done: "37",
            accent: "34",
            danger: "31",
            dim: "90",
        }
    }
}

#[derive(Debug)]
pub struct ThemeController {
    mode: ThemeMode,
}

impl ThemeController {
    /// Restores the persisted preference, falling back to the configured
    /// default when nothing usable is stored.
    #[tracing::instrument(skip(state))]
    pub fn restore(state: &StateStore, default_dark: bool) -> Self {
        let mode = match state.load_theme() {
            Some(true) => ThemeMode::Dark,
            Some(false) => ThemeMode::Light,
            None => {
                debug!(default_dark, "no persisted theme; using default");
                if default_dark {
                    ThemeMode::Dark
                } else {
                    ThemeMode::Light
                }
            }
        };

        Self { mode }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn palette(&self) -> Palette {
        match self.mode {
            ThemeMode::Dark => Palette::dark(),
            ThemeMode::Light => Palette::light(),
        }
    }

    /// Flips the mode and persists the new choice. Persistence is
    /// best-effort; the in-memory mode flips either way.
    #[tracing::instrument(skip(self, state))]
    pub fn toggle(&mut self, state: &StateStore) -> ThemeMode {
        self.set(state, self.mode.flipped());
        self.mode
    }

    #[tracing::instrument(skip(self, state))]
    pub fn set(&mut self, state: &StateStore, mode: ThemeMode) {
        self.mode = mode;
        debug!(mode = mode.name(), "theme changed");

        if let Err(err) = state.save_theme(mode.is_dark()) {
            warn!(error = %err, "failed to persist theme; keeping in-memory mode");
        }
    }
}
