//! View State
//!
//! Tracks the current page, the selected token and the persisted UI
//! preferences. Every preference change is written through the
//! [`SettingsRepository`] before it takes effect, so a failed write leaves
//! the in-memory state untouched.

use std::fmt;

use crate::ports::settings::{SettingsError, SettingsRepository, Theme, UiSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Home,
    Trade,
    Token,
    Create,
    Rewards,
    Earnings,
    Leaderboard,
    Profile,
}

impl Page {
    /// Pages listed in the sidebar, in display order
    pub const NAV_ITEMS: [Page; 5] = [
        Page::Home,
        Page::Trade,
        Page::Create,
        Page::Rewards,
        Page::Leaderboard,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Trade => "Trade",
            Page::Token => "Token",
            Page::Create => "Create",
            Page::Rewards => "Rewards",
            Page::Earnings => "Earnings",
            Page::Leaderboard => "Leaderboard",
            Page::Profile => "Profile",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub struct ViewState<R: SettingsRepository> {
    repo: R,
    page: Page,
    selected_token: Option<String>,
    settings: UiSettings,
}

impl<R: SettingsRepository> ViewState<R> {
    /// Start on the home page with preferences read from `repo`
    pub fn load(repo: R) -> Result<Self, SettingsError> {
        let settings = repo.load()?;
        tracing::debug!("View state loaded: {:?}", settings);
        Ok(Self {
            repo,
            page: Page::default(),
            selected_token: None,
            settings,
        })
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn selected_token(&self) -> Option<&str> {
        self.selected_token.as_deref()
    }

    pub fn settings(&self) -> &UiSettings {
        &self.settings
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn navigate(&mut self, page: Page) {
        if self.page != page {
            tracing::debug!("Navigate {} -> {}", self.page, page);
        }
        self.page = page;
    }

    /// Select `symbol` and show its token page
    pub fn open_token(&mut self, symbol: impl Into<String>) {
        self.selected_token = Some(symbol.into());
        self.navigate(Page::Token);
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), SettingsError> {
        self.update(|s| s.theme = theme)
    }

    /// Flip light/dark; `System` resolves against `system_is_dark` first
    pub fn toggle_theme(&mut self, system_is_dark: bool) -> Result<Theme, SettingsError> {
        let next = self.settings.theme.toggled(system_is_dark);
        self.set_theme(next)?;
        Ok(next)
    }

    pub fn set_reduce_motion(&mut self, enabled: bool) -> Result<(), SettingsError> {
        self.update(|s| s.reduce_motion = enabled)
    }

    pub fn set_sidebar_pinned(&mut self, pinned: bool) -> Result<(), SettingsError> {
        self.update(|s| s.sidebar_pinned = pinned)
    }

    fn update(&mut self, change: impl FnOnce(&mut UiSettings)) -> Result<(), SettingsError> {
        let mut next = self.settings;
        change(&mut next);
        self.repo.save(&next)?;
        self.settings = next;
        Ok(())
    }
}
