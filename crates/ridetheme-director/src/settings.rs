//! Operator settings for an apply.
//!
//! Out-of-range numbers are never errors: they are clamped when the scenery
//! request is built. [`validate_settings`] reports them so a front end can tell
//! the operator what will actually be used.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ridetheme_logic::request::{
    PlacementOptions, MAX_DENSITY, MAX_PIECES, MAX_RADIUS, MIN_RADIUS,
};
use ridetheme_logic::rides::RideId;
use ridetheme_logic::themes::{Theme, ThemeCatalog};

use crate::error::ApplyError;

/// Everything the operator chose before pressing apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorSettings {
    /// Ride [`apply_with_settings`](crate::apply::apply_with_settings) works on.
    pub selected_ride: Option<RideId>,
    /// Position in the catalog, used when `theme_id` is unset.
    pub theme_index: usize,
    /// Catalog id; takes precedence over `theme_index`.
    pub theme_id: Option<String>,
    pub apply_name: bool,
    pub apply_colours: bool,
    pub apply_music: bool,
    pub apply_entrance_exit: bool,
    pub apply_scenery: bool,
    pub scenery: PlacementOptions,
    /// Fixed random seed for reproducible runs; `None` draws a fresh one.
    pub seed: Option<u64>,
}

impl Default for DirectorSettings {
    fn default() -> Self {
        Self {
            selected_ride: None,
            theme_index: 0,
            theme_id: None,
            apply_name: true,
            apply_colours: true,
            apply_music: true,
            apply_entrance_exit: true,
            apply_scenery: false,
            scenery: PlacementOptions::default(),
            seed: None,
        }
    }
}

impl DirectorSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The theme these settings select from `catalog`.
    pub fn resolve_theme<'a>(&self, catalog: &'a ThemeCatalog) -> Result<&'a Theme, ApplyError> {
        match &self.theme_id {
            Some(id) => catalog
                .find(id)
                .ok_or_else(|| ApplyError::UnknownTheme(id.clone())),
            None => catalog
                .get(self.theme_index)
                .ok_or_else(|| ApplyError::UnknownTheme(format!("#{}", self.theme_index))),
        }
    }

    pub fn any_step_enabled(&self) -> bool {
        self.apply_name
            || self.apply_colours
            || self.apply_music
            || self.apply_entrance_exit
            || self.apply_scenery
    }
}

/// Something in the settings that will not be used as written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsWarning {
    #[error("scenery radius {0} will be clamped to 1..=12")]
    RadiusOutOfRange(u32),
    #[error("scenery density {0} will be clamped to 100")]
    DensityOutOfRange(u32),
    #[error("scenery max pieces {0} will be clamped to 200")]
    MaxPiecesOutOfRange(u32),
    #[error("theme '{0}' is not in the catalog")]
    UnknownTheme(String),
    #[error("theme index {0} is past the end of the catalog")]
    ThemeIndexOutOfRange(usize),
    #[error("every step is disabled")]
    NothingEnabled,
}

/// Check settings against the catalog; an empty list means they apply as written.
pub fn validate_settings(
    settings: &DirectorSettings,
    catalog: &ThemeCatalog,
) -> Vec<SettingsWarning> {
    let mut warnings = Vec::new();
    let s = &settings.scenery;

    if s.radius < MIN_RADIUS || s.radius > MAX_RADIUS {
        warnings.push(SettingsWarning::RadiusOutOfRange(s.radius));
    }
    if s.density > MAX_DENSITY {
        warnings.push(SettingsWarning::DensityOutOfRange(s.density));
    }
    if s.max_pieces > MAX_PIECES {
        warnings.push(SettingsWarning::MaxPiecesOutOfRange(s.max_pieces));
    }
    match &settings.theme_id {
        Some(id) if catalog.find(id).is_none() => {
            warnings.push(SettingsWarning::UnknownTheme(id.clone()));
        }
        None if settings.theme_index >= catalog.len() => {
            warnings.push(SettingsWarning::ThemeIndexOutOfRange(settings.theme_index));
        }
        _ => {}
    }
    if !settings.any_step_enabled() {
        warnings.push(SettingsWarning::NothingEnabled);
    }

    warnings
}
