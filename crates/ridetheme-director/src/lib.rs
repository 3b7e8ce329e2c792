//! Host-facing theme application.
//!
//! Wires the pure pieces of `ridetheme-logic` into the single operator
//! action "apply this theme to this ride". Each enabled step runs on its own;
//! a failing step is recorded in the [`debug_log::DebugLog`] and the next one
//! still runs.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`apply`] | `apply_theme` step sequence, its report, and the settings-driven entry point |
//! | [`debug_log`] | Bounded operator log mirrored to the `log` facade |
//! | [`error`] | Errors that abort an apply before any step runs |
//! | [`settings`] | Operator settings, defaults and validation |

pub mod apply;
pub mod debug_log;
pub mod error;
pub mod settings;

pub use apply::{
    apply_theme, apply_with_settings, suggest_name, ApplyReport, ParkHost, StepOutcome,
};
pub use debug_log::DebugLog;
pub use error::ApplyError;
pub use settings::{validate_settings, DirectorSettings, SettingsWarning};
