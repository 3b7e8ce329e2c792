//! "Apply theme to ride".
//!
//! Steps run in a fixed order: name, colours, music, entrance/exit, scenery.
//! Each enabled step is independent. A host failure in one step is written to
//! the debug log and the remaining steps still run, so a partially applied
//! theme is normal.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use ridetheme_logic::anchors::{
    collect_anchors, find_ride_endpoints, find_station_tiles, Endpoint,
};
use ridetheme_logic::endpoints::{style_endpoints, EndpointOutcome, EndpointReport};
use ridetheme_logic::ports::{EndpointHost, RideStyling, StructureRegistry};
use ridetheme_logic::request::PlacementRequest;
use ridetheme_logic::rides::{RideId, RideInfo};
use ridetheme_logic::scenery::{run_placement, PlacementRun, RunEnd};
use ridetheme_logic::themes::{Theme, ThemeCatalog};

use crate::debug_log::DebugLog;
use crate::error::ApplyError;
use crate::settings::DirectorSettings;

/// Every port an apply touches.
pub trait ParkHost: EndpointHost + StructureRegistry + RideStyling {}

impl<T: EndpointHost + StructureRegistry + RideStyling> ParkHost for T {}

/// How one step ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// Turned off in the settings.
    Disabled,
    Applied,
    /// Nothing to do, e.g. the theme has no music.
    Skipped(String),
    /// The host refused; the message is the host's error.
    Failed(String),
}

impl StepOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, StepOutcome::Applied)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    pub ride: RideId,
    pub ride_name: String,
    pub theme_label: String,
    pub name: StepOutcome,
    /// Name set by the name step, if it ran.
    pub new_name: Option<String>,
    pub colours: StepOutcome,
    pub music: StepOutcome,
    pub entrance_exit: StepOutcome,
    pub endpoints: Option<EndpointReport>,
    pub scenery: StepOutcome,
    pub placement: Option<PlacementRun>,
}

impl ApplyReport {
    /// Operator-facing completion message.
    pub fn summary(&self) -> String {
        format!("Applied {} to {}.", self.theme_label, self.ride_name)
    }

    pub fn steps(&self) -> [(&'static str, &StepOutcome); 5] {
        [
            ("name", &self.name),
            ("colours", &self.colours),
            ("music", &self.music),
            ("entrance/exit", &self.entrance_exit),
            ("scenery", &self.scenery),
        ]
    }

    pub fn failed_steps(&self) -> Vec<&'static str> {
        self.steps()
            .into_iter()
            .filter(|(_, o)| o.is_failed())
            .map(|(name, _)| name)
            .collect()
    }
}

/// A random name from the theme's pool.
pub fn suggest_name(theme: &Theme, rng: &mut impl Rng) -> Option<String> {
    theme.pick_name(rng).map(str::to_owned)
}

/// Apply `theme` to the ride `ride_id` as configured by `settings`.
///
/// Fails only when there is no ride to work on. Everything after that is
/// reported per step in the returned [`ApplyReport`].
pub fn apply_theme<H: ParkHost>(
    host: &mut H,
    ride_id: Option<RideId>,
    theme: &Theme,
    settings: &DirectorSettings,
    rng: &mut impl Rng,
    log: &mut DebugLog,
) -> Result<ApplyReport, ApplyError> {
    let Some(id) = ride_id else {
        log.warn("Apply failed: no ride selected.");
        return Err(ApplyError::NoRideSelected);
    };
    let Some(ride) = host.ride(id) else {
        log.warn(format!("Apply failed: ride {id} no longer exists."));
        return Err(ApplyError::UnknownRide(id));
    };
    log.info(format!("Applying theme '{}' to ride '{}'.", theme.label, ride.name));

    let mut report = ApplyReport {
        ride: id,
        ride_name: ride.name.clone(),
        theme_label: theme.label.clone(),
        name: StepOutcome::Disabled,
        new_name: None,
        colours: StepOutcome::Disabled,
        music: StepOutcome::Disabled,
        entrance_exit: StepOutcome::Disabled,
        endpoints: None,
        scenery: StepOutcome::Disabled,
        placement: None,
    };

    if settings.apply_name {
        report.name = match suggest_name(theme, rng) {
            Some(name) => match host.set_ride_name(id, &name) {
                Ok(()) => {
                    log.info(format!("Renamed ride to '{name}'."));
                    report.new_name = Some(name);
                    StepOutcome::Applied
                }
                Err(e) => failed(log, "Rename", e.to_string()),
            },
            None => skipped(log, "Rename", "theme has no names"),
        };
    }

    if settings.apply_colours {
        report.colours = match host.set_ride_colours(id, theme.colours.clamped()) {
            Ok(()) => {
                log.info("Recoloured ride.");
                StepOutcome::Applied
            }
            Err(e) => failed(log, "Recolour", e.to_string()),
        };
    }

    if settings.apply_music {
        report.music = match theme.music_style {
            Some(style) => match host.set_ride_music(id, style) {
                Ok(()) => {
                    log.info("Music set.");
                    StepOutcome::Applied
                }
                Err(e) => failed(log, "Music", e.to_string()),
            },
            None => skipped(log, "Music", "theme has no music"),
        };
    }

    let endpoints = if settings.apply_entrance_exit || settings.apply_scenery {
        find_ride_endpoints(&*host, id)
    } else {
        Vec::new()
    };

    if settings.apply_entrance_exit {
        let (outcome, endpoint_report) =
            style_ride_endpoints(&mut *host, &ride, &endpoints, theme, rng, log);
        report.entrance_exit = outcome;
        report.endpoints = endpoint_report;
    }

    if settings.apply_scenery {
        let (outcome, run) =
            place_ride_scenery(&mut *host, &ride, &endpoints, theme, settings, rng, log);
        report.scenery = outcome;
        report.placement = run;
    }

    log.info("Done applying theme.");
    Ok(report)
}

/// Apply the ride, theme and seed chosen in `settings`.
///
/// With no fixed seed one is drawn from the thread RNG. The seed used is
/// logged at debug level so the run can be replayed by putting it back into
/// `settings.seed`.
pub fn apply_with_settings<H: ParkHost>(
    host: &mut H,
    catalog: &ThemeCatalog,
    settings: &DirectorSettings,
    log: &mut DebugLog,
) -> Result<ApplyReport, ApplyError> {
    let theme = match settings.resolve_theme(catalog) {
        Ok(theme) => theme,
        Err(e) => {
            log.warn(format!("Apply failed: {e}."));
            return Err(e);
        }
    };
    let seed = settings.seed.unwrap_or_else(|| rand::thread_rng().gen());
    log::debug!("apply seed {seed}");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    apply_theme(host, settings.selected_ride, theme, settings, &mut rng, log)
}

fn failed(log: &mut DebugLog, step: &str, reason: String) -> StepOutcome {
    log.warn(format!("{step} failed: {reason}"));
    StepOutcome::Failed(reason)
}

fn skipped(log: &mut DebugLog, step: &str, reason: &str) -> StepOutcome {
    log.info(format!("{step} skipped: {reason}."));
    StepOutcome::Skipped(reason.to_string())
}

fn style_ride_endpoints<H: ParkHost>(
    host: &mut H,
    ride: &RideInfo,
    endpoints: &[Endpoint],
    theme: &Theme,
    rng: &mut impl Rng,
    log: &mut DebugLog,
) -> (StepOutcome, Option<EndpointReport>) {
    log.info(format!("Styling entrances/exits for {}.", ride.name));
    if endpoints.is_empty() {
        return (skipped(log, "Entrance/exit", "no entrance or exit tiles"), None);
    }

    let report = style_endpoints(&mut *host, endpoints, &theme.endpoint_theme(), rng);
    let restyled = report.count(EndpointOutcome::DirectRestyled);
    let accents = report.count(EndpointOutcome::AccentPlaced);
    log::debug!(
        "endpoints: {} total, {} restyled, {} accents",
        endpoints.len(),
        restyled,
        accents
    );

    let outcome = if restyled + accents == 0 {
        skipped(log, "Entrance/exit", "no endpoint could be styled")
    } else {
        if report.used_fallback() {
            log.info(format!("Placed {accents} accent(s) beside entrances/exits."));
        }
        log.info("Styled entrance/exit.");
        StepOutcome::Applied
    };
    (outcome, Some(report))
}

fn place_ride_scenery<H: ParkHost>(
    host: &mut H,
    ride: &RideInfo,
    endpoints: &[Endpoint],
    theme: &Theme,
    settings: &DirectorSettings,
    rng: &mut impl Rng,
    log: &mut DebugLog,
) -> (StepOutcome, Option<PlacementRun>) {
    log.info(format!("Placing scenery around {}.", ride.name));
    if theme.scenery.is_empty() {
        return (skipped(log, "Scenery", "no scenery defined for theme"), None);
    }

    let stations = find_station_tiles(&*host, ride.id);
    let anchors = collect_anchors(&stations, endpoints);
    if anchors.is_empty() {
        return (skipped(log, "Scenery", "no station or entry tiles found"), None);
    }

    let request = PlacementRequest::new(anchors, settings.scenery, theme.scenery.clone());
    let run = run_placement(&mut *host, &request, rng);
    if !run.unresolved.is_empty() {
        log::debug!("{} scenery object(s) not loaded in park", run.unresolved.len());
    }
    log::debug!(
        "scenery: visited {}, density skipped {}, unsuitable {}, end {:?}",
        run.stats.visited,
        run.stats.density_skipped,
        run.stats.unsuitable,
        run.end
    );

    let outcome = match run.end {
        RunEnd::EmptyPalette => skipped(log, "Scenery", "no scenery objects available in park"),
        RunEnd::NoAnchors => skipped(log, "Scenery", "no station or entry tiles found"),
        RunEnd::Completed | RunEnd::BudgetExhausted => {
            log.info(format!(
                "Placed {} scenery piece(s) ({} attempted).",
                run.summary.placed, run.summary.attempted
            ));
            StepOutcome::Applied
        }
    };
    (outcome, Some(run))
}
