//! Integration tests for the full "apply theme to ride" action.
//!
//! Each test builds a small park in a GridWorld, applies a built-in theme and
//! checks the report, the debug log and the resulting park state.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ridetheme_director::{
    apply_theme, apply_with_settings, ApplyError, ApplyReport, DebugLog, DirectorSettings,
    StepOutcome,
};
use ridetheme_logic::endpoints::EndpointOutcome;
use ridetheme_logic::grid::{GridCoord, MapSize};
use ridetheme_logic::grid_world::GridWorld;
use ridetheme_logic::ports::{EndpointStyle, StyleCapability, StyleMode};
use ridetheme_logic::rides::{RideId, RideInfo};
use ridetheme_logic::themes::{Theme, ThemeCatalog};
use ridetheme_logic::tile::TileElement;

// ── Helpers ────────────────────────────────────────────────────────────

const RIDE: RideId = RideId(1);
const ENTRANCE: GridCoord = GridCoord::new(10, 7);
const EXIT: GridCoord = GridCoord::new(10, 13);

fn pirate() -> Theme {
    ThemeCatalog::builtin().find("pirate").unwrap().clone()
}

/// A 20×20 park with one coaster: five station tiles plus an entrance and exit.
fn park(load_objects: bool) -> GridWorld {
    let mut w = GridWorld::flat(MapSize::new(20, 20), 14);
    w.add_ride(RideInfo {
        id: RIDE,
        name: "Coaster 1".into(),
        classification: None,
        has_shop_item: false,
    });
    for y in 8..13 {
        let track = TileElement::Track {
            ride: RIDE,
            is_station: true,
        };
        w.push_element(GridCoord::new(10, y), track);
    }
    w.push_element(ENTRANCE, TileElement::RideEntrance { ride: RIDE });
    w.push_element(EXIT, TileElement::RideExit { ride: RIDE });
    if load_objects {
        let theme = pirate();
        for id in theme.scenery.iter().chain(theme.accents.iter()) {
            w.load_object(id.as_str());
        }
    }
    w
}

fn scenery_settings() -> DirectorSettings {
    let mut s = DirectorSettings {
        apply_scenery: true,
        ..Default::default()
    };
    s.scenery.radius = 3;
    s.scenery.density = 100;
    s.scenery.max_pieces = 20;
    s
}

fn apply(
    w: &mut GridWorld,
    theme: &Theme,
    settings: &DirectorSettings,
    seed: u64,
) -> (ApplyReport, DebugLog) {
    let mut log = DebugLog::new();
    let report = apply_theme(
        w,
        Some(RIDE),
        theme,
        settings,
        &mut ChaCha8Rng::seed_from_u64(seed),
        &mut log,
    )
    .unwrap();
    (report, log)
}

// ── Full apply ─────────────────────────────────────────────────────────

#[test]
fn every_step_applies_on_a_plain_park() {
    let theme = pirate();
    let mut w = park(true);
    let (report, log) = apply(&mut w, &theme, &scenery_settings(), 7);

    for (step, outcome) in report.steps() {
        assert_eq!(*outcome, StepOutcome::Applied, "step {step}");
    }
    let ride = w.park_ride(RIDE).unwrap();
    assert!(theme.names.contains(&ride.info.name));
    assert_eq!(ride.colours, Some(theme.colours));
    assert_eq!(ride.music_style, Some(11));

    // No endpoint supports restyling, so each gets one accent.
    let endpoints = report.endpoints.as_ref().unwrap();
    assert!(endpoints.used_fallback());
    assert_eq!(endpoints.count(EndpointOutcome::AccentPlaced), 2);

    let run = report.placement.as_ref().unwrap();
    assert_eq!(run.summary.placed, 20);
    assert_eq!(w.placements().len(), 22);

    assert_eq!(log.entries().next(), Some("Applying theme 'Pirate Cove' to ride 'Coaster 1'."));
    assert_eq!(log.last(), Some("Done applying theme."));
}

#[test]
fn steps_run_in_fixed_order() {
    let mut w = park(true);
    let (_, log) = apply(&mut w, &pirate(), &scenery_settings(), 2);
    let entries: Vec<&str> = log.entries().collect();
    let pos = |prefix: &str| {
        entries
            .iter()
            .position(|e| e.starts_with(prefix))
            .unwrap_or_else(|| panic!("missing '{prefix}'"))
    };
    assert!(pos("Renamed ride") < pos("Recoloured ride"));
    assert!(pos("Recoloured ride") < pos("Music set"));
    assert!(pos("Music set") < pos("Styled entrance/exit"));
    assert!(pos("Styled entrance/exit") < pos("Placing scenery"));
}

#[test]
fn same_seed_same_outcome() {
    let settings = scenery_settings();
    let mut a = park(true);
    let mut b = park(true);
    let (ra, _) = apply(&mut a, &pirate(), &settings, 42);
    let (rb, _) = apply(&mut b, &pirate(), &settings, 42);
    assert_eq!(ra, rb);
    assert_eq!(a.placements(), b.placements());
}

// ── Settings-driven apply ──────────────────────────────────────────────

#[test]
fn settings_seed_replays_an_explicit_rng() {
    let catalog = ThemeCatalog::builtin();
    let settings = DirectorSettings {
        selected_ride: Some(RIDE),
        theme_id: Some("pirate".into()),
        seed: Some(42),
        ..scenery_settings()
    };
    let mut a = park(true);
    let report = apply_with_settings(&mut a, &catalog, &settings, &mut DebugLog::new()).unwrap();
    let mut b = park(true);
    let (expected, _) = apply(&mut b, &pirate(), &settings, 42);
    assert_eq!(report, expected);
    assert_eq!(a.placements(), b.placements());
}

#[test]
fn settings_without_seed_still_apply() {
    let catalog = ThemeCatalog::builtin();
    let settings = DirectorSettings {
        selected_ride: Some(RIDE),
        ..scenery_settings()
    };
    let mut w = park(true);
    let report = apply_with_settings(&mut w, &catalog, &settings, &mut DebugLog::new()).unwrap();
    assert_eq!(report.theme_label, catalog.themes()[0].label);
    assert!(report.failed_steps().is_empty());
}

#[test]
fn settings_without_ride_are_refused() {
    let mut w = park(true);
    let mut log = DebugLog::new();
    let err = apply_with_settings(
        &mut w,
        &ThemeCatalog::builtin(),
        &scenery_settings(),
        &mut log,
    )
    .unwrap_err();
    assert_eq!(err, ApplyError::NoRideSelected);
    assert!(w.placements().is_empty());
    assert_eq!(log.last(), Some("Apply failed: no ride selected."));
}

// ── Step independence ──────────────────────────────────────────────────

#[test]
fn music_failure_does_not_stop_later_steps() {
    let json = r#"{
        "size": {"x": 12, "y": 12},
        "base_z": 4,
        "tiles": [
            {"x": 5, "y": 5, "extra": [{"type": "track", "ride": 1, "is_station": true}]},
            {"x": 5, "y": 4, "extra": [{"type": "ride_entrance", "ride": 1}]}
        ],
        "rides": [{"id": 1, "name": "Monorail", "has_music": false}],
        "objects": ["scenery_large.palm_1", "scenery_small.torch_1"]
    }"#;
    let mut w = GridWorld::from_json(json).unwrap();
    let (report, log) = apply(&mut w, &pirate(), &scenery_settings(), 3);

    assert!(report.music.is_failed());
    assert_eq!(report.failed_steps(), vec!["music"]);
    assert!(report.name.is_applied());
    assert!(report.entrance_exit.is_applied());
    assert!(report.scenery.is_applied());
    assert!(log.contains("Music failed"));
    assert!(w.park_ride(RIDE).unwrap().music_style.is_none());
}

#[test]
fn theme_without_music_skips_music() {
    let mut theme = pirate();
    theme.music_style = None;
    let mut w = park(true);
    let (report, _) = apply(&mut w, &theme, &DirectorSettings::default(), 1);
    assert!(matches!(report.music, StepOutcome::Skipped(_)));
    assert!(w.park_ride(RIDE).unwrap().music_style.is_none());
}

#[test]
fn disabled_steps_leave_the_ride_alone() {
    let settings = DirectorSettings {
        apply_name: false,
        apply_colours: false,
        apply_music: false,
        apply_entrance_exit: false,
        ..scenery_settings()
    };
    let mut w = park(true);
    let (report, _) = apply(&mut w, &pirate(), &settings, 5);
    assert_eq!(report.name, StepOutcome::Disabled);
    assert_eq!(report.entrance_exit, StepOutcome::Disabled);
    assert!(report.endpoints.is_none());
    assert_eq!(w.park_ride(RIDE).unwrap().info.name, "Coaster 1");
    assert!(w.park_ride(RIDE).unwrap().colours.is_none());
    assert_eq!(w.placements().len(), 20);
}

// ── Entrance/exit and scenery edge cases ───────────────────────────────

#[test]
fn one_restyled_endpoint_suppresses_accents() {
    let mut w = park(true);
    w.set_capability(ENTRANCE, StyleCapability::Supported(StyleMode::EntranceType));
    let settings = DirectorSettings::default();
    let (report, _) = apply(&mut w, &pirate(), &settings, 9);

    let endpoints = report.endpoints.unwrap();
    assert_eq!(
        endpoints.outcomes(),
        vec![EndpointOutcome::DirectRestyled, EndpointOutcome::Skipped]
    );
    assert_eq!(w.endpoint_style(ENTRANCE), Some(EndpointStyle::EntranceType(2)));
    assert!(w.endpoint_style(EXIT).is_none());
    assert!(w.placements().is_empty());
}

#[test]
fn nothing_loaded_means_no_scenery() {
    let mut w = park(false);
    let (report, log) = apply(&mut w, &pirate(), &scenery_settings(), 11);
    assert_eq!(
        report.scenery,
        StepOutcome::Skipped("no scenery objects available in park".into())
    );
    assert!(matches!(report.entrance_exit, StepOutcome::Skipped(_)));
    assert_eq!(report.placement.as_ref().map(|r| r.summary.attempted), Some(0));
    assert!(w.placements().is_empty());
    assert!(log.contains("no scenery objects available in park"));
}

#[test]
fn ride_without_tiles_skips_scenery() {
    let mut w = GridWorld::flat(MapSize::new(8, 8), 0);
    w.load_object("scenery_large.palm_1");
    w.add_ride(RideInfo {
        id: RIDE,
        name: "Ghost".into(),
        classification: None,
        has_shop_item: false,
    });
    let (report, _) = apply(&mut w, &pirate(), &scenery_settings(), 0);
    assert_eq!(
        report.scenery,
        StepOutcome::Skipped("no station or entry tiles found".into())
    );
    assert!(report.placement.is_none());
}
