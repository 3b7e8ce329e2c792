//! Theme catalog.
//!
//! A theme bundles everything the director can apply to a ride: a pool of
//! names, a colour set, a music style, the entrance styling, and two object
//! palettes (accents beside entrances/exits, scenery around the ride).
//!
//! ```
//! use ridetheme_logic::themes::ThemeCatalog;
//!
//! let catalog = ThemeCatalog::builtin();
//! let pirate = catalog.find("pirate").unwrap();
//! assert_eq!(pirate.label, "Pirate Cove");
//! assert_eq!(pirate.entrance_type, 2);
//! ```

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::endpoints::EndpointTheme;
use crate::ports::ObjectId;
use crate::rides::ColourSet;

/// Entrance object used when a theme doesn't name one.
pub const STANDARD_ENTRANCE: &str = "ride_entrance.standard_1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub id: String,
    pub label: String,
    pub names: Vec<String>,
    pub colours: ColourSet,
    #[serde(default)]
    pub music_style: Option<u8>,
    #[serde(default)]
    pub accents: Vec<ObjectId>,
    #[serde(default)]
    pub scenery: Vec<ObjectId>,
    #[serde(default)]
    pub entrance_type: u8,
    #[serde(default = "standard_entrance")]
    pub entrance_object: ObjectId,
}

fn standard_entrance() -> ObjectId {
    ObjectId::from(STANDARD_ENTRANCE)
}

impl Theme {
    /// Random name from the theme's pool.
    pub fn pick_name(&self, rng: &mut impl Rng) -> Option<&str> {
        self.names.choose(rng).map(String::as_str)
    }

    pub fn endpoint_theme(&self) -> EndpointTheme {
        EndpointTheme {
            entrance_object: self.entrance_object.clone(),
            entrance_type: self.entrance_type,
            accents: self.accents.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid theme JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("theme catalog is empty")]
    Empty,
    #[error("duplicate theme id '{0}'")]
    DuplicateId(String),
    #[error("theme '{0}' has no names")]
    NoNames(String),
}

/// Ordered list of themes; order is the operator-facing menu order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeCatalog {
    themes: Vec<Theme>,
}

impl ThemeCatalog {
    /// The ten themes shipped with the director.
    pub fn builtin() -> Self {
        Self {
            themes: BUILTIN.iter().map(ThemeDef::to_theme).collect(),
        }
    }

    pub fn new(themes: Vec<Theme>) -> Result<Self, CatalogError> {
        if themes.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (i, t) in themes.iter().enumerate() {
            if themes[..i].iter().any(|p| p.id == t.id) {
                return Err(CatalogError::DuplicateId(t.id.clone()));
            }
            if t.names.is_empty() {
                return Err(CatalogError::NoNames(t.id.clone()));
            }
        }
        Ok(Self { themes })
    }

    /// Parse a JSON array of themes.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let themes: Vec<Theme> = serde_json::from_str(json)?;
        Self::new(themes)
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Theme> {
        self.themes.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.id == id)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.themes.iter().map(|t| t.label.as_str()).collect()
    }
}

struct ThemeDef {
    id: &'static str,
    label: &'static str,
    names: &'static [&'static str],
    colours: ColourSet,
    music_style: Option<u8>,
    accents: &'static [&'static str],
    scenery: &'static [&'static str],
    entrance_type: u8,
    entrance_object: &'static str,
}

impl ThemeDef {
    fn to_theme(&self) -> Theme {
        Theme {
            id: self.id.to_string(),
            label: self.label.to_string(),
            names: self.names.iter().map(|n| n.to_string()).collect(),
            colours: self.colours,
            music_style: self.music_style,
            accents: self.accents.iter().map(|&a| ObjectId::from(a)).collect(),
            scenery: self.scenery.iter().map(|&s| ObjectId::from(s)).collect(),
            entrance_type: self.entrance_type,
            entrance_object: ObjectId::from(self.entrance_object),
        }
    }
}

#[rustfmt::skip]
const BUILTIN: &[ThemeDef] = &[
    ThemeDef {
        id: "pirate",
        label: "Pirate Cove",
        names: &["Blackfin’s Revenge", "Skull & Thunder", "Buccaneer’s Run", "Tortuga Tumbler", "Maelstrom Voyage", "Galleon’s Fall"],
        colours: ColourSet {
            track_main: 18,
            track_alt: 19,
            supports: 26,
            train_body: 6,
            train_trim: 24,
        },
        music_style: Some(11),
        accents: &["scenery_small.torch_1", "scenery_small.barrel_1"],
        scenery: &["scenery_large.palm_1", "scenery_large.palm_2", "scenery_small.crate_1", "scenery_small.anchor_1"],
        entrance_type: 2,
        entrance_object: "ride_entrance.pirate_1",
    },
    ThemeDef {
        id: "western",
        label: "Frontier Western",
        names: &["Dust Devil", "Coyote Ridge", "Prospector’s Plunge", "Silver Spur", "Canyon Rattler", "Thunder Mesa"],
        colours: ColourSet {
            track_main: 27,
            track_alt: 28,
            supports: 15,
            train_body: 24,
            train_trim: 14,
        },
        music_style: Some(6),
        accents: &["scenery_small.cactus_1", "scenery_small.barrel_1"],
        scenery: &["scenery_large.dead_tree_1", "scenery_small.cartwheel_1", "scenery_small.water_trough_1"],
        entrance_type: 3,
        entrance_object: "ride_entrance.western_1",
    },
    ThemeDef {
        id: "sci",
        label: "Retro Sci Fi",
        names: &["Nebula Runner", "Quantum Coil", "Ion Storm", "Hyperflux", "Starlance", "Event Horizon"],
        colours: ColourSet {
            track_main: 1,
            track_alt: 0,
            supports: 21,
            train_body: 7,
            train_trim: 2,
        },
        music_style: Some(15),
        accents: &["scenery_small.scifi_lamp_1", "scenery_small.satellite_dish_1"],
        scenery: &["scenery_large.radar_1", "scenery_small.conduit_1", "scenery_small.air_vent_1"],
        entrance_type: 4,
        entrance_object: "ride_entrance.scifi_1",
    },
    ThemeDef {
        id: "spooky",
        label: "Gothic Spooky",
        names: &["Nightshade Manor", "Banshee’s Lament", "Graveyard Shift", "Phantom Ascent", "Cryptkeeper", "Midnight Wail"],
        colours: ColourSet {
            track_main: 0,
            track_alt: 22,
            supports: 16,
            train_body: 22,
            train_trim: 0,
        },
        music_style: Some(8),
        accents: &["scenery_small.gravestone_1", "scenery_small.lantern_1"],
        scenery: &["scenery_large.dead_tree_2", "scenery_small.gargoyle_1", "scenery_small.iron_fence_1"],
        entrance_type: 5,
        entrance_object: "ride_entrance.spooky_1",
    },
    ThemeDef {
        id: "castle",
        label: "Royal Castle",
        names: &["Dragon's Descent", "Kingdom Siege", "Knight's Charge", "Royal Rampart", "Lance & Lute", "Trebuchet Twister"],
        colours: ColourSet {
            track_main: 20,
            track_alt: 4,
            supports: 9,
            train_body: 2,
            train_trim: 25,
        },
        music_style: Some(1),
        accents: &["scenery_small.banner_1", "scenery_small.torch_2"],
        scenery: &["scenery_large.castle_wall_1", "scenery_small.flag_1", "scenery_small.statue_knight_1"],
        entrance_type: 6,
        entrance_object: "ride_entrance.castle_1",
    },
    ThemeDef {
        id: "jungle",
        label: "Jungle Expedition",
        names: &["Vine Vortex", "Temple Swing", "Rainforest Racer", "Serpent's Spiral", "Jaguar Leap", "Foliage Fury"],
        colours: ColourSet {
            track_main: 10,
            track_alt: 11,
            supports: 6,
            train_body: 24,
            train_trim: 9,
        },
        music_style: Some(5),
        accents: &["scenery_small.tiki_torch_1", "scenery_small.vine_1"],
        scenery: &["scenery_large.tropical_tree_1", "scenery_small.stone_head_1", "scenery_small.boulder_1"],
        entrance_type: 7,
        entrance_object: "ride_entrance.jungle_1",
    },
    ThemeDef {
        id: "arctic",
        label: "Arctic Expedition",
        names: &["Frostbite Flyer", "Glacier Glide", "Polar Plunge", "Ice Winder", "Snowstorm Sprint", "Aurora Ascent"],
        colours: ColourSet {
            track_main: 1,
            track_alt: 27,
            supports: 23,
            train_body: 28,
            train_trim: 24,
        },
        music_style: Some(9),
        accents: &["scenery_small.ice_crystal_1", "scenery_small.snowman_1"],
        scenery: &["scenery_large.snow_tree_1", "scenery_small.ice_chunk_1", "scenery_small.penguin_1"],
        entrance_type: 8,
        entrance_object: "ride_entrance.snow_1",
    },
    ThemeDef {
        id: "candy",
        label: "Candy Land",
        names: &["Sugar Rush", "Lollipop Loop", "Gumdrop Glide", "Toffee Twister", "Chocolate Churn", "Peppermint Plunge"],
        colours: ColourSet {
            track_main: 21,
            track_alt: 24,
            supports: 17,
            train_body: 20,
            train_trim: 6,
        },
        music_style: Some(13),
        accents: &["scenery_small.candy_cane_1", "scenery_small.lollipop_1"],
        scenery: &["scenery_large.gingerbread_house_1", "scenery_small.cupcake_1", "scenery_small.cookie_1"],
        entrance_type: 9,
        entrance_object: "ride_entrance.candy_1",
    },
    ThemeDef {
        id: "egypt",
        label: "Ancient Egypt",
        names: &["Pharaoh's Fury", "Sphinx Spin", "Pyramid Plunge", "Nile Navigator", "Scarab Sprint", "Obelisk Odyssey"],
        colours: ColourSet {
            track_main: 14,
            track_alt: 27,
            supports: 15,
            train_body: 24,
            train_trim: 0,
        },
        music_style: Some(3),
        accents: &["scenery_small.obelisk_1", "scenery_small.torch_1"],
        scenery: &["scenery_large.pyramid_piece_1", "scenery_small.statue_jackal_1", "scenery_small.urn_1"],
        entrance_type: 10,
        entrance_object: "ride_entrance.egyptian_1",
    },
    ThemeDef {
        id: "steampunk",
        label: "Clockwork Steampunk",
        names: &["Gear Grinder", "Steam Surge", "Copper Coaster", "Boiler Blast", "Cog & Sprocket", "Chrono Chariot"],
        colours: ColourSet {
            track_main: 18,
            track_alt: 19,
            supports: 25,
            train_body: 22,
            train_trim: 10,
        },
        music_style: Some(14),
        accents: &["scenery_small.pipe_1", "scenery_small.smokestack_1"],
        scenery: &["scenery_large.clocktower_1", "scenery_small.gear_1", "scenery_small.brass_boiler_1"],
        entrance_type: 11,
        entrance_object: "ride_entrance.steampunk_1",
    },
];
