use super::items::{read_food, read_inventory, read_skills, Food, Item, Skill};
use crate::{
    errors::{Error, ResultExt},
    version::Gate,
    Package, RawString, Vector3,
};
use std::collections::BTreeMap;

#[cfg(feature = "derive")]
use serde::Serialize;

/// The character state embedded in a profile
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "derive", derive(Serialize))]
pub struct Player {
    pub version: i32,
    pub max_health: f32,
    pub health: f32,
    pub stamina: f32,
    pub first_spawn: bool,
    pub time_since_death: f32,
    pub guardian_power: RawString,
    pub guardian_power_cooldown: f32,
    pub inventory: Vec<Item>,
    pub known_recipes: Vec<RawString>,
    pub known_stations: BTreeMap<RawString, i32>,
    pub known_materials: Vec<RawString>,
    pub shown_tutorials: Vec<RawString>,
    pub uniques: Vec<RawString>,
    pub trophies: Vec<RawString>,
    pub known_biomes: Vec<i32>,
    pub known_texts: BTreeMap<RawString, RawString>,
    pub beard: RawString,
    pub hair: RawString,
    pub skin_color: Vector3,
    pub hair_color: Vector3,
    pub player_model: i32,
    pub foods: Vec<Food>,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerField {
    MaxHealth,
    Health,
    Stamina,
    FirstSpawn,
    TimeSinceDeath,
    GuardianPower,
    GuardianPowerCooldown,
    LegacyId,
    Inventory,
    KnownRecipes,
    LegacyStations,
    KnownStations,
    KnownMaterials,
    ShownTutorials,
    Uniques,
    Trophies,
    KnownBiomes,
    KnownTexts,
    Beard,
    Hair,
    SkinColor,
    HairColor,
    PlayerModel,
    Foods,
    Skills,
}

impl PlayerField {
    pub fn name(&self) -> &'static str {
        match self {
            PlayerField::MaxHealth => "max health",
            PlayerField::Health => "health",
            PlayerField::Stamina => "stamina",
            PlayerField::FirstSpawn => "first spawn",
            PlayerField::TimeSinceDeath => "time since death",
            PlayerField::GuardianPower => "guardian power",
            PlayerField::GuardianPowerCooldown => "guardian power cooldown",
            PlayerField::LegacyId => "legacy id",
            PlayerField::Inventory => "inventory",
            PlayerField::KnownRecipes => "known recipes",
            PlayerField::LegacyStations => "legacy stations",
            PlayerField::KnownStations => "known stations",
            PlayerField::KnownMaterials => "known materials",
            PlayerField::ShownTutorials => "shown tutorials",
            PlayerField::Uniques => "uniques",
            PlayerField::Trophies => "trophies",
            PlayerField::KnownBiomes => "known biomes",
            PlayerField::KnownTexts => "known texts",
            PlayerField::Beard => "beard",
            PlayerField::Hair => "hair",
            PlayerField::SkinColor => "skin color",
            PlayerField::HairColor => "hair color",
            PlayerField::PlayerModel => "player model",
            PlayerField::Foods => "foods",
            PlayerField::Skills => "skills",
        }
    }
}

/// Field presence of player data by its version
pub const PLAYER_LAYOUT: &[(PlayerField, Gate)] = &[
    (PlayerField::MaxHealth, Gate::Since(7)),
    (PlayerField::Health, Gate::Always),
    (PlayerField::Stamina, Gate::Since(10)),
    (PlayerField::FirstSpawn, Gate::Since(8)),
    (PlayerField::TimeSinceDeath, Gate::Since(20)),
    (PlayerField::GuardianPower, Gate::Since(23)),
    (PlayerField::GuardianPowerCooldown, Gate::Since(24)),
    (PlayerField::LegacyId, Gate::Exactly(2)),
    (PlayerField::Inventory, Gate::Always),
    (PlayerField::KnownRecipes, Gate::Always),
    (PlayerField::LegacyStations, Gate::Before(15)),
    (PlayerField::KnownStations, Gate::Since(15)),
    (PlayerField::KnownMaterials, Gate::Always),
    (PlayerField::ShownTutorials, Gate::Outside(19, 21)),
    (PlayerField::Uniques, Gate::Since(6)),
    (PlayerField::Trophies, Gate::Since(9)),
    (PlayerField::KnownBiomes, Gate::Since(18)),
    (PlayerField::KnownTexts, Gate::Since(22)),
    (PlayerField::Beard, Gate::Since(4)),
    (PlayerField::Hair, Gate::Since(4)),
    (PlayerField::SkinColor, Gate::Since(5)),
    (PlayerField::HairColor, Gate::Since(5)),
    (PlayerField::PlayerModel, Gate::Since(11)),
    (PlayerField::Foods, Gate::Since(12)),
    (PlayerField::Skills, Gate::Since(17)),
];

/// Food entries use the structured layout from this version on
pub const STRUCTURED_FOOD: Gate = Gate::Since(14);

/// Legacy food entries carry a seventh float from this version on
pub const LEGACY_FOOD_EXTRA: Gate = Gate::Since(13);

// minimum encoded sizes used to bound element counts
const STATION_MIN_SIZE: usize = 1 + 4;
const TEXT_MIN_SIZE: usize = 1 + 1;
const FOOD_MIN_SIZE: usize = 1 + 4;

impl Player {
    /// Decode player data from its own package
    pub fn decode(package: &mut Package) -> Result<Player, Error> {
        let mut player = Player {
            version: package.read_i32().context("version")?,
            ..Player::default()
        };

        for &(field, gate) in PLAYER_LAYOUT {
            if gate.admits(player.version) {
                player.read_field(package, field).context(field.name())?;
            }
        }

        Ok(player)
    }

    fn read_field(&mut self, package: &mut Package, field: PlayerField) -> Result<(), Error> {
        match field {
            PlayerField::MaxHealth => self.max_health = package.read_f32()?,
            PlayerField::Health => self.health = package.read_f32()?,
            PlayerField::Stamina => self.stamina = package.read_f32()?,
            PlayerField::FirstSpawn => self.first_spawn = package.read_bool()?,
            PlayerField::TimeSinceDeath => self.time_since_death = package.read_f32()?,
            PlayerField::GuardianPower => self.guardian_power = package.read_string()?,
            PlayerField::GuardianPowerCooldown => {
                self.guardian_power_cooldown = package.read_f32()?
            }
            PlayerField::LegacyId => {
                package.read_zdo_id()?;
            }
            PlayerField::Inventory => self.inventory = read_inventory(package)?,
            PlayerField::KnownRecipes => self.known_recipes = package.read_string_list()?,
            PlayerField::LegacyStations => {
                package.read_string_list()?;
            }
            PlayerField::KnownStations => self.known_stations = read_stations(package)?,
            PlayerField::KnownMaterials => self.known_materials = package.read_string_list()?,
            PlayerField::ShownTutorials => self.shown_tutorials = package.read_string_list()?,
            PlayerField::Uniques => self.uniques = package.read_string_list()?,
            PlayerField::Trophies => self.trophies = package.read_string_list()?,
            PlayerField::KnownBiomes => self.known_biomes = package.read_i32_list()?,
            PlayerField::KnownTexts => self.known_texts = read_texts(package)?,
            PlayerField::Beard => self.beard = package.read_string()?,
            PlayerField::Hair => self.hair = package.read_string()?,
            PlayerField::SkinColor => self.skin_color = package.read_vector3()?,
            PlayerField::HairColor => self.hair_color = package.read_vector3()?,
            PlayerField::PlayerModel => self.player_model = package.read_i32()?,
            PlayerField::Foods => self.foods = read_foods(package, self.version)?,
            PlayerField::Skills => self.skills = read_skills(package)?,
        }
        Ok(())
    }
}

fn read_stations(package: &mut Package) -> Result<BTreeMap<RawString, i32>, Error> {
    let count = package.read_count(STATION_MIN_SIZE).context("count")?;
    let mut stations = BTreeMap::new();
    for i in 0..count {
        let name = package
            .read_string()
            .with_context(|| format!("station #{}", i))?;
        let level = package
            .read_i32()
            .with_context(|| format!("station #{}", i))?;
        stations.insert(name, level);
    }
    Ok(stations)
}

fn read_texts(package: &mut Package) -> Result<BTreeMap<RawString, RawString>, Error> {
    let count = package.read_count(TEXT_MIN_SIZE).context("count")?;
    let mut texts = BTreeMap::new();
    for i in 0..count {
        let key = package.read_string().with_context(|| format!("text #{}", i))?;
        let value = package.read_string().with_context(|| format!("text #{}", i))?;
        texts.insert(key, value);
    }
    Ok(texts)
}

/// Decode the food history. Entries written before the structured layout
/// are consumed and dropped.
fn read_foods(package: &mut Package, version: i32) -> Result<Vec<Food>, Error> {
    let count = package.read_count(FOOD_MIN_SIZE).context("count")?;
    let mut foods = Vec::new();
    for i in 0..count {
        if STRUCTURED_FOOD.admits(version) {
            let food = read_food(package, version).with_context(|| format!("food #{}", i))?;
            foods.push(food);
        } else {
            skip_legacy_food(package, version).with_context(|| format!("food #{}", i))?;
        }
    }
    Ok(foods)
}

fn skip_legacy_food(package: &mut Package, version: i32) -> Result<(), Error> {
    package.read_string()?;
    let floats = if LEGACY_FOOD_EXTRA.admits(version) { 7 } else { 6 };
    package.read_bytes(floats * 4)?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{PackageWriter, ZdoId};
    use rstest::*;

    /// Lay out player data of the given version. Every version-gated value
    /// is distinct from its default so presence is observable.
    pub(crate) fn write_player(version: i32) -> PackageWriter {
        let mut w = PackageWriter::new();
        w.write_i32(version);
        if version >= 7 {
            w.write_f32(125.0);
        }
        w.write_f32(80.0);
        if version >= 10 {
            w.write_f32(55.0);
        }
        if version >= 8 {
            w.write_bool(true);
        }
        if version >= 20 {
            w.write_f32(999.0);
        }
        if version >= 23 {
            w.write_string("GP_Eikthyr").unwrap();
        }
        if version >= 24 {
            w.write_f32(300.0);
        }
        if version == 2 {
            w.write_zdo_id(ZdoId::new(1, 2));
        }

        // inventory
        w.write_i32(103).write_i32(1);
        w.write_string("Club").unwrap();
        w.write_i32(1)
            .write_f32(50.0)
            .write_vector2i(crate::Vector2i::new(0, 0))
            .write_bool(false)
            .write_i32(1)
            .write_i32(0)
            .write_i64(0);
        w.write_string("").unwrap();

        // known recipes
        w.write_i32(1);
        w.write_string("Recipe_Club").unwrap();

        // stations
        if version < 15 {
            w.write_i32(1);
            w.write_string("legacy").unwrap();
        } else {
            w.write_i32(1);
            w.write_string("piece_workbench").unwrap();
            w.write_i32(2);
        }

        // known materials
        w.write_i32(1);
        w.write_string("Wood").unwrap();

        if version < 19 || version >= 21 {
            w.write_i32(1);
            w.write_string("temple1").unwrap();
        }
        if version >= 6 {
            w.write_i32(1);
            w.write_string("Eikthyr").unwrap();
        }
        if version >= 9 {
            w.write_i32(1);
            w.write_string("TrophyBoar").unwrap();
        }
        if version >= 18 {
            w.write_i32(2).write_i32(1).write_i32(8);
        }
        if version >= 22 {
            w.write_i32(1);
            w.write_string("key").unwrap();
            w.write_string("value").unwrap();
        }
        if version >= 4 {
            w.write_string("Beard5").unwrap();
            w.write_string("Hair3").unwrap();
        }
        if version >= 5 {
            w.write_vector3(Vector3::new(1.0, 0.5, 0.25));
            w.write_vector3(Vector3::new(0.1, 0.2, 0.3));
        }
        if version >= 11 {
            w.write_i32(1);
        }
        if version >= 12 {
            w.write_i32(1);
            w.write_string("Raspberry").unwrap();
            if version >= 14 {
                w.write_f32(7.0);
                if version >= 16 {
                    w.write_f32(20.0);
                }
            } else {
                let floats = if version >= 13 { 7 } else { 6 };
                for _ in 0..floats {
                    w.write_f32(1.0);
                }
            }
        }
        if version >= 17 {
            w.write_i32(2).write_i32(1);
            w.write_i32(100).write_f32(10.0).write_f32(0.5);
        }
        w
    }

    fn decode_for(version: i32) -> Player {
        let data = write_player(version).into_inner();
        let mut package = Package::new(&data);
        let player = Player::decode(&mut package).unwrap();
        assert!(package.is_empty(), "trailing data at version {}", version);
        player
    }

    #[test]
    fn test_every_version_consumes_exactly() {
        for version in 1..=30 {
            let player = decode_for(version);
            assert_eq!(player.version, version);
            assert_eq!(player.health, 80.0);
            assert_eq!(player.inventory.len(), 1);
            assert_eq!(player.known_recipes, vec!["Recipe_Club"]);
            assert_eq!(player.known_materials, vec!["Wood"]);
        }
    }

    #[rstest]
    #[case(6, 0.0)]
    #[case(7, 125.0)]
    fn test_max_health(#[case] version: i32, #[case] expected: f32) {
        assert_eq!(decode_for(version).max_health, expected);
    }

    /// Whether a field holds a non-default value, or `None` when the field
    /// is consumed without being kept
    fn populated(player: &Player, field: PlayerField) -> Option<bool> {
        let populated = match field {
            PlayerField::MaxHealth => player.max_health != 0.0,
            PlayerField::Health => player.health != 0.0,
            PlayerField::Stamina => player.stamina != 0.0,
            PlayerField::FirstSpawn => player.first_spawn,
            PlayerField::TimeSinceDeath => player.time_since_death != 0.0,
            PlayerField::GuardianPower => !player.guardian_power.is_empty(),
            PlayerField::GuardianPowerCooldown => player.guardian_power_cooldown != 0.0,
            PlayerField::Inventory => !player.inventory.is_empty(),
            PlayerField::KnownRecipes => !player.known_recipes.is_empty(),
            PlayerField::KnownStations => !player.known_stations.is_empty(),
            PlayerField::KnownMaterials => !player.known_materials.is_empty(),
            PlayerField::ShownTutorials => !player.shown_tutorials.is_empty(),
            PlayerField::Uniques => !player.uniques.is_empty(),
            PlayerField::Trophies => !player.trophies.is_empty(),
            PlayerField::KnownBiomes => !player.known_biomes.is_empty(),
            PlayerField::KnownTexts => !player.known_texts.is_empty(),
            PlayerField::Beard => !player.beard.is_empty(),
            PlayerField::Hair => !player.hair.is_empty(),
            PlayerField::SkinColor => player.skin_color != Vector3::default(),
            PlayerField::HairColor => player.hair_color != Vector3::default(),
            PlayerField::PlayerModel => player.player_model != 0,
            PlayerField::Skills => !player.skills.is_empty(),

            // legacy food entries are dropped, so presence only shows as
            // exact consumption
            PlayerField::Foods if !STRUCTURED_FOOD.admits(player.version) => return None,
            PlayerField::Foods => !player.foods.is_empty(),
            PlayerField::LegacyId | PlayerField::LegacyStations => return None,
        };
        Some(populated)
    }

    #[test]
    fn test_layout_boundaries() {
        for &(field, gate) in PLAYER_LAYOUT {
            for version in gate.boundaries().into_iter().filter(|&v| v >= 1) {
                let player = decode_for(version);
                if let Some(populated) = populated(&player, field) {
                    assert_eq!(
                        populated,
                        gate.admits(version),
                        "{} at version {}",
                        field.name(),
                        version
                    );
                }
            }
        }
    }

    #[rstest]
    #[case(9, 0.0)]
    #[case(10, 55.0)]
    fn test_stamina(#[case] version: i32, #[case] stamina: f32) {
        assert_eq!(decode_for(version).stamina, stamina);
    }

    #[rstest]
    #[case(7, false)]
    #[case(8, true)]
    #[case(9, true)]
    fn test_first_spawn(#[case] version: i32, #[case] first_spawn: bool) {
        assert_eq!(decode_for(version).first_spawn, first_spawn);
    }

    #[rstest]
    #[case(19, 0.0, "", 0.0)]
    #[case(20, 999.0, "", 0.0)]
    #[case(23, 999.0, "GP_Eikthyr", 0.0)]
    #[case(24, 999.0, "GP_Eikthyr", 300.0)]
    fn test_guardian_power(
        #[case] version: i32,
        #[case] time_since_death: f32,
        #[case] power: &str,
        #[case] cooldown: f32,
    ) {
        let player = decode_for(version);
        assert_eq!(player.time_since_death, time_since_death);
        assert_eq!(player.guardian_power, power);
        assert_eq!(player.guardian_power_cooldown, cooldown);
    }

    #[rstest]
    #[case(14, 0)]
    #[case(15, 1)]
    fn test_known_stations(#[case] version: i32, #[case] count: usize) {
        let player = decode_for(version);
        assert_eq!(player.known_stations.len(), count);
        if count > 0 {
            assert_eq!(
                player.known_stations.get(&RawString::from("piece_workbench")),
                Some(&2)
            );
        }
    }

    #[rstest]
    #[case(18, 1)]
    #[case(19, 0)]
    #[case(20, 0)]
    #[case(21, 1)]
    fn test_shown_tutorials(#[case] version: i32, #[case] count: usize) {
        assert_eq!(decode_for(version).shown_tutorials.len(), count);
    }

    #[rstest]
    #[case(3, false, false, false, false)]
    #[case(4, true, false, false, false)]
    #[case(5, true, true, false, false)]
    #[case(11, true, true, true, false)]
    #[case(22, true, true, true, true)]
    fn test_appearance(
        #[case] version: i32,
        #[case] beard: bool,
        #[case] colors: bool,
        #[case] model: bool,
        #[case] texts: bool,
    ) {
        let player = decode_for(version);
        assert_eq!(!player.beard.is_empty(), beard);
        assert_eq!(!player.hair.is_empty(), beard);
        assert_eq!(player.skin_color != Vector3::default(), colors);
        assert_eq!(player.hair_color != Vector3::default(), colors);
        assert_eq!(player.player_model == 1, model);
        assert_eq!(!player.known_texts.is_empty(), texts);
    }

    #[rstest]
    #[case(5, 0, 0)]
    #[case(6, 1, 0)]
    #[case(9, 1, 1)]
    fn test_uniques_and_trophies(
        #[case] version: i32,
        #[case] uniques: usize,
        #[case] trophies: usize,
    ) {
        let player = decode_for(version);
        assert_eq!(player.uniques.len(), uniques);
        assert_eq!(player.trophies.len(), trophies);
    }

    #[rstest]
    #[case(17, vec![])]
    #[case(18, vec![1, 8])]
    fn test_known_biomes(#[case] version: i32, #[case] expected: Vec<i32>) {
        assert_eq!(decode_for(version).known_biomes, expected);
    }

    #[rstest]
    #[case(11, 0, 0.0)]
    #[case(12, 0, 0.0)]
    #[case(13, 0, 0.0)]
    #[case(14, 1, 0.0)]
    #[case(16, 1, 20.0)]
    fn test_foods(#[case] version: i32, #[case] count: usize, #[case] stamina: f32) {
        let player = decode_for(version);
        assert_eq!(player.foods.len(), count);
        if let Some(food) = player.foods.first() {
            assert_eq!(food.name, "Raspberry");
            assert_eq!(food.health, 7.0);
            assert_eq!(food.stamina, stamina);
        }
    }

    #[rstest]
    #[case(16, 0)]
    #[case(17, 1)]
    fn test_skills(#[case] version: i32, #[case] count: usize) {
        let player = decode_for(version);
        assert_eq!(player.skills.len(), count);
    }

    #[test]
    fn test_truncated_inventory_reports_field() {
        let data = write_player(24).into_inner();

        // header fields up to the cooldown, then the inventory version and half its count
        let cut = 4 + 4 + 4 + 4 + 1 + 4 + (1 + 10) + 4 + 6;
        let err = Player::decode(&mut Package::new(&data[..cut])).unwrap_err();
        assert_eq!(err.context()[0], "inventory");
    }
}
