//! Decode player profiles.
//!
//! A profile file holds two packages. The first is the profile record and
//! the second is ignored:
//!
//! ```text
//! profile
//! ├── version, stats
//! ├── world entries: save points and an optional map per world
//! ├── name, id, start seed
//! └── player data (optional, own package)
//!     ├── inventory (own version)
//!     ├── foods
//!     └── skills (own version)
//! ```

mod items;
mod map;
mod player;

pub use self::items::*;
pub use self::map::*;
pub use self::player::*;

use crate::{
    errors::{Error, ResultExt},
    version::Gate,
    Package, RawString, Vector3,
};
use log::debug;
use std::{collections::BTreeMap, path::Path};

#[cfg(feature = "derive")]
use serde::Serialize;

/// Lifetime counters of a character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "derive", derive(Serialize))]
pub struct PlayerStats {
    pub kills: i32,
    pub deaths: i32,
    pub crafts: i32,
    pub builds: i32,
}

/// Save points and map of a character in one world
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "derive", derive(Serialize))]
pub struct WorldPlayerData {
    pub have_custom_spawn_point: bool,
    pub spawn_point: Vector3,
    pub have_logout_point: bool,
    pub logout_point: Vector3,
    pub have_death_point: bool,
    pub death_point: Vector3,
    pub home_point: Vector3,
    #[cfg_attr(feature = "derive", serde(skip_serializing_if = "Option::is_none"))]
    pub map: Option<Map>,
}

/// A decoded profile file
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "derive", derive(Serialize))]
pub struct PlayerProfile {
    pub version: i32,
    pub stats: PlayerStats,

    /// Save points keyed by world uid
    pub world_data: BTreeMap<i64, WorldPlayerData>,
    pub name: RawString,
    pub id: i64,
    pub start_seed: RawString,
    #[cfg_attr(feature = "derive", serde(skip_serializing_if = "Option::is_none"))]
    pub player: Option<Player>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Stats,
    WorldData,
    Name,
    Id,
    StartSeed,
    Player,
}

impl ProfileField {
    pub fn name(&self) -> &'static str {
        match self {
            ProfileField::Stats => "stats",
            ProfileField::WorldData => "world data",
            ProfileField::Name => "name",
            ProfileField::Id => "id",
            ProfileField::StartSeed => "start seed",
            ProfileField::Player => "player data",
        }
    }
}

/// Field presence of a profile by its version
pub const PROFILE_LAYOUT: &[(ProfileField, Gate)] = &[
    (ProfileField::Stats, Gate::Since(28)),
    (ProfileField::WorldData, Gate::Always),
    (ProfileField::Name, Gate::Always),
    (ProfileField::Id, Gate::Always),
    (ProfileField::StartSeed, Gate::Always),
    (ProfileField::Player, Gate::Always),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavePointField {
    SpawnPoint,
    LogoutPoint,
    DeathPoint,
    HomePoint,
    Map,
}

impl SavePointField {
    pub fn name(&self) -> &'static str {
        match self {
            SavePointField::SpawnPoint => "spawn point",
            SavePointField::LogoutPoint => "logout point",
            SavePointField::DeathPoint => "death point",
            SavePointField::HomePoint => "home point",
            SavePointField::Map => "map",
        }
    }
}

/// Field presence of a world entry by the profile version
pub const SAVE_POINT_LAYOUT: &[(SavePointField, Gate)] = &[
    (SavePointField::SpawnPoint, Gate::Always),
    (SavePointField::LogoutPoint, Gate::Always),
    (SavePointField::DeathPoint, Gate::Since(30)),
    (SavePointField::HomePoint, Gate::Always),
    (SavePointField::Map, Gate::Since(29)),
];

// key, spawn flag and point, logout flag and point, home point
const WORLD_ENTRY_MIN_SIZE: usize = 8 + 13 + 13 + 12;

impl PlayerProfile {
    /// Decode a profile file
    pub fn from_slice(data: &[u8]) -> Result<PlayerProfile, Error> {
        let mut outer = Package::new(data);
        let mut record = outer.read_package().context("profile")?;
        outer.read_package().context("trailing package")?;

        let profile = PlayerProfile::decode(&mut record).context("profile")?;
        debug!(
            "decoded profile: version {}, {} worlds, player data {}",
            profile.version,
            profile.world_data.len(),
            if profile.player.is_some() { "present" } else { "absent" }
        );
        Ok(profile)
    }

    /// Read and decode a profile file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<PlayerProfile, Error> {
        let data = std::fs::read(path)?;
        PlayerProfile::from_slice(&data)
    }

    /// Decode the profile record from the start of the package
    pub fn decode(package: &mut Package) -> Result<PlayerProfile, Error> {
        let mut profile = PlayerProfile {
            version: package.read_i32().context("version")?,
            ..PlayerProfile::default()
        };

        for &(field, gate) in PROFILE_LAYOUT {
            if gate.admits(profile.version) {
                profile.read_field(package, field).context(field.name())?;
            }
        }

        Ok(profile)
    }

    fn read_field(&mut self, package: &mut Package, field: ProfileField) -> Result<(), Error> {
        match field {
            ProfileField::Stats => {
                self.stats = PlayerStats {
                    kills: package.read_i32().context("kills")?,
                    deaths: package.read_i32().context("deaths")?,
                    crafts: package.read_i32().context("crafts")?,
                    builds: package.read_i32().context("builds")?,
                }
            }
            ProfileField::WorldData => {
                let count = package.read_count(WORLD_ENTRY_MIN_SIZE).context("count")?;
                let mut worlds = BTreeMap::new();
                for i in 0..count {
                    let key = package
                        .read_i64()
                        .with_context(|| format!("world #{}", i))?;
                    let entry = WorldPlayerData::decode(package, self.version)
                        .with_context(|| format!("world {}", key))?;
                    worlds.insert(key, entry);
                }
                self.world_data = worlds;
            }
            ProfileField::Name => self.name = package.read_string()?,
            ProfileField::Id => self.id = package.read_i64()?,
            ProfileField::StartSeed => self.start_seed = package.read_string()?,
            ProfileField::Player => {
                if package.read_bool().context("present")? {
                    let mut inner = package.read_package()?;
                    self.player = Some(Player::decode(&mut inner)?);
                }
            }
        }
        Ok(())
    }
}

impl WorldPlayerData {
    fn decode(package: &mut Package, profile_version: i32) -> Result<WorldPlayerData, Error> {
        let mut entry = WorldPlayerData::default();
        for &(field, gate) in SAVE_POINT_LAYOUT {
            if gate.admits(profile_version) {
                entry.read_field(package, field).context(field.name())?;
            }
        }
        Ok(entry)
    }

    fn read_field(&mut self, package: &mut Package, field: SavePointField) -> Result<(), Error> {
        match field {
            SavePointField::SpawnPoint => {
                self.have_custom_spawn_point = package.read_bool()?;
                self.spawn_point = package.read_vector3()?;
            }
            SavePointField::LogoutPoint => {
                self.have_logout_point = package.read_bool()?;
                self.logout_point = package.read_vector3()?;
            }
            SavePointField::DeathPoint => {
                self.have_death_point = package.read_bool()?;
                self.death_point = package.read_vector3()?;
            }
            SavePointField::HomePoint => self.home_point = package.read_vector3()?,
            SavePointField::Map => {
                if package.read_bool().context("present")? {
                    let mut inner = package.read_package()?;
                    self.map = Some(Map::decode(&mut inner)?);
                }
            }
        }
        Ok(())
    }
}
