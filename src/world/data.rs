use crate::{
    errors::{Error, ResultExt},
    package::bounded_vec,
    version::Gate,
    zdo::ZDO_MIN_SIZE,
    Package, RawString, Vector2i, Vector3, Zdo,
};
use log::{debug, trace};
use std::collections::BTreeMap;

#[cfg(feature = "derive")]
use serde::Serialize;

/// A point of interest placed by world generation
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "derive", derive(Serialize))]
pub struct LocationInstance {
    pub name: RawString,
    pub position: Vector3,
    pub generated: bool,
}

/// The random event in progress when the world was saved
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "derive", derive(Serialize))]
pub struct RandomEvent {
    pub text: RawString,
    pub time: f32,
    pub position: Vector3,
}

/// The contents of a world data file
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "derive", derive(Serialize))]
pub struct WorldData {
    pub version: i32,
    pub net_time: f64,

    // object table
    pub zdos: Vec<Zdo>,
    pub dead_zdos: BTreeMap<String, i64>,

    // zone system
    pub generated_zones: Vec<Vector2i>,
    pub pgw_version: i32,
    pub location_version: i32,
    pub locations_generated: bool,
    pub global_keys: Vec<RawString>,
    pub location_instances: Vec<LocationInstance>,

    // random event system
    pub event_timer: f32,
    #[cfg_attr(feature = "derive", serde(skip_serializing_if = "Option::is_none"))]
    pub event: Option<RandomEvent>,
}

/// The sections of a world data file, in stream order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldSection {
    Header,
    Objects,
    Zones,
    Events,
}

impl WorldSection {
    pub fn name(&self) -> &'static str {
        match self {
            WorldSection::Header => "header",
            WorldSection::Objects => "object table",
            WorldSection::Zones => "zone system",
            WorldSection::Events => "random event system",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldDataField {
    NetTime,
    SessionId,
    NextUid,
    Objects,
    DeadObjects,
    GeneratedZones,
    PgwVersion,
    LocationVersion,
    GlobalKeys,
    LocationsGenerated,
    LocationInstances,
    EventTimer,
    ActiveEvent,
}

impl WorldDataField {
    pub fn name(&self) -> &'static str {
        match self {
            WorldDataField::NetTime => "net time",
            WorldDataField::SessionId => "session id",
            WorldDataField::NextUid => "next uid",
            WorldDataField::Objects => "objects",
            WorldDataField::DeadObjects => "dead objects",
            WorldDataField::GeneratedZones => "generated zones",
            WorldDataField::PgwVersion => "pgw version",
            WorldDataField::LocationVersion => "location version",
            WorldDataField::GlobalKeys => "global keys",
            WorldDataField::LocationsGenerated => "locations generated",
            WorldDataField::LocationInstances => "location instances",
            WorldDataField::EventTimer => "event timer",
            WorldDataField::ActiveEvent => "active event",
        }
    }

    pub fn section(&self) -> WorldSection {
        match self {
            WorldDataField::NetTime => WorldSection::Header,
            WorldDataField::SessionId
            | WorldDataField::NextUid
            | WorldDataField::Objects
            | WorldDataField::DeadObjects => WorldSection::Objects,
            WorldDataField::GeneratedZones
            | WorldDataField::PgwVersion
            | WorldDataField::LocationVersion
            | WorldDataField::GlobalKeys
            | WorldDataField::LocationsGenerated
            | WorldDataField::LocationInstances => WorldSection::Zones,
            WorldDataField::EventTimer | WorldDataField::ActiveEvent => WorldSection::Events,
        }
    }
}

/// Field presence of world data by its version.
///
/// The zone system of a version 13 to 17 world stops after the global keys
/// and one older than 13 stops after the generated zones; those early exits
/// are expressed by the later fields' thresholds.
pub const WORLD_DATA_LAYOUT: &[(WorldDataField, Gate)] = &[
    (WorldDataField::NetTime, Gate::Since(4)),
    (WorldDataField::SessionId, Gate::Always),
    (WorldDataField::NextUid, Gate::Always),
    (WorldDataField::Objects, Gate::Always),
    (WorldDataField::DeadObjects, Gate::Always),
    (WorldDataField::GeneratedZones, Gate::Always),
    (WorldDataField::PgwVersion, Gate::Since(13)),
    (WorldDataField::LocationVersion, Gate::Since(21)),
    (WorldDataField::GlobalKeys, Gate::Since(14)),
    (WorldDataField::LocationsGenerated, Gate::Since(20)),
    (WorldDataField::LocationInstances, Gate::Since(18)),
    (WorldDataField::EventTimer, Gate::Always),
    (WorldDataField::ActiveEvent, Gate::Since(25)),
];

/// Presence of the generated flag within each location instance
pub const LOCATION_GENERATED: Gate = Gate::Since(19);

// minimum encoded sizes used to bound element counts
const OBJECT_MIN_SIZE: usize = 12 + 4 + ZDO_MIN_SIZE;
const DEAD_OBJECT_SIZE: usize = 12 + 8;
const ZONE_SIZE: usize = 8;
const LOCATION_MIN_SIZE: usize = 1 + 12;

impl WorldData {
    /// Decode a world data file
    ///
    /// ```
    /// use vhsave::{PackageWriter, WorldData};
    ///
    /// let mut writer = PackageWriter::new();
    /// writer
    ///     .write_i32(4)       // version
    ///     .write_f64(12.5)    // net time
    ///     .write_i64(0)       // session id
    ///     .write_u32(0)       // next uid
    ///     .write_i32(0)       // objects
    ///     .write_i32(0)       // dead objects
    ///     .write_i32(0)       // generated zones
    ///     .write_f32(3.0);    // event timer
    ///
    /// let world = WorldData::from_slice(writer.as_slice())?;
    /// assert_eq!(world.version, 4);
    /// assert_eq!(world.net_time, 12.5);
    /// assert!(world.zdos.is_empty());
    /// assert_eq!(world.event_timer, 3.0);
    /// # Ok::<(), vhsave::Error>(())
    /// ```
    pub fn from_slice(data: &[u8]) -> Result<WorldData, Error> {
        let mut package = Package::new(data);
        let world = WorldData::decode(&mut package).context("world data")?;
        debug!(
            "decoded world data: version {}, {} objects, {} dead objects, {} zones, {} locations",
            world.version,
            world.zdos.len(),
            world.dead_zdos.len(),
            world.generated_zones.len(),
            world.location_instances.len()
        );
        Ok(world)
    }

    /// Decode world data from the start of the package
    pub fn decode(package: &mut Package) -> Result<WorldData, Error> {
        let mut world = WorldData {
            version: package.read_i32().context("version")?,
            ..WorldData::default()
        };

        let mut section = WorldSection::Header;
        for &(field, gate) in WORLD_DATA_LAYOUT {
            if field.section() != section {
                section = field.section();
                trace!("reading {} at offset {}", section.name(), package.offset());
            }

            if gate.admits(world.version) {
                world
                    .read_field(package, field)
                    .context(field.name())
                    .context(section.name())?;
            }
        }

        Ok(world)
    }

    fn read_field(&mut self, package: &mut Package, field: WorldDataField) -> Result<(), Error> {
        match field {
            WorldDataField::NetTime => self.net_time = package.read_f64()?,
            WorldDataField::SessionId => {
                package.read_i64()?;
            }
            WorldDataField::NextUid => {
                package.read_u32()?;
            }
            WorldDataField::Objects => self.zdos = self.read_objects(package)?,
            WorldDataField::DeadObjects => self.dead_zdos = read_dead_objects(package)?,
            WorldDataField::GeneratedZones => {
                let count = package.read_count(ZONE_SIZE)?;
                let mut zones = bounded_vec(count, package.remaining());
                for _ in 0..count {
                    zones.push(package.read_vector2i()?);
                }
                self.generated_zones = zones;
            }
            WorldDataField::PgwVersion => self.pgw_version = package.read_i32()?,
            WorldDataField::LocationVersion => self.location_version = package.read_i32()?,
            WorldDataField::GlobalKeys => self.global_keys = package.read_string_list()?,
            WorldDataField::LocationsGenerated => self.locations_generated = package.read_bool()?,
            WorldDataField::LocationInstances => {
                self.location_instances = read_locations(package, self.version)?
            }
            WorldDataField::EventTimer => self.event_timer = package.read_f32()?,
            WorldDataField::ActiveEvent => {
                self.event = Some(RandomEvent {
                    text: package.read_string().context("text")?,
                    time: package.read_f32().context("time")?,
                    position: package.read_vector3().context("position")?,
                })
            }
        }
        Ok(())
    }

    fn read_objects(&self, package: &mut Package) -> Result<Vec<Zdo>, Error> {
        let count = package.read_count(OBJECT_MIN_SIZE).context("count")?;
        let mut zdos = bounded_vec(count, package.remaining());
        for i in 0..count {
            let zdo = read_object(package, self.version).with_context(|| format!("object #{}", i))?;
            zdos.push(zdo);
        }
        Ok(zdos)
    }
}

fn read_object(package: &mut Package, version: i32) -> Result<Zdo, Error> {
    let uid = package.read_zdo_id().context("id")?;
    let mut inner = package.read_package().context("package")?;
    let zdo = Zdo::decode(&mut inner, version)?;
    Ok(Zdo { uid, ..zdo })
}

fn read_dead_objects(package: &mut Package) -> Result<BTreeMap<String, i64>, Error> {
    let count = package.read_count(DEAD_OBJECT_SIZE).context("count")?;
    let mut dead = BTreeMap::new();
    for i in 0..count {
        let (id, time) = package
            .read_zdo_id()
            .and_then(|id| Ok((id, package.read_i64()?)))
            .with_context(|| format!("dead object #{}", i))?;
        dead.insert(id.to_string(), time);
    }
    Ok(dead)
}

fn read_locations(package: &mut Package, version: i32) -> Result<Vec<LocationInstance>, Error> {
    let count = package.read_count(LOCATION_MIN_SIZE).context("count")?;
    let mut locations = bounded_vec(count, package.remaining());
    for i in 0..count {
        let location = read_location(package, version).with_context(|| format!("location #{}", i))?;
        locations.push(location);
    }
    Ok(locations)
}

fn read_location(package: &mut Package, version: i32) -> Result<LocationInstance, Error> {
    let mut location = LocationInstance {
        name: package.read_string().context("name")?,
        position: package.read_vector3().context("position")?,
        generated: false,
    };

    if LOCATION_GENERATED.admits(version) {
        location.generated = package.read_bool().context("generated")?;
    }

    Ok(location)
}
