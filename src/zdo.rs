//! Data objects: the generic, versioned records that make up a world.
//!
//! A serialized object is a fixed block of metadata and spatial state,
//! followed by six property maps. Each map is written as a one byte count
//! and that many `(i32 key, value)` pairs, in the order of
//! [ZdoValueKind::ORDER].

use crate::{
    errors::{Error, ResultExt},
    version::Gate,
    Package, Quaternion, RawString, Vector2i, Vector3, ZdoId,
};
use std::collections::BTreeMap;

#[cfg(feature = "derive")]
use serde::Serialize;

/// The type of a value stored in an object's property maps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ZdoValueKind {
    Float,
    Vector3,
    Quaternion,
    Int,
    Long,
    String,
}

impl ZdoValueKind {
    /// The order in which property maps are serialized
    pub const ORDER: [ZdoValueKind; 6] = [
        ZdoValueKind::Float,
        ZdoValueKind::Vector3,
        ZdoValueKind::Quaternion,
        ZdoValueKind::Int,
        ZdoValueKind::Long,
        ZdoValueKind::String,
    ];
}

/// A single property value
#[derive(Debug, Clone, PartialEq)]
pub enum ZdoValue {
    Float(f32),
    Vector3(Vector3),
    Quaternion(Quaternion),
    Int(i32),
    Long(i64),
    String(RawString),
}

impl ZdoValue {
    pub fn kind(&self) -> ZdoValueKind {
        match self {
            ZdoValue::Float(_) => ZdoValueKind::Float,
            ZdoValue::Vector3(_) => ZdoValueKind::Vector3,
            ZdoValue::Quaternion(_) => ZdoValueKind::Quaternion,
            ZdoValue::Int(_) => ZdoValueKind::Int,
            ZdoValue::Long(_) => ZdoValueKind::Long,
            ZdoValue::String(_) => ZdoValueKind::String,
        }
    }

    /// Decode a value of the given kind
    pub fn read(package: &mut Package, kind: ZdoValueKind) -> Result<ZdoValue, Error> {
        match kind {
            ZdoValueKind::Float => package.read_f32().map(ZdoValue::Float),
            ZdoValueKind::Vector3 => package.read_vector3().map(ZdoValue::Vector3),
            ZdoValueKind::Quaternion => package.read_quaternion().map(ZdoValue::Quaternion),
            ZdoValueKind::Int => package.read_i32().map(ZdoValue::Int),
            ZdoValueKind::Long => package.read_i64().map(ZdoValue::Long),
            ZdoValueKind::String => package.read_string().map(ZdoValue::String),
        }
    }
}

/// The typed property maps of an object, keyed by hashed property name.
///
/// Keys are unique within a map; inserting a key twice keeps the later value.
///
/// ```
/// use vhsave::{Properties, ZdoValue, ZdoValueKind};
///
/// let mut props = Properties::default();
/// props.insert(10, ZdoValue::Int(1));
/// props.insert(10, ZdoValue::Float(2.0));
/// assert_eq!(props.get(ZdoValueKind::Int, 10), Some(ZdoValue::Int(1)));
/// assert_eq!(props.get(ZdoValueKind::Float, 10), Some(ZdoValue::Float(2.0)));
/// assert_eq!(props.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "derive", derive(Serialize))]
pub struct Properties {
    pub floats: BTreeMap<i32, f32>,
    pub vectors: BTreeMap<i32, Vector3>,
    pub quaternions: BTreeMap<i32, Quaternion>,
    pub ints: BTreeMap<i32, i32>,
    pub longs: BTreeMap<i32, i64>,
    pub strings: BTreeMap<i32, RawString>,
}

impl Properties {
    /// Store a value in the map for its kind, returning the value it replaced
    pub fn insert(&mut self, key: i32, value: ZdoValue) -> Option<ZdoValue> {
        match value {
            ZdoValue::Float(x) => self.floats.insert(key, x).map(ZdoValue::Float),
            ZdoValue::Vector3(x) => self.vectors.insert(key, x).map(ZdoValue::Vector3),
            ZdoValue::Quaternion(x) => self.quaternions.insert(key, x).map(ZdoValue::Quaternion),
            ZdoValue::Int(x) => self.ints.insert(key, x).map(ZdoValue::Int),
            ZdoValue::Long(x) => self.longs.insert(key, x).map(ZdoValue::Long),
            ZdoValue::String(x) => self.strings.insert(key, x).map(ZdoValue::String),
        }
    }

    pub fn get(&self, kind: ZdoValueKind, key: i32) -> Option<ZdoValue> {
        match kind {
            ZdoValueKind::Float => self.floats.get(&key).copied().map(ZdoValue::Float),
            ZdoValueKind::Vector3 => self.vectors.get(&key).copied().map(ZdoValue::Vector3),
            ZdoValueKind::Quaternion => {
                self.quaternions.get(&key).copied().map(ZdoValue::Quaternion)
            }
            ZdoValueKind::Int => self.ints.get(&key).copied().map(ZdoValue::Int),
            ZdoValueKind::Long => self.longs.get(&key).copied().map(ZdoValue::Long),
            ZdoValueKind::String => self.strings.get(&key).cloned().map(ZdoValue::String),
        }
    }

    /// Number of entries across all maps
    pub fn len(&self) -> usize {
        self.floats.len()
            + self.vectors.len()
            + self.quaternions.len()
            + self.ints.len()
            + self.longs.len()
            + self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_map(&mut self, package: &mut Package, kind: ZdoValueKind) -> Result<(), Error> {
        let count = package.read_u8().context("count")?;
        for i in 0..count {
            let key = package
                .read_i32()
                .with_context(|| format!("key #{}", i))?;
            let value = ZdoValue::read(package, kind).with_context(|| format!("value #{}", i))?;
            self.insert(key, value);
        }
        Ok(())
    }
}

/// A data object
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "derive", derive(Serialize))]
pub struct Zdo {
    pub uid: ZdoId,
    pub owner_revision: u32,
    pub data_revision: u32,
    pub persistent: bool,
    pub owner: i64,
    pub time_created: i64,
    pub pgw_version: i32,

    #[cfg_attr(feature = "derive", serde(rename = "type"))]
    pub object_type: i8,
    pub distant: bool,
    pub prefab: i32,
    pub sector: Vector2i,
    pub position: Vector3,
    pub rotation: Quaternion,

    #[cfg_attr(feature = "derive", serde(flatten))]
    pub properties: Properties,
}

/// The fields of a serialized object, in stream order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZdoField {
    OwnerRevision,
    DataRevision,
    Persistent,
    Owner,
    TimeCreated,
    PgwVersion,
    LegacyInt,
    ObjectType,
    Distant,
    LegacyBytes,
    Prefab,
    Sector,
    Position,
    Rotation,
    Properties(ZdoValueKind),
}

impl ZdoField {
    pub fn name(&self) -> &'static str {
        match self {
            ZdoField::OwnerRevision => "owner revision",
            ZdoField::DataRevision => "data revision",
            ZdoField::Persistent => "persistent",
            ZdoField::Owner => "owner",
            ZdoField::TimeCreated => "time created",
            ZdoField::PgwVersion => "pgw version",
            ZdoField::LegacyInt => "legacy int",
            ZdoField::ObjectType => "type",
            ZdoField::Distant => "distant",
            ZdoField::LegacyBytes => "legacy bytes",
            ZdoField::Prefab => "prefab",
            ZdoField::Sector => "sector",
            ZdoField::Position => "position",
            ZdoField::Rotation => "rotation",
            ZdoField::Properties(ZdoValueKind::Float) => "float properties",
            ZdoField::Properties(ZdoValueKind::Vector3) => "vector3 properties",
            ZdoField::Properties(ZdoValueKind::Quaternion) => "quaternion properties",
            ZdoField::Properties(ZdoValueKind::Int) => "int properties",
            ZdoField::Properties(ZdoValueKind::Long) => "long properties",
            ZdoField::Properties(ZdoValueKind::String) => "string properties",
        }
    }
}

/// Field presence of a serialized object by world version
pub const ZDO_LAYOUT: &[(ZdoField, Gate)] = &[
    (ZdoField::OwnerRevision, Gate::Always),
    (ZdoField::DataRevision, Gate::Always),
    (ZdoField::Persistent, Gate::Always),
    (ZdoField::Owner, Gate::Always),
    (ZdoField::TimeCreated, Gate::Always),
    (ZdoField::PgwVersion, Gate::Always),
    (ZdoField::LegacyInt, Gate::Between(16, 24)),
    (ZdoField::ObjectType, Gate::Since(23)),
    (ZdoField::Distant, Gate::Since(22)),
    (ZdoField::LegacyBytes, Gate::Before(13)),
    (ZdoField::Prefab, Gate::Since(17)),
    (ZdoField::Sector, Gate::Always),
    (ZdoField::Position, Gate::Always),
    (ZdoField::Rotation, Gate::Always),
    (ZdoField::Properties(ZdoValueKind::Float), Gate::Always),
    (ZdoField::Properties(ZdoValueKind::Vector3), Gate::Always),
    (ZdoField::Properties(ZdoValueKind::Quaternion), Gate::Always),
    (ZdoField::Properties(ZdoValueKind::Int), Gate::Always),
    (ZdoField::Properties(ZdoValueKind::Long), Gate::Always),
    (ZdoField::Properties(ZdoValueKind::String), Gate::Always),
];

/// Smallest encoded object: the fields present in every version, with
/// every property map empty
pub(crate) const ZDO_MIN_SIZE: usize = 4 + 4 + 1 + 8 + 8 + 4 + 8 + 12 + 16 + 6;

impl Zdo {
    /// Decode an object from its own package, laid out according to the
    /// version of the world that contains it.
    ///
    /// The object's identity is stored outside of its package, so the
    /// returned object has a default `uid`.
    pub fn decode(package: &mut Package, version: i32) -> Result<Zdo, Error> {
        let mut zdo = Zdo::default();
        for &(field, gate) in ZDO_LAYOUT {
            if gate.admits(version) {
                zdo.read_field(package, field).context(field.name())?;
            }
        }
        Ok(zdo)
    }

    fn read_field(&mut self, package: &mut Package, field: ZdoField) -> Result<(), Error> {
        match field {
            ZdoField::OwnerRevision => self.owner_revision = package.read_u32()?,
            ZdoField::DataRevision => self.data_revision = package.read_u32()?,
            ZdoField::Persistent => self.persistent = package.read_bool()?,
            ZdoField::Owner => self.owner = package.read_i64()?,
            ZdoField::TimeCreated => self.time_created = package.read_i64()?,
            ZdoField::PgwVersion => self.pgw_version = package.read_i32()?,
            ZdoField::LegacyInt => {
                package.read_i32()?;
            }
            ZdoField::ObjectType => self.object_type = package.read_i8()?,
            ZdoField::Distant => self.distant = package.read_bool()?,
            ZdoField::LegacyBytes => {
                package.read_u8()?;
                package.read_u8()?;
            }
            ZdoField::Prefab => self.prefab = package.read_i32()?,
            ZdoField::Sector => self.sector = package.read_vector2i()?,
            ZdoField::Position => self.position = package.read_vector3()?,
            ZdoField::Rotation => self.rotation = package.read_quaternion()?,
            ZdoField::Properties(kind) => self.properties.read_map(package, kind)?,
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{ErrorKind, PackageWriter};
    use rstest::*;

    /// Lays out an object for the given version with recognizable values in
    /// every version-gated slot.
    pub(crate) fn write_zdo(writer: &mut PackageWriter, version: i32) {
        writer
            .write_u32(11)
            .write_u32(12)
            .write_bool(true)
            .write_i64(-77)
            .write_i64(123_456)
            .write_i32(3);

        if (16..24).contains(&version) {
            writer.write_i32(0x0bad);
        }
        if version >= 23 {
            writer.write_i8(-2);
        }
        if version >= 22 {
            writer.write_bool(true);
        }
        if version < 13 {
            writer.write_u8(0xee).write_u8(0xee);
        }
        if version >= 17 {
            writer.write_i32(0x5f5e);
        }

        writer
            .write_vector2i(Vector2i::new(-4, 9))
            .write_vector3(Vector3::new(1.0, 2.0, 3.0))
            .write_quaternion(Quaternion::IDENTITY);

        // floats
        writer.write_u8(1).write_i32(100).write_f32(0.5);
        // vectors
        writer.write_u8(0);
        // quaternions
        writer.write_u8(0);
        // ints
        writer.write_u8(2).write_i32(7).write_i32(70).write_i32(8).write_i32(80);
        // longs
        writer.write_u8(1).write_i32(9).write_i64(i64::MIN);
        // strings
        writer.write_u8(1).write_i32(-5);
        writer.write_string("Tonk").unwrap();
    }

    fn decode_for(version: i32) -> Zdo {
        let mut writer = PackageWriter::new();
        write_zdo(&mut writer, version);
        let data = writer.into_inner();
        let mut package = Package::new(&data);
        let zdo = Zdo::decode(&mut package, version).unwrap();
        assert!(package.is_empty(), "trailing data at version {}", version);
        zdo
    }

    #[rstest]
    #[case(12, 0, false, 0)]
    #[case(13, 0, false, 0)]
    #[case(15, 0, false, 0)]
    #[case(16, 0, false, 0)]
    #[case(17, 0, false, 0x5f5e)]
    #[case(21, 0, false, 0x5f5e)]
    #[case(22, 0, true, 0x5f5e)]
    #[case(23, -2, true, 0x5f5e)]
    #[case(24, -2, true, 0x5f5e)]
    #[case(31, -2, true, 0x5f5e)]
    fn test_version_gated_fields(
        #[case] version: i32,
        #[case] object_type: i8,
        #[case] distant: bool,
        #[case] prefab: i32,
    ) {
        let zdo = decode_for(version);
        assert_eq!(zdo.object_type, object_type);
        assert_eq!(zdo.distant, distant);
        assert_eq!(zdo.prefab, prefab);

        assert_eq!(zdo.owner_revision, 11);
        assert_eq!(zdo.data_revision, 12);
        assert!(zdo.persistent);
        assert_eq!(zdo.owner, -77);
        assert_eq!(zdo.time_created, 123_456);
        assert_eq!(zdo.pgw_version, 3);
        assert_eq!(zdo.sector, Vector2i::new(-4, 9));
        assert_eq!(zdo.position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(zdo.rotation, Quaternion::IDENTITY);
    }

    #[test]
    fn test_layout_boundaries() {
        for &(field, gate) in ZDO_LAYOUT {
            for version in gate.boundaries().into_iter().filter(|&v| v >= 1) {
                let zdo = decode_for(version);
                let populated = match field {
                    ZdoField::ObjectType => zdo.object_type != 0,
                    ZdoField::Distant => zdo.distant,
                    ZdoField::Prefab => zdo.prefab != 0,

                    // consumed and discarded
                    ZdoField::LegacyInt | ZdoField::LegacyBytes => continue,
                    _ => unreachable!("{} is always present", field.name()),
                };
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

    #[test]
    fn test_smallest_object() {
        // version 13 carries none of the optional header fields
        let mut writer = PackageWriter::new();
        writer
            .write_u32(0)
            .write_u32(0)
            .write_bool(false)
            .write_i64(0)
            .write_i64(0)
            .write_i32(0)
            .write_vector2i(Vector2i::default())
            .write_vector3(Vector3::default())
            .write_quaternion(Quaternion::IDENTITY);
        for _ in ZdoValueKind::ORDER {
            writer.write_u8(0);
        }
        assert_eq!(writer.len(), ZDO_MIN_SIZE);

        let data = writer.into_inner();
        let mut package = Package::new(&data);
        Zdo::decode(&mut package, 13).unwrap();
        assert!(package.is_empty());
        for version in 1..=34 {
            let mut package = Package::new(&data[..ZDO_MIN_SIZE - 1]);
            assert!(Zdo::decode(&mut package, version).is_err());
        }
    }

    #[test]
    fn test_properties() {
        let zdo = decode_for(26);
        let props = &zdo.properties;
        assert_eq!(props.floats.get(&100), Some(&0.5));
        assert!(props.vectors.is_empty());
        assert!(props.quaternions.is_empty());
        assert_eq!(props.ints.len(), 2);
        assert_eq!(props.get(ZdoValueKind::Int, 8), Some(ZdoValue::Int(80)));
        assert_eq!(props.longs.get(&9), Some(&i64::MIN));
        assert_eq!(
            props.get(ZdoValueKind::String, -5),
            Some(ZdoValue::String(RawString::from("Tonk")))
        );
        assert_eq!(props.len(), 5);
    }

    #[test]
    fn test_duplicate_key_last_write_wins() {
        let mut writer = PackageWriter::new();
        writer
            .write_u8(2)
            .write_i32(42)
            .write_i32(1)
            .write_i32(42)
            .write_i32(2);
        let data = writer.into_inner();

        let mut props = Properties::default();
        props
            .read_map(&mut Package::new(&data), ZdoValueKind::Int)
            .unwrap();
        assert_eq!(props.ints.len(), 1);
        assert_eq!(props.ints[&42], 2);
    }

    #[test]
    fn test_layout_table_matches_gates() {
        let gate = |target: ZdoField| {
            ZDO_LAYOUT
                .iter()
                .find(|(field, _)| *field == target)
                .map(|(_, gate)| *gate)
                .unwrap()
        };

        assert_eq!(gate(ZdoField::LegacyInt), Gate::Between(16, 24));
        assert_eq!(gate(ZdoField::ObjectType), Gate::Since(23));
        assert_eq!(gate(ZdoField::Distant), Gate::Since(22));
        assert_eq!(gate(ZdoField::LegacyBytes), Gate::Before(13));
        assert_eq!(gate(ZdoField::Prefab), Gate::Since(17));

        let maps: Vec<_> = ZDO_LAYOUT
            .iter()
            .filter_map(|(field, _)| match field {
                ZdoField::Properties(kind) => Some(*kind),
                _ => None,
            })
            .collect();
        assert_eq!(maps, ZdoValueKind::ORDER);
    }

    #[test]
    fn test_truncated_object_names_field() {
        let mut writer = PackageWriter::new();
        write_zdo(&mut writer, 26);
        let data = writer.into_inner();

        // cut inside the rotation
        let cut = 4 + 4 + 1 + 8 + 8 + 4 + 1 + 1 + 4 + 8 + 12 + 6;
        let err = Zdo::decode(&mut Package::new(&data[..cut]), 26).unwrap_err();
        assert_eq!(err.context(), vec!["rotation"]);
        assert!(matches!(err.kind(), ErrorKind::Eof { needed: 16, .. }));
    }

    #[test]
    fn test_truncated_property_value() {
        let mut writer = PackageWriter::new();
        write_zdo(&mut writer, 26);
        let data = writer.into_inner();

        // drop the last byte of the final string value
        let err = Zdo::decode(&mut Package::new(&data[..data.len() - 1]), 26).unwrap_err();
        assert_eq!(err.context(), vec!["string properties", "value #0"]);
        assert!(matches!(err.kind(), ErrorKind::InvalidLength { .. }));
    }
}
