use crate::{
    errors::{Error, ResultExt},
    version::Gate,
    Package, RawString,
};
use log::debug;

#[cfg(feature = "derive")]
use serde::Serialize;

/// The contents of a world metadata file
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "derive", derive(Serialize))]
pub struct WorldMetadata {
    pub version: i32,
    pub name: RawString,
    pub seed_name: RawString,
    pub seed: i32,
    pub uid: i64,
    pub world_gen_version: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldMetadataField {
    Name,
    SeedName,
    Seed,
    Uid,
    WorldGenVersion,
}

impl WorldMetadataField {
    pub fn name(&self) -> &'static str {
        match self {
            WorldMetadataField::Name => "name",
            WorldMetadataField::SeedName => "seed name",
            WorldMetadataField::Seed => "seed",
            WorldMetadataField::Uid => "uid",
            WorldMetadataField::WorldGenVersion => "world generation version",
        }
    }
}

/// Field presence of world metadata by its version
pub const WORLD_METADATA_LAYOUT: &[(WorldMetadataField, Gate)] = &[
    (WorldMetadataField::Name, Gate::Always),
    (WorldMetadataField::SeedName, Gate::Always),
    (WorldMetadataField::Seed, Gate::Always),
    (WorldMetadataField::Uid, Gate::Always),
    (WorldMetadataField::WorldGenVersion, Gate::Since(26)),
];

impl WorldMetadata {
    /// Decode a metadata file: a single package holding the metadata record
    pub fn from_slice(data: &[u8]) -> Result<WorldMetadata, Error> {
        let mut package = Package::new(data)
            .read_package()
            .context("world metadata")?;
        let meta = WorldMetadata::decode(&mut package).context("world metadata")?;
        debug!(
            "decoded world metadata: version {}, name {}",
            meta.version, meta.name
        );
        Ok(meta)
    }

    /// Decode the metadata record itself
    pub fn decode(package: &mut Package) -> Result<WorldMetadata, Error> {
        let mut meta = WorldMetadata {
            version: package.read_i32().context("version")?,
            ..WorldMetadata::default()
        };

        for &(field, gate) in WORLD_METADATA_LAYOUT {
            if gate.admits(meta.version) {
                meta.read_field(package, field).context(field.name())?;
            }
        }

        Ok(meta)
    }

    fn read_field(&mut self, package: &mut Package, field: WorldMetadataField) -> Result<(), Error> {
        match field {
            WorldMetadataField::Name => self.name = package.read_string()?,
            WorldMetadataField::SeedName => self.seed_name = package.read_string()?,
            WorldMetadataField::Seed => self.seed = package.read_i32()?,
            WorldMetadataField::Uid => self.uid = package.read_i64()?,
            WorldMetadataField::WorldGenVersion => self.world_gen_version = package.read_i32()?,
        }
        Ok(())
    }
}
