//! Decode world saves.
//!
//! A world is stored as two files:
//!
//! - metadata (`.fwl`): a single package holding the name, seed and id
//! - data (`.db`): the object table, zone system and random event state
//!
//! ```text
//! data
//! ├── version, net time
//! ├── object table: objects (id + nested package each), dead objects
//! ├── zone system: generated zones, pgw/location versions, global keys,
//! │                location instances
//! └── random event system: event timer, active event
//! ```
//!
//! Either file can be decoded on its own with [WorldMetadata::from_slice]
//! and [WorldData::from_slice], or both at once with [World::from_slices].

mod data;
mod meta;

pub use self::data::*;
pub use self::meta::*;

use crate::errors::Error;
use std::path::Path;

#[cfg(feature = "derive")]
use serde::Serialize;

/// A world assembled from its metadata and data files
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "derive", derive(Serialize))]
pub struct World {
    pub metadata: Option<WorldMetadata>,

    #[cfg_attr(feature = "derive", serde(flatten))]
    pub data: Option<WorldData>,
}

impl World {
    /// Decode whichever of the two files are provided
    pub fn from_slices(meta: Option<&[u8]>, data: Option<&[u8]>) -> Result<World, Error> {
        let metadata = meta.map(WorldMetadata::from_slice).transpose()?;
        let data = data.map(WorldData::from_slice).transpose()?;
        Ok(World { metadata, data })
    }

    /// Read and decode a metadata file and an optional data file
    pub fn from_files<P, Q>(meta: P, data: Option<Q>) -> Result<World, Error>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let meta = std::fs::read(meta)?;
        let data = data.map(std::fs::read).transpose()?;
        World::from_slices(Some(meta.as_slice()), data.as_deref())
    }
}
