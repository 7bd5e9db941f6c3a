/*!

A decoder for [Valheim](https://www.valheimgame.com/) save files: character
profiles (`.fch`), world metadata (`.fwl`) and world data (`.db`).

## Features

- ✔ Versioned: Decode every historical layout by checking field presence against the version read from the stream
- ✔ Safe: Never read past a nested package and never allocate for a count that cannot fit in the data
- ✔ Zero copy: Nested packages and byte arrays borrow from the input buffer
- ✔ Helpful: Errors carry the offset and the path of fields being decoded
- ✔ Exportable: Serialize any decoded model with [serde](https://serde.rs/)

## Quick Start

A profile file contains two packages, the first of which holds the profile
record. Files can be decoded directly with `from_file`, or from memory:

```rust
use vhsave::{PackageWriter, PlayerProfile};

let mut record = PackageWriter::new();
record.write_i32(20);                   // version
record.write_i32(0);                    // world entries
record.write_string("Ragnar")?;         // name
record.write_i64(7);                    // id
record.write_string("")?;               // start seed
record.write_bool(false);               // player data

let mut file = PackageWriter::new();
file.write_package(&record)?;
file.write_package(&PackageWriter::new())?;

let profile = PlayerProfile::from_slice(file.as_slice())?;
assert_eq!(profile.name, "Ragnar");
assert_eq!(profile.id, 7);
assert!(profile.player.is_none());
# Ok::<(), vhsave::Error>(())
```

Worlds are decoded with [World::from_slices] (or [WorldMetadata::from_slice]
and [WorldData::from_slice] separately).

## Errors

Decoding stops at the first failure. The error reports what went wrong and
where:

```rust
use vhsave::{ErrorKind, WorldData};

// version 4 but the net time is cut short
let data = [4, 0, 0, 0, 0, 0];
let err = WorldData::from_slice(&data).unwrap_err();
assert!(matches!(err.kind(), ErrorKind::Eof { offset: 4, .. }));
assert_eq!(err.context(), vec!["world data", "header", "net time"]);
```

## One Level Lower

The [Package] cursor reads the container's primitives directly when only a
part of a file is of interest:

```rust
use vhsave::Package;

let data = [0x03, b'a', b'b', b'c', 0x2a, 0x00, 0x00, 0x00];
let mut package = Package::new(&data);
assert_eq!(package.read_string()?, "abc");
assert_eq!(package.read_i32()?, 42);
assert!(package.is_empty());
# Ok::<(), vhsave::Error>(())
```

*/

mod errors;
mod package;
pub mod profile;
mod string;
mod types;
pub(crate) mod util;
mod version;
pub mod world;
mod writer;
mod zdo;

pub use self::errors::*;
pub use self::package::Package;
pub use self::profile::{PlayerProfile, PlayerStats, WorldPlayerData};
pub use self::string::RawString;
pub use self::types::*;
pub use self::version::Gate;
pub use self::world::{World, WorldData, WorldMetadata};
pub use self::writer::PackageWriter;
pub use self::zdo::*;
