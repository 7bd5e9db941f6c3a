use crate::{
    errors::{Error, ErrorKind, ResultExt},
    package::bounded_vec,
    version::Gate,
    Package, RawString, Vector3,
};

#[cfg(feature = "derive")]
use serde::Serialize;

/// The player's map of a world: explored cells and placed pins
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "derive", derive(Serialize))]
pub struct Map {
    pub version: i32,
    pub texture_size: i32,

    /// `texture_size²` cells in row major order
    pub explored: Vec<bool>,
    pub pins: Vec<Pin>,
    pub public_reference_position: bool,
}

/// A marker placed on the map
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "derive", derive(Serialize))]
pub struct Pin {
    pub name: RawString,
    pub position: Vector3,
    #[cfg_attr(feature = "derive", serde(rename = "type"))]
    pub pin_type: i32,
    pub checked: bool,
}

impl Pin {
    pub fn new(name: impl Into<RawString>, position: Vector3, pin_type: i32, checked: bool) -> Self {
        Pin {
            name: name.into(),
            position,
            pin_type,
            checked,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapField {
    Explored,
    Pins,
    PublicReferencePosition,
}

impl MapField {
    pub fn name(&self) -> &'static str {
        match self {
            MapField::Explored => "explored",
            MapField::Pins => "pins",
            MapField::PublicReferencePosition => "public reference position",
        }
    }
}

/// Field presence of a map by the map's own version
pub const MAP_LAYOUT: &[(MapField, Gate)] = &[
    (MapField::Explored, Gate::Always),
    (MapField::Pins, Gate::Since(2)),
    (MapField::PublicReferencePosition, Gate::Since(4)),
];

const PIN_MIN_SIZE: usize = 1 + 12 + 4 + 1;

impl Map {
    /// Decode a map from its own package
    pub fn decode(package: &mut Package) -> Result<Map, Error> {
        let mut map = Map {
            version: package.read_i32().context("version")?,
            ..Map::default()
        };

        for &(field, gate) in MAP_LAYOUT {
            if gate.admits(map.version) {
                map.read_field(package, field).context(field.name())?;
            }
        }

        Ok(map)
    }

    fn read_field(&mut self, package: &mut Package, field: MapField) -> Result<(), Error> {
        match field {
            MapField::Explored => {
                let (size, explored) = read_explored(package)?;
                self.texture_size = size;
                self.explored = explored;
            }
            MapField::Pins => {
                let count = package.read_count(PIN_MIN_SIZE).context("count")?;
                let mut pins = bounded_vec(count, package.remaining());
                for i in 0..count {
                    pins.push(read_pin(package).with_context(|| format!("pin #{}", i))?);
                }
                self.pins = pins;
            }
            MapField::PublicReferencePosition => {
                self.public_reference_position = package.read_bool()?
            }
        }
        Ok(())
    }
}

/// Read the texture size and its square of one byte booleans
fn read_explored(package: &mut Package) -> Result<(i32, Vec<bool>), Error> {
    let offset = package.offset();
    let size = package.read_i32().context("texture size")?;
    let cells = usize::try_from(size)
        .ok()
        .and_then(|x| x.checked_mul(x))
        .filter(|&n| n <= package.remaining())
        .ok_or_else(|| {
            Error::new(ErrorKind::InvalidLength {
                offset,
                length: i64::from(size),
                remaining: package.remaining(),
            })
        })
        .context("texture size")?;

    let data = package.read_bytes(cells)?;
    Ok((size, data.iter().map(|&x| x != 0).collect()))
}

fn read_pin(package: &mut Package) -> Result<Pin, Error> {
    Ok(Pin {
        name: package.read_string().context("name")?,
        position: package.read_vector3().context("position")?,
        pin_type: package.read_i32().context("type")?,
        checked: package.read_bool().context("checked")?,
    })
}
