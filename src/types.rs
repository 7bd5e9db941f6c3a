use std::fmt;

#[cfg(feature = "derive")]
use serde::Serialize;

/// Integer 2D coordinate, used for zone sectors and inventory grid slots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "derive", derive(Serialize))]
pub struct Vector2i {
    pub x: i32,
    pub y: i32,
}

impl Vector2i {
    pub const fn new(x: i32, y: i32) -> Self {
        Vector2i { x, y }
    }
}

/// Single precision 3D vector
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "derive", derive(Serialize))]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vector3 { x, y, z }
    }
}

/// Single precision rotation quaternion
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "derive", derive(Serialize))]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Quaternion { x, y, z, w }
    }
}

/// Identity of a data object: the peer that created it and a counter local
/// to that peer.
///
/// ```
/// use vhsave::ZdoId;
/// let id = ZdoId::new(-2, 17);
/// assert_eq!(id.to_string(), "-2:17");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "derive", derive(Serialize))]
pub struct ZdoId {
    pub user_id: i64,
    pub id: u32,
}

impl ZdoId {
    pub const fn new(user_id: i64, id: u32) -> Self {
        ZdoId { user_id, id }
    }
}

impl fmt::Display for ZdoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.user_id, self.id)
    }
}
