use crate::{
    errors::{Error, ErrorKind},
    package::MAX_VARINT_BYTES,
    Quaternion, Vector2i, Vector3, ZdoId,
};

/// Writes primitives in the package layout.
///
/// This is the inverse of [Package](crate::Package) for individual values;
/// it does not know how to lay out whole records.
///
/// ```
/// use vhsave::{Package, PackageWriter};
///
/// let mut inner = PackageWriter::new();
/// inner.write_i32(30).write_f32(1.5);
///
/// let mut outer = PackageWriter::new();
/// outer.write_package(&inner)?;
///
/// let data = outer.into_inner();
/// let mut package = Package::new(&data);
/// let mut nested = package.read_package()?;
/// assert_eq!(nested.read_i32()?, 30);
/// assert_eq!(nested.read_f32()?, 1.5);
/// # Ok::<(), vhsave::Error>(())
/// ```
#[derive(Debug, Default, Clone)]
pub struct PackageWriter {
    buf: Vec<u8>,
}

impl PackageWriter {
    pub fn new() -> Self {
        PackageWriter::default()
    }

    /// The bytes written so far
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes the writer and returns the written bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bool(&mut self, x: bool) -> &mut Self {
        self.write_u8(u8::from(x))
    }

    pub fn write_u8(&mut self, x: u8) -> &mut Self {
        self.buf.push(x);
        self
    }

    pub fn write_i8(&mut self, x: i8) -> &mut Self {
        self.buf.extend_from_slice(&x.to_le_bytes());
        self
    }

    pub fn write_i32(&mut self, x: i32) -> &mut Self {
        self.buf.extend_from_slice(&x.to_le_bytes());
        self
    }

    pub fn write_u32(&mut self, x: u32) -> &mut Self {
        self.buf.extend_from_slice(&x.to_le_bytes());
        self
    }

    pub fn write_i64(&mut self, x: i64) -> &mut Self {
        self.buf.extend_from_slice(&x.to_le_bytes());
        self
    }

    pub fn write_u64(&mut self, x: u64) -> &mut Self {
        self.buf.extend_from_slice(&x.to_le_bytes());
        self
    }

    pub fn write_f32(&mut self, x: f32) -> &mut Self {
        self.buf.extend_from_slice(&x.to_le_bytes());
        self
    }

    pub fn write_f64(&mut self, x: f64) -> &mut Self {
        self.buf.extend_from_slice(&x.to_le_bytes());
        self
    }

    pub fn write_vector2i(&mut self, v: Vector2i) -> &mut Self {
        self.write_i32(v.x).write_i32(v.y)
    }

    pub fn write_vector3(&mut self, v: Vector3) -> &mut Self {
        self.write_f32(v.x).write_f32(v.y).write_f32(v.z)
    }

    pub fn write_quaternion(&mut self, q: Quaternion) -> &mut Self {
        self.write_f32(q.x).write_f32(q.y).write_f32(q.z).write_f32(q.w)
    }

    pub fn write_zdo_id(&mut self, id: ZdoId) -> &mut Self {
        self.write_i64(id.user_id).write_u32(id.id)
    }

    /// Write a string with its 7-bit encoded length.
    ///
    /// Fails when the length does not fit in four varint bytes.
    pub fn write_string(&mut self, data: impl AsRef<[u8]>) -> Result<&mut Self, Error> {
        let data = data.as_ref();
        let len = data.len();
        if len >> (7 * MAX_VARINT_BYTES) != 0 {
            return Err(self.too_long(len));
        }

        let mut v = len;
        while v >= 0x80 {
            self.buf.push((v as u8) | 0x80);
            v >>= 7;
        }
        self.buf.push(v as u8);
        self.buf.extend_from_slice(data);
        Ok(self)
    }

    /// Write a byte array with its `i32` length
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<&mut Self, Error> {
        let len = i32::try_from(data.len()).map_err(|_| self.too_long(data.len()))?;
        self.write_i32(len);
        self.buf.extend_from_slice(data);
        Ok(self)
    }

    /// Write the contents of another writer as a nested package
    pub fn write_package(&mut self, package: &PackageWriter) -> Result<&mut Self, Error> {
        self.write_bytes(package.as_slice())
    }

    fn too_long(&self, len: usize) -> Error {
        Error::new(ErrorKind::InvalidLength {
            offset: self.buf.len(),
            length: i64::try_from(len).unwrap_or(i64::MAX),
            remaining: 0,
        })
    }
}
