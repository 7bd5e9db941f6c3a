use crate::{
    errors::{Error, ErrorKind},
    util::get_split,
    Quaternion, RawString, Vector2i, Vector3, ZdoId,
};

/// Maximum number of bytes in a 7-bit encoded string length
pub(crate) const MAX_VARINT_BYTES: usize = 4;

/// Decode a 7-bit encoded length from the start of the data.
///
/// Returns the length and the number of bytes it occupied, or `None` if the
/// data ends before the length is terminated. At most four bytes are
/// consumed, even if the fourth still has its continuation bit set.
#[inline]
pub(crate) fn read_varint_len(data: &[u8]) -> Option<(usize, usize)> {
    let mut length = 0usize;
    for (i, &b) in data.iter().take(MAX_VARINT_BYTES).enumerate() {
        length |= usize::from(b & 0x7f) << (7 * i);
        if b & 0x80 == 0 || i + 1 == MAX_VARINT_BYTES {
            return Some((length, i + 1));
        }
    }

    None
}

/// Allocate for `count` elements, never reserving more memory than there
/// are unread bytes left to fill it
#[inline]
pub(crate) fn bounded_vec<T>(count: usize, remaining: usize) -> Vec<T> {
    Vec::with_capacity(count.min(remaining / std::mem::size_of::<T>().max(1)))
}

/// A bounded, forward-only view over a package of little endian data.
///
/// A package is the unit of framing in profile and world files: primitives
/// are laid out back to back and a nested package is an `i32` length
/// followed by that many bytes. A nested [Package] borrows exactly that
/// byte range, so reads within it can never observe data past its end even
/// when the parent holds more.
///
/// ```
/// use vhsave::{Package, ErrorKind};
///
/// // nested package of 4 bytes followed by a trailing byte in the parent
/// let data = [4, 0, 0, 0, 7, 0, 0, 0, 0xff];
/// let mut outer = Package::new(&data);
/// let mut inner = outer.read_package()?;
/// assert_eq!(inner.read_i32()?, 7);
/// assert!(matches!(inner.read_u8().unwrap_err().kind(), ErrorKind::Eof { .. }));
/// assert_eq!(outer.read_u8()?, 0xff);
/// # Ok::<(), vhsave::Error>(())
/// ```
///
/// Every read either succeeds and advances, or fails and leaves the
/// position untouched.
#[derive(Debug, Clone)]
pub struct Package<'a> {
    data: &'a [u8],
    original_length: usize,

    // absolute offset of this view within the top level buffer
    base: usize,
}

impl<'a> Package<'a> {
    /// Creates a package over an entire buffer
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Package::with_base(data, 0)
    }

    #[inline]
    fn with_base(data: &'a [u8], base: usize) -> Self {
        Package {
            data,
            original_length: data.len(),
            base,
        }
    }

    /// The unread bytes of this view
    #[inline]
    pub fn remainder(&self) -> &'a [u8] {
        self.data
    }

    /// Number of unread bytes of this view
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    /// Returns true if every byte of this view has been read
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of bytes consumed from this view
    #[inline]
    pub fn position(&self) -> usize {
        self.original_length - self.data.len()
    }

    /// Absolute offset of the next read within the top level buffer
    #[inline]
    pub fn offset(&self) -> usize {
        self.base + self.position()
    }

    #[inline]
    fn eof(&self, needed: usize) -> Error {
        Error::new(ErrorKind::Eof {
            offset: self.offset(),
            needed,
            remaining: self.data.len(),
        })
    }

    #[inline]
    fn take<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let (head, rest) = get_split::<N>(self.data).ok_or_else(|| self.eof(N))?;
        self.data = rest;
        Ok(head)
    }

    /// Advance the given number of bytes and return them
    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], Error> {
        if len > self.data.len() {
            return Err(self.eof(len));
        }

        let (head, rest) = self.data.split_at(len);
        self.data = rest;
        Ok(head)
    }

    #[inline]
    pub fn read_bool(&mut self) -> Result<bool, Error> {
        self.read_u8().map(|x| x != 0)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        self.take::<1>().map(|[x]| x)
    }

    #[inline]
    pub fn read_i8(&mut self) -> Result<i8, Error> {
        self.take::<1>().map(i8::from_le_bytes)
    }

    #[inline]
    pub fn read_i32(&mut self) -> Result<i32, Error> {
        self.take::<4>().map(i32::from_le_bytes)
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32, Error> {
        self.take::<4>().map(u32::from_le_bytes)
    }

    #[inline]
    pub fn read_i64(&mut self) -> Result<i64, Error> {
        self.take::<8>().map(i64::from_le_bytes)
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64, Error> {
        self.take::<8>().map(u64::from_le_bytes)
    }

    #[inline]
    pub fn read_f32(&mut self) -> Result<f32, Error> {
        self.take::<4>().map(f32::from_le_bytes)
    }

    #[inline]
    pub fn read_f64(&mut self) -> Result<f64, Error> {
        self.take::<8>().map(f64::from_le_bytes)
    }

    #[inline]
    pub fn read_vector2i(&mut self) -> Result<Vector2i, Error> {
        let data = self.take::<8>()?;
        let (x, y) = (le_i32(&data, 0), le_i32(&data, 4));
        Ok(Vector2i { x, y })
    }

    #[inline]
    pub fn read_vector3(&mut self) -> Result<Vector3, Error> {
        let data = self.take::<12>()?;
        Ok(Vector3 {
            x: le_f32(&data, 0),
            y: le_f32(&data, 4),
            z: le_f32(&data, 8),
        })
    }

    #[inline]
    pub fn read_quaternion(&mut self) -> Result<Quaternion, Error> {
        let data = self.take::<16>()?;
        Ok(Quaternion {
            x: le_f32(&data, 0),
            y: le_f32(&data, 4),
            z: le_f32(&data, 8),
            w: le_f32(&data, 12),
        })
    }

    #[inline]
    pub fn read_zdo_id(&mut self) -> Result<ZdoId, Error> {
        let data = self.take::<12>()?;
        let mut user_id = [0u8; 8];
        user_id.copy_from_slice(&data[..8]);
        Ok(ZdoId {
            user_id: i64::from_le_bytes(user_id),
            id: u32::from_le_bytes([data[8], data[9], data[10], data[11]]),
        })
    }

    /// Read a string prefixed by its 7-bit encoded length.
    ///
    /// The bytes are preserved as is, no text encoding is assumed.
    ///
    /// ```
    /// use vhsave::Package;
    /// let mut package = Package::new(b"\x05hello");
    /// assert_eq!(package.read_string()?, "hello");
    /// # Ok::<(), vhsave::Error>(())
    /// ```
    pub fn read_string(&mut self) -> Result<RawString, Error> {
        let start = self.offset();
        let (len, width) = read_varint_len(self.data)
            .ok_or_else(|| self.eof(self.data.len() + 1))?;

        let rest = &self.data[width..];
        if len > rest.len() {
            return Err(Error::new(ErrorKind::InvalidLength {
                offset: start,
                length: len as i64,
                remaining: rest.len(),
            }));
        }

        let (text, rest) = rest.split_at(len);
        self.data = rest;
        Ok(RawString::from(text))
    }

    /// Read an `i32` length prefix and validate it against the bytes left
    #[inline]
    fn read_length(&mut self) -> Result<usize, Error> {
        self.read_count(1)
    }

    /// Read a byte array prefixed with its `i32` length without copying
    pub fn read_byte_array(&mut self) -> Result<&'a [u8], Error> {
        let len = self.read_length()?;
        let (head, rest) = self.data.split_at(len);
        self.data = rest;
        Ok(head)
    }

    /// Read a nested package: a byte array that is parsed as its own stream
    pub fn read_package(&mut self) -> Result<Package<'a>, Error> {
        let len = self.read_length()?;
        let base = self.offset();
        let (head, rest) = self.data.split_at(len);
        self.data = rest;
        Ok(Package::with_base(head, base))
    }

    /// Read an `i32` element count.
    ///
    /// Each element occupies at least `min_size` bytes, so a count that could
    /// not possibly fit in the remaining data is rejected before anything is
    /// allocated for it.
    ///
    /// ```
    /// use vhsave::{Package, ErrorKind};
    /// let mut package = Package::new(&[0xff, 0xff, 0xff, 0x7f]);
    /// let err = package.read_count(1).unwrap_err();
    /// assert!(matches!(err.kind(), ErrorKind::InvalidLength { length: 2147483647, .. }));
    /// assert_eq!(package.position(), 0);
    /// ```
    pub fn read_count(&mut self, min_size: usize) -> Result<usize, Error> {
        let start = self.offset();
        let (head, rest) = get_split::<4>(self.data).ok_or_else(|| self.eof(4))?;
        let count = i32::from_le_bytes(head);
        match usize::try_from(count) {
            Ok(x) if x.checked_mul(min_size).is_some_and(|n| n <= rest.len()) => {
                self.data = rest;
                Ok(x)
            }
            _ => Err(Error::new(ErrorKind::InvalidLength {
                offset: start,
                length: i64::from(count),
                remaining: rest.len(),
            })),
        }
    }

    /// Read a list of strings prefixed by an `i32` count
    pub fn read_string_list(&mut self) -> Result<Vec<RawString>, Error> {
        let count = self.read_count(1)?;
        let mut result = bounded_vec(count, self.remaining());
        for _ in 0..count {
            result.push(self.read_string()?);
        }
        Ok(result)
    }

    /// Read a list of `i32` prefixed by an `i32` count
    pub fn read_i32_list(&mut self) -> Result<Vec<i32>, Error> {
        let count = self.read_count(4)?;
        let mut result = bounded_vec(count, self.remaining());
        for _ in 0..count {
            result.push(self.read_i32()?);
        }
        Ok(result)
    }
}

#[inline]
fn le_i32(data: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

#[inline]
fn le_f32(data: &[u8], at: usize) -> f32 {
    f32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}
