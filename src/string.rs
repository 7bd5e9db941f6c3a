use std::borrow::Cow;
use std::fmt;

/// A string exactly as it was stored in a package.
///
/// Packages do not record a text encoding, so the bytes are kept verbatim.
/// Conversion to text only happens on request and never fails: invalid
/// UTF-8 sequences are replaced.
///
/// ```
/// use vhsave::RawString;
///
/// let v1 = RawString::from("Base");
/// assert_eq!(v1.to_utf8(), "Base");
/// assert_eq!(v1, "Base");
///
/// let v2 = RawString::from(&[0x42, 0xff][..]);
/// assert_eq!(v2.as_bytes(), &[0x42, 0xff]);
/// assert_eq!(v2.to_utf8(), "B\u{fffd}");
/// ```
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawString {
    data: Vec<u8>,
}

impl RawString {
    /// Create a string that takes ownership of the given bytes
    pub fn new(data: Vec<u8>) -> RawString {
        RawString { data }
    }

    /// View the underlying bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the string and return the underlying bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Number of bytes in the string
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Interpret the bytes as UTF-8. Will allocate if the data is not valid UTF-8.
    pub fn to_utf8(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }
}

impl From<&[u8]> for RawString {
    fn from(data: &[u8]) -> Self {
        RawString::new(data.to_vec())
    }
}

impl From<Vec<u8>> for RawString {
    fn from(data: Vec<u8>) -> Self {
        RawString::new(data)
    }
}

impl From<&str> for RawString {
    fn from(data: &str) -> Self {
        RawString::new(data.as_bytes().to_vec())
    }
}

impl From<String> for RawString {
    fn from(data: String) -> Self {
        RawString::new(data.into_bytes())
    }
}

impl PartialEq<str> for RawString {
    fn eq(&self, other: &str) -> bool {
        self.data == other.as_bytes()
    }
}

impl PartialEq<&str> for RawString {
    fn eq(&self, other: &&str) -> bool {
        self.data == other.as_bytes()
    }
}

impl fmt::Debug for RawString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_utf8())
    }
}

impl fmt::Display for RawString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_utf8())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RawString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_utf8())
    }
}
