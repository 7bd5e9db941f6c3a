use std::fmt;

/// An error that can occur when decoding a package
///
/// Besides the [kind](Error::kind) of failure, an error carries the chain of
/// fields and sections that were being decoded when it occurred, so that the
/// message reads like `object #42: owner revision: unexpected end of data`.
#[derive(Debug)]
pub struct Error(Box<ErrorInner>);

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,

    // innermost label first
    context: Vec<String>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(ErrorInner {
            kind,
            context: Vec::new(),
        }))
    }

    /// Return the specific type of error
    pub fn kind(&self) -> &ErrorKind {
        &self.0.kind
    }

    /// Returns the absolute byte offset that the error occurs (if available)
    pub fn offset(&self) -> Option<usize> {
        self.0.kind.offset()
    }

    /// Labels of the fields and sections being decoded, outermost first
    ///
    /// ```
    /// use vhsave::{Package, ResultExt};
    ///
    /// let err = Package::new(&[])
    ///     .read_i32()
    ///     .context("owner revision")
    ///     .context("object #0")
    ///     .unwrap_err();
    /// assert_eq!(err.context(), vec!["object #0", "owner revision"]);
    /// ```
    pub fn context(&self) -> Vec<&str> {
        self.0.context.iter().rev().map(|x| x.as_str()).collect()
    }

    /// Wrap the error with the name of the enclosing field or section
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Error {
        self.0.context.push(label.into());
        self
    }
}

/// Specific type of error
#[derive(Debug)]
pub enum ErrorKind {
    /// A read needed more bytes than remain in the current (possibly nested) view
    Eof {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A declared length prefix or element count is negative or exceeds the
    /// bytes remaining in the current view
    InvalidLength {
        offset: usize,
        length: i64,
        remaining: usize,
    },

    /// A list decode was asked to materialize into a shape it does not know.
    ///
    /// Reserved: the decoders in this crate read every list with a typed
    /// reader and never produce it.
    UnsupportedShape(&'static str),

    /// The input could not be loaded
    Io(std::io::Error),
}

impl ErrorKind {
    pub fn offset(&self) -> Option<usize> {
        match *self {
            ErrorKind::Eof { offset, .. } => Some(offset),
            ErrorKind::InvalidLength { offset, .. } => Some(offset),
            _ => None,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.0.kind {
            ErrorKind::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for label in self.0.context.iter().rev() {
            write!(f, "{}: ", label)?;
        }

        match self.0.kind {
            ErrorKind::Eof {
                offset,
                needed,
                remaining,
            } => write!(
                f,
                "unexpected end of data at offset {} (needed {} bytes, {} remaining)",
                offset, needed, remaining
            ),
            ErrorKind::InvalidLength {
                offset,
                length,
                remaining,
            } => write!(
                f,
                "invalid length {} at offset {} ({} bytes remaining)",
                length, offset, remaining
            ),
            ErrorKind::UnsupportedShape(shape) => {
                write!(f, "cannot decode a list into {}", shape)
            }
            ErrorKind::Io(ref err) => write!(f, "unable to read input: {}", err),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::new(ErrorKind::Io(error))
    }
}

/// Attach the name of the field or section being decoded to a failure
pub trait ResultExt<T> {
    /// Label the error with a static field name
    fn context(self, label: &'static str) -> Result<T, Error>;

    /// Label the error with a lazily formatted name, eg: `object #42`
    fn with_context<F, S>(self, f: F) -> Result<T, Error>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ResultExt<T> for Result<T, Error> {
    #[inline]
    fn context(self, label: &'static str) -> Result<T, Error> {
        self.map_err(|e| e.with_label(label))
    }

    #[inline]
    fn with_context<F, S>(self, f: F) -> Result<T, Error>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.with_label(f()))
    }
}
