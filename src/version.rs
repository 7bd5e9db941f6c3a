//! Version predicates for field layout tables.
//!
//! Every record family has a table of `(field, gate)` pairs that is walked in
//! order. A field is present in the stream exactly when its gate admits the
//! version governing the record.

/// The range of versions for which a field is present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Present in every version
    Always,

    /// Present when `version >= n`
    Since(i32),

    /// Present when `version < n`
    Before(i32),

    /// Present when `lo <= version < hi`
    Between(i32, i32),

    /// Present only when `version == n`
    Exactly(i32),

    /// Present when `version < lo || version >= hi`
    Outside(i32, i32),
}

impl Gate {
    /// Returns true if the field is present in the given version
    ///
    /// ```
    /// use vhsave::Gate;
    /// assert!(Gate::Between(16, 24).admits(16));
    /// assert!(!Gate::Between(16, 24).admits(24));
    /// assert!(Gate::Outside(19, 21).admits(21));
    /// assert!(!Gate::Outside(19, 21).admits(20));
    /// ```
    #[inline]
    pub const fn admits(self, version: i32) -> bool {
        match self {
            Gate::Always => true,
            Gate::Since(n) => version >= n,
            Gate::Before(n) => version < n,
            Gate::Between(lo, hi) => lo <= version && version < hi,
            Gate::Exactly(n) => version == n,
            Gate::Outside(lo, hi) => version < lo || version >= hi,
        }
    }

    /// The versions on either side of every threshold of this gate.
    ///
    /// Useful to probe a decoder at each point where a field appears or
    /// disappears.
    ///
    /// ```
    /// use vhsave::Gate;
    /// assert_eq!(Gate::Since(17).boundaries(), vec![16, 17]);
    /// assert_eq!(Gate::Exactly(2).boundaries(), vec![1, 2, 3]);
    /// ```
    pub fn boundaries(self) -> Vec<i32> {
        match self {
            Gate::Always => Vec::new(),
            Gate::Since(n) | Gate::Before(n) => vec![n - 1, n],
            Gate::Between(lo, hi) | Gate::Outside(lo, hi) => vec![lo - 1, lo, hi - 1, hi],
            Gate::Exactly(n) => vec![n - 1, n, n + 1],
        }
    }
}
