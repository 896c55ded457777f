use core::fmt;

/// An 18-digit, time-prefixed numeric identifier.
///
/// The decimal representation is laid out as:
///
/// ```text
///  Digit Index:  18              7 6             1
///                +-----------------+-------------+
///  Field:        | timestamp (12)  | counter (6) |
///                +-----------------+-------------+
/// ```
///
/// The timestamp field holds the Unix time in hundredths of a second,
/// truncated modulo `10^12`; the counter field holds the rolling
/// increment in `[0, 999_999]`.
///
/// Ids are plain integers: ordering, equality and hashing all follow the
/// underlying `u64`. The numeric value is *not* zero-padded, so
/// timestamps below `10^11` (dates before 2001) yield fewer than 18
/// digits. Use [`DixId::to_padded_string`] when a fixed-width textual
/// form is required.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct DixId {
    id: u64,
}

impl DixId {
    /// Largest value the increment field can hold.
    pub const MAX_INCREMENT: u64 = 999_999;
    /// Number of distinct increment values (the decimal span of the
    /// trailing field).
    pub const INCREMENT_SPAN: u64 = 1_000_000;
    /// Modulus applied to the timestamp field (12 decimal digits).
    pub const TIMESTAMP_MOD: u64 = 1_000_000_000_000;

    /// Constructs an id from its two decimal fields.
    ///
    /// Both fields are reduced to their decimal width, mirroring how the
    /// id decomposes: `timestamp_fraction` modulo `10^12` and `increment`
    /// modulo `10^6`.
    #[must_use]
    pub const fn from_components(timestamp_fraction: u64, increment: u64) -> Self {
        let ts = timestamp_fraction % Self::TIMESTAMP_MOD;
        let seq = increment % Self::INCREMENT_SPAN;
        Self {
            id: ts * Self::INCREMENT_SPAN + seq,
        }
    }

    /// Returns the timestamp field: Unix hundredths of a second, modulo
    /// `10^12`.
    #[must_use]
    pub const fn timestamp_fraction(&self) -> u64 {
        self.id / Self::INCREMENT_SPAN
    }

    /// Returns the counter field in `[0, 999_999]`.
    #[must_use]
    pub const fn increment(&self) -> u64 {
        self.id % Self::INCREMENT_SPAN
    }

    /// Converts this id into its raw integer representation.
    #[must_use]
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Converts a raw integer into an id.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Renders the id zero-padded to the full 18-character width.
    ///
    /// The numeric value is unchanged; this only fixes the textual width
    /// for consumers that require it.
    #[must_use]
    pub fn to_padded_string(&self) -> String {
        format!("{:018}", self.id)
    }
}

impl fmt::Display for DixId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for DixId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DixId")
            .field("timestamp_fraction", &self.timestamp_fraction())
            .field("increment", &self.increment())
            .finish()
    }
}

impl From<DixId> for u64 {
    fn from(id: DixId) -> Self {
        id.to_raw()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DixId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_raw().serialize(s)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DixId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        u64::deserialize(d).map(Self::from_raw)
    }
}
