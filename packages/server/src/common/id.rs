//! Typed 24-hex record ids.
//!
//! The catalog store assigns every record a 24-character hexadecimal token
//! (4-byte creation timestamp followed by 8 random bytes). `RecordId<T>`
//! wraps that token with an entity marker so different id kinds cannot be
//! mixed up at compile time.
//!
//! The fixed-length hex format doubles as the classifier input for the
//! resolver: any identifier that parses as a `RecordId` is a local id,
//! anything else is treated as a provider-assigned foreign id.
//!
//! # Example
//!
//! ```rust
//! use server_core::common::id::RecordId;
//!
//! pub struct Listing;
//! pub struct User;
//!
//! pub type ListingId = RecordId<Listing>;
//! pub type UserId = RecordId<User>;
//!
//! // These are now incompatible types:
//! let listing_id = ListingId::new();
//! let user_id = UserId::new();
//!
//! // This would be a compile error:
//! // let wrong: UserId = listing_id;
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;
use thiserror::Error;

/// Number of raw bytes in a record id (24 hex characters).
pub const RECORD_ID_BYTES: usize = 12;

/// Error returned when a string is not a well-formed record id.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid record id: expected a 24-character hex token")]
pub struct ParseRecordIdError;

/// A typed 24-hex record id.
///
/// The type parameter `T` is the entity marker this id belongs to.
#[repr(transparent)]
pub struct RecordId<T>([u8; RECORD_ID_BYTES], PhantomData<fn() -> T>);

impl<T> RecordId<T> {
    /// Creates a new record id: current unix seconds (big-endian) followed
    /// by 8 random bytes. Time-prefixed ids keep index locality without a
    /// coordination point.
    pub fn new() -> Self {
        let secs = chrono::Utc::now().timestamp() as u32;
        let mut bytes = [0u8; RECORD_ID_BYTES];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..].copy_from_slice(&rand::random::<[u8; 8]>());
        Self(bytes, PhantomData)
    }

    /// Creates a `RecordId` from raw bytes.
    #[inline]
    pub fn from_bytes(bytes: [u8; RECORD_ID_BYTES]) -> Self {
        Self(bytes, PhantomData)
    }

    /// Parses an id from its 24-hex string form.
    ///
    /// This is the primary way to convert route-path string inputs to typed
    /// ids.
    pub fn parse(s: &str) -> Result<Self, ParseRecordIdError> {
        if !Self::is_valid(s) {
            return Err(ParseRecordIdError);
        }
        let raw = hex::decode(s).map_err(|_| ParseRecordIdError)?;
        let mut bytes = [0u8; RECORD_ID_BYTES];
        bytes.copy_from_slice(&raw);
        Ok(Self(bytes, PhantomData))
    }

    /// Returns `true` if `s` has the local-id format: exactly 24 hex
    /// characters.
    pub fn is_valid(s: &str) -> bool {
        s.len() == RECORD_ID_BYTES * 2 && s.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Returns the raw bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; RECORD_ID_BYTES] {
        &self.0
    }
}

impl<T> Default for RecordId<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Standard trait implementations
// ============================================================================

impl<T> Clone for RecordId<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RecordId<T> {}

impl<T> Debug for RecordId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(&format!("RecordId<{}>", std::any::type_name::<T>()))
            .field(&hex::encode(self.0))
            .finish()
    }
}

impl<T> Display for RecordId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl<T> PartialEq for RecordId<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for RecordId<T> {}

impl<T> PartialOrd for RecordId<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for RecordId<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> Hash for RecordId<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> FromStr for RecordId<T> {
    type Err = ParseRecordIdError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ============================================================================
// Serde support (string form)
// ============================================================================

impl<T> Serialize for RecordId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de, T> Deserialize<'de> for RecordId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// sqlx support (TEXT columns)
// ============================================================================

use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef, Postgres};
use sqlx::{Decode, Encode, Type};

impl<T> Type<Postgres> for RecordId<T> {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<Postgres>>::compatible(ty)
    }
}

impl<T> Encode<'_, Postgres> for RecordId<T> {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <String as Encode<Postgres>>::encode_by_ref(&self.to_string(), buf)
    }
}

impl<T> Decode<'_, Postgres> for RecordId<T> {
    fn decode(value: PgValueRef<'_>) -> Result<Self, BoxDynError> {
        let s = <&str as Decode<Postgres>>::decode(value)?;
        Ok(Self::parse(s)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
