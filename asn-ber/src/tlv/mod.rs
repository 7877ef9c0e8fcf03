//! TLV records and the readers that cut them out of a byte cursor
//!
//! A reader consumes exactly one TLV from the front of a [`Bytes`] cursor.
//! Value slices share the cursor's buffer, nothing is copied while reading.

pub mod data;
pub mod extract;
pub mod reader;

pub use data::BerData;
pub use extract::BerDataExtractReader;
pub use reader::BerDataReader;

use asn_core::AsnResult;
use bytes::Bytes;

/// Reads one TLV record from the front of a cursor
///
/// On success the cursor is advanced past the returned record. A stream that
/// ends before a complete record was read fails with
/// [`AsnError::Read`](asn_core::AsnError::Read); a partial record is never
/// returned.
pub trait TlvDataReader: Send + Sync {
    fn read_next(&self, source: &mut Bytes) -> AsnResult<BerData>;
}
