//! Timestamps as INTEGER milliseconds since the Unix epoch

use super::integer::LongConverter;
use asn_core::{AsnConverter, AsnError, AsnResult, hex};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, Default)]
pub struct DateConverter;

impl AsnConverter<DateTime<Utc>> for DateConverter {
    fn decode(&self, data: &[u8]) -> AsnResult<DateTime<Utc>> {
        let millis = LongConverter.decode(data)?;
        DateTime::from_timestamp_millis(millis).ok_or_else(|| {
            AsnError::Convert(format!("{} is out of the date range", hex::encode(data)))
        })
    }

    fn encode(&self, value: &DateTime<Utc>) -> AsnResult<Vec<u8>> {
        LongConverter.encode(&value.timestamp_millis())
    }
}
