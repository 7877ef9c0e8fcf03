//! Drill-down reader for inspection tooling

use super::reader::read_tlv;
use super::{BerData, TlvDataReader};
use asn_core::{AsnError, AsnResult, Tag};
use bytes::Bytes;
use log::trace;

/// Descends through a path of wrapper tags and returns the innermost TLV
///
/// Records are read one after another. Whenever a record's tag equals the
/// next tag of the path, reading continues inside its value. The record
/// matching the last tag of the path is returned. Records that do not match
/// are skipped.
#[derive(Debug, Clone)]
pub struct BerDataExtractReader {
    tags: Vec<Tag>,
}

impl BerDataExtractReader {
    pub fn new(tags: Vec<Tag>) -> Self {
        Self { tags }
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

impl TlvDataReader for BerDataExtractReader {
    fn read_next(&self, source: &mut Bytes) -> AsnResult<BerData> {
        let Some((last, wrappers)) = self.tags.split_last() else {
            return read_tlv(source);
        };

        let mut depth = 0;
        let mut nested: Option<Bytes> = None;
        loop {
            let stream = match nested.as_mut() {
                Some(inner) => inner,
                None => &mut *source,
            };
            let data = read_tlv(stream)?;
            let tag = data.tag()?;

            if depth == wrappers.len() {
                if tag == *last {
                    return Ok(data);
                }
            } else if tag == wrappers[depth] {
                trace!("Descending into {}", tag);
                depth += 1;
                nested = Some(data.value_bytes());
                continue;
            }

            if nested.as_ref().is_some_and(Bytes::is_empty) {
                return Err(AsnError::Read(format!(
                    "Tag {} not found inside {}",
                    self.tags[depth],
                    wrappers[depth - 1]
                )));
            }
        }
    }
}
