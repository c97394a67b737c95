//! Mapping between `crate::RecordType` and `hickory_proto::rr::RecordType`.
//!
//! Conversion goes through the numeric type code so that types hickory has no
//! named variant for (LOC, SPF) still round-trip.

use crate::types::RecordType;
use hickory_proto::rr::RecordType as HickoryRecordType;

/// Bidirectional mapper between probe and hickory record types
pub struct RecordTypeMapper;

impl RecordTypeMapper {
    /// Convert a probe type into the hickory type used when building queries.
    pub fn to_hickory(record_type: RecordType) -> HickoryRecordType {
        HickoryRecordType::from(record_type.code())
    }

    /// Convert a hickory type back into a probe type.
    ///
    /// Returns `None` for types that are not used as probes.
    pub fn from_hickory(hickory_type: HickoryRecordType) -> Option<RecordType> {
        let code = u16::from(hickory_type);
        RecordType::ALL.iter().copied().find(|t| t.code() == code)
    }
}
