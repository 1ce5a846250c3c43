// unicode/table.rs - Port of the data loading in normalizer2impl.cpp / udata.cpp
// Parses and validates a `UNRM` property blob into owned lookup arrays.
//
// Layout (little-endian):
//
//   header  magic "UNRM", u16 format major, u16 format minor,
//           [u8; 4] Unicode version, u32 CRC-32 of the body,
//           u32 body length, u32 stage-1 length, u32 stage-2 length,
//           u32 record count, u32 mapping length, u32 composition count,
//           u32 block shift, u32 reserved
//   body    stage-1 u16[], stage-2 u16[], records [u8; 8][],
//           mapping u32[], compositions (u32, u32, u32)[]

use std::fmt;

use crc::{Crc, CRC_32_ISO_HDLC};
use tracing::error;

use super::{hangul, DecompositionType, PropertyFlags, PropertyRecord};
use crate::utypes::*;
use crate::uversion::{UVersionInfo, U_UNICODE_VERSION};

pub const DATA_MAGIC: [u8; 4] = *b"UNRM";
pub const FORMAT_MAJOR: u16 = 1;
pub const HEADER_LEN: usize = 48;
pub const BLOCK_SHIFT: u32 = 6;

const BLOCK_SIZE: usize = 1 << BLOCK_SHIFT;
const BLOCK_MASK: UChar32 = (1 << BLOCK_SHIFT) - 1;
const STAGE1_LEN: usize = (UCHAR_MAX_VALUE as usize + 1) >> BLOCK_SHIFT;
const RECORD_LEN: usize = 8;
const COMPOSITION_LEN: usize = 12;
/// Deepest decomposition nesting accepted at load time.
const MAX_DECOMPOSITION_DEPTH: u8 = 8;

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// CRC-32 (ISO-HDLC, as used by zlib) of a blob body.
pub fn data_checksum(body: &[u8]) -> u32 {
    CRC32.checksum(body)
}

/// Why a property blob was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataError {
    /// `U_INCOMPATIBLE_DATA_VERSION`, `U_INVALID_FORMAT_ERROR` or
    /// `U_FILE_ACCESS_ERROR`.
    pub code: UErrorCode,
    pub message: String,
}

impl DataError {
    pub fn new(code: UErrorCode, message: impl Into<String>) -> Self {
        DataError {
            code,
            message: message.into(),
        }
    }

    fn format(message: impl Into<String>) -> Self {
        DataError::new(U_INVALID_FORMAT_ERROR, message)
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            crate::uerror::u_error_name(self.code),
            self.message
        )
    }
}

impl std::error::Error for DataError {}

/// Sequential little-endian reader over the blob.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Reader { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DataError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| DataError::format("unexpected end of data"))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn u8(&mut self) -> Result<u8, DataError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, DataError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, DataError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn u16_vec(&mut self, n: usize) -> Result<Vec<u16>, DataError> {
        (0..n).map(|_| self.u16()).collect()
    }

    fn u32_vec(&mut self, n: usize) -> Result<Vec<u32>, DataError> {
        (0..n).map(|_| self.u32()).collect()
    }
}

/// Parsed header fields.
#[derive(Clone, Copy, Debug)]
struct Header {
    version: UVersionInfo,
    checksum: u32,
    body_len: usize,
    stage1_len: usize,
    stage2_len: usize,
    record_count: usize,
    mapping_len: usize,
    composition_count: usize,
    block_shift: u32,
}

fn read_header(r: &mut Reader<'_>) -> Result<Header, DataError> {
    let magic = r.take(4)?;
    if magic != DATA_MAGIC {
        return Err(DataError::format("not a normalization data blob (bad magic)"));
    }
    let major = r.u16()?;
    let _minor = r.u16()?;
    if major != FORMAT_MAJOR {
        return Err(DataError::new(
            U_INCOMPATIBLE_DATA_VERSION,
            format!("data format {} is not supported (expected {})", major, FORMAT_MAJOR),
        ));
    }
    let v = r.take(4)?;
    let version = UVersionInfo::new(v[0], v[1], v[2], v[3]);
    if version.major() != U_UNICODE_VERSION.major() {
        return Err(DataError::new(
            U_INCOMPATIBLE_DATA_VERSION,
            format!(
                "data is for Unicode {}, code expects Unicode {}",
                version, U_UNICODE_VERSION
            ),
        ));
    }
    let checksum = r.u32()?;
    let body_len = r.u32()? as usize;
    let stage1_len = r.u32()? as usize;
    let stage2_len = r.u32()? as usize;
    let record_count = r.u32()? as usize;
    let mapping_len = r.u32()? as usize;
    let composition_count = r.u32()? as usize;
    let block_shift = r.u32()?;
    let _reserved = r.u32()?;
    Ok(Header {
        version,
        checksum,
        body_len,
        stage1_len,
        stage2_len,
        record_count,
        mapping_len,
        composition_count,
        block_shift,
    })
}

/// The Property Table: a two-stage trie from code point to
/// [`PropertyRecord`], the decomposition mappings and the sorted
/// canonical composition pairs.
#[derive(Clone)]
pub struct PropertyTable {
    pub(super) version: UVersionInfo,
    stage1: Vec<u16>,
    stage2: Vec<u16>,
    records: Vec<PropertyRecord>,
    pub(super) mapping: Vec<UChar32>,
    pub(super) compositions: Vec<(UChar32, UChar32, UChar32)>,
    data_len: usize,
}

impl PropertyTable {
    /// Parse and validate a property blob.
    ///
    /// Version and format mismatches fail with
    /// `U_INCOMPATIBLE_DATA_VERSION`; anything structurally wrong (bad
    /// magic, checksum, sizes or out-of-range indexes) with
    /// `U_INVALID_FORMAT_ERROR`.
    pub fn from_bytes(data: &[u8]) -> Result<PropertyTable, DataError> {
        Self::parse(data).inspect_err(|e| {
            error!(code = e.code, message = %e.message, "rejecting normalization data");
        })
    }

    fn parse(data: &[u8]) -> Result<PropertyTable, DataError> {
        if data.len() < HEADER_LEN {
            return Err(DataError::format(format!(
                "data is {} bytes, shorter than its {}-byte header",
                data.len(),
                HEADER_LEN
            )));
        }
        let mut r = Reader::new(data);
        let h = read_header(&mut r)?;
        let body = &data[HEADER_LEN..];

        if h.body_len != body.len() {
            return Err(DataError::format(format!(
                "body length {} does not match header ({})",
                body.len(),
                h.body_len
            )));
        }
        let actual = data_checksum(body);
        if actual != h.checksum {
            return Err(DataError::format(format!(
                "checksum mismatch: stored {:08x}, computed {:08x}",
                h.checksum, actual
            )));
        }
        if h.block_shift != BLOCK_SHIFT || h.stage1_len != STAGE1_LEN {
            return Err(DataError::format(format!(
                "unsupported trie shape (shift {}, {} blocks)",
                h.block_shift, h.stage1_len
            )));
        }
        if h.stage2_len % BLOCK_SIZE != 0 || h.record_count == 0 {
            return Err(DataError::format("truncated stage-2 block or empty record list"));
        }
        let expected = [
            h.stage1_len.checked_mul(2),
            h.stage2_len.checked_mul(2),
            h.record_count.checked_mul(RECORD_LEN),
            h.mapping_len.checked_mul(4),
            h.composition_count.checked_mul(COMPOSITION_LEN),
        ]
        .into_iter()
        .try_fold(0usize, |acc, part| part.and_then(|p| acc.checked_add(p)));
        if expected != Some(h.body_len) {
            return Err(DataError::format("section sizes do not add up to the body length"));
        }

        let stage1 = r.u16_vec(h.stage1_len)?;
        let stage2 = r.u16_vec(h.stage2_len)?;
        let records = (0..h.record_count)
            .map(|_| read_record(&mut r, h.mapping_len))
            .collect::<Result<Vec<_>, _>>()?;
        let mapping = r.u32_vec(h.mapping_len)?;
        let mut compositions = Vec::with_capacity(h.composition_count);
        for _ in 0..h.composition_count {
            compositions.push((r.u32()?, r.u32()?, r.u32()?));
        }

        let block_count = h.stage2_len / BLOCK_SIZE;
        if stage1.iter().any(|&b| b as usize >= block_count) {
            return Err(DataError::format("stage-1 entry points past stage 2"));
        }
        if stage2.iter().any(|&rec| rec as usize >= h.record_count) {
            return Err(DataError::format("stage-2 entry points past the record list"));
        }
        if records[0] != PropertyRecord::DEFAULT {
            return Err(DataError::format("record 0 is not the default record"));
        }
        if mapping.iter().any(|&c| c > UCHAR_MAX_VALUE) {
            return Err(DataError::format("decomposition mapping holds a non-code point"));
        }
        if compositions.windows(2).any(|w| (w[0].0, w[0].1) >= (w[1].0, w[1].1))
            || compositions
                .iter()
                .any(|&(a, b, c)| a > UCHAR_MAX_VALUE || b > UCHAR_MAX_VALUE || c > UCHAR_MAX_VALUE)
        {
            return Err(DataError::format("composition pairs are unsorted or out of range"));
        }

        let table = PropertyTable {
            version: h.version,
            stage1,
            stage2,
            records,
            mapping,
            compositions,
            data_len: data.len(),
        };
        table.check_decompositions()?;
        Ok(table)
    }

    /// Reject mappings that refer back to themselves or nest deeper than
    /// [`MAX_DECOMPOSITION_DEPTH`]; full decomposition recurses through them.
    fn check_decompositions(&self) -> Result<(), DataError> {
        let mut depth = vec![0u8; self.records.len()];
        for index in 1..self.records.len() {
            self.decomposition_depth(index, &mut depth, 0)?;
        }
        Ok(())
    }

    fn decomposition_depth(&self, index: usize, memo: &mut [u8], level: u8) -> Result<u8, DataError> {
        if memo[index] != 0 {
            return Ok(memo[index]);
        }
        if level >= MAX_DECOMPOSITION_DEPTH {
            return Err(DataError::format("decomposition mapping is cyclic or too deep"));
        }
        let rec = &self.records[index];
        let start = rec.mapping_offset as usize;
        let mut depth = 1;
        for &d in &self.mapping[start..start + rec.mapping_len as usize] {
            // Hangul syllables decompose algorithmically.
            let below = if hangul::is_hangul(d) {
                1
            } else {
                self.decomposition_depth(self.record_index(d), memo, level + 1)?
            };
            depth = depth.max(below + 1);
        }
        memo[index] = depth;
        Ok(depth)
    }

    #[inline]
    fn record_index(&self, c: UChar32) -> usize {
        if c > UCHAR_MAX_VALUE {
            return 0;
        }
        let block = self.stage1[(c >> BLOCK_SHIFT) as usize] as usize;
        self.stage2[(block << BLOCK_SHIFT) + (c & BLOCK_MASK) as usize] as usize
    }

    /// Look up the property record for `c`. Values outside the code space
    /// get the default record.
    #[inline]
    pub fn lookup(&self, c: UChar32) -> &PropertyRecord {
        &self.records[self.record_index(c)]
    }

    /// Number of distinct property records.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn composition_count(&self) -> usize {
        self.compositions.len()
    }

    /// Size of the blob this table was parsed from.
    pub fn data_len(&self) -> usize {
        self.data_len
    }
}

impl fmt::Debug for PropertyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyTable")
            .field("version", &self.version)
            .field("records", &self.records.len())
            .field("mapping", &self.mapping.len())
            .field("compositions", &self.compositions.len())
            .finish()
    }
}

fn read_record(r: &mut Reader<'_>, mapping_len: usize) -> Result<PropertyRecord, DataError> {
    let ccc = r.u8()?;
    let flags = PropertyFlags::from_bits(r.u8()?)
        .ok_or_else(|| DataError::format("record has unknown flag bits"))?;
    let dt = DecompositionType::from_u8(r.u8()?)
        .ok_or_else(|| DataError::format("record has an unknown decomposition type"))?;
    let len = r.u8()?;
    let offset = r.u16()?;
    let _reserved = r.u16()?;
    if offset as usize + len as usize > mapping_len {
        return Err(DataError::format("decomposition mapping out of range"));
    }
    if (len == 0) != (dt == DecompositionType::None) {
        return Err(DataError::format("decomposition type and mapping disagree"));
    }
    Ok(PropertyRecord {
        ccc,
        flags,
        decomposition_type: dt,
        mapping_len: len,
        mapping_offset: offset,
    })
}
