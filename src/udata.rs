// udata.rs - Port of u_init() / udata_open() from uinit.cpp and udata.cpp
// Process-wide Property Table: loaded once, shared read-only afterwards.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use tracing::{error, info};

use crate::unicode::{DataError, PropertyTable};
use crate::utypes::*;

#[cfg(feature = "builtin-data")]
static BUILTIN_DATA: &[u8] = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/unorm.bin"));

static COMMON_DATA: OnceLock<Result<Arc<PropertyTable>, DataError>> = OnceLock::new();

/// Load the built-in Property Table, once per process.
///
/// Concurrent first calls race on a single load; every caller gets the same
/// table (or the same error). Without the `builtin-data` feature this fails
/// with `U_FILE_ACCESS_ERROR` and callers must use [`u_open_data`] or
/// [`u_open_data_file`].
pub fn u_init() -> Result<Arc<PropertyTable>, DataError> {
    COMMON_DATA.get_or_init(load_common_data).clone()
}

/// C-shaped variant of [`u_init`] returning only the status.
pub fn u_init_status() -> UErrorCode {
    match u_init() {
        Ok(_) => U_ZERO_ERROR,
        Err(e) => e.code,
    }
}

#[cfg(feature = "builtin-data")]
fn load_common_data() -> Result<Arc<PropertyTable>, DataError> {
    u_open_data(BUILTIN_DATA)
}

#[cfg(not(feature = "builtin-data"))]
fn load_common_data() -> Result<Arc<PropertyTable>, DataError> {
    let err = DataError::new(
        U_FILE_ACCESS_ERROR,
        "no built-in normalization data (feature \"builtin-data\" is disabled)",
    );
    error!(code = err.code, message = %err.message, "cannot initialize");
    Err(err)
}

/// Validate and load a Property Table from an in-memory blob.
pub fn u_open_data(data: &[u8]) -> Result<Arc<PropertyTable>, DataError> {
    let table = PropertyTable::from_bytes(data)?;
    info!(
        unicode = %table.unicode_version(),
        records = table.record_count(),
        compositions = table.composition_count(),
        bytes = table.data_len(),
        "loaded normalization data"
    );
    Ok(Arc::new(table))
}

/// Read and load a Property Table from a file.
pub fn u_open_data_file<P: AsRef<Path>>(path: P) -> Result<Arc<PropertyTable>, DataError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| {
        let err = DataError::new(U_FILE_ACCESS_ERROR, format!("{}: {}", path.display(), e));
        error!(code = err.code, message = %err.message, "cannot read normalization data");
        err
    })?;
    u_open_data(&data)
}
