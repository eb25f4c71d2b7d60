//! Aggregate counts for the statistics endpoint.

use rusqlite::Connection;
use serde::Serialize;

use emtc_types::{CentreSummary, Demographic, Purchase};

use super::records;
use crate::sync;
use crate::Result;

/// Totals and pending-sync counts per record kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatabaseStats {
    pub total_dpr: u64,
    pub total_mpr: u64,
    pub total_fp: u64,
    pub unsynced_dpr: u64,
    pub unsynced_mpr: u64,
    pub unsynced_fp: u64,
}

/// Collect [`DatabaseStats`].
pub fn collect(conn: &Connection) -> Result<DatabaseStats> {
    Ok(DatabaseStats {
        total_dpr: records::count::<Demographic>(conn)?,
        total_mpr: records::count::<Purchase>(conn)?,
        total_fp: records::count::<CentreSummary>(conn)?,
        unsynced_dpr: sync::count_unsynced::<Demographic>(conn)?,
        unsynced_mpr: sync::count_unsynced::<Purchase>(conn)?,
        unsynced_fp: sync::count_unsynced::<CentreSummary>(conn)?,
    })
}
