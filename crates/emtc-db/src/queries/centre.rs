//! FP table mapping.

use rusqlite::types::Value;
use rusqlite::Row;

use emtc_types::CentreSummary;

use super::records::{int, text, Table};
use crate::Result;

impl Table for CentreSummary {
    const TABLE: &'static str = "fp";
    const COLUMNS: &'static [&'static str] = &[
        "centre_name",
        "centre_code",
        "panel_size",
        "mpr_collected",
        "not_collected",
        "with_purchase_data",
        "nil_mprs",
        "nil_serial_nos",
        "latitude",
        "longitude",
    ];

    fn to_values(&self) -> Result<Vec<Value>> {
        Ok(vec![
            text(&self.centre_name),
            text(&self.centre_code),
            int(self.panel_size),
            int(self.mpr_collected),
            int(self.not_collected),
            int(self.with_purchase_data),
            int(self.nil_mprs),
            int(self.nil_serial_nos),
            Value::Real(self.latitude),
            Value::Real(self.longitude),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(CentreSummary {
            centre_name: row.get("centre_name")?,
            centre_code: row.get("centre_code")?,
            panel_size: row.get("panel_size")?,
            mpr_collected: row.get("mpr_collected")?,
            not_collected: row.get("not_collected")?,
            with_purchase_data: row.get("with_purchase_data")?,
            nil_mprs: row.get("nil_mprs")?,
            nil_serial_nos: row.get("nil_serial_nos")?,
            latitude: row.get("latitude")?,
            longitude: row.get("longitude")?,
        })
    }
}
