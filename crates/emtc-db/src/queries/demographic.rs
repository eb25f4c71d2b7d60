//! DPR table mapping.

use rusqlite::types::Value;
use rusqlite::Row;

use emtc_types::Demographic;

use super::records::{decode_items, encode_items, int, text, Table};
use crate::Result;

impl Table for Demographic {
    const TABLE: &'static str = "dpr";
    const COLUMNS: &'static [&'static str] = &[
        "name_and_address",
        "district",
        "state",
        "family_size",
        "income_group",
        "centre_code",
        "return_no",
        "month_and_year",
        "household_members",
        "latitude",
        "longitude",
    ];

    fn to_values(&self) -> Result<Vec<Value>> {
        Ok(vec![
            text(&self.name_and_address),
            text(&self.district),
            text(&self.state),
            int(self.family_size),
            text(&self.income_group),
            text(&self.centre_code),
            text(&self.return_no),
            text(&self.month_and_year),
            encode_items(&self.household_members)?,
            Value::Real(self.latitude),
            Value::Real(self.longitude),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Demographic {
            name_and_address: row.get("name_and_address")?,
            district: row.get("district")?,
            state: row.get("state")?,
            family_size: row.get("family_size")?,
            income_group: row.get("income_group")?,
            centre_code: row.get("centre_code")?,
            return_no: row.get("return_no")?,
            month_and_year: row.get("month_and_year")?,
            household_members: decode_items(row, "household_members")?,
            latitude: row.get("latitude")?,
            longitude: row.get("longitude")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::demographic;
    use crate::queries::records;

    #[test]
    fn test_columns_match_values() {
        let values = demographic(1).to_values().expect("values");
        assert_eq!(values.len(), Demographic::COLUMNS.len());
    }

    #[test]
    fn test_members_stored_as_json_array() {
        let mut conn = crate::open_memory().expect("open");
        let created = records::create(&mut conn, &demographic(2), 0).expect("create");

        let raw: String = conn
            .query_row(
                "SELECT household_members FROM dpr WHERE id = ?1",
                [created.id],
                |row| row.get(0),
            )
            .expect("raw column");
        let decoded: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(decoded[0]["name"], "M0");
        assert_eq!(decoded[1]["name"], "M1");
    }

    #[test]
    fn test_corrupt_members_column_surfaces_error() {
        let mut conn = crate::open_memory().expect("open");
        let created = records::create(&mut conn, &demographic(1), 0).expect("create");
        conn.execute(
            "UPDATE dpr SET household_members = 'oops' WHERE id = ?1",
            [created.id],
        )
        .expect("corrupt");

        assert!(records::get::<Demographic>(&conn, created.id).is_err());
    }
}
