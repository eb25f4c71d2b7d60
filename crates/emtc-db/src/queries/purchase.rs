//! MPR table mapping.

use rusqlite::types::Value;
use rusqlite::Row;

use emtc_types::Purchase;

use super::records::{decode_items, encode_items, int, text, Table};
use crate::Result;

impl Table for Purchase {
    const TABLE: &'static str = "mpr";
    const COLUMNS: &'static [&'static str] = &[
        "name_and_address",
        "district_state_tel",
        "panel_centre",
        "centre_code",
        "return_no",
        "family_size",
        "income_group",
        "month_and_year",
        "occupation_of_head",
        "items",
        "latitude",
        "longitude",
    ];

    fn to_values(&self) -> Result<Vec<Value>> {
        Ok(vec![
            text(&self.name_and_address),
            text(&self.district_state_tel),
            text(&self.panel_centre),
            text(&self.centre_code),
            text(&self.return_no),
            int(self.family_size),
            text(&self.income_group),
            text(&self.month_and_year),
            text(&self.occupation_of_head),
            encode_items(&self.items)?,
            Value::Real(self.latitude),
            Value::Real(self.longitude),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Purchase {
            name_and_address: row.get("name_and_address")?,
            district_state_tel: row.get("district_state_tel")?,
            panel_centre: row.get("panel_centre")?,
            centre_code: row.get("centre_code")?,
            return_no: row.get("return_no")?,
            family_size: row.get("family_size")?,
            income_group: row.get("income_group")?,
            month_and_year: row.get("month_and_year")?,
            occupation_of_head: row.get("occupation_of_head")?,
            items: decode_items(row, "items")?,
            latitude: row.get("latitude")?,
            longitude: row.get("longitude")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::purchase;
    use crate::queries::records;

    #[test]
    fn test_columns_match_values() {
        let values = purchase(2).to_values().expect("values");
        assert_eq!(values.len(), Purchase::COLUMNS.len());
    }

    #[test]
    fn test_ten_items_round_trip() {
        let mut conn = crate::open_memory().expect("open");
        let fields = purchase(10);
        let created = records::create(&mut conn, &fields, 0).expect("create");

        let fetched = records::get::<Purchase>(&conn, created.id).expect("get");
        assert_eq!(fetched.fields.items, fields.items);
        assert_eq!(fetched.fields.items[9].item_name, "Item 9");
    }
}
