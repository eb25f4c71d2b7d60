//! Sample submissions shared by the query tests.

use emtc_types::{CentreSummary, Demographic, HouseholdMember, Purchase, PurchaseItem};

pub(crate) fn member(name: &str, age: u32) -> HouseholdMember {
    HouseholdMember {
        name: name.to_string(),
        relationship_with_head: "self".into(),
        gender: "F".into(),
        age,
        education: "College".into(),
        occupation: "Engineer".into(),
        annual_income_job: 50_000.0,
        annual_income_other: 1_250.5,
        other_income_source: "Rent".into(),
        total_income: 51_250.5,
    }
}

/// DPR with `members` household members named `M0`, `M1`, ...
pub(crate) fn demographic(members: usize) -> Demographic {
    Demographic {
        name_and_address: "123 Street".into(),
        district: "Bengaluru Urban".into(),
        state: "Karnataka".into(),
        family_size: 4,
        income_group: "Middle".into(),
        centre_code: "C001".into(),
        return_no: "R001".into(),
        month_and_year: "2024-01".into(),
        household_members: (0..members).map(|i| member(&format!("M{i}"), 30)).collect(),
        latitude: 12.97,
        longitude: 77.59,
    }
}

pub(crate) fn item(name: &str) -> PurchaseItem {
    PurchaseItem {
        item_name: name.to_string(),
        item_code: "S001".into(),
        month_of_purchase: "2024-01".into(),
        fibre_code: "F001".into(),
        sector_of_manufacture_code: "SMC".into(),
        colour_design_code: "CDC".into(),
        person_age_gender: "30M".into(),
        type_of_shop_code: "TSC".into(),
        purchase_type_code: "PTC".into(),
        dress_intended_code: "DIC".into(),
        length_in_meters: 2.5,
        price_per_meter: 120.0,
        total_amount_paid: 300.0,
        brand_mill_name: "Brand".into(),
        is_imported: false,
    }
}

/// MPR with `items` purchase lines.
pub(crate) fn purchase(items: usize) -> Purchase {
    Purchase {
        name_and_address: "123 Street".into(),
        district_state_tel: "District, State, 1234567890".into(),
        panel_centre: "Centre".into(),
        centre_code: "C001".into(),
        return_no: "R001".into(),
        family_size: 4,
        income_group: "Middle".into(),
        month_and_year: "2024-01".into(),
        occupation_of_head: "Engineer".into(),
        items: (0..items).map(|i| item(&format!("Item {i}"))).collect(),
        latitude: 12.97,
        longitude: 77.59,
    }
}

pub(crate) fn centre() -> CentreSummary {
    CentreSummary {
        centre_name: "Bengaluru".into(),
        centre_code: "BLR01".into(),
        panel_size: 40,
        mpr_collected: 35,
        not_collected: 5,
        with_purchase_data: 30,
        nil_mprs: 5,
        nil_serial_nos: 2,
        latitude: 12.97,
        longitude: 77.59,
    }
}
