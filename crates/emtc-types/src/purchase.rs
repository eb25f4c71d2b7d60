//! Monthly purchase return (MPR).

use serde::{Deserialize, Serialize};

use crate::record::{RecordKind, SurveyFields};
use crate::subitems::SubItemsInput;
use crate::validation::{
    check_latitude, check_len, check_longitude, check_non_negative, check_not_empty,
    check_positive, check_some, Validate, ValidationError,
};
use crate::{patch_fields, MAX_PURCHASE_ITEMS};

/// One textile purchase line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct PurchaseItem {
    pub item_name: String,
    pub item_code: String,
    pub month_of_purchase: String,
    pub fibre_code: String,
    pub sector_of_manufacture_code: String,
    pub colour_design_code: String,
    pub person_age_gender: String,
    pub type_of_shop_code: String,
    pub purchase_type_code: String,
    pub dress_intended_code: String,
    pub length_in_meters: f64,
    pub price_per_meter: f64,
    pub total_amount_paid: f64,
    pub brand_mill_name: String,
    #[serde(default)]
    pub is_imported: bool,
}

impl Validate for PurchaseItem {
    fn validate(&self) -> Result<(), ValidationError> {
        check_not_empty("items.item_name", &self.item_name)?;
        check_non_negative("items.length_in_meters", self.length_in_meters)?;
        check_non_negative("items.price_per_meter", self.price_per_meter)?;
        check_non_negative("items.total_amount_paid", self.total_amount_paid)
    }
}

/// MPR field set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct Purchase {
    pub name_and_address: String,
    pub district_state_tel: String,
    pub panel_centre: String,
    pub centre_code: String,
    pub return_no: String,
    pub family_size: u32,
    pub income_group: String,
    pub month_and_year: String,
    pub occupation_of_head: String,
    #[serde(default)]
    pub items: Vec<PurchaseItem>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Validate for Purchase {
    fn validate(&self) -> Result<(), ValidationError> {
        check_not_empty("centre_code", &self.centre_code)?;
        check_positive("family_size", self.family_size)?;
        check_items(&self.items)?;
        check_latitude(self.latitude)?;
        check_longitude(self.longitude)
    }
}

fn check_items(items: &[PurchaseItem]) -> Result<(), ValidationError> {
    check_len("items", items.len(), MAX_PURCHASE_ITEMS)?;
    items.validate()
}

/// MPR update body as received.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PurchaseUpdate {
    pub name_and_address: Option<String>,
    pub district_state_tel: Option<String>,
    pub panel_centre: Option<String>,
    pub centre_code: Option<String>,
    pub return_no: Option<String>,
    pub family_size: Option<u32>,
    pub income_group: Option<String>,
    pub month_and_year: Option<String>,
    pub occupation_of_head: Option<String>,
    pub items: Option<SubItemsInput<PurchaseItem>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Normalized MPR partial update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PurchasePatch {
    pub name_and_address: Option<String>,
    pub district_state_tel: Option<String>,
    pub panel_centre: Option<String>,
    pub centre_code: Option<String>,
    pub return_no: Option<String>,
    pub family_size: Option<u32>,
    pub income_group: Option<String>,
    pub month_and_year: Option<String>,
    pub occupation_of_head: Option<String>,
    pub items: Option<Vec<PurchaseItem>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Validate for PurchasePatch {
    fn validate(&self) -> Result<(), ValidationError> {
        check_some(self.centre_code.as_ref(), |v| check_not_empty("centre_code", v))?;
        check_some(self.family_size.as_ref(), |v| check_positive("family_size", *v))?;
        check_some(self.items.as_ref(), |v| check_items(v))?;
        check_some(self.latitude.as_ref(), |v| check_latitude(*v))?;
        check_some(self.longitude.as_ref(), |v| check_longitude(*v))
    }
}

impl SurveyFields for Purchase {
    const KIND: RecordKind = RecordKind::Mpr;

    type Update = PurchaseUpdate;
    type Patch = PurchasePatch;

    fn normalize(update: PurchaseUpdate) -> Result<PurchasePatch, ValidationError> {
        let items = update
            .items
            .map(|input| input.normalize("items"))
            .transpose()?;
        Ok(PurchasePatch {
            name_and_address: update.name_and_address,
            district_state_tel: update.district_state_tel,
            panel_centre: update.panel_centre,
            centre_code: update.centre_code,
            return_no: update.return_no,
            family_size: update.family_size,
            income_group: update.income_group,
            month_and_year: update.month_and_year,
            occupation_of_head: update.occupation_of_head,
            items,
            latitude: update.latitude,
            longitude: update.longitude,
        })
    }

    fn apply(&mut self, patch: PurchasePatch) {
        patch_fields!(self, patch;
            name_and_address,
            district_state_tel,
            panel_centre,
            centre_code,
            return_no,
            family_size,
            income_group,
            month_and_year,
            occupation_of_head,
            items,
            latitude,
            longitude,
        );
    }

    fn label(&self) -> String {
        format!("centre {} return {}", self.centre_code, self.return_no)
    }
}
