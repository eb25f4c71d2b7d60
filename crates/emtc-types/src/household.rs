//! Demographic particulars return (DPR).

use serde::{Deserialize, Serialize};

use crate::record::{RecordKind, SurveyFields};
use crate::subitems::SubItemsInput;
use crate::validation::{
    check_latitude, check_len, check_longitude, check_non_negative, check_not_empty,
    check_positive, check_some, Validate, ValidationError,
};
use crate::{patch_fields, MAX_AGE, MAX_HOUSEHOLD_MEMBERS};

/// One member of the surveyed household.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct HouseholdMember {
    pub name: String,
    pub relationship_with_head: String,
    pub gender: String,
    pub age: u32,
    pub education: String,
    pub occupation: String,
    pub annual_income_job: f64,
    pub annual_income_other: f64,
    pub other_income_source: String,
    pub total_income: f64,
}

impl Validate for HouseholdMember {
    fn validate(&self) -> Result<(), ValidationError> {
        check_not_empty("household_members.name", &self.name)?;
        if self.age > MAX_AGE {
            return Err(ValidationError::OutOfRange {
                field: "household_members.age",
                detail: format!("{} exceeds {MAX_AGE}", self.age),
            });
        }
        check_non_negative("household_members.annual_income_job", self.annual_income_job)?;
        check_non_negative("household_members.annual_income_other", self.annual_income_other)?;
        check_non_negative("household_members.total_income", self.total_income)
    }
}

/// DPR field set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct Demographic {
    pub name_and_address: String,
    pub district: String,
    pub state: String,
    pub family_size: u32,
    pub income_group: String,
    pub centre_code: String,
    pub return_no: String,
    pub month_and_year: String,
    #[serde(default)]
    pub household_members: Vec<HouseholdMember>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Validate for Demographic {
    fn validate(&self) -> Result<(), ValidationError> {
        check_not_empty("centre_code", &self.centre_code)?;
        check_positive("family_size", self.family_size)?;
        check_members(&self.household_members)?;
        check_latitude(self.latitude)?;
        check_longitude(self.longitude)
    }
}

fn check_members(members: &[HouseholdMember]) -> Result<(), ValidationError> {
    check_len("household_members", members.len(), MAX_HOUSEHOLD_MEMBERS)?;
    members.validate()
}

/// DPR update body as received.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DemographicUpdate {
    pub name_and_address: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub family_size: Option<u32>,
    pub income_group: Option<String>,
    pub centre_code: Option<String>,
    pub return_no: Option<String>,
    pub month_and_year: Option<String>,
    pub household_members: Option<SubItemsInput<HouseholdMember>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Normalized DPR partial update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DemographicPatch {
    pub name_and_address: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub family_size: Option<u32>,
    pub income_group: Option<String>,
    pub centre_code: Option<String>,
    pub return_no: Option<String>,
    pub month_and_year: Option<String>,
    pub household_members: Option<Vec<HouseholdMember>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Validate for DemographicPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        check_some(self.centre_code.as_ref(), |v| check_not_empty("centre_code", v))?;
        check_some(self.family_size.as_ref(), |v| check_positive("family_size", *v))?;
        check_some(self.household_members.as_ref(), |v| check_members(v))?;
        check_some(self.latitude.as_ref(), |v| check_latitude(*v))?;
        check_some(self.longitude.as_ref(), |v| check_longitude(*v))
    }
}

impl SurveyFields for Demographic {
    const KIND: RecordKind = RecordKind::Dpr;

    type Update = DemographicUpdate;
    type Patch = DemographicPatch;

    fn normalize(update: DemographicUpdate) -> Result<DemographicPatch, ValidationError> {
        let household_members = update
            .household_members
            .map(|input| input.normalize("household_members"))
            .transpose()?;
        Ok(DemographicPatch {
            name_and_address: update.name_and_address,
            district: update.district,
            state: update.state,
            family_size: update.family_size,
            income_group: update.income_group,
            centre_code: update.centre_code,
            return_no: update.return_no,
            month_and_year: update.month_and_year,
            household_members,
            latitude: update.latitude,
            longitude: update.longitude,
        })
    }

    fn apply(&mut self, patch: DemographicPatch) {
        patch_fields!(self, patch;
            name_and_address,
            district,
            state,
            family_size,
            income_group,
            centre_code,
            return_no,
            month_and_year,
            household_members,
            latitude,
            longitude,
        );
    }

    fn label(&self) -> String {
        format!("centre {} return {}", self.centre_code, self.return_no)
    }
}
