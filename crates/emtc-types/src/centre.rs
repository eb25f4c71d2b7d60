//! Centre forwarding summary (FP).

use serde::{Deserialize, Serialize};

use crate::record::{RecordKind, SurveyFields};
use crate::validation::{
    check_latitude, check_longitude, check_not_empty, check_positive, check_some, Validate,
    ValidationError,
};
use crate::patch_fields;

/// FP field set. Carries no sub-documents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct CentreSummary {
    pub centre_name: String,
    pub centre_code: String,
    pub panel_size: u32,
    pub mpr_collected: u32,
    pub not_collected: u32,
    pub with_purchase_data: u32,
    pub nil_mprs: u32,
    pub nil_serial_nos: u32,
    pub latitude: f64,
    pub longitude: f64,
}

impl Validate for CentreSummary {
    fn validate(&self) -> Result<(), ValidationError> {
        check_not_empty("centre_name", &self.centre_name)?;
        check_not_empty("centre_code", &self.centre_code)?;
        check_positive("panel_size", self.panel_size)?;
        check_latitude(self.latitude)?;
        check_longitude(self.longitude)
    }
}

/// FP update body. No sub-documents, so it needs no normalization.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CentreSummaryUpdate {
    pub centre_name: Option<String>,
    pub centre_code: Option<String>,
    pub panel_size: Option<u32>,
    pub mpr_collected: Option<u32>,
    pub not_collected: Option<u32>,
    pub with_purchase_data: Option<u32>,
    pub nil_mprs: Option<u32>,
    pub nil_serial_nos: Option<u32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

pub type CentreSummaryPatch = CentreSummaryUpdate;

impl Validate for CentreSummaryPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        check_some(self.centre_name.as_ref(), |v| check_not_empty("centre_name", v))?;
        check_some(self.centre_code.as_ref(), |v| check_not_empty("centre_code", v))?;
        check_some(self.panel_size.as_ref(), |v| check_positive("panel_size", *v))?;
        check_some(self.latitude.as_ref(), |v| check_latitude(*v))?;
        check_some(self.longitude.as_ref(), |v| check_longitude(*v))
    }
}

impl SurveyFields for CentreSummary {
    const KIND: RecordKind = RecordKind::Fp;

    type Update = CentreSummaryUpdate;
    type Patch = CentreSummaryPatch;

    fn normalize(update: CentreSummaryUpdate) -> Result<CentreSummaryPatch, ValidationError> {
        Ok(update)
    }

    fn apply(&mut self, patch: CentreSummaryPatch) {
        patch_fields!(self, patch;
            centre_name,
            centre_code,
            panel_size,
            mpr_collected,
            not_collected,
            with_purchase_data,
            nil_mprs,
            nil_serial_nos,
            latitude,
            longitude,
        );
    }

    fn label(&self) -> String {
        format!("centre {} ({})", self.centre_name, self.centre_code)
    }
}
