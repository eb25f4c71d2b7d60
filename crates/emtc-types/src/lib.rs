//! # emtc-types
//!
//! Shared domain types for the eMTC submission backend: the three survey
//! record shapes, their embedded sub-documents, typed partial updates and
//! the validation applied at the API boundary before anything is persisted.

/// Copy every `Some` field of a patch onto its target.
macro_rules! patch_fields {
    ($target:expr, $patch:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = value;
            }
        )+
    };
}
pub(crate) use patch_fields;

pub mod centre;
pub mod household;
pub mod purchase;
pub mod record;
pub mod subitems;
pub mod validation;

pub use centre::{CentreSummary, CentreSummaryPatch, CentreSummaryUpdate};
pub use household::{Demographic, DemographicPatch, DemographicUpdate, HouseholdMember};
pub use purchase::{Purchase, PurchaseItem, PurchasePatch, PurchaseUpdate};
pub use record::{Record, RecordKind, SurveyFields};
pub use subitems::SubItemsInput;
pub use validation::{Validate, ValidationError};

/// Maximum household members embedded in one DPR.
pub const MAX_HOUSEHOLD_MEMBERS: usize = 8;

/// Maximum purchase line items embedded in one MPR.
pub const MAX_PURCHASE_ITEMS: usize = 10;

/// Upper bound for a household member's age.
pub const MAX_AGE: u32 = 120;

pub type CentreSummaryRecord = Record<CentreSummary>;
pub type DemographicRecord = Record<Demographic>;
pub type PurchaseRecord = Record<Purchase>;
