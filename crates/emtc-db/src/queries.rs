//! Record query functions.
//!
//! [`records`] holds the generic operations; the per-kind modules map each
//! field set onto its table.

pub mod centre;
pub mod demographic;
pub mod purchase;
pub mod records;
pub mod stats;
