//! Data access adapter
//!
//! Reads the leads table from the hosted table store and materializes it as
//! a `LeadsFrame`.

pub mod client;
pub mod error;
pub mod frame;
pub mod source;

pub use client::{StoreCredentials, TableStoreClient};
pub use error::StoreError;
pub use frame::{LeadRow, LeadsFrame, EXCLUDED_COLUMNS, TARGET_COLUMN};
pub use source::{LeadsSource, LoadedLeads, NO_DATA_NOTICE};
