//! Core type definitions

mod attribute;
mod desired_record;

pub use attribute::{AttrError, AttrValue};
pub use desired_record::DesiredRecord;
