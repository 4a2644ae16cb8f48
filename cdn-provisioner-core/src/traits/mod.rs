//! Interfaces consumed from the calling infrastructure engine

mod resource_data;

pub use resource_data::ResourceData;
