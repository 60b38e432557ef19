pub(crate) mod core;
pub(crate) mod data_url;
pub(crate) mod error;
pub(crate) mod math;
