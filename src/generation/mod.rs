pub(crate) mod api;
pub(crate) mod request;
pub(crate) mod settings;
pub(crate) mod submitter;
