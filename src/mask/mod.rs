pub(crate) mod classify;
pub(crate) mod synth;
pub(crate) mod validate;
