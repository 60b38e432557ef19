pub(crate) mod ants;
pub(crate) mod coords;
pub(crate) mod lasso;
pub(crate) mod overlay;
pub(crate) mod script;
pub(crate) mod session;
pub(crate) mod tools;
