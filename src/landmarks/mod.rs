pub(crate) mod detector;
pub(crate) mod set;
pub(crate) mod synthetic;
