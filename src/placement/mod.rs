pub(crate) mod adjustment;
pub(crate) mod planner;
