pub(crate) mod estimator;
