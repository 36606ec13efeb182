pub(crate) mod compile;
pub(crate) mod plan;
pub(crate) mod snapshot;
