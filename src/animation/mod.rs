pub(crate) mod ease;
pub(crate) mod task;
pub(crate) mod tween;
