pub(crate) mod controller;
pub(crate) mod input;
pub(crate) mod profile;
pub(crate) mod timing;
