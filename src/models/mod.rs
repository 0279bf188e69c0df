pub(crate) mod records;
pub(crate) mod refs;
pub(crate) mod types;
