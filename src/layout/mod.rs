pub(crate) mod builder;
pub(crate) mod output;
pub(crate) mod selection;
