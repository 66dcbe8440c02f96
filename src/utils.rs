pub(crate) mod future;
