pub(crate) mod bars;
