pub(crate) mod interp;
pub(crate) mod normalize;
pub(crate) mod window;
