pub(crate) mod composer;
pub(crate) mod fade;
pub(crate) mod ranking;
pub(crate) mod sampler;
pub(crate) mod smoothing;
