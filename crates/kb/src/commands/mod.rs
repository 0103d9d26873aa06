//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod nav;
pub(crate) mod serve;

pub(crate) use build::BuildArgs;
pub(crate) use nav::NavArgs;
pub(crate) use serve::ServeArgs;
