//! Logging setup.

mod tracing;

pub(crate) use self::tracing::init_tracing;
