//! Subcommand implementations for the `gramvec` binary.

pub(crate) mod extract;
pub(crate) mod fit;
pub(crate) mod inspect;
pub(crate) mod vectorize;
