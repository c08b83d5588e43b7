//! Shared helpers for spotfinder integration tests.

pub mod test_util;
