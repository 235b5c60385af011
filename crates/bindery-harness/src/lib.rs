//! In-memory reference toolkit for exercising bindings without a GUI.
//!
//! [`TestComponentFactory`] creates [`TestComponent`]s that record what the
//! binding core pushes into them. [`enter`] and [`click`] play the user.

mod component;
mod factory;

pub use component::{DisplayState, TestComponent, TestKind, click, enter};
pub use factory::TestComponentFactory;

use bindery_core::logging::{LoggingConfig, init_logging};

/// Installs captured test logging once per test binary.
pub fn init_test_logging() {
    init_logging(LoggingConfig::for_tests("bindery_core=debug"));
}
