//! End-to-end tests for the test console.
//!
//! These run the menus and port discovery without real hardware, using mock
//! boards and fake device directories.

pub mod session_tests;
