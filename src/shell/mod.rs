//! Interactive menus.
//!
//! `session` owns the serial link and the start menu; `test_shell` lends the
//! link for the duration of one visit to the test menu.

pub mod session;
pub mod test_shell;

pub use session::{run_session, Session, SessionState};
pub use test_shell::{run_test, run_test_shell};
