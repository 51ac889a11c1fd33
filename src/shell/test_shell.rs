//! Test menu: send a test code, stream the board's answer until it reports
//! completion.

use crate::console::Console;
use crate::error::AppResult;
use crate::port::SerialLink;
use crate::protocol::{self, Selection, TestSelection, TEST_MENU};

/// Prompt shown after a test has finished.
pub const LEAVE_TEST_PROMPT: &str = "Press Enter to leave test..";

/// Run the test menu until the operator enters `0` (or input ends).
///
/// Invalid input simply shows the menu again. Serial failures are returned to
/// the caller; the link stays usable for another attempt.
pub fn run_test_shell(console: &mut dyn Console, link: &mut dyn SerialLink) -> AppResult<()> {
    loop {
        console.clear();
        let Some(input) = console.read_line(TEST_MENU)? else {
            return Ok(());
        };

        let selection = match protocol::parse_selection(&input) {
            Selection::Back => return Ok(()),
            Selection::Invalid => {
                tracing::debug!(input = %input, "ignoring invalid test selection");
                continue;
            }
            Selection::Code(selection) => selection,
        };

        run_test(console, link, &selection)?;

        if console.read_line(LEAVE_TEST_PROMPT)?.is_none() {
            return Ok(());
        }
    }
}

/// Transmit one selection and echo response lines until its completion
/// marker shows up.
///
/// There is no timeout: if the board never reports completion this blocks
/// for as long as the link keeps delivering (or waiting for) data.
pub fn run_test(
    console: &mut dyn Console,
    link: &mut dyn SerialLink,
    selection: &TestSelection,
) -> AppResult<()> {
    let label = protocol::describe(selection);
    link.write_bytes(&selection.frame())?;
    tracing::info!(
        port = link.name(),
        code = %selection,
        test = label.unwrap_or("unknown"),
        "test request sent"
    );

    console.clear();
    if let Some(label) = label {
        console.print(&format!("Test {}: {label}", selection.value()));
    }
    console.print("wait for response...");

    let mut lines = 0usize;
    loop {
        let line = link.read_line()?;
        lines += 1;
        console.print(&line);
        if selection.is_completion(&line) {
            tracing::info!(code = %selection, lines, "test completed");
            return Ok(());
        }
    }
}
