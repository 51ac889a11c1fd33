//! Test selection wire format.
//!
//! A selection travels as a five digit, zero padded decimal string followed by
//! CRLF. The board answers with free-form text lines and signals the end of a
//! test with a line containing `Test <N> done`, where `<N>` is the integer
//! value of the code (leading zeros are not echoed).

use std::fmt;

/// Width of a transmitted test code.
pub const CODE_WIDTH: usize = 5;

/// Menu shown by the session shell.
pub const START_MENU: &str = "\
choose and enter option:
1 - change COM Port
2 - change Baud rate
3 - start test
4 - EXIT
Selection: ";

/// Menu shown by the test shell.
pub const TEST_MENU: &str = "\
choose and enter Test ID

0\t    - back to start menu

1\t    - LED Test

2x\t    - set motor function x {0...7}

3xxxx\t- set motor rpm xxxx {0000...3000}

4\t    - Endswitch Test

5\t    - Motor Test
511\t    - OUT1: start rpm measurement
512\t    - OUT1: get rpm value
52\t    - OUT2: get motor error
53\t    - OUT3: get motor direction

6\t    - Button Test

7\t    - FRAM Test
Selection: ";

/// A test code as entered by the operator.
///
/// The code is not validated against the firmware's known tests; the board
/// itself answers `no valid test ID!` for codes it does not understand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSelection {
    padded: String,
}

impl TestSelection {
    /// The zero padded five character form.
    pub fn padded(&self) -> &str {
        &self.padded
    }

    /// Integer value of the code.
    pub fn value(&self) -> u32 {
        // Five ASCII digits always fit.
        self.padded.parse().unwrap_or_default()
    }

    /// Bytes put on the wire.
    pub fn frame(&self) -> Vec<u8> {
        format!("{}\r\n", self.padded).into_bytes()
    }

    /// Substring the board sends when this test has finished.
    ///
    /// Built from the integer value, so the padding zeros never appear in the
    /// marker.
    pub fn completion_marker(&self) -> String {
        format!("Test {} done", self.value())
    }

    /// Does `line` end the wait for this selection?
    pub fn is_completion(&self, line: &str) -> bool {
        line.contains(&self.completion_marker())
    }
}

impl fmt::Display for TestSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.padded)
    }
}

/// Outcome of parsing one line of test shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// `0` (in any padding): leave the test shell.
    Back,
    /// A code to transmit.
    Code(TestSelection),
    /// Anything else; the menu is shown again.
    Invalid,
}

/// Parse operator input for the test shell.
///
/// Surrounding whitespace is ignored. Only one to five ASCII digits are
/// accepted: the firmware reads exactly five bytes per request, so a longer
/// code would desynchronise it.
pub fn parse_selection(input: &str) -> Selection {
    let digits = input.trim();
    if digits.is_empty()
        || digits.len() > CODE_WIDTH
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return Selection::Invalid;
    }

    let selection = TestSelection {
        padded: format!("{digits:0>width$}", width = CODE_WIDTH),
    };
    if selection.value() == 0 {
        Selection::Back
    } else {
        Selection::Code(selection)
    }
}

/// Parse a plain integer menu answer (start menu choice, baud rate).
pub fn parse_number(input: &str) -> Option<u32> {
    input.trim().parse().ok()
}

/// Human readable name of the test a code addresses, when the firmware
/// dispatches it. Group headings of the menu (`1`, `4`, ...) are not tests
/// of their own and get no name.
pub fn describe(selection: &TestSelection) -> Option<&'static str> {
    let label = match selection.value() {
        11 => "LED: toggle error LED",
        121 => "LED: sail adjustment mode rolling",
        122 => "LED: sail adjustment mode trimming",
        131 => "LED: operating mode manual",
        132 => "LED: operating mode automatic",
        14 => "LED: toggle center position LED",
        20..=27 => "set motor function",
        30_000..=33_000 => "set motor rpm",
        41 => "endswitch: front",
        42 => "endswitch: back",
        511 => "OUT1: start rpm measurement",
        512 => "OUT1: get rpm value",
        52 => "OUT2: get motor error",
        53 => "OUT3: get motor direction",
        _ => return None,
    };
    Some(label)
}
