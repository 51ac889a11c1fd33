//! Start menu: port selection, baud rate and entry into the test menu.

use super::test_shell::run_test_shell;
use crate::config::SerialConfig;
use crate::console::Console;
use crate::error::{AppError, AppResult};
use crate::port::{Platform, PortEnumerator, PortOpener, SerialLink};
use crate::protocol::{self, START_MENU};

/// Where the start menu currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Showing the start menu.
    ChoosingAction,
    /// Port closed, waiting for a port the opener accepts.
    ChangingPort,
    /// Waiting for a new baud rate.
    ChangingBaud,
    /// Inside the test menu.
    RunningTest,
    /// Done; the link has been closed.
    Exited,
}

/// Enumerate, open the first port and run the start menu until exit.
///
/// Fails with `AppError::NoPortAvailable` (after telling the operator) when
/// nothing can be opened.
pub fn run_session(
    console: &mut dyn Console,
    opener: &dyn PortOpener,
    enumerator: &PortEnumerator,
    config: &SerialConfig,
) -> AppResult<()> {
    let ports = enumerator.list(opener);
    let Some(first) = ports.first() else {
        console.print(&AppError::NoPortAvailable.to_string());
        return Err(AppError::NoPortAvailable);
    };

    let link = opener
        .open(first, config.port_configuration(config.default_baud))
        .map_err(|e| AppError::port_open(first, e))?;
    tracing::info!(port = %first, baud = config.default_baud, "session started");

    Session::new(console, opener, enumerator, config, link).run()
}

/// The start menu state machine.
///
/// Holds the only open link; it is dropped before any other port is opened.
/// Failure messages are kept as a notice and printed after the next screen
/// clear, so they stay visible above the prompt that follows.
pub struct Session<'a> {
    console: &'a mut dyn Console,
    opener: &'a dyn PortOpener,
    enumerator: &'a PortEnumerator,
    config: &'a SerialConfig,
    link: Option<Box<dyn SerialLink>>,
    baud_rate: u32,
    state: SessionState,
    notice: Option<String>,
}

impl<'a> Session<'a> {
    /// Session around an already opened link.
    pub fn new(
        console: &'a mut dyn Console,
        opener: &'a dyn PortOpener,
        enumerator: &'a PortEnumerator,
        config: &'a SerialConfig,
        link: Box<dyn SerialLink>,
    ) -> Self {
        Self {
            console,
            opener,
            enumerator,
            config,
            baud_rate: link.baud_rate(),
            link: Some(link),
            state: SessionState::ChoosingAction,
            notice: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Baud rate used for the current and any reopened link.
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Drive the state machine until `Exited`.
    pub fn run(mut self) -> AppResult<()> {
        while self.state != SessionState::Exited {
            self.step()?;
        }
        Ok(())
    }

    /// Perform one transition.
    pub fn step(&mut self) -> AppResult<SessionState> {
        let next = match self.state {
            SessionState::ChoosingAction => self.choose_action()?,
            SessionState::ChangingPort => self.change_port()?,
            SessionState::ChangingBaud => self.change_baud()?,
            SessionState::RunningTest => self.run_tests()?,
            SessionState::Exited => SessionState::Exited,
        };
        if next == SessionState::Exited {
            self.close();
        }
        tracing::trace!(from = ?self.state, to = ?next, "session transition");
        self.state = next;
        Ok(next)
    }

    fn choose_action(&mut self) -> AppResult<SessionState> {
        self.console.clear();
        let status = match self.link {
            Some(ref link) => format!("{} @ {} baud (8N1)\n", link.name(), link.baud_rate()),
            None => "no port open\n".to_string(),
        };
        self.console.print(&status);
        self.show_notice();

        let Some(input) = self.console.read_line(START_MENU)? else {
            return Ok(SessionState::Exited);
        };
        let next = match protocol::parse_number(&input) {
            Some(1) => SessionState::ChangingPort,
            Some(2) => SessionState::ChangingBaud,
            Some(3) => SessionState::RunningTest,
            Some(4) => SessionState::Exited,
            _ => SessionState::ChoosingAction,
        };
        Ok(next)
    }

    fn change_port(&mut self) -> AppResult<SessionState> {
        self.close();
        self.console.clear();

        let ports = self.enumerator.list(self.opener);
        self.show_notice();
        let prompt = format!("select port [{}]: ", ports.join(", "));
        let Some(input) = self.console.read_line(&prompt)? else {
            return Ok(SessionState::Exited);
        };

        let name = self.resolve_port(input.trim());
        let config = self.config.port_configuration(self.baud_rate);
        match self.opener.open(&name, config) {
            Ok(link) => {
                tracing::info!(port = %name, baud = self.baud_rate, "switched port");
                self.link = Some(link);
                Ok(SessionState::ChoosingAction)
            }
            Err(e) => {
                tracing::warn!(port = %name, error = %e, "port not available");
                self.notice = Some("port not available".to_string());
                Ok(SessionState::ChangingPort)
            }
        }
    }

    fn change_baud(&mut self) -> AppResult<SessionState> {
        let Some(input) = self.console.read_line("enter Baud rate: ")? else {
            return Ok(SessionState::Exited);
        };
        let Some(baud_rate) = protocol::parse_number(&input).filter(|&b| b > 0) else {
            return Ok(SessionState::ChoosingAction);
        };

        if let Some(ref mut link) = self.link {
            match link.set_baud_rate(baud_rate) {
                Ok(()) => {
                    tracing::info!(port = link.name(), baud = baud_rate, "baud rate changed");
                    self.baud_rate = baud_rate;
                }
                Err(e) => {
                    tracing::warn!(port = link.name(), baud = baud_rate, error = %e, "baud rate rejected");
                    self.notice = Some(format!("could not set baud rate: {e}"));
                }
            }
        }
        Ok(SessionState::ChoosingAction)
    }

    fn run_tests(&mut self) -> AppResult<SessionState> {
        let Some(ref mut link) = self.link else {
            return Ok(SessionState::ChangingPort);
        };

        match run_test_shell(&mut *self.console, &mut **link) {
            Ok(()) => {}
            Err(AppError::Console(e)) => return Err(AppError::Console(e)),
            Err(e) => {
                tracing::error!(port = link.name(), error = %e, "test aborted");
                self.notice = Some(format!("test aborted: {e}"));
            }
        }
        Ok(SessionState::ChoosingAction)
    }

    /// Map operator input to a port name: configured alias first, then a bare
    /// number as `COM<n>` on Windows.
    fn resolve_port(&self, input: &str) -> String {
        let resolved = self.config.resolve_port(input);
        let is_number = !resolved.is_empty() && resolved.bytes().all(|b| b.is_ascii_digit());
        if is_number && self.enumerator.platform() == Platform::Windows {
            format!("COM{resolved}")
        } else {
            resolved
        }
    }

    fn show_notice(&mut self) {
        if let Some(notice) = self.notice.take() {
            self.console.print(&notice);
        }
    }

    fn close(&mut self) {
        if let Some(link) = self.link.take() {
            tracing::info!(port = link.name(), "closing port");
        }
    }
}
