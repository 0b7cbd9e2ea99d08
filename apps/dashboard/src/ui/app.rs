//! App shell: owns the controller and both ends of the backend queues, and
//! pumps backend events back into the controller.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::UiEvent, orchestration::dispatch_backend_command, reducer::ContactsDashboard,
    },
};

pub struct DashboardApp {
    pub state: ContactsDashboard,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    in_flight: usize,
    status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpOutcome {
    Idle,
    TimedOut,
    BackendGone,
}

impl DashboardApp {
    pub fn new(
        state: ContactsDashboard,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    ) -> Self {
        Self {
            state,
            cmd_tx,
            ui_rx,
            in_flight: 0,
            status: None,
        }
    }

    pub fn dispatch(&mut self, cmds: Vec<BackendCommand>) {
        for cmd in cmds {
            if dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status) {
                self.in_flight += 1;
            }
        }
    }

    /// Applies one user action: runs it against the controller, then queues
    /// whatever it returned plus any refresh its input changes require.
    pub fn act(&mut self, action: impl FnOnce(&mut ContactsDashboard) -> Vec<BackendCommand>) {
        let mut cmds = action(&mut self.state);
        cmds.extend(self.state.sync());
        self.dispatch(cmds);
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Applies backend events until no dispatched command is outstanding.
    pub fn run_until_idle(&mut self, timeout: Duration) -> PumpOutcome {
        let deadline = Instant::now() + timeout;
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return PumpOutcome::TimedOut;
            }
            match self.ui_rx.recv_timeout(remaining) {
                Ok(event) => {
                    if event.completes_command() {
                        self.in_flight -= 1;
                    }
                    let follow_up = self.state.apply(event);
                    self.dispatch(follow_up);
                }
                Err(RecvTimeoutError::Timeout) => return PumpOutcome::TimedOut,
                Err(RecvTimeoutError::Disconnected) => {
                    self.status = Some("Backend worker stopped".to_string());
                    return PumpOutcome::BackendGone;
                }
            }
        }
        PumpOutcome::Idle
    }
}
