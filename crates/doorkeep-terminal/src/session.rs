//! Session sequencer.
//!
//! Drives one swipe at a time through capture, normalization, lookup and
//! actuation, and sequences the display feedback. Feedback states carry a
//! dwell deadline; the event loop in [`Session::run`] waits on the input
//! source and that deadline together, so a reset or quit is never held up
//! by a dwell.

use std::future;
use std::time::Duration;

use doorkeep_core::constants::{
    DEFAULT_DENIED_DWELL_MS, DEFAULT_ERROR_DWELL_MS, DEFAULT_GRANTED_DWELL_MS, DEFAULT_WELCOME_ROW,
};
use doorkeep_core::{Credential, Error, RawCode, Result, SwipeEvent, TerminalInput, TerminalState};
use doorkeep_hardware::{Actuator, LockLink, SwipeSource};
use doorkeep_storage::{CredentialStore, Resolver};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::accumulator::Accumulator;
use crate::display::Display;
use crate::messages::DisplayMessages;
use crate::normalizer::Normalizer;
use crate::state_machine::StateMachine;

/// Feedback timing and layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub granted_dwell: Duration,
    pub denied_dwell: Duration,
    pub error_dwell: Duration,

    /// Row of the first feedback line; messages are centered.
    pub message_row: u16,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            granted_dwell: Duration::from_millis(DEFAULT_GRANTED_DWELL_MS),
            denied_dwell: Duration::from_millis(DEFAULT_DENIED_DWELL_MS),
            error_dwell: Duration::from_millis(DEFAULT_ERROR_DWELL_MS),
            message_row: DEFAULT_WELCOME_ROW + 3,
        }
    }
}

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// The door terminal: owns every component of the swipe pipeline.
pub struct Session<S, L, D>
where
    S: CredentialStore,
    L: LockLink,
    D: Display,
{
    accumulator: Accumulator,
    normalizer: Normalizer,
    resolver: Resolver<S>,
    actuator: Actuator<L>,
    display: D,
    machine: StateMachine,
    config: SessionConfig,
}

impl<S, L, D> Session<S, L, D>
where
    S: CredentialStore,
    L: LockLink,
    D: Display,
{
    pub fn new(
        normalizer: Normalizer,
        resolver: Resolver<S>,
        actuator: Actuator<L>,
        display: D,
        config: SessionConfig,
    ) -> Self {
        Self {
            accumulator: Accumulator::new(),
            normalizer,
            resolver,
            actuator,
            display,
            machine: StateMachine::new(),
            config,
        }
    }

    /// Show the welcome screen. Called once before the first input.
    pub fn start(&mut self) {
        if !self.actuator.is_connected() {
            warn!("lock link down, running in observation mode");
        }
        self.show_idle_screen();
    }

    /// Run until the operator quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the input source fails; the session cannot
    /// continue without input.
    pub async fn run<I: SwipeSource>(&mut self, source: &mut I) -> Result<()> {
        self.start();

        loop {
            let deadline = self.machine.deadline();

            let input = tokio::select! {
                input = source.read_input() => input,
                () = dwell_expiry(deadline) => {
                    self.tick();
                    continue;
                }
            };

            let input = input.map_err(|e| {
                error!(error = %e, "input source failed");
                Error::from(e)
            })?;

            if self.handle_input(input).await == Control::Quit {
                info!("operator quit");
                return Ok(());
            }
        }
    }

    /// Process one input.
    pub async fn handle_input(&mut self, input: TerminalInput) -> Control {
        match input {
            TerminalInput::Quit => Control::Quit,
            TerminalInput::Reset => {
                info!(state = %self.state(), "operator reset");
                self.return_to_idle();
                Control::Continue
            }
            TerminalInput::Swipe(event) => {
                self.on_swipe_event(event).await;
                Control::Continue
            }
        }
    }

    /// End an elapsed dwell. Returns `true` if the session went back to idle.
    pub fn tick(&mut self) -> bool {
        if !self.machine.dwell_elapsed() {
            return false;
        }

        match self.machine.transition_to(TerminalState::Idle) {
            Ok(_) => {
                self.show_idle_screen();
                true
            }
            Err(e) => {
                // A dwell is only ever armed in a feedback state.
                error!(error = %e, "dwell ended outside a feedback state");
                self.return_to_idle();
                true
            }
        }
    }

    async fn on_swipe_event(&mut self, event: SwipeEvent) {
        self.tick();

        match self.state() {
            TerminalState::Idle => {
                if event.is_terminator() {
                    debug!("terminator without code ignored");
                    return;
                }
                if self.advance(TerminalState::Capturing) {
                    self.accumulator.on_key_event(event);
                }
            }
            TerminalState::Capturing => {
                if let Some(raw) = self.accumulator.on_key_event(event) {
                    self.process_swipe(raw).await;
                }
            }
            state => {
                debug!(%state, "key discarded during feedback");
            }
        }
    }

    async fn process_swipe(&mut self, raw: RawCode) {
        if !self.advance(TerminalState::Resolving) {
            return;
        }
        info!(length = raw.char_len(), "swipe completed");

        let outcome = match self.normalizer.normalize(&raw) {
            Ok(code) => self.resolver.resolve(&code).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(credential) => self.grant(credential).await,
            Err(e) if e.is_denial() => self.deny(&e),
            Err(e) => self.fault(TerminalState::LinkError, &e),
        }
    }

    async fn grant(&mut self, credential: Credential) {
        if !self.advance(TerminalState::Granted) {
            return;
        }
        let greeting = DisplayMessages::greeting(&credential.display_name);
        self.show(&[&greeting]);

        match self.actuator.unlock().await {
            Ok(()) => {
                info!(identity_id = credential.identity_id, "access granted");
                self.machine.set_dwell(self.config.granted_dwell);
            }
            Err(e) => self.fault(TerminalState::LinkError, &e),
        }

        // Logged whether or not the link took the command.
        self.resolver.record_access(&credential).await;
    }

    fn deny(&mut self, reason: &Error) {
        if !self.advance(TerminalState::Denied) {
            return;
        }
        info!(reason = %reason, "access denied");
        self.show(&[DisplayMessages::ACCESS_DENIED]);
        self.machine.set_dwell(self.config.denied_dwell);
    }

    fn fault(&mut self, state: TerminalState, cause: &Error) {
        if !self.advance(state) {
            return;
        }
        warn!(error = %cause, "swipe not honored");
        self.show(&[
            DisplayMessages::SERVICE_UNAVAILABLE,
            DisplayMessages::SEE_ATTENDANT,
        ]);
        self.machine.set_dwell(self.config.error_dwell);
    }

    /// Transition or, if the move is illegal, log it and fall back to idle.
    fn advance(&mut self, next: TerminalState) -> bool {
        match self.machine.transition_to(next) {
            Ok(_) => true,
            Err(e) => {
                error!(error = %e, "session out of sequence, resetting");
                self.return_to_idle();
                false
            }
        }
    }

    fn return_to_idle(&mut self) {
        self.accumulator.reset();
        self.machine.reset();
        self.show_idle_screen();
    }

    fn show(&mut self, lines: &[&str]) {
        self.display.clear();
        for (offset, line) in lines.iter().enumerate() {
            let row = self.config.message_row.saturating_add(offset as u16);
            if let Err(e) = self.display.render_text(line, None, row) {
                warn!(error = %e, "display rejected message");
            }
        }
    }

    fn show_idle_screen(&mut self) {
        if let Err(e) = self.display.render_idle_screen() {
            warn!(error = %e, "display rejected idle screen");
        }
    }

    pub fn state(&self) -> TerminalState {
        *self.machine.current_state()
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn actuator(&self) -> &Actuator<L> {
        &self.actuator
    }

    pub fn resolver(&self) -> &Resolver<S> {
        &self.resolver
    }

    /// Characters of a swipe still being captured.
    pub fn pending_len(&self) -> usize {
        self.accumulator.len()
    }
}

async fn dwell_expiry(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => future::pending().await,
    }
}
