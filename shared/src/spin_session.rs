use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use futures::future::{self, Either, LocalBoxFuture};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::config::SessionConfig;
use crate::customer::{ApiError, CreateCustomerRequest, CustomerApi, VerifyCustomerRequest};
use crate::error::SpinError;
use crate::validation::{PlayerForm, PlayerIdentity};
use crate::wheel_config::{Segment, WheelConfiguration};
use crate::wheel_spin::{plan_rotation, select_winner, RotationPlan};

/// Timers and detached tasks, supplied by the host.
pub trait SessionRuntime {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
    fn spawn_detached(&self, task: LocalBoxFuture<'static, ()>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinState {
    Idle,
    AwaitingVerification,
    Verifying,
    Verified,
    Spinning,
    Completed,
}

/// Everything the UI needs to animate one spin.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinTicket {
    pub winner_index: usize,
    pub segment: Segment,
    pub start_rotation: f64,
    pub plan: RotationPlan,
    pub duration: Duration,
}

impl SpinTicket {
    pub fn target_rotation(&self) -> f64 {
        self.plan.target_rotation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StateChanged(SpinState),
    SpinStarted(SpinTicket),
    SpinCompleted(Segment),
    Notice(SpinError),
}

struct Attempt {
    state: SpinState,
    identity: Option<PlayerIdentity>,
    // Identity frozen when the spin starts; used for persistence.
    captured: Option<PlayerIdentity>,
    ticket: Option<SpinTicket>,
    outcome: Option<Segment>,
}

/// One player's visit to a wheel: form, verification gate, spin, outcome.
///
/// Shared behind an `Rc` by the page. All state is interior and no borrow
/// is held across an await point.
pub struct SpinSession<A: CustomerApi, T: SessionRuntime> {
    wheel: WheelConfiguration,
    playable: Vec<Segment>,
    config: SessionConfig,
    api: Rc<A>,
    runtime: T,
    rng: RefCell<Box<dyn RngCore>>,
    spinning: Cell<bool>,
    cumulative_rotation: Cell<f64>,
    attempt: RefCell<Attempt>,
    listener: RefCell<Option<Box<dyn Fn(&SessionEvent)>>>,
}

impl<A: CustomerApi + 'static, T: SessionRuntime> SpinSession<A, T> {
    pub fn new(
        wheel: WheelConfiguration,
        api: Rc<A>,
        runtime: T,
        config: SessionConfig,
    ) -> Result<Self, SpinError> {
        let playable = wheel.playable_segments();
        if playable.is_empty() {
            return Err(SpinError::Configuration(format!(
                "wheel {} has no playable segments",
                wheel.wheel_id
            )));
        }
        let config = config.sanitized();

        Ok(Self {
            cumulative_rotation: Cell::new(config.initial_rotation),
            wheel,
            playable,
            config,
            api,
            runtime,
            rng: RefCell::new(Box::new(StdRng::from_entropy())),
            spinning: Cell::new(false),
            attempt: RefCell::new(Attempt {
                state: SpinState::Idle,
                identity: None,
                captured: None,
                ticket: None,
                outcome: None,
            }),
            listener: RefCell::new(None),
        })
    }

    pub fn with_rng<R: RngCore + 'static>(self, rng: R) -> Self {
        *self.rng.borrow_mut() = Box::new(rng);
        self
    }

    pub fn set_listener<F: Fn(&SessionEvent) + 'static>(&self, listener: F) {
        *self.listener.borrow_mut() = Some(Box::new(listener));
    }

    pub fn playable_segments(&self) -> &[Segment] {
        &self.playable
    }

    pub fn state(&self) -> SpinState {
        self.attempt.borrow().state
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning.get()
    }

    pub fn cumulative_rotation(&self) -> f64 {
        self.cumulative_rotation.get()
    }

    pub fn identity(&self) -> Option<PlayerIdentity> {
        self.attempt.borrow().identity.clone()
    }

    pub fn outcome(&self) -> Option<Segment> {
        self.attempt.borrow().outcome.clone()
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(listener) = self.listener.borrow().as_ref() {
            listener(&event);
        }
    }

    fn transition(&self, state: SpinState) {
        self.attempt.borrow_mut().state = state;
        self.emit(SessionEvent::StateChanged(state));
    }

    fn reject(&self, err: SpinError) -> SpinError {
        self.emit(SessionEvent::Notice(err.clone()));
        err
    }

    /// Checks the play form and stores the identity awaiting verification.
    pub fn submit_identity(&self, form: &PlayerForm) -> Result<(), SpinError> {
        let state = self.state();
        match state {
            SpinState::Idle | SpinState::AwaitingVerification | SpinState::Verified => {}
            SpinState::Verifying => return Err(self.reject(SpinError::VerificationPending)),
            SpinState::Spinning => return Err(self.reject(SpinError::SpinInProgress)),
            SpinState::Completed => return Err(self.reject(SpinError::AlreadyPlayed)),
        }

        let identity = match form.to_identity() {
            Ok(identity) => identity,
            Err(err) => {
                // A rejected form must not leave an older identity queued for verification.
                self.attempt.borrow_mut().identity = None;
                if state != SpinState::Idle {
                    self.transition(SpinState::Idle);
                }
                return Err(self.reject(err));
            }
        };

        let unchanged = {
            let mut attempt = self.attempt.borrow_mut();
            let unchanged = attempt.identity.as_ref() == Some(&identity);
            attempt.identity = Some(identity);
            unchanged
        };

        // A verified identity stays verified only if nothing changed.
        if !(state == SpinState::Verified && unchanged) {
            self.transition(SpinState::AwaitingVerification);
        }
        Ok(())
    }

    /// Runs the server-side uniqueness check for the submitted identity.
    pub async fn verify(&self) -> Result<(), SpinError> {
        let request = {
            let attempt = self.attempt.borrow();
            match attempt.state {
                SpinState::AwaitingVerification => {}
                SpinState::Verified => return Ok(()),
                SpinState::Idle => return Err(self.reject(SpinError::NotVerified)),
                SpinState::Verifying => return Err(self.reject(SpinError::VerificationPending)),
                SpinState::Spinning => return Err(self.reject(SpinError::SpinInProgress)),
                SpinState::Completed => return Err(self.reject(SpinError::AlreadyPlayed)),
            }
            match attempt.identity.as_ref() {
                Some(identity) => VerifyCustomerRequest::new(identity, &self.wheel.wheel_id),
                None => return Err(self.reject(SpinError::NotVerified)),
            }
        };

        self.transition(SpinState::Verifying);

        let call = self.api.verify_customer(request);
        let result = match self.config.verify_timeout {
            Some(timeout) => match future::select(call, self.runtime.sleep(timeout)).await {
                Either::Left((result, _)) => result,
                Either::Right(_) => Err(ApiError::Timeout),
            },
            None => call.await,
        };

        let result = match result {
            Ok(response) if response.verified => Ok(()),
            Ok(_) => Err(SpinError::Transport("verification was not confirmed".to_string())),
            Err(err) => Err(SpinError::from(err)),
        };

        match result {
            Ok(()) => {
                log::info!("Player verified for wheel {}", self.wheel.wheel_id);
                self.transition(SpinState::Verified);
                Ok(())
            }
            Err(err) => {
                log::warn!("Verification failed for wheel {}: {}", self.wheel.wheel_id, err);
                self.transition(SpinState::AwaitingVerification);
                Err(self.reject(err))
            }
        }
    }

    /// Starts a spin synchronously and returns the ticket to animate.
    ///
    /// The in-flight flag is checked and set before anything else so a second
    /// call in the same tick is rejected.
    pub fn start_spin(&self) -> Result<SpinTicket, SpinError> {
        if self.spinning.get() {
            return Err(self.reject(SpinError::SpinInProgress));
        }
        match self.state() {
            SpinState::Verified => {}
            SpinState::Spinning => return Err(self.reject(SpinError::SpinInProgress)),
            SpinState::Completed => return Err(self.reject(SpinError::AlreadyPlayed)),
            SpinState::Verifying => return Err(self.reject(SpinError::VerificationPending)),
            SpinState::Idle | SpinState::AwaitingVerification => {
                return Err(self.reject(SpinError::NotVerified))
            }
        }
        self.spinning.set(true);

        let start_rotation = self.cumulative_rotation.get();
        let (winner_index, plan) = {
            let mut rng = self.rng.borrow_mut();
            let draw: f64 = rng.gen();
            // Non-empty by construction.
            let winner_index = select_winner(&self.playable, draw).unwrap_or(0);
            let plan = plan_rotation(
                winner_index,
                self.playable.len(),
                start_rotation,
                &self.config,
                &mut **rng,
            );
            (winner_index, plan)
        };
        self.cumulative_rotation.set(plan.target_rotation);

        let ticket = SpinTicket {
            winner_index,
            segment: self.playable[winner_index].clone(),
            start_rotation,
            plan,
            duration: self.config.spin_duration,
        };

        {
            let mut attempt = self.attempt.borrow_mut();
            attempt.captured = attempt.identity.clone();
            attempt.ticket = Some(ticket.clone());
        }

        log::info!(
            "Spin started on wheel {}: winner index {} ({} revolutions)",
            self.wheel.wheel_id,
            winner_index,
            plan.full_revolutions
        );
        self.transition(SpinState::Spinning);
        self.emit(SessionEvent::SpinStarted(ticket.clone()));
        Ok(ticket)
    }

    /// Reveals the outcome and hands persistence to a detached task.
    ///
    /// Only the first call after a spin persists; later calls return the
    /// recorded outcome.
    pub fn finish_spin(&self) -> Option<Segment> {
        let (segment, identity) = {
            let mut attempt = self.attempt.borrow_mut();
            if attempt.state != SpinState::Spinning {
                return attempt.outcome.clone();
            }
            let segment = attempt.ticket.as_ref()?.segment.clone();
            attempt.outcome = Some(segment.clone());
            (segment, attempt.captured.take())
        };
        self.spinning.set(false);

        log::info!("Wheel {} landed on {}", self.wheel.wheel_id, segment.name);
        self.transition(SpinState::Completed);
        self.emit(SessionEvent::SpinCompleted(segment.clone()));

        match identity {
            Some(identity) => self.record_outcome(&identity, &segment),
            None => log::error!("No identity captured for spin on wheel {}", self.wheel.wheel_id),
        }
        Some(segment)
    }

    /// Starts a spin, waits out the animation, then completes it.
    pub async fn spin(&self) -> Result<Segment, SpinError> {
        let ticket = self.start_spin()?;
        self.runtime.sleep(ticket.duration).await;
        Ok(self.finish_spin().unwrap_or(ticket.segment))
    }

    fn record_outcome(&self, identity: &PlayerIdentity, segment: &Segment) {
        let request = CreateCustomerRequest::new(identity, &self.wheel.wheel_id, &segment.name);
        let call = self.api.create_customer(request);
        let wheel_id = self.wheel.wheel_id.clone();
        let prize = segment.name.clone();

        self.runtime.spawn_detached(Box::pin(async move {
            match call.await {
                Ok(()) => log::info!("Recorded outcome {} for wheel {}", prize, wheel_id),
                Err(err) => log::error!(
                    "Failed to record outcome {} for wheel {}: {}",
                    prize,
                    wheel_id,
                    err
                ),
            }
        }));
    }
}
