use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::executor::block_on;
use futures::future::{self, LocalBoxFuture};
use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;

use shared::config::SessionConfig;
use shared::constants::EMAIL_TAKEN_ERROR;
use shared::customer::{
    ApiError, CreateCustomerRequest, CustomerApi, VerifyCustomerRequest, VerifyCustomerResponse,
};
use shared::error::ConflictField;
use shared::spin_session::SessionRuntime;
use shared::validation::PlayerForm;
use shared::wheel_spin::wedge_at_pointer;
use shared::{SessionEvent, SpinError, SpinSession, SpinState, WheelConfiguration};

const WHEEL_JSON: &str = r##"{
    "businessName": "Corner Cafe",
    "googleReviewLink": "https://g.page/r/corner-cafe",
    "mainColors": ["#f97316", "#06b6d4"],
    "lots": [
        {"name": "Free coffee", "odds": 1, "promoCode": "COFFEE"},
        {"name": "Cookie", "odds": 1},
        {"name": "10% off", "odds": 1},
        {"name": "Muffin", "odds": 1},
        {"name": "Tea", "odds": 1},
        {"name": "Sticker", "odds": 1},
        {"name": "Mug", "odds": 1},
        {"name": "Tote bag", "odds": 1}
    ]
}"##;

enum VerifyBehaviour {
    Answer(Result<VerifyCustomerResponse, ApiError>),
    Hang,
}

struct ScriptedApi {
    verify: RefCell<VerifyBehaviour>,
    verify_requests: RefCell<Vec<VerifyCustomerRequest>>,
    fail_create: bool,
    created: RefCell<Vec<CreateCustomerRequest>>,
}

impl ScriptedApi {
    fn new(verify: VerifyBehaviour, fail_create: bool) -> Rc<Self> {
        Rc::new(Self {
            verify: RefCell::new(verify),
            verify_requests: RefCell::new(Vec::new()),
            fail_create,
            created: RefCell::new(Vec::new()),
        })
    }

    fn verified() -> Rc<Self> {
        Self::new(VerifyBehaviour::Answer(Ok(VerifyCustomerResponse { verified: true })), false)
    }
}

impl CustomerApi for ScriptedApi {
    fn verify_customer(
        &self,
        request: VerifyCustomerRequest,
    ) -> LocalBoxFuture<'static, Result<VerifyCustomerResponse, ApiError>> {
        self.verify_requests.borrow_mut().push(request);
        match &*self.verify.borrow() {
            VerifyBehaviour::Answer(result) => {
                let result = result.clone();
                Box::pin(async move { result })
            }
            VerifyBehaviour::Hang => Box::pin(future::pending()),
        }
    }

    fn create_customer(&self, request: CreateCustomerRequest) -> LocalBoxFuture<'static, Result<(), ApiError>> {
        self.created.borrow_mut().push(request);
        let fail = self.fail_create;
        Box::pin(async move {
            if fail {
                Err(ApiError::Status(500))
            } else {
                Ok(())
            }
        })
    }
}

/// Resolves on the second poll, giving other futures a turn.
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

#[derive(Clone, Default)]
struct TestRuntime {
    sleeps: Rc<RefCell<Vec<Duration>>>,
    tasks: Rc<RefCell<Vec<LocalBoxFuture<'static, ()>>>>,
    spawned: Rc<Cell<usize>>,
}

impl TestRuntime {
    fn run_detached(&self) {
        let tasks: Vec<_> = self.tasks.borrow_mut().drain(..).collect();
        for task in tasks {
            block_on(task);
        }
    }
}

impl SessionRuntime for TestRuntime {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        self.sleeps.borrow_mut().push(duration);
        Box::pin(YieldOnce(false))
    }

    fn spawn_detached(&self, task: LocalBoxFuture<'static, ()>) {
        self.spawned.set(self.spawned.get() + 1);
        self.tasks.borrow_mut().push(task);
    }
}

fn player() -> PlayerForm {
    PlayerForm::new("Ada", "ada@example.com", "+1 555 0100", true)
}

fn load_session(
    api: Rc<ScriptedApi>,
    runtime: TestRuntime,
    config: SessionConfig,
) -> SpinSession<ScriptedApi, TestRuntime> {
    let wheel = WheelConfiguration::from_json("wheel-42", WHEEL_JSON).unwrap();
    SpinSession::new(wheel, api, runtime, config).unwrap()
}

#[test]
fn email_conflict_keeps_player_at_verification_gate() {
    let api = ScriptedApi::new(
        VerifyBehaviour::Answer(Err(ApiError::Rejected("Email already registered".to_string()))),
        false,
    );
    let runtime = TestRuntime::default();
    let session = load_session(api.clone(), runtime.clone(), SessionConfig::default());

    let notices = Rc::new(RefCell::new(Vec::new()));
    {
        let notices = notices.clone();
        session.set_listener(move |event| {
            if let SessionEvent::Notice(err) = event {
                notices.borrow_mut().push(err.user_message());
            }
        });
    }

    session.submit_identity(&player()).unwrap();
    let err = block_on(session.verify()).unwrap_err();

    assert_eq!(err, SpinError::VerificationConflict(ConflictField::Email));
    assert_eq!(session.state(), SpinState::AwaitingVerification);
    assert_eq!(notices.borrow().as_slice(), &[EMAIL_TAKEN_ERROR]);

    assert_eq!(session.start_spin(), Err(SpinError::NotVerified));
    assert!(runtime.sleeps.borrow().is_empty());
    assert!(api.created.borrow().is_empty());
}

#[test]
fn verification_request_carries_wheel_id() {
    let api = ScriptedApi::verified();
    let session = load_session(api.clone(), TestRuntime::default(), SessionConfig::default());
    session.submit_identity(&player()).unwrap();
    block_on(session.verify()).unwrap();

    let requests = api.verify_requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].wheel_id, "wheel-42");
    assert_eq!(requests[0].phone, "+1 555 0100");
}

#[test]
fn persistence_failure_still_completes_the_spin() {
    let api = ScriptedApi::new(VerifyBehaviour::Answer(Ok(VerifyCustomerResponse { verified: true })), true);
    let runtime = TestRuntime::default();
    let config = SessionConfig::default().with_spin_duration(Duration::from_millis(1200));
    let session = load_session(api.clone(), runtime.clone(), config);

    session.submit_identity(&player()).unwrap();
    block_on(session.verify()).unwrap();
    let prize = block_on(session.spin()).unwrap();

    runtime.run_detached();

    assert_eq!(session.state(), SpinState::Completed);
    assert_eq!(session.outcome(), Some(prize.clone()));
    assert_eq!(api.created.borrow().len(), 1);
    assert_eq!(api.created.borrow()[0].prize, prize.name);
    assert_eq!(runtime.sleeps.borrow().as_slice(), &[Duration::from_millis(1200)]);
}

#[test]
fn overlapping_spins_run_one_animation_and_one_persistence() {
    let api = ScriptedApi::verified();
    let runtime = TestRuntime::default();
    let session = load_session(api.clone(), runtime.clone(), SessionConfig::default());
    session.submit_identity(&player()).unwrap();
    block_on(session.verify()).unwrap();

    let (first, second) = block_on(future::join(session.spin(), session.spin()));

    assert!(first.is_ok());
    assert_eq!(second, Err(SpinError::SpinInProgress));
    assert_eq!(runtime.sleeps.borrow().len(), 1);
    assert_eq!(runtime.spawned.get(), 1);
    assert_eq!(api.created.borrow().len(), 1);
}

#[test]
fn stalled_verification_times_out_when_configured() {
    let api = ScriptedApi::new(VerifyBehaviour::Hang, false);
    let runtime = TestRuntime::default();
    let config = SessionConfig::default().with_verify_timeout(Duration::from_secs(8));
    let session = load_session(api, runtime.clone(), config);

    session.submit_identity(&player()).unwrap();
    let err = block_on(session.verify()).unwrap_err();

    assert!(matches!(err, SpinError::Transport(_)));
    assert!(err.is_retryable());
    assert_eq!(session.state(), SpinState::AwaitingVerification);
    assert_eq!(runtime.sleeps.borrow().as_slice(), &[Duration::from_secs(8)]);
}

#[test]
fn uniform_wheel_with_zero_draw_lands_on_first_lot() {
    let api = ScriptedApi::verified();
    let session = load_session(api, TestRuntime::default(), SessionConfig::default())
        .with_rng(StepRng::new(0, 0));
    session.submit_identity(&player()).unwrap();
    block_on(session.verify()).unwrap();

    let ticket = session.start_spin().unwrap();
    assert_eq!(ticket.winner_index, 0);
    assert_eq!(ticket.segment.name, "Free coffee");
    assert_eq!(ticket.segment.promo_code.as_deref(), Some("COFFEE"));
    assert_eq!(wedge_at_pointer(ticket.target_rotation(), 8), 0);
}

#[test]
fn rotation_accumulates_forward_across_sessions_from_a_resting_angle() {
    let api = ScriptedApi::verified();
    let config = SessionConfig::default().with_initial_rotation(1234.0);
    let session = load_session(api, TestRuntime::default(), config).with_rng(StdRng::seed_from_u64(99));
    session.submit_identity(&player()).unwrap();
    block_on(session.verify()).unwrap();

    let ticket = session.start_spin().unwrap();
    assert_eq!(ticket.start_rotation, 1234.0);
    assert!(ticket.target_rotation() >= 1234.0 + 360.0 * 5.0);
    assert_eq!(wedge_at_pointer(ticket.target_rotation(), 8), ticket.winner_index);
}
