use std::time::Duration;

use futures::future::LocalBoxFuture;
use shared::spin_session::SessionRuntime;
use wasm_bindgen_futures::spawn_local;

/// Browser timers and microtask spawning for the spin session.
#[derive(Clone, Copy, Default, PartialEq)]
pub struct BrowserRuntime;

impl SessionRuntime for BrowserRuntime {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(gloo_timers::future::sleep(duration))
    }

    fn spawn_detached(&self, task: LocalBoxFuture<'static, ()>) {
        spawn_local(task);
    }
}
