use shared::SpinError;
use yew::prelude::*;

/// Banner text for the play page: at most one of `error` / `success` is set.
#[derive(Clone, PartialEq)]
pub struct NoticeState {
    pub error: String,
    pub success: String,
    pub handle_success: Callback<String>,
    pub handle_error: Callback<SpinError>,
    pub clear: Callback<()>,
}

#[hook]
pub fn use_notice_state() -> NoticeState {
    let error = use_state(String::new);
    let success = use_state(String::new);

    let handle_success = {
        let success = success.clone();
        let error = error.clone();
        Callback::from(move |msg: String| {
            success.set(msg);
            error.set(String::new());
        })
    };

    let handle_error = {
        let error = error.clone();
        let success = success.clone();
        Callback::from(move |err: SpinError| {
            error.set(err.user_message().to_string());
            success.set(String::new());
        })
    };

    let clear = {
        let error = error.clone();
        let success = success.clone();
        Callback::from(move |_| {
            error.set(String::new());
            success.set(String::new());
        })
    };

    NoticeState {
        error: (*error).clone(),
        success: (*success).clone(),
        handle_success,
        handle_error,
        clear,
    }
}
