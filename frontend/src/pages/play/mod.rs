mod wheel_canvas;
mod wheel_utils;

use std::rc::Rc;

use shared::config::SessionConfig;
use shared::spin_session::SessionRuntime;
use shared::validation::PlayerForm;
use shared::{SessionEvent, SpinError, SpinSession, SpinState, WheelConfiguration};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::api::HttpCustomerApi;
use crate::config::{get_api_base_url, get_asset_url};
use crate::hooks::{use_notice_state, use_wheel_config, WheelLoad};
use crate::runtime::BrowserRuntime;
use crate::styles;

use wheel_canvas::WheelCanvas;
use wheel_utils::{animate_rotation, ResultDisplay, SpinButton};

type PlaySession = SpinSession<HttpCustomerApi, BrowserRuntime>;

#[derive(Properties, PartialEq)]
pub struct PlayPageProps {
    pub wheel_id: String,
}

#[function_component(PlayPage)]
pub fn play_page(props: &PlayPageProps) -> Html {
    let load = use_wheel_config(props.wheel_id.clone());

    html! {
        <div class={styles::CONTAINER}>
            <div class="container mx-auto px-4 py-8">
                {
                    match load {
                        WheelLoad::Loading => html! {
                            <div class="flex justify-center pt-24">
                                <div class={styles::LOADING_SPINNER}></div>
                            </div>
                        },
                        WheelLoad::Failed(message) => html! {
                            <div class={classes!(styles::CARD_ERROR, "max-w-md", "mx-auto")}>{message}</div>
                        },
                        WheelLoad::Ready(wheel) => html! { <WheelGame {wheel} /> },
                    }
                }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct WheelGameProps {
    pub wheel: Rc<WheelConfiguration>,
}

fn text_input(form: &UseStateHandle<PlayerForm>, apply: fn(&mut PlayerForm, String)) -> Callback<InputEvent> {
    let form = form.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let mut next = (*form).clone();
        apply(&mut next, input.value());
        form.set(next);
    })
}

#[function_component(WheelGame)]
pub fn wheel_game(props: &WheelGameProps) -> Html {
    let session = use_memo(props.wheel.clone(), |wheel| -> Result<Rc<PlaySession>, SpinError> {
        let api = Rc::new(HttpCustomerApi::new(&get_api_base_url()));
        SpinSession::new((**wheel).clone(), api, BrowserRuntime, SessionConfig::default()).map(Rc::new)
    });

    let spin_state = use_state(|| SpinState::Idle);
    let rotation = use_state(|| 0.0_f64);
    let prize = use_state(|| None::<shared::Segment>);
    let form = use_state(PlayerForm::default);
    let notice = use_notice_state();

    // Route session events into component state
    {
        let spin_state = spin_state.clone();
        let rotation = rotation.clone();
        let prize = prize.clone();
        let handle_error = notice.handle_error.clone();
        let handle_success = notice.handle_success.clone();
        let session = session.clone();

        use_effect_with(props.wheel.clone(), move |_| {
            if let Ok(session) = &*session {
                rotation.set(session.cumulative_rotation());
                session.set_listener(move |event| match event {
                    SessionEvent::StateChanged(state) => spin_state.set(*state),
                    SessionEvent::SpinStarted(ticket) => {
                        let rotation = rotation.clone();
                        animate_rotation(
                            ticket.start_rotation,
                            ticket.target_rotation(),
                            ticket.duration.as_millis() as f64,
                            Callback::from(move |degrees: f64| rotation.set(degrees)),
                        );
                    }
                    SessionEvent::SpinCompleted(segment) => {
                        prize.set(Some(segment.clone()));
                        handle_success.emit(format!("Congratulations! You won {}", segment.name));
                    }
                    SessionEvent::Notice(err) => handle_error.emit(err.clone()),
                });
            }
            || ()
        });
    }

    let on_first_name = text_input(&form, |f, v| f.first_name = v);
    let on_email = text_input(&form, |f, v| f.email = v);
    let on_phone = text_input(&form, |f, v| f.phone = v);

    let on_consent = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            next.consent = input.checked();
            form.set(next);
        })
    };

    let on_submit = {
        let session = session.clone();
        let form = form.clone();
        let clear = notice.clear.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let session = match &*session {
                Ok(session) => session.clone(),
                Err(_) => return,
            };
            clear.emit(());

            // Validation failures are reported through the session listener.
            if session.submit_identity(&*form).is_err() {
                return;
            }
            spawn_local(async move {
                let _ = session.verify().await;
            });
        })
    };

    let on_spin = {
        let session = session.clone();
        Callback::from(move |_: MouseEvent| {
            let session = match &*session {
                Ok(session) => session.clone(),
                Err(_) => return,
            };
            // Guard is taken here, before any task is queued.
            if let Ok(ticket) = session.start_spin() {
                spawn_local(async move {
                    BrowserRuntime.sleep(ticket.duration).await;
                    session.finish_spin();
                });
            }
        })
    };

    let wheel = &props.wheel;
    let session = match &*session {
        Ok(session) => session.clone(),
        Err(err) => {
            return html! {
                <div class={classes!(styles::CARD_ERROR, "max-w-md", "mx-auto")}>{err.user_message()}</div>
            };
        }
    };

    let state = *spin_state;
    let show_form = matches!(
        state,
        SpinState::Idle | SpinState::AwaitingVerification | SpinState::Verifying
    );
    let is_verifying = state == SpinState::Verifying;

    html! {
        <div class={styles::GAME_CARD}>
            <div class="text-center mb-6 space-y-2">
                if let Some(logo) = &wheel.logo_url {
                    <img src={get_asset_url(logo)} alt={wheel.business_name.clone()} class="h-16 mx-auto object-contain" />
                }
                <h1 class={styles::TEXT_H1}>
                    <span class="bg-clip-text text-transparent bg-gradient-to-r from-yellow-400 to-orange-500">
                        {if wheel.business_name.is_empty() { "Spin to win".to_string() } else { wheel.business_name.clone() }}
                    </span>
                </h1>
                if let Some(instruction) = &wheel.instruction_text {
                    <p class={styles::TEXT_BODY}>{instruction}</p>
                }
            </div>

            <div class="relative mx-auto mb-8 flex justify-center items-center">
                <div class="w-full max-w-[450px] mx-auto">
                    <WheelCanvas
                        segments={session.playable_segments().to_vec()}
                        colors={wheel.colors.clone()}
                        rotation={*rotation}
                        is_spinning={state == SpinState::Spinning}
                    />
                </div>
            </div>

            if !notice.error.is_empty() {
                <div class={classes!(styles::CARD_ERROR, "mb-6", "text-center")}>{&notice.error}</div>
            }
            if !notice.success.is_empty() {
                <div class={classes!(styles::CARD_SUCCESS, "mb-6", "text-center")}>{&notice.success}</div>
            }

            if show_form {
                <form class={styles::FORM} onsubmit={on_submit}>
                    <div>
                        <label class={styles::TEXT_LABEL} for="first-name">{"First name"}</label>
                        <input id="first-name" type="text" class={styles::INPUT} value={form.first_name.clone()} oninput={on_first_name} disabled={is_verifying} />
                    </div>
                    <div>
                        <label class={styles::TEXT_LABEL} for="email">{"Email"}</label>
                        <input id="email" type="email" class={styles::INPUT} value={form.email.clone()} oninput={on_email} disabled={is_verifying} />
                    </div>
                    <div>
                        <label class={styles::TEXT_LABEL} for="phone">{"Phone"}</label>
                        <input id="phone" type="tel" class={styles::INPUT} value={form.phone.clone()} oninput={on_phone} disabled={is_verifying} />
                    </div>
                    <label class="flex items-center space-x-2">
                        <input type="checkbox" class={styles::CHECKBOX} checked={form.consent} onchange={on_consent} disabled={is_verifying} />
                        <span class={styles::TEXT_SMALL}>{"I agree to be contacted about offers from this business"}</span>
                    </label>
                    <button type="submit" class={styles::BUTTON_SUBMIT} disabled={is_verifying}>
                        {if is_verifying { "Checking your details..." } else { "Continue" }}
                    </button>
                </form>
            }

            if matches!(state, SpinState::Verified | SpinState::Spinning) {
                <div class="flex justify-center mt-4">
                    <div class="w-full max-w-[300px]">
                        <SpinButton
                            is_spinning={state == SpinState::Spinning}
                            disabled={state != SpinState::Verified}
                            onclick={on_spin}
                        />
                    </div>
                </div>
            }

            <ResultDisplay prize={(*prize).clone()} review_link={wheel.review_link.clone()} />

            if let Some(link) = &wheel.social_media_link {
                <div class="mt-6 text-center">
                    <a href={link.clone()} target="_blank" rel="noopener noreferrer" class={styles::LINK}>
                        {"Follow us"}
                    </a>
                </div>
            }
        </div>
    }
}
