use std::cell::RefCell;
use std::rc::Rc;

use shared::Segment;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::window;
use yew::prelude::*;

use crate::styles;

// Easing function for smooth deceleration
pub fn ease_out_cubic(t: f64) -> f64 {
    // Modified ease-out: 1 - (1-t)^4
    1.0 - (1.0 - t).powi(4)
}

/// Drives `on_frame` from `start` to `end` degrees over `duration_ms`.
pub fn animate_rotation(start: f64, end: f64, duration_ms: f64, on_frame: Callback<f64>) {
    let window = match window() {
        Some(window) if duration_ms > 0.0 => window,
        _ => {
            on_frame.emit(end);
            return;
        }
    };

    let started_at = js_sys::Date::now();
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let elapsed = js_sys::Date::now() - started_at;
        let progress = (elapsed / duration_ms).min(1.0);

        if progress < 1.0 {
            on_frame.emit(start + (end - start) * ease_out_cubic(progress));
            if let (Some(window), Some(callback)) = (web_sys::window(), f.borrow().as_ref()) {
                let _ = window.request_animation_frame(callback.as_ref().unchecked_ref());
            }
        } else {
            on_frame.emit(end);
        }
    }) as Box<dyn FnMut()>));

    if let Some(callback) = g.borrow().as_ref() {
        let _ = window.request_animation_frame(callback.as_ref().unchecked_ref());
    };
}

// Spin button component
#[derive(Properties, PartialEq)]
pub struct SpinButtonProps {
    pub is_spinning: bool,
    pub disabled: bool,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(SpinButton)]
pub fn spin_button(props: &SpinButtonProps) -> Html {
    let is_disabled = props.disabled || props.is_spinning;
    let button_text = if props.is_spinning { "Spinning..." } else { "Spin the wheel" };

    let button_class = if is_disabled {
        "bg-gradient-to-r from-gray-400 to-gray-500 opacity-75 cursor-not-allowed text-white"
    } else {
        "bg-gradient-to-r from-yellow-400 to-orange-500 hover:from-yellow-500 hover:to-orange-600 text-white shadow-lg hover:shadow-xl transform hover:-translate-y-0.5 active:translate-y-0"
    };

    let spin_icon_class = if props.is_spinning { "inline-block mr-2 animate-spin" } else { "hidden" };

    html! {
        <div class={classes!("relative", "overflow-hidden", "rounded-full", "w-full", button_class)}>
            <button
                onclick={props.onclick.clone()}
                disabled={is_disabled}
                class="relative w-full px-8 py-4 font-bold text-lg transition-all duration-300 border-2 border-transparent hover:border-white focus:outline-none focus:ring-4 focus:ring-yellow-300 focus:ring-opacity-50 bg-transparent"
            >
                <div class="flex items-center justify-center relative z-10">
                    <svg class={spin_icon_class} xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">
                        <circle cx="12" cy="12" r="10" />
                        <path d="M12 6v6l4 2" />
                    </svg>
                    <span>{button_text}</span>
                </div>
            </button>
        </div>
    }
}

// Result display component
#[derive(Properties, PartialEq)]
pub struct ResultDisplayProps {
    pub prize: Option<Segment>,
    pub review_link: Option<String>,
}

#[function_component(ResultDisplay)]
pub fn result_display(props: &ResultDisplayProps) -> Html {
    let Some(prize) = &props.prize else {
        return html! {};
    };

    html! {
        <div class="mt-8 mb-4 flex flex-col items-center justify-center space-y-3">
            <div class="flex items-center justify-center px-6 py-4 rounded-xl bg-gradient-to-r from-orange-400 to-orange-600 border-2 border-orange-300 text-white font-bold text-xl shadow-lg animate-bounce">
                <span>{format!("You won: {}", prize.name)}</span>
            </div>
            if let Some(code) = &prize.promo_code {
                <div class="text-sm text-gray-600 dark:text-gray-400 bg-gray-100 dark:bg-gray-800 px-4 py-2 rounded-full">
                    {"Promo code: "}<span class="font-mono font-bold">{code}</span>
                </div>
            }
            if let Some(link) = &props.review_link {
                <a href={link.clone()} target="_blank" rel="noopener noreferrer" class={styles::BUTTON_PRIMARY}>
                    {"Leave us a Google review"}
                </a>
            }
        </div>
    }
}
