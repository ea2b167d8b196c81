use yew::prelude::*;

use crate::styles;

#[function_component(NotFound)]
pub fn not_found() -> Html {
    html! {
        <div class={styles::CONTAINER}>
            <div class="max-w-md mx-auto pt-24 text-center space-y-3">
                <h1 class={styles::TEXT_H1}>{"Wheel not found"}</h1>
                <p class={styles::TEXT_BODY}>
                    {"Scan the QR code at the counter again, or ask the staff for the wheel link."}
                </p>
            </div>
        </div>
    }
}
