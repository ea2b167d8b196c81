pub mod api;
pub mod config;
pub mod hooks;
pub mod pages;
pub mod runtime;
pub mod styles;

use yew::prelude::*;
use yew_router::prelude::*;

use crate::pages::{not_found::NotFound, play::PlayPage};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/play/:wheel_id")]
    Play { wheel_id: String },
    #[not_found]
    #[at("/404")]
    NotFound,
}

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <BrowserRouter>
            <div class="min-h-screen w-full">
                <div class="mx-auto">
                    <Switch<Route> render={switch} />
                </div>
            </div>
        </BrowserRouter>
    }
}

pub fn switch(route: Route) -> Html {
    match route {
        Route::Play { wheel_id } => html! { <PlayPage {wheel_id} /> },
        Route::NotFound => html! { <NotFound /> },
    }
}
