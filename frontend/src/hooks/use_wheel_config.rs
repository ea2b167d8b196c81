use std::rc::Rc;

use shared::WheelConfiguration;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::fetch_wheel;
use crate::config::get_api_base_url;

#[derive(Clone, PartialEq)]
pub enum WheelLoad {
    Loading,
    Ready(Rc<WheelConfiguration>),
    Failed(String),
}

/// Fetches the wheel once per id.
#[hook]
pub fn use_wheel_config(wheel_id: String) -> WheelLoad {
    let load = use_state(|| WheelLoad::Loading);

    {
        let load = load.clone();
        use_effect_with(wheel_id, move |wheel_id| {
            let wheel_id = wheel_id.clone();
            load.set(WheelLoad::Loading);
            spawn_local(async move {
                match fetch_wheel(&get_api_base_url(), &wheel_id).await {
                    Ok(config) => load.set(WheelLoad::Ready(Rc::new(config))),
                    Err(err) => {
                        log::error!("Failed to load wheel {}: {}", wheel_id, err);
                        load.set(WheelLoad::Failed(err.user_message().to_string()));
                    }
                }
            });
            || ()
        });
    }

    (*load).clone()
}
