use std::f64::consts::PI;

use shared::wheel_config::segment_color;
use shared::Segment;
use wasm_bindgen::JsCast;
use web_sys::{window, CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

const LABEL_MAX_CHARS: usize = 14;

#[derive(Properties, PartialEq)]
pub struct WheelCanvasProps {
    pub segments: Vec<Segment>,
    pub colors: Vec<String>,
    /// Cumulative clockwise rotation in degrees.
    pub rotation: f64,
    pub is_spinning: bool,
}

fn is_dark_mode() -> bool {
    window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
        .map(|el| el.class_list().contains("dark"))
        .unwrap_or(false)
}

fn short_label(name: &str) -> String {
    if name.chars().count() > LABEL_MAX_CHARS {
        let cut: String = name.chars().take(LABEL_MAX_CHARS - 1).collect();
        format!("{}…", cut)
    } else {
        name.to_string()
    }
}

fn draw_wheel(
    context: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    props: (&[Segment], &[String], f64, bool),
) {
    let (segments, colors, rotation, is_spinning) = props;
    let center_x = width / 2.0;
    let center_y = height / 2.0;
    let radius = width.min(height) / 2.0 - 20.0;
    let dark = is_dark_mode();

    context.clear_rect(0.0, 0.0, width, height);

    // Outer glow
    context.begin_path();
    let glow = if is_spinning { 0.25 } else { 0.15 };
    if dark {
        context.set_fill_style_str(&format!("rgba(130, 100, 255, {})", glow));
    } else {
        context.set_fill_style_str(&format!("rgba(100, 130, 255, {})", glow));
    }
    let _ = context.arc(center_x, center_y, radius + 15.0, 0.0, 2.0 * PI);
    context.fill();

    context.save();
    let _ = context.translate(center_x, center_y);
    let _ = context.rotate(rotation * PI / 180.0);
    let _ = context.translate(-center_x, -center_y);

    // Wedge 0 starts at the pointer (12 o'clock) and wedges run clockwise.
    let wedge = 2.0 * PI / segments.len().max(1) as f64;
    for (index, segment) in segments.iter().enumerate() {
        let start = -PI / 2.0 + index as f64 * wedge;
        let end = start + wedge;

        context.begin_path();
        context.set_fill_style_str(&segment_color(index, colors));
        context.move_to(center_x, center_y);
        let _ = context.arc(center_x, center_y, radius, start, end);
        context.close_path();
        context.fill();

        context.begin_path();
        context.set_stroke_style_str(if dark { "rgba(255, 255, 255, 0.7)" } else { "rgba(255, 255, 255, 0.9)" });
        context.set_line_width(2.5);
        context.move_to(center_x, center_y);
        context.line_to(center_x + radius * start.cos(), center_y + radius * start.sin());
        context.stroke();

        context.save();
        let _ = context.translate(center_x, center_y);
        let _ = context.rotate(start + wedge / 2.0);
        context.set_text_align("center");
        context.set_text_baseline("middle");
        context.set_font("bold 18px 'Segoe UI', Roboto, system-ui, sans-serif");
        context.set_fill_style_str("#ffffff");
        context.set_shadow_color("rgba(0, 0, 0, 0.5)");
        context.set_shadow_blur(3.0);
        let _ = context.fill_text(&short_label(&segment.name), radius * 0.62, 0.0);
        context.restore();
    }

    context.restore();

    // Hub
    context.begin_path();
    context.set_fill_style_str(if dark { "#2d3142" } else { "#ffffff" });
    let _ = context.arc(center_x, center_y, radius * 0.12, 0.0, 2.0 * PI);
    context.fill();

    // Fixed pointer at the top
    context.begin_path();
    context.set_fill_style_str(if dark { "#f8fafc" } else { "#111827" });
    context.move_to(center_x - 14.0, center_y - radius - 14.0);
    context.line_to(center_x + 14.0, center_y - radius - 14.0);
    context.line_to(center_x, center_y - radius + 12.0);
    context.close_path();
    context.fill();
}

#[function_component(WheelCanvas)]
pub fn wheel_canvas(props: &WheelCanvasProps) -> Html {
    let canvas_ref = use_node_ref();

    {
        let canvas_ref = canvas_ref.clone();
        let segments = props.segments.clone();
        let colors = props.colors.clone();

        use_effect_with(
            (props.rotation, props.is_spinning, segments, colors),
            move |(rotation, is_spinning, segments, colors)| {
                let context = canvas_ref.cast::<HtmlCanvasElement>().and_then(|canvas| {
                    canvas
                        .get_context("2d")
                        .ok()
                        .flatten()
                        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
                        .map(|ctx| (canvas.width() as f64, canvas.height() as f64, ctx))
                });

                if let Some((width, height, context)) = context {
                    draw_wheel(&context, width, height, (segments.as_slice(), colors.as_slice(), *rotation, *is_spinning));
                }
                || ()
            },
        );
    }

    html! {
        <div class="relative">
            <canvas
                ref={canvas_ref}
                width="450"
                height="450"
                class="w-full max-w-[450px] h-auto rounded-full shadow-lg transition-all duration-300"
                style={if props.is_spinning {
                    "filter: drop-shadow(0px 5px 20px rgba(130, 100, 255, 0.4));"
                } else {
                    "filter: drop-shadow(0px 5px 15px rgba(0, 0, 0, 0.2));"
                }}
            />
        </div>
    }
}
