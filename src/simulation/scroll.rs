#[cfg(not(target_arch = "wasm32"))]
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

/// Vertical page scroll offset in pixels, growing downwards.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PageScroll {
    pub y: f32,
}

#[cfg(not(target_arch = "wasm32"))]
const LINE_HEIGHT: f32 = 40.0;

#[cfg(not(target_arch = "wasm32"))]
fn wheel_pixels(unit: MouseScrollUnit, y: f32) -> f32 {
    match unit {
        MouseScrollUnit::Line => y * LINE_HEIGHT,
        MouseScrollUnit::Pixel => y,
    }
}

// No page to scroll natively, the wheel drives a virtual one
#[cfg(not(target_arch = "wasm32"))]
pub fn track_page_scroll(mut wheel: EventReader<MouseWheel>, mut scroll: ResMut<PageScroll>) {
    let delta: f32 = wheel.iter().map(|ev| wheel_pixels(ev.unit, ev.y)).sum();

    // Wheel up scrolls the page back towards the top
    if delta != 0.0 {
        scroll.y = (scroll.y - delta).max(0.0);
    }
}

#[cfg(target_arch = "wasm32")]
pub fn track_page_scroll(mut scroll: ResMut<PageScroll>) {
    let y = web_sys::window()
        .and_then(|window| window.scroll_y().ok())
        .map(|y| y as f32);

    if let Some(y) = y {
        // Only write on change so readers can rely on change detection
        if y != scroll.y {
            scroll.y = y;
        }
    }
}
