use bevy::prelude::*;

use crate::cloth::Viewport;

pub fn get_primary_viewport(windows: &Windows) -> Option<Viewport> {
    windows.get_primary().map(|window| Viewport {
        width: window.width(),
        height: window.height(),
    })
}
