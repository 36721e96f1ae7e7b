use bevy::prelude::*;
use scroll_cloth::simulation::{Params, Simulation};

const SCREEN_WIDTH: f32 = 1280.0;
const SCREEN_HEIGHT: f32 = 800.0;

fn main() {
    App::new()
        .insert_resource(WindowDescriptor {
            title: "Scroll cloth".to_string(),
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            ..default()
        })
        .insert_resource(ClearColor(Color::rgb(0.95, 0.94, 0.91)))
        .add_plugins(DefaultPlugins)
        .add_plugin(Simulation::new(Params::default()))
        .run();
}
