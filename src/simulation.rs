use bevy::prelude::*;
use bevy::render::camera::PerspectiveProjection;
use bevy_egui::EguiPlugin;
use bevy_prototype_debug_lines::DebugLinesPlugin;

use crate::cloth::{ClothParams, PerspectiveCamera, PixelRect, Viewport};

pub mod mesh;
pub mod physics;
pub mod scroll;
mod ui;
mod util;

pub use physics::{Banner, BannerMaterial};
pub use scroll::PageScroll;

#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemLabel)]
enum ClothSystem {
    Input,
    Wake,
    Tick,
}

// Used until the window reports its real size
const FALLBACK_VIEWPORT: Viewport = Viewport {
    width: 1280.0,
    height: 800.0,
};

pub struct Simulation {
    pub params: Params,
    pub layout: BannerLayout,
}

#[derive(Debug, Clone, Copy)]
pub struct Params {
    pub cloth: ClothParams,
    pub camera: PerspectiveCamera,
    pub gust: f32,
    pub show_wireframe: bool,
    pub side_panel_width: f32,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            cloth: ClothParams::default(),
            camera: PerspectiveCamera::default(),
            gust: 8.0,
            show_wireframe: false,
            side_panel_width: 260.0,
        }
    }
}

/// Where the banners sit on the page, in pixels.
#[derive(Debug, Clone)]
pub struct BannerLayout {
    pub rects: Vec<PixelRect>,
    pub gap: f32,
}

impl BannerLayout {
    /// Rect of the `index`-th banner. Slots past the configured ones stack
    /// below the last, `gap` pixels apart.
    pub fn slot(&self, index: usize) -> PixelRect {
        let last = match self.rects.last() {
            Some(rect) => *rect,
            None => {
                return PixelRect {
                    left: 0.0,
                    top: 0.0,
                    width: FALLBACK_VIEWPORT.width / 3.0,
                    height: FALLBACK_VIEWPORT.height / 3.0,
                }
            }
        };

        if let Some(rect) = self.rects.get(index) {
            return *rect;
        }

        let extra = (index + 1 - self.rects.len()) as f32;
        PixelRect {
            top: last.top + extra * (last.height + self.gap),
            ..last
        }
    }
}

impl Default for BannerLayout {
    fn default() -> Self {
        BannerLayout {
            rects: vec![
                PixelRect {
                    left: 140.0,
                    top: 120.0,
                    width: 420.0,
                    height: 300.0,
                },
                PixelRect {
                    left: 660.0,
                    top: 300.0,
                    width: 420.0,
                    height: 300.0,
                },
            ],
            gap: 40.0,
        }
    }
}

impl Simulation {
    pub fn new(params: Params) -> Self {
        Simulation {
            params,
            layout: BannerLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: BannerLayout) -> Self {
        self.layout = layout;
        self
    }
}

impl Plugin for Simulation {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.params)
            .insert_resource(self.layout.clone())
            .insert_resource(PageScroll::default())
            .insert_resource(AmbientLight {
                color: Color::WHITE,
                brightness: 0.4,
            })
            .add_plugin(EguiPlugin)
            .add_plugin(DebugLinesPlugin::with_depth_test(true))
            .add_startup_system(setup_scene)
            .add_system(ui::ui_side_panel)
            .add_system(ui::handle_keyboard_input)
            .add_system(scroll::track_page_scroll.label(ClothSystem::Input))
            .add_system(physics::handle_resize.label(ClothSystem::Input))
            .add_system(
                physics::feed_scroll
                    .label(ClothSystem::Wake)
                    .after(ClothSystem::Input),
            )
            .add_system_set(
                SystemSet::new()
                    .label(ClothSystem::Tick)
                    .after(ClothSystem::Wake)
                    .with_run_criteria(physics::run_if_any_active)
                    .with_system(physics::tick_banners),
            )
            .add_system(physics::sync_meshes.after(ClothSystem::Tick))
            .add_system_set(
                SystemSet::new()
                    .after(ClothSystem::Tick)
                    .with_run_criteria(ui::run_if_wireframe_enabled)
                    .with_system(physics::draw_wireframe),
            );
    }
}

fn setup_scene(
    mut commands: Commands,
    params: Res<Params>,
    layout: Res<BannerLayout>,
    windows: Res<Windows>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn_bundle(Camera3dBundle {
        projection: PerspectiveProjection {
            fov: params.camera.fov_y,
            ..default()
        }
        .into(),
        transform: Transform::from_xyz(0.0, 0.0, params.camera.distance)
            .looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });

    commands.spawn_bundle(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 12000.0,
            ..default()
        },
        transform: Transform::from_xyz(3.0, 4.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });

    let material = materials.add(StandardMaterial {
        base_color: Color::rgb(0.82, 0.27, 0.22),
        perceptual_roughness: 0.9,
        double_sided: true,
        cull_mode: None,
        ..default()
    });
    commands.insert_resource(BannerMaterial(material.clone()));

    let viewport = util::get_primary_viewport(&windows).unwrap_or(FALLBACK_VIEWPORT);
    for rect in &layout.rects {
        physics::spawn_banner(
            &mut commands,
            &mut meshes,
            material.clone(),
            &params,
            viewport,
            *rect,
        );
    }
}
