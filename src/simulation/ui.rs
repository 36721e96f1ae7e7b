use bevy::ecs::schedule::ShouldRun;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContext};

use super::physics::{self, Banner, BannerMaterial};
use super::{util, BannerLayout, Params};

enum PanelAction {
    Reset,
    Gust,
    Rebuild,
    AddBanner,
    RemoveBanner,
}

#[allow(clippy::too_many_arguments)]
pub fn ui_side_panel(
    mut commands: Commands,
    mut egui_ctx: ResMut<EguiContext>,
    mut params: ResMut<Params>,
    mut meshes: ResMut<Assets<Mesh>>,
    time: Res<Time>,
    windows: Res<Windows>,
    layout: Res<BannerLayout>,
    material: Res<BannerMaterial>,
    mut banners: Query<(Entity, &mut Banner)>,
) {
    let mut action = None;

    egui::SidePanel::right("side_panel")
        .default_width(params.side_panel_width)
        .show(egui_ctx.ctx_mut(), |ui| {
            ui.heading("Banner controls");

            ui.horizontal(|ui| {
                if ui.button("Reset").clicked() {
                    action = Some(PanelAction::Reset);
                }
                if ui.button("Gust").clicked() {
                    action = Some(PanelAction::Gust);
                }
            });

            ui.add(egui::Slider::new(&mut params.gust, 0.0..=20.0).text("gust strength"));

            ui.separator();
            ui.heading("Forces");

            ui.add(egui::Slider::new(&mut params.cloth.gravity.y, -2.0..=0.0).text("gravity"));
            ui.add(egui::Slider::new(&mut params.cloth.damping, 0.0..=0.2).text("damping"));
            ui.add(egui::Slider::new(&mut params.cloth.wind_scale, 0.0..=1.0).text("wind scale"));
            ui.add(
                egui::Slider::new(&mut params.cloth.flatten_strength, 0.0..=0.2)
                    .text("flattening"),
            );

            ui.separator();
            ui.heading("Mesh");

            ui.add(egui::Slider::new(&mut params.cloth.segments_w, 1..=60).text("segments (w)"));
            ui.add(egui::Slider::new(&mut params.cloth.segments_h, 1..=60).text("segments (h)"));

            if ui.button("Apply & rebuild").clicked() {
                action = Some(PanelAction::Rebuild);
            }

            ui.checkbox(&mut params.show_wireframe, "Show constraints");

            ui.separator();
            ui.heading("Banners");

            for (i, (_, banner)) in banners.iter().enumerate() {
                ui.label(format!(
                    "#{}: {:?}, wind {:.2}",
                    i,
                    banner.sim.mode(),
                    banner.sim.wind().y
                ));
            }

            ui.horizontal(|ui| {
                if ui.button("Add").clicked() {
                    action = Some(PanelAction::AddBanner);
                }
                if ui.button("Remove").clicked() {
                    action = Some(PanelAction::RemoveBanner);
                }
            });
        });

    let now = time.seconds_since_startup();

    match action {
        Some(PanelAction::Reset) => physics::reset_banners(&mut banners),
        Some(PanelAction::Gust) => physics::gust(&mut banners, params.gust, now),
        Some(PanelAction::Rebuild) => physics::rebuild_banners(&mut banners, &params),
        Some(PanelAction::AddBanner) => {
            let viewport = match util::get_primary_viewport(&windows) {
                Some(viewport) => viewport,
                None => return,
            };
            let rect = layout.slot(banners.iter().count());
            physics::spawn_banner(
                &mut commands,
                &mut meshes,
                material.0.clone(),
                &params,
                viewport,
                rect,
            );
        }
        Some(PanelAction::RemoveBanner) => {
            if let Some((entity, mut banner)) = banners.iter_mut().last() {
                banner.sim.teardown();
                commands.entity(entity).despawn();
                info!("banner {:?} removed", entity);
            }
        }
        None => {}
    }
}

pub fn handle_keyboard_input(
    keys: Res<Input<KeyCode>>,
    time: Res<Time>,
    params: Res<Params>,
    mut banners: Query<(Entity, &mut Banner)>,
) {
    // Reset banners to their rest pose
    if keys.just_released(KeyCode::R) {
        physics::reset_banners(&mut banners);
    }

    if keys.just_released(KeyCode::Space) {
        physics::gust(&mut banners, params.gust, time.seconds_since_startup());
    }
}

/// Triggers system if the "Show constraints" checkbox is selected
pub fn run_if_wireframe_enabled(params: Res<Params>) -> ShouldRun {
    if params.show_wireframe {
        ShouldRun::Yes
    } else {
        ShouldRun::No
    }
}
