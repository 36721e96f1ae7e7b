use bevy::ecs::schedule::ShouldRun;
use bevy::prelude::*;
use bevy::window::WindowResized;
use bevy_prototype_debug_lines::DebugLines;

use super::mesh;
use super::scroll::PageScroll;
use super::Params;
use crate::cloth::projection::project_rect;
use crate::cloth::{ClothSim, PixelRect, SimMode, Tick, VertexBuffer, VertexSink, Viewport};

/// A cloth banner placed on the page. The entity owns its simulation and
/// the vertex buffer the simulation writes to.
#[derive(Component)]
pub struct Banner {
    pub sim: ClothSim,
    pub vertices: VertexBuffer,
    pub mesh: Handle<Mesh>,
    pub rect: PixelRect,
}

/// Shared look of every banner.
pub struct BannerMaterial(pub Handle<StandardMaterial>);

pub fn spawn_banner(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    params: &Params,
    viewport: Viewport,
    rect: PixelRect,
) -> Option<Entity> {
    let placement = project_rect(rect, viewport, params.camera);
    let cloth = params.cloth.with_size(placement.size.x, placement.size.y);

    let sim = match ClothSim::new(cloth) {
        Ok(sim) => sim,
        Err(err) => {
            error!("cannot build banner for {:?}: {}", rect, err);
            return None;
        }
    };

    let mut vertices = VertexBuffer::new(cloth.vertex_buffer_len());
    vertices.upload(sim.grid().particles());
    let handle = meshes.add(mesh::banner_mesh(
        vertices.positions(),
        cloth.segments_w,
        cloth.segments_h,
    ));
    vertices.mark_clean();

    let entity = commands
        .spawn_bundle(PbrBundle {
            mesh: handle.clone(),
            material,
            transform: Transform::from_translation(placement.offset.extend(0.0)),
            ..default()
        })
        .insert(Banner {
            sim,
            vertices,
            mesh: handle,
            rect,
        })
        .id();

    info!(
        "banner {:?} at {:?}, {}x{} world units",
        entity, placement.offset, placement.size.x, placement.size.y
    );

    Some(entity)
}

/// Hands the latest page scroll to every banner.
pub fn feed_scroll(time: Res<Time>, scroll: Res<PageScroll>, mut banners: Query<&mut Banner>) {
    if !scroll.is_changed() {
        return;
    }

    let now = time.seconds_since_startup();
    for mut banner in banners.iter_mut() {
        banner.sim.on_scroll(scroll.y, now);
    }
}

/// Ticks are only scheduled while at least one banner asks for them.
pub fn run_if_any_active(banners: Query<&Banner>) -> ShouldRun {
    if banners.iter().any(|b| b.sim.mode() == SimMode::Active) {
        ShouldRun::Yes
    } else {
        ShouldRun::No
    }
}

pub fn tick_banners(time: Res<Time>, mut banners: Query<(Entity, &mut Banner)>) {
    let now = time.seconds_since_startup();

    for (entity, mut banner) in banners.iter_mut() {
        if banner.sim.mode() != SimMode::Active {
            continue;
        }

        let banner = &mut *banner;
        if banner.sim.tick(now, &mut banner.vertices) == Tick::Halt {
            debug!("banner {:?} stopped ticking", entity);
        }
    }
}

// Copies dirty vertex buffers into their meshes
pub fn sync_meshes(mut meshes: ResMut<Assets<Mesh>>, mut banners: Query<&mut Banner>) {
    for mut banner in banners.iter_mut() {
        if !banner.vertices.needs_update() {
            continue;
        }

        let (segments_w, segments_h) = banner.sim.grid().segments();
        if let Some(mesh) = meshes.get_mut(&banner.mesh) {
            if mesh.count_vertices() == banner.vertices.vertex_count() {
                mesh::update_positions(mesh, banner.vertices.positions(), segments_w, segments_h);
            } else {
                *mesh = mesh::banner_mesh(banner.vertices.positions(), segments_w, segments_h);
            }
        }

        banner.vertices.mark_clean();
    }
}

/// Re-projects every banner when the window changes size.
pub fn handle_resize(
    mut resized: EventReader<WindowResized>,
    params: Res<Params>,
    mut banners: Query<(&mut Banner, &mut Transform)>,
) {
    let event = match resized.iter().last() {
        Some(event) => event,
        None => return,
    };

    let viewport = Viewport {
        width: event.width,
        height: event.height,
    };

    for (mut banner, mut transform) in banners.iter_mut() {
        let banner = &mut *banner;
        let placement = project_rect(banner.rect, viewport, params.camera);

        match banner
            .sim
            .resize(placement.size.x, placement.size.y, &mut banner.vertices)
        {
            Ok(()) => transform.translation = placement.offset.extend(0.0),
            Err(err) => warn!("keeping previous banner size: {}", err),
        }
    }
}

pub fn draw_wireframe(mut lines: ResMut<DebugLines>, banners: Query<(&Banner, &Transform)>) {
    for (banner, transform) in banners.iter() {
        for (a, b) in banner.sim.links() {
            lines.line(transform.mul_vec3(a), transform.mul_vec3(b), 0.0);
        }
    }
}

/// Puts every banner back at rest.
pub fn reset_banners(banners: &mut Query<(Entity, &mut Banner)>) {
    for (_, mut banner) in banners.iter_mut() {
        let banner = &mut *banner;
        banner.sim.reset(&mut banner.vertices);
    }
}

/// A short burst of wind that fades out like a scroll would.
pub fn gust(banners: &mut Query<(Entity, &mut Banner)>, strength: f32, now: f64) {
    for (_, mut banner) in banners.iter_mut() {
        banner.sim.activate(now);
        banner.sim.set_wind(Vec3::new(0.0, strength, 0.0));
    }
}

/// Rebuilds every banner with the panel's parameters, keeping its size.
pub fn rebuild_banners(banners: &mut Query<(Entity, &mut Banner)>, params: &Params) {
    for (entity, mut banner) in banners.iter_mut() {
        let banner = &mut *banner;
        let current = banner.sim.params();
        let cloth = params
            .cloth
            .with_size(current.cloth_width, current.cloth_height);

        if let Err(err) = banner.sim.reconfigure(cloth, &mut banner.vertices) {
            error!("cannot rebuild banner {:?}: {}", entity, err);
        }
    }
}
