use bevy::math::Vec3;
use scroll_cloth::cloth::{
    ClothParams, ClothSim, ConstraintSet, ParticleGrid, SimMode, StepOutcome, VertexBuffer,
};

fn small_params() -> ClothParams {
    ClothParams::default().with_size(4.0, 3.0).with_segments(4, 3)
}

fn small_sim() -> (ClothSim, VertexBuffer) {
    let params = small_params();
    (
        ClothSim::new(params).unwrap(),
        VertexBuffer::new(params.vertex_buffer_len()),
    )
}

fn assert_at_rest(sim: &ClothSim) {
    let grid = sim.grid();
    for i in 0..grid.len() {
        let p = grid.particle(i);
        assert_eq!(p.position, grid.rest_position(i), "particle {} not at rest", i);
        assert_eq!(p.previous_position, grid.rest_position(i));
    }
}

#[test]
fn pinned_row_never_moves() {
    let (mut sim, mut buffer) = small_sim();
    let columns = sim.grid().columns();
    let top_row: Vec<Vec3> = (0..columns)
        .map(|u| sim.grid().particle(u).position)
        .collect();

    sim.on_scroll(0.0, 0.0);
    for frame in 1..=300 {
        let now = frame as f64 / 60.0;
        if frame % 20 == 0 {
            sim.on_scroll(frame as f32 * 3.0, now);
        }
        // Poke the pinned row and the free cloth alike
        for i in (0..sim.grid().len()).step_by(3) {
            sim.apply_force(i, Vec3::new(0.5, -0.3, 2.0));
        }
        sim.simulate(&mut buffer);
    }

    for (u, expected) in top_row.iter().enumerate() {
        assert_eq!(sim.grid().particle(u).position, *expected);
    }
    // Something else did move
    let bottom = sim.grid().index(2, 3);
    assert_ne!(sim.grid().particle(bottom).position, sim.grid().rest_position(bottom));
}

#[test]
fn relaxation_converges_to_rest_distance() {
    let params = small_params();
    let mut grid = ParticleGrid::from_params(&params).unwrap();
    let constraints = ConstraintSet::build(&grid, params.rest_distance());

    constraints.relax(grid.particles_mut(), 10_000);

    let particles = grid.particles();
    for c in constraints.iter() {
        // Links between two pinned particles cannot change length
        if particles[c.a].pinned && particles[c.b].pinned {
            continue;
        }
        let distance = c.current_distance(particles);
        assert!(
            (distance - c.rest_distance).abs() < 1e-3,
            "link {}-{} is {} long, expected {}",
            c.a,
            c.b,
            distance,
            c.rest_distance
        );
    }
}

#[test]
fn displacement_is_clamped_per_step() {
    let (mut sim, mut buffer) = small_sim();
    let params = *sim.params();
    let corner = sim.grid().index(4, 3);
    let before = sim.grid().particle(corner).position;

    // Enough force to travel 50 units in a single unclamped step
    let dt = params.time_step;
    sim.apply_force(corner, Vec3::new(50.0 * params.mass / (dt * dt), 0.0, 0.0));
    assert_eq!(sim.simulate(&mut buffer), StepOutcome::Advanced);

    let moved = sim.grid().particle(corner).position.distance(before);
    assert!(moved <= params.max_displacement + 1e-4, "moved {}", moved);
    assert!(moved > 0.1);
}

#[test]
fn nan_particle_triggers_full_rebuild() {
    let (mut sim, mut buffer) = small_sim();
    sim.activate(0.0);
    sim.set_wind(Vec3::new(0.0, 3.0, 0.0));
    for _ in 0..10 {
        sim.simulate(&mut buffer);
    }

    let idx = sim.grid().index(2, 2);
    sim.grid_mut().particle_mut(idx).position.y = f32::NAN;

    assert_eq!(sim.simulate(&mut buffer), StepOutcome::Exploded);
    assert_at_rest(&sim);
    assert_eq!(sim.wind(), Vec3::ZERO);
    assert_eq!(sim.mode(), SimMode::Idle);
}

#[test]
fn far_away_particle_triggers_full_rebuild() {
    let (mut sim, mut buffer) = small_sim();
    sim.activate(0.0);
    sim.set_wind(Vec3::new(0.0, 3.0, 0.0));

    // Pinned particles are checked too
    sim.grid_mut().particle_mut(0).position.x = 2000.0;

    assert_eq!(sim.simulate(&mut buffer), StepOutcome::Exploded);
    assert_at_rest(&sim);
    assert_eq!(sim.wind(), Vec3::ZERO);
    assert_eq!(sim.mode(), SimMode::Idle);
}

#[test]
fn far_away_free_particle_triggers_full_rebuild() {
    // Interior, corner and second-row particles, on every axis
    for &(u, v) in &[(2, 2), (4, 3), (2, 1)] {
        for axis in 0..3 {
            let (mut sim, mut buffer) = small_sim();
            sim.activate(0.0);
            sim.set_wind(Vec3::new(0.0, 3.0, 0.0));

            let idx = sim.grid().index(u, v);
            assert!(!sim.grid().particle(idx).pinned);
            sim.grid_mut().particle_mut(idx).position[axis] = 2000.0;

            assert_eq!(
                sim.simulate(&mut buffer),
                StepOutcome::Exploded,
                "particle ({}, {}) axis {}",
                u,
                v,
                axis
            );
            assert_at_rest(&sim);
            assert_eq!(sim.wind(), Vec3::ZERO);
            assert_eq!(sim.mode(), SimMode::Idle);
        }
    }
}

#[test]
fn explosion_renders_rest_pose_once() {
    let (mut sim, mut buffer) = small_sim();
    let idx = sim.grid().index(1, 1);
    sim.grid_mut().particle_mut(idx).position.z = f32::INFINITY;

    sim.simulate(&mut buffer);

    assert!(buffer.needs_update());
    let rest: Vec<f32> = sim
        .grid()
        .rest_positions()
        .iter()
        .flat_map(|p| p.to_array())
        .collect();
    assert_eq!(buffer.positions(), rest.as_slice());
}

#[test]
fn rebuild_is_idempotent() {
    let (mut sim, mut buffer) = small_sim();
    sim.set_wind(Vec3::new(0.0, 5.0, 0.0));
    for _ in 0..30 {
        sim.simulate(&mut buffer);
    }
    sim.grid_mut().particle_mut(7).position = Vec3::splat(f32::NAN);

    sim.reset(&mut buffer);
    let first: Vec<Vec3> = sim.grid().particles().iter().map(|p| p.position).collect();
    sim.reset(&mut buffer);
    let second: Vec<Vec3> = sim.grid().particles().iter().map(|p| p.position).collect();

    assert_eq!(first, second);

    let fresh = ClothSim::new(small_params()).unwrap();
    let expected: Vec<Vec3> = fresh.grid().particles().iter().map(|p| p.position).collect();
    assert_eq!(first, expected);
}

#[test]
fn wind_pushes_cloth_out_of_plane() {
    let (mut sim, mut buffer) = small_sim();
    sim.set_wind(Vec3::new(0.0, 2.0, 0.0));
    for _ in 0..60 {
        sim.simulate(&mut buffer);
    }

    let bottom = sim.grid().index(2, 3);
    assert!(sim.grid().particle(bottom).position.z > 0.0);
}

#[test]
fn cloth_swings_back_after_wind_stops() {
    let (mut sim, mut buffer) = small_sim();

    sim.set_wind(Vec3::new(0.0, 2.0, 0.0));
    for _ in 0..120 {
        sim.simulate(&mut buffer);
    }
    let bottom = sim.grid().index(2, 3);
    let peak = sim.grid().particle(bottom).position.z;

    sim.set_wind(Vec3::ZERO);
    for _ in 0..3000 {
        sim.simulate(&mut buffer);
    }

    assert!(sim.grid().particle(bottom).position.z.abs() < peak.abs());
}
