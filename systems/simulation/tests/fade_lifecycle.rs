use pixel_plane_core::{tuning, Event, GamePhase, Point2D};
use pixel_plane_system_controls::ControlInput;
use pixel_plane_system_simulation::Simulation;
use pixel_plane_world::{query, scaffolding, World};

fn fire() -> ControlInput {
    ControlInput {
        fire_pressed: true,
        ..ControlInput::default()
    }
}

/// First tick on which a projectile fired from `player_y` closes within hit
/// range of an enemy that started at `enemy_y`, both moving every tick.
fn predicted_hit_tick(player_y: f32, enemy_y: f32) -> u64 {
    let closing = tuning::projectile_speed() + tuning::ENEMY_SPEED;
    let mut tick = 0;
    let mut gap = player_y - enemy_y;
    while gap >= tuning::PROJECTILE_HIT_RANGE {
        gap -= closing;
        tick += 1;
    }
    tick
}

#[test]
fn hit_enemy_fades_for_exactly_twenty_ticks() {
    let mut world = World::new(11);
    scaffolding::set_phase(&mut world, GamePhase::Running);
    scaffolding::place_player(&mut world, Point2D::new(300.0, 384.0));
    let enemy = scaffolding::insert_enemy(&mut world, Point2D::new(300.0, 50.0));
    let mut simulation = Simulation::new(11);

    let mut events = Vec::new();
    simulation.step(&mut world, &fire(), &mut events);

    let mut hit_tick = None;
    let mut destroyed_tick = None;
    let mut destroyed_events = 0;
    for _ in 0..80 {
        let tick = query::tick_index(&world);
        for event in events.drain(..) {
            match event {
                Event::EnemyHit { enemy: hit, .. } if hit == enemy => hit_tick = Some(tick),
                Event::EnemyDestroyed { enemy: gone, score } if gone == enemy => {
                    destroyed_events += 1;
                    destroyed_tick = Some(tick);
                    assert_eq!(score, 1);
                }
                _ => {}
            }
        }
        simulation.step(&mut world, &ControlInput::default(), &mut events);
    }

    let hit_tick = hit_tick.expect("enemy was never hit");
    assert_eq!(hit_tick, predicted_hit_tick(384.0, 50.0));
    assert_eq!(destroyed_tick, Some(hit_tick + u64::from(tuning::FADE_TICKS)));
    assert_eq!(destroyed_events, 1);
    assert_eq!(query::player(&world).score, 1);
}

#[test]
fn dying_enemy_fades_monotonically_and_ignores_further_projectiles() {
    let mut world = World::new(3);
    scaffolding::set_phase(&mut world, GamePhase::Running);
    scaffolding::place_player(&mut world, Point2D::new(300.0, 150.0));
    let enemy = scaffolding::insert_enemy(&mut world, Point2D::new(300.0, 120.0));
    let mut simulation = Simulation::new(3);
    let mut events = Vec::new();

    simulation.step(&mut world, &fire(), &mut events);
    let mut hits = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyHit { .. }))
        .count();
    assert_eq!(hits, 1);

    let mut previous_fade = 1.0;
    for _ in 0..tuning::FADE_TICKS - 1 {
        events.clear();
        simulation.step(&mut world, &fire(), &mut events);
        hits += events
            .iter()
            .filter(|event| matches!(event, Event::EnemyHit { .. }))
            .count();

        let snapshot = query::enemy_view(&world)
            .into_vec()
            .into_iter()
            .find(|snapshot| snapshot.id == enemy)
            .expect("dying enemy still present");
        assert!(snapshot.dying);
        assert_eq!(snapshot.health, 0);
        assert!(snapshot.fade < previous_fade);
        previous_fade = snapshot.fade;
    }

    assert_eq!(hits, 1, "a dying enemy must not be hit again");
}

#[test]
fn each_projectile_strikes_at_most_one_enemy() {
    let mut world = World::new(8);
    scaffolding::set_phase(&mut world, GamePhase::Running);
    scaffolding::place_player(&mut world, Point2D::new(300.0, 200.0));
    let _ = scaffolding::insert_enemy(&mut world, Point2D::new(295.0, 180.0));
    let _ = scaffolding::insert_enemy(&mut world, Point2D::new(305.0, 180.0));
    let mut simulation = Simulation::new(8);
    let mut events = Vec::new();

    simulation.step(&mut world, &fire(), &mut events);

    let hits = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyHit { .. }))
        .count();
    assert_eq!(hits, 1);
    assert!(query::projectile_view(&world).is_empty());
}
