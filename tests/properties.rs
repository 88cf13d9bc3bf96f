use glam::IVec2;
use proptest::prelude::*;
use tengen_chase::sim::speed::{
    self, ActorSpeedInputs, TUNNEL_SPEED, food_remaining_bonus, pursuer_attack_speed,
};
use tengen_chase::sim::{
    GameSession, GateKeeper, Ghost, GhostState, GridWorld, HuntingTimer, Personality, SAMPLE_MAZE,
    TickInput,
};
use tengen_chase::{Difficulty, PacBooster, Settings};

fn any_difficulty() -> impl Strategy<Value = Difficulty> {
    prop::sample::select(Difficulty::ALL.to_vec())
}

fn any_personality() -> impl Strategy<Value = Personality> {
    prop::sample::select(Personality::ALL.to_vec())
}

fn caged_ghosts() -> Vec<Ghost> {
    Personality::ALL
        .into_iter()
        .map(|p| Ghost::new(p, IVec2::new(9 + p.index() as i32, 7)))
        .collect()
}

proptest! {
    /// Property: hunting phase index never decreases and never exceeds 7
    #[test]
    fn hunting_phase_is_monotonic(
        level in 1u32..=32,
        ops in prop::collection::vec(0u8..20, 1..100),
    ) {
        let mut timer = HuntingTimer::new();
        timer.start(level);
        let mut last = timer.current_phase();
        for op in ops {
            match op {
                0 => timer.stop(),
                1 => timer.resume(),
                n => {
                    for _ in 0..(n as u32 * 50) {
                        timer.tick();
                    }
                }
            }
            let phase = timer.current_phase();
            prop_assert!(phase >= last, "phase went back from {} to {}", last, phase);
            prop_assert!(phase <= 7);
            last = phase;
        }
    }

    /// Property: ghosts in a tunnel always move at the fixed tunnel speed
    #[test]
    fn tunnel_speed_is_constant(
        level in 1u32..=32,
        difficulty in any_difficulty(),
        personality in any_personality(),
        food_remaining in 0u32..300,
    ) {
        let inputs = ActorSpeedInputs {
            level,
            difficulty,
            booster: PacBooster::Off,
            booster_active: false,
            personality,
            food_remaining,
            in_tunnel: true,
        };
        prop_assert_eq!(pursuer_attack_speed(&inputs), TUNNEL_SPEED);
    }

    /// Property: the food bonus only exists on Normal from level 5 on
    #[test]
    fn food_bonus_only_on_normal_from_level_five(
        level in 1u32..=32,
        difficulty in any_difficulty(),
        food_remaining in 0u32..300,
    ) {
        let bonus = food_remaining_bonus(level, difficulty, food_remaining);
        if difficulty != Difficulty::Normal || level < 5 {
            prop_assert_eq!(bonus, 0.0);
        }
        prop_assert!(bonus <= 5.0 / 32.0);
    }

    /// Property: powered Pac is always faster than normal Pac
    #[test]
    fn power_speed_exceeds_attack_speed(
        level in 1u32..=32,
        difficulty in any_difficulty(),
        booster_active in any::<bool>(),
    ) {
        let inputs = ActorSpeedInputs {
            level,
            difficulty,
            booster: PacBooster::OnDemand,
            booster_active,
            personality: Personality::Red,
            food_remaining: 100,
            in_tunnel: false,
        };
        prop_assert!(speed::player_power_speed(&inputs) > speed::player_attack_speed(&inputs));
    }

    /// Property: at most one ghost leaves per call and released ghosts stay out
    #[test]
    fn gatekeeper_releases_one_at_a_time(
        level in 1u32..=32,
        ops in prop::collection::vec(any::<u8>(), 1..600),
    ) {
        let mut keeper = GateKeeper::new(level);
        let mut ghosts = caged_ghosts();
        for op in ops {
            match op % 8 {
                0 => keeper.enable_global_counter(),
                1..=3 => keeper.register_food_eaten(&ghosts),
                _ => {
                    let before: Vec<GhostState> = ghosts.iter().map(|g| g.state).collect();
                    let released = keeper.unlock_ghosts(&mut ghosts);
                    let changed: Vec<usize> = (0..4)
                        .filter(|&i| ghosts[i].state != before[i])
                        .collect();
                    prop_assert!(changed.len() <= 1);
                    prop_assert_eq!(changed.len(), released.map_or(0, |_| 1));
                    for i in changed {
                        prop_assert_eq!(before[i], GhostState::Caged);
                        prop_assert_eq!(ghosts[i].state, GhostState::LeavingHouse);
                    }
                }
            }
        }
    }

    /// Property: identical inputs give identical gatekeeper decisions
    #[test]
    fn gatekeeper_is_deterministic(
        level in 1u32..=32,
        ops in prop::collection::vec(any::<u8>(), 1..300),
    ) {
        let run = |ops: &[u8]| {
            let mut keeper = GateKeeper::new(level);
            let mut ghosts = caged_ghosts();
            let mut decisions = Vec::new();
            for &op in ops {
                match op % 6 {
                    0 => keeper.enable_global_counter(),
                    1 | 2 => keeper.register_food_eaten(&ghosts),
                    _ => decisions.push(keeper.unlock_ghosts(&mut ghosts)),
                }
            }
            decisions
        };
        prop_assert_eq!(run(&ops), run(&ops));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    /// Property: a session replays identically from the same seed
    #[test]
    fn session_is_deterministic(seed in any::<u64>()) {
        let play = |seed: u64| {
            let settings = Settings { autopilot: true, ..Default::default() };
            let maze = GridWorld::parse(SAMPLE_MAZE).unwrap();
            let mut session = GameSession::new(settings, maze, seed).unwrap();
            let mut events = Vec::new();
            for _ in 0..2_000 {
                let input = TickInput { start: true, scene_finished: true, ..Default::default() };
                session.update(&input);
                events.extend(session.drain_events());
            }
            (events, session.state(), session.score().points)
        };
        prop_assert_eq!(play(seed), play(seed));
    }
}
