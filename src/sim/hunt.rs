//! One tick of play while hunting
//!
//! Order matters and is fixed: schedule, release, speeds, movement, food,
//! power countdown, collisions. Collisions use the positions after movement.

use glam::IVec2;
use rand_pcg::Pcg32;

use super::actors::{
    BonusState, Direction, Ghost, GhostState, Pac, Personality, move_on_grid, move_towards,
};
use super::gatekeeper::GateKeeper;
use super::hunting::{HuntingPhase, HuntingTimer};
use super::level::{Level, RoundContext};
use super::speed::{self, ActorSpeedInputs};
use super::state::GameEvent;
use super::steering::{Autopilot, direction_towards, hunting_target, random_direction};
use super::tick::TickInput;
use super::world::{Food, GridWorld};
use crate::consts::*;
use crate::settings::Settings;
use crate::tile_center;

/// Everything the hunting step touches, borrowed from the session
pub struct HuntContext<'a> {
    pub level: &'a mut Level,
    pub round: &'a mut RoundContext,
    pub hunting_timer: &'a mut HuntingTimer,
    pub gatekeeper: &'a mut GateKeeper,
    pub settings: &'a Settings,
    pub rng: &'a mut Pcg32,
    pub events: &'a mut Vec<GameEvent>,
}

/// What happened this tick, for the state machine to act on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HuntOutcome {
    pub level_complete: bool,
    pub pac_killed: bool,
    pub ghosts_eaten: u32,
}

/// Advance the hunting phase by one tick
pub fn hunting_step(ctx: &mut HuntContext<'_>, input: &TickInput) -> HuntOutcome {
    let mut outcome = HuntOutcome::default();

    if ctx.hunting_timer.tick() {
        for ghost in ctx.level.ghosts.iter_mut() {
            if ghost.state == GhostState::Hunting {
                ghost.reverse();
            }
        }
        ctx.events.push(GameEvent::HuntingPhaseStarted {
            index: ctx.hunting_timer.current_phase(),
        });
    }

    if let Some((personality, _)) = ctx.gatekeeper.unlock_ghosts(&mut ctx.level.ghosts) {
        ctx.events.push(GameEvent::GhostReleased { personality });
    }

    move_actors(ctx, input);
    if !eat_food(ctx) {
        count_down_power(ctx);
    }
    check_collisions(ctx, &mut outcome);

    outcome.level_complete = ctx.level.is_complete();
    outcome
}

fn speed_inputs(level: &Level, settings: &Settings, input: &TickInput) -> ActorSpeedInputs {
    ActorSpeedInputs {
        level: level.number,
        difficulty: settings.difficulty,
        booster: settings.booster,
        booster_active: input.booster_pressed,
        personality: Personality::Red,
        food_remaining: level.world.uneaten_food_count(),
        in_tunnel: false,
    }
}

fn move_actors(ctx: &mut HuntContext<'_>, input: &TickInput) {
    let base = speed_inputs(ctx.level, ctx.settings, input);
    let phase = ctx.hunting_timer.phase_kind();
    let Level {
        world,
        pac,
        ghosts,
        bonus,
        eaten_this_power,
        ..
    } = &mut *ctx.level;

    if ctx.round.demo_level || ctx.round.autopilot {
        pac.wish_dir = Autopilot.wish_direction(pac, world);
    } else if input.pac_wish.is_some() {
        pac.wish_dir = input.pac_wish;
    }
    pac.speed = if pac.is_powered() {
        speed::player_power_speed(&base)
    } else {
        speed::player_attack_speed(&base)
    };
    pac.step(world);

    let red_tile = ghosts
        .iter()
        .find(|g| g.personality == Personality::Red)
        .map_or(pac.tile(), Ghost::tile);
    for ghost in ghosts.iter_mut() {
        let inputs = ActorSpeedInputs {
            personality: ghost.personality,
            in_tunnel: world.is_tunnel(ghost.tile()),
            ..base
        };
        match ghost.state {
            GhostState::Caged | GhostState::Eaten => {}
            GhostState::Hunting => {
                ghost.speed = speed::pursuer_attack_speed(&inputs);
                hunt(ghost, phase, pac, red_tile, world);
            }
            GhostState::Frightened => {
                ghost.speed = speed::pursuer_frightened_speed(&inputs);
                roam(ghost, world, &mut *ctx.rng);
            }
            GhostState::LeavingHouse | GhostState::Returning | GhostState::EnteringHouse => {
                let frightened =
                    pac.is_powered() && !eaten_this_power.contains(&ghost.personality);
                move_homebound(ghost, world, frightened);
            }
        }
    }

    let finished = bonus.as_mut().map(|b| {
        b.speed = speed::bonus_item_speed(&base);
        let was_edible = b.is_edible();
        (b.step(world), was_edible)
    });
    if let Some((true, was_edible)) = finished {
        if was_edible {
            ctx.events.push(GameEvent::BonusExpired);
        }
        *bonus = None;
    }
}

fn hunt(ghost: &mut Ghost, phase: HuntingPhase, pac: &Pac, red_tile: IVec2, world: &GridWorld) {
    let target = hunting_target(ghost, phase, pac, red_tile, world);
    let passable = |t| world.is_passable_for_ghost(t, false);
    move_on_grid(
        &mut ghost.pos,
        &mut ghost.dir,
        ghost.speed,
        world,
        passable,
        |tile, current| direction_towards(tile, current, target, passable),
    );
}

fn roam(ghost: &mut Ghost, world: &GridWorld, rng: &mut Pcg32) {
    let passable = |t| world.is_passable_for_ghost(t, false);
    move_on_grid(
        &mut ghost.pos,
        &mut ghost.dir,
        ghost.speed,
        world,
        passable,
        |tile, current| random_direction(tile, current, &mut *rng, passable),
    );
}

/// Movement of ghosts on their way out of or back into the house.
/// A ghost leaving while `frightened` comes out frightened instead of hunting.
fn move_homebound(ghost: &mut Ghost, world: &GridWorld, frightened: bool) {
    let Some(house) = world.house().copied() else {
        return;
    };
    match ghost.state {
        GhostState::LeavingHouse => {
            ghost.speed = speed::pursuer_house_speed();
            if move_towards(&mut ghost.pos, tile_center(house.entry), ghost.speed, true) {
                ghost.state = if frightened {
                    GhostState::Frightened
                } else {
                    GhostState::Hunting
                };
                ghost.dir = Direction::Left;
            }
        }
        GhostState::Returning => {
            ghost.speed = speed::pursuer_returning_speed();
            let passable = |t| world.is_passable_for_ghost(t, false);
            move_on_grid(
                &mut ghost.pos,
                &mut ghost.dir,
                ghost.speed,
                world,
                passable,
                |tile, current| direction_towards(tile, current, house.entry, passable),
            );
            if ghost.tile() == house.entry {
                ghost.pos = tile_center(house.entry);
                ghost.state = GhostState::EnteringHouse;
            }
        }
        GhostState::EnteringHouse => {
            ghost.speed = speed::pursuer_house_speed();
            if move_towards(&mut ghost.pos, tile_center(house.revival), ghost.speed, false) {
                ghost.state = GhostState::LeavingHouse;
                ghost.dir = Direction::Up;
                log::trace!("{} revived", ghost.personality.name());
            }
        }
        _ => {}
    }
}

/// Keep eaten ghosts travelling while the game is frozen on a kill
pub fn move_returning_ghosts(level: &mut Level) {
    let Level { world, ghosts, .. } = level;
    for ghost in ghosts.iter_mut() {
        if ghost.in_state(&[GhostState::Returning, GhostState::EnteringHouse]) {
            move_homebound(ghost, world, false);
        }
    }
}

fn add_points(round: &mut RoundContext, events: &mut Vec<GameEvent>, points: u32, level: u32) {
    let change = round.score.add_points(points, level);
    if change.extra_life {
        round.lives += 1;
        events.push(GameEvent::ExtraLifeWon);
        log::info!("Extra life won, {} lives", round.lives);
    }
    if change.new_high_score {
        events.push(GameEvent::NewHighScore);
    }
}

/// Returns true when an energizer was eaten
fn eat_food(ctx: &mut HuntContext<'_>) -> bool {
    let tile = ctx.level.pac.tile();
    let Some(food) = ctx.level.world.eat_food(tile) else {
        return false;
    };
    let number = ctx.level.number;
    match food {
        Food::Pellet => {
            add_points(ctx.round, ctx.events, PELLET_POINTS, number);
            ctx.events.push(GameEvent::PelletEaten);
        }
        Food::Energizer => {
            add_points(ctx.round, ctx.events, ENERGIZER_POINTS, number);
            ctx.events.push(GameEvent::EnergizerEaten);
            give_power(ctx);
        }
    }
    ctx.gatekeeper.register_food_eaten(&ctx.level.ghosts);

    if BONUS_PELLET_THRESHOLDS.contains(&ctx.level.world.eaten_food_count()) {
        if let Some(symbol) = ctx.level.activate_bonus(&mut *ctx.rng) {
            ctx.events.push(GameEvent::BonusActivated { symbol });
        }
    }
    food == Food::Energizer
}

fn give_power(ctx: &mut HuntContext<'_>) {
    let level = &mut *ctx.level;
    level.ghost_kills = 0;
    level.eaten_this_power.clear();
    level.pac.power_ticks = level.power_ticks();
    if level.power_ticks() == 0 {
        return;
    }
    for ghost in level.ghosts.iter_mut() {
        if ghost.state == GhostState::Hunting {
            ghost.state = GhostState::Frightened;
            ghost.reverse();
        }
    }
    ctx.hunting_timer.stop();
    ctx.events.push(GameEvent::PacGetsPower);
    log::debug!("Pac has power for {} ticks", level.power_ticks());
}

fn count_down_power(ctx: &mut HuntContext<'_>) {
    let level = &mut *ctx.level;
    if level.pac.power_ticks == 0 {
        return;
    }
    level.pac.power_ticks -= 1;
    if level.pac.power_ticks > 0 {
        return;
    }
    for ghost in level.ghosts.iter_mut() {
        if ghost.state == GhostState::Frightened {
            ghost.state = GhostState::Hunting;
        }
    }
    ctx.hunting_timer.resume();
    ctx.events.push(GameEvent::PacLostPower);
}

fn check_collisions(ctx: &mut HuntContext<'_>, outcome: &mut HuntOutcome) {
    let number = ctx.level.number;
    let Level {
        pac,
        ghosts,
        bonus,
        ghost_kills,
        eaten_this_power,
        ..
    } = &mut *ctx.level;
    let pac_tile = pac.tile();
    let vulnerable = !pac.is_powered() && !ctx.round.immunity;

    for ghost in ghosts.iter_mut().filter(|g| g.tile() == pac_tile) {
        match ghost.state {
            GhostState::Frightened => {
                let points = next_ghost_points(*ghost_kills);
                *ghost_kills += 1;
                eaten_this_power.push(ghost.personality);
                ghost.state = GhostState::Eaten;
                ghost.eaten_points = Some(points);
                add_points(ctx.round, ctx.events, points, number);
                ctx.events.push(GameEvent::GhostEaten {
                    personality: ghost.personality,
                    points,
                });
                outcome.ghosts_eaten += 1;
            }
            _ if ghost.is_dangerous() && vulnerable => {
                outcome.pac_killed = true;
            }
            _ => {}
        }
    }

    if let Some(b) = bonus.as_mut().filter(|b| b.is_edible() && b.tile() == pac_tile) {
        b.state = BonusState::Eaten {
            ticks_left: BONUS_EATEN_TICKS,
        };
        let (symbol, points) = (b.symbol, b.points);
        add_points(ctx.round, ctx.events, points, number);
        ctx.events.push(GameEvent::BonusEaten { symbol, points });
    }
}

/// Points the next frightened ghost is worth
pub fn next_ghost_points(kills: u32) -> u32 {
    FIRST_GHOST_POINTS << kills.min(3)
}
