//! The per-tick simulation: physics, obstacles, collision, scoring,
//! milestones, and the run state machine.

use crate::constants::*;
use crate::effects::logic as effects;
use crate::effects::milestones::{MilestoneEffect, MilestoneTable};
use crate::game::types::{flock_burst, Game, GamePhase, Tree};
use rand::Rng;

/// Start (or restart) a run: everything entity- and effect-level returns to
/// its initial state through this one reset path.
pub fn start(game: &mut Game) {
    game.phase = GamePhase::Playing;
    game.score = 0;
    game.speed_multiplier = 1.0;
    game.tree_speed = BASE_SPEED;
    game.goose.reset();
    game.trees.clear();
    game.flock.clear();
    game.effects.reset();
    game.milestones = MilestoneTable::new();
    game.over_at_ms = None;
}

/// Apply the jump impulse. Idempotently ignored once the run has ended.
pub fn jump(game: &mut Game) {
    if game.phase != GamePhase::Playing {
        return;
    }
    game.goose.velocity = JUMP_IMPULSE;
    game.goose.rotation = JUMP_ROTATION;
}

/// Advance the simulation by one fixed timestep.
///
/// Update order (terminal flag short-circuits the milestone pass):
/// speed from score, ambient effects, player physics, obstacles
/// (spawn/scroll/collide/score/prune), boundary check, milestone table,
/// ephemeral effects.
pub fn process_tick<R: Rng>(game: &mut Game, now_ms: u64, rng: &mut R) {
    if game.phase != GamePhase::Playing {
        return;
    }

    // Speed scales +10% for every 10 points, floor-based.
    game.speed_multiplier = 1.0 + (game.score / 10) as f64 * SPEED_STEP;
    game.tree_speed = BASE_SPEED * game.speed_multiplier;

    advance_ambient_effects(game, now_ms, rng);
    advance_goose(game);

    let mut terminal = advance_trees(game, rng);
    terminal |= out_of_bounds(game.goose.y);

    if terminal {
        game.phase = GamePhase::GameOver;
        game.over_at_ms = Some(now_ms);
    } else {
        run_milestones(game, now_ms, rng);
    }

    advance_flock(game);
    effects::update_fireworks(&mut game.effects, now_ms);
}

/// Background and ambient layers: hue drifts, pulse, disco ball, space
/// objects, mountains, star warp.
fn advance_ambient_effects<R: Rng>(game: &mut Game, now_ms: u64, rng: &mut R) {
    let fx = &mut game.effects;
    fx.background_hue = (fx.background_hue + 0.5) % 360.0;

    let pre_space_band = !fx.space.active && (30..100).contains(&game.score);
    let space_band = fx.space.active && game.score >= 140;
    if pre_space_band || space_band {
        fx.background_hue = (fx.background_hue + 1.0) % 360.0;
    }
    if !fx.space.active && (40..100).contains(&game.score) {
        effects::update_pulse(fx);
    }

    effects::update_disco_ball(fx, now_ms, rng);
    effects::update_space(fx, game.tree_speed, game.score, now_ms, rng);
    effects::update_mountains(fx, game.tree_speed, game.score, rng);
    effects::update_stars(fx, game.speed_multiplier, rng);
}

/// Gravity integration, fall-speed clamp, and rotation easing.
fn advance_goose(game: &mut Game) {
    let goose = &mut game.goose;
    goose.velocity = (goose.velocity + GRAVITY).min(MAX_FALL_SPEED);
    goose.y += goose.velocity;

    if goose.velocity < 0.0 {
        goose.rotation = ASCEND_ROTATION;
    } else if goose.rotation < MAX_ROTATION {
        goose.rotation += ROTATION_STEP_CAP.min(goose.velocity * 1.5);
    }

    goose.wing_phase += WING_SPEED;
}

/// Spawn, scroll, collide, score, and prune trees. Returns true on collision.
fn advance_trees<R: Rng>(game: &mut Game, rng: &mut R) -> bool {
    let needs_tree = game
        .trees
        .last()
        .map(|t| t.x < CANVAS_WIDTH - TREE_SPAWN_THRESHOLD)
        .unwrap_or(true);
    if needs_tree {
        game.trees.push(Tree::spawn(rng));
    }

    let mut collided = false;
    for tree in &mut game.trees {
        tree.x -= game.tree_speed;

        if collides(game.goose.y, tree) {
            collided = true;
            break;
        }

        // First tick the tree falls behind the goose: exactly one point.
        if !tree.passed && tree.x < GOOSE_X {
            tree.passed = true;
            game.score += 1;
        }
    }

    game.trees.retain(|t| t.x >= -TREE_WIDTH);
    collided
}

/// AABB overlap with a vertical gap exclusion.
pub fn collides(goose_y: f64, tree: &Tree) -> bool {
    let horizontal = GOOSE_X + GOOSE_SIZE > tree.x && GOOSE_X < tree.x + TREE_WIDTH;
    let outside_gap = goose_y < tree.gap_y || goose_y + GOOSE_SIZE > tree.gap_y + TREE_GAP;
    horizontal && outside_gap
}

/// Touching either canvas edge is terminal.
pub fn out_of_bounds(goose_y: f64) -> bool {
    goose_y <= 0.0 || goose_y + GOOSE_SIZE >= CANVAS_HEIGHT
}

/// One pass over the milestone table, plus the repeating ten-point
/// celebration.
fn run_milestones<R: Rng>(game: &mut Game, now_ms: u64, rng: &mut R) {
    if game.milestones.celebrate_ten(game.score) {
        let anchor_x = GOOSE_X + GOOSE_SIZE / 2.0;
        let anchor_y = game.goose.y + GOOSE_SIZE / 2.0;
        effects::spawn_firework(&mut game.effects, game.score, anchor_x, anchor_y, now_ms, rng);
        game.flock.extend(flock_burst(GOOSE_X, game.goose.y));
    }

    for effect in game.milestones.evaluate(game.score) {
        apply_milestone(game, effect, rng);
    }
}

fn apply_milestone<R: Rng>(game: &mut Game, effect: MilestoneEffect, rng: &mut R) {
    let fx = &mut game.effects;
    match effect {
        MilestoneEffect::ColorizeStars => fx.stars_colorized = true,
        MilestoneEffect::InjectLeaves => effects::inject_leaves(fx, rng),
        MilestoneEffect::ActivateDiscoBall => fx.disco_ball.activate(),
        MilestoneEffect::ActivateSpaceMode => {
            fx.space.active = true;
            fx.space.transition = 0.0;
        }
        MilestoneEffect::ThemeSwapReset => fx.clear_transient_decorations(),
        // Space decorations only make sense once the theme has swapped.
        MilestoneEffect::SpawnPlanets if fx.space.active => effects::spawn_planets(fx, rng),
        MilestoneEffect::SpawnUfos if fx.space.active => effects::spawn_ufos(fx, rng),
        MilestoneEffect::DiscoBallEncore if fx.space.active => fx.disco_ball.activate(),
        _ => {}
    }
}

/// Drift flock geese along their burst vectors and prune off-screen ones.
fn advance_flock(game: &mut Game) {
    for goose in &mut game.flock {
        goose.x += goose.vx;
        goose.y += goose.vy;
        goose.wing_phase += 0.3;
    }
    game.flock.retain(|g| {
        g.x > -FLOCK_MARGIN
            && g.x < CANVAS_WIDTH + FLOCK_MARGIN
            && g.y > -FLOCK_MARGIN
            && g.y < CANVAS_HEIGHT + FLOCK_MARGIN
    });
}
