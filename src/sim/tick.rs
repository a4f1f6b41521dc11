//! Fixed timestep scene stepper
//!
//! Advances every animated quantity by one tick: camera motion from held
//! keys, continuous spins, the tug pull countdown and the terminal
//! transition. Safe to call on idle frames; a zero dt changes nothing.

use super::input::HeldKeys;
use super::state::{EntityKind, GamePhase, SceneState, Winner};
use crate::consts::*;
use crate::display::StatusDisplay;
use crate::wrap_degrees;

/// Per-tick input sampled by the host loop
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub held: HeldKeys,
}

/// Advance the scene by `dt` seconds.
pub fn tick(state: &mut SceneState, input: &TickInput, dt: f32, display: &mut dyn StatusDisplay) {
    if dt <= 0.0 {
        return;
    }
    state.time_ticks += 1;

    let elapsed_ms = dt * 1000.0;
    steer_camera(state, &input.held, elapsed_ms);
    turn_windmill(state, &input.held, elapsed_ms, dt);

    // Continuous spins (windmill handled above, victory spin lives here)
    for entity in state.entities.iter_mut().filter(|e| e.active) {
        entity.spin(dt);
    }

    step_match(state, display);
}

/// Integrate held turn/move keys into the camera. Turn keys are exclusive
/// (left wins), as are the move keys.
fn steer_camera(state: &mut SceneState, held: &HeldKeys, elapsed_ms: f32) {
    if held.turn_left {
        state.camera.turn(CAM_TURN_DEG_PER_MS * elapsed_ms);
    } else if held.turn_right {
        state.camera.turn(-CAM_TURN_DEG_PER_MS * elapsed_ms);
    }

    if held.forward {
        state.camera.advance(CAM_MOVE_PER_MS * elapsed_ms);
    } else if held.backward {
        state.camera.advance(-CAM_MOVE_PER_MS * elapsed_ms);
    }
}

/// Spin the fan while enabled and yaw the base while the key is held.
fn turn_windmill(state: &mut SceneState, held: &HeldKeys, elapsed_ms: f32, dt: f32) {
    if held.yaw_base {
        state.windmill.fan_turn =
            wrap_degrees(state.windmill.fan_turn + FAN_YAW_DEG_PER_MS * elapsed_ms);
    }
    if state.windmill.fan_enabled {
        state.windmill.fan_angle =
            wrap_degrees(state.windmill.fan_angle + FAN_SPIN_DEG_PER_SEC * dt);
    }
}

/// Tug phase machine: consume the queued pull, run the move-budget
/// countdown, then either return to Idle or enter GameOver.
fn step_match(state: &mut SceneState, display: &mut dyn StatusDisplay) {
    match state.phase {
        GamePhase::RoundInProgress => {
            state.phase = match state.pending_pull.take() {
                Some(direction) => GamePhase::RoundAnimating {
                    ticks_left: ROUND_TICKS,
                    direction,
                },
                // Nothing queued; treat as a spurious transition
                None => GamePhase::Idle,
            };
        }
        GamePhase::RoundAnimating {
            ticks_left,
            direction,
        } => {
            if direction != 0 {
                let step = f32::from(direction) * PULL_STEP;
                for entity in state
                    .entities
                    .iter_mut()
                    .filter(|e| e.active && e.tug_affected)
                {
                    entity.position.x += step;
                }
            }

            let ticks_left = ticks_left - 1;
            if ticks_left > 0 {
                state.phase = GamePhase::RoundAnimating {
                    ticks_left,
                    direction,
                };
            } else if state.score >= SCORE_LIMIT {
                enter_game_over(state, Winner::Player, display);
            } else if state.score <= -SCORE_LIMIT {
                enter_game_over(state, Winner::Ai, display);
            } else {
                state.phase = GamePhase::Idle;
            }
        }
        GamePhase::Idle | GamePhase::GameOver { .. } => {}
    }
}

/// Terminal transition: announce the winner, start the victory spin and
/// shift the loser (and rope) to the ground exactly once.
fn enter_game_over(state: &mut SceneState, winner: Winner, display: &mut dyn StatusDisplay) {
    state.phase = GamePhase::GameOver { winner };
    display.set_hands(winner.banner());
    log::info!("match over: {}", winner.banner());

    if state.ground_shift_done {
        return;
    }
    state.ground_shift_done = true;

    let (winner_kind, loser_kind) = match winner {
        Winner::Player => (EntityKind::Player, EntityKind::Opponent),
        Winner::Ai => (EntityKind::Opponent, EntityKind::Player),
    };

    if let Some(champ) = state.entity_of_mut(winner_kind) {
        champ.spin_deg_per_sec = VICTORY_SPIN_DEG_PER_SEC;
    }
    if let Some(loser) = state.entity_of_mut(loser_kind) {
        loser.rotation_deg = wrap_degrees(loser.rotation_deg + LOSER_TIP_DEG);
        loser.position.y -= LOSER_DROP;
    }
    if let Some(rope) = state.entity_of_mut(EntityKind::Rope) {
        rope.position.y -= ROPE_DROP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demos::{self, DemoKind};
    use crate::display::{NullDisplay, RecordingDisplay};
    use crate::sim::input::{self, PlayerAction};
    use crate::sim::rps::{self, Hand};

    /// Step until the pull animation finishes and the phase settles
    fn run_round_out(state: &mut SceneState, display: &mut dyn StatusDisplay) {
        let input = TickInput::default();
        for _ in 0..=ROUND_TICKS {
            tick(state, &input, SIM_DT, display);
        }
    }

    /// The hand that defeats what the AI will throw this round
    fn winning_hand(state: &SceneState) -> Hand {
        let ai = rps::ai_hand(state.seed, state.rounds_played);
        match ai {
            Hand::Rock => Hand::Paper,
            Hand::Paper => Hand::Scissors,
            Hand::Scissors => Hand::Rock,
        }
    }

    fn choose(hand: Hand) -> PlayerAction {
        match hand {
            Hand::Rock => PlayerAction::ChooseRock,
            Hand::Paper => PlayerAction::ChoosePaper,
            Hand::Scissors => PlayerAction::ChooseScissors,
        }
    }

    #[test]
    fn test_zero_dt_is_idempotent() {
        let mut state = demos::build_scene(DemoKind::Landscape, 5);
        state.entities[0].spin_deg_per_sec = 90.0;
        let before = state.clone();

        let input = TickInput {
            held: HeldKeys {
                turn_left: true,
                forward: true,
                yaw_base: true,
                ..Default::default()
            },
        };
        tick(&mut state, &input, 0.0, &mut NullDisplay);

        assert_eq!(state.time_ticks, before.time_ticks);
        assert_eq!(state.camera.angle, before.camera.angle);
        assert_eq!(state.camera.eye, before.camera.eye);
        assert_eq!(state.windmill.fan_angle, before.windmill.fan_angle);
        for (a, b) in state.entities.iter().zip(before.entities.iter()) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.rotation_deg, b.rotation_deg);
        }
    }

    #[test]
    fn test_held_left_turn_for_one_second() {
        let mut state = demos::build_scene(DemoKind::Landscape, 5);
        assert_eq!(state.camera.angle, 270.0);

        let input = TickInput {
            held: HeldKeys {
                turn_left: true,
                ..Default::default()
            },
        };
        // 10 ticks of 100 ms at 0.12 deg/ms: +120 degrees total
        for _ in 0..10 {
            tick(&mut state, &input, 0.1, &mut NullDisplay);
        }

        assert!((state.camera.angle - 30.0).abs() < 1e-3, "270 + 120 wraps to 30");
        let (x, z) = crate::look_vector(state.camera.angle);
        assert!((state.camera.look.x - x).abs() < 1e-6);
        assert!((state.camera.look.z - z).abs() < 1e-6);
    }

    #[test]
    fn test_forward_moves_along_look() {
        let mut state = demos::build_scene(DemoKind::Landscape, 5);
        let look = state.camera.look;
        let start = state.camera.eye;

        let input = TickInput {
            held: HeldKeys {
                forward: true,
                ..Default::default()
            },
        };
        tick(&mut state, &input, 0.5, &mut NullDisplay);

        let expected = start + look * (CAM_MOVE_PER_MS * 500.0);
        assert!((state.camera.eye - expected).length() < 1e-4);
    }

    #[test]
    fn test_fan_spin_and_toggle() {
        let mut state = demos::build_scene(DemoKind::Landscape, 5);
        assert!(state.windmill.fan_enabled);

        tick(&mut state, &TickInput::default(), 1.0, &mut NullDisplay);
        assert!((state.windmill.fan_angle - FAN_SPIN_DEG_PER_SEC).abs() < 1e-4);

        input::resolve(&mut state, PlayerAction::ToggleFan, &mut NullDisplay);
        let frozen = state.windmill.fan_angle;
        tick(&mut state, &TickInput::default(), 1.0, &mut NullDisplay);
        assert_eq!(state.windmill.fan_angle, frozen);
    }

    #[test]
    fn test_round_pull_moves_tug_entities() {
        let mut state = demos::build_scene(DemoKind::Tug, 11);
        let hand = winning_hand(&state);
        let player_x = state.entity_of(EntityKind::Player).unwrap().position.x;

        input::resolve(&mut state, choose(hand), &mut NullDisplay);
        run_round_out(&mut state, &mut NullDisplay);

        let moved = state.entity_of(EntityKind::Player).unwrap().position.x;
        let expected = player_x - PULL_STEP * ROUND_TICKS as f32;
        assert!((moved - expected).abs() < 1e-5);
        assert_eq!(state.phase, GamePhase::Idle);
    }

    #[test]
    fn test_three_wins_reach_game_over_with_banner() {
        let mut state = demos::build_scene(DemoKind::Tug, 21);
        let mut display = RecordingDisplay::new();

        // Wins interleaved with ties: +1, 0, +1, 0, +1
        for round in 0..5 {
            let hand = if round % 2 == 0 {
                winning_hand(&state)
            } else {
                rps::ai_hand(state.seed, state.rounds_played) // tie
            };
            input::resolve(&mut state, choose(hand), &mut display);
            run_round_out(&mut state, &mut display);
        }

        assert_eq!(state.score, 3);
        assert_eq!(
            state.phase,
            GamePhase::GameOver {
                winner: Winner::Player
            }
        );
        assert_eq!(display.last_hands(), Some("Player WINS!"));
    }

    #[test]
    fn test_terminal_latch_fires_exactly_once() {
        let mut state = demos::build_scene(DemoKind::Tug, 21);
        for _ in 0..3 {
            let hand = winning_hand(&state);
            input::resolve(&mut state, choose(hand), &mut NullDisplay);
            run_round_out(&mut state, &mut NullDisplay);
        }
        assert!(state.is_terminal());
        assert!(state.ground_shift_done);

        let loser_y = state.entity_of(EntityKind::Opponent).unwrap().position.y;
        let loser_rot = state.entity_of(EntityKind::Opponent).unwrap().rotation_deg;
        let rope_y = state.entity_of(EntityKind::Rope).unwrap().position.y;

        // Plenty of extra terminal ticks: the shift must not re-apply
        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), SIM_DT, &mut NullDisplay);
        }
        assert_eq!(
            state.entity_of(EntityKind::Opponent).unwrap().position.y,
            loser_y
        );
        assert_eq!(
            state.entity_of(EntityKind::Opponent).unwrap().rotation_deg,
            loser_rot
        );
        assert_eq!(state.entity_of(EntityKind::Rope).unwrap().position.y, rope_y);

        // While the winner keeps spinning
        let spin = state
            .entity_of(EntityKind::Player)
            .unwrap()
            .spin_deg_per_sec;
        assert_eq!(spin, VICTORY_SPIN_DEG_PER_SEC);
    }

    #[test]
    fn test_no_rounds_accepted_after_game_over() {
        let mut state = demos::build_scene(DemoKind::Tug, 21);
        for _ in 0..3 {
            let hand = winning_hand(&state);
            input::resolve(&mut state, choose(hand), &mut NullDisplay);
            run_round_out(&mut state, &mut NullDisplay);
        }
        let rounds = state.rounds_played;
        input::resolve(&mut state, PlayerAction::ChooseRock, &mut NullDisplay);
        run_round_out(&mut state, &mut NullDisplay);
        assert_eq!(state.rounds_played, rounds);
        assert_eq!(state.score, 3);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_action() -> impl Strategy<Value = PlayerAction> {
            prop_oneof![
                Just(PlayerAction::ChooseRock),
                Just(PlayerAction::ChoosePaper),
                Just(PlayerAction::ChooseScissors),
                Just(PlayerAction::AcknowledgeResult),
                Just(PlayerAction::ToggleFan),
                (0u8..4).prop_map(PlayerAction::ToggleLight),
            ]
        }

        proptest! {
            #[test]
            fn score_stays_bounded(seed in 0u64..1000, actions in prop::collection::vec(arb_action(), 0..60)) {
                let mut state = demos::build_scene(DemoKind::Tug, seed);
                for action in actions {
                    input::resolve(&mut state, action, &mut NullDisplay);
                    prop_assert!((-3..=3).contains(&state.score));
                    run_round_out(&mut state, &mut NullDisplay);
                    prop_assert!((-3..=3).contains(&state.score));
                }
            }

            #[test]
            fn rotations_stay_wrapped(seed in 0u64..1000, ticks in 1u32..400, dt in 0.001f32..0.25) {
                let mut state = demos::build_scene(DemoKind::Lighting, seed);
                let input = TickInput {
                    held: HeldKeys { turn_left: true, yaw_base: true, ..Default::default() },
                };
                for _ in 0..ticks {
                    tick(&mut state, &input, dt, &mut NullDisplay);
                    prop_assert!((0.0..360.0).contains(&state.camera.angle));
                    prop_assert!((0.0..360.0).contains(&state.windmill.fan_angle));
                    prop_assert!((0.0..360.0).contains(&state.windmill.fan_turn));
                    for entity in &state.entities {
                        prop_assert!((0.0..360.0).contains(&entity.rotation_deg));
                    }
                }
            }
        }
    }
}
