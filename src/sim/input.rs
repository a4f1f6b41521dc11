//! Input resolution
//!
//! Discrete actions (button presses, single key taps) either mutate the scene
//! immediately (light/fan toggles) or resolve a tug round and queue the pull
//! for the stepper. Continuous motion (camera, windmill yaw) is carried as
//! held-key state and integrated by the tick instead.

use serde::{Deserialize, Serialize};

use super::rps::{self, Hand, Outcome};
use super::state::{GamePhase, SceneState};
use crate::display::StatusDisplay;

/// The closed set of discrete player actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    ChooseRock,
    ChoosePaper,
    ChooseScissors,
    /// Re-announce the final result after the match has ended
    AcknowledgeResult,
    /// Start/stop the windmill fan
    ToggleFan,
    /// Flip a point light on or off
    ToggleLight(u8),
}

impl PlayerAction {
    fn hand(&self) -> Option<Hand> {
        match self {
            PlayerAction::ChooseRock => Some(Hand::Rock),
            PlayerAction::ChoosePaper => Some(Hand::Paper),
            PlayerAction::ChooseScissors => Some(Hand::Scissors),
            _ => None,
        }
    }
}

/// Keys currently held down, sampled every tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub turn_left: bool,
    pub turn_right: bool,
    pub forward: bool,
    pub backward: bool,
    /// Yaw the windmill base while held
    pub yaw_base: bool,
}

impl HeldKeys {
    /// Release everything (focus loss, demo switch)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Apply one discrete action to the scene.
///
/// Returns the round outcome when the action resolved a tug round, `None`
/// otherwise. At a terminal score every action except [`PlayerAction::AcknowledgeResult`]
/// is ignored.
pub fn resolve(
    state: &mut SceneState,
    action: PlayerAction,
    display: &mut dyn StatusDisplay,
) -> Option<Outcome> {
    if let Some(player) = action.hand() {
        if state.is_terminal() {
            log::debug!("round ignored: match is over");
            return None;
        }
        if state.phase != GamePhase::Idle {
            // One outcome per press; drop input while a round animates
            return None;
        }
        return Some(play_round(state, player, display));
    }

    match action {
        PlayerAction::ToggleFan => {
            state.windmill.toggle_fan();
            log::debug!("fan enabled: {}", state.windmill.fan_enabled);
        }
        PlayerAction::ToggleLight(index) => state.toggle_light(index),
        PlayerAction::AcknowledgeResult => {
            if let GamePhase::GameOver { winner } = state.phase {
                display.set_hands(winner.banner());
            }
        }
        _ => {}
    }
    None
}

/// Resolve a round: draw the AI hand, judge, update the score and queue the
/// pull animation. The display gets "{player} vs {ai}" and the new score.
fn play_round(state: &mut SceneState, player: Hand, display: &mut dyn StatusDisplay) -> Outcome {
    let ai = rps::ai_hand(state.seed, state.rounds_played);
    state.rounds_played += 1;

    let outcome = rps::judge(player, ai);
    state.add_score(outcome.score_delta());

    display.set_hands(&format!("{} vs {}", player.as_str(), ai.as_str()));
    display.set_score(&format!("Score: {}", state.score));

    state.pending_pull = Some(outcome.direction());
    state.phase = GamePhase::RoundInProgress;

    log::debug!(
        "round {}: {:?} vs {:?} -> {:?} (score {})",
        state.rounds_played,
        player,
        ai,
        outcome,
        state.score
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::RecordingDisplay;
    use crate::sim::state::Winner;

    #[test]
    fn test_round_queues_pull_and_reports() {
        let mut state = SceneState::new(7);
        let mut display = RecordingDisplay::new();

        let outcome = resolve(&mut state, PlayerAction::ChooseRock, &mut display);
        assert!(outcome.is_some());
        assert_eq!(state.phase, GamePhase::RoundInProgress);
        assert!(state.pending_pull.is_some());
        assert_eq!(state.rounds_played, 1);

        let hands = display.last_hands().unwrap();
        assert!(hands.starts_with("ROCK vs "));
        assert_eq!(
            display.last_score().unwrap(),
            format!("Score: {}", state.score)
        );
    }

    #[test]
    fn test_round_ignored_while_animating() {
        let mut state = SceneState::new(7);
        let mut display = RecordingDisplay::new();
        resolve(&mut state, PlayerAction::ChooseRock, &mut display);
        let rounds = state.rounds_played;

        // Second press before the stepper ran: no double-counting
        let outcome = resolve(&mut state, PlayerAction::ChoosePaper, &mut display);
        assert!(outcome.is_none());
        assert_eq!(state.rounds_played, rounds);
    }

    #[test]
    fn test_terminal_ignores_hands_but_acknowledges() {
        let mut state = SceneState::new(7);
        let mut display = RecordingDisplay::new();
        state.phase = GamePhase::GameOver {
            winner: Winner::Player,
        };
        state.score = 3;

        assert!(resolve(&mut state, PlayerAction::ChooseScissors, &mut display).is_none());
        assert_eq!(state.rounds_played, 0);
        assert!(display.hands.is_empty());

        resolve(&mut state, PlayerAction::AcknowledgeResult, &mut display);
        assert_eq!(display.last_hands(), Some("Player WINS!"));
    }

    #[test]
    fn test_toggles_apply_immediately() {
        let mut state = SceneState::new(7);
        let mut display = RecordingDisplay::new();
        state.windmill = crate::sim::state::Windmill::running();

        resolve(&mut state, PlayerAction::ToggleFan, &mut display);
        assert!(!state.windmill.fan_enabled);
        resolve(&mut state, PlayerAction::ToggleLight(1), &mut display);
        assert!(!state.lights[1]);
    }
}
