//! Built-in handlers, one per rule kind.
//!
//! Every handler receives the rule it was registered for; the `let ... else`
//! at the top of each closure pulls out the parameters and ignores rules of
//! another shape.

use crate::core::error::ErrorCode;
use crate::core::{Action, GameResult, GameState, GameValue, PendingForcedAction, PlayerId};
use crate::equipment::SecondaryLock;
use crate::hooks::{HookHandler, HookRegistry, HookResult, ResolveEvent};

use super::schema::{MissionHookRuleDef as Rule, TurnOrderMode};

/// Log action name for facts recorded by mission rules.
pub const MISSION_SETUP: &str = "mission_setup";
pub const MISSION_RULE: &str = "mission_rule";

/// Registry with every built-in handler.
#[must_use]
pub fn builtin_registry() -> HookRegistry {
    let mut registry = HookRegistry::new();
    register_builtin_handlers(&mut registry);
    registry
}

pub fn register_builtin_handlers(registry: &mut HookRegistry) {
    registry.register("timer", timer());
    registry.register("dynamic_turn_order", dynamic_turn_order());
    registry.register("blue_value_treated_as_red", blue_value_treated_as_red());
    registry.register("equipment_double_lock", equipment_double_lock());
    registry.register("sequence_priority", sequence_priority());
    registry.register("equipment_unlock_threshold", equipment_unlock_threshold());
    registry.register("oxygen", oxygen());
    registry.register("reverse_turn_order", reverse_turn_order());
    registry.register("captain_equipment_ban", captain_equipment_ban());
    registry.register("x_marked_wires", x_marked_wires());
    registry.register("cut_value_advances_detonator", cut_value_advances_detonator());
    registry.register("equipment_discard", equipment_discard());
    registry.register("target_chooses_detector_tile", target_chooses_detector_tile());
    registry.register("rotating_constraint", rotating_constraint());
}

fn timer() -> HookHandler {
    HookHandler::new().on_setup(|rule, state| {
        let Rule::Timer { duration_seconds } = rule else {
            return HookResult::none();
        };
        state.campaign_mut().deadline_seconds = Some(*duration_seconds);
        state.log(None, MISSION_SETUP, format!("timer:{duration_seconds}"));
        HookResult::none()
    })
}

fn dynamic_turn_order() -> HookHandler {
    HookHandler::new().on_end_turn(|rule, state, info| {
        let Rule::DynamicTurnOrder { mode } = rule else {
            return HookResult::none();
        };
        // Nothing to choose with a single seat left.
        if state.players.iter().filter(|p| p.has_uncut()).count() < 2 {
            return HookResult::none();
        }
        let pending = match mode {
            TurnOrderMode::CaptainChooses => {
                PendingForcedAction::ChooseNextPlayer { chooser: state.captain() }
            }
            TurnOrderMode::ActiveDesignates => {
                PendingForcedAction::DesignateCutter { designator: info.previous }
            }
        };
        HookResult::none().with_forced_action(pending)
    })
}

fn blue_value_treated_as_red() -> HookHandler {
    HookHandler::new()
        .on_setup(|rule, state| {
            let Rule::BlueValueTreatedAsRed { candidates } = rule else {
                return HookResult::none();
            };
            let value = if candidates.is_empty() {
                state.rng.pick_value(GameValue::MIN, GameValue::MAX)
            } else {
                candidates[state.rng.pick_index(candidates.len())]
            };
            state.campaign_mut().blue_as_red = Some(value);
            state.log_setup_only(MISSION_SETUP, format!("blue_as_red:{value}"));
            HookResult::none()
        })
        .on_resolve(|_, state, event| {
            let hidden = state.campaign.as_ref().and_then(|c| c.blue_as_red);
            let (Some(hidden), Some(GameValue::Number(cut))) = (hidden, event.cut_value()) else {
                return HookResult::none();
            };
            if cut == hidden {
                state.log(Some(event.actor()), MISSION_RULE, format!("blue_as_red:{hidden}"));
                state.finish(GameResult::LossRedWire);
            }
            HookResult::none()
        })
}

fn equipment_double_lock() -> HookHandler {
    HookHandler::new().on_setup(|rule, state| {
        let Rule::EquipmentDoubleLock { secondary_value, threshold, equipment } = rule else {
            return HookResult::none();
        };
        for card in &mut state.board.equipment {
            if equipment.is_empty() || equipment.contains(&card.id) {
                card.secondary = Some(SecondaryLock {
                    value: *secondary_value,
                    threshold: *threshold,
                    cleared: false,
                });
            }
        }
        state.log(None, MISSION_SETUP, format!("double_lock:{secondary_value}:{threshold}"));
        HookResult::none()
    })
}

fn sequence_priority() -> HookHandler {
    HookHandler::new().on_validate(|rule, ctx| {
        let Rule::SequencePriority { sequence } = rule else {
            return HookResult::none();
        };
        let Some(GameValue::Number(value)) = ctx.action.cut_value() else {
            return HookResult::none();
        };
        let Some(pos) = sequence.iter().position(|&v| v == value) else {
            return HookResult::none();
        };
        match pos.checked_sub(1).map(|p| sequence[p]) {
            Some(prev) if !ctx.state.board.is_complete(GameValue::Number(prev)) => HookResult::reject(
                ErrorCode::MissionRuleViolation,
                format!("every {prev} must be cut before {value}"),
            ),
            _ => HookResult::none(),
        }
    })
}

fn equipment_unlock_threshold() -> HookHandler {
    HookHandler::new().on_resolve(|rule, _, _| match rule {
        Rule::EquipmentUnlockThreshold { threshold } => {
            HookResult::none().with_unlock_threshold(*threshold)
        }
        _ => HookResult::none(),
    })
}

fn oxygen() -> HookHandler {
    HookHandler::new()
        .on_setup(|rule, state| {
            if let Rule::Oxygen { initial, .. } = rule {
                state.campaign_mut().oxygen = Some(*initial);
            }
            HookResult::none()
        })
        .on_end_turn(|rule, state, _| {
            let Rule::Oxygen { initial, per_turn } = rule else {
                return HookResult::none();
            };
            let campaign = state.campaign_mut();
            let left = campaign.oxygen.unwrap_or(*initial).saturating_sub(*per_turn);
            if left == 0 {
                campaign.oxygen = Some(*initial);
                state.board.detonator = state.board.detonator.saturating_add(1);
                state.log(None, MISSION_RULE, "oxygen:depleted");
            } else {
                campaign.oxygen = Some(left);
            }
            HookResult::none()
        })
}

fn reverse_turn_order() -> HookHandler {
    HookHandler::new().on_end_turn(|_, state, info| {
        let count = state.player_count();
        let mut seat = info.previous;
        for _ in 0..count {
            seat = seat.counter_clockwise(count);
            if state.player(seat).is_some_and(|p| p.has_uncut()) {
                return HookResult::none().with_next_player(seat);
            }
        }
        HookResult::none()
    })
}

fn captain_equipment_ban() -> HookHandler {
    HookHandler::new().on_validate(|_, ctx| {
        let is_captain = ctx.state.player(ctx.actor).is_some_and(|p| p.is_captain);
        if is_captain && matches!(ctx.action, Action::UseEquipment { .. }) {
            return HookResult::reject(
                ErrorCode::MissionRuleViolation,
                "the captain cannot use equipment in this mission",
            );
        }
        HookResult::none()
    })
}

fn x_marked_wires() -> HookHandler {
    HookHandler::new()
        .on_setup(|rule, state| {
            let Rule::XMarkedWires { per_player } = rule else {
                return HookResult::none();
            };
            for seat in 0..state.player_count() {
                for _ in 0..*per_player {
                    let candidates: Vec<usize> = state.players[seat]
                        .hand
                        .iter()
                        .enumerate()
                        .filter(|(_, t)| t.is_blue() && !t.x_marked)
                        .map(|(i, _)| i)
                        .collect();
                    if candidates.is_empty() {
                        break;
                    }
                    let index = candidates[state.rng.pick_index(candidates.len())];
                    state.players[seat].hand[index].x_marked = true;
                    state.log(None, MISSION_SETUP, format!("x_marked:{seat}:{index}"));
                }
            }
            HookResult::none()
        })
        .on_validate(|_, ctx| {
            let marked = |target: PlayerId, index: usize| {
                ctx.state
                    .player(target)
                    .and_then(|p| p.tile(index))
                    .is_some_and(|t| t.x_marked)
            };
            let blocked = match ctx.action {
                Action::DualCut { target, tile_index, .. } => marked(*target, *tile_index),
                Action::DoubleDetector { target, tile_indices, .. } => {
                    tile_indices.iter().any(|&i| marked(*target, i))
                }
                _ => false,
            };
            if blocked {
                HookResult::reject(ErrorCode::MissionRuleViolation, "X-marked wires cannot be targeted")
            } else {
                HookResult::none()
            }
        })
}

fn cut_value_advances_detonator() -> HookHandler {
    HookHandler::new().on_resolve(|rule, state, event| {
        let Rule::CutValueAdvancesDetonator { value } = rule else {
            return HookResult::none();
        };
        if event.cut_value() == Some(GameValue::Number(*value)) {
            state.board.detonator = state.board.detonator.saturating_add(1);
            state.log(Some(event.actor()), MISSION_RULE, format!("detonator_on_cut:{value}"));
        }
        HookResult::none()
    })
}

fn equipment_discard() -> HookHandler {
    HookHandler::new().on_resolve(|rule, state, _| {
        let Rule::EquipmentDiscard { trigger_value } = rule else {
            return HookResult::none();
        };
        let already = state.campaign.as_ref().is_some_and(|c| c.equipment_discarded);
        if already || state.count_cut(GameValue::Number(*trigger_value)) == 0 {
            return HookResult::none();
        }
        let discarded = state
            .board
            .equipment
            .iter()
            .filter(|c| !c.used)
            .map(|c| c.id)
            .min();
        state.campaign_mut().equipment_discarded = true;
        if let Some(id) = discarded {
            state.board.equipment.retain(|c| c.id != id);
            let detail = format!("m{}:equipment_discard:{id}", state.mission);
            state.log(None, MISSION_RULE, detail);
        }
        HookResult::none()
    })
}

fn target_chooses_detector_tile() -> HookHandler {
    HookHandler::new().on_resolve(|_, _, event| {
        let ResolveEvent::DetectorDeclared { actor, target, tile_indices, guess } = event else {
            return HookResult::none();
        };
        HookResult::none().with_forced_action(PendingForcedAction::DetectorTileChoice {
            chooser: *target,
            actor: *actor,
            tile_indices: *tile_indices,
            guess: *guess,
            actor_tile_index: None,
        })
    })
}

fn rotating_constraint() -> HookHandler {
    HookHandler::new()
        .on_setup(|rule, state| {
            let Rule::RotatingConstraint { forbidden_values } = rule else {
                return HookResult::none();
            };
            if let Some(first) = forbidden_values.first() {
                state.campaign_mut().active_constraint = Some(0);
                state.log(None, MISSION_SETUP, format!("constraint:{first}"));
            }
            HookResult::none()
        })
        .on_validate(|rule, ctx| {
            let Rule::RotatingConstraint { forbidden_values } = rule else {
                return HookResult::none();
            };
            let active = ctx
                .state
                .campaign
                .as_ref()
                .and_then(|c| c.active_constraint)
                .and_then(|i| forbidden_values.get(i));
            match (active, ctx.action.cut_value()) {
                (Some(&forbidden), Some(GameValue::Number(v))) if v == forbidden => HookResult::reject(
                    ErrorCode::MissionRuleViolation,
                    format!("the active constraint forbids naming {forbidden}"),
                ),
                _ => HookResult::none(),
            }
        })
        .on_end_turn(|rule, state, info| {
            let Rule::RotatingConstraint { forbidden_values } = rule else {
                return HookResult::none();
            };
            // A round ends when play wraps past the last seat.
            if forbidden_values.len() < 2 || info.next > info.previous {
                return HookResult::none();
            }
            HookResult::none().with_forced_action(PendingForcedAction::ConstraintRotate {
                chooser: state.captain(),
                options: forbidden_values.len(),
            })
        })
}
