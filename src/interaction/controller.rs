use crate::interaction::move_policy::MovePolicy;
use crate::interaction::resolver::CurveResolver;
use crate::interaction::settle_timer::{SettleTimer, SETTLE_DELAY_SECS};
use crate::processing::curve_edit::{apply_edit, EditCommand};
use crate::state::curve::CurveSet;
use crate::state::interpolation::InterpolationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionPhase {
    Idle,
    Selecting,
    Dragging,
}

/// Which sample is highlighted, and whether it is being dragged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub curve_id: Option<String>,
    pub sample_index: Option<usize>,
    pub is_dragging: bool,
}

impl SelectionState {
    pub fn target(&self) -> Option<(&str, usize)> {
        match (&self.curve_id, self.sample_index) {
            (Some(id), Some(index)) => Some((id.as_str(), index)),
            _ => None,
        }
    }
}

/// Turns pointer events on the chart into edits of the curve set.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    phase: InteractionPhase,
    selection: SelectionState,
    settle: SettleTimer,
    policy: MovePolicy,
    pending_value: Option<f64>,
    hovered_index: Option<usize>,
}

impl Default for InteractionPhase {
    fn default() -> Self {
        InteractionPhase::Idle
    }
}

impl InteractionController {
    pub fn new(policy: MovePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> InteractionPhase {
        self.phase
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == InteractionPhase::Dragging
    }

    pub fn policy(&self) -> MovePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: MovePolicy) {
        self.policy = policy;
    }

    pub fn hovered_index(&self) -> Option<usize> {
        self.hovered_index
    }

    pub fn set_hovered_index(&mut self, index: Option<usize>) {
        self.hovered_index = index;
    }

    /// Time at which the highlighted selection will be cleared, if one is pending.
    pub fn settle_deadline(&self) -> Option<f64> {
        self.settle.deadline()
    }

    /// Start a selection at `index`. `explicit_curve` wins over the resolver
    /// (a click on a hover point names its curve). Returns false when nothing
    /// could be selected.
    pub fn pointer_down(
        &mut self,
        curves: &CurveSet,
        index: usize,
        pointer_value: f64,
        explicit_curve: Option<&str>,
        resolver: &dyn CurveResolver,
    ) -> bool {
        if index >= curves.sample_count() {
            return false;
        }
        let curve_id = match explicit_curve {
            Some(id) if curves.get(id).is_some() => Some(id.to_string()),
            _ => resolver.resolve(curves, index, pointer_value),
        };
        let Some(curve_id) = curve_id else {
            return false;
        };

        // A new selection supersedes any clear still pending from the last release.
        self.settle.cancel();
        self.pending_value = None;

        self.phase = InteractionPhase::Selecting;
        tracing::debug!("Selected {curve_id}[{index}]");
        self.selection = SelectionState {
            curve_id: Some(curve_id),
            sample_index: Some(index),
            is_dragging: false,
        };

        self.phase = InteractionPhase::Dragging;
        self.selection.is_dragging = true;
        true
    }

    /// Feed one pointer-move value. Returns true when `curves` was replaced.
    pub fn pointer_move(&mut self, curves: &mut CurveSet, value: f64, config: &InterpolationConfig) -> bool {
        if self.phase != InteractionPhase::Dragging {
            return false;
        }
        match self.policy {
            MovePolicy::Immediate => self.apply_value(curves, value, config),
            MovePolicy::CoalescePerFrame => {
                self.pending_value = Some(value);
                false
            }
        }
    }

    /// Apply a coalesced move, if any. Called once per frame.
    pub fn flush(&mut self, curves: &mut CurveSet, config: &InterpolationConfig) -> bool {
        match self.pending_value.take() {
            Some(value) => self.apply_value(curves, value, config),
            None => false,
        }
    }

    pub fn pointer_up(&mut self, now: f64) {
        self.release(now);
    }

    pub fn pointer_leave(&mut self, now: f64) {
        self.release(now);
    }

    /// Fire the settle clear if due. Returns true when the selection was cleared.
    pub fn tick(&mut self, now: f64) -> bool {
        if self.settle.poll(now) {
            self.selection = SelectionState::default();
            true
        } else {
            false
        }
    }

    /// Drop selection and pending work, e.g. after the curves were regenerated.
    pub fn reset(&mut self) {
        self.settle.cancel();
        self.pending_value = None;
        self.phase = InteractionPhase::Idle;
        self.selection = SelectionState::default();
    }

    fn release(&mut self, now: f64) {
        if self.phase == InteractionPhase::Idle {
            return;
        }
        self.phase = InteractionPhase::Idle;
        self.selection.is_dragging = false;
        self.settle.schedule(now, SETTLE_DELAY_SECS);
    }

    fn apply_value(&mut self, curves: &mut CurveSet, value: f64, config: &InterpolationConfig) -> bool {
        let Some((curve_id, index)) = self.selection.target() else {
            return false;
        };
        let command = EditCommand::new(curve_id, index, value);
        match apply_edit(curves, &command, config) {
            Ok(updated) => {
                *curves = updated;
                true
            }
            Err(e) => {
                tracing::debug!("Ignored edit: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::resolver::{CurveResolution, FirstCurve, NearestByValue};
    use crate::state::curve::{color_for_index, Curve};
    use crate::state::interpolation::InterpolationKind;

    fn curves() -> CurveSet {
        CurveSet::new(vec![
            Curve::new("a", "A", color_for_index(0), vec![10.0; 5]),
            Curve::new("b", "B", color_for_index(1), vec![150.0; 5]),
        ])
        .unwrap()
    }

    fn step_config() -> InterpolationConfig {
        InterpolationConfig::new(InterpolationKind::Constant, 1, 1.0).unwrap()
    }

    #[test]
    fn pointer_down_enters_dragging_on_first_curve() {
        let set = curves();
        let mut ctl = InteractionController::default();
        assert_eq!(ctl.phase(), InteractionPhase::Idle);
        assert!(ctl.pointer_down(&set, 2, 190.0, None, &FirstCurve));
        assert_eq!(ctl.phase(), InteractionPhase::Dragging);
        assert_eq!(ctl.selection().target(), Some(("a", 2)));
        assert!(ctl.selection().is_dragging);
    }

    #[test]
    fn explicit_curve_overrides_resolver() {
        let set = curves();
        let mut ctl = InteractionController::default();
        assert!(ctl.pointer_down(&set, 1, 0.0, Some("b"), &FirstCurve));
        assert_eq!(ctl.selection().target(), Some(("b", 1)));
    }

    #[test]
    fn unknown_explicit_curve_falls_back_to_resolver() {
        let set = curves();
        let mut ctl = InteractionController::default();
        assert!(ctl.pointer_down(&set, 1, 140.0, Some("nope"), &NearestByValue));
        assert_eq!(ctl.selection().target(), Some(("b", 1)));
    }

    #[test]
    fn pointer_down_outside_index_domain_is_ignored() {
        let set = curves();
        let mut ctl = InteractionController::default();
        assert!(!ctl.pointer_down(&set, 5, 50.0, None, &CurveResolution::FirstCurve));
        assert_eq!(ctl.phase(), InteractionPhase::Idle);
        assert_eq!(ctl.selection(), &SelectionState::default());
    }

    #[test]
    fn every_move_applies_an_edit() {
        let mut set = curves();
        let mut ctl = InteractionController::default();
        ctl.pointer_down(&set, 2, 0.0, None, &FirstCurve);

        assert!(ctl.pointer_move(&mut set, 110.0, &step_config()));
        assert_eq!(set.get("a").unwrap().samples(), &[10.0, 35.0, 110.0, 35.0, 10.0]);

        assert!(ctl.pointer_move(&mut set, 70.0, &step_config()));
        // delta from 110 to 70 is -40, neighbours move by -10
        assert_eq!(set.get("a").unwrap().samples(), &[10.0, 25.0, 70.0, 25.0, 10.0]);
        assert_eq!(set.get("b").unwrap().samples(), &[150.0; 5]);
    }

    #[test]
    fn moves_without_drag_do_nothing() {
        let mut set = curves();
        let mut ctl = InteractionController::default();
        assert!(!ctl.pointer_move(&mut set, 110.0, &step_config()));
        assert_eq!(set.get("a").unwrap().samples(), &[10.0; 5]);
    }

    #[test]
    fn coalescing_applies_only_latest_value_on_flush() {
        let mut set = curves();
        let mut ctl = InteractionController::new(MovePolicy::CoalescePerFrame);
        ctl.pointer_down(&set, 2, 0.0, None, &FirstCurve);

        assert!(!ctl.pointer_move(&mut set, 50.0, &step_config()));
        assert!(!ctl.pointer_move(&mut set, 80.0, &step_config()));
        assert!(!ctl.pointer_move(&mut set, 110.0, &step_config()));
        assert_eq!(set.get("a").unwrap().samples(), &[10.0; 5]);

        assert!(ctl.flush(&mut set, &step_config()));
        assert_eq!(set.get("a").unwrap().samples(), &[10.0, 35.0, 110.0, 35.0, 10.0]);
        assert!(!ctl.flush(&mut set, &step_config()));
    }

    #[test]
    fn release_keeps_highlight_until_settle_delay() {
        let set = curves();
        let mut ctl = InteractionController::default();
        ctl.pointer_down(&set, 3, 0.0, None, &FirstCurve);
        ctl.pointer_up(5.0);

        assert_eq!(ctl.phase(), InteractionPhase::Idle);
        assert!(!ctl.selection().is_dragging);
        assert_eq!(ctl.selection().target(), Some(("a", 3)));

        assert!(!ctl.tick(5.5));
        assert_eq!(ctl.selection().target(), Some(("a", 3)));
        assert!(ctl.tick(6.0));
        assert_eq!(ctl.selection(), &SelectionState::default());
    }

    #[test]
    fn new_selection_is_not_wiped_by_stale_clear() {
        let set = curves();
        let mut ctl = InteractionController::default();
        ctl.pointer_down(&set, 1, 0.0, None, &FirstCurve);
        ctl.pointer_leave(0.0);

        // New press before the old clear would have fired at t=1.0.
        ctl.pointer_down(&set, 4, 0.0, Some("b"), &FirstCurve);
        assert!(!ctl.tick(1.0));
        assert!(!ctl.tick(3.0));
        assert_eq!(ctl.selection().target(), Some(("b", 4)));
        assert!(ctl.is_dragging());
    }

    #[test]
    fn release_while_idle_schedules_nothing() {
        let mut ctl = InteractionController::default();
        ctl.pointer_up(1.0);
        assert_eq!(ctl.settle_deadline(), None);
    }

    #[test]
    fn reset_clears_everything() {
        let set = curves();
        let mut ctl = InteractionController::default();
        ctl.pointer_down(&set, 1, 0.0, None, &FirstCurve);
        ctl.pointer_up(0.0);
        ctl.reset();
        assert_eq!(ctl.settle_deadline(), None);
        assert_eq!(ctl.selection(), &SelectionState::default());
    }
}
