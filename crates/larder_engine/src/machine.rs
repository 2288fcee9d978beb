//! Scan state machine.
//!
//! Pure transition function: feeding one scanned token to [`ScanState`]
//! updates the state and yields a discrete [`Effect`] for the caller to
//! execute. No side effects happen here, so the transition table is
//! testable on its own.

use larder_protocol::vocab::{self, ActionCode, ControlCode, FunctionCode, Mode};

/// Current interpreter state: a sticky mode plus an optionally armed
/// one-shot action. Created once per interactive session; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanState {
    pub mode: Mode,
    pub pending: Option<ActionCode>,
}

impl Default for ScanState {
    fn default() -> Self {
        Self {
            mode: Mode::Add,
            pending: None,
        }
    }
}

/// What the caller should do in response to one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Reserved function code: run it, state unchanged.
    Function(FunctionCode),
    /// Persistent mode changed; any armed action was cleared.
    ModeSet(Mode),
    /// One-shot action armed for the next ordinary scan.
    ActionArmed(ActionCode),
    /// Execute an armed one-shot action against `code`.
    RunAction { action: ActionCode, code: String },
    /// Ordinary scan dispatched under the current mode.
    Dispatch { mode: Mode, code: String },
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one scanned token.
    ///
    /// Rules, evaluated in order: function codes leave state untouched;
    /// mode codes set the sticky mode and clear any armed action; action
    /// codes arm a one-shot; with an action armed, the scan is its target
    /// and the machine resets to `Add` with no armed action; otherwise the
    /// scan dispatches under the current mode.
    pub fn apply(&mut self, code: &str) -> Effect {
        match vocab::classify(code) {
            Some(ControlCode::Function(function)) => Effect::Function(function),
            Some(ControlCode::Mode(mode)) => {
                self.mode = mode;
                self.pending = None;
                Effect::ModeSet(mode)
            }
            Some(ControlCode::Action(action)) => {
                self.pending = Some(action);
                Effect::ActionArmed(action)
            }
            None => match self.pending.take() {
                Some(action) => {
                    // One-shot actions always land back in ADD, even if a
                    // different mode was active before the action.
                    self.mode = Mode::Add;
                    Effect::RunAction {
                        action,
                        code: code.to_string(),
                    }
                }
                None => Effect::Dispatch {
                    mode: self.mode,
                    code: code.to_string(),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_protocol::vocab::{
        CODE_ACTION_ADD_QUANTITY, CODE_ACTION_DELETE, CODE_ACTION_RENAME, CODE_MODE_PRINT_QUANTITY,
        CODE_MODE_REMOVE, CODE_PRINT_INVENTORY,
    };

    #[test]
    fn test_initial_state() {
        let state = ScanState::new();
        assert_eq!(state.mode, Mode::Add);
        assert_eq!(state.pending, None);
    }

    #[test]
    fn test_ordinary_scan_dispatches_under_current_mode() {
        let mut state = ScanState::new();
        assert_eq!(
            state.apply("123"),
            Effect::Dispatch {
                mode: Mode::Add,
                code: "123".to_string()
            }
        );

        state.apply(CODE_MODE_REMOVE);
        assert_eq!(
            state.apply("123"),
            Effect::Dispatch {
                mode: Mode::Remove,
                code: "123".to_string()
            }
        );
    }

    #[test]
    fn test_function_code_leaves_state_unchanged() {
        let mut state = ScanState::new();
        state.apply(CODE_MODE_REMOVE);
        state.apply(CODE_ACTION_DELETE);
        let before = state;
        assert_eq!(
            state.apply(CODE_PRINT_INVENTORY),
            Effect::Function(FunctionCode::PrintInventory)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_mode_code_clears_armed_action() {
        let mut state = ScanState::new();
        state.apply(CODE_ACTION_DELETE);
        assert_eq!(state.pending, Some(ActionCode::Delete));
        state.apply(CODE_MODE_PRINT_QUANTITY);
        assert_eq!(state.mode, Mode::PrintQuantity);
        assert_eq!(state.pending, None);
    }

    #[test]
    fn test_one_shot_consumes_next_scan_and_resets_to_add() {
        let mut state = ScanState::new();
        state.apply(CODE_MODE_REMOVE);
        state.apply(CODE_ACTION_RENAME);
        assert_eq!(
            state.apply("555"),
            Effect::RunAction {
                action: ActionCode::Rename,
                code: "555".to_string()
            }
        );
        // The mode active before the action is not restored.
        assert_eq!(state.mode, Mode::Add);
        assert_eq!(state.pending, None);
    }

    #[test]
    fn test_rearming_replaces_pending_action() {
        let mut state = ScanState::new();
        state.apply(CODE_ACTION_DELETE);
        state.apply(CODE_ACTION_ADD_QUANTITY);
        assert_eq!(state.pending, Some(ActionCode::AddQuantity));
    }
}
