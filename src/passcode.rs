//! Six-cell numeric passcode gate
//!
//! Pure cell state. Focus moves and verification timing are returned to the
//! caller as outcomes rather than performed here.

use crate::consts::{PASSCODE, PASSCODE_LEN};

/// Result of a value change in one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOutcome {
    /// Not a single digit; the cell was reverted to empty
    Rejected,
    /// Digit stored
    Accepted {
        /// Cell to focus next, if any
        focus: Option<usize>,
        /// The last cell was filled, verification is due
        verify: bool,
    },
}

/// Result of a paste
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteOutcome {
    /// Empty or non-numeric clipboard text; no cell changed
    Rejected,
    /// Exactly six digits pasted, verification is due
    Complete,
    /// Fewer digits pasted; focus the given cell (first empty after the run)
    Partial { focus: Option<usize> },
}

/// Result of a verification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Not all cells filled (or the gate already opened); nothing happens
    Incomplete,
    Accepted,
    Rejected,
}

/// Cell contents of the gate
#[derive(Debug, Clone, Default)]
pub struct PasscodeGate {
    cells: [Option<char>; PASSCODE_LEN],
    unlocked: bool,
}

impl PasscodeGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Option<char>; PASSCODE_LEN] {
        &self.cells
    }

    /// Cell value as displayed ("" when empty)
    pub fn cell_text(&self, index: usize) -> String {
        self.cells
            .get(index)
            .copied()
            .flatten()
            .map(String::from)
            .unwrap_or_default()
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Handle the new value of cell `index` after a user edit
    pub fn input(&mut self, index: usize, value: &str) -> CellOutcome {
        let Some(cell) = self.cells.get_mut(index) else {
            return CellOutcome::Rejected;
        };

        let mut chars = value.chars();
        let digit = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_digit() => c,
            _ => {
                *cell = None;
                return CellOutcome::Rejected;
            }
        };
        *cell = Some(digit);

        let last = PASSCODE_LEN - 1;
        CellOutcome::Accepted {
            focus: (index < last).then_some(index + 1),
            verify: index == last,
        }
    }

    /// Backspace pressed in cell `index`; returns the cell to focus
    pub fn backspace(&self, index: usize) -> Option<usize> {
        let empty = self.cells.get(index).is_some_and(|c| c.is_none());
        (empty && index > 0).then(|| index - 1)
    }

    /// Distribute pasted text across the cells starting at `start`
    pub fn paste(&mut self, start: usize, text: &str) -> PasteOutcome {
        let digits: Vec<char> = text.chars().take(PASSCODE_LEN).collect();
        if digits.is_empty() || !digits.iter().all(char::is_ascii_digit) || start >= PASSCODE_LEN {
            return PasteOutcome::Rejected;
        }

        for (cell, &d) in self.cells[start..].iter_mut().zip(&digits) {
            *cell = Some(d);
        }

        if digits.len() == PASSCODE_LEN {
            return PasteOutcome::Complete;
        }
        let after = (start + digits.len()).min(PASSCODE_LEN);
        let focus = (after..PASSCODE_LEN).find(|&i| self.cells[i].is_none());
        PasteOutcome::Partial { focus }
    }

    /// The concatenated attempt, if every cell holds a digit
    pub fn attempt(&self) -> Option<String> {
        self.cells.iter().copied().collect::<Option<String>>()
    }

    /// Compare the current attempt to the secret
    pub fn verify(&mut self) -> Verdict {
        if self.unlocked {
            return Verdict::Incomplete;
        }
        match self.attempt() {
            Some(attempt) if attempt.len() == PASSCODE_LEN => {
                if attempt == PASSCODE {
                    self.unlocked = true;
                    Verdict::Accepted
                } else {
                    Verdict::Rejected
                }
            }
            _ => Verdict::Incomplete,
        }
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells = [None; PASSCODE_LEN];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn type_code(gate: &mut PasscodeGate, code: &str) {
        for (i, ch) in code.chars().enumerate() {
            gate.input(i, &ch.to_string());
        }
    }

    #[test]
    fn test_input_advances_focus() {
        let mut gate = PasscodeGate::new();
        assert_eq!(
            gate.input(0, "2"),
            CellOutcome::Accepted { focus: Some(1), verify: false }
        );
        assert_eq!(
            gate.input(5, "5"),
            CellOutcome::Accepted { focus: None, verify: true }
        );
    }

    #[test]
    fn test_input_rejects_non_digits() {
        let mut gate = PasscodeGate::new();
        gate.input(0, "7");
        assert_eq!(gate.input(0, "x"), CellOutcome::Rejected);
        assert_eq!(gate.cell_text(0), "");
        assert_eq!(gate.input(1, "12"), CellOutcome::Rejected);
        assert_eq!(gate.input(2, ""), CellOutcome::Rejected);
        assert_eq!(gate.input(3, "٣"), CellOutcome::Rejected);
        assert_eq!(gate.input(9, "1"), CellOutcome::Rejected);
        assert!(gate.cells().iter().all(Option::is_none));
    }

    #[test]
    fn test_backspace_moves_back_only_from_empty() {
        let mut gate = PasscodeGate::new();
        assert_eq!(gate.backspace(3), Some(2));
        assert_eq!(gate.backspace(0), None);
        gate.input(3, "1");
        assert_eq!(gate.backspace(3), None);
    }

    #[test]
    fn test_paste_full_code() {
        let mut gate = PasscodeGate::new();
        assert_eq!(gate.paste(0, "123456"), PasteOutcome::Complete);
        let cells: Vec<String> = (0..6).map(|i| gate.cell_text(i)).collect();
        assert_eq!(cells, ["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_paste_with_letter_is_rejected() {
        let mut gate = PasscodeGate::new();
        gate.input(0, "9");
        assert_eq!(gate.paste(0, "12a456"), PasteOutcome::Rejected);
        assert_eq!(gate.cell_text(0), "9");
        assert!(gate.cells()[1..].iter().all(Option::is_none));
        assert_eq!(gate.paste(0, ""), PasteOutcome::Rejected);
    }

    #[test]
    fn test_paste_truncates_to_six() {
        let mut gate = PasscodeGate::new();
        assert_eq!(gate.paste(0, "2510259999x"), PasteOutcome::Complete);
        assert_eq!(gate.attempt().as_deref(), Some("251025"));
    }

    #[test]
    fn test_full_paste_into_later_cell_leaves_gap() {
        let mut gate = PasscodeGate::new();
        assert_eq!(gate.paste(2, PASSCODE), PasteOutcome::Complete);
        assert_eq!(gate.cells()[..2], [None, None]);
        assert_eq!(gate.cell_text(2), "2");
        assert_eq!(gate.cell_text(5), "0");
        assert_eq!(gate.attempt(), None);
        assert_eq!(gate.verify(), Verdict::Incomplete);
    }

    #[test]
    fn test_partial_paste_from_focused_cell() {
        let mut gate = PasscodeGate::new();
        assert_eq!(gate.paste(1, "12"), PasteOutcome::Partial { focus: Some(3) });
        assert_eq!(gate.cell_text(0), "");
        assert_eq!(gate.cell_text(1), "1");
        assert_eq!(gate.cell_text(2), "2");

        // Run reaching the end drops the overflow and has nowhere to focus
        let mut gate = PasscodeGate::new();
        assert_eq!(gate.paste(4, "789"), PasteOutcome::Partial { focus: None });
        assert_eq!(gate.cell_text(4), "7");
        assert_eq!(gate.cell_text(5), "8");
    }

    #[test]
    fn test_verify() {
        let mut gate = PasscodeGate::new();
        type_code(&mut gate, "25102");
        assert_eq!(gate.verify(), Verdict::Incomplete);

        type_code(&mut gate, "123456");
        assert_eq!(gate.verify(), Verdict::Rejected);
        assert!(!gate.is_unlocked());

        gate.clear();
        type_code(&mut gate, PASSCODE);
        assert_eq!(gate.verify(), Verdict::Accepted);
        assert!(gate.is_unlocked());
        // Further attempts are ignored once open
        assert_eq!(gate.verify(), Verdict::Incomplete);
    }

    proptest! {
        #[test]
        fn prop_only_secret_unlocks(code in "[0-9]{6}") {
            let mut gate = PasscodeGate::new();
            prop_assert_eq!(gate.paste(0, &code), PasteOutcome::Complete);
            let verdict = gate.verify();
            if code == PASSCODE {
                prop_assert_eq!(verdict, Verdict::Accepted);
            } else {
                prop_assert_eq!(verdict, Verdict::Rejected);
            }
        }

        #[test]
        fn prop_short_attempts_never_verify(code in "[0-9]{0,5}") {
            let mut gate = PasscodeGate::new();
            type_code(&mut gate, &code);
            prop_assert_eq!(gate.verify(), Verdict::Incomplete);
        }

        #[test]
        fn prop_non_digit_paste_changes_nothing(text in "[0-9]{0,3}[^0-9][0-9]{0,2}") {
            let mut gate = PasscodeGate::new();
            prop_assert_eq!(gate.paste(0, &text), PasteOutcome::Rejected);
            prop_assert!(gate.cells().iter().all(Option::is_none));
        }
    }
}
