use crate::config;

/// The password-style prompt guarding the gift reveal. Not a security
/// boundary: the phrase is a fixed string compared in plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDialog {
    Hidden,
    Prompt,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Matched,
    Mismatched,
}

#[derive(Debug)]
pub struct Gate {
    pub dialog: GateDialog,
    pub input: String,
}

impl Gate {
    pub fn new() -> Self {
        Self {
            dialog: GateDialog::Hidden,
            input: String::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.dialog != GateDialog::Hidden
    }

    pub fn open_prompt(&mut self) {
        self.input.clear();
        self.dialog = GateDialog::Prompt;
    }

    pub fn close(&mut self) {
        self.input.clear();
        self.dialog = GateDialog::Hidden;
    }

    pub fn push_char(&mut self, ch: char) {
        if self.dialog == GateDialog::Prompt {
            self.input.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if self.dialog == GateDialog::Prompt {
            self.input.pop();
        }
    }

    /// Trims and lowercases the entry, then compares against the fixed
    /// phrase. Either way the prompt closes and the verdict dialog opens.
    pub fn submit(&mut self) -> GateOutcome {
        let matched = self.input.trim().to_lowercase() == config::GATE_PHRASE;
        self.input.clear();
        if matched {
            self.dialog = GateDialog::Success;
            GateOutcome::Matched
        } else {
            self.dialog = GateDialog::Error;
            GateOutcome::Mismatched
        }
    }

    /// From the error dialog back to a fresh prompt.
    pub fn retry(&mut self) {
        if self.dialog == GateDialog::Error {
            self.open_prompt();
        }
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_mixed_case_phrase_matches() {
        let mut gate = Gate::new();
        gate.open_prompt();
        for ch in " Heebie Jeebies ".chars() {
            gate.push_char(ch);
        }
        assert_eq!(gate.submit(), GateOutcome::Matched);
        assert_eq!(gate.dialog, GateDialog::Success);
    }

    #[test]
    fn typo_lands_on_error_with_retry_path() {
        let mut gate = Gate::new();
        gate.open_prompt();
        for ch in "heebie jeebie".chars() {
            gate.push_char(ch);
        }
        assert_eq!(gate.submit(), GateOutcome::Mismatched);
        assert_eq!(gate.dialog, GateDialog::Error);

        gate.retry();
        assert_eq!(gate.dialog, GateDialog::Prompt);
        assert!(gate.input.is_empty());
    }

    #[test]
    fn close_clears_input_and_hides() {
        let mut gate = Gate::new();
        gate.open_prompt();
        gate.push_char('x');
        gate.close();
        assert_eq!(gate.dialog, GateDialog::Hidden);
        assert!(gate.input.is_empty());
    }

    #[test]
    fn input_only_accepted_while_prompt_is_open() {
        let mut gate = Gate::new();
        gate.push_char('a');
        assert!(gate.input.is_empty());

        gate.open_prompt();
        gate.push_char('a');
        gate.submit();
        gate.push_char('b');
        assert!(gate.input.is_empty());
    }

    #[test]
    fn backspace_edits_the_buffer() {
        let mut gate = Gate::new();
        gate.open_prompt();
        gate.push_char('h');
        gate.push_char('j');
        gate.backspace();
        assert_eq!(gate.input, "h");
    }
}
