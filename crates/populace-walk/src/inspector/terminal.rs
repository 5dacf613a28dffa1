use super::Inspector;

/// Inspector for values that are never descended into
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalInspector;

impl Inspector for TerminalInspector {
    fn name(&self) -> &'static str {
        "terminal"
    }
}
