//! Agent phase machine
//!
//! The tool-calling loop is an explicit deterministic state machine:
//!
//! `Start → ToolSelection → {ToolExecution → ToolSelection}* → FinalAnswer`
//!
//! Each loop turn validates its transition, so an out-of-order step is a
//! programming error surfaced as [`RagError::InvalidPhase`] instead of a
//! silently wedged loop.

use crate::errors::{RagError, Result};
use serde::{Deserialize, Serialize};

/// Phases of the tool-calling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentPhase {
    /// Question received, conversation not yet sent to the model
    Start,

    /// The model is choosing between tool calls and a final answer
    ToolSelection,

    /// Requested tools are being executed
    ToolExecution,

    /// A final text answer was produced (terminal)
    FinalAnswer,
}

/// Events that drive phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    /// The initial question message was composed
    QuestionReceived,

    /// The model emitted one or more tool invocations
    ToolsRequested,

    /// All requested tools ran and results were appended
    ToolsCompleted,

    /// The model emitted a message with no further tool invocation
    AnswerEmitted,
}

impl AgentPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentPhase::FinalAnswer)
    }

    /// Attempt a phase transition.
    ///
    /// Valid edges:
    /// - Start         → ToolSelection (QuestionReceived)
    /// - ToolSelection → ToolExecution (ToolsRequested)
    /// - ToolSelection → FinalAnswer   (AnswerEmitted)
    /// - ToolExecution → ToolSelection (ToolsCompleted)
    pub fn transition(&self, event: PhaseEvent) -> Result<AgentPhase> {
        use AgentPhase::*;
        use PhaseEvent::*;

        match (self, event) {
            (Start, QuestionReceived) => Ok(ToolSelection),
            (ToolSelection, ToolsRequested) => Ok(ToolExecution),
            (ToolSelection, AnswerEmitted) => Ok(FinalAnswer),
            (ToolExecution, ToolsCompleted) => Ok(ToolSelection),
            (from, event) => Err(RagError::InvalidPhase {
                from: format!("{:?}", from),
                to: format!("(via {:?})", event),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_without_tools() {
        let phase = AgentPhase::Start
            .transition(PhaseEvent::QuestionReceived)
            .unwrap();
        assert_eq!(phase, AgentPhase::ToolSelection);

        let phase = phase.transition(PhaseEvent::AnswerEmitted).unwrap();
        assert_eq!(phase, AgentPhase::FinalAnswer);
        assert!(phase.is_terminal());
    }

    #[test]
    fn test_tool_round_trip() {
        let phase = AgentPhase::ToolSelection
            .transition(PhaseEvent::ToolsRequested)
            .unwrap();
        assert_eq!(phase, AgentPhase::ToolExecution);

        let phase = phase.transition(PhaseEvent::ToolsCompleted).unwrap();
        assert_eq!(phase, AgentPhase::ToolSelection);
    }

    #[test]
    fn test_terminal_phase_rejects_events() {
        let result = AgentPhase::FinalAnswer.transition(PhaseEvent::ToolsRequested);
        assert!(matches!(result, Err(RagError::InvalidPhase { .. })));
    }

    #[test]
    fn test_invalid_transitions_rejected() {
        assert!(AgentPhase::Start
            .transition(PhaseEvent::AnswerEmitted)
            .is_err());
        assert!(AgentPhase::ToolExecution
            .transition(PhaseEvent::ToolsRequested)
            .is_err());
    }

    #[test]
    fn test_determinism() {
        let a = AgentPhase::ToolSelection.transition(PhaseEvent::ToolsRequested);
        let b = AgentPhase::ToolSelection.transition(PhaseEvent::ToolsRequested);
        assert_eq!(a.unwrap(), b.unwrap());
    }
}
