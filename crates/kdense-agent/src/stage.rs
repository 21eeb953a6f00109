use serde::Serialize;
use tracing::debug;

/// Orchestrator lifecycle. `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    Retrieving,
    Planning,
    Generating,
    Validating,
    Done,
    Failed,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Retrieving => "retrieving",
            Self::Planning => "planning",
            Self::Generating => "generating",
            Self::Validating => "validating",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool { matches!(self, Self::Done | Self::Failed) }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Stages visited by one run, starting at `Idle`.
#[derive(Debug)]
pub(crate) struct Trail(Vec<Stage>);

impl Trail {
    pub(crate) fn new() -> Self { Self(vec![Stage::Idle]) }

    pub(crate) fn enter(&mut self, next: Stage) {
        let from = self.0.last().copied().unwrap_or(Stage::Idle);
        debug!(%from, to = %next, "orchestrator stage");
        self.0.push(next);
    }

    pub(crate) fn into_stages(self) -> Vec<Stage> { self.0 }
}
