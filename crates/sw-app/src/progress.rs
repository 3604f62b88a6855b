#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    CompilingRuntime,
    Integrating,
    Aggregating,
    Completed,
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            RunStage::CompilingRuntime => "compiling",
            RunStage::Integrating => "integrating",
            RunStage::Aggregating => "aggregating",
            RunStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransientProgress {
    pub sim_time_s: f64,
    pub t_end_s: f64,
    pub fraction_complete: f64,
    pub sample: usize,
    pub samples: usize,
    pub accepted_steps: usize,
    pub rejected_steps: usize,
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub transient: Option<TransientProgress>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            transient: None,
        }
    }
}
