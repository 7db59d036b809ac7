pub mod orchestrator;
pub mod plan;

pub use orchestrator::{
    SubtaskAssignment, SubtaskOutcome, SubtaskResult, TeamBuild, TeamError, TeamOrchestrator,
    TeamPartial,
};
pub use plan::{PlanParseError, PlannedSubtask, SubtaskCategory, parse_plan};
