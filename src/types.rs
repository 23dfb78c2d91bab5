use std::fmt;

use crate::cli::TaskName;

/// The four asset pipelines.
///
/// Ordering follows the order in which the pipelines are declared, which is
/// also the order used when several of them are re-run for one change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskKind {
    Styles,
    Templates,
    Scripts,
    ScriptsTutti,
}

impl TaskKind {
    pub const ALL: [TaskKind; 4] = [
        TaskKind::Styles,
        TaskKind::Templates,
        TaskKind::Scripts,
        TaskKind::ScriptsTutti,
    ];

    pub fn as_str(&self) -> &'static str {
        self.task_name().as_str()
    }

    pub fn task_name(&self) -> TaskName {
        match self {
            TaskKind::Styles => TaskName::Styles,
            TaskKind::Templates => TaskName::Templates,
            TaskKind::Scripts => TaskName::Scripts,
            TaskKind::ScriptsTutti => TaskName::ScriptsTutti,
        }
    }

    /// The pipeline behind an invocable name, if that name is a pipeline.
    pub fn from_task_name(name: TaskName) -> Option<Self> {
        match name {
            TaskName::Styles => Some(TaskKind::Styles),
            TaskName::Templates => Some(TaskKind::Templates),
            TaskName::Scripts => Some(TaskKind::Scripts),
            TaskName::ScriptsTutti => Some(TaskKind::ScriptsTutti),
            TaskName::Watch | TaskName::Shared | TaskName::Default => None,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
