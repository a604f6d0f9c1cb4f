pub mod goal;
pub mod session;
pub mod settings;
pub mod task;
pub mod timer;

pub use goal::{Goal, GoalUpdate, GoalView, NewGoal};
pub use session::{ManualSession, PomodoroSession, SessionType, StartSessionRequest};
pub use settings::{PomodoroSettings, SettingsUpdateRequest};
pub use task::{Task, TaskTab, TaskUpdate, TaskWithPomodoroCount};
pub use timer::TimerStatus;
