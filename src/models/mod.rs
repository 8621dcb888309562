pub mod codec;
pub mod insights;
pub mod planned;
pub mod profile;
pub mod workout;

pub use insights::{ComprehensiveInsights, InsightsSummary};
pub use planned::{NewPlannedWorkout, PlannedWorkout};
pub use profile::{Profile, WeeklyTargetType};
pub use workout::{NewWorkout, Workout};
