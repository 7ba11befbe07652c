pub mod kata;
pub mod training_path;
pub mod user;

pub use kata::{Kata, KataSummary, NewKata};
pub use training_path::{
    NewTrainingPath, TrainingPath, TrainingPathGridRow, TrainingPathKatas, TrainingPathMetadata,
    TrainingPathSummary, TrainingPathWithKatas,
};
pub use user::{NewUser, User};
