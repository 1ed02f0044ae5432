// Application layer - Use case interactors

pub mod clean_interactor;
pub mod container;
pub mod merge_interactor;
pub mod staging;
pub mod trim_interactor;

// Re-export interactors
pub use clean_interactor::CleanInteractor;
pub use container::{AppContainer, DefaultAppContainer};
pub use merge_interactor::MergeInteractor;
pub use trim_interactor::TrimInteractor;
