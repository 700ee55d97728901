pub mod app;
pub mod audio;
pub mod records;
pub mod scoring;
pub mod session;
pub mod stimulus;
pub mod tracker;
pub mod trial;
pub mod wave;

pub use app::{SpeechTaskApp, StartupConfig};
