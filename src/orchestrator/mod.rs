pub mod interview_runner;

pub use interview_runner::App;
