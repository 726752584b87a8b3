//! Lectures domain module (recordings, generated task sets, quiz solutions).
//!
//! This crate contains the records the transcription and grading workers read
//! and write, plus the store traits they persist through. Pure domain logic;
//! no IO, no HTTP, no storage.

pub mod lecture;
pub mod store;
pub mod task;

pub use lecture::{Lecture, Quiz, QuizSolution};
pub use store::{LectureStore, QuizStore, StoreError, TaskSetStore};
pub use task::{Task, TaskSet};
