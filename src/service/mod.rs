//! Request-shaped operations composed from repository calls.
//!
//! Managers borrow the request's session; they never commit.

pub mod answers;
pub mod game;
pub mod questions;
pub mod users;

pub use answers::AnswersManager;
pub use game::{GameManager, GameStart, SubmitOutcome};
pub use questions::QuestionsManager;
pub use users::UsersManager;
