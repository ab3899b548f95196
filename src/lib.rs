// Library surface shared by the binary and the integration tests.
// The core (exercise, drill, session) has no terminal dependencies;
// app, ui and runtime form the terminal front end.
pub mod answer;
pub mod app;
pub mod celebration;
pub mod clock;
pub mod config;
pub mod drill;
pub mod exercise;
pub mod runtime;
pub mod session;
pub mod ui;

pub use drill::{Drill, DrillError, Verdict};
pub use exercise::{generate, Generated, Mode, Operator, Problem};
