mod clock;
mod engine;

pub use clock::{now_ms, TimerClock};
pub use engine::{Phase, SessionTimer};
