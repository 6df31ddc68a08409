// tests/support/mocks/mod.rs
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod repos;
pub mod time;
pub mod util;

pub use repos::FailingViewRepo;
pub use time::{ManualClock, fixed_now};
pub use util::SequentialSlug;
