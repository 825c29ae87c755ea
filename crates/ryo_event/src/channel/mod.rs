/// Event channel - broken down into merge, storage and dispatch
mod core;
mod dispatch;
mod pending;
mod tests;

pub use core::Event;
