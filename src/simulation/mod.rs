mod observer;
mod simulator;

pub use observer::*;
pub use simulator::*;
