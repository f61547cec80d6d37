pub mod inbox;
pub mod processor;
pub mod queue;
