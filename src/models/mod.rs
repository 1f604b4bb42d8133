// Domain models: one raw counter reading and the durable tracking state

mod reading;
mod state;

pub use reading::RawReading;
pub use state::TrackingState;
