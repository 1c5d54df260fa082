pub mod bus;

pub use bus::{ApiEnvelope, Bus};
