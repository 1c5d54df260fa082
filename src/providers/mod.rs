pub mod warsaw;

pub use warsaw::{ApiError, VehicleSource, WarsawClient};
