mod service;

pub use service::{LatchkeyService, ServiceError};
