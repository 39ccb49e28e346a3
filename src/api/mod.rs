pub mod dispatcher;
pub mod methods;
pub mod router;
pub mod types;

pub use router::router;
