pub mod export;
pub mod routes;

pub use export::*;
pub use routes::*;
