mod booking;
mod ledger;
mod money;
mod route;

pub use booking::*;
pub use ledger::*;
pub use money::*;
pub use route::*;
