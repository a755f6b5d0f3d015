mod customer;
mod ledger;
mod money;
mod sale;

pub use customer::*;
pub use ledger::*;
pub use money::*;
pub use sale::*;
