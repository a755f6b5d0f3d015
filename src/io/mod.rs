mod export;
mod receipt;

pub use export::*;
pub use receipt::*;
