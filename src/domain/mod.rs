mod account;
mod balance_sheet;
mod ledger;
mod money;
mod period;

pub use account::*;
pub use balance_sheet::*;
pub use ledger::*;
pub use money::*;
pub use period::*;
