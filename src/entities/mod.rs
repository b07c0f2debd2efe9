// Entity Models
//
// Each entity owns its flat-file line format (FlatRecord) and, where it has a
// store of its own, the repository that reads and writes it.

pub mod account;
pub mod category;
pub mod transaction;

pub use account::{Account, AccountRepository};
pub use category::SpendCategory;
pub use transaction::{TransactionKind, TransactionLog, TransactionRecord};
