pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{AgeBucket, BonusTier, PaymentMethod, Segment, TrendDirection};
pub use error::CoreError;
pub use structs::{OpeningBalanceRecord, PaymentRecord, SaleRecord, TargetRecord};
