pub mod dispatcher;
pub mod ledger;

pub use dispatcher::{Dispatcher, ExecutionResult};
pub use ledger::{ProviderTotals, UsageLedger, UsageRecord, UsageTotals};
