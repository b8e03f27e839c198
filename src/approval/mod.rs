pub mod ledger;
pub mod storage;
pub mod store;
pub mod types;

pub use ledger::{pending_records, wallet_balance, wallet_history, WalletEntry};
pub use storage::{get_store_path, load_records, save_records, JsonFileStore, RecordFile};
pub use store::{apply_decision, DecisionError, DeterminationStore, MemoryStore, StoreError};
pub use types::{transition, Actor, ApprovalStatus, Decision, DeterminationRecord};
