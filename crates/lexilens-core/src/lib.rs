pub mod cost;
pub mod definition;
pub mod error;
pub mod history;
pub mod lookup;
pub mod quota;
pub mod storage;
pub mod validator;

pub use cost::{Cost, CostEstimator};
pub use definition::{build_prompt, fetch_definition, parse_definition, Definition};
pub use error::{FetchError, LookupError, ParseError, StoreError, ValidationError};
pub use history::{HistoryStore, MAX_HISTORY_ENTRIES};
pub use lookup::LookupClient;
pub use quota::{DenyReason, QuotaDecision, QuotaState, QuotaTracker, MAX_QUERIES_PER_DAY};
pub use storage::{ClientStore, FileStore, MemoryStore};
pub use validator::{is_ascii_word, validate, Query};
