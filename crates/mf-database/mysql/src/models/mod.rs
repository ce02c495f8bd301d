pub mod analytics;
pub mod fund;
pub mod nav;
pub mod pipeline;
pub mod sync_state;

pub use analytics::{FundAnalytics, NewFundAnalytics};
pub use fund::{Fund, FundUpsert};
pub use nav::{NavPointRow, NewNavPoint};
pub use pipeline::{NewPipelineStatus, PipelineStatusRow};
pub use sync_state::{NewSyncState, SyncState};
