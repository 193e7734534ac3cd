//! Single-instance lock domain module

mod record;

pub use record::{
    format_hms, unix_now, AcquireDecision, LockMetadata, LockRecord, LockStatus,
    RunningInstance, ServerMode, DAEMON_TIMEOUT, LOCAL_URL, PRODUCTION_URL,
};
