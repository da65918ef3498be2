mod init;
mod spans;
mod trace_id;

pub use init::{init_logger, is_production};
pub use spans::{annotate_pair, child_span, root_span};
pub use trace_id::TraceId;
