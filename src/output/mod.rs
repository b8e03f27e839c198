pub mod formatter;

pub use formatter::{
    format_age, format_determination, format_pending_table, format_percent, format_performance,
    format_record_detail, format_wallet, format_wallet_history, should_use_colors,
};
