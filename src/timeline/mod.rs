// Timeline module.
// Aggregation of repository stats into display-ready, cached timeline data.

pub mod aggregator;
pub mod format;
pub mod model;

pub use aggregator::{CACHE_KEY, CachedTimeline, TimelineData, TimelineLoader};
pub use format::{format_lines_of_code, format_timeline_date, language_color, render_timeline};
pub use model::{
    ProcessedRepo, SizeCategory, format_repo_name, is_within_last_10_weeks, process_repo,
    ten_weeks_ago,
};
