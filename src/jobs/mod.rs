pub mod story_sync;

pub use story_sync::{
    generate_success_stories, reduce_stats, story_id_for_issue, story_stats,
    sync_success_stories, SkipReason, StoryStats, SyncOutcome, SyncReport,
};
