// 服务模块
// 提供同步引擎的核心业务逻辑

pub mod blocks;
pub mod http;
pub mod leetcode;
pub mod notion;
pub mod review;
pub mod sync;

pub use blocks::{absolutize, decode_entities, html_to_blocks, MAX_DESCRIPTION_BLOCKS};

pub use http::{backoff_delay, is_retryable, ApiClient, RetryPolicy};

pub use leetcode::fetch_question;

pub use notion::{
    page_url_from_response,
    parse_times_correct,
    FoundPage,
    NotionClient,
};

pub use review::{format_date, next_review_date, resolve_status};

pub use sync::{
    build_code_blocks,
    build_properties,
    SyncEngine,
    SyncResult,
    MAX_CHILDREN_BLOCKS,
};
