// 命令模块
// 提供供外部调用的入口接口，返回带 ok 标志的结构化结果

pub mod sync;

pub use sync::{
    fetch_leetcode_meta,
    save_to_notion,
    MetaResponse,
    ProblemMetaDto,
    SyncResponse,
};
