//! 命令行入口
//! `leetsync sync <payload.json|->` 同步一条提交；`leetsync meta <slug>` 查询题目元数据

use anyhow::{bail, Context, Result};
use leetsync::{fetch_leetcode_meta, save_to_notion, SubmissionPayload, SyncConfig};
use std::io::Read;

fn init_logging() {
    let level = std::env::var("LEETSYNC_LOG")
        .ok()
        .and_then(|v| v.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info);
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .expect("logging init failed");
}

/// 从文件或标准输入读取提交载荷
fn read_payload(source: &str) -> Result<SubmissionPayload> {
    let content = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("读取标准输入失败")?;
        buf
    } else {
        std::fs::read_to_string(source).with_context(|| format!("读取文件失败: {}", source))?
    };
    serde_json::from_str(&content).context("载荷 JSON 解析失败")
}

fn usage() -> ! {
    eprintln!("用法:");
    eprintln!("  leetsync sync <payload.json|->   同步一条提交到 Notion");
    eprintln!("  leetsync meta <slug>             查询题目元数据（只读）");
    eprintln!();
    eprintln!("环境变量: NOTION_TOKEN, NOTION_DATABASE_ID, LEETSYNC_LOG");
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        usage();
    }

    let ok = match args[1].as_str() {
        "sync" => {
            let payload = read_payload(&args[2])?;
            let config = SyncConfig::from_env();
            let response = save_to_notion(&config, payload).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
            response.ok
        }
        "meta" => {
            let response = fetch_leetcode_meta(&args[2]).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
            response.ok
        }
        _ => usage(),
    };

    if !ok {
        bail!("命令执行失败");
    }
    Ok(())
}
