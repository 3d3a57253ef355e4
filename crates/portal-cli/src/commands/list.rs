//! List commands
//!
//! Usage:
//!   portal list [--tag <TAG>]... [--limit <N>] [--cursor <TOKEN>] [--json]
//!   portal by-user <USER_ID> [--limit <N>] [--cursor <TOKEN>] [--json]

use super::GlobalOpts;
use chrono::DateTime;
use clap::Args;
use portal_core_types::RequestContext;
use portal_engine::commands::{
    apply_work_query, ListWork, WorkConnection, WorkConnectionArg, WorkQuery, WorkQueryOption,
};
use portal_store::SqliteIndexStore;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Required tag; repeat to require several
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Args)]
pub struct ByUserArgs {
    pub user_id: String,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Args)]
pub struct PageArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// exclusiveStartKey from a previous page
    #[arg(long)]
    pub cursor: Option<String>,

    /// Print the raw page as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute_list(global: &GlobalOpts, args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let option = if args.tags.is_empty() {
        None
    } else {
        Some(WorkQueryOption {
            tags: Some(args.tags),
            ..Default::default()
        })
    };
    let query = WorkQuery::ListWork(ListWork {
        limit: args.page.limit,
        exclusive_start_key: args.page.cursor,
        option,
    });
    run(global, query, args.page.json)
}

pub fn execute_by_user(
    global: &GlobalOpts,
    args: ByUserArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = WorkQuery::WorkConnection(WorkConnectionArg {
        limit: args.page.limit,
        exclusive_start_key: args.page.cursor,
        user_id: args.user_id,
    });
    run(global, query, args.page.json)
}

fn run(global: &GlobalOpts, query: WorkQuery, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = global.load_config()?;
    let conn = global.open_db()?;
    let store = SqliteIndexStore::new(&conn, &config.table_name, config.index_spec());

    let page = apply_work_query(query, &store, &config, &RequestContext::new())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print_page(&page);
    }
    Ok(())
}

fn format_created_at(epoch: i64) -> String {
    DateTime::from_timestamp(epoch, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| epoch.to_string())
}

fn print_page(page: &WorkConnection) {
    if page.items.is_empty() {
        println!("(no works on this page)");
    }
    for item in &page.items {
        let tags = item
            .tags
            .as_ref()
            .map(|t| format!(" [{}]", t.join(", ")))
            .unwrap_or_default();
        println!(
            "{}  {}  {}  {}{}",
            format_created_at(item.created_at),
            item.id,
            item.user_id,
            item.title,
            tags
        );
    }
    match &page.exclusive_start_key {
        Some(cursor) => println!("\nNext page: --cursor '{}'", cursor),
        None => println!("\nEnd of results"),
    }
}
