//! Inactive Users Example
//!
//! Finds users that have not logged in for a while, archives them, and
//! skips accounts that must be kept. Runs entirely in memory.
//!
//! Run with: cargo run -p hunter_demos --bin inactive_users

use contracts::{json, QueryBuilder, Record};
use hunter::Hunter;
use record_source::MemorySource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("Starting inactive users demo");

    let source = MemorySource::new("demo").with_table("User", demo_users()?);

    let archive_budget = 6;
    let mut archived = 0;

    let result = Hunter::new(&source, "User")?
        .find_with("last_login_days", ">", 90)?
        .modify_query_using(|q| Ok(q.order_by("last_login_days", true)))
        .on_before_then(|ctx| {
            if ctx.field("role") == Some(&json!("admin")) {
                ctx.skip("admin accounts are kept");
            }
            Ok(())
        })
        .then_when(
            |user| user.get("email").map_or(true, |e| e.is_null()),
            |ctx| {
                let id = ctx.record_id().clone();
                ctx.fail(&id, "no email address to notify");
                Ok(())
            },
        )
        .then(|ctx| {
            source.update(ctx.record_id(), "archived", true)?;
            archived += 1;
            if archived == archive_budget {
                ctx.stop("archive budget exhausted");
            }
            Ok(())
        })
        .on_success(|ctx| {
            tracing::info!(user = %ctx.record_id(), "archived");
            Ok(())
        })
        .with_logging("inactive-users")
        .chunk(4)?
        .hunt()
        .await?;

    println!("{result}");
    println!("Success rate: {:.1}%", result.success_rate());
    for (reason, count) in result.skip_reason_counts() {
        println!("  skipped ({reason}): {count}");
    }
    for (id, error) in result.errors() {
        println!("  failed {id}: {error}");
    }

    Ok(())
}

fn demo_users() -> anyhow::Result<Vec<Record>> {
    (1..=20)
        .map(|id| {
            let email = if id % 7 == 0 {
                json!(null)
            } else {
                json!(format!("user{id}@example.com"))
            };
            let role = if id % 5 == 0 { "admin" } else { "member" };
            Ok(Record::from_json(
                "User",
                json!({
                    "id": id,
                    "email": email,
                    "role": role,
                    "last_login_days": (id * 17) % 200,
                }),
            )?)
        })
        .collect()
}
