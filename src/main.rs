//! Pipeline overview CLI: opens (and seeds) the local store, then prints
//! funnel stats, per-prospect engagement, and the engine's recommendations.

use pipeline_copilot::db::ProspectDb;
use pipeline_copilot::engine::{
    compose_follow_up, infer_context, score_engagement, suggest_next_action,
};
use pipeline_copilot::error::StoreError;
use pipeline_copilot::seed;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), StoreError> {
    env_logger::init();

    let db = match std::env::var("PIPELINE_DB") {
        Ok(path) => ProspectDb::open_at(std::path::PathBuf::from(path))?,
        Err(_) => ProspectDb::open()?,
    };
    seed::seed_if_empty(&db)?;

    let stats = db.pipeline_stats()?;
    println!("Pipeline: {} prospects", stats.total_prospects);
    println!(
        "  contacted {} | replied {} | meetings {} | proposals {} | closed {}",
        stats.contacted,
        stats.replied,
        stats.meetings_scheduled,
        stats.proposals_sent,
        stats.deals_closed
    );
    println!(
        "  conversion {:.1}% | closed value ${:.0} | avg deal ${:.0}",
        stats.conversion_rate, stats.total_deal_value, stats.average_deal_value
    );

    let prospects = db.get_all()?;
    for prospect in &prospects {
        let score = score_engagement(prospect);
        let action = suggest_next_action(prospect);
        println!();
        println!(
            "{} [{}] — engagement {:.1}/10",
            prospect.company,
            prospect.status.as_str(),
            score
        );
        println!(
            "  next: {} due {} — {}",
            action.action_type.as_str(),
            action.due_date,
            action.notes
        );
    }

    if let Some(prospect) = prospects.first() {
        let context = infer_context(prospect);
        let mut rng = rand::rng();
        let draft = compose_follow_up(prospect, context, &mut rng).await;
        println!();
        println!("Draft follow-up for {}:", prospect.company);
        println!("  {draft}");
    }

    Ok(())
}
