use serde::Serialize;

use crate::{backend::ActionSink, error::Error, thread::Thread};

use super::{GameRules, Reconciler, reconstruct_answer, render_answer, select_winner};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    NoWinner,
    Winner { reply_id: String, label: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub post_id: String,
    /// Removals issued during this scan
    pub removed: usize,
    pub goodbyes: usize,
    pub verdict: Verdict,
}

/// Re-evaluates a whole thread: removes illegal replies as they're found and
/// writes the winning answer into the post flair.
///
/// Rule violations never stop the walk. Only a failing backend call does, and
/// anything already removed stays removed, so the scan can simply run again.
pub async fn process_post<S>(
    thread: &Thread,
    rules: &GameRules,
    sink: &S,
) -> Result<ScanReport, Error>
where
    S: ActionSink + ?Sized,
{
    let post = &thread.submission;
    tracing::info!(post = %post.id, title = %post.title, "Processing post");

    if thread.top_level().is_empty() {
        tracing::info!(post = %post.id, "no winner");
        return Ok(ScanReport {
            post_id: post.id.clone(),
            removed: 0,
            goodbyes: 0,
            verdict: Verdict::NoWinner,
        });
    }

    let mut pass = Reconciler::new(thread, rules, sink);
    let goodbyes = pass.collect_goodbyes().await?;

    let verdict = match select_winner(thread, rules, &goodbyes) {
        None => {
            tracing::info!(post = %post.id, goodbyes = goodbyes.len(), "no winner");
            Verdict::NoWinner
        }
        Some(winner) => {
            let answer = render_answer(&reconstruct_answer(thread, winner));
            let label = rules.label(&answer);
            tracing::info!(
                post = %post.id,
                reply = %thread[winner].id,
                score = thread[winner].score,
                previous = ?post.flair,
                %label,
                "Setting flair"
            );
            sink.set_label(post, &label).await?;
            Verdict::Winner {
                reply_id: thread[winner].id.clone(),
                label,
            }
        }
    };

    Ok(ScanReport {
        post_id: post.id.clone(),
        removed: pass.removed(),
        goodbyes: goodbyes.len(),
        verdict,
    })
}
