use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use ouija_bot::{
    backend::DryRun,
    game::{GameRules, process_post},
    thread::{NewReply, Submission, Thread},
};

const LETTERS: [&str; 6] = ["א", "ב", "ג", "ד", "ה", "ו"];

pub fn criterion_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let rules = GameRules::default();

    let mut group = c.benchmark_group("tree_walk");
    for (width, depth) in [(10, 5), (100, 10), (1000, 10), (100, 1000)] {
        let replies = generate_replies(width, depth);
        group.bench_function(BenchmarkId::new("from_flat", width * depth), |b| {
            b.iter(|| Thread::from_flat(submission(), replies.clone()))
        });

        let thread = Thread::from_flat(submission(), replies);
        group.bench_function(BenchmarkId::new("process_post", width * depth), |b| {
            b.iter(|| runtime.block_on(process_post(&thread, &rules, &DryRun)).unwrap())
        });
    }
    group.finish();
}

fn submission() -> Submission {
    Submission {
        id: "bench".to_string(),
        title: "bench".to_string(),
        author: Some("op".to_string()),
        flair: None,
        stickied: false,
    }
}

/// `width` branches of `depth` letters each, every branch ending in a goodbye.
/// Authors alternate so that no rule fires and the whole tree gets walked.
fn generate_replies(width: usize, depth: usize) -> Vec<NewReply> {
    let created_at = chrono::DateTime::from_timestamp(1_600_000_000, 0).unwrap();
    let mut replies = Vec::with_capacity(width * (depth + 1));

    for branch in 0..width {
        let mut parent = None;
        for level in 0..=depth {
            let id = format!("{branch}-{level}");
            let body = if level == depth {
                "להתראות".to_string()
            } else {
                LETTERS[(branch + level) % LETTERS.len()].to_string()
            };
            replies.push(NewReply {
                id: id.clone(),
                parent_id: parent.take(),
                body,
                author: Some(format!("player{}", level % 2)),
                created_at,
                score: (branch % 7) as i64,
                removed: false,
            });
            parent = Some(id);
        }
    }
    replies
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
