/// Benchmarks for the in-place payload transforms applied to leaderboard and
/// game responses, at leaderboard sizes seen on popular categories.
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::{Value, json};
use srcom_client_sdk::embed::unpack_value_embeds;
use srcom_client_sdk::leaderboard::reshape_leaderboard;

fn leaderboard(runs: usize) -> Value {
    let mut entries = Vec::with_capacity(runs);
    let mut players = Vec::new();

    for place in 0..runs {
        // every fifth run is a co-op run
        let runners = if place % 5 == 0 { 2 } else { 1 };
        let placeholders: Vec<Value> = (0..runners)
            .map(|n| json!({"rel": "user", "id": format!("u{place}-{n}")}))
            .collect();
        for n in 0..runners {
            players.push(json!({
                "id": format!("u{place}-{n}"),
                "names": {"international": format!("Runner {place}-{n}")},
                "weblink": format!("https://www.speedrun.com/user/runner{place}{n}")
            }));
        }
        entries.push(json!({
            "place": place + 1,
            "run": {
                "id": format!("run{place}"),
                "times": {"primary_t": 3600.0 + place as f64},
                "players": placeholders
            }
        }));
    }

    json!({"runs": entries, "players": {"data": players}})
}

fn bench_reshape(c: &mut Criterion) {
    let mut group = c.benchmark_group("leaderboard/reshape");

    for runs in [10_usize, 200, 2000] {
        let data = leaderboard(runs);
        group.throughput(Throughput::Elements(runs as u64));
        group.bench_with_input(BenchmarkId::from_parameter(runs), &data, |b, data| {
            b.iter_batched(
                || data.clone(),
                |mut data| {
                    reshape_leaderboard(std::hint::black_box(&mut data))
                        .expect("Reshape should succeed");
                    data
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_unpack(c: &mut Criterion) {
    let mut group = c.benchmark_group("embed/unpack");

    let game = json!({
        "id": "o1y9wo6q",
        "categories": {"data": [{"id": "wkpoo02r", "variables": {"data": []}}]},
        "levels": {"data": [{"id": "l1", "variables": {"data": []}}]},
        "moderators": {"data": [{"id": "m1"}, {"id": "m2"}]},
        "platforms": {"data": [{"id": "w89rwelk"}]},
        "regions": {"data": [{"id": "pr184lqn"}]}
    });
    let embeds = "moderators,platforms,regions,categories.variables,levels.variables";

    group.bench_function("game", |b| {
        b.iter_batched(
            || game.clone(),
            |mut game| {
                unpack_value_embeds(
                    std::hint::black_box(&mut game),
                    embeds,
                    &["categories", "levels"],
                )
                .expect("Unpacking should succeed")
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(transform_benches, bench_reshape, bench_unpack);
criterion_main!(transform_benches);
