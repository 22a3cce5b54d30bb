use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fleet_worker::mode::{HumanParticipant, HumanParticipantFactory};
use fleet_worker::session::{MatchComponents, RuntimeOptions};
use fleet_worker::{
    compose_session, select_team_size, ModeFlags, ReplayStateTable, ReplayStates, WorkerError,
};

struct NoHumans;

impl HumanParticipantFactory for NoHumans {
    fn create(&self) -> Result<HumanParticipant, WorkerError> {
        Err(WorkerError::Initialization {
            component: "human participant".into(),
            reason: "bench".into(),
        })
    }
}

/// Three formats with a realistic number of recorded states each.
fn table() -> ReplayStateTable {
    ReplayStateTable::new(
        (1..=3)
            .map(|n| ReplayStates::new(vec![vec![0.5; 18 * n]; 2_000]))
            .collect(),
    )
}

fn bench_select_team_size(c: &mut Criterion) {
    c.bench_function("select_team_size_1k", |b| {
        b.iter(|| {
            for i in 0..1_000u64 {
                black_box(select_team_size(black_box(i), None).unwrap());
            }
        })
    });
}

fn bench_decode_table(c: &mut Criterion) {
    let blob = table().to_blob().unwrap();
    c.bench_function("decode_replay_table", |b| {
        b.iter(|| ReplayStateTable::from_blob(black_box(&blob)).unwrap())
    });
}

fn bench_compose_session(c: &mut Criterion) {
    let table = table();
    let components = MatchComponents::default();
    let options = RuntimeOptions::new("bench");
    c.bench_function("compose_session", |b| {
        b.iter(|| {
            compose_session(
                black_box(7),
                None,
                ModeFlags::default(),
                &table,
                &components,
                &options,
                &NoHumans,
            )
            .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_select_team_size,
    bench_decode_table,
    bench_compose_session
);
criterion_main!(benches);
