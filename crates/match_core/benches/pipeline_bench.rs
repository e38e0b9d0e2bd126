use criterion::{black_box, criterion_group, criterion_main, Criterion};
use match_core::models::{BBox, Frame, TrackRecord, Trajectory};
use match_core::{AnalysisConfig, MatchPipeline, PossessionAssigner};

/// 22 players, one ball drifting across the pitch.
fn synthetic_match(frames: usize) -> Trajectory {
    let frames = (0..frames)
        .map(|n| {
            let mut f = Frame::default();
            for id in 0..22u32 {
                let x = 40.0 * (id % 11) as f32 + n as f32 * 0.5;
                let y = 200.0 * (id / 11) as f32 + 100.0;
                let team = if id < 11 { 1 } else { 2 };
                f.players.insert(
                    id + 2,
                    TrackRecord::new(BBox::new(x, y, x + 20.0, y + 60.0))
                        .with_team(team)
                        .with_position((id % 11) as f32 * 6.0, (id / 11) as f32 * 50.0),
                );
            }
            let bx = (n * 7 % 440) as f32;
            f.ball.insert(
                1,
                TrackRecord::new(BBox::new(bx, 156.0, bx + 8.0, 164.0)).with_speed(6.0),
            );
            f
        })
        .collect();
    Trajectory::new(frames)
}

fn bench_possession_frame(c: &mut Criterion) {
    let trajectory = synthetic_match(1);
    let assigner = PossessionAssigner::default();
    let frame = &trajectory.frames[0];
    let ball = frame.ball[&1].bbox;

    c.bench_function("possession_assign_22_players", |b| {
        b.iter(|| assigner.assign(black_box(&frame.players), black_box(&ball)))
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let pipeline = MatchPipeline::new(AnalysisConfig::default()).expect("default config");
    let base = synthetic_match(900);

    c.bench_function("pipeline_900_frames", |b| {
        b.iter(|| {
            let mut trajectory = base.clone();
            pipeline.run(black_box(&mut trajectory), None)
        })
    });
}

criterion_group!(benches, bench_possession_frame, bench_full_pipeline);
criterion_main!(benches);
