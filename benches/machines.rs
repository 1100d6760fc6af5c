use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use retropunker::prelude::*;

mod common;
use common::*;

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("machines");

    // native resolutions are around 256x192 to 320x200
    let input = gen_test_texture(320, 200);
    let large = gen_test_texture(BENCH_IMAGE_SIZE * 3, BENCH_IMAGE_SIZE * 2);

    for machine in Machine::ALL {
        let settings = MachineSettings::default();
        for (label, texture) in [("native", &input), ("large", &large)] {
            let mut transform = MachineTransform::new(machine, &settings).expect("valid settings");
            bench_transform(
                &mut group,
                BenchmarkId::new(machine.name(), label),
                &mut transform,
                texture,
            );
        }
    }

    group.finish();
}

criterion_group!(machines, criterion_benchmark);
criterion_main!(machines);
