#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};
use procsim_config::SimulationConfig;
use procsim_simulator::{generate_workload, GeneratorParams, Simulation};

/// Benchmark the dispatch loop over a fixed seeded workload for each tier.
fn benchmark_simulation_throughput(c: &mut Criterion) {
    let config = SimulationConfig::default();

    for (name, processes) in [("srt", 2), ("priority", 5), ("round_robin", 200)] {
        let workload = generate_workload(
            42,
            &GeneratorParams {
                processes,
                max_arrival: 0,
                max_burst: 50,
                ..GeneratorParams::default()
            },
        );
        c.bench_function(&format!("simulation_{name}"), |b| {
            b.iter(|| {
                let sim = Simulation::from_config(&config, &workload).unwrap();
                black_box(sim.run())
            })
        });
    }
}

criterion_group!(benches, benchmark_simulation_throughput);
criterion_main!(benches);
