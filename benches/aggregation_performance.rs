use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lapcharts::aggregate::stats::{BoxStats, kernel_density};
use lapcharts::aggregate::{driver_groups, stints::derive_all_stints, team_groups};
use lapcharts::{
    BoxplotOptions, Compound, DistributionOptions, Figure, LapRecord, LapTable, StintRule,
    plot_lap_time_distributions, plot_laptimes_boxplot,
};
use std::time::Duration;

fn create_race(laps: u32, drivers: usize) -> (LapTable, Vec<String>) {
    let names = (0..drivers).map(|n| format!("D{n:02}")).collect::<Vec<_>>();
    let records = (1..=laps)
        .flat_map(|lap| {
            names.iter().enumerate().map(move |(index, driver)| {
                let compound = match lap * 3 / laps {
                    0 => Compound::Soft,
                    1 => Compound::Medium,
                    _ => Compound::Hard,
                };
                LapRecord::new(driver, lap)
                    .with_team(&format!("Team {}", index / 2))
                    .with_lap_time_s(91.0 + index as f64 * 0.07 + (lap % 5) as f64 * 0.13)
                    .with_compound(compound)
                    .with_position(index as u32 + 1)
            })
        })
        .collect();
    (LapTable::new(records), names)
}

fn bench_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("grouping");

    let (laps, drivers) = create_race(70, 20);

    group.bench_function("driver_groups_full_race", |b| {
        b.iter(|| black_box(driver_groups(&laps, &drivers)));
    });

    group.bench_function("team_groups_full_race", |b| {
        b.iter(|| black_box(team_groups(laps.iter())));
    });

    group.bench_function("derive_stints_full_race", |b| {
        b.iter(|| black_box(derive_all_stints(&laps, &drivers, StintRule::CompoundChange)));
    });

    group.finish();
}

fn bench_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");

    let values = (0..1000)
        .map(|i| 90.0 + (i % 37) as f64 * 0.05)
        .collect::<Vec<_>>();

    group.bench_function("box_stats_1000_laps", |b| {
        b.iter(|| black_box(BoxStats::from_values(&values)));
    });

    group.bench_function("kernel_density_1000_laps", |b| {
        b.iter(|| black_box(kernel_density(&values)));
    });

    group.finish();
}

fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");

    let (laps, drivers) = create_race(70, 20);

    group.bench_function("boxplot_full_race", |b| {
        b.iter(|| {
            let mut figure = Figure::new();
            plot_laptimes_boxplot(&laps, &BoxplotOptions::default(), &mut figure).unwrap();
            black_box(figure)
        });
    });

    group.bench_function("distributions_full_race", |b| {
        b.iter(|| {
            let mut figure = Figure::new();
            plot_lap_time_distributions(
                &laps,
                &drivers,
                &DistributionOptions::default(),
                &mut figure,
            )
            .unwrap();
            black_box(figure)
        });
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(100);
    targets = bench_grouping, bench_statistics, bench_rendering
}
criterion_main!(benches);
