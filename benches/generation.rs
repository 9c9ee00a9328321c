use criterion::{criterion_group, criterion_main, Criterion, black_box};

use aloft::terrain::{BiomePainter, BiomeThresholds, HeightField, HeightParams, MeshParams, TerrainMeshBuilder};
use aloft::tree::{TreeGenerator, TreeParams};
use aloft::vegetation::{ScatterParams, VegetationScatterer};

fn bench_height_at(c: &mut Criterion) {
    let field = HeightField::new(HeightParams::default());

    c.bench_function("height_at", |b| {
        let mut i = 0u32;
        b.iter(|| {
            i = i.wrapping_add(1);
            let x = (i % 1000) as f32 * 1.7;
            let z = (i / 1000) as f32 * 2.3;
            field.height_at(black_box(x), black_box(z))
        });
    });
}

fn bench_mesh_build_65(c: &mut Criterion) {
    let field = HeightField::new(HeightParams::default());
    let painter = BiomePainter::new(12345, BiomeThresholds::default());
    let params = MeshParams {
        width: 2000.0,
        depth: 2000.0,
        res_x: 65,
        res_z: 65,
    };

    c.bench_function("mesh_build_65", |b| {
        b.iter(|| {
            let builder = TerrainMeshBuilder::new(black_box(params.clone()));
            builder.build(black_box(&field), black_box(&painter))
        });
    });
}

fn bench_mesh_build_129(c: &mut Criterion) {
    let field = HeightField::new(HeightParams::default());
    let painter = BiomePainter::new(12345, BiomeThresholds::default());
    let params = MeshParams::default();

    c.bench_function("mesh_build_129", |b| {
        b.iter(|| {
            let builder = TerrainMeshBuilder::new(black_box(params.clone()));
            builder.build(black_box(&field), black_box(&painter))
        });
    });
}

fn bench_tree_generate_oak(c: &mut Criterion) {
    c.bench_function("tree_generate_oak", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let mut generator = TreeGenerator::new(black_box(seed), TreeParams::oak());
            generator.generate()
        });
    });
}

fn bench_tree_generate_elm(c: &mut Criterion) {
    c.bench_function("tree_generate_elm", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let mut generator = TreeGenerator::new(black_box(seed), TreeParams::elm());
            generator.generate()
        });
    });
}

fn bench_scatter_500(c: &mut Criterion) {
    let field = HeightField::new(HeightParams::default());

    c.bench_function("scatter_500", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let mut scatterer =
                VegetationScatterer::new(black_box(seed), ScatterParams::default());
            scatterer.scatter(&field)
        });
    });
}

criterion_group!(
    benches,
    bench_height_at,
    bench_mesh_build_65,
    bench_mesh_build_129,
    bench_tree_generate_oak,
    bench_tree_generate_elm,
    bench_scatter_500,
);
criterion_main!(benches);
