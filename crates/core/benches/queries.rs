use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hexfield::{
    compute_fog_of_war, find_path, CubePoint, GridConfig, GridShape, HexGrid,
    MovementCost, Point2, Terrain,
};

fn config() -> GridConfig {
    GridConfig {
        shape: GridShape::Hexagon,
        size: 20,
        ..Default::default()
    }
}

/// Radius 20 hexagon with a sprinkling of walls and forests
fn board() -> HexGrid {
    let mut grid = HexGrid::new(config()).unwrap();
    let points: Vec<CubePoint> = grid.tiles().keys().copied().collect();
    for (i, point) in points.into_iter().enumerate() {
        let terrain = match i % 11 {
            0 => Terrain::Wall,
            3 | 7 => Terrain::Forest,
            _ => Terrain::Plain,
        };
        grid.tile_mut(point).unwrap().set_terrain(terrain);
    }
    grid
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    group.sample_size(20);

    group.bench_function("grid construction", |b| {
        b.iter(|| HexGrid::new(black_box(config())))
    });

    let grid = board();
    let observer = CubePoint::new_xz(-15, 5);
    let passable = |point| {
        grid.tile(point)
            .map_or(true, |tile| !tile.terrain().blocks_sight())
    };

    group.bench_function("pick", |b| {
        b.iter(|| grid.pick(black_box(Point2::new(900.0, 700.0))))
    });
    group.bench_function("fog of war", |b| {
        b.iter(|| {
            compute_fog_of_war(&grid, black_box(observer), 12, passable)
        })
    });
    group.bench_function("pathfinding", |b| {
        b.iter(|| {
            find_path(
                &grid,
                black_box(observer),
                CubePoint::new_xz(15, -5),
                MovementCost(10.0),
                |_| false,
                |_| true,
            )
        })
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
