//! Properties that should hold for any input, checked over a decent spread of
//! cells instead of a handful of hand-picked ones

use hexfield::{
    build_shape, compute_fog_of_war, find_path, trace_line, AxialPoint,
    CubePoint, CubePointSet, GridConfig, GridShape, HexGrid, MovementCost,
    Terrain, TileFootprint,
};

fn cells() -> impl Iterator<Item = CubePoint> {
    CubePoint::new_xz(3, -7).range(9)
}

fn hexagon(radius: u16) -> HexGrid {
    HexGrid::new(GridConfig {
        shape: GridShape::Hexagon,
        size: radius,
        ..Default::default()
    })
    .unwrap()
}

/// Every third cell in a ring blocks sight, which gives a decent mix of open
/// and blocked lines from anywhere
fn pillars(point: CubePoint) -> bool {
    (point.x() - point.y()).rem_euclid(3) != 0
}

#[test]
fn test_round_whole_numbers() {
    for point in cells() {
        assert_eq!(
            CubePoint::round(
                f64::from(point.x()),
                f64::from(point.y()),
                f64::from(point.z())
            ),
            point
        );
    }
}

#[test]
fn test_axial_round_trip() {
    for point in cells() {
        assert_eq!(CubePoint::from_axial(point.to_axial()), point);
        let axial = point.to_axial();
        assert_eq!((axial.q, axial.r), (point.x(), point.z()));
    }
}

#[test]
fn test_distance() {
    let origin = CubePoint::new_xz(1, 1);
    for point in cells() {
        assert_eq!(point.distance_to(point), 0);
        assert_eq!(point.distance_to(origin), origin.distance_to(point));
        for adjacent in point.adjacents() {
            assert_eq!(point.distance_to(adjacent), 1);
        }
    }
}

#[test]
fn test_rotate_six_times() {
    for point in cells() {
        let rotated = (0..6).fold(point, |p, _| p.rotate());
        assert_eq!(rotated, point);
        // Rotation about the origin preserves distance to the origin
        assert_eq!(
            point.rotate().distance_to(CubePoint::ORIGIN),
            point.distance_to(CubePoint::ORIGIN)
        );
    }
}

#[test]
fn test_small_shapes() {
    let line: Vec<AxialPoint> =
        build_shape(GridShape::Line, 2, 0).unwrap().into_iter().collect();
    assert_eq!(
        line,
        vec![
            AxialPoint::new(-2, 0),
            AxialPoint::new(-1, 0),
            AxialPoint::new(0, 0),
            AxialPoint::new(1, 0),
            AxialPoint::new(2, 0),
        ]
    );

    let triangle: Vec<AxialPoint> = build_shape(GridShape::Triangle, 2, 0)
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(
        triangle,
        vec![
            AxialPoint::new(0, 0),
            AxialPoint::new(0, 1),
            AxialPoint::new(0, 2),
            AxialPoint::new(1, 0),
            AxialPoint::new(1, 1),
            AxialPoint::new(2, 0),
        ]
    );
}

#[test]
fn test_pick_unrotated_tiles() {
    // Viewport is smaller than the board, so the tile bounds fill the canvas
    let grid = HexGrid::new(GridConfig {
        shape: GridShape::Triangle,
        size: 6,
        footprint: TileFootprint::default(),
        viewport_width: 0.0,
        viewport_height: 0.0,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(grid.rotation(), 0.0);
    assert_eq!(grid.canvas_size(), grid.tile_bounds().size());

    for tile in grid.tiles().values() {
        // Undo the centering, and we should be right back at the anchor
        let rendered = grid.rendered_position(tile.position()).unwrap();
        assert_eq!(rendered - grid.centering_offset(), tile.anchor());

        let center = grid.rendered_center(tile.position()).unwrap();
        assert_eq!(grid.pick_point(center), tile.position());
        assert_eq!(
            grid.pick(center).map(|tile| tile.position()),
            Some(tile.position())
        );
    }
}

#[test]
fn test_fog_of_war_radius() {
    let grid = hexagon(6);
    for observer in [CubePoint::new_xz(-4, 0), CubePoint::new_xz(3, 3)].iter()
    {
        for radius in 1..=5 {
            // Open field: everything in range is visible
            let fog =
                compute_fog_of_war(&grid, *observer, radius, |_| true).unwrap();
            for (point, visible) in fog.iter() {
                assert_eq!(
                    visible,
                    point.distance_to(*observer) < radius as usize
                );
            }

            // Obstructions never reveal anything out of range, and never
            // hide the observer
            let fog =
                compute_fog_of_war(&grid, *observer, radius, pillars).unwrap();
            assert!(fog.is_visible(*observer));
            for point in fog.visible_points() {
                assert!(point.distance_to(*observer) < radius as usize);
            }
        }
    }
}

#[test]
fn test_trace_line_monotone() {
    let start = CubePoint::new_xz(-2, 1);
    for end in CubePoint::ORIGIN.range(7) {
        let steps = trace_line(start, end, pillars);
        assert_eq!(
            steps.len(),
            start.distance_to(end).saturating_sub(1),
            "wrong step count from {} to {}",
            start,
            end
        );
        // Read from the far end toward the near end: once something is
        // blocked, everything nearer to the far end is blocked too
        let mut blocked = false;
        for step in &steps {
            if blocked {
                assert!(!step.visible, "line to {} isn't monotone", end);
            }
            blocked = !step.visible;
        }
    }
}

#[test]
fn test_path_to_source() {
    let grid = hexagon(4);
    let source = CubePoint::new_xz(0, 3);
    for budget in &[0.0, 0.5, 12.0] {
        let path = find_path(
            &grid,
            source,
            source,
            MovementCost(*budget),
            |_| false,
            |_| true,
        )
        .unwrap();
        assert_eq!(path.steps().len(), 1);
        let step = path.steps()[0];
        assert_eq!(step.point, source);
        assert_eq!(step.cost, MovementCost::ZERO);
        assert!(step.within_budget);
    }
}

#[test]
fn test_affordable_neighbors_are_reachable() {
    let mut grid = hexagon(4);
    let source = CubePoint::new_xz(-3, 0);
    // Mix up the terrain around the source
    let terrains =
        [Terrain::Plain, Terrain::Hill, Terrain::Water, Terrain::Mountain];
    for (i, point) in source.adjacents().enumerate() {
        if let Some(tile) = grid.tile_mut(point) {
            tile.set_terrain(terrains[i % terrains.len()]);
        }
    }
    let blocked: CubePointSet =
        std::iter::once(source.adjacents().next().unwrap()).collect();

    for budget in 0..=4 {
        let budget = MovementCost(f64::from(budget));
        let path = find_path(
            &grid,
            source,
            CubePoint::new_xz(3, 0),
            budget,
            |point| blocked.contains(&point),
            |_| true,
        )
        .unwrap();
        for tile in grid.neighbors(source) {
            let point = tile.position();
            let cost = tile.terrain().entry_cost().unwrap();
            if !blocked.contains(&point) && cost <= budget {
                let step = path.reachable_step(point).unwrap();
                assert!(step.within_budget);
                assert!(step.cost <= cost);
            }
        }
        assert!(blocked.iter().all(|p| path.reachable_step(*p).is_none()));
    }
}
