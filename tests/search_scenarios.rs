//! End-to-end search scenarios over hand-built and generated cities.

use voxroute::{
    generation::utils, Algorithm, CellKind, CityGenerator, Coordinate, CostGrid,
    GenerationConfig, Generator, Heuristic, SearchConfig, SearchEngine, SearchReplay, Vehicle,
    VoxError, VoxResult, VoxelGrid,
};

#[test]
fn test_open_city_diagonal_route() -> VoxResult<()> {
    let mut grid = VoxelGrid::new(3, 5, 5)?;
    grid.set_start(Coordinate::new(0, 0, 0))?;
    grid.set_goal(Coordinate::new(0, 4, 4))?;

    let comparison = SearchEngine::new(&grid).compare_endpoints()?;
    for result in comparison.results() {
        assert_eq!(result.metrics.path_cost, 4.0);
        assert_eq!(result.metrics.path_length, 5);
    }
    assert!(comparison.a_star.metrics.nodes_explored < comparison.dijkstra.metrics.nodes_explored);
    Ok(())
}

#[test]
fn test_goal_sealed_on_every_level() -> VoxResult<()> {
    let mut grid = VoxelGrid::new(3, 5, 5)?;
    let start = Coordinate::new(0, 0, 0);
    let goal = Coordinate::new(1, 2, 2);
    grid.set_start(start)?;
    grid.set_goal(goal)?;
    for c in grid.neighbors(goal) {
        assert!(grid.add_obstacle(c));
    }
    assert_eq!(grid.obstacle_count(), 10);

    for algorithm in Algorithm::ALL {
        let result = SearchEngine::new(&grid).run_endpoints(algorithm)?;
        assert!(result.path.is_empty());
        assert_eq!(result.metrics.nodes_explored, 75 - 10 - 1);
    }
    Ok(())
}

#[test]
fn test_route_climbs_over_city_wall() -> VoxResult<()> {
    let mut grid = VoxelGrid::new(3, 6, 6)?;
    for row in 0..6 {
        for level in 0..2 {
            grid.add_obstacle(Coordinate::new(level, row, 3));
        }
    }
    let start = Coordinate::new(0, 2, 0);
    let goal = Coordinate::new(0, 2, 5);

    let result = SearchEngine::new(&grid).dijkstra(start, goal)?;
    assert!(result.is_found());
    assert!(result.path.iter().any(|c| c.level == 2));
    let top = result.path.iter().map(|c| c.level).max();
    assert_eq!(top, Some(2));
    Ok(())
}

#[test]
fn test_cars_block_like_buildings() -> VoxResult<()> {
    let mut grid = VoxelGrid::new(1, 3, 3)?;
    for row in 0..3 {
        grid.add_car(Coordinate::new(0, row, 1));
    }
    let result = SearchEngine::new(&grid).a_star(Coordinate::new(0, 1, 0), Coordinate::new(0, 1, 2))?;
    assert!(!result.is_found());

    assert!(grid.remove_obstacle(Coordinate::new(0, 1, 1)));
    let result = SearchEngine::new(&grid).a_star(Coordinate::new(0, 1, 0), Coordinate::new(0, 1, 2))?;
    assert_eq!(result.path.len(), 3);
    Ok(())
}

#[test]
fn test_invalid_endpoints_fail_fast() -> VoxResult<()> {
    let mut grid = VoxelGrid::new(2, 4, 4)?;
    let wall = Coordinate::new(0, 1, 1);
    grid.add_obstacle(wall);
    let engine = SearchEngine::new(&grid);

    assert!(matches!(
        engine.dijkstra(Coordinate::new(0, 0, 0), Coordinate::new(2, 0, 0)),
        Err(VoxError::OutOfBounds { .. })
    ));
    assert!(matches!(
        engine.a_star(wall, Coordinate::new(0, 0, 0)),
        Err(VoxError::Blocked(c)) if c == wall
    ));
    assert!(matches!(
        engine.run_endpoints(Algorithm::Dijkstra),
        Err(VoxError::MissingEndpoint("start"))
    ));
    Ok(())
}

#[test]
fn test_generated_city_end_to_end() -> VoxResult<()> {
    let config = GenerationConfig::for_dense_city(12345);
    let mut rng = utils::create_rng(&config);
    let mut grid = CityGenerator::new().generate(&config, &mut rng)?;

    let search_config = SearchConfig::with_heuristic(Heuristic::LevelChebyshev);
    let comparison = SearchEngine::with_config(&grid, search_config).compare_endpoints()?;
    assert!(comparison.dijkstra.is_found());
    assert_eq!(
        comparison.dijkstra.metrics.path_cost,
        comparison.a_star.metrics.path_cost
    );
    assert!(comparison.a_star.metrics.nodes_explored <= comparison.dijkstra.metrics.nodes_explored);

    let a_star = comparison.a_star;
    SearchReplay::new(&a_star).run_to_end(&mut grid);
    assert_eq!(grid.cell(Coordinate::new(0, 2, 2)), Some(CellKind::Start));
    assert_eq!(grid.count_kind(CellKind::Goal), 1);
    assert!(grid.count_kind(CellKind::Path) > 0);

    let mut vehicle = Vehicle::new(a_star.path[0]);
    vehicle.set_path(a_star.path.clone());
    let mut ticks = 0;
    while vehicle.is_moving() && ticks < 100_000 {
        vehicle.update();
        ticks += 1;
    }
    assert!(!vehicle.is_moving());
    assert_eq!(vehicle.position().nearest_cell(), grid.goal().unwrap());

    grid.clear_search_marks();
    assert_eq!(grid.count_kind(CellKind::Path), 0);
    assert_eq!(grid.count_kind(CellKind::Explored), 0);
    Ok(())
}

#[test]
fn test_results_serialize_to_json() -> VoxResult<()> {
    let grid = VoxelGrid::new(1, 3, 3)?;
    let comparison = SearchEngine::new(&grid).compare(Coordinate::new(0, 0, 0), Coordinate::new(0, 2, 2))?;
    let json = serde_json::to_string(&comparison)?;
    assert!(json.contains("\"algorithm\":\"a_star\""));
    assert!(json.contains("\"nodes_explored\""));
    Ok(())
}
