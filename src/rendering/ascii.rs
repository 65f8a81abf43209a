//! ASCII rendering of grid levels and run metrics.

use crate::grid::{CellKind, Coordinate, VoxelGrid};
use crate::search::{Comparison, SearchResult};
use crate::simulation::Vehicle;
use crate::{VoxError, VoxResult};
use std::fmt::Write;

/// Glyph drawn where the vehicle currently is.
pub const VEHICLE_GLYPH: char = 'V';

/// Renders one level as rows of glyphs, top row first.
///
/// The vehicle is drawn over whatever cell it is nearest to when it is on
/// this level.
///
/// # Examples
///
/// ```
/// use voxroute::{render_level, Coordinate, VoxelGrid};
///
/// let mut grid = VoxelGrid::new(1, 2, 3).unwrap();
/// grid.set_start(Coordinate::new(0, 0, 0)).unwrap();
/// grid.add_obstacle(Coordinate::new(0, 1, 2));
/// assert_eq!(render_level(&grid, 0, None).unwrap(), "S..\n..#\n");
/// ```
pub fn render_level(grid: &VoxelGrid, level: i32, vehicle: Option<&Vehicle>) -> VoxResult<String> {
    if level < 0 || level as u32 >= grid.levels() {
        return Err(VoxError::OutOfBounds {
            coordinate: Coordinate::new(level, 0, 0),
            dimensions: grid.dimensions(),
        });
    }

    let vehicle_cell = vehicle
        .map(|v| v.position().nearest_cell())
        .filter(|c| c.level == level);

    let mut out = String::with_capacity((grid.cols() as usize + 1) * grid.rows() as usize);
    for row in 0..grid.rows() as i32 {
        for col in 0..grid.cols() as i32 {
            let c = Coordinate::new(level, row, col);
            if vehicle_cell == Some(c) {
                out.push(VEHICLE_GLYPH);
            } else {
                out.push(grid.cell(c).unwrap_or_default().glyph());
            }
        }
        out.push('\n');
    }
    Ok(out)
}

/// Renders every level from the ground up, each under a heading.
pub fn render_all_levels(grid: &VoxelGrid, vehicle: Option<&Vehicle>) -> VoxResult<String> {
    let mut out = String::new();
    for level in 0..grid.levels() as i32 {
        let _ = writeln!(out, "Level {}", level);
        out.push_str(&render_level(grid, level, vehicle)?);
        out.push('\n');
    }
    Ok(out)
}

/// One-line legend for the glyphs used by [`render_level`].
pub fn legend() -> String {
    let kinds = [
        (CellKind::Start, "start"),
        (CellKind::Goal, "goal"),
        (CellKind::Obstacle, "building"),
        (CellKind::Car, "car"),
        (CellKind::Path, "path"),
        (CellKind::Explored, "explored"),
        (CellKind::Empty, "open"),
    ];
    let mut parts: Vec<String> = kinds
        .iter()
        .map(|(kind, name)| format!("{} {}", kind.glyph(), name))
        .collect();
    parts.push(format!("{} vehicle", VEHICLE_GLYPH));
    parts.join("  ")
}

/// Renders the side-by-side metrics table for both algorithms.
///
/// # Examples
///
/// ```
/// use voxroute::{render_metrics_table, Coordinate, SearchEngine, VoxelGrid};
///
/// let grid = VoxelGrid::new(1, 3, 3).unwrap();
/// let comparison = SearchEngine::new(&grid)
///     .compare(Coordinate::new(0, 0, 0), Coordinate::new(0, 2, 2))
///     .unwrap();
/// let table = render_metrics_table(&comparison);
/// assert!(table.contains("Nodes explored"));
/// assert!(table.contains("A*"));
/// ```
pub fn render_metrics_table(comparison: &Comparison) -> String {
    let [dijkstra, a_star] = comparison.results();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16}{:>12}{:>12}",
        "Metric",
        dijkstra.algorithm.label(),
        a_star.algorithm.label()
    );
    let _ = writeln!(out, "{}", "-".repeat(40));
    for (name, d, a) in [
        ("Nodes explored", nodes(dijkstra), nodes(a_star)),
        ("Path length", length(dijkstra), length(a_star)),
        ("Path cost", cost(dijkstra), cost(a_star)),
        ("Time (ms)", millis(dijkstra), millis(a_star)),
    ] {
        let _ = writeln!(out, "{:<16}{:>12}{:>12}", name, d, a);
    }
    out
}

/// Renders the metrics of a single run.
pub fn render_result_summary(result: &SearchResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", result.algorithm.label());
    for (name, value) in [
        ("Nodes explored", nodes(result)),
        ("Path length", length(result)),
        ("Path cost", cost(result)),
        ("Time (ms)", millis(result)),
    ] {
        let _ = writeln!(out, "  {:<16}{:>12}", name, value);
    }
    out
}

fn nodes(result: &SearchResult) -> String {
    result.metrics.nodes_explored.to_string()
}

fn length(result: &SearchResult) -> String {
    if result.is_found() {
        result.metrics.path_length.to_string()
    } else {
        "no path".to_string()
    }
}

fn cost(result: &SearchResult) -> String {
    format!("{:.2}", result.metrics.path_cost)
}

fn millis(result: &SearchResult) -> String {
    format!("{:.3}", result.metrics.elapsed_seconds * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchEngine;

    #[test]
    fn test_render_level_glyphs() {
        let mut grid = VoxelGrid::new(2, 3, 3).unwrap();
        grid.set_start(Coordinate::new(0, 0, 0)).unwrap();
        grid.set_goal(Coordinate::new(0, 2, 2)).unwrap();
        grid.add_obstacle(Coordinate::new(0, 1, 1));
        grid.add_car(Coordinate::new(0, 0, 2));
        grid.mark_path(&[Coordinate::new(0, 1, 0)]);
        grid.mark_explored(&[Coordinate::new(0, 2, 0), Coordinate::new(1, 1, 1)]);

        assert_eq!(render_level(&grid, 0, None).unwrap(), "S.c\n*#.\no.G\n");
        assert_eq!(render_level(&grid, 1, None).unwrap(), "...\n.o.\n...\n");
    }

    #[test]
    fn test_render_level_out_of_range() {
        let grid = VoxelGrid::new(2, 3, 3).unwrap();
        assert!(render_level(&grid, 2, None).is_err());
        assert!(render_level(&grid, -1, None).is_err());
    }

    #[test]
    fn test_vehicle_drawn_on_its_level_only() {
        let grid = VoxelGrid::new(2, 2, 2).unwrap();
        let vehicle = Vehicle::new(Coordinate::new(1, 0, 1));
        assert_eq!(render_level(&grid, 0, Some(&vehicle)).unwrap(), "..\n..\n");
        assert_eq!(render_level(&grid, 1, Some(&vehicle)).unwrap(), ".V\n..\n");

        let all = render_all_levels(&grid, Some(&vehicle)).unwrap();
        assert!(all.starts_with("Level 0\n"));
        assert!(all.contains("Level 1\n.V\n"));
    }

    #[test]
    fn test_metrics_table_rows() {
        let grid = VoxelGrid::new(1, 4, 4).unwrap();
        let comparison = SearchEngine::new(&grid)
            .compare(Coordinate::new(0, 0, 0), Coordinate::new(0, 3, 3))
            .unwrap();
        let table = render_metrics_table(&comparison);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("Dijkstra") && lines[0].contains("A*"));
        assert!(lines[3].starts_with("Path length"));
        assert!(lines[3].trim_end().ends_with('4'));
        assert!(lines[4].contains("3.00"));
    }

    #[test]
    fn test_summary_reports_missing_path() {
        let mut grid = VoxelGrid::new(1, 3, 3).unwrap();
        for row in 0..3 {
            grid.add_obstacle(Coordinate::new(0, row, 1));
        }
        let result = SearchEngine::new(&grid)
            .a_star(Coordinate::new(0, 0, 0), Coordinate::new(0, 0, 2))
            .unwrap();
        let summary = render_result_summary(&result);
        assert!(summary.starts_with("A*\n"));
        assert!(summary.contains("no path"));
    }

    #[test]
    fn test_legend_mentions_every_glyph() {
        let legend = legend();
        for glyph in ['S', 'G', '#', 'c', '*', 'o', '.', 'V'] {
            assert!(legend.contains(glyph));
        }
    }
}
