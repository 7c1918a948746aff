use std::collections::HashSet;

use tilenav_navigation::astar::astar_search;
use tilenav_navigation::map::{Grid, TileCoord};

fn main() {
    // Create a grid
    // 1 = walkable
    // 0 = blocked
    let rows = [
        [1u8, 1, 1, 1, 1, 1, 1, 1, 1, 1], // Row 0
        [1, 0, 0, 1, 1, 1, 1, 0, 0, 1],   // Row 1
        [1, 1, 1, 1, 0, 1, 1, 1, 1, 1],   // Row 2
        [1, 1, 0, 0, 0, 0, 1, 0, 1, 1],   // Row 3
        [1, 1, 1, 1, 1, 0, 1, 0, 1, 1],   // Row 4
        [1, 0, 0, 0, 1, 0, 1, 0, 0, 1],   // Row 5
        [1, 1, 1, 0, 1, 1, 1, 1, 1, 1],   // Row 6
        [1, 0, 1, 0, 1, 0, 0, 0, 1, 1],   // Row 7
        [1, 0, 1, 1, 1, 1, 1, 1, 0, 1],   // Row 8
        [1, 1, 1, 0, 0, 0, 1, 1, 1, 1],   // Row 9
    ];
    let grid = match Grid::from_rows(&rows) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Failed to build grid: {}", e);
            return;
        }
    };

    let start = TileCoord::new(0, 0);
    let goal = TileCoord::new(9, 9);

    println!("Grid:");
    print_grid(&grid, start, goal, &HashSet::new());
    println!("\nStart: {}, Goal: {}", start, goal);

    match astar_search(&grid, start, goal) {
        Ok(path) => {
            println!("\nPath found ({} steps): {}", path.len(), path);

            let path_set: HashSet<TileCoord> = path.iter().copied().collect();
            println!("\nGrid with path:");
            print_grid(&grid, start, goal, &path_set);
        }
        Err(e) => println!("\n{}", e),
    }
}

fn print_grid(grid: &Grid, start: TileCoord, goal: TileCoord, path: &HashSet<TileCoord>) {
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            let p = TileCoord::new(x, y);
            if p == start {
                print!("S ");
            } else if p == goal {
                print!("G ");
            } else if path.contains(&p) {
                print!("* ");
            } else if !grid.is_walkable(p) {
                print!("X ");
            } else {
                print!(". ");
            }
        }
        println!();
    }
}
