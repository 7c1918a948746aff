use rand::SeedableRng;
use rand::rngs::StdRng;
use tilenav_navigation::astar::astar_search_detailed;
use tilenav_navigation::map::{Grid, TileCoord};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Same seed, same map; pass a different one as the first argument
    let seed = std::env::args()
        .nth(1)
        .map(|s| s.parse::<u64>())
        .transpose()?
        .unwrap_or(42);
    let mut rng = StdRng::seed_from_u64(seed);

    // 30% of the cells blocked
    let grid = Grid::random(24, 12, 0.3, &mut rng)?;
    let start = TileCoord::new(0, 0);
    let goal = TileCoord::new(23, 11);

    info!(seed, walkable = grid.walkable_count(), "Generated grid");
    println!("{}", grid);

    let result = astar_search_detailed(&grid, start, goal)?;
    println!("{}", result);

    match &result.path {
        Some(path) => {
            info!(%start, %goal, steps = path.len(), "Path found");
            println!("{}", path);
        }
        None => info!(%start, %goal, "Goal unreachable on this map, try another seed"),
    }

    Ok(())
}
