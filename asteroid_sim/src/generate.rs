// Procedural asteroid generators.
//
// Both generators work only through `Asteroid::update()` / `redraw()`, so the
// dirty tracking sees every change they make.
//
// ## Spheroid fill
//
// For every cell, a normalized distance from the volume's center:
//
//   d = sqrt((0.5 - (level + 1) / (D + 1))^2 + (0.5 - x / W)^2 + (0.5 - y / H)^2)
//
// and the cell gets the fill tile when `d < 0.5`. Levels are counted from 1
// in the depth term, so neither the top nor the bottom level sits on the
// boundary. The 0.5 threshold and the `D + 1` / `W` / `H` denominators set the
// spheroid's extent; changing them changes which cells fill.
//
// ## Tunnel carve
//
// 1. Empty the full-depth shaft at `(W / 2, H / 2)`.
// 2. `tunnel_branch_count` times: flip a coin for the axis, pick one level
//    uniformly, and empty a straight run from the boundary (0) up to, but not
//    including, the center along that axis, on the center line of the other.
// 3. Redraw once.
//
// Branches always meet the shaft, but nothing guarantees that two arbitrary
// open cells are connected. Tunneled cells are plain `Empty`; no tunnel-opening
// geometry is drawn.
//
// **Critical constraint: determinism.** All randomness comes from the
// `RandomSource` passed in; equal seeds carve equal tunnels.

use crate::asteroid::Asteroid;
use crate::grid::GridError;
use crate::render::TileRenderer;
use crate::tile::TileType;
use crate::types::Axis;
use asteroid_prng::RandomSource;

/// Cells closer than this (normalized) distance to the center are filled.
pub const SPHEROID_RADIUS: f64 = 0.5;

/// Normalized distance of cell `(x, y, level)` from the center of a
/// `width` x `height` x `depth` volume.
pub fn spheroid_distance(x: u32, y: u32, level: u32, width: u32, height: u32, depth: u32) -> f64 {
    let dz = 0.5 - (level + 1) as f64 / (depth + 1) as f64;
    let dx = 0.5 - x as f64 / width as f64;
    let dy = 0.5 - y as f64 / height as f64;
    (dz * dz + dx * dx + dy * dy).sqrt()
}

/// Set every cell inside the inscribed spheroid to `tile`. Does not redraw.
/// Returns the number of cells written.
pub fn fill_spheroid(asteroid: &mut Asteroid, tile: TileType) -> Result<usize, GridError> {
    let (width, height, depth) = (asteroid.width(), asteroid.height(), asteroid.depth());
    let mut filled = 0;
    for level in 0..depth {
        for x in 0..width {
            for y in 0..height {
                if spheroid_distance(x, y, level, width, height, depth) < SPHEROID_RADIUS {
                    asteroid.update(x as i32, y as i32, level as i32, tile)?;
                    filled += 1;
                }
            }
        }
    }
    Ok(filled)
}

/// One random cut made by `tunnel`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TunnelBranch {
    pub axis: Axis,
    pub level: u32,
}

/// What `tunnel` carved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TunnelReport {
    /// Column `(x, y)` of the vertical shaft.
    pub shaft: (u32, u32),
    pub branches: Vec<TunnelBranch>,
    /// Tile groups regenerated by the final redraw.
    pub groups_redrawn: usize,
}

/// Carve the central shaft plus random branches, then redraw.
pub fn tunnel<G: RandomSource, R: TileRenderer>(
    asteroid: &mut Asteroid,
    rng: &mut G,
    renderer: &mut R,
) -> Result<TunnelReport, GridError> {
    let center_x = asteroid.width() / 2;
    let center_y = asteroid.height() / 2;

    for level in 0..asteroid.depth() {
        asteroid.update(center_x as i32, center_y as i32, level as i32, TileType::EMPTY)?;
    }

    let branch_count = asteroid.config().tunnel_branch_count;
    let mut branches = Vec::with_capacity(branch_count as usize);
    for _ in 0..branch_count {
        let axis = if rng.random_bool(0.5) { Axis::Y } else { Axis::X };
        let level = rng.range_u32_inclusive(0, asteroid.depth() - 1);
        carve_branch(asteroid, axis, level)?;
        log::trace!("tunnel branch along {axis:?} on level {level}");
        branches.push(TunnelBranch { axis, level });
    }

    let groups_redrawn = asteroid.redraw(renderer);
    log::info!(
        "{}: carved shaft at ({center_x}, {center_y}) and {} branches",
        asteroid.name(),
        branches.len()
    );
    Ok(TunnelReport {
        shaft: (center_x, center_y),
        branches,
        groups_redrawn,
    })
}

/// Empty the run from the boundary to the center on one level.
fn carve_branch(asteroid: &mut Asteroid, axis: Axis, level: u32) -> Result<(), GridError> {
    let center_x = (asteroid.width() / 2) as i32;
    let center_y = (asteroid.height() / 2) as i32;
    let level = level as i32;
    match axis {
        Axis::Y => {
            for y in 0..center_y {
                asteroid.update(center_x, y, level, TileType::EMPTY)?;
            }
        }
        Axis::X => {
            for x in 0..center_x {
                asteroid.update(x, center_y, level, TileType::EMPTY)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AsteroidConfig;
    use crate::render::recording::RecordingRenderer;
    use asteroid_prng::AsteroidRng;

    fn rock_spheroid(renderer: &mut RecordingRenderer) -> Asteroid {
        Asteroid::make_spheroid(TileType::ROCK, "Rock", AsteroidConfig::default(), renderer)
            .unwrap()
    }

    /// Always answers with the same raw draw.
    struct Constant(u64);

    impl RandomSource for Constant {
        fn next_u64(&mut self) -> u64 {
            self.0
        }
    }

    #[test]
    fn distance_is_smallest_near_center() {
        let center = spheroid_distance(17, 17, 5, 35, 35, 12);
        assert!(center < 0.05, "center distance {center}");
        let corner = spheroid_distance(0, 0, 0, 35, 35, 12);
        assert!(corner >= SPHEROID_RADIUS);
    }

    #[test]
    fn spheroid_fills_center_and_leaves_corners() {
        let mut renderer = RecordingRenderer::default();
        let a = rock_spheroid(&mut renderer);
        assert_eq!(a.get(17, 17, 5), Some(TileType::ROCK));
        assert_eq!(a.get(18, 18, 6), Some(TileType::ROCK));
        for &x in &[0, 34] {
            for &y in &[0, 34] {
                for &level in &[0, 11] {
                    assert_eq!(a.get(x, y, level), Some(TileType::EMPTY), "corner ({x}, {y}, {level})");
                }
            }
        }
    }

    #[test]
    fn spheroid_is_redrawn_once_and_left_clean() {
        let mut renderer = RecordingRenderer::default();
        let a = rock_spheroid(&mut renderer);
        assert_eq!(a.dirty_group_count(), 0);
        let filled = a.count_tiles(|t| *t == TileType::ROCK);
        assert!(filled > 0);
        assert_eq!(renderer.place_calls, filled);
    }

    #[test]
    fn spheroid_fill_count_matches_distance_test() {
        let mut renderer = RecordingRenderer::default();
        let mut a = Asteroid::new("Count", AsteroidConfig::default(), &mut renderer).unwrap();
        let filled = fill_spheroid(&mut a, TileType::ROCK).unwrap();
        let mut expected = 0;
        for level in 0..12 {
            for x in 0..35 {
                for y in 0..35 {
                    if spheroid_distance(x, y, level, 35, 35, 12) < SPHEROID_RADIUS {
                        expected += 1;
                    }
                }
            }
        }
        assert_eq!(filled, expected);
        assert!(a.dirty_group_count() > 0, "fill alone does not redraw");
    }

    #[test]
    fn tunnel_opens_the_whole_shaft() {
        let mut renderer = RecordingRenderer::default();
        let mut a = rock_spheroid(&mut renderer);
        let mut rng = AsteroidRng::new(42);
        let report = tunnel(&mut a, &mut rng, &mut renderer).unwrap();
        assert_eq!(report.shaft, (17, 17));
        for level in 0..12 {
            assert!(a.get(17, 17, level).unwrap().is_passable());
        }
        assert_eq!(report.branches.len(), 20);
        assert_eq!(a.dirty_group_count(), 0);
    }

    #[test]
    fn tunnel_branches_open_cells_off_the_shaft() {
        for seed in 0..10 {
            let mut renderer = RecordingRenderer::default();
            let mut a = rock_spheroid(&mut renderer);
            let mut rng = AsteroidRng::new(seed);
            let report = tunnel(&mut a, &mut rng, &mut renderer).unwrap();

            for branch in &report.branches {
                let level = branch.level as i32;
                // The cell next to the shaft is always on the run.
                let (x, y) = match branch.axis {
                    Axis::Y => (17, 16),
                    Axis::X => (16, 17),
                };
                assert_eq!(a.get(x, y, level), Some(TileType::EMPTY), "seed {seed}");
            }
            assert!(report.groups_redrawn > 0);
        }
    }

    #[test]
    fn tunnel_is_deterministic_per_seed() {
        let carve = |seed| {
            let mut renderer = RecordingRenderer::default();
            let mut a = rock_spheroid(&mut renderer);
            let mut rng = AsteroidRng::new(seed);
            let report = tunnel(&mut a, &mut rng, &mut renderer).unwrap();
            (report, a.to_json().unwrap())
        };
        assert_eq!(carve(7), carve(7));
    }

    #[test]
    fn scripted_coin_picks_axis_and_level() {
        let mut renderer = RecordingRenderer::default();
        let config = AsteroidConfig {
            tunnel_branch_count: 1,
            ..AsteroidConfig::default()
        };
        let mut a = Asteroid::make_spheroid(TileType::ROCK, "One", config, &mut renderer).unwrap();
        // A small draw: the coin reads 0.0 (Axis::Y) and 12 % 12 picks level 0.
        let report = tunnel(&mut a, &mut Constant(12), &mut renderer).unwrap();
        assert_eq!(
            report.branches,
            vec![TunnelBranch {
                axis: Axis::Y,
                level: 0
            }]
        );
        for y in 0..17 {
            assert_eq!(a.get(17, y, 0), Some(TileType::EMPTY));
        }
    }

    #[test]
    fn tunnel_on_tiny_asteroid_stays_in_bounds() {
        let mut renderer = RecordingRenderer::default();
        let config = AsteroidConfig {
            tile_group_size: 1,
            level_size: 1,
            num_levels: 1,
            ..AsteroidConfig::default()
        };
        let mut a = Asteroid::new("Pebble", config, &mut renderer).unwrap();
        a.update(0, 0, 0, TileType::ROCK).unwrap();
        let report = tunnel(&mut a, &mut AsteroidRng::new(1), &mut renderer).unwrap();
        assert_eq!(report.shaft, (0, 0));
        assert_eq!(a.get(0, 0, 0), Some(TileType::EMPTY));
    }
}
