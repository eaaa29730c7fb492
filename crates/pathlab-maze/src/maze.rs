//! Randomized depth-first backtracking maze generator.
//!
//! Cells are carved two units apart from the start so the cell between two
//! carved cells can act as a wall. Every carved cell is reached exactly once,
//! which makes the open space a spanning tree: one simple path between any
//! two open cells.

use std::collections::{HashMap, HashSet, VecDeque};

use pathlab_core::{Error, Grid, Point, Result, Terrain};
use rand::{Rng, RngExt};

/// Maze generation settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MazeConfig {
    pub width: i32,
    pub height: i32,
    pub start: Point,
    pub goal: Point,
    /// Chance (0.0–1.0) that an open cell becomes [`Terrain::Difficult`].
    pub difficult_chance: f64,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            start: Point::ZERO,
            goal: Point::new(19, 19),
            difficult_chance: 0.1,
        }
    }
}

impl MazeConfig {
    fn validate(&self) -> Result<()> {
        if self.width < 1 || self.height < 1 {
            return Err(Error::config(format!(
                "maze must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if !(0.0..=1.0).contains(&self.difficult_chance) {
            return Err(Error::config(format!(
                "difficult_chance must be within 0..=1, got {}",
                self.difficult_chance
            )));
        }
        let bounds = pathlab_core::Range::sized(self.width, self.height);
        for p in [self.start, self.goal] {
            if !bounds.contains(p) {
                return Err(Error::bounds(p));
            }
        }
        Ok(())
    }
}

/// A generated maze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    pub grid: Grid,
    pub start: Point,
    pub goal: Point,
    /// Wall knock-downs performed by the backtracker.
    pub carved: usize,
    /// Cells turned into difficult terrain.
    pub difficult: usize,
}

/// Maze generator operating on a [`Grid`].
pub struct MazeGen<R: Rng> {
    pub rng: R,
    pub grid: Grid,
}

impl<R: Rng> MazeGen<R> {
    /// Create a new MazeGen with the given grid.
    pub fn with_grid(grid: Grid, rng: R) -> Self {
        Self { rng, grid }
    }

    /// Fill the grid with walls and carve a perfect maze from `start`.
    ///
    /// Returns the number of walls knocked down, which is one less than the
    /// number of carved cells.
    pub fn carve(&mut self, start: Point) -> Result<usize> {
        if !self.grid.contains(start) {
            return Err(Error::bounds(start));
        }
        const STEPS: [Point; 4] = [
            Point::new(0, -2),
            Point::new(0, 2),
            Point::new(-2, 0),
            Point::new(2, 0),
        ];

        self.grid.fill(Terrain::Wall);
        self.grid.set(start, Terrain::Open)?;
        let mut stack = vec![start];
        let mut candidates = Vec::with_capacity(4);
        let mut carved = 0;

        while let Some(&cur) = stack.last() {
            candidates.clear();
            // A wall two steps away has not been visited yet.
            candidates.extend(
                STEPS
                    .iter()
                    .map(|&d| cur + d)
                    .filter(|&n| self.grid.at(n) == Some(Terrain::Wall)),
            );
            if candidates.is_empty() {
                stack.pop();
                continue;
            }
            let next = candidates[self.rng.random_range(0..candidates.len())];
            let between = Point::new((cur.x + next.x) / 2, (cur.y + next.y) / 2);
            self.grid.set(between, Terrain::Open)?;
            self.grid.set(next, Terrain::Open)?;
            carved += 1;
            stack.push(next);
        }

        log::debug!(
            "carved {} walls in a {}x{} maze from {}",
            carved,
            self.grid.width(),
            self.grid.height(),
            start
        );
        Ok(carved)
    }

    /// Force the start and goal open, and make sure the goal has at least
    /// one open neighbour.
    ///
    /// A goal off the carving lattice would otherwise be sealed in. The
    /// neighbour opened is the one touching the fewest open cells, first in
    /// ascending order on ties. Cells opened here never close a loop: see
    /// [`open_cell`](Self::open_cell).
    pub fn open_endpoints(&mut self, start: Point, goal: Point) -> Result<()> {
        let keep = [start, goal];
        for p in keep {
            if self.grid.at(p).ok_or_else(|| Error::bounds(p))? == Terrain::Wall {
                self.open_cell(p, &keep)?;
            }
        }

        let neighbors: Vec<Point> = goal
            .neighbors_4()
            .into_iter()
            .filter(|&n| self.grid.contains(n))
            .collect();
        if neighbors.iter().any(|&n| self.grid.passable(n)) {
            return Ok(());
        }
        let pick = neighbors
            .iter()
            .copied()
            .filter(|&n| self.open_contacts(n, goal) > 0)
            .min_by_key(|&n| self.open_contacts(n, goal))
            .or_else(|| neighbors.first().copied());
        if let Some(n) = pick {
            log::debug!("opening {} next to goal {}", n, goal);
            self.open_cell(n, &keep)?;
        }
        Ok(())
    }

    /// Open `p` without creating a loop.
    ///
    /// Each open neighbour of `p` that is already connected to an earlier
    /// one (by a route avoiding `p`) would close a loop through `p`. The loop
    /// is broken by walling a passage cell on that route. When the route has
    /// none, the neighbour itself is walled and whatever hung off it is
    /// linked back through another wall cell. Cells in `keep` are never
    /// walled.
    pub fn open_cell(&mut self, p: Point, keep: &[Point]) -> Result<()> {
        self.grid.set(p, Terrain::Open)?;
        let mut joined: Vec<Point> = Vec::with_capacity(4);
        for n in p.neighbors_4() {
            if !self.grid.passable(n) {
                continue;
            }
            if let Some(route) = self.route(n, &joined, p) {
                let inner = &route[1..route.len() - 1];
                let cut = inner
                    .iter()
                    .copied()
                    .find(|&c| !keep.contains(&c) && self.open_contacts(c, p) == 2);
                if let Some(c) = cut {
                    log::debug!("walled {} to keep {} loop-free", c, p);
                    self.grid.set(c, Terrain::Wall)?;
                } else if !keep.contains(&n) && self.detach(n, p)? {
                    continue;
                } else {
                    log::debug!("left a loop through {}", p);
                }
            }
            joined.push(n);
        }
        Ok(())
    }

    /// Wall the passage `n` next to `p` and reconnect its two sides through
    /// another wall cell that does not touch `p`.
    ///
    /// Leaves `n` open and returns `false` when no such cell exists.
    fn detach(&mut self, n: Point, p: Point) -> Result<bool> {
        let ends: Vec<Point> = n
            .neighbors_4()
            .into_iter()
            .filter(|&m| m != p && self.grid.passable(m))
            .collect();
        let &[a, b] = ends.as_slice() else {
            return Ok(false);
        };
        let was = self.grid.at(n).ok_or_else(|| Error::bounds(n))?;
        self.grid.set(n, Terrain::Wall)?;

        let side_a = self.reach(a, p);
        if side_a.contains(&b) {
            return Ok(true);
        }
        let side_b = self.reach(b, p);
        let bridge = self.grid.iter().map(|(q, _)| q).find(|&q| {
            if q == n || self.grid.passable(q) {
                return false;
            }
            let open: Vec<Point> = q
                .neighbors_4()
                .into_iter()
                .filter(|&m| self.grid.passable(m))
                .collect();
            match open.as_slice() {
                &[x, y] => {
                    (side_a.contains(&x) && side_b.contains(&y))
                        || (side_b.contains(&x) && side_a.contains(&y))
                }
                _ => false,
            }
        });
        match bridge {
            Some(q) => {
                log::debug!("moved passage {} to {} to keep {} loop-free", n, q, p);
                self.grid.set(q, Terrain::Open)?;
                Ok(true)
            }
            None => {
                self.grid.set(n, was)?;
                Ok(false)
            }
        }
    }

    /// Every open cell connected to `from` without passing through `avoid`.
    fn reach(&self, from: Point, avoid: Point) -> HashSet<Point> {
        let mut seen = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);
        while let Some(cur) = queue.pop_front() {
            for n in cur.neighbors_4() {
                if n != avoid && self.grid.passable(n) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen
    }

    /// Open cells orthogonally next to `p`, not counting `except`.
    fn open_contacts(&self, p: Point, except: Point) -> usize {
        p.neighbors_4()
            .into_iter()
            .filter(|&m| m != except && self.grid.passable(m))
            .count()
    }

    /// Shortest open route from `from` to any of `targets`, endpoints
    /// included, that does not pass through `avoid`.
    fn route(&self, from: Point, targets: &[Point], avoid: Point) -> Option<Vec<Point>> {
        if targets.is_empty() {
            return None;
        }
        let mut parent: HashMap<Point, Point> = HashMap::from([(from, from)]);
        let mut queue = VecDeque::from([from]);
        while let Some(cur) = queue.pop_front() {
            if targets.contains(&cur) {
                let mut path = vec![cur];
                let mut at = cur;
                while let Some(&prev) = parent.get(&at).filter(|_| at != from) {
                    path.push(prev);
                    at = prev;
                }
                path.reverse();
                return Some(path);
            }
            for n in cur.neighbors_4() {
                if n != avoid && self.grid.passable(n) && !parent.contains_key(&n) {
                    parent.insert(n, cur);
                    queue.push_back(n);
                }
            }
        }
        None
    }

    /// Turn a random share of open cells into difficult terrain.
    ///
    /// Walls and the cells in `keep` are never touched. Returns how many
    /// cells changed.
    pub fn add_difficult_terrain(&mut self, chance: f64, keep: &[Point]) -> usize {
        let cells: Vec<Point> = self
            .grid
            .iter()
            .filter(|&(p, t)| t == Terrain::Open && !keep.contains(&p))
            .map(|(p, _)| p)
            .collect();
        let mut changed = 0;
        for p in cells {
            let r: f64 = self.rng.random();
            if r < chance && self.grid.set(p, Terrain::Difficult).is_ok() {
                changed += 1;
            }
        }
        log::debug!("added {} difficult cells at chance {}", changed, chance);
        changed
    }
}

/// Generate a complete maze: carve, open the endpoints, add difficult
/// terrain.
pub fn generate<R: Rng>(config: &MazeConfig, rng: R) -> Result<Maze> {
    config.validate()?;
    let grid = Grid::filled(config.width, config.height, Terrain::Wall);
    let mut mg = MazeGen::with_grid(grid, rng);
    let carved = mg.carve(config.start)?;
    mg.open_endpoints(config.start, config.goal)?;
    let difficult = mg.add_difficult_terrain(config.difficult_chance, &[config.start, config.goal]);
    Ok(Maze {
        grid: mg.grid,
        start: config.start,
        goal: config.goal,
        carved,
        difficult,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathlab_paths::{Algorithm, SearchRequest, distance_map, run_to_end};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn open_cells(g: &Grid) -> usize {
        g.iter().filter(|&(_, t)| t.is_passable()).count()
    }

    /// Orthogonally adjacent pairs of passable cells.
    fn open_adjacencies(g: &Grid) -> usize {
        g.iter()
            .filter(|&(_, t)| t.is_passable())
            .map(|(p, _)| {
                [p.shift(1, 0), p.shift(0, 1)]
                    .into_iter()
                    .filter(|&n| g.passable(n))
                    .count()
            })
            .sum()
    }

    #[test]
    fn carve_produces_spanning_tree() {
        for seed in 0..10 {
            let mut mg = MazeGen::with_grid(Grid::new(21, 15), StdRng::seed_from_u64(seed));
            let carved = mg.carve(Point::ZERO).unwrap();
            let open = open_cells(&mg.grid);
            // 11x8 lattice cells joined by 87 knocked-down walls.
            assert_eq!(carved, 11 * 8 - 1);
            assert_eq!(open, 11 * 8 + carved);
            assert_eq!(open_adjacencies(&mg.grid), open - 1);
            assert_eq!(distance_map(&mg.grid, Point::ZERO).unwrap().len(), open);
        }
    }

    #[test]
    fn odd_maze_stays_a_tree_after_endpoints() {
        let config = MazeConfig {
            width: 15,
            height: 11,
            goal: Point::new(14, 10),
            difficult_chance: 0.0,
            ..MazeConfig::default()
        };
        let maze = generate(&config, StdRng::seed_from_u64(4)).unwrap();
        let open = open_cells(&maze.grid);
        assert_eq!(open_adjacencies(&maze.grid), open - 1);
        assert_eq!(maze.difficult, 0);
    }

    #[test]
    fn even_maze_goal_is_reachable() {
        for seed in 0..10 {
            let config = MazeConfig::default();
            let maze = generate(&config, StdRng::seed_from_u64(seed)).unwrap();
            assert!(maze.grid.passable(maze.start));
            assert!(maze.grid.passable(maze.goal));
            let (_, res) = run_to_end(
                &maze.grid,
                SearchRequest::new(Algorithm::Bfs, maze.start).with_goal(maze.goal),
            )
            .unwrap();
            assert!(res.is_found(), "seed {seed}");
            let open = open_cells(&maze.grid);
            assert_eq!(open_adjacencies(&maze.grid), open - 1, "seed {seed}");
        }
    }

    #[test]
    fn goals_off_the_lattice_stay_loop_free() {
        // Odd-odd goals are boxed in by passages; the others sit on a passage.
        for goal in [Point::new(3, 3), Point::new(3, 2), Point::new(2, 3), Point::new(6, 5)] {
            for seed in 0..50 {
                let config = MazeConfig {
                    width: 7,
                    height: 7,
                    goal,
                    difficult_chance: 0.0,
                    ..MazeConfig::default()
                };
                let maze = generate(&config, StdRng::seed_from_u64(seed)).unwrap();
                let open = open_cells(&maze.grid);
                assert!(maze.grid.passable(goal), "{goal} seed {seed}");
                assert_eq!(open_adjacencies(&maze.grid), open - 1, "{goal} seed {seed}");
                assert_eq!(
                    distance_map(&maze.grid, maze.start).unwrap().len(),
                    open,
                    "{goal} seed {seed}"
                );
            }
        }
    }

    #[test]
    fn open_cell_breaks_the_loop_it_would_close() {
        // A ring of open cells around (1, 1); opening the centre joins all
        // four sides, which are already connected around the ring.
        let grid = Grid::from_rows(&["...", ".#.", "..."]).unwrap();
        let mut mg = MazeGen::with_grid(grid, StdRng::seed_from_u64(0));
        // Make the ring a tree first by walling one corner.
        mg.grid.set(Point::new(2, 2), Terrain::Wall).unwrap();
        let centre = Point::new(1, 1);
        mg.open_cell(centre, &[]).unwrap();
        let open = open_cells(&mg.grid);
        assert_eq!(open, 5);
        assert_eq!(open_adjacencies(&mg.grid), open - 1);
        assert_eq!(distance_map(&mg.grid, centre).unwrap().len(), open);
    }

    #[test]
    fn difficult_terrain_spares_walls_and_endpoints() {
        let mut mg = MazeGen::with_grid(Grid::new(11, 11), StdRng::seed_from_u64(9));
        mg.carve(Point::ZERO).unwrap();
        let before = mg.grid.clone();
        let keep = [Point::ZERO, Point::new(10, 10)];
        let changed = mg.add_difficult_terrain(1.0, &keep);
        assert_eq!(changed, before.count(Terrain::Open) - 2);
        for (p, t) in before.iter() {
            let now = mg.grid.at(p).unwrap();
            match t {
                Terrain::Wall => assert_eq!(now, Terrain::Wall),
                _ if keep.contains(&p) => assert_eq!(now, Terrain::Open),
                _ => assert_eq!(now, Terrain::Difficult),
            }
        }
        assert_eq!(mg.add_difficult_terrain(0.5, &keep), 0);
    }

    #[test]
    fn every_algorithm_replays_its_path() {
        use pathlab_paths::{Manhattan, path_cost};

        let config = MazeConfig {
            difficult_chance: 0.2,
            ..MazeConfig::default()
        };
        let maze = generate(&config, StdRng::seed_from_u64(21)).unwrap();
        let mut costs = Vec::new();
        for algo in [Algorithm::Bfs, Algorithm::Dfs, Algorithm::Dijkstra, Algorithm::AStar] {
            let req = SearchRequest::new(algo, maze.start)
                .with_goal(maze.goal)
                .with_heuristic(&Manhattan);
            let (_, res) = run_to_end(&maze.grid, req).unwrap();
            let path = res.path().unwrap();
            assert_eq!(path_cost(&maze.grid, &path.nodes), Some(path.cost), "{algo}");
            costs.push(path.cost);
        }
        // A perfect maze has a single simple path, so every algorithm agrees.
        assert!(costs.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn same_seed_same_maze() {
        let config = MazeConfig::default();
        let a = generate(&config, StdRng::seed_from_u64(77)).unwrap();
        let b = generate(&config, StdRng::seed_from_u64(77)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_bad_config() {
        let rng = || StdRng::seed_from_u64(1);
        let bad_size = MazeConfig {
            width: 0,
            ..MazeConfig::default()
        };
        assert!(matches!(generate(&bad_size, rng()), Err(Error::Configuration(_))));
        let bad_goal = MazeConfig {
            goal: Point::new(20, 3),
            ..MazeConfig::default()
        };
        assert!(matches!(generate(&bad_goal, rng()), Err(Error::Bounds { .. })));
        let bad_chance = MazeConfig {
            difficult_chance: 1.5,
            ..MazeConfig::default()
        };
        assert!(matches!(generate(&bad_chance, rng()), Err(Error::Configuration(_))));
    }
}
