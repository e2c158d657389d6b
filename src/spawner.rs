//! Where bugs come from and how they cross the screen.

use rand::Rng;

use crate::config::Config;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn lerp(self, to: Point, t: f64) -> Point {
        Point::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    pub fn opposite(self) -> Edge {
        match self {
            Edge::Top => Edge::Bottom,
            Edge::Right => Edge::Left,
            Edge::Bottom => Edge::Top,
            Edge::Left => Edge::Right,
        }
    }

    /// Point `offset` px outside the viewport on this edge, `along` in 0..1.
    pub fn point(self, viewport: Viewport, offset: f64, along: f64) -> Point {
        match self {
            Edge::Top => Point::new(along * viewport.width, -offset),
            Edge::Right => Point::new(viewport.width + offset, along * viewport.height),
            Edge::Bottom => Point::new(along * viewport.width, viewport.height + offset),
            Edge::Left => Point::new(-offset, along * viewport.height),
        }
    }
}

/// The one live bug. Positions are viewport pixels, times are frame-clock ms.
#[derive(Clone, Debug, PartialEq)]
pub struct BugInstance {
    pub visible: bool,
    pub squashing: bool,
    pub entry_edge: Edge,
    pub start: Point,
    pub end: Point,
    pub travel_duration_ms: f64,
    pub spawned_at_ms: f64,
    pub squash_position: Option<Point>,
    pub squashed_at_ms: Option<f64>,
}

impl BugInstance {
    /// Travel progress in 0..=1.
    pub fn progress(&self, now: f64) -> f64 {
        if self.travel_duration_ms <= 0.0 {
            return 1.0;
        }
        ((now - self.spawned_at_ms) / self.travel_duration_ms).clamp(0.0, 1.0)
    }

    /// Linear interpolation entry → exit, or the frozen squash point.
    pub fn position_at(&self, now: f64) -> Point {
        match self.squash_position {
            Some(p) => p,
            None => self.start.lerp(self.end, self.progress(now)),
        }
    }

    pub fn has_arrived(&self, now: f64) -> bool {
        !self.squashing && self.progress(now) >= 1.0
    }

    /// Heading in degrees, 0 = facing up, clockwise.
    pub fn heading_deg(&self) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        dx.atan2(-dy).to_degrees()
    }

    /// Freeze at `at` and start the squash animation. No-op when already squashing.
    pub fn squash(&mut self, at: Point, now: f64) -> bool {
        if self.squashing || !self.visible {
            return false;
        }
        self.squashing = true;
        self.squash_position = Some(at);
        self.squashed_at_ms = Some(now);
        true
    }

    /// Squash animation progress in 0..=1; 0 when not squashing.
    pub fn squash_progress(&self, now: f64, squash_ms: f64) -> f64 {
        match self.squashed_at_ms {
            Some(t0) if squash_ms > 0.0 => ((now - t0) / squash_ms).clamp(0.0, 1.0),
            Some(_) => 1.0,
            None => 0.0,
        }
    }
}

/// Random entry edge, opposite exit edge, random travel time.
pub fn spawn_bug<R: Rng>(rng: &mut R, viewport: Viewport, config: &Config, now: f64) -> BugInstance {
    let entry = Edge::ALL[rng.gen_range(0..Edge::ALL.len())];
    let start = entry.point(viewport, config.edge_offset_px, rng.gen_range(0.0..1.0));
    let end = entry.opposite().point(viewport, config.edge_offset_px, rng.gen_range(0.0..1.0));
    let travel_duration_ms = if config.max_travel_ms > config.min_travel_ms {
        rng.gen_range(config.min_travel_ms..=config.max_travel_ms)
    } else {
        config.min_travel_ms
    };
    BugInstance {
        visible: true,
        squashing: false,
        entry_edge: entry,
        start,
        end,
        travel_duration_ms,
        spawned_at_ms: now,
        squash_position: None,
        squashed_at_ms: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const VIEW: Viewport = Viewport { width: 1280.0, height: 720.0 };

    fn is_on_edge(p: Point, edge: Edge) -> bool {
        match edge {
            Edge::Top => p.y == -50.0 && (0.0..=VIEW.width).contains(&p.x),
            Edge::Right => p.x == VIEW.width + 50.0 && (0.0..=VIEW.height).contains(&p.y),
            Edge::Bottom => p.y == VIEW.height + 50.0 && (0.0..=VIEW.width).contains(&p.x),
            Edge::Left => p.x == -50.0 && (0.0..=VIEW.height).contains(&p.y),
        }
    }

    #[test]
    fn bugs_cross_to_the_opposite_edge() {
        let mut rng = StdRng::seed_from_u64(7);
        let cfg = Config::default();
        let mut seen = Vec::new();
        for i in 0..200 {
            let bug = spawn_bug(&mut rng, VIEW, &cfg, i as f64);
            assert!(is_on_edge(bug.start, bug.entry_edge), "{:?}", bug);
            assert!(is_on_edge(bug.end, bug.entry_edge.opposite()), "{:?}", bug);
            assert!((10_000.0..=15_000.0).contains(&bug.travel_duration_ms));
            assert!(bug.visible && !bug.squashing);
            if !seen.contains(&bug.entry_edge) {
                seen.push(bug.entry_edge);
            }
        }
        assert_eq!(seen.len(), 4, "all edges should be used");
    }

    #[test]
    fn fixed_travel_range_is_honoured() {
        let mut rng = StdRng::seed_from_u64(1);
        let cfg = Config { min_travel_ms: 2_000.0, max_travel_ms: 2_000.0, ..Config::default() };
        assert_eq!(spawn_bug(&mut rng, VIEW, &cfg, 0.0).travel_duration_ms, 2_000.0);
    }

    #[test]
    fn position_interpolates_linearly() {
        let bug = BugInstance {
            visible: true,
            squashing: false,
            entry_edge: Edge::Left,
            start: Point::new(-50.0, 100.0),
            end: Point::new(1330.0, 300.0),
            travel_duration_ms: 10_000.0,
            spawned_at_ms: 1_000.0,
            squash_position: None,
            squashed_at_ms: None,
        };
        assert_eq!(bug.position_at(0.0), bug.start);
        assert_eq!(bug.position_at(6_000.0), Point::new(640.0, 200.0));
        assert_eq!(bug.position_at(99_000.0), bug.end);
        assert!(!bug.has_arrived(10_999.0));
        assert!(bug.has_arrived(11_000.0));
    }

    #[test]
    fn squash_freezes_position_once() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut bug = spawn_bug(&mut rng, VIEW, &Config::default(), 0.0);
        let at = bug.position_at(4_000.0);
        assert!(bug.squash(at, 4_000.0));
        assert!(!bug.squash(Point::new(0.0, 0.0), 4_100.0));
        assert_eq!(bug.position_at(9_000.0), at);
        assert!(!bug.has_arrived(100_000.0));
        assert_eq!(bug.squash_progress(4_150.0, 300.0), 0.5);
    }

    #[test]
    fn heading_faces_travel_direction() {
        let mut bug = spawn_bug(&mut StdRng::seed_from_u64(0), VIEW, &Config::default(), 0.0);
        bug.start = Point::new(0.0, 100.0);
        bug.end = Point::new(0.0, -100.0);
        assert!(bug.heading_deg().abs() < 1e-9);
        bug.end = Point::new(100.0, 100.0);
        assert!((bug.heading_deg() - 90.0).abs() < 1e-9);
    }
}
