//! Movement helpers shared by every policy

use rand::seq::SliceRandom;
use rand::Rng;

use crate::actions::catalog::{BeeAction, WaspAction};
use crate::core::types::{Bounds, GridPos};

/// One of the four grid moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Down, Heading::Left, Heading::Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::Up => (-1, 0),
            Heading::Down => (1, 0),
            Heading::Left => (0, -1),
            Heading::Right => (0, 1),
        }
    }

    /// Where this step lands from `from`, clamped to the grid
    pub fn step(self, from: GridPos, bounds: &Bounds) -> GridPos {
        let (dx, dy) = self.delta();
        bounds.clamp(from.offset(dx, dy))
    }
}

impl From<Heading> for BeeAction {
    fn from(heading: Heading) -> Self {
        match heading {
            Heading::Up => BeeAction::Up,
            Heading::Down => BeeAction::Down,
            Heading::Left => BeeAction::Left,
            Heading::Right => BeeAction::Right,
        }
    }
}

impl From<Heading> for WaspAction {
    fn from(heading: Heading) -> Self {
        match heading {
            Heading::Up => WaspAction::Up,
            Heading::Down => WaspAction::Down,
            Heading::Left => WaspAction::Left,
            Heading::Right => WaspAction::Right,
        }
    }
}

/// Step that closes the larger gap first. None when already there.
pub fn move_towards(from: GridPos, to: GridPos) -> Option<Heading> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx == 0 && dy == 0 {
        return None;
    }
    Some(if dx.abs() >= dy.abs() {
        if dx > 0 {
            Heading::Down
        } else {
            Heading::Up
        }
    } else if dy > 0 {
        Heading::Right
    } else {
        Heading::Left
    })
}

/// Step that widens the larger gap from `threat`
///
/// A step into a wall would leave the agent in place, so the first heading
/// that actually moves and does not close in on `threat` wins instead, then
/// any heading that moves at all.
pub fn move_away(from: GridPos, threat: GridPos, bounds: &Bounds) -> Heading {
    let dx = from.x - threat.x;
    let dy = from.y - threat.y;
    let preferred = if dx.abs() >= dy.abs() {
        if dx >= 0 {
            Heading::Down
        } else {
            Heading::Up
        }
    } else if dy > 0 {
        Heading::Right
    } else {
        Heading::Left
    };

    let distance = from.manhattan(&threat);
    let moves = |h: &Heading| h.step(from, bounds) != from;
    std::iter::once(preferred)
        .chain(Heading::ALL)
        .filter(moves)
        .find(|h| h.step(from, bounds).manhattan(&threat) >= distance)
        .or_else(|| Heading::ALL.into_iter().find(moves))
        .unwrap_or(preferred)
}

pub fn random_heading<R: Rng>(rng: &mut R) -> Heading {
    *Heading::ALL.choose(rng).unwrap_or(&Heading::Up)
}

/// Spreading random walk: keep a heading for `intent` steps, then pick a
/// new one. A move that left the agent where it was (a wall) also re-picks.
#[derive(Debug, Clone)]
pub struct SearchingGuide {
    intent: u32,
    heading: Option<Heading>,
    last_position: Option<GridPos>,
    steps: u32,
}

impl SearchingGuide {
    pub fn new(intent: u32) -> Self {
        Self {
            intent,
            heading: None,
            last_position: None,
            steps: 0,
        }
    }

    pub fn walk<R: Rng>(&mut self, position: GridPos, rng: &mut R) -> Heading {
        let blocked = self.last_position == Some(position);
        let heading = match self.heading {
            Some(heading) if !blocked && self.steps > 0 => {
                self.steps -= 1;
                heading
            }
            _ => {
                self.steps = self.intent;
                random_heading(rng)
            }
        };
        self.heading = Some(heading);
        self.last_position = Some(position);
        heading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_move_towards_closes_larger_gap() {
        let here = GridPos::new(5, 5);
        assert_eq!(move_towards(here, GridPos::new(1, 4)), Some(Heading::Up));
        assert_eq!(move_towards(here, GridPos::new(6, 9)), Some(Heading::Right));
        assert_eq!(move_towards(here, GridPos::new(5, 2)), Some(Heading::Left));
        assert_eq!(move_towards(here, here), None);
    }

    #[test]
    fn test_move_away() {
        let bounds = Bounds::new(10, 10);
        let hive = GridPos::new(0, 0);
        assert_eq!(move_away(hive, hive, &bounds), Heading::Down);
        assert_eq!(move_away(GridPos::new(1, 4), hive, &bounds), Heading::Right);
        assert_eq!(move_away(GridPos::new(3, 5), GridPos::new(7, 5), &bounds), Heading::Up);
    }

    #[test]
    fn test_move_away_never_walks_into_a_wall() {
        let bounds = Bounds::new(20, 20);
        let hive = GridPos::new(19, 10);
        let heading = move_away(hive, hive, &bounds);
        assert_ne!(heading.step(hive, &bounds), hive);

        // Pinned against the far wall: slide along it rather than turn back
        let corner = GridPos::new(0, 10);
        let heading = move_away(corner, hive, &bounds);
        assert!(matches!(heading, Heading::Left | Heading::Right));

        // Boxed in on a single cell: nothing moves, keep the preferred step
        let cell = Bounds::new(1, 1);
        let only = GridPos::new(0, 0);
        assert_eq!(move_away(only, only, &cell), Heading::Down);
    }

    #[test]
    fn test_guide_keeps_heading_while_moving() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut guide = SearchingGuide::new(3);
        let first = guide.walk(GridPos::new(5, 5), &mut rng);
        let second = guide.walk(GridPos::new(6, 5), &mut rng);
        let third = guide.walk(GridPos::new(7, 5), &mut rng);
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn test_guide_repicks_when_blocked() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut guide = SearchingGuide::new(100);
        guide.walk(GridPos::new(0, 0), &mut rng);
        guide.walk(GridPos::new(1, 0), &mut rng);
        assert_eq!(guide.steps, 99);
        guide.walk(GridPos::new(1, 0), &mut rng);
        assert_eq!(guide.steps, 100, "blocked walk resets the step budget");
    }
}
