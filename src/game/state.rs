use super::action::Direction;

/// A committed position on the play field, in pixels
///
/// Authoritative positions always lie on the grid lattice: both coordinates
/// are multiples of the configured grid cell size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move one grid step in a direction
    pub fn stepped(&self, direction: Direction, grid_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * grid_size, dy * grid_size)
    }
}

/// A displayed (interpolated) position; only the render layer produces these
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl From<Position> for Vec2 {
    fn from(pos: Position) -> Self {
        Self {
            x: pos.x as f32,
            y: pos.y as f32,
        }
    }
}

/// One segment of the snake body
///
/// `start` and `target` bound the current tick's interpolation; `display` is
/// what gets drawn and never feeds back into grid state. The committed
/// position of a segment is its `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub display: Vec2,
    pub start: Position,
    pub target: Position,
    pub scale: f32,
}

impl Segment {
    pub fn at(pos: Position, scale: f32) -> Self {
        Self {
            display: pos.into(),
            start: pos,
            target: pos,
            scale,
        }
    }

    /// The authoritative grid position of this segment
    pub fn committed(&self) -> Position {
        self.target
    }
}

/// The snake: ordered segments with the head at index 0, plus a heading
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    pub segments: Vec<Segment>,
    pub direction: Direction,
}

impl Snake {
    /// Create a snake of the given length with its head at `head`, the body
    /// trailing opposite to `direction`
    pub fn new(head: Position, direction: Direction, length: usize, grid_size: i32, scale: f32) -> Self {
        let (dx, dy) = direction.delta();
        let mut segments = Vec::with_capacity(length.max(1));
        for i in 0..length.max(1) {
            let pos = head.moved_by(-dx * grid_size * i as i32, -dy * grid_size * i as i32);
            segments.push(Segment::at(pos, scale));
        }
        Self { segments, direction }
    }

    pub fn head(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Check if a position matches any body segment target (excluding head)
    pub fn body_targets_contain(&self, pos: Position) -> bool {
        self.segments[1..].iter().any(|s| s.target == pos)
    }

    /// Check if a position matches any segment's committed position
    pub fn occupies(&self, pos: Position) -> bool {
        self.segments.iter().any(|s| s.committed() == pos)
    }
}

/// Kind of the single active food item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodKind {
    /// Regular food ("moyaki"), worth 10 points
    Normal,
    /// Bonus food ("chog"), worth 20 points
    Bonus20,
    /// Bonus food ("salmonad"), worth 30 points
    Bonus30,
}

impl FoodKind {
    pub fn points(&self) -> u32 {
        match self {
            FoodKind::Normal => 10,
            FoodKind::Bonus20 => 20,
            FoodKind::Bonus30 => 30,
        }
    }
}

/// The single active food item; relocated on consumption, never recreated
#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    pub position: Position,
    pub kind: FoodKind,
    pub scale: f32,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// Head target left the field bounds
    Wall,
    /// Head target met a body segment
    SelfHit,
    /// Roaming bonus hazard touched the head
    Hazard,
    /// The snake covers every cell; there is nowhere left to place food
    BoardFull,
}

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fresh session; waiting for a character pick
    CharacterSelect,
    /// Paused / waiting to (re)start
    Ready,
    /// Simulation advancing
    Running,
    /// Terminal until an explicit restart
    GameOver,
}

/// Playable character sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Character {
    Keonehon,
    Mouch,
    Vans,
    Molandak,
}

impl Character {
    pub const ALL: [Character; 4] = [
        Character::Keonehon,
        Character::Mouch,
        Character::Vans,
        Character::Molandak,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Character::Keonehon => "Keonehon",
            Character::Mouch => "Mouch",
            Character::Vans => "Vans",
            Character::Molandak => "Molandak",
        }
    }
}

/// The authoritative simulation state the grid engine mutates
#[derive(Debug, Clone, PartialEq)]
pub struct SimState {
    pub snake: Snake,
    pub food: Food,
    pub score: u32,
    pub scale: f32,
}
