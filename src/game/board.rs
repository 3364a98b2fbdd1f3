//! Sokoban board state and push rules.
//!
//! This module defines the [`Board`] struct, which owns the tile grid, the box
//! positions, and the player's cell. All puzzle rules live here: a push either
//! applies completely or leaves the board untouched, and the puzzle counts as
//! solved once every goal tile holds a box.

/// Width and height of the shipped level, in cells.
pub const BOARD_SIZE: usize = 8;

/// The shipped level. `#` wall, `.` goal, `~` dirt, `$` box, `@` player,
/// space is grass. Row index maps to z, column index to x.
const LEVEL_LAYOUT: [&str; BOARD_SIZE] = [
    "########",
    "#.~$   #",
    "#.~$ @ #",
    "#.~$   #",
    "#  ~~  #",
    "#  ~~  #",
    "#      #",
    "########",
];

/// A single grid cell, addressed by column (`x`) and row (`z`).
///
/// Signed so that neighbor arithmetic at the board edge cannot wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Column index, increasing toward positive world x.
    pub x: i32,
    /// Row index, increasing toward positive world z.
    pub z: i32,
}

impl Cell {
    /// Creates a cell from column and row indices.
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    fn offset(&self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }
}

/// Ground type of a board cell. Boxes and the player sit on top of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    /// Impassable wall block.
    Wall,
    /// Plain walkable ground.
    Grass,
    /// Walkable ground with a dirt texture.
    Dirt,
    /// Target tile that wants a box on it.
    Goal,
}

/// Direction of a push attempt, in board terms.
///
/// `Up` points toward negative z (away from the starting camera), `Down`
/// toward positive z, `Left` toward negative x and `Right` toward positive x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PushDirection {
    /// Toward negative z.
    Up,
    /// Toward positive z.
    Down,
    /// Toward negative x.
    Left,
    /// Toward positive x.
    Right,
}

impl PushDirection {
    /// The cell-space delta this direction moves by.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            PushDirection::Up => (0, -1),
            PushDirection::Down => (0, 1),
            PushDirection::Left => (-1, 0),
            PushDirection::Right => (1, 0),
        }
    }

    /// Yaw the player model turns to when moving this way, in degrees.
    pub fn facing_degrees(&self) -> f32 {
        match self {
            PushDirection::Up => 0.0,
            PushDirection::Right => 90.0,
            PushDirection::Down => 180.0,
            PushDirection::Left => 270.0,
        }
    }
}

/// The mutable puzzle state: tile grid, box positions, and the player's cell.
///
/// The starting layout is kept alongside the live state so that
/// [`reset`](Board::reset) can restore it without re-parsing.
#[derive(Debug, Clone)]
pub struct Board {
    tiles: Vec<Vec<Tile>>,
    goals: Vec<Cell>,
    boxes: Vec<Cell>,
    player: Cell,
    start_boxes: Vec<Cell>,
    start_player: Cell,
    width: usize,
    height: usize,
}

impl Default for Board {
    /// Returns the shipped level.
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates the shipped level.
    pub fn new() -> Self {
        Self::from_layout(&LEVEL_LAYOUT)
    }

    /// Parses a board from rows of layout characters.
    ///
    /// Recognizes `#` wall, space grass, `~` dirt, `.` goal, `$` box,
    /// `@` player, `*` box on goal, and `+` player on goal. Rows may differ
    /// in length; anything outside the written layout counts as wall.
    pub fn from_layout(layout: &[&str]) -> Self {
        let mut tiles = Vec::with_capacity(layout.len());
        let mut goals = Vec::new();
        let mut boxes = Vec::new();
        let mut player = Cell::new(0, 0);
        let mut width = 0;

        for (z, line) in layout.iter().enumerate() {
            let mut row = Vec::with_capacity(line.len());
            for (x, ch) in line.chars().enumerate() {
                let cell = Cell::new(x as i32, z as i32);
                let tile = match ch {
                    '#' => Tile::Wall,
                    '~' => Tile::Dirt,
                    '.' => Tile::Goal,
                    '$' => {
                        boxes.push(cell);
                        Tile::Grass
                    }
                    '*' => {
                        boxes.push(cell);
                        Tile::Goal
                    }
                    '@' => {
                        player = cell;
                        Tile::Grass
                    }
                    '+' => {
                        player = cell;
                        Tile::Goal
                    }
                    _ => Tile::Grass,
                };
                if tile == Tile::Goal {
                    goals.push(cell);
                }
                row.push(tile);
            }
            width = width.max(row.len());
            tiles.push(row);
        }

        Self {
            height: tiles.len(),
            width,
            tiles,
            goals,
            start_boxes: boxes.clone(),
            boxes,
            start_player: player,
            player,
        }
    }

    /// Board width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Board height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The player's current cell.
    pub fn player(&self) -> Cell {
        self.player
    }

    /// Current box positions.
    pub fn boxes(&self) -> &[Cell] {
        &self.boxes
    }

    /// Goal cells, fixed for the lifetime of the board.
    pub fn goals(&self) -> &[Cell] {
        &self.goals
    }

    /// Ground tile at `cell`. Cells outside the layout read as wall, so the
    /// push rules never have to special-case the board edge.
    pub fn tile(&self, cell: Cell) -> Tile {
        if cell.x < 0 || cell.z < 0 {
            return Tile::Wall;
        }
        self.tiles
            .get(cell.z as usize)
            .and_then(|row| row.get(cell.x as usize))
            .copied()
            .unwrap_or(Tile::Wall)
    }

    /// Index of the box occupying `cell`, if any.
    pub fn box_at(&self, cell: Cell) -> Option<usize> {
        self.boxes.iter().position(|b| *b == cell)
    }

    /// Attempts to move the player one cell in `direction`.
    ///
    /// A box in the target cell is pushed along if the cell beyond it is free.
    /// The move is rejected when the target is a wall, when the pushed box
    /// would land on a wall or another box, or when either cell lies off the
    /// board. A rejected move leaves the board exactly as it was.
    ///
    /// Returns `true` if the player moved.
    pub fn attempt_move(&mut self, direction: PushDirection) -> bool {
        let (dx, dz) = direction.delta();
        let target = self.player.offset(dx, dz);

        if self.tile(target) == Tile::Wall {
            return false;
        }

        if let Some(box_index) = self.box_at(target) {
            let beyond = target.offset(dx, dz);
            if self.tile(beyond) == Tile::Wall || self.box_at(beyond).is_some() {
                return false;
            }
            self.boxes[box_index] = beyond;
        }

        self.player = target;
        true
    }

    /// Whether every goal tile currently holds a box.
    pub fn is_solved(&self) -> bool {
        self.goals.iter().all(|goal| self.box_at(*goal).is_some())
    }

    /// Puts boxes and player back to their starting cells. The tile grid
    /// never changes, so nothing else needs restoring.
    pub fn reset(&mut self) {
        self.boxes = self.start_boxes.clone();
        self.player = self.start_player;
    }

    /// Converts a cell to the world-space center of its tile. The board is
    /// centered on the origin, one world unit per cell.
    pub fn cell_to_world(&self, cell: Cell) -> (f32, f32) {
        let half_w = (self.width as f32 - 1.0) / 2.0;
        let half_h = (self.height as f32 - 1.0) / 2.0;
        (cell.x as f32 - half_w, cell.z as f32 - half_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests the basic push: a box slides onto the goal behind it and the
    /// player takes its cell, solving the single-goal board.
    #[test]
    fn test_push_box_onto_goal_solves() {
        let mut board = Board::from_layout(&["@$.#"]);
        assert!(!board.is_solved(), "goal starts uncovered");

        assert!(board.attempt_move(PushDirection::Right));
        assert_eq!(board.player(), Cell::new(1, 0));
        assert_eq!(board.boxes(), &[Cell::new(2, 0)]);
        assert!(board.is_solved(), "box on the only goal should solve");
    }

    /// Tests that pushing a box into a wall is rejected and changes nothing.
    #[test]
    fn test_push_box_into_wall_rejected() {
        let mut board = Board::from_layout(&["@$.#"]);
        assert!(board.attempt_move(PushDirection::Right));

        // Box now sits against the wall. The next push must bounce.
        assert!(!board.attempt_move(PushDirection::Right));
        assert_eq!(board.player(), Cell::new(1, 0), "player must not move");
        assert_eq!(
            board.boxes(),
            &[Cell::new(2, 0)],
            "box must not move either"
        );
    }

    /// Tests that walking straight into a wall is rejected.
    #[test]
    fn test_walk_into_wall_rejected() {
        let mut board = Board::from_layout(&["@#"]);
        assert!(!board.attempt_move(PushDirection::Right));
        assert_eq!(board.player(), Cell::new(0, 0));
    }

    /// Tests that two boxes in a row cannot be pushed together.
    #[test]
    fn test_push_two_boxes_rejected() {
        let mut board = Board::from_layout(&["@$$ "]);
        assert!(!board.attempt_move(PushDirection::Right));
        assert_eq!(board.player(), Cell::new(0, 0));
        assert_eq!(board.boxes(), &[Cell::new(1, 0), Cell::new(2, 0)]);
    }

    /// Tests that stepping off the written layout counts as hitting a wall.
    #[test]
    fn test_move_off_board_rejected() {
        let mut board = Board::from_layout(&["@"]);
        assert!(!board.attempt_move(PushDirection::Up));
        assert!(!board.attempt_move(PushDirection::Down));
        assert!(!board.attempt_move(PushDirection::Left));
        assert!(!board.attempt_move(PushDirection::Right));
        assert_eq!(board.player(), Cell::new(0, 0));
    }

    /// Tests that reset restores the starting boxes and player after play.
    #[test]
    fn test_reset_restores_start() {
        let fresh = Board::new();
        let mut board = Board::new();

        assert!(board.attempt_move(PushDirection::Left));
        assert!(board.attempt_move(PushDirection::Left));
        assert_ne!(board.player(), fresh.player());

        board.reset();
        assert_eq!(board.player(), fresh.player());
        assert_eq!(board.boxes(), fresh.boxes());
        assert!(!board.is_solved());
    }

    /// Tests the shipped level's shape: three goals in the left column, three
    /// boxes, the player in the open area, nothing solved yet.
    #[test]
    fn test_shipped_level_well_formed() {
        let board = Board::new();
        assert_eq!(board.width(), BOARD_SIZE);
        assert_eq!(board.height(), BOARD_SIZE);
        assert_eq!(board.goals().len(), 3);
        assert_eq!(board.boxes().len(), 3);
        assert_eq!(board.player(), Cell::new(5, 2));
        assert!(!board.is_solved());

        for goal in board.goals() {
            let (world_x, world_z) = board.cell_to_world(*goal);
            assert!(
                (world_x - -2.5).abs() < 1e-6,
                "goals sit in the x = -2.5 column, got {}",
                world_x
            );
            assert!(
                (-2.5..=-0.5).contains(&world_z),
                "goal z out of expected band: {}",
                world_z
            );
        }
    }

    /// Walks the shipped level to completion, proving it is solvable.
    #[test]
    fn test_shipped_level_solvable() {
        use PushDirection::*;
        let mut board = Board::new();

        let solution = [
            Left, Left, Left, // middle box onto its goal
            Down, Down, Right, Right, Up, Left, Left, // bottom box onto its goal
            Down, Right, Right, Up, Up, Up, Left, Left, // top box onto its goal
        ];

        for (i, push) in solution.iter().enumerate() {
            assert!(
                board.attempt_move(*push),
                "move {} ({:?}) was rejected",
                i,
                push
            );
        }

        assert!(board.is_solved(), "the scripted solution must solve the level");
    }
}
