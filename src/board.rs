//! Board and ship model (§3). A fixed square grid plus the per-side ship
//! roster it holds. Mutated only by the weapon resolvers in `weapons`.

pub const BOARD_SIDE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub r: i32,
    pub c: i32,
}

impl Coord {
    pub fn new(r: i32, c: i32) -> Self {
        Self { r, c }
    }

    pub fn in_bounds(&self) -> bool {
        (0..BOARD_SIDE as i32).contains(&self.r) && (0..BOARD_SIDE as i32).contains(&self.c)
    }

    pub fn index(&self) -> usize {
        debug_assert!(self.in_bounds());
        self.r as usize * BOARD_SIDE + self.c as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShipKind {
    Cv,
    Bb,
    Cl,
    Ss,
    Dd,
}

impl ShipKind {
    pub const ALL: [ShipKind; 5] = [
        ShipKind::Cv,
        ShipKind::Bb,
        ShipKind::Cl,
        ShipKind::Ss,
        ShipKind::Dd,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShipKind::Cv => "Carrier",
            ShipKind::Bb => "Battleship",
            ShipKind::Cl => "Light cruiser",
            ShipKind::Ss => "Submarine",
            ShipKind::Dd => "Destroyer",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ShipKind::Cv => "CV",
            ShipKind::Bb => "BB",
            ShipKind::Cl => "CL",
            ShipKind::Ss => "SS",
            ShipKind::Dd => "DD",
        }
    }

    pub fn length(self) -> usize {
        match self {
            ShipKind::Cv => 4,
            ShipKind::Bb => 4,
            ShipKind::Cl => 3,
            ShipKind::Ss => 1,
            ShipKind::Dd => 2,
        }
    }

    pub fn max_hp(self) -> i32 {
        match self {
            ShipKind::Cv => 2,
            ShipKind::Bb => 3,
            ShipKind::Cl => 1,
            ShipKind::Ss => 2,
            ShipKind::Dd => 1,
        }
    }
}

pub type ShipId = usize;

/// Cells a ship of `kind` would occupy at `origin`/`orientation`, in
/// segment order. Free function so the belief sampler can enumerate
/// candidate placements without constructing a `Ship`.
pub fn ship_cells(kind: ShipKind, origin: Coord, orientation: Orientation) -> Vec<Coord> {
    (0..kind.length())
        .map(|i| match orientation {
            Orientation::Horizontal => Coord::new(origin.r, origin.c + i as i32),
            Orientation::Vertical => Coord::new(origin.r + i as i32, origin.c),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Ship {
    pub id: ShipId,
    pub kind: ShipKind,
    pub origin: Coord,
    pub orientation: Orientation,
    pub segment_hp: Vec<i32>,
    pub sunk: bool,
}

impl Ship {
    pub fn new(id: ShipId, kind: ShipKind, origin: Coord, orientation: Orientation) -> Self {
        Self {
            id,
            kind,
            origin,
            orientation,
            segment_hp: vec![kind.max_hp(); kind.length()],
            sunk: false,
        }
    }

    /// Cells this ship occupies, in segment order.
    pub fn cells(&self) -> Vec<Coord> {
        ship_cells(self.kind, self.origin, self.orientation)
    }

    pub fn segment_at(&self, coord: Coord) -> Option<usize> {
        self.cells().iter().position(|&cell| cell == coord)
    }

    pub fn is_fully_sunk(&self) -> bool {
        self.segment_hp.iter().all(|&hp| hp <= 0)
    }

    pub fn total_hp(&self) -> i32 {
        self.segment_hp.iter().sum()
    }

    pub fn max_total_hp(&self) -> i32 {
        self.kind.max_hp() * self.kind.length() as i32
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Cell {
    pub hit: bool,
    pub occupant: Option<(ShipId, usize)>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            hit: false,
            occupant: None,
        }
    }
}

/// A fixed square grid holding one side's ships. Owned exclusively by the
/// match it belongs to (§5).
#[derive(Debug, Clone)]
pub struct Board {
    cells: Vec<Cell>,
    pub ships: Vec<Ship>,
}

impl Board {
    pub fn empty() -> Self {
        Self {
            cells: vec![Cell::default(); BOARD_SIDE * BOARD_SIDE],
            ships: Vec::new(),
        }
    }

    pub fn cell(&self, coord: Coord) -> &Cell {
        &self.cells[coord.index()]
    }

    pub fn cell_mut(&mut self, coord: Coord) -> &mut Cell {
        &mut self.cells[coord.index()]
    }

    /// Places a ship, marking its cells as occupied. Caller is responsible
    /// for legality (bounds, no overlap) — see `deploy::is_legal_placement`.
    pub fn place_ship(&mut self, kind: ShipKind, origin: Coord, orientation: Orientation) -> ShipId {
        let id = self.ships.len();
        let ship = Ship::new(id, kind, origin, orientation);
        for (seg, cell) in ship.cells().iter().enumerate() {
            self.cell_mut(*cell).occupant = Some((id, seg));
        }
        self.ships.push(ship);
        id
    }

    pub fn ship(&self, id: ShipId) -> &Ship {
        &self.ships[id]
    }

    pub fn ship_mut(&mut self, id: ShipId) -> &mut Ship {
        &mut self.ships[id]
    }

    pub fn alive_ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter().filter(|s| !s.sunk)
    }

    pub fn all_sunk(&self) -> bool {
        self.ships.iter().all(|s| s.sunk)
    }

    pub fn has_alive(&self, kind: ShipKind) -> bool {
        self.ships.iter().any(|s| s.kind == kind && !s.sunk)
    }

    pub fn total_alive_hp(&self) -> i32 {
        self.ships.iter().map(|s| s.total_hp().max(0)).sum()
    }

    pub fn total_max_hp(&self) -> i32 {
        self.ships.iter().map(Ship::max_total_hp).sum()
    }
}
