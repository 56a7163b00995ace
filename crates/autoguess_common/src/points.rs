//! Point table: earlier suggestions are worth more.

/// Points awarded for the first correct guess at each candidate position.
pub const POINTS_BY_INDEX: [u32; 10] = [1000, 900, 800, 700, 600, 500, 400, 300, 200, 100];

/// Candidate lists never exceed the point table.
pub const MAX_CANDIDATES: usize = POINTS_BY_INDEX.len();

/// Points for position `index`, or `None` past the end of the table.
pub fn points_for(index: usize) -> Option<u32> {
    POINTS_BY_INDEX.get(index).copied()
}
