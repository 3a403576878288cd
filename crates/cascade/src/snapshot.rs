//! Grid snapshots: per-column item sequences at one point in time.
//!
//! A snapshot keeps two lookups side by side. [`GridSnapshot::attributes_at`]
//! answers "who sits at (column, row)?" and [`GridSnapshot::seat_of`] answers
//! "where does item N sit?". Transition geometry depends on keeping these
//! separate: the occupant of a seat can change identity between snapshots,
//! and an item can move to a different seat.

use crate::attributes::LayoutAttributes;

/// Structural position of an item within one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Seat {
    pub column: usize,
    pub row: usize,
}

impl Seat {
    /// Create a new seat.
    #[inline]
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

/// One column of placed items.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    attributes: Vec<LayoutAttributes>,
    height: f32,
}

impl Column {
    /// An empty column whose running height starts at `top`.
    pub(crate) fn new(top: f32) -> Self {
        Self {
            attributes: Vec::new(),
            height: top,
        }
    }

    /// Items in row order.
    #[inline]
    pub fn attributes(&self) -> &[LayoutAttributes] {
        &self.attributes
    }

    /// The y-coordinate just below the last item, or the top inset if empty.
    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Number of rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.attributes.len()
    }

    /// Append an item and advance the running height to its bottom edge.
    fn push(&mut self, attrs: LayoutAttributes) -> usize {
        self.height = attrs.frame.bottom();
        self.attributes.push(attrs);
        self.attributes.len() - 1
    }
}

/// Immutable record of column contents and heights after one pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridSnapshot {
    columns: Vec<Column>,
    /// Index -> seat, in item index order.
    seats: Vec<Seat>,
}

impl GridSnapshot {
    /// A snapshot with no columns, used before the first commit.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Empty columns, each starting at `top`.
    pub(crate) fn with_columns(count: usize, top: f32) -> Self {
        Self {
            columns: (0..count).map(|_| Column::new(top)).collect(),
            seats: Vec::new(),
        }
    }

    /// Append the next item (by index) to `column`.
    pub(crate) fn place(&mut self, column: usize, attrs: LayoutAttributes) -> Seat {
        debug_assert_eq!(attrs.index, self.seats.len(), "items are placed in index order");
        let row = self.columns[column].push(attrs);
        let seat = Seat::new(column, row);
        self.seats.push(seat);
        seat
    }

    /// The column with the strictly smallest height; ties go to the lowest index.
    pub(crate) fn shortest_column(&self) -> Option<usize> {
        let mut shortest: Option<(usize, f32)> = None;
        for (index, column) in self.columns.iter().enumerate() {
            match shortest {
                Some((_, height)) if column.height >= height => {}
                _ => shortest = Some((index, column.height)),
            }
        }
        shortest.map(|(index, _)| index)
    }

    /// All columns.
    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// A single column.
    #[inline]
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Number of columns captured.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of items placed.
    #[inline]
    pub fn item_count(&self) -> usize {
        self.seats.len()
    }

    /// Seat -> attributes.
    pub fn attributes_at(&self, seat: Seat) -> Option<&LayoutAttributes> {
        self.columns.get(seat.column)?.attributes.get(seat.row)
    }

    /// Index -> seat.
    #[inline]
    pub fn seat_of(&self, index: usize) -> Option<Seat> {
        self.seats.get(index).copied()
    }

    /// Index -> attributes, through the item's seat.
    pub fn attributes_for(&self, index: usize) -> Option<&LayoutAttributes> {
        self.attributes_at(self.seat_of(index)?)
    }

    /// The tallest column height, or `None` with no columns.
    pub fn max_column_height(&self) -> Option<f32> {
        self.columns.iter().map(Column::height).reduce(f32::max)
    }
}
