//! Spanning table grid.
//!
//! A [`FlowTableContent`] stores cells sparsely by their anchor (top-left)
//! position. A cell spanning several columns or rows covers, or "shadows",
//! the other positions of its span; shadowed positions cannot be read or
//! written directly. Positions without a cell read as a fresh cell wrapping
//! the table's default content.

use crate::common::coordinates::CellPosition;
use crate::common::style::TableStyle;
use crate::common::{Error, Result};
use crate::flow::content::FlowContent;
use once_cell::sync::OnceCell;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

/// Default upper bound on `column_count * row_count` of a grid.
pub const DEFAULT_MAX_POSITIONS: u64 = 1 << 20;

/// Construction options for table grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableOptions {
    /// Fail on conflicting cells instead of dropping or clamping them
    pub strict: bool,
    /// Largest grid area (columns times rows) a table may reach
    pub max_positions: u64,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            strict: false,
            max_positions: DEFAULT_MAX_POSITIONS,
        }
    }
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_max_positions(mut self, max_positions: u64) -> Self {
        self.max_positions = max_positions;
        self
    }
}

/// One table cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowTableCell {
    content: FlowContent,
    col_span: u32,
    row_span: u32,
}

impl FlowTableCell {
    /// Unmerged cell.
    pub fn new(content: FlowContent) -> Self {
        Self {
            content,
            col_span: 1,
            row_span: 1,
        }
    }

    /// Cell spanning several columns and rows; spans below 1 read as 1.
    pub fn with_span(content: FlowContent, col_span: u32, row_span: u32) -> Self {
        Self {
            content,
            col_span: col_span.max(1),
            row_span: row_span.max(1),
        }
    }

    #[inline]
    pub fn content(&self) -> &FlowContent {
        &self.content
    }

    #[inline]
    pub fn col_span(&self) -> u32 {
        self.col_span.max(1)
    }

    #[inline]
    pub fn row_span(&self) -> u32 {
        self.row_span.max(1)
    }

    #[inline]
    pub fn is_merged(&self) -> bool {
        self.col_span() > 1 || self.row_span() > 1
    }

    pub fn set_content(&self, content: FlowContent) -> Self {
        Self {
            content,
            ..self.clone()
        }
    }

    pub fn set_span(&self, col_span: u32, row_span: u32) -> Self {
        Self::with_span(self.content.clone(), col_span, row_span)
    }

    /// Exclusive end column and row when anchored at `anchor`.
    fn extent(&self, anchor: CellPosition) -> (u64, u64) {
        (
            u64::from(anchor.column()) + u64::from(self.col_span()),
            u64::from(anchor.row()) + u64::from(self.row_span()),
        )
    }

    /// Every position covered by this cell when anchored at `anchor`.
    fn covered(&self, anchor: CellPosition) -> impl Iterator<Item = CellPosition> + '_ {
        let rows = anchor.row()..anchor.row().saturating_add(self.row_span());
        rows.flat_map(move |row| {
            (anchor.column()..anchor.column().saturating_add(self.col_span()))
                .map(move |column| CellPosition::new(row, column))
        })
    }
}

/// Sparse grid of spanning cells.
#[derive(Debug, Clone)]
pub struct FlowTableContent {
    cells: BTreeMap<CellPosition, FlowTableCell>,
    shadows: HashMap<CellPosition, CellPosition>,
    column_count: u32,
    row_count: u32,
    default_content: FlowContent,
    max_positions: u64,
    positions: OnceCell<Vec<CellPosition>>,
}

impl Default for FlowTableContent {
    fn default() -> Self {
        Self {
            cells: BTreeMap::new(),
            shadows: HashMap::new(),
            column_count: 0,
            row_count: 0,
            default_content: FlowContent::default(),
            max_positions: DEFAULT_MAX_POSITIONS,
            positions: OnceCell::new(),
        }
    }
}

impl PartialEq for FlowTableContent {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
            && self.column_count == other.column_count
            && self.row_count == other.row_count
            && self.default_content == other.default_content
    }
}

impl Eq for FlowTableContent {}

impl FlowTableContent {
    /// Grid of `column_count` by `row_count` empty cells.
    ///
    /// Dimensions beyond [`DEFAULT_MAX_POSITIONS`] are not applied.
    pub fn empty(column_count: u32, row_count: u32) -> Self {
        let grid = Self::default();
        grid.with_dimensions(column_count, row_count).unwrap_or(grid)
    }

    /// Build a grid, recovering from conflicts.
    ///
    /// Cells are placed in row-major order, so earlier cells win. Duplicate
    /// anchors and cells anchored on a shadowed position are dropped; spans
    /// running into an occupied position are clamped. A cell whose span
    /// would push the grid past [`DEFAULT_MAX_POSITIONS`] loses its span,
    /// and is dropped when even its anchor lies beyond. Every recovery is
    /// logged as a warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowdoc::common::coordinates::CellPosition;
    /// use flowdoc::flow::{FlowContent, FlowTableCell, FlowTableContent};
    ///
    /// let grid = FlowTableContent::new(vec![
    ///     (CellPosition::new(0, 0), FlowTableCell::with_span(FlowContent::empty(), 2, 1)),
    ///     (CellPosition::new(1, 1), FlowTableCell::new(FlowContent::from_text("x"))),
    /// ]);
    /// assert_eq!(grid.column_count(), 2);
    /// assert_eq!(grid.row_count(), 2);
    /// assert!(grid.is_shadowed(CellPosition::new(0, 1)));
    /// ```
    pub fn new(cells: impl IntoIterator<Item = (CellPosition, FlowTableCell)>) -> Self {
        let (grid, problems) = Self::build(cells.into_iter().collect(), DEFAULT_MAX_POSITIONS);
        for problem in &problems {
            tracing::warn!(%problem, "Recovered from table cell conflict");
        }
        grid
    }

    /// Build a grid from A1-keyed cells (`"A1"`, `"C4"`).
    ///
    /// Invalid keys are dropped like other conflicts. With
    /// [`TableOptions::strict`] the first conflict is returned as an error
    /// instead.
    pub fn from_keys<K: AsRef<str>>(
        cells: impl IntoIterator<Item = (K, FlowTableCell)>,
        options: &TableOptions,
    ) -> Result<Self> {
        let mut problems = Vec::new();
        let mut parsed = Vec::new();
        for (key, cell) in cells {
            match key.as_ref().parse::<CellPosition>() {
                Ok(position) => parsed.push((position, cell)),
                Err(e) => problems.push(e),
            }
        }

        let (grid, conflicts) = Self::build(parsed, options.max_positions);
        problems.extend(conflicts);

        if options.strict {
            if let Some(problem) = problems.into_iter().next() {
                return Err(problem);
            }
        } else {
            for problem in &problems {
                tracing::warn!(%problem, "Recovered from table cell conflict");
            }
        }
        Ok(grid)
    }

    fn build(
        mut candidates: Vec<(CellPosition, FlowTableCell)>,
        max_positions: u64,
    ) -> (Self, Vec<Error>) {
        // Stable sort: for duplicate anchors the first given wins
        candidates.sort_by_key(|(position, _)| *position);

        let mut grid = Self {
            max_positions,
            ..Self::default()
        };
        let mut problems = Vec::new();

        for (anchor, mut cell) in candidates {
            if grid.cells.contains_key(&anchor) {
                problems.push(Error::DuplicateCell(anchor.to_a1()));
                continue;
            }
            if let Some(owner) = grid.shadows.get(&anchor) {
                problems.push(Error::OverlappedCell {
                    key: anchor.to_a1(),
                    anchor: owner.to_a1(),
                });
                continue;
            }

            let (columns, rows) = cell.extent(anchor);
            if let Err(e) = grid.check_extent(columns, rows) {
                problems.push(e);
                cell = cell.set_span(1, 1);
                let (columns, rows) = cell.extent(anchor);
                if grid.check_extent(columns, rows).is_err() {
                    continue;
                }
            }

            let mut col_span = 1;
            while col_span < cell.col_span() {
                let next = CellPosition::new(anchor.row(), anchor.column() + col_span);
                if let Some(owner) = grid.occupant(next) {
                    problems.push(Error::OverlappedCell {
                        key: next.to_a1(),
                        anchor: owner.to_a1(),
                    });
                    break;
                }
                col_span += 1;
            }

            let mut row_span = 1;
            'rows: while row_span < cell.row_span() {
                let row = anchor.row() + row_span;
                for column in anchor.column()..anchor.column() + col_span {
                    let next = CellPosition::new(row, column);
                    if let Some(owner) = grid.occupant(next) {
                        problems.push(Error::OverlappedCell {
                            key: next.to_a1(),
                            anchor: owner.to_a1(),
                        });
                        break 'rows;
                    }
                }
                row_span += 1;
            }

            grid.place(anchor, cell.set_span(col_span, row_span));
        }

        (grid, problems)
    }

    /// Fail when growing the grid to `columns` by `rows` would exceed its limit.
    fn check_extent(&self, columns: u64, rows: u64) -> Result<()> {
        let columns = columns.max(u64::from(self.column_count));
        let rows = rows.max(u64::from(self.row_count));
        let fits = columns <= u64::from(u32::MAX)
            && rows <= u64::from(u32::MAX)
            && columns * rows <= self.max_positions;
        if fits {
            Ok(())
        } else {
            Err(Error::TableTooLarge {
                columns,
                rows,
                limit: self.max_positions,
            })
        }
    }

    /// Anchor of the cell occupying `position`, if any.
    fn occupant(&self, position: CellPosition) -> Option<CellPosition> {
        if self.cells.contains_key(&position) {
            Some(position)
        } else {
            self.shadows.get(&position).copied()
        }
    }

    fn place(&mut self, anchor: CellPosition, cell: FlowTableCell) {
        for covered in cell.covered(anchor) {
            if covered != anchor {
                self.shadows.insert(covered, anchor);
            }
        }
        self.column_count = self.column_count.max(anchor.column() + cell.col_span());
        self.row_count = self.row_count.max(anchor.row() + cell.row_span());
        self.cells.insert(anchor, cell);
    }

    /// Same grid with different default content.
    pub fn with_default_content(&self, default_content: FlowContent) -> Self {
        Self {
            default_content,
            ..self.clone()
        }
    }

    /// Grow the grid to at least the given dimensions.
    ///
    /// Fails with `TableTooLarge` past the grid's position limit.
    pub fn with_dimensions(&self, column_count: u32, row_count: u32) -> Result<Self> {
        self.check_extent(u64::from(column_count), u64::from(row_count))?;
        let mut grid = self.clone();
        grid.column_count = grid.column_count.max(column_count);
        grid.row_count = grid.row_count.max(row_count);
        grid.positions = OnceCell::new();
        Ok(grid)
    }

    #[inline]
    pub fn column_count(&self) -> u32 {
        self.column_count
    }

    #[inline]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Content of cells that have no explicit value.
    #[inline]
    pub fn default_content(&self) -> &FlowContent {
        &self.default_content
    }

    /// Explicit cells in row-major anchor order.
    pub fn cells(&self) -> impl Iterator<Item = (CellPosition, &FlowTableCell)> {
        self.cells.iter().map(|(position, cell)| (*position, cell))
    }

    /// Every grid position that is not shadowed, in row-major order.
    pub fn positions(&self) -> &[CellPosition] {
        self.positions.get_or_init(|| {
            (0..self.row_count)
                .flat_map(|row| (0..self.column_count).map(move |column| CellPosition::new(row, column)))
                .filter(|position| !self.shadows.contains_key(position))
                .collect()
        })
    }

    #[inline]
    pub fn is_shadowed(&self, position: CellPosition) -> bool {
        self.shadows.contains_key(&position)
    }

    /// Anchor of the cell covering `position` (the position itself when unshadowed).
    #[inline]
    pub fn get_anchor(&self, position: CellPosition) -> CellPosition {
        self.shadows.get(&position).copied().unwrap_or(position)
    }

    /// Cell at `position`; shadowed positions fail with `OverlappedCell`.
    pub fn get_cell(&self, position: CellPosition) -> Result<FlowTableCell> {
        self.ensure_not_shadowed(position)?;
        Ok(self
            .cells
            .get(&position)
            .cloned()
            .unwrap_or_else(|| FlowTableCell::new(self.default_content.clone())))
    }

    fn ensure_not_shadowed(&self, position: CellPosition) -> Result<()> {
        match self.shadows.get(&position) {
            Some(anchor) => Err(Error::OverlappedCell {
                key: position.to_a1(),
                anchor: anchor.to_a1(),
            }),
            None => Ok(()),
        }
    }

    /// Rebuild the grid by mapping every cell; `None` drops the cell.
    fn update<F>(&self, column_count: u32, row_count: u32, mut f: F) -> Self
    where
        F: FnMut(CellPosition, &FlowTableCell) -> Option<(CellPosition, FlowTableCell)>,
    {
        let cells = self
            .cells
            .iter()
            .filter_map(|(position, cell)| f(*position, cell))
            .collect::<Vec<_>>();
        let (mut grid, problems) = Self::build(cells, self.max_positions);
        for problem in &problems {
            tracing::warn!(%problem, "Dropped conflicting cell while updating table");
        }
        let (column_count, row_count) =
            match grid.check_extent(u64::from(column_count), u64::from(row_count)) {
                Ok(()) => (column_count, row_count),
                Err(problem) => {
                    tracing::warn!(%problem, "Kept table dimensions while updating table");
                    let current = (u64::from(self.column_count), u64::from(self.row_count));
                    if grid.check_extent(current.0, current.1).is_ok() {
                        (self.column_count, self.row_count)
                    } else {
                        (0, 0)
                    }
                },
            };
        grid.column_count = grid.column_count.max(column_count);
        grid.row_count = grid.row_count.max(row_count);
        grid.default_content = self.default_content.clone();
        grid
    }

    /// Insert `count` columns before `index`.
    ///
    /// Cells spanning across `index` grow; cells at or after it shift right.
    pub fn insert_column(&self, index: u32, count: u32) -> Self {
        self.update(self.column_count.saturating_add(count), self.row_count, |position, cell| {
            let column = position.column();
            if column >= index {
                let shifted = column.checked_add(count)?;
                Some((CellPosition::new(position.row(), shifted), cell.clone()))
            } else if column + cell.col_span() > index {
                let span = cell.col_span().saturating_add(count);
                Some((position, cell.set_span(span, cell.row_span())))
            } else {
                Some((position, cell.clone()))
            }
        })
    }

    /// Insert `count` rows before `index`.
    pub fn insert_row(&self, index: u32, count: u32) -> Self {
        self.update(self.column_count, self.row_count.saturating_add(count), |position, cell| {
            let row = position.row();
            if row >= index {
                let shifted = row.checked_add(count)?;
                Some((CellPosition::new(shifted, position.column()), cell.clone()))
            } else if row + cell.row_span() > index {
                let span = cell.row_span().saturating_add(count);
                Some((position, cell.set_span(cell.col_span(), span)))
            } else {
                Some((position, cell.clone()))
            }
        })
    }

    /// Remove `count` columns starting at `index`.
    ///
    /// Cells entirely inside the range are dropped and cells spanning into
    /// it shrink.
    pub fn remove_column(&self, index: u32, count: u32) -> Self {
        let count = count.min(self.column_count.saturating_sub(index));
        if count == 0 {
            return self.clone();
        }
        let mut grid = self.update(0, self.row_count, |position, cell| {
            let (column, span) = shrink(position.column(), cell.col_span(), index, count)?;
            Some((
                CellPosition::new(position.row(), column),
                cell.set_span(span, cell.row_span()),
            ))
        });
        grid.column_count = grid.column_count.max(self.column_count - count);
        grid
    }

    /// Remove `count` rows starting at `index`.
    pub fn remove_row(&self, index: u32, count: u32) -> Self {
        let count = count.min(self.row_count.saturating_sub(index));
        if count == 0 {
            return self.clone();
        }
        let mut grid = self.update(self.column_count, 0, |position, cell| {
            let (row, span) = shrink(position.row(), cell.row_span(), index, count)?;
            Some((
                CellPosition::new(row, position.column()),
                cell.set_span(cell.col_span(), span),
            ))
        });
        grid.row_count = grid.row_count.max(self.row_count - count);
        grid
    }

    /// Merge the cell at `position` over `col_span` by `row_span` positions.
    ///
    /// Every other covered position must hold an unmerged cell (or none);
    /// their content is discarded. Fails with `AlreadyMerged` otherwise, and
    /// with `TableTooLarge` when the span reaches past the position limit.
    pub fn merge(&self, position: CellPosition, col_span: u32, row_span: u32) -> Result<Self> {
        self.ensure_not_shadowed(position)?;
        let anchor_cell = self.get_cell(position)?;
        let merged = anchor_cell.set_span(col_span, row_span);
        let (columns, rows) = merged.extent(position);
        self.check_extent(columns, rows)?;

        let mut dropped = Vec::new();
        for covered in merged.covered(position) {
            if covered == position {
                continue;
            }
            if let Some(owner) = self.shadows.get(&covered) {
                if *owner != position {
                    return Err(Error::AlreadyMerged(format!(
                        "{} is covered by the cell at {}",
                        covered.to_a1(),
                        owner.to_a1()
                    )));
                }
            } else if let Some(cell) = self.cells.get(&covered) {
                if cell.is_merged() {
                    return Err(Error::AlreadyMerged(format!(
                        "{} spans {}x{}",
                        covered.to_a1(),
                        cell.col_span(),
                        cell.row_span()
                    )));
                }
                dropped.push(covered);
            }
        }

        let grid = self.update(self.column_count, self.row_count, |key, cell| {
            if key == position {
                Some((key, merged.clone()))
            } else if dropped.contains(&key) {
                None
            } else {
                Some((key, cell.clone()))
            }
        });
        Ok(grid.with_cell_if_missing(position, merged))
    }

    fn with_cell_if_missing(mut self, position: CellPosition, cell: FlowTableCell) -> Self {
        if !self.cells.contains_key(&position) {
            self.place(position, cell);
            self.positions = OnceCell::new();
        }
        self
    }

    /// Reset the cell at `position` to a single position.
    pub fn split(&self, position: CellPosition) -> Result<Self> {
        self.ensure_not_shadowed(position)?;
        if !self.cells.get(&position).is_some_and(FlowTableCell::is_merged) {
            return Ok(self.clone());
        }
        Ok(self.update(self.column_count, self.row_count, |key, cell| {
            if key == position {
                Some((key, cell.set_span(1, 1)))
            } else {
                Some((key, cell.clone()))
            }
        }))
    }

    /// Replace the content of the cell at `position`.
    pub fn set_content(&self, position: CellPosition, content: FlowContent) -> Result<Self> {
        self.ensure_not_shadowed(position)?;
        self.check_extent(
            u64::from(position.column()) + 1,
            u64::from(position.row()) + 1,
        )?;
        let cell = self.get_cell(position)?.set_content(content);
        let mut grid = self.clone();
        grid.cells.insert(position, cell);
        grid.column_count = grid.column_count.max(position.column() + 1);
        grid.row_count = grid.row_count.max(position.row() + 1);
        grid.positions = OnceCell::new();
        Ok(grid)
    }

    /// Replace the whole cell at `position`, merging or splitting as needed.
    pub fn set_cell(&self, position: CellPosition, cell: FlowTableCell) -> Result<Self> {
        let grid = self.split(position)?.set_content(position, cell.content.clone())?;
        if cell.is_merged() {
            grid.merge(position, cell.col_span(), cell.row_span())
        } else {
            Ok(grid)
        }
    }

    /// Map the content of every unshadowed position.
    ///
    /// Returns the same grid, borrowed, when the callback changes nothing.
    pub fn update_all_content<F>(&self, mut f: F) -> Cow<'_, Self>
    where
        F: FnMut(CellPosition, &FlowContent) -> FlowContent,
    {
        let mut changed: Vec<(CellPosition, FlowContent)> = Vec::new();
        for &position in self.positions() {
            let current = self
                .cells
                .get(&position)
                .map_or(&self.default_content, FlowTableCell::content);
            let updated = f(position, current);
            if updated != *current {
                changed.push((position, updated));
            }
        }

        if changed.is_empty() {
            return Cow::Borrowed(self);
        }

        let mut grid = self.clone();
        for (position, content) in changed {
            let cell = match grid.cells.get(&position) {
                Some(cell) => cell.set_content(content),
                None => FlowTableCell::new(content),
            };
            grid.cells.insert(position, cell);
        }
        Cow::Owned(grid)
    }
}

/// New start and span of a cell `[start, start + span)` after removing
/// `[index, index + count)`; `None` when nothing of it remains.
fn shrink(start: u32, span: u32, index: u32, count: u32) -> Option<(u32, u32)> {
    let end = index + count;
    let stop = start + span;
    if stop <= index {
        return Some((start, span));
    }
    if start >= end {
        return Some((start - count, span));
    }
    let overlap = stop.min(end) - start.max(index);
    let span = span - overlap;
    if span == 0 {
        return None;
    }
    Some((start.min(index), span))
}

/// Declared column properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FlowTableColumn {
    /// Relative width
    pub width: Option<u32>,
}

/// Table node: column declarations, style and grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowTable {
    pub columns: BTreeMap<u32, FlowTableColumn>,
    pub style: TableStyle,
    pub content: FlowTableContent,
}

impl FlowTable {
    pub fn new(content: FlowTableContent) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    /// Column declaration for `index` (default when undeclared).
    pub fn column(&self, index: u32) -> FlowTableColumn {
        self.columns.get(&index).copied().unwrap_or_default()
    }

    /// Insert columns into the grid and shift declarations after `index`.
    pub fn insert_columns(&self, index: u32, count: u32) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|(&column, value)| {
                let column = if column >= index {
                    column.saturating_add(count)
                } else {
                    column
                };
                (column, *value)
            })
            .collect();
        Self {
            columns,
            style: self.style.clone(),
            content: self.content.insert_column(index, count),
        }
    }

    /// Remove columns from the grid along with their declarations.
    pub fn remove_columns(&self, index: u32, count: u32) -> Self {
        let end = index.saturating_add(count);
        let columns = self
            .columns
            .iter()
            .filter(|(column, _)| !(index..end).contains(*column))
            .map(|(&column, value)| {
                let column = if column >= end { column - count } else { column };
                (column, *value)
            })
            .collect();
        Self {
            columns,
            style: self.style.clone(),
            content: self.content.remove_column(index, count),
        }
    }

    pub fn insert_rows(&self, index: u32, count: u32) -> Self {
        Self {
            content: self.content.insert_row(index, count),
            ..self.clone()
        }
    }

    pub fn remove_rows(&self, index: u32, count: u32) -> Self {
        Self {
            content: self.content.remove_row(index, count),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(key: &str) -> CellPosition {
        key.parse().unwrap()
    }

    fn cell(text: &str) -> FlowTableCell {
        FlowTableCell::new(FlowContent::from_text(text))
    }

    fn spanning(text: &str, col_span: u32, row_span: u32) -> FlowTableCell {
        FlowTableCell::with_span(FlowContent::from_text(text), col_span, row_span)
    }

    #[test]
    fn test_overlapping_cell_dropped() {
        let grid = FlowTableContent::from_keys(
            vec![("B1", cell("b")), ("A1", spanning("a", 2, 1))],
            &TableOptions::default(),
        )
        .unwrap();

        assert_eq!(grid.cells().count(), 1);
        assert!(grid.is_shadowed(pos("B1")));
        assert_eq!(grid.get_anchor(pos("B1")), pos("A1"));
        assert!(matches!(
            grid.get_cell(pos("B1")),
            Err(Error::OverlappedCell { ref key, ref anchor }) if key == "B1" && anchor == "A1"
        ));
        assert_eq!(grid.get_cell(pos("A1")).unwrap().col_span(), 2);
    }

    #[test]
    fn test_strict_construction_fails() {
        let result = FlowTableContent::from_keys(
            vec![("A1", spanning("a", 2, 1)), ("B1", cell("b"))],
            &TableOptions::new().with_strict(true),
        );
        assert!(matches!(result, Err(Error::OverlappedCell { .. })));

        let result = FlowTableContent::from_keys(
            vec![("A1", cell("a")), ("nope", cell("b"))],
            &TableOptions::new().with_strict(true),
        );
        assert!(matches!(result, Err(Error::InvalidCellKey(_))));

        let result = FlowTableContent::from_keys(
            vec![("A1", cell("a")), ("a1", cell("b"))],
            &TableOptions::new().with_strict(true),
        );
        assert!(matches!(result, Err(Error::DuplicateCell(_))));
    }

    #[test]
    fn test_spans_are_clamped() {
        // B2 is claimed by B1's row span before A2 is placed
        let grid = FlowTableContent::from_keys(
            vec![("B1", spanning("b", 1, 2)), ("A2", spanning("a", 3, 2))],
            &TableOptions::default(),
        )
        .unwrap();
        let a2 = grid.get_cell(pos("A2")).unwrap();
        assert_eq!((a2.col_span(), a2.row_span()), (1, 2));
        assert_eq!(grid.row_count(), 3);
    }

    #[test]
    fn test_oversized_span_is_reset() {
        let grid = FlowTableContent::from_keys(
            vec![("A1", cell("a")), ("B1", spanning("b", u32::MAX, 1))],
            &TableOptions::default(),
        )
        .unwrap();
        let b1 = grid.get_cell(pos("B1")).unwrap();
        assert_eq!((b1.col_span(), b1.row_span()), (1, 1));
        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.positions().len(), 2);

        let result = FlowTableContent::from_keys(
            vec![("A1", spanning("a", 2000, 2000))],
            &TableOptions::new().with_strict(true),
        );
        assert!(matches!(result, Err(Error::TableTooLarge { limit: DEFAULT_MAX_POSITIONS, .. })));
    }

    #[test]
    fn test_far_anchor_is_dropped() {
        let grid = FlowTableContent::new(vec![
            (pos("A1"), cell("a")),
            (CellPosition::new(u32::MAX, u32::MAX), cell("far")),
        ]);
        assert_eq!(grid.cells().count(), 1);
        assert_eq!((grid.column_count(), grid.row_count()), (1, 1));
    }

    #[test]
    fn test_position_limit() {
        let options = TableOptions::new().with_max_positions(6);
        let grid = FlowTableContent::from_keys(vec![("A1", spanning("a", 3, 2))], &options).unwrap();
        assert_eq!(grid.positions().len(), 1);
        assert_eq!(grid.get_anchor(pos("C2")), pos("A1"));

        assert!(matches!(
            grid.with_dimensions(4, 2),
            Err(Error::TableTooLarge { columns: 4, rows: 2, limit: 6 })
        ));
        assert!(matches!(
            grid.set_content(pos("A3"), FlowContent::empty()),
            Err(Error::TableTooLarge { .. })
        ));

        // Growth past the limit keeps the current dimensions
        let grid = FlowTableContent::from_keys(vec![("A1", cell("a"))], &options)
            .unwrap()
            .with_dimensions(3, 2)
            .unwrap();
        let grown = grid.insert_column(3, 1);
        assert_eq!((grown.column_count(), grown.row_count()), (3, 2));
    }

    #[test]
    fn test_merge_past_limit_fails() {
        let grid = FlowTableContent::empty(2, 2);
        assert!(matches!(
            grid.merge(pos("A1"), u32::MAX, u32::MAX),
            Err(Error::TableTooLarge { .. })
        ));
        assert_eq!(FlowTableContent::empty(u32::MAX, u32::MAX).positions().len(), 0);
    }

    #[test]
    fn test_default_content_on_read() {
        let grid = FlowTableContent::empty(2, 2).with_default_content(FlowContent::from_text("-"));
        let read = grid.get_cell(pos("B2")).unwrap();
        assert_eq!(read.content().plain_text(), "-");
        assert_eq!(grid.positions().len(), 4);
    }

    #[test]
    fn test_insert_column_grows_spanning_cell() {
        let grid = FlowTableContent::new(vec![
            (pos("A1"), spanning("a", 2, 1)),
            (pos("A2"), cell("c")),
            (pos("B2"), cell("d")),
        ]);
        assert_eq!(grid.column_count(), 2);

        let grown = grid.insert_column(1, 1);
        assert_eq!(grown.column_count(), 3);
        assert_eq!(grown.get_cell(pos("A1")).unwrap().col_span(), 3);
        assert_eq!(grown.get_cell(pos("C2")).unwrap().content().plain_text(), "d");
        assert!(grown.get_cell(pos("B2")).unwrap().content().is_empty());
    }

    #[test]
    fn test_insert_row_shifts_cells() {
        let grid = FlowTableContent::new(vec![(pos("A1"), cell("a")), (pos("A2"), cell("b"))]);
        let grown = grid.insert_row(1, 2);
        assert_eq!(grown.row_count(), 4);
        assert_eq!(grown.get_cell(pos("A4")).unwrap().content().plain_text(), "b");
    }

    #[test]
    fn test_remove_column_shrinks_spans() {
        let grid = FlowTableContent::new(vec![
            (pos("A1"), spanning("a", 3, 1)),
            (pos("B2"), cell("inside")),
            (pos("C2"), cell("after")),
        ]);
        let shrunk = grid.remove_column(1, 1);
        assert_eq!(shrunk.column_count(), 2);
        assert_eq!(shrunk.get_cell(pos("A1")).unwrap().col_span(), 2);
        assert_eq!(shrunk.get_cell(pos("B2")).unwrap().content().plain_text(), "after");

        // Anchor inside the removed range moves to the range start
        let grid = FlowTableContent::new(vec![(pos("B1"), spanning("b", 2, 1))]);
        let shrunk = grid.remove_column(0, 2);
        let moved = shrunk.get_cell(pos("A1")).unwrap();
        assert_eq!(moved.content().plain_text(), "b");
        assert_eq!(moved.col_span(), 1);
    }

    #[test]
    fn test_remove_row_drops_cells() {
        let grid = FlowTableContent::new(vec![(pos("A1"), cell("a")), (pos("A2"), cell("b"))]);
        let shrunk = grid.remove_row(0, 1);
        assert_eq!(shrunk.row_count(), 1);
        assert_eq!(shrunk.get_cell(pos("A1")).unwrap().content().plain_text(), "b");
    }

    #[test]
    fn test_merge_and_split() {
        let grid = FlowTableContent::new(vec![
            (pos("A1"), cell("a")),
            (pos("B1"), cell("b")),
            (pos("A2"), cell("c")),
        ]);
        let merged = grid.merge(pos("A1"), 2, 2).unwrap();
        assert_eq!(merged.cells().count(), 1);
        assert!(merged.is_shadowed(pos("B2")));
        assert_eq!(merged.positions().len(), 1);

        assert!(matches!(
            merged.merge(pos("B1"), 1, 1),
            Err(Error::OverlappedCell { .. })
        ));

        let split = merged.split(pos("A1")).unwrap();
        assert!(!split.is_shadowed(pos("B2")));
        assert!(split.get_cell(pos("B1")).unwrap().content().is_empty());
        assert_eq!(split.positions().len(), 4);
    }

    #[test]
    fn test_merge_over_merged_cell_fails() {
        let grid = FlowTableContent::new(vec![(pos("B1"), spanning("b", 1, 2))]);
        assert!(matches!(
            grid.merge(pos("A1"), 2, 1),
            Err(Error::AlreadyMerged(_))
        ));
        assert!(matches!(
            grid.merge(pos("A2"), 2, 1),
            Err(Error::AlreadyMerged(_))
        ));
    }

    #[test]
    fn test_merge_empty_anchor() {
        let grid = FlowTableContent::empty(3, 1);
        let merged = grid.merge(pos("B1"), 2, 1).unwrap();
        assert_eq!(merged.get_cell(pos("B1")).unwrap().col_span(), 2);
        assert!(merged.is_shadowed(pos("C1")));
    }

    #[test]
    fn test_set_cell() {
        let grid = FlowTableContent::empty(2, 2);
        let updated = grid.set_cell(pos("A1"), spanning("x", 1, 2)).unwrap();
        let a1 = updated.get_cell(pos("A1")).unwrap();
        assert_eq!(a1.content().plain_text(), "x");
        assert_eq!(a1.row_span(), 2);
        assert!(updated.set_content(pos("A2"), FlowContent::empty()).is_err());
    }

    #[test]
    fn test_update_all_content_short_circuits() {
        let grid = FlowTableContent::new(vec![(pos("A1"), cell("a"))]);
        let same = grid.update_all_content(|_, content| content.clone());
        assert!(matches!(same, Cow::Borrowed(_)));

        let upper = grid.update_all_content(|_, content| {
            FlowContent::from_text(&content.plain_text().to_uppercase())
        });
        assert!(matches!(upper, Cow::Owned(_)));
        assert_eq!(upper.get_cell(pos("A1")).unwrap().content().plain_text(), "A");
    }

    #[test]
    fn test_table_column_declarations_shift() {
        let mut table = FlowTable::new(FlowTableContent::empty(3, 1));
        table.columns.insert(0, FlowTableColumn { width: Some(1) });
        table.columns.insert(2, FlowTableColumn { width: Some(3) });

        let inserted = table.insert_columns(1, 2);
        assert_eq!(inserted.column(4).width, Some(3));
        assert_eq!(inserted.content.column_count(), 5);

        let removed = table.remove_columns(1, 1);
        assert_eq!(removed.column(1).width, Some(3));
        assert_eq!(removed.column(0).width, Some(1));
        assert_eq!(removed.content.column_count(), 2);
    }
}
