//! Cell arena and dependency graph
//!
//! Cells are arena-allocated and addressed by [`CellId`]; the
//! referencing/observer edges are id sets rather than owning references,
//! so the cyclic graph has a single owner. The scope upholds one
//! invariant: `Y ∈ X.observers ⇔ X ∈ Y.referencing`.

use crate::bound::BoundExpr;
use ahash::{AHashMap, AHashSet};
use cellscript_core::Span;
use std::rc::Rc;

/// Stable index of a cell within its [`DependencyScope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(u32);

impl CellId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named node in the dependency graph.
#[derive(Debug)]
pub struct Cell {
    name: String,
    declared: bool,
    value: f64,
    /// The bound expression currently producing `value`; shared with the
    /// assignment statement that introduced it.
    expression: Option<Rc<BoundExpr>>,
    /// Cells this cell's expression reads.
    referencing: AHashSet<CellId>,
    /// Cells whose expressions read this cell.
    observers: AHashSet<CellId>,
    /// Site of the latest assignment, for evaluator diagnostics.
    span: Span,
    /// Per-run marker: this cell's evaluation frame is on the stack.
    evaluating: bool,
}

impl Cell {
    fn new(name: String) -> Self {
        Self {
            name,
            declared: false,
            value: 0.0,
            expression: None,
            referencing: AHashSet::new(),
            observers: AHashSet::new(),
            span: Span::empty(0),
            evaluating: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_declared(&self) -> bool {
        self.declared
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// Owns every cell of one compilation scope for its whole lifetime.
///
/// Mutated by the binder (graph building, cumulative across binds) and
/// by the evaluator (values and per-run markers); the topology never
/// changes during evaluation.
#[derive(Debug, Default)]
pub struct DependencyScope {
    cells: Vec<Cell>,
    ids: AHashMap<String, CellId>,
}

impl DependencyScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cell by name, creating an undeclared zero-valued cell
    /// on first sight. One cell per distinct name, ever.
    pub fn intern(&mut self, name: &str) -> CellId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = CellId(self.cells.len() as u32);
        self.cells.push(Cell::new(name.to_string()));
        self.ids.insert(name.to_string(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<CellId> {
        self.ids.get(name).copied()
    }

    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|cell| cell.name.as_str())
    }

    pub fn declare(&mut self, id: CellId) {
        self.cells[id.index()].declared = true;
    }

    pub fn set_value(&mut self, id: CellId, value: f64) {
        self.cells[id.index()].value = value;
    }

    pub fn expression(&self, id: CellId) -> Option<Rc<BoundExpr>> {
        self.cells[id.index()].expression.clone()
    }

    /// Install a new bound expression for `target` and repoint the
    /// observer side of the graph by diffing the old and new
    /// referencing sets, so stale edges are removed, not only new ones
    /// added.
    pub fn rebind(
        &mut self,
        target: CellId,
        expression: Rc<BoundExpr>,
        referencing: AHashSet<CellId>,
        span: Span,
    ) {
        let old = &self.cells[target.index()].referencing;
        let removed: Vec<CellId> = old.difference(&referencing).copied().collect();
        let added: Vec<CellId> = referencing.difference(old).copied().collect();

        let cell = &mut self.cells[target.index()];
        cell.referencing = referencing;
        cell.expression = Some(expression);
        cell.span = span;

        for id in removed {
            self.cells[id.index()].observers.remove(&target);
        }
        for id in added {
            self.cells[id.index()].observers.insert(target);
        }

        let cell = &self.cells[target.index()];
        tracing::debug!(
            "rebound '{}' reading {} cell(s)",
            cell.name,
            cell.referencing.len()
        );
    }

    /// Observers in ascending id order, so cascade order (and with it
    /// diagnostic order) is stable across runs.
    pub fn observers_sorted(&self, id: CellId) -> Vec<CellId> {
        let mut observers: Vec<CellId> = self.cells[id.index()].observers.iter().copied().collect();
        observers.sort_unstable();
        observers
    }

    /// Cells this cell reads, in ascending id order.
    pub fn referencing_sorted(&self, id: CellId) -> Vec<CellId> {
        let mut referencing: Vec<CellId> =
            self.cells[id.index()].referencing.iter().copied().collect();
        referencing.sort_unstable();
        referencing
    }

    // === Per-run evaluation markers ===

    pub fn clear_run_markers(&mut self) {
        for cell in &mut self.cells {
            cell.evaluating = false;
        }
    }

    pub fn begin_evaluation(&mut self, id: CellId) {
        self.cells[id.index()].evaluating = true;
    }

    pub fn finish_evaluation(&mut self, id: CellId) {
        self.cells[id.index()].evaluating = false;
    }

    pub fn is_evaluating(&self, id: CellId) -> bool {
        self.cells[id.index()].evaluating
    }

    /// Check the bidirectional edge invariant; test support.
    #[cfg(test)]
    fn edges_consistent(&self) -> bool {
        self.cells.iter().enumerate().all(|(index, cell)| {
            let id = CellId(index as u32);
            cell.referencing
                .iter()
                .all(|read| self.cells[read.index()].observers.contains(&id))
                && cell
                    .observers
                    .iter()
                    .all(|observer| self.cells[observer.index()].referencing.contains(&id))
        })
    }
}
