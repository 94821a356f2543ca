//! # The incremental simplex engine
//!
//! The solver keeps the constraint system in *basic feasible solved form*: a
//! set of rows, each defining one basic symbol as a constant plus a linear
//! combination of parametric symbols, together with an objective row that
//! weighs the error symbols of all non-required constraints. Between public
//! calls two invariants hold: every row's constant is non-negative
//! (feasibility), and the objective has no negative coefficient on any
//! pivotable symbol (optimality).
//!
//! Adding a constraint converts it into such a row, chooses a subject to
//! become basic, substitutes the row through the tableau, and re-optimizes
//! with the primal simplex. Removing a constraint pivots its marker symbol
//! to the basis and drops the defining row. Suggesting values for edit
//! variables shifts row constants directly, which may make rows infeasible;
//! the dual simplex then restores feasibility while optimality is kept.
use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;

use crate::data::constraint::{Constraint, Relation};
use crate::data::expression::Expression;
use crate::data::linear::LinearExpression;
use crate::data::precision::{approx_eq, near_zero};
use crate::data::strength::Strength;
use crate::data::symbol::{Symbol, SymbolKind};
use crate::data::variable::Variable;
use crate::error::Error;


/// A tableau row: a linear expression over internal symbols.
pub(crate) type Row = Expression<Symbol>;

/// The symbols created for an installed constraint. They are the handles by
/// which the constraint is found again for removal or modification.
#[derive(Clone, Copy, Debug)]
struct ConstraintInfo {
    /// The slack (inequality), dummy (required equality) or positive error
    /// (non-required equality) symbol of the constraint.
    marker: Symbol,
    /// The negative error symbol, for non-required constraints.
    other: Option<Symbol>,
    /// The right-hand side the constraint was last solved with; the anchor
    /// for `set_constant` deltas.
    prev_constant: f64,
}

/// Bookkeeping for one registered edit variable.
struct EditInfo {
    constraint: Constraint,
    plus: Symbol,
    minus: Symbol,
    prev_constant: f64,
}

/// Which objective row the primal loop minimizes.
#[derive(Clone, Copy)]
enum Target {
    Objective,
    Artificial,
}

/// Solver for systems of linear constraints, using the Cassowary algorithm.
///
/// Symbol ids are allocated from a counter owned by this instance; symbols
/// from different solvers must never be mixed in one tableau. Pivot choices
/// break ties by symbol id, so for a fixed sequence of operations the
/// solver is deterministic, but the solution chosen among equally good
/// optima can depend on the order in which constraints were added.
pub struct SimplexSolver {
    auto_update: bool,
    next_symbol_id: u32,
    /// One external symbol per variable the solver has seen.
    vars: HashMap<Variable, Symbol>,
    /// The defining row of every basic symbol. A symbol is basic iff it is
    /// a key here; a basic symbol never occurs in its own row.
    rows: HashMap<Symbol, Row>,
    constraints: HashMap<Constraint, ConstraintInfo>,
    /// Basic symbols whose rows have gone negative; drained by the dual
    /// optimization pass.
    infeasible_rows: Vec<Symbol>,
    edits: HashMap<Variable, EditInfo>,
    objective: Row,
    /// Scratch objective, only non-empty while a constraint is being added
    /// through an artificial variable.
    artificial: Row,
}

impl SimplexSolver {
    pub fn new() -> Self {
        SimplexSolver {
            auto_update: true,
            next_symbol_id: 0,
            vars: HashMap::new(),
            rows: HashMap::new(),
            constraints: HashMap::new(),
            infeasible_rows: Vec::new(),
            edits: HashMap::new(),
            objective: Row::new(0.0),
            artificial: Row::new(0.0),
        }
    }

    /// Add a constraint to the system.
    ///
    /// Fails with [`Error::DuplicateConstraint`] if this constraint handle
    /// was already added, and with [`Error::RequiredFailure`] if the
    /// constraint is required and no assignment can satisfy it together
    /// with the required constraints already present. On failure the solver
    /// is left as it was.
    pub fn add_constraint(&mut self, constraint: &Constraint) -> Result<(), Error> {
        self.add_constraint_inner(constraint)?;
        self.autoupdate();
        Ok(())
    }

    /// Add several constraints, refreshing the external variables once at
    /// the end. Stops at the first failure; constraints added before it
    /// stay in the solver.
    pub fn add_constraints(&mut self, constraints: &[Constraint]) -> Result<(), Error> {
        for constraint in constraints {
            self.add_constraint_inner(constraint)?;
        }
        self.autoupdate();
        Ok(())
    }

    /// Remove a previously added constraint.
    pub fn remove_constraint(&mut self, constraint: &Constraint) -> Result<(), Error> {
        self.remove_constraint_inner(constraint)?;
        self.autoupdate();
        Ok(())
    }

    /// Remove several constraints, refreshing the external variables once
    /// at the end.
    pub fn remove_constraints(&mut self, constraints: &[Constraint]) -> Result<(), Error> {
        for constraint in constraints {
            self.remove_constraint_inner(constraint)?;
        }
        self.autoupdate();
        Ok(())
    }

    /// Whether the constraint is currently in the solver.
    pub fn has_constraint(&self, constraint: &Constraint) -> bool {
        self.constraints.contains_key(constraint)
    }

    /// Whether the variable occurs in any constraint the solver has seen.
    pub fn has_variable(&self, variable: &Variable) -> bool {
        self.vars.contains_key(variable)
    }

    /// Update the right-hand side of an installed constraint and restore
    /// feasibility with the dual simplex.
    pub fn set_constant(&mut self, constraint: &Constraint, constant: f64) -> Result<(), Error> {
        self.set_constant_inner(constraint, constant)?;
        self.dual_optimize()?;
        self.autoupdate();
        Ok(())
    }

    /// Register `variable` for editing at the given strength.
    ///
    /// Installs the preference `variable == variable.value()`; subsequent
    /// [`suggest_value`](Self::suggest_value) calls move the target of that
    /// preference. Edit constraints cannot be required.
    pub fn add_edit_var(&mut self, variable: &Variable, strength: Strength) -> Result<(), Error> {
        if self.edits.contains_key(variable) {
            return Err(Error::DuplicateEditVariable);
        }
        if strength.is_required() {
            return Err(Error::BadRequiredStrength);
        }
        let value = variable.value();
        let constraint = Constraint::new(
            LinearExpression::from(variable) - value,
            Relation::Equal,
            strength,
        );
        self.add_constraint(&constraint)?;
        let info = self.constraints[&constraint];
        let minus = info
            .other
            .ok_or(Error::Internal("edit constraint without an error pair"))?;
        self.edits.insert(
            variable.clone(),
            EditInfo {
                constraint,
                plus: info.marker,
                minus,
                prev_constant: value,
            },
        );
        Ok(())
    }

    /// Register several edit variables at one strength.
    pub fn add_edit_vars(
        &mut self,
        variables: &[Variable],
        strength: Strength,
    ) -> Result<(), Error> {
        for variable in variables {
            self.add_edit_var(variable, strength)?;
        }
        Ok(())
    }

    /// Unregister an edit variable and drop its underlying constraint.
    pub fn remove_edit_var(&mut self, variable: &Variable) -> Result<(), Error> {
        let constraint = self
            .edits
            .get(variable)
            .ok_or(Error::UnknownEditVariable)?
            .constraint
            .clone();
        self.remove_constraint(&constraint)?;
        self.edits.remove(variable);
        Ok(())
    }

    /// Unregister several edit variables.
    pub fn remove_edit_vars(&mut self, variables: &[Variable]) -> Result<(), Error> {
        for variable in variables {
            self.remove_edit_var(variable)?;
        }
        Ok(())
    }

    /// Whether the variable is registered for editing.
    pub fn has_edit_var(&self, variable: &Variable) -> bool {
        self.edits.contains_key(variable)
    }

    /// Suggest a new value for a registered edit variable.
    ///
    /// The variable must have been registered with
    /// [`add_edit_var`](Self::add_edit_var) first.
    pub fn suggest_value(&mut self, variable: &Variable, value: f64) -> Result<(), Error> {
        self.suggest_value_inner(variable, value)?;
        self.dual_optimize()?;
        self.autoupdate();
        Ok(())
    }

    /// Suggest a new value for a variable, registering it as an edit
    /// variable at [`Strength::strong`] if needed.
    pub fn suggest(&mut self, variable: &Variable, value: f64) -> Result<(), Error> {
        if !self.has_edit_var(variable) {
            self.add_edit_var(variable, Strength::strong())?;
        }
        self.suggest_value_inner(variable, value)?;
        self.dual_optimize()?;
        self.autoupdate();
        Ok(())
    }

    /// Suggest new values for a set of variables at once, registering
    /// unregistered ones, and re-optimize a single time.
    pub fn suggest_all(&mut self, suggestions: &[(Variable, f64)]) -> Result<(), Error> {
        for (variable, value) in suggestions {
            if !self.has_edit_var(variable) {
                self.add_edit_var(variable, Strength::strong())?;
            }
            self.suggest_value_inner(variable, *value)?;
        }
        self.dual_optimize()?;
        self.autoupdate();
        Ok(())
    }

    /// Change the strength of an installed non-required constraint.
    ///
    /// Only constraints whose marker is an error symbol (non-required
    /// equalities) can change strength while installed, and the new
    /// strength must again be non-required.
    pub fn change_strength(
        &mut self,
        constraint: &Constraint,
        strength: Strength,
    ) -> Result<(), Error> {
        let info = *self
            .constraints
            .get(constraint)
            .ok_or(Error::ConstraintNotFound)?;
        if !info.marker.is_error() || strength.is_required() {
            return Err(Error::BadRequiredStrength);
        }

        let difference = strength.weight() - constraint.strength().weight();
        constraint.set_strength(strength);
        if near_zero(difference) {
            return Ok(());
        }

        Self::resolve_into(&self.rows, &mut self.objective, info.marker, difference);
        if let Some(other) = info.other {
            Self::resolve_into(&self.rows, &mut self.objective, other, difference);
        }
        self.optimize(Target::Objective)?;
        self.autoupdate();
        Ok(())
    }

    /// Write the computed values back into the external variables: the
    /// defining row's constant for basic variables, zero for the rest.
    ///
    /// Called automatically after every mutating operation unless
    /// [`set_auto_update`](Self::set_auto_update) turned that off.
    pub fn update_external_variables(&self) {
        for (variable, symbol) in &self.vars {
            let value = self.rows.get(symbol).map_or(0.0, Row::constant);
            variable.set_value(value);
        }
    }

    /// Turn automatic refreshing of external variables on or off. Turning
    /// it on refreshes immediately.
    pub fn set_auto_update(&mut self, flag: bool) {
        self.auto_update = flag;
        self.autoupdate();
    }

    /// Whether external variables are refreshed after every mutation.
    pub fn auto_update(&self) -> bool {
        self.auto_update
    }

    fn autoupdate(&self) {
        if self.auto_update {
            self.update_external_variables();
        }
    }

    fn allocate(&mut self, kind: SymbolKind) -> Symbol {
        let id = self.next_symbol_id;
        self.next_symbol_id += 1;
        Symbol::new(id, kind)
    }

    /// The external symbol for `variable`, created on first mention. Fresh
    /// variables are also pushed onto `created` so a failing `add` can
    /// forget them again.
    fn variable_symbol(&mut self, variable: &Variable, created: &mut Vec<Variable>) -> Symbol {
        if let Some(&symbol) = self.vars.get(variable) {
            return symbol;
        }
        let symbol = self.allocate(SymbolKind::External);
        self.vars.insert(variable.clone(), symbol);
        created.push(variable.clone());
        symbol
    }

    /// Add `coefficient` times `symbol` to `target`, replacing a basic
    /// symbol by its defining row so the target stays parametric-only.
    fn resolve_into(
        rows: &HashMap<Symbol, Row>,
        target: &mut Row,
        symbol: Symbol,
        coefficient: f64,
    ) {
        match rows.get(&symbol) {
            Some(row) => target.add_scaled(row, coefficient),
            None => target.add_term(symbol, coefficient),
        }
    }

    fn add_constraint_inner(&mut self, constraint: &Constraint) -> Result<(), Error> {
        if self.constraints.contains_key(constraint) {
            return Err(Error::DuplicateConstraint);
        }

        let mut created = Vec::new();
        let (mut row, tag) = self.make_expression(constraint, &mut created);

        let mut subject = Self::choose_subject(&row, &tag);
        if subject.is_none() && all_dummies(&row) {
            if !near_zero(row.constant()) {
                // Only a required equality ends up all-dummy, so nothing
                // has reached the objective yet; dropping the fresh
                // variables restores the pre-call state.
                self.forget_variables(&created);
                return Err(Error::RequiredFailure);
            }
            subject = Some(tag.marker);
        }

        match subject {
            Some(subject) => {
                row.solve_for(&subject)?;
                self.substitute_out(subject, &row);
                self.rows.insert(subject, row);
            }
            None => {
                // The artificial pass pivots through the real tableau, so
                // keep a copy to fall back on when the constraint turns
                // out to be unsatisfiable.
                let saved_rows = self.rows.clone();
                let saved_objective = self.objective.clone();
                let saved_infeasible = self.infeasible_rows.clone();
                if !self.add_with_artificial_variable(row)? {
                    self.rows = saved_rows;
                    self.objective = saved_objective;
                    self.infeasible_rows = saved_infeasible;
                    self.forget_variables(&created);
                    return Err(Error::RequiredFailure);
                }
            }
        }

        self.constraints.insert(
            constraint.clone(),
            ConstraintInfo {
                marker: tag.marker,
                other: tag.other,
                prev_constant: -constraint.expression().constant(),
            },
        );
        self.optimize(Target::Objective)
    }

    /// Convert a constraint into a tableau row over parametric symbols,
    /// with the marker symbols that make it removable later.
    ///
    /// Inequalities get a slack symbol; non-required constraints get error
    /// symbols whose weighted sum enters the objective. The row is
    /// normalized to a non-negative constant.
    fn make_expression(&mut self, constraint: &Constraint, created: &mut Vec<Variable>) -> (Row, Tag) {
        let mut row = Row::new(constraint.expression().constant());
        for (variable, &coefficient) in constraint.expression().terms() {
            let symbol = self.variable_symbol(variable, created);
            Self::resolve_into(&self.rows, &mut row, symbol, coefficient);
        }

        let tag = if constraint.is_inequality() {
            // expr <= 0 becomes expr + s == 0; for >= the slack enters
            // negatively. A non-required inequality also gets an error
            // symbol on the other side: expr + s - e == 0.
            let coefficient = if constraint.op() == Relation::LessOrEqual {
                1.0
            } else {
                -1.0
            };
            let slack = self.allocate(SymbolKind::Slack);
            row.add_term(slack, coefficient);
            if constraint.is_required() {
                Tag {
                    marker: slack,
                    other: None,
                }
            } else {
                let error = self.allocate(SymbolKind::Error);
                row.add_term(error, -coefficient);
                self.objective
                    .add_term(error, constraint.strength().weight());
                Tag {
                    marker: slack,
                    other: Some(error),
                }
            }
        } else if constraint.is_required() {
            // A required equality has neither slack nor error symbols, so
            // a dummy is added purely as a marker. It never pivots.
            let dummy = self.allocate(SymbolKind::Dummy);
            row.add_term(dummy, 1.0);
            Tag {
                marker: dummy,
                other: None,
            }
        } else {
            // expr == e+ - e-, with both deviations penalized.
            let plus = self.allocate(SymbolKind::Error);
            let minus = self.allocate(SymbolKind::Error);
            row.add_term(plus, -1.0);
            row.add_term(minus, 1.0);
            let weight = constraint.strength().weight();
            self.objective.add_term(plus, weight);
            self.objective.add_term(minus, weight);
            Tag {
                marker: plus,
                other: Some(minus),
            }
        };

        if row.constant() < 0.0 {
            row *= -1.0;
        }
        (row, tag)
    }

    /// Pick the symbol to solve the new row for: an external symbol if any,
    /// otherwise one of the freshly created pivotable symbols with a
    /// negative coefficient. Externals are scanned lowest id first so the
    /// choice does not depend on hash order.
    fn choose_subject(row: &Row, tag: &Tag) -> Option<Symbol> {
        if let Some(&external) = row.terms().keys().filter(|s| s.is_external()).min() {
            return Some(external);
        }
        if tag.marker.is_pivotable() && row.coefficient(&tag.marker) < 0.0 {
            return Some(tag.marker);
        }
        if let Some(other) = tag.other {
            if other.is_pivotable() && row.coefficient(&other) < 0.0 {
                return Some(other);
            }
        }
        None
    }

    /// Install `row` through a fresh artificial variable and try to drive
    /// that variable to zero. Returns whether that succeeded, which is the
    /// satisfiability of the constraint the row came from.
    fn add_with_artificial_variable(&mut self, row: Row) -> Result<bool, Error> {
        let artificial = self.allocate(SymbolKind::Slack);
        self.rows.insert(artificial, row.clone());
        // Minimizing this auxiliary objective minimizes the artificial
        // variable itself, since the two are equal by construction.
        self.artificial = row;

        self.optimize(Target::Artificial)?;
        let success = near_zero(self.artificial.constant());
        self.artificial = Row::new(0.0);

        // Pivot the artificial variable out of the basis, if it is still
        // in it; the row stays behind to enforce the new constraint.
        if let Some(mut dropped) = self.rows.remove(&artificial) {
            if dropped.is_constant() {
                return Ok(success);
            }
            let Some(entering) = pivotable_symbol(&dropped) else {
                return Ok(false);
            };
            dropped.solve_for_pair(artificial, &entering)?;
            self.substitute_out(entering, &dropped);
            self.rows.insert(entering, dropped);
        }

        for row in self.rows.values_mut() {
            row.erase(&artificial);
        }
        self.objective.erase(&artificial);
        Ok(success)
    }

    fn remove_constraint_inner(&mut self, constraint: &Constraint) -> Result<(), Error> {
        let info = self
            .constraints
            .remove(constraint)
            .ok_or(Error::ConstraintNotFound)?;

        // Remove the error effects from the objective *before* pivoting,
        // or substitutions into the objective would give wrong results.
        let weight = constraint.strength().weight();
        if info.marker.is_error() {
            Self::resolve_into(&self.rows, &mut self.objective, info.marker, -weight);
        }
        if let Some(other) = info.other {
            if other.is_error() {
                Self::resolve_into(&self.rows, &mut self.objective, other, -weight);
            }
        }

        // If the marker is basic its row can simply be dropped; otherwise
        // pivot it into the basis first.
        if self.rows.remove(&info.marker).is_none() {
            let leaving = self
                .marker_leaving_symbol(info.marker)
                .ok_or(Error::Internal("failed to find leaving row"))?;
            let mut row = self.rows.remove(&leaving).ok_or(Error::RowNotFound)?;
            row.solve_for_pair(leaving, &info.marker)?;
            self.substitute_out(info.marker, &row);
        }
        self.optimize(Target::Objective)
    }

    /// The row to pivot a parametric marker into, chosen to disturb the
    /// solution as little as possible: restricted rows where the marker
    /// enters negatively first (by minimum ratio), then restricted rows
    /// where it enters positively, then any external row.
    fn marker_leaving_symbol(&self, marker: Symbol) -> Option<Symbol> {
        let mut negative: Option<(Symbol, f64)> = None;
        let mut positive: Option<(Symbol, f64)> = None;
        let mut external: Option<Symbol> = None;

        for (&symbol, row) in &self.rows {
            let coefficient = row.coefficient(&marker);
            if coefficient == 0.0 {
                continue;
            }
            if symbol.is_external() {
                external = match external {
                    Some(best) if best < symbol => Some(best),
                    _ => Some(symbol),
                };
            } else if coefficient < 0.0 {
                let ratio = -row.constant() / coefficient;
                if better_ratio(&negative, symbol, ratio) {
                    negative = Some((symbol, ratio));
                }
            } else {
                let ratio = row.constant() / coefficient;
                if better_ratio(&positive, symbol, ratio) {
                    positive = Some((symbol, ratio));
                }
            }
        }

        negative
            .or(positive)
            .map(|(symbol, _)| symbol)
            .or(external)
    }

    fn set_constant_inner(&mut self, constraint: &Constraint, constant: f64) -> Result<(), Error> {
        let info = self
            .constraints
            .get_mut(constraint)
            .ok_or(Error::ConstraintNotFound)?;
        let delta = constant - info.prev_constant;
        info.prev_constant = constant;
        let marker = info.marker;
        let other = info.other;

        if marker.is_slack() || constraint.is_required() {
            // The marker enters rows against the right-hand side, except
            // under `>=` where the slack was added with the opposite sign.
            let shift = match constraint.op() {
                Relation::GreaterOrEqual => delta,
                _ => -delta,
            };
            self.shift_through_column(marker, shift);
            return Ok(());
        }

        // A non-required equality: the delta moves through its error pair
        // exactly like an edit suggestion.
        let other = other.ok_or(Error::Internal("error marker without a pair"))?;
        self.shift_error_pair(marker, other, delta);
        Ok(())
    }

    fn suggest_value_inner(&mut self, variable: &Variable, value: f64) -> Result<(), Error> {
        let info = self
            .edits
            .get_mut(variable)
            .ok_or(Error::UnknownEditVariable)?;
        let delta = value - info.prev_constant;
        info.prev_constant = value;
        let plus = info.plus;
        let minus = info.minus;
        self.shift_error_pair(plus, minus, delta);
        Ok(())
    }

    /// Apply a constant delta through an error pair. If either error
    /// symbol is basic, its row absorbs the delta directly; otherwise both
    /// occur in exactly the same rows, and every row shifts by its
    /// coefficient on the pair.
    fn shift_error_pair(&mut self, plus: Symbol, minus: Symbol, delta: f64) {
        if let Some(row) = self.rows.get_mut(&plus) {
            if row.add_constant(-delta) < 0.0 {
                self.infeasible_rows.push(plus);
            }
            return;
        }
        if let Some(row) = self.rows.get_mut(&minus) {
            if row.add_constant(delta) < 0.0 {
                self.infeasible_rows.push(minus);
            }
            return;
        }
        self.shift_through_column(plus, delta);
    }

    /// Shift every row's constant by its coefficient on `column` times
    /// `delta`, queueing restricted rows that go negative.
    fn shift_through_column(&mut self, column: Symbol, delta: f64) {
        for (symbol, row) in self.rows.iter_mut() {
            let coefficient = row.coefficient(&column);
            if row.add_constant(coefficient * delta) < 0.0 && !symbol.is_external() {
                self.infeasible_rows.push(*symbol);
            }
        }
    }

    /// Replace a symbol that is entering the basis throughout the tableau:
    /// in every other row, in the objective, and in the artificial
    /// objective while one is active. Restricted rows whose constant turns
    /// negative are queued for the dual pass.
    fn substitute_out(&mut self, symbol: Symbol, row: &Row) {
        for (basic, expression) in self.rows.iter_mut() {
            expression.substitute_out(&symbol, row);
            if basic.is_restricted() && expression.constant() < 0.0 {
                self.infeasible_rows.push(*basic);
            }
        }
        self.objective.substitute_out(&symbol, row);
        self.artificial.substitute_out(&symbol, row);
    }

    fn target_row(&self, target: Target) -> &Row {
        match target {
            Target::Objective => &self.objective,
            Target::Artificial => &self.artificial,
        }
    }

    /// The primal simplex: while the target objective has a negative
    /// coefficient on a non-dummy symbol, pivot that symbol into the basis
    /// against the row that bounds it most tightly.
    ///
    /// Requires a feasible tableau; keeps it feasible. Near-equal ratios
    /// break ties toward the smaller symbol id.
    fn optimize(&mut self, target: Target) -> Result<(), Error> {
        loop {
            let entering = self
                .target_row(target)
                .terms()
                .iter()
                .filter(|(symbol, &coefficient)| !symbol.is_dummy() && coefficient < 0.0)
                .map(|(&symbol, _)| symbol)
                .min();
            let Some(entering) = entering else {
                return Ok(());
            };

            let mut exit: Option<(Symbol, f64)> = None;
            for (&symbol, row) in &self.rows {
                if !symbol.is_pivotable() {
                    continue;
                }
                let coefficient = row.coefficient(&entering);
                if coefficient >= 0.0 {
                    continue;
                }
                let ratio = -row.constant() / coefficient;
                if better_ratio(&exit, symbol, ratio) {
                    exit = Some((symbol, ratio));
                }
            }
            let (leaving, _) =
                exit.ok_or(Error::Internal("objective function is unbounded"))?;

            let mut row = self.rows.remove(&leaving).ok_or(Error::RowNotFound)?;
            row.solve_for_pair(leaving, &entering)?;
            self.substitute_out(entering, &row);
            self.rows.insert(entering, row);
        }
    }

    /// The dual simplex: drain the infeasible queue, pivoting each
    /// negative-constant row against the entering symbol that keeps the
    /// objective optimal (minimum objective-to-row coefficient ratio over
    /// the row's positive non-dummy terms).
    fn dual_optimize(&mut self) -> Result<(), Error> {
        while let Some(leaving) = self.infeasible_rows.pop() {
            let entering = {
                let Some(row) = self.rows.get(&leaving) else {
                    continue;
                };
                if row.constant() >= 0.0 {
                    continue;
                }
                let mut entering: Option<(Symbol, f64)> = None;
                for (&symbol, &coefficient) in row.terms() {
                    if coefficient > 0.0 && !symbol.is_dummy() {
                        let ratio = self.objective.coefficient(&symbol) / coefficient;
                        if better_ratio(&entering, symbol, ratio) {
                            entering = Some((symbol, ratio));
                        }
                    }
                }
                entering
                    .map(|(symbol, _)| symbol)
                    .ok_or(Error::Internal("dual optimize failed"))?
            };

            let mut row = self.rows.remove(&leaving).ok_or(Error::RowNotFound)?;
            row.solve_for_pair(leaving, &entering)?;
            self.substitute_out(entering, &row);
            self.rows.insert(entering, row);
        }
        Ok(())
    }

    fn forget_variables(&mut self, created: &[Variable]) {
        for variable in created {
            self.vars.remove(variable);
        }
    }
}

impl Default for SimplexSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// The marker symbols of a freshly converted constraint; see
/// [`ConstraintInfo`].
struct Tag {
    marker: Symbol,
    other: Option<Symbol>,
}

/// Whether `(symbol, ratio)` beats the current best candidate: a smaller
/// ratio wins, and near-equal ratios go to the smaller symbol id.
fn better_ratio(best: &Option<(Symbol, f64)>, symbol: Symbol, ratio: f64) -> bool {
    match best {
        None => true,
        Some((best_symbol, best_ratio)) => {
            ratio < *best_ratio || (approx_eq(ratio, *best_ratio) && symbol < *best_symbol)
        }
    }
}

fn all_dummies(row: &Row) -> bool {
    row.terms().keys().all(|symbol| symbol.is_dummy())
}

fn pivotable_symbol(row: &Row) -> Option<Symbol> {
    row.terms()
        .keys()
        .filter(|symbol| symbol.is_pivotable())
        .min()
        .copied()
}

impl fmt::Display for Expression<Symbol> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let terms = self
            .terms()
            .iter()
            .sorted_by_key(|(symbol, _)| **symbol)
            .format_with(" + ", |(symbol, coefficient), f| {
                f(&format_args!("{coefficient}*{symbol}"))
            });
        if self.is_constant() {
            write!(f, "{}", self.constant())
        } else {
            write!(f, "{} + {terms}", self.constant())
        }
    }
}

impl fmt::Display for SimplexSolver {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "objective: {}", self.objective)?;
        writeln!(f, "rows:")?;
        for (symbol, row) in self.rows.iter().sorted_by_key(|(symbol, _)| **symbol) {
            writeln!(f, "  {symbol} = {row}")?;
        }
        write!(
            f,
            "infeasible: [{}]",
            self.infeasible_rows.iter().format(", "),
        )
    }
}
