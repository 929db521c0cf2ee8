//! Overload resolution: best-viable-function selection.
//!
//! Candidates are processed in source order. The current best and a
//! possibly-ambiguous runner-up are kept in two slots; a later candidate
//! that strictly beats both clears the ambiguity. Two candidates compare
//! argument by argument: one is better iff no per-argument conversion is
//! worse and at least one is strictly better.

use smallvec::SmallVec;

use script_ir::{FunctionId, Type};
use script_types::TypeSystem;

use crate::conversion::{Conversion, Initialization, InitializationKind};

/// Why a candidate was rejected, for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ViabilityStatus {
    Viable,
    IncorrectParameterCount,
    CouldNotConvertArgument,
}

/// Pairwise comparison result.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum OverloadComparison {
    FirstIsBetter,
    SecondIsBetter,
    Indistinguishable,
    NotComparable,
}

#[derive(Default)]
struct Candidate {
    function: Option<FunctionId>,
    initializations: SmallVec<[Initialization; 4]>,
}

impl Candidate {
    fn set(&mut self, f: FunctionId) {
        self.function = Some(f);
        self.initializations.clear();
    }

    fn reset(&mut self) {
        self.function = None;
        self.initializations.clear();
    }
}

fn compare(a: &Candidate, b: &Candidate) -> OverloadComparison {
    if b.function.is_none() && a.function.is_some() {
        return OverloadComparison::FirstIsBetter;
    }
    if a.function.is_none() {
        return OverloadComparison::NotComparable;
    }
    if a.initializations.len() != b.initializations.len() {
        return OverloadComparison::NotComparable;
    }

    let mut first_better = false;
    let mut second_better = false;
    for (ia, ib) in a.initializations.iter().zip(&b.initializations) {
        match Conversion::comp(ia.conversion, ib.conversion) {
            -1 => first_better = true,
            1 => second_better = true,
            _ => {}
        }
    }

    match (first_better, second_better) {
        (true, false) => OverloadComparison::FirstIsBetter,
        (false, true) => OverloadComparison::SecondIsBetter,
        _ => OverloadComparison::Indistinguishable,
    }
}

/// The outcome of a successful resolution.
pub struct OverloadResolution {
    pub function: FunctionId,
    /// One initialization per *parameter position actually supplied*,
    /// including the implicit object when one was given.
    pub initializations: Vec<Initialization>,
}

/// Select the best viable function for `args`, with an optional implicit
/// object type prepended for member candidates.
///
/// Running resolution twice on the same inputs yields the same selected
/// function or the same ambiguity, as candidate order is the caller's
/// and ties never pick an arbitrary winner.
pub fn resolve_overloads(
    ts: &TypeSystem,
    candidates: &[FunctionId],
    implicit_object: Option<Type>,
    args: &[Type],
) -> Option<OverloadResolution> {
    let mut current = Candidate::default();
    let mut selected = Candidate::default();
    let mut ambiguous = Candidate::default();

    for &func in candidates {
        // Skip duplicates already held in a slot.
        if selected.function == Some(func) || ambiguous.function == Some(func) {
            continue;
        }
        current.set(func);

        if viability(ts, func, implicit_object, args, &mut current.initializations)
            != ViabilityStatus::Viable
        {
            continue;
        }

        process_candidate(&mut current, &mut selected, &mut ambiguous);
    }

    if ambiguous.function.is_none() {
        let function = selected.function?;
        Some(OverloadResolution {
            function,
            initializations: selected.initializations.to_vec(),
        })
    } else {
        None
    }
}

/// Check one candidate and fill its per-argument initializations.
pub fn viability(
    ts: &TypeSystem,
    func: FunctionId,
    implicit_object: Option<Type>,
    args: &[Type],
    out: &mut SmallVec<[Initialization; 4]>,
) -> ViabilityStatus {
    let def = ts.function(func);
    let has_object = def.has_implicit_object() && implicit_object.is_some();
    let argc = args.len() + usize::from(has_object);
    let params = def.prototype.param_count();
    let defaults = def.default_args.len();

    if argc > params || argc + defaults < params {
        return ViabilityStatus::IncorrectParameterCount;
    }

    if has_object {
        let object_ty = implicit_object.expect("checked above");
        let conv = Conversion::compute(
            object_ty,
            def.prototype.param(0),
            ts,
            crate::conversion::ConversionPolicy::NoExplicit,
        );
        // The implicit object must bind by reference, never by copy.
        if conv.is_invalid() || conv.first.is_copy() {
            return ViabilityStatus::CouldNotConvertArgument;
        }
        out.push(Initialization {
            kind: InitializationKind::Direct,
            conversion: conv,
        });
    }

    let offset = usize::from(has_object);
    for (i, &arg) in args.iter().enumerate() {
        let init = Initialization::copy(arg, def.prototype.param(i + offset), ts);
        if !init.is_valid() {
            return ViabilityStatus::CouldNotConvertArgument;
        }
        out.push(init);
    }

    ViabilityStatus::Viable
}

/// Report a candidate's viability without running a full resolution.
pub fn viability_status(
    ts: &TypeSystem,
    func: FunctionId,
    implicit_object: Option<Type>,
    args: &[Type],
) -> ViabilityStatus {
    let mut scratch = SmallVec::new();
    viability(ts, func, implicit_object, args, &mut scratch)
}

/// The best/ambiguous slot dance: an ambiguous pair survives until some
/// later candidate dominates both.
fn process_candidate(current: &mut Candidate, selected: &mut Candidate, ambiguous: &mut Candidate) {
    match compare(current, selected) {
        OverloadComparison::Indistinguishable | OverloadComparison::NotComparable => {
            std::mem::swap(ambiguous, current);
        }
        OverloadComparison::FirstIsBetter => {
            std::mem::swap(selected, current);
            if ambiguous.function.is_some()
                && compare(selected, ambiguous) == OverloadComparison::FirstIsBetter
            {
                ambiguous.reset();
            }
        }
        OverloadComparison::SecondIsBetter => {
            if ambiguous.function.is_some()
                && compare(current, ambiguous) == OverloadComparison::FirstIsBetter
            {
                std::mem::swap(ambiguous, current);
            }
        }
    }
}

#[cfg(test)]
mod tests;
