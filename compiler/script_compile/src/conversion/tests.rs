use proptest::prelude::*;

use script_ir::{NamespaceId, StringInterner, Type};
use script_types::{register_builtins, TypeSystem};

use super::*;

fn fresh() -> (StringInterner, TypeSystem) {
    let interner = StringInterner::new();
    let mut ts = TypeSystem::new(&interner);
    register_builtins(&mut ts, &interner);
    (interner, ts)
}

#[test]
fn identity_is_exact_match() {
    let (_i, ts) = fresh();
    let conv = StandardConversion::compute(Type::INT, Type::INT, &ts);
    assert_eq!(conv.rank(), ConversionRank::ExactMatch);
    assert!(conv.is_copy());
}

#[test]
fn widening_is_promotion_narrowing_is_conversion() {
    let (_i, ts) = fresh();

    let widen = StandardConversion::compute(Type::INT, Type::DOUBLE, &ts);
    assert_eq!(widen.rank(), ConversionRank::Promotion);
    assert!(!widen.is_narrowing());

    let narrow = StandardConversion::compute(Type::DOUBLE, Type::INT, &ts);
    assert_eq!(narrow.rank(), ConversionRank::Conversion);
    assert!(narrow.is_narrowing());

    // Anything-to-bool is a conversion, not a promotion.
    let to_bool = StandardConversion::compute(Type::INT, Type::BOOLEAN, &ts);
    assert_eq!(to_bool.rank(), ConversionRank::Conversion);
}

#[test]
fn reference_binding_requires_exact_base() {
    let (_i, ts) = fresh();
    let ok = StandardConversion::compute(Type::INT, Type::make_ref(Type::INT), &ts);
    assert!(!ok.is_not_convertible());
    assert!(ok.is_reference_binding());

    let bad = StandardConversion::compute(Type::DOUBLE, Type::make_ref(Type::INT), &ts);
    assert!(bad.is_not_convertible());
}

#[test]
fn const_source_cannot_bind_to_mutable_reference() {
    let (_i, ts) = fresh();
    let conv = StandardConversion::compute(
        Type::INT.with_const(),
        Type::make_ref(Type::INT),
        &ts,
    );
    assert!(conv.is_not_convertible());

    let ok = StandardConversion::compute(Type::INT.with_const(), Type::cref(Type::INT), &ts);
    assert!(!ok.is_not_convertible());
}

#[test]
fn derived_to_base_records_depth() {
    let (interner, mut ts) = fresh();
    let a = ts.register_class(interner.intern("A"), NamespaceId::ROOT);
    let b = ts.register_class(interner.intern("B"), NamespaceId::ROOT);
    let c = ts.register_class(interner.intern("C"), NamespaceId::ROOT);
    ts.class_mut(b).parent = Some(a);
    ts.class_mut(c).parent = Some(b);

    let (a_ty, c_ty) = (ts.class(a).ty, ts.class(c).ty);

    let conv = StandardConversion::compute(c_ty, Type::make_ref(a_ty), &ts);
    assert!(conv.is_derived_to_base());
    assert_eq!(conv.derived_to_base_depth(), 2);
    assert_eq!(conv.rank(), ConversionRank::Conversion);

    // Unrelated classes do not convert.
    let x = ts.register_class(interner.intern("X"), NamespaceId::ROOT);
    let x_ty = ts.class(x).ty;
    assert!(StandardConversion::compute(x_ty, Type::make_ref(a_ty), &ts).is_not_convertible());
}

#[test]
fn smaller_derived_to_base_depth_is_better() {
    let shallow = StandardConversion::derived_to_base(1, true, false);
    let deep = StandardConversion::derived_to_base(3, true, false);
    assert!(shallow.better_than(deep));
    assert!(!deep.better_than(shallow));
}

#[test]
fn enum_to_int_requires_value_destination() {
    let (interner, mut ts) = fresh();
    let e = ts.register_enum(interner.intern("E"), false, NamespaceId::ROOT);
    let e_ty = ts.enum_(e).ty;

    let ok = StandardConversion::compute(e_ty, Type::INT, &ts);
    assert!(ok.is_enum_to_int());
    assert_eq!(ok.rank(), ConversionRank::Conversion);

    let bad = StandardConversion::compute(e_ty, Type::make_ref(Type::INT), &ts);
    assert!(bad.is_not_convertible());
}

#[test]
fn rank_ordering_is_total() {
    assert!(ConversionRank::ExactMatch < ConversionRank::Promotion);
    assert!(ConversionRank::Promotion < ConversionRank::Conversion);
    assert!(ConversionRank::Conversion < ConversionRank::UserDefined);
    assert!(ConversionRank::UserDefined < ConversionRank::NotConvertible);
}

fn arb_standard_conversion() -> impl Strategy<Value = StandardConversion> {
    let (_i, ts) = fresh();
    let fundamentals = [Type::BOOLEAN, Type::CHAR, Type::INT, Type::FLOAT, Type::DOUBLE];
    (0usize..5, 0usize..5, any::<bool>(), any::<bool>()).prop_map(move |(s, d, r, c)| {
        let mut dest = fundamentals[d];
        if r {
            dest = Type::make_ref(dest);
        }
        if c {
            dest = dest.with_const();
        }
        StandardConversion::compute(fundamentals[s], dest, &ts)
    })
}

proptest! {
    /// `better_than` is antisymmetric: for equal-rank conversions either
    /// one is strictly better or they are incomparable, never both.
    #[test]
    fn better_than_is_antisymmetric(
        a in arb_standard_conversion(),
        b in arb_standard_conversion(),
    ) {
        prop_assert!(!(a.better_than(b) && b.better_than(a)));
    }

    /// A conversion never beats itself.
    #[test]
    fn better_than_is_irreflexive(a in arb_standard_conversion()) {
        prop_assert!(!a.better_than(a));
    }
}
