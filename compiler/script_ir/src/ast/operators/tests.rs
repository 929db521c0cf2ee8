use super::OperatorContext::*;
use super::*;

#[test]
fn precedence_matches_reference_table() {
    assert_eq!(OperatorId::ScopeResolution.precedence(), 1);
    assert_eq!(OperatorId::PostIncrement.precedence(), 2);
    assert_eq!(OperatorId::PreIncrement.precedence(), 3);
    assert_eq!(OperatorId::Multiplication.precedence(), 4);
    assert_eq!(OperatorId::Addition.precedence(), 5);
    assert_eq!(OperatorId::LeftShift.precedence(), 6);
    assert_eq!(OperatorId::Less.precedence(), 7);
    assert_eq!(OperatorId::Equal.precedence(), 8);
    assert_eq!(OperatorId::BitwiseAnd.precedence(), 9);
    assert_eq!(OperatorId::BitwiseXor.precedence(), 10);
    assert_eq!(OperatorId::BitwiseOr.precedence(), 11);
    assert_eq!(OperatorId::LogicalAnd.precedence(), 12);
    assert_eq!(OperatorId::LogicalOr.precedence(), 13);
    assert_eq!(OperatorId::Assignment.precedence(), 14);
    assert_eq!(OperatorId::Conditional.precedence(), 14);
    assert_eq!(OperatorId::Comma.precedence(), 15);
}

#[test]
fn unary_and_assignment_groups_are_right_associative() {
    assert_eq!(OperatorId::associativity(3), Associativity::RightToLeft);
    assert_eq!(OperatorId::associativity(14), Associativity::RightToLeft);
    for group in [1, 2, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 15] {
        assert_eq!(OperatorId::associativity(group), Associativity::LeftToRight);
    }
}

#[test]
fn context_disambiguates_increment() {
    use crate::TokenKind;
    assert_eq!(
        OperatorId::from_token(TokenKind::PlusPlus, Prefix),
        Some(OperatorId::PreIncrement)
    );
    assert_eq!(
        OperatorId::from_token(TokenKind::PlusPlus, Postfix),
        Some(OperatorId::PostIncrement)
    );
    assert_eq!(OperatorId::from_token(TokenKind::PlusPlus, Infix), None);
}

#[test]
fn star_is_infix_only() {
    use crate::TokenKind;
    assert_eq!(
        OperatorId::from_token(TokenKind::Star, Infix),
        Some(OperatorId::Multiplication)
    );
    assert_eq!(OperatorId::from_token(TokenKind::Star, Prefix), None);
}

#[test]
fn minus_is_prefix_and_infix() {
    use crate::TokenKind;
    assert_eq!(
        OperatorId::from_token(TokenKind::Minus, Prefix),
        Some(OperatorId::UnaryMinus)
    );
    assert_eq!(
        OperatorId::from_token(TokenKind::Minus, Infix),
        Some(OperatorId::Subtraction)
    );
}
