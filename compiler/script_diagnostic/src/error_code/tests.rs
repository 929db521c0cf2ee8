use super::*;

#[test]
fn display_is_zero_padded() {
    assert_eq!(ErrorCode::UnexpectedToken.to_string(), "E1001");
    assert_eq!(ErrorCode::CouldNotConvert.to_string(), "E2032");
}

#[test]
fn phase_follows_leading_digit() {
    assert_eq!(ErrorCode::UnterminatedStringLiteral.phase(), Phase::Syntax);
    assert_eq!(
        ErrorCode::NarrowingConversionInBraceInitialization.phase(),
        Phase::Semantic
    );
}
