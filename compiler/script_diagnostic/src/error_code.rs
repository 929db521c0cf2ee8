//! Stable error codes for every diagnostic the front end can emit.
//!
//! Format: `E####` where the first digit is the phase:
//! - `E1xxx` — syntax errors (lexer and parser)
//! - `E2xxx` — semantic errors (declarations, types, overload resolution)

use std::fmt;

/// Compilation phase an error code belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Phase {
    Syntax,
    Semantic,
}

/// Every diagnostic carries one of these codes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // === Syntax (E1xxx) ===
    UnexpectedToken,
    UnexpectedEndOfInput,
    UnexpectedFragmentEnd,
    ExpectedIdentifier,
    ExpectedDeclaration,
    ExpectedLiteral,
    ExpectedOperator,
    ExpectedBinaryOperator,
    ExpectedPrefixOperator,
    ExpectedOperatorSymbol,
    ExpectedUserDefinedName,
    ExpectedEmptyStringLiteral,
    ExpectedCurrentClassName,
    CouldNotReadType,
    MissingConditionalColon,
    CouldNotParseLambdaCapture,
    IllegalUseOfKeyword,
    InvalidEmptyOperand,
    InvalidEmptyBrackets,
    UnterminatedStringLiteral,
    UnterminatedBlockComment,
    InvalidNumericLiteral,
    InvalidEscapeSequence,
    UnexpectedCharacter,

    // === Semantic (E2xxx) ===
    IllegalUseOfThis,
    InvalidUseOfDelegatedConstructor,
    NotDataMember,
    InheritedDataMember,
    DataMemberAlreadyHasInitializer,
    NoDelegatingConstructorFound,
    CouldNotFindValidBaseConstructor,
    InitializerListAsFirstArrayElement,
    ReturnStatementWithoutValue,
    ReturnStatementWithValue,
    ReferencesMustBeInitialized,
    EnumerationsCannotBeDefaultConstructed,
    EnumerationsMustBeInitialized,
    FunctionVariablesMustBeInitialized,
    VariableCannotBeDefaultConstructed,
    ClassHasDeletedDefaultCtor,
    InvalidTypeName,
    ArrayElementNotConvertible,
    ArraySubscriptOnNonObject,
    CouldNotFindValidSubscriptOperator,
    CouldNotFindValidConstructor,
    CouldNotFindValidMemberFunction,
    CouldNotFindValidOperator,
    CouldNotFindValidCallOperator,
    CouldNotFindValidLiteralOperator,
    AmbiguousFunctionName,
    TemplateNamesAreNotExpressions,
    TypeNameInExpression,
    NamespaceNameInExpression,
    TooManyArgumentInInitialization,
    TooManyArgumentInReferenceInitialization,
    CouldNotConvert,
    CouldNotFindCommonType,
    CannotAccessMemberOfNonObject,
    NoSuchMember,
    NoSuchCallee,
    UnknownTypeInBraceInitialization,
    NarrowingConversionInBraceInitialization,
    AutoMustBeUsedWithAssignment,
    AutoReturnTypeMismatch,
    CallToDeletedFunction,
    FunctionCannotBeDefaulted,
    DataMemberIsNotCopyable,
    ParentHasNoDefaultConstructor,
    ParentHasDeletedDefaultConstructor,
    ParentHasNoCopyConstructor,
    ParentHasDeletedCopyConstructor,
    InaccessibleMember,
    InvalidBaseClass,
    LiteralOperatorNotInNamespace,
    UnknownModuleName,
    InvalidTemplateArgument,
    MissingNonDefaultedTemplateParameter,
    CouldNotDeduceTemplateArgument,
    CouldNotResolveOperatorName,
    InvalidParamCountInOperatorOverload,
    OpOverloadMustBeDeclaredAsMember,
    StaticDataMemberMustBeInitialized,
    CannotCaptureThis,
    UnknownCaptureName,
    CouldNotFindValidOverload,
}

impl ErrorCode {
    /// Numeric code, e.g. `1001` for `E1001`.
    pub fn code(self) -> u16 {
        use ErrorCode::*;
        match self {
            UnexpectedToken => 1001,
            UnexpectedEndOfInput => 1002,
            UnexpectedFragmentEnd => 1003,
            ExpectedIdentifier => 1004,
            ExpectedDeclaration => 1005,
            ExpectedLiteral => 1006,
            ExpectedOperator => 1007,
            ExpectedBinaryOperator => 1008,
            ExpectedPrefixOperator => 1009,
            ExpectedOperatorSymbol => 1010,
            ExpectedUserDefinedName => 1011,
            ExpectedEmptyStringLiteral => 1012,
            ExpectedCurrentClassName => 1013,
            CouldNotReadType => 1014,
            MissingConditionalColon => 1015,
            CouldNotParseLambdaCapture => 1016,
            IllegalUseOfKeyword => 1017,
            InvalidEmptyOperand => 1018,
            InvalidEmptyBrackets => 1019,
            UnterminatedStringLiteral => 1020,
            UnterminatedBlockComment => 1021,
            InvalidNumericLiteral => 1022,
            InvalidEscapeSequence => 1023,
            UnexpectedCharacter => 1024,

            IllegalUseOfThis => 2001,
            InvalidUseOfDelegatedConstructor => 2002,
            NotDataMember => 2003,
            InheritedDataMember => 2004,
            DataMemberAlreadyHasInitializer => 2005,
            NoDelegatingConstructorFound => 2006,
            CouldNotFindValidBaseConstructor => 2007,
            InitializerListAsFirstArrayElement => 2008,
            ReturnStatementWithoutValue => 2009,
            ReturnStatementWithValue => 2010,
            ReferencesMustBeInitialized => 2011,
            EnumerationsCannotBeDefaultConstructed => 2012,
            EnumerationsMustBeInitialized => 2013,
            FunctionVariablesMustBeInitialized => 2014,
            VariableCannotBeDefaultConstructed => 2015,
            ClassHasDeletedDefaultCtor => 2016,
            InvalidTypeName => 2017,
            ArrayElementNotConvertible => 2018,
            ArraySubscriptOnNonObject => 2019,
            CouldNotFindValidSubscriptOperator => 2020,
            CouldNotFindValidConstructor => 2021,
            CouldNotFindValidMemberFunction => 2022,
            CouldNotFindValidOperator => 2023,
            CouldNotFindValidCallOperator => 2024,
            CouldNotFindValidLiteralOperator => 2025,
            AmbiguousFunctionName => 2026,
            TemplateNamesAreNotExpressions => 2027,
            TypeNameInExpression => 2028,
            NamespaceNameInExpression => 2029,
            TooManyArgumentInInitialization => 2030,
            TooManyArgumentInReferenceInitialization => 2031,
            CouldNotConvert => 2032,
            CouldNotFindCommonType => 2033,
            CannotAccessMemberOfNonObject => 2034,
            NoSuchMember => 2035,
            NoSuchCallee => 2036,
            UnknownTypeInBraceInitialization => 2037,
            NarrowingConversionInBraceInitialization => 2038,
            AutoMustBeUsedWithAssignment => 2039,
            AutoReturnTypeMismatch => 2040,
            CallToDeletedFunction => 2041,
            FunctionCannotBeDefaulted => 2042,
            DataMemberIsNotCopyable => 2043,
            ParentHasNoDefaultConstructor => 2044,
            ParentHasDeletedDefaultConstructor => 2045,
            ParentHasNoCopyConstructor => 2046,
            ParentHasDeletedCopyConstructor => 2047,
            InaccessibleMember => 2048,
            InvalidBaseClass => 2049,
            LiteralOperatorNotInNamespace => 2050,
            UnknownModuleName => 2051,
            InvalidTemplateArgument => 2052,
            MissingNonDefaultedTemplateParameter => 2053,
            CouldNotDeduceTemplateArgument => 2054,
            CouldNotResolveOperatorName => 2055,
            InvalidParamCountInOperatorOverload => 2056,
            OpOverloadMustBeDeclaredAsMember => 2057,
            StaticDataMemberMustBeInitialized => 2058,
            CannotCaptureThis => 2059,
            UnknownCaptureName => 2060,
            CouldNotFindValidOverload => 2061,
        }
    }

    pub fn phase(self) -> Phase {
        if self.code() < 2000 {
            Phase::Syntax
        } else {
            Phase::Semantic
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

#[cfg(test)]
mod tests;
