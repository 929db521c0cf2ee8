//! Operator identities, precedence and associativity.

use crate::TokenKind;

/// Built-in operator identities.
///
/// The discriminant order groups operators by precedence so the
/// range-based [`OperatorId::precedence`] stays a handful of comparisons.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(u8)]
pub enum OperatorId {
    ScopeResolution,

    PostIncrement,
    PostDecrement,
    FunctionCall,
    Subscript,
    MemberAccess,

    PreIncrement,
    PreDecrement,
    UnaryPlus,
    UnaryMinus,
    LogicalNot,
    BitwiseNot,

    Multiplication,
    Division,
    Remainder,

    Addition,
    Subtraction,

    LeftShift,
    RightShift,

    Less,
    Greater,
    LessEqual,
    GreaterEqual,

    Equal,
    Inequal,

    BitwiseAnd,
    BitwiseXor,
    BitwiseOr,
    LogicalAnd,
    LogicalOr,

    Conditional,
    Assignment,
    MultiplicationAssignment,
    DivisionAssignment,
    RemainderAssignment,
    AdditionAssignment,
    SubtractionAssignment,
    LeftShiftAssignment,
    RightShiftAssignment,
    BitwiseAndAssignment,
    BitwiseOrAssignment,
    BitwiseXorAssignment,

    Comma,
}

/// Operator associativity, per precedence group.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Associativity {
    LeftToRight,
    RightToLeft,
}

/// Resolution context when mapping a token to an operator.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum OperatorContext {
    Prefix,
    Infix,
    Postfix,
    /// Any position; used when parsing `operator` names.
    Any,
}

impl OperatorId {
    /// Precedence group, 1 (binds loosest lookup `::`) through 15 (`,`).
    ///
    /// Group numbers follow the reference table: smaller group numbers
    /// bind tighter during reduction (the reducer picks the operator with
    /// the *largest* group number as the split point).
    pub fn precedence(self) -> u8 {
        use OperatorId::*;
        match self {
            ScopeResolution => 1,
            PostIncrement | PostDecrement | FunctionCall | Subscript | MemberAccess => 2,
            PreIncrement | PreDecrement | UnaryPlus | UnaryMinus | LogicalNot | BitwiseNot => 3,
            Multiplication | Division | Remainder => 4,
            Addition | Subtraction => 5,
            LeftShift | RightShift => 6,
            Less | Greater | LessEqual | GreaterEqual => 7,
            Equal | Inequal => 8,
            BitwiseAnd => 9,
            BitwiseXor => 10,
            BitwiseOr => 11,
            LogicalAnd => 12,
            LogicalOr => 13,
            Conditional | Assignment | MultiplicationAssignment | DivisionAssignment
            | RemainderAssignment | AdditionAssignment | SubtractionAssignment
            | LeftShiftAssignment | RightShiftAssignment | BitwiseAndAssignment
            | BitwiseOrAssignment | BitwiseXorAssignment => 14,
            Comma => 15,
        }
    }

    /// Associativity of a precedence group.
    pub fn associativity(group: u8) -> Associativity {
        match group {
            3 | 14 => Associativity::RightToLeft,
            _ => Associativity::LeftToRight,
        }
    }

    /// True for the unary operators (prefix and postfix).
    pub fn is_unary(self) -> bool {
        use OperatorId::*;
        matches!(
            self,
            PostIncrement
                | PostDecrement
                | PreIncrement
                | PreDecrement
                | UnaryPlus
                | UnaryMinus
                | LogicalNot
                | BitwiseNot
        )
    }

    /// Map a token to the operator it denotes in the given context.
    ///
    /// Returns `None` when the token is not an operator symbol or cannot
    /// appear in that position (e.g. `*` as a prefix operator).
    pub fn from_token(kind: TokenKind, ctx: OperatorContext) -> Option<OperatorId> {
        use OperatorContext::*;
        use OperatorId::*;
        let op = match kind {
            TokenKind::PlusPlus => match ctx {
                Prefix => PreIncrement,
                Postfix | Any => PostIncrement,
                Infix => return None,
            },
            TokenKind::MinusMinus => match ctx {
                Prefix => PreDecrement,
                Postfix | Any => PostDecrement,
                Infix => return None,
            },
            TokenKind::Plus => match ctx {
                Prefix => UnaryPlus,
                Infix | Any => Addition,
                Postfix => return None,
            },
            TokenKind::Minus => match ctx {
                Prefix => UnaryMinus,
                Infix | Any => Subtraction,
                Postfix => return None,
            },
            TokenKind::Not => match ctx {
                Prefix | Any => LogicalNot,
                _ => return None,
            },
            TokenKind::Tilde => match ctx {
                Prefix | Any => BitwiseNot,
                _ => return None,
            },
            TokenKind::Star => Multiplication,
            TokenKind::Slash => Division,
            TokenKind::Percent => Remainder,
            TokenKind::LeftShift => LeftShift,
            TokenKind::RightShift => RightShift,
            TokenKind::Less => Less,
            TokenKind::Greater => Greater,
            TokenKind::LessEq => LessEqual,
            TokenKind::GreaterEq => GreaterEqual,
            TokenKind::EqEq => Equal,
            TokenKind::Neq => Inequal,
            TokenKind::Amp => BitwiseAnd,
            TokenKind::Caret => BitwiseXor,
            TokenKind::Pipe => BitwiseOr,
            TokenKind::AmpAmp => LogicalAnd,
            TokenKind::PipePipe => LogicalOr,
            TokenKind::Eq => Assignment,
            TokenKind::StarEq => MultiplicationAssignment,
            TokenKind::SlashEq => DivisionAssignment,
            TokenKind::PercentEq => RemainderAssignment,
            TokenKind::PlusEq => AdditionAssignment,
            TokenKind::MinusEq => SubtractionAssignment,
            TokenKind::LeftShiftEq => LeftShiftAssignment,
            TokenKind::RightShiftEq => RightShiftAssignment,
            TokenKind::AmpEq => BitwiseAndAssignment,
            TokenKind::PipeEq => BitwiseOrAssignment,
            TokenKind::CaretEq => BitwiseXorAssignment,
            TokenKind::ColonColon => ScopeResolution,
            TokenKind::Comma => Comma,
            _ => return None,
        };

        // Binary symbols are rejected in prefix position (except the ones
        // handled above, which already returned).
        if ctx == Prefix && !op.is_unary() {
            return None;
        }
        if ctx == Postfix && !matches!(op, PostIncrement | PostDecrement) {
            return None;
        }

        Some(op)
    }

    /// The operator's surface symbol, for diagnostics.
    pub fn symbol(self) -> &'static str {
        use OperatorId::*;
        match self {
            ScopeResolution => "::",
            PostIncrement | PreIncrement => "++",
            PostDecrement | PreDecrement => "--",
            FunctionCall => "()",
            Subscript => "[]",
            MemberAccess => ".",
            UnaryPlus | Addition => "+",
            UnaryMinus | Subtraction => "-",
            LogicalNot => "!",
            BitwiseNot => "~",
            Multiplication => "*",
            Division => "/",
            Remainder => "%",
            LeftShift => "<<",
            RightShift => ">>",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
            Inequal => "!=",
            BitwiseAnd => "&",
            BitwiseXor => "^",
            BitwiseOr => "|",
            LogicalAnd => "&&",
            LogicalOr => "||",
            Conditional => "?:",
            Assignment => "=",
            MultiplicationAssignment => "*=",
            DivisionAssignment => "/=",
            RemainderAssignment => "%=",
            AdditionAssignment => "+=",
            SubtractionAssignment => "-=",
            LeftShiftAssignment => "<<=",
            RightShiftAssignment => ">>=",
            BitwiseAndAssignment => "&=",
            BitwiseOrAssignment => "|=",
            BitwiseXorAssignment => "^=",
            Comma => ",",
        }
    }
}

#[cfg(test)]
mod tests;
