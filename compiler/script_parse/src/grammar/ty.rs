//! Parsing of qualified types and function-signature types.

use script_ir::ast::{QualType, RefKind, Signature};
use script_ir::TokenKind;

use crate::error::ParseRes;
use crate::fragment::Frag;

use super::ident::IdentOptions;
use super::Parser;

impl Parser<'_, '_> {
    /// Cheap check whether the fragment could start a type here.
    pub(crate) fn detect_type(&self, frag: Frag) -> bool {
        if frag.at_end(&self.cursor) {
            return false;
        }
        let kind = self.cursor.current_kind();
        kind == TokenKind::Const || kind.is_identifier_start()
    }

    /// Parse `const? name const? (&|&&)?`, optionally followed by a
    /// function-signature suffix `(T1, T2) const? &?`.
    pub(crate) fn parse_qual_type(&mut self, frag: Frag) -> ParseRes<QualType> {
        self.parse_qual_type_impl(frag, true)
    }

    /// Same, but never reads a function-signature suffix. Used for cast
    /// operator targets, where `operator T()` must leave the parens to the
    /// parameter list.
    pub(crate) fn parse_qual_type_no_signature(&mut self, frag: Frag) -> ParseRes<QualType> {
        self.parse_qual_type_impl(frag, false)
    }

    fn parse_qual_type_impl(&mut self, frag: Frag, read_signature: bool) -> ParseRes<QualType> {
        let mut ty = QualType {
            is_const: false,
            ref_kind: RefKind::None,
            ident: None,
            signature: None,
        };

        if frag.peek(&self.cursor)?.kind == TokenKind::Const {
            self.cursor.bump();
            ty.is_const = true;
        }

        ty.ident = Some(self.parse_ident(frag, IdentOptions::in_expression())?);

        if frag.at_end(&self.cursor) {
            return Ok(ty);
        }

        // `const` and the reference marker may come in either order.
        match self.cursor.current_kind() {
            TokenKind::Const => {
                self.cursor.bump();
                ty.is_const = true;
                if !frag.at_end(&self.cursor) {
                    ty.ref_kind = self.read_optional_ref();
                }
            }
            TokenKind::Amp | TokenKind::AmpAmp => {
                ty.ref_kind = self.read_optional_ref();
                if !frag.at_end(&self.cursor) && self.cursor.current_kind() == TokenKind::Const {
                    self.cursor.bump();
                    ty.is_const = true;
                }
            }
            _ => {}
        }

        if frag.at_end(&self.cursor) {
            return Ok(ty);
        }

        if read_signature && self.cursor.current_kind() == TokenKind::LeftPar {
            let snap = self.cursor.snapshot();
            match self.try_read_signature(ty.clone()) {
                Ok(sig) => return Ok(sig),
                Err(_) => self.cursor.restore(snap),
            }
        }

        Ok(ty)
    }

    fn read_optional_ref(&mut self) -> RefKind {
        match self.cursor.current_kind() {
            TokenKind::Amp => {
                self.cursor.bump();
                RefKind::Ref
            }
            TokenKind::AmpAmp => {
                self.cursor.bump();
                RefKind::RefRef
            }
            _ => RefKind::None,
        }
    }

    /// Read `(T1, T2) const? &?` turning `return_type` into a
    /// function-signature type.
    fn try_read_signature(&mut self, return_type: QualType) -> ParseRes<QualType> {
        self.expect_raw(TokenKind::LeftPar)?;

        let sentinel = Frag::Sentinel {
            end: TokenKind::RightPar,
        };
        let mut params = Vec::new();
        while !sentinel.at_end(&self.cursor) {
            let item = sentinel.list_item();
            let param = self.parse_qual_type(item)?;
            if !item.at_end(&self.cursor) {
                let t = *self.cursor.current();
                return Err(crate::error::SyntaxError::unexpected_token(&t, None));
            }
            params.push(param);
            item.consume_comma(&mut self.cursor);
        }
        sentinel.consume_sentinel(&mut self.cursor)?;

        let mut ty = QualType {
            is_const: false,
            ref_kind: RefKind::None,
            ident: None,
            signature: Some(Box::new(Signature {
                return_type,
                params,
            })),
        };

        if self.cursor.current_kind() == TokenKind::Const {
            self.cursor.bump();
            ty.is_const = true;
        }
        if self.cursor.current_kind() == TokenKind::Amp {
            self.cursor.bump();
            ty.ref_kind = RefKind::Ref;
        }

        Ok(ty)
    }
}
