//! The expression checker: AST expressions in, typed program
//! expressions out.
//!
//! Every node shape dispatches through [`FunctionCompiler::check_expr`].
//! Name lookup classifies identifiers; overload resolution picks
//! functions, operators, constructors and casts; the selected
//! conversions are applied by inserting explicit nodes into the program
//! tree, so the emitted tree never contains an implicit conversion.

use script_diagnostic::ErrorCode;
use script_ir::ast::{AccessSpecifier, ExprKind, IdentKind, LambdaExpr, OperatorId};
use script_ir::program::{LiteralValue, ProgExpr, ProgExprKind};
use script_ir::{ClassId, ExprId, FunctionId, IdentId, Name, ProgExprId, Span, Type};
use script_types::lookup::{Lookup, NameLookup};
use script_types::{
    CaptureDef, FunctionDef, FunctionFlags, FunctionVariant, Prototype, SymbolRef,
    TemplateArgValue, TemplateKind,
};

use crate::conversion::{Conversion, ConversionPolicy, Initialization, StandardConversion};
use crate::error::{CompileError, CompileRes};
use crate::module::ModuleCx;
use crate::overload::resolve_overloads;
use crate::stmt::FunctionCompiler;

impl FunctionCompiler<'_, '_> {
    /// Check one expression, emitting its typed form.
    pub(crate) fn check_expr(&mut self, expr: ExprId) -> CompileRes<ProgExprId> {
        let span = self.cx.arena.expr(expr).span;
        match self.cx.arena.expr(expr).kind.clone() {
            ExprKind::Bool(v) => Ok(self.literal(LiteralValue::Bool(v), Type::BOOLEAN)),
            ExprKind::Int(v) => Ok(self.literal(LiteralValue::Int(v), Type::INT)),
            ExprKind::Float { bits, single } => {
                let value = f64::from_bits(bits);
                if single {
                    Ok(self.literal(LiteralValue::Float(value as f32), Type::FLOAT))
                } else {
                    Ok(self.literal(LiteralValue::Double(value), Type::DOUBLE))
                }
            }
            ExprKind::Str(name) => Ok(self.literal(LiteralValue::String(name), Type::STRING)),
            ExprKind::UserDefined(name) => self.check_user_defined_literal(name, span),
            ExprKind::Ident(ident) => self.check_variable_access(ident, span),
            ExprKind::Unary { op, arg } => self.check_unary(op, arg, span),
            ExprKind::Binary { op, lhs, rhs } => self.check_binary(op, lhs, rhs, span),
            ExprKind::MemberAccess { object, member } => {
                self.check_member_access(object, member, span)
            }
            ExprKind::Conditional {
                cond,
                on_true,
                on_false,
            } => self.check_conditional(cond, on_true, on_false, span),
            ExprKind::Call { callee, args } => self.check_call(callee, &args, span),
            ExprKind::Subscript { array, index } => self.check_subscript(array, index, span),
            ExprKind::BraceConstruction { ty, args } => {
                self.check_named_construction(ty, &args, true, span)
            }
            ExprKind::Array { elements } => self.check_array_construction(&elements, span),
            ExprKind::List { elements } => self.check_initializer_list(&elements),
            ExprKind::Lambda(lambda) => self.check_lambda(&lambda, span),
        }
    }

    pub(crate) fn literal(&mut self, value: LiteralValue, ty: Type) -> ProgExprId {
        self.prog.alloc_expr(ProgExpr {
            kind: ProgExprKind::Literal(value),
            ty,
        })
    }

    // === Literals ===

    /// `90_deg`: strip the suffix, build the prefix value, resolve a
    /// literal operator in the enclosing scope chain.
    fn check_user_defined_literal(&mut self, name: Name, span: Span) -> CompileRes<ProgExprId> {
        let text = self.cx.interner.resolve(name);
        let (prefix, suffix) = split_literal_suffix(text);

        let prefix_arg = if prefix.contains('.') {
            let value: f64 = prefix.parse().map_err(|_| {
                CompileError::new(ErrorCode::InvalidNumericLiteral, "invalid literal", span)
            })?;
            self.literal(LiteralValue::Double(value), Type::DOUBLE)
        } else {
            let value: i64 = parse_int_prefix(prefix).ok_or_else(|| {
                CompileError::new(ErrorCode::InvalidNumericLiteral, "invalid literal", span)
            })?;
            self.literal(LiteralValue::Int(value), Type::INT)
        };

        let suffix_name = self.cx.interner.intern(suffix);
        let scope = self.scope;
        let candidates = self.lookup().literal_operators(suffix_name, scope);
        if candidates.is_empty() {
            return Err(CompileError::new(
                ErrorCode::CouldNotFindValidLiteralOperator,
                format!("no literal operator for suffix '{suffix}'"),
                span,
            ));
        }

        let arg_ty = self.prog.expr_type(prefix_arg);
        let resolution = resolve_overloads(self.cx.ts, &candidates, None, &[arg_ty]).ok_or_else(
            || {
                CompileError::new(
                    ErrorCode::CouldNotFindValidLiteralOperator,
                    format!("no viable literal operator for suffix '{suffix}'"),
                    span,
                )
            },
        )?;

        let args = self.apply_initializations(
            vec![prefix_arg],
            &resolution.initializations,
            resolution.function,
            0,
        )?;
        Ok(self.emit_function_call(resolution.function, args))
    }

    // === Identifiers ===

    fn check_variable_access(&mut self, ident: IdentId, span: Span) -> CompileRes<ProgExprId> {
        // Locals and captures shadow everything else.
        if let IdentKind::Simple(name) = &self.cx.arena.ident(ident).kind {
            let name = *name;
            if self.cx.interner.resolve(name) == "this" {
                return self.implicit_object().ok_or_else(|| {
                    CompileError::new(ErrorCode::IllegalUseOfThis, "illegal use of 'this'", span)
                });
            }
            if let Some(var) = self.stack.find(name) {
                let (index, ty, global) = (var.index, var.ty, var.global);
                let kind = if global {
                    ProgExprKind::GlobalValue { index }
                } else {
                    ProgExprKind::StackValue { index }
                };
                return Ok(self.prog.alloc_expr(ProgExpr { kind, ty }));
            }
            if let Some((index, ty)) = self.find_capture(name) {
                return Ok(self.prog.alloc_expr(ProgExpr {
                    kind: ProgExprKind::Capture { index },
                    ty,
                }));
            }
        }

        let lookup = self.resolve(ident)?;
        self.lookup_to_expr(lookup, span)
    }

    fn lookup_to_expr(&mut self, lookup: NameLookup, span: Span) -> CompileRes<ProgExprId> {
        match lookup {
            NameLookup::Unknown => Err(CompileError::new(
                ErrorCode::NoSuchCallee,
                "name not found",
                span,
            )),
            NameLookup::Functions { functions, .. } => self.function_access(&functions, span),
            NameLookup::Type(_) => Err(CompileError::new(
                ErrorCode::TypeNameInExpression,
                "a type name cannot be used as an expression",
                span,
            )),
            NameLookup::Namespace(_) => Err(CompileError::new(
                ErrorCode::NamespaceNameInExpression,
                "a namespace name cannot be used as an expression",
                span,
            )),
            NameLookup::Template(_) => Err(CompileError::new(
                ErrorCode::TemplateNamesAreNotExpressions,
                "template names are not expressions",
                span,
            )),
            NameLookup::DataMember(index) => {
                let object = self.implicit_object().ok_or_else(|| {
                    CompileError::new(ErrorCode::IllegalUseOfThis, "no object in scope", span)
                })?;
                self.member_access_expr(object, index, span)
            }
            NameLookup::StaticDataMember(class, name) => {
                let member = self
                    .cx
                    .ts
                    .class(class)
                    .static_member(name)
                    .expect("lookup returned an existing static member")
                    .clone();
                self.check_access_level(class, member.access, span)?;
                Ok(self.prog.alloc_expr(ProgExpr {
                    kind: ProgExprKind::GlobalValue {
                        index: member.index as u16,
                    },
                    ty: member.ty,
                }))
            }
            NameLookup::GlobalVariable(index, ty) => Ok(self.prog.alloc_expr(ProgExpr {
                kind: ProgExprKind::GlobalValue {
                    index: index as u16,
                },
                ty,
            })),
            NameLookup::Enumerator(enum_id, value) => {
                let ty = self.cx.ts.enum_(enum_id).ty;
                Ok(self.literal(LiteralValue::EnumValue { enum_id, value }, ty))
            }
            NameLookup::TemplateParameter(TemplateArgValue::Int(v)) => {
                Ok(self.literal(LiteralValue::Int(v), Type::INT))
            }
            NameLookup::TemplateParameter(TemplateArgValue::Bool(v)) => {
                Ok(self.literal(LiteralValue::Bool(v), Type::BOOLEAN))
            }
            NameLookup::TemplateParameter(TemplateArgValue::Type(_)) => Err(CompileError::new(
                ErrorCode::TypeNameInExpression,
                "a type name cannot be used as an expression",
                span,
            )),
        }
    }

    /// A function name used as a value: unambiguous sets of one become a
    /// function literal of function-signature type.
    fn function_access(&mut self, functions: &[FunctionId], span: Span) -> CompileRes<ProgExprId> {
        if functions.len() != 1 {
            return Err(CompileError::new(
                ErrorCode::AmbiguousFunctionName,
                "ambiguous function name",
                span,
            ));
        }
        let f = functions[0];
        let proto = self.cx.ts.function(f).prototype.clone();
        let ty = self.cx.ts.function_type(proto);
        Ok(self.literal(LiteralValue::Function(f), ty))
    }

    // === Member access ===

    fn check_member_access(
        &mut self,
        object: ExprId,
        member: IdentId,
        span: Span,
    ) -> CompileRes<ProgExprId> {
        let object = self.check_expr(object)?;
        let object_ty = self.prog.expr_type(object);

        if !object_ty.is_object() {
            return Err(CompileError::new(
                ErrorCode::CannotAccessMemberOfNonObject,
                "cannot access a member of a non-object value",
                span,
            ));
        }

        let class = self
            .cx
            .ts
            .class_of(object_ty)
            .expect("object type has a class");
        let name = self.cx.arena.ident(member).name().ok_or_else(|| {
            CompileError::new(ErrorCode::NoSuchMember, "invalid member name", span)
        })?;

        match self.lookup().member(name, class) {
            NameLookup::DataMember(index) => self.member_access_expr(object, index, span),
            NameLookup::StaticDataMember(owner, name) => {
                let member = self
                    .cx
                    .ts
                    .class(owner)
                    .static_member(name)
                    .expect("static member exists")
                    .clone();
                self.check_access_level(owner, member.access, span)?;
                Ok(self.prog.alloc_expr(ProgExpr {
                    kind: ProgExprKind::GlobalValue {
                        index: member.index as u16,
                    },
                    ty: member.ty,
                }))
            }
            NameLookup::Functions { functions, .. } => self.function_access(&functions, span),
            _ => Err(CompileError::new(
                ErrorCode::NoSuchMember,
                format!(
                    "no member named '{}' in '{}'",
                    self.cx.interner.resolve(name),
                    self.cx.ts.type_name(object_ty, self.cx.interner)
                ),
                span,
            )),
        }
    }

    /// Data member read at an absolute attribute index: find the class
    /// that actually declares the member, check access, compute the
    /// result type from the object's constness.
    pub(crate) fn member_access_expr(
        &mut self,
        object: ProgExprId,
        index: usize,
        span: Span,
    ) -> CompileRes<ProgExprId> {
        let object_ty = self.prog.expr_type(object);
        let mut class = self
            .cx
            .ts
            .class_of(object_ty)
            .expect("member access on an object");

        // Absolute index -> declaring class + local index, walking up
        // while the index falls before this class's own members.
        while index < self.cx.ts.class(class).attributes_offset {
            class = self
                .cx
                .ts
                .class(class)
                .parent
                .expect("attribute offset implies a parent");
        }
        let local = index - self.cx.ts.class(class).attributes_offset;
        let member = self.cx.ts.class(class).data_members[local].clone();
        self.check_access_level(class, member.access, span)?;

        let access_ty = if object_ty.is_const() {
            Type::cref(member.ty)
        } else {
            Type::make_ref(member.ty)
        };
        Ok(self.prog.alloc_expr(ProgExpr {
            kind: ProgExprKind::MemberAccess {
                object,
                index: index as u16,
            },
            ty: access_ty,
        }))
    }

    // === Operators ===

    fn check_unary(&mut self, op: OperatorId, arg: ExprId, span: Span) -> CompileRes<ProgExprId> {
        let operand = self.check_expr(arg)?;
        let operand_ty = self.prog.expr_type(operand);

        let scope = self.scope;
        let candidates = self.lookup().resolve_operator(op, &[operand_ty], scope);
        let resolution =
            resolve_overloads(self.cx.ts, &candidates, None, &[operand_ty]).ok_or_else(|| {
                CompileError::new(
                    ErrorCode::CouldNotFindValidOperator,
                    format!(
                        "no viable 'operator{}' for '{}'",
                        op.symbol(),
                        self.cx.ts.type_name(operand_ty, self.cx.interner)
                    ),
                    span,
                )
            })?;

        self.reject_deleted_or_inaccessible(resolution.function, span)?;
        let args = self.apply_initializations(
            vec![operand],
            &resolution.initializations,
            resolution.function,
            0,
        )?;
        Ok(self.emit_function_call(resolution.function, args))
    }

    fn check_binary(
        &mut self,
        op: OperatorId,
        lhs: ExprId,
        rhs: ExprId,
        span: Span,
    ) -> CompileRes<ProgExprId> {
        let lhs = self.check_expr(lhs)?;
        let rhs = self.check_expr(rhs)?;
        let (lt, rt) = (self.prog.expr_type(lhs), self.prog.expr_type(rhs));

        let scope = self.scope;
        let candidates = self.lookup().resolve_operator(op, &[lt, rt], scope);
        let resolution =
            resolve_overloads(self.cx.ts, &candidates, None, &[lt, rt]).ok_or_else(|| {
                CompileError::new(
                    ErrorCode::CouldNotFindValidOperator,
                    format!(
                        "no viable 'operator{}' for '{}' and '{}'",
                        op.symbol(),
                        self.cx.ts.type_name(lt, self.cx.interner),
                        self.cx.ts.type_name(rt, self.cx.interner)
                    ),
                    span,
                )
            })?;

        self.reject_deleted_or_inaccessible(resolution.function, span)?;
        let args = self.apply_initializations(
            vec![lhs, rhs],
            &resolution.initializations,
            resolution.function,
            0,
        )?;
        Ok(self.emit_function_call(resolution.function, args))
    }

    fn check_subscript(
        &mut self,
        array: ExprId,
        index: ExprId,
        span: Span,
    ) -> CompileRes<ProgExprId> {
        let object = self.check_expr(array)?;
        let idx = self.check_expr(index)?;
        let (ot, it) = (self.prog.expr_type(object), self.prog.expr_type(idx));

        if !ot.is_object() {
            return Err(CompileError::new(
                ErrorCode::ArraySubscriptOnNonObject,
                "subscript applied to a non-object value",
                span,
            ));
        }

        let scope = self.scope;
        let candidates = self
            .lookup()
            .resolve_operator(OperatorId::Subscript, &[ot, it], scope);
        let resolution =
            resolve_overloads(self.cx.ts, &candidates, None, &[ot, it]).ok_or_else(|| {
                CompileError::new(
                    ErrorCode::CouldNotFindValidSubscriptOperator,
                    "no viable subscript operator",
                    span,
                )
            })?;

        self.reject_deleted_or_inaccessible(resolution.function, span)?;
        let args = self.apply_initializations(
            vec![object, idx],
            &resolution.initializations,
            resolution.function,
            0,
        )?;
        Ok(self.emit_function_call(resolution.function, args))
    }

    // === Conditional ===

    fn check_conditional(
        &mut self,
        cond: ExprId,
        on_true: ExprId,
        on_false: ExprId,
        span: Span,
    ) -> CompileRes<ProgExprId> {
        let cond = self.check_expr(cond)?;
        let cond = self.convert_to(cond, Type::BOOLEAN, span)?;

        let t = self.check_expr(on_true)?;
        let f = self.check_expr(on_false)?;
        let (tt, ft) = (self.prog.expr_type(t), self.prog.expr_type(f));

        // Common type: convert the false branch to the true branch's
        // type, then the other way around.
        let (t, f, ty) = {
            let to_true = Conversion::compute(ft, tt.base_type(), self.cx.ts, ConversionPolicy::NoExplicit);
            if !to_true.is_invalid() {
                let f = self.apply_conversion(f, to_true, tt.base_type());
                (t, f, tt.base_type())
            } else {
                let to_false =
                    Conversion::compute(tt, ft.base_type(), self.cx.ts, ConversionPolicy::NoExplicit);
                if to_false.is_invalid() {
                    return Err(CompileError::new(
                        ErrorCode::CouldNotFindCommonType,
                        format!(
                            "no common type for '{}' and '{}'",
                            self.cx.ts.type_name(tt, self.cx.interner),
                            self.cx.ts.type_name(ft, self.cx.interner)
                        ),
                        span,
                    ));
                }
                let t = self.apply_conversion(t, to_false, ft.base_type());
                (t, f, ft.base_type())
            }
        };

        Ok(self.prog.alloc_expr(ProgExpr {
            kind: ProgExprKind::Conditional {
                cond,
                on_true: t,
                on_false: f,
            },
            ty,
        }))
    }

    // === Calls ===

    fn check_call(&mut self, callee: ExprId, args: &[ExprId], span: Span) -> CompileRes<ProgExprId> {
        let mut checked: Vec<ProgExprId> = Vec::with_capacity(args.len());
        for &a in args {
            checked.push(self.check_expr(a)?);
        }

        match self.cx.arena.expr(callee).kind.clone() {
            ExprKind::Ident(ident) => self.check_named_call(ident, checked, span),
            ExprKind::MemberAccess { object, member } => {
                self.check_member_call(object, member, checked, span)
            }
            _ => {
                let functor = self.check_expr(callee)?;
                self.check_functor_call(functor, checked, span)
            }
        }
    }

    /// `f(args)` with a plain (possibly qualified) identifier callee.
    fn check_named_call(
        &mut self,
        ident: IdentId,
        args: Vec<ProgExprId>,
        span: Span,
    ) -> CompileRes<ProgExprId> {
        // A local or capture naming a functor takes priority.
        if let IdentKind::Simple(name) = &self.cx.arena.ident(ident).kind {
            let name = *name;
            if self.stack.find(name).is_some() || self.find_capture(name).is_some() {
                let functor = self.check_variable_access(ident, span)?;
                return self.check_functor_call(functor, args, span);
            }
        }

        let lookup = self.resolve(ident)?;
        let simple_name = matches!(self.cx.arena.ident(ident).kind, IdentKind::Simple(_));

        match lookup {
            NameLookup::Functions {
                mut functions,
                templates,
            } => {
                // Complete function templates from the argument types.
                let arg_types: Vec<Type> = args.iter().map(|&a| self.prog.expr_type(a)).collect();
                for template in templates {
                    if let Some(f) = self.cx.complete_function_template(template, &arg_types)? {
                        functions.push(f);
                    }
                }

                let object = self.implicit_object();
                let object_ty = object.map(|o| self.prog.expr_type(o));
                let resolution = resolve_overloads(self.cx.ts, &functions, object_ty, &arg_types)
                    .ok_or_else(|| {
                    CompileError::new(
                        ErrorCode::CouldNotFindValidMemberFunction,
                        "no viable overload for call",
                        span,
                    )
                })?;

                self.reject_deleted_or_inaccessible(resolution.function, span)?;

                let def = self.cx.ts.function(resolution.function);
                let is_member = def.has_implicit_object() && !def.is_constructor();
                let is_virtual = def.is_virtual();

                let mut full_args = args;
                if is_member {
                    if let Some(object) = object {
                        // The object's initialization is the first entry,
                        // so the argument list lines up with it.
                        full_args.insert(0, object);
                    }
                }
                let full_args = self.apply_initializations(
                    full_args,
                    &resolution.initializations,
                    resolution.function,
                    0,
                )?;

                if is_virtual && simple_name {
                    return self.emit_virtual_call(resolution.function, full_args, span);
                }
                Ok(self.emit_function_call(resolution.function, full_args))
            }
            NameLookup::Type(ty) => {
                // `T(args)` — paren construction.
                self.value_construct(ty, args, false, span)
            }
            NameLookup::Template(template) => {
                let def = self.cx.ts.template(template);
                if matches!(def.kind, TemplateKind::Function { .. }) {
                    let arg_types: Vec<Type> =
                        args.iter().map(|&a| self.prog.expr_type(a)).collect();
                    if let Some(f) = self.cx.complete_function_template(template, &arg_types)? {
                        let resolution = resolve_overloads(self.cx.ts, &[f], None, &arg_types)
                            .ok_or_else(|| {
                                CompileError::new(
                                    ErrorCode::CouldNotFindValidMemberFunction,
                                    "no viable overload for call",
                                    span,
                                )
                            })?;
                        let full_args = self.apply_initializations(
                            args,
                            &resolution.initializations,
                            resolution.function,
                            0,
                        )?;
                        return Ok(self.emit_function_call(resolution.function, full_args));
                    }
                    return Err(CompileError::new(
                        ErrorCode::CouldNotDeduceTemplateArgument,
                        "could not deduce template arguments from the call",
                        span,
                    ));
                }
                Err(CompileError::new(
                    ErrorCode::TemplateNamesAreNotExpressions,
                    "template names are not expressions",
                    span,
                ))
            }
            other => {
                // A variable holding a functor or function value.
                let functor = self.lookup_to_expr(other, span)?;
                self.check_functor_call(functor, args, span)
            }
        }
    }

    /// `a.f(args)`.
    fn check_member_call(
        &mut self,
        object: ExprId,
        member: IdentId,
        args: Vec<ProgExprId>,
        span: Span,
    ) -> CompileRes<ProgExprId> {
        let object = self.check_expr(object)?;
        let object_ty = self.prog.expr_type(object);

        let Some(class) = self.cx.ts.class_of(object_ty) else {
            return Err(CompileError::new(
                ErrorCode::CannotAccessMemberOfNonObject,
                "cannot call a member of a non-object value",
                span,
            ));
        };
        let name = self.cx.arena.ident(member).name().ok_or_else(|| {
            CompileError::new(ErrorCode::NoSuchMember, "invalid member name", span)
        })?;

        match self.lookup().member(name, class) {
            NameLookup::DataMember(index) => {
                let functor = self.member_access_expr(object, index, span)?;
                self.check_functor_call(functor, args, span)
            }
            NameLookup::Functions { functions, .. } => {
                let mut full_args = args;
                full_args.insert(0, object);
                let arg_types: Vec<Type> =
                    full_args.iter().map(|&a| self.prog.expr_type(a)).collect();

                let resolution = resolve_overloads(self.cx.ts, &functions, None, &arg_types)
                    .ok_or_else(|| {
                        CompileError::new(
                            ErrorCode::CouldNotFindValidOverload,
                            format!(
                                "no viable overload of '{}' for these arguments",
                                self.cx.interner.resolve(name)
                            ),
                            span,
                        )
                    })?;

                self.reject_deleted_or_inaccessible(resolution.function, span)?;
                let full_args = self.apply_initializations(
                    full_args,
                    &resolution.initializations,
                    resolution.function,
                    0,
                )?;

                let def = self.cx.ts.function(resolution.function);
                if def.is_virtual() && matches!(self.cx.arena.ident(member).kind, IdentKind::Simple(_))
                {
                    return self.emit_virtual_call(resolution.function, full_args, span);
                }
                Ok(self.emit_function_call(resolution.function, full_args))
            }
            _ => Err(CompileError::new(
                ErrorCode::NoSuchMember,
                format!("no member named '{}'", self.cx.interner.resolve(name)),
                span,
            )),
        }
    }

    /// Call through a value: function variable, closure, or object with
    /// `operator()`.
    fn check_functor_call(
        &mut self,
        functor: ProgExprId,
        args: Vec<ProgExprId>,
        span: Span,
    ) -> CompileRes<ProgExprId> {
        let functor_ty = self.prog.expr_type(functor);

        if functor_ty.is_function() {
            return self.check_function_variable_call(functor, args, span);
        }

        let candidates = self.lookup().call_operators(functor_ty);
        let arg_types: Vec<Type> = args.iter().map(|&a| self.prog.expr_type(a)).collect();
        let resolution = resolve_overloads(self.cx.ts, &candidates, Some(functor_ty), &arg_types)
            .ok_or_else(|| {
            CompileError::new(
                ErrorCode::CouldNotFindValidCallOperator,
                "no viable call operator",
                span,
            )
        })?;

        self.reject_deleted_or_inaccessible(resolution.function, span)?;

        let mut full_args = args;
        full_args.insert(0, functor);
        let full_args = self.apply_initializations(
            full_args,
            &resolution.initializations,
            resolution.function,
            0,
        )?;
        Ok(self.emit_function_call(resolution.function, full_args))
    }

    fn check_function_variable_call(
        &mut self,
        callee: ProgExprId,
        mut args: Vec<ProgExprId>,
        span: Span,
    ) -> CompileRes<ProgExprId> {
        let proto = self
            .cx
            .ts
            .signature_of(self.prog.expr_type(callee))
            .expect("function-typed value has a signature")
            .clone();

        if args.len() != proto.param_count() {
            return Err(CompileError::new(
                ErrorCode::CouldNotFindValidOverload,
                "wrong number of arguments for function variable",
                span,
            ));
        }

        for (i, arg) in args.iter_mut().enumerate() {
            let from = self.prog.expr_type(*arg);
            let conv = Conversion::compute(from, proto.param(i), self.cx.ts, ConversionPolicy::NoExplicit);
            if conv.is_invalid() {
                return Err(self.could_not_convert(from, proto.param(i), span));
            }
            *arg = self.apply_conversion(*arg, conv, proto.param(i));
        }

        Ok(self.prog.alloc_expr(ProgExpr {
            kind: ProgExprKind::FunctionVariableCall { callee, args },
            ty: proto.return_type,
        }))
    }

    // === Construction ===

    /// `T{...}` / `T(...)` with a named type.
    pub(crate) fn check_named_construction(
        &mut self,
        ty_ident: IdentId,
        args: &[ExprId],
        brace: bool,
        span: Span,
    ) -> CompileRes<ProgExprId> {
        let lookup = self.resolve(ty_ident)?;
        let ty = match lookup {
            NameLookup::Type(t) => t,
            NameLookup::TemplateParameter(TemplateArgValue::Type(t)) => t,
            _ => {
                return Err(CompileError::new(
                    ErrorCode::UnknownTypeInBraceInitialization,
                    "unknown type in brace initialization",
                    span,
                ))
            }
        };

        let mut checked = Vec::with_capacity(args.len());
        for &a in args {
            checked.push(self.check_expr(a)?);
        }
        self.value_construct(ty, checked, brace, span)
    }

    /// Construct a value of `ty` from `args`. Narrowing conversions are
    /// rejected only for the brace form.
    pub(crate) fn value_construct(
        &mut self,
        ty: Type,
        args: Vec<ProgExprId>,
        brace: bool,
        span: Span,
    ) -> CompileRes<ProgExprId> {
        if args.is_empty() {
            return self.default_construct(ty, span);
        }

        if (ty.is_reference() || ty.is_rvalue_reference()) && args.len() != 1 {
            return Err(CompileError::new(
                ErrorCode::TooManyArgumentInReferenceInitialization,
                "a reference is initialized from exactly one value",
                span,
            ));
        }
        if !ty.is_object() && args.len() != 1 {
            return Err(CompileError::new(
                ErrorCode::TooManyArgumentInInitialization,
                "too many arguments in initialization",
                span,
            ));
        }

        if ty.is_fundamental() || ty.is_enum() || ty.is_function() {
            let arg = args[0];
            let from = self.prog.expr_type(arg);
            let conv = Conversion::compute(from, ty, self.cx.ts, ConversionPolicy::Allow);
            if conv.is_invalid() {
                return Err(self.could_not_convert(from, ty, span));
            }
            if brace && conv.is_narrowing() {
                return Err(CompileError::new(
                    ErrorCode::NarrowingConversionInBraceInitialization,
                    format!(
                        "narrowing conversion of '{}' to '{}' in brace initialization",
                        self.cx.ts.type_name(from, self.cx.interner),
                        self.cx.ts.type_name(ty, self.cx.interner)
                    ),
                    span,
                ));
            }
            return Ok(self.apply_conversion(arg, conv, ty));
        }

        if ty.is_object() {
            let class = self.cx.ts.class_of(ty).expect("object type has a class");
            let ctors = self.cx.ts.class(class).constructors.clone();
            let arg_types: Vec<Type> = args.iter().map(|&a| self.prog.expr_type(a)).collect();

            let resolution =
                resolve_overloads(self.cx.ts, &ctors, None, &arg_types).ok_or_else(|| {
                    CompileError::new(
                        ErrorCode::CouldNotFindValidConstructor,
                        format!(
                            "no viable constructor for '{}'",
                            self.cx.ts.type_name(ty, self.cx.interner)
                        ),
                        span,
                    )
                })?;

            if brace {
                for (i, init) in resolution.initializations.iter().enumerate() {
                    if init.conversion.is_narrowing() {
                        let from = arg_types[i];
                        let param = self.cx.ts.function(resolution.function).prototype.param(i);
                        return Err(CompileError::new(
                            ErrorCode::NarrowingConversionInBraceInitialization,
                            format!(
                                "narrowing conversion of '{}' to '{}' in brace initialization",
                                self.cx.ts.type_name(from, self.cx.interner),
                                self.cx.ts.type_name(param, self.cx.interner)
                            ),
                            span,
                        ));
                    }
                }
            }

            self.reject_deleted_or_inaccessible(resolution.function, span)?;
            let args = self.apply_initializations(
                args,
                &resolution.initializations,
                resolution.function,
                0,
            )?;
            return Ok(self.prog.alloc_expr(ProgExpr {
                kind: ProgExprKind::ConstructorCall {
                    constructor: resolution.function,
                    args,
                },
                ty: ty.base_type(),
            }));
        }

        Err(self.could_not_convert(self.prog.expr_type(args[0]), ty, span))
    }

    /// Default-construct a value of `ty`.
    pub(crate) fn default_construct(&mut self, ty: Type, span: Span) -> CompileRes<ProgExprId> {
        if ty.is_reference() || ty.is_rvalue_reference() {
            return Err(CompileError::new(
                ErrorCode::ReferencesMustBeInitialized,
                "references must be initialized",
                span,
            ));
        }
        if ty.is_fundamental() {
            let value = match ty.base_type() {
                t if t == Type::BOOLEAN => LiteralValue::Bool(false),
                t if t == Type::CHAR => LiteralValue::Char('\0'),
                t if t == Type::INT => LiteralValue::Int(0),
                t if t == Type::FLOAT => LiteralValue::Float(0.0),
                t if t == Type::DOUBLE => LiteralValue::Double(0.0),
                _ => {
                    return Err(CompileError::new(
                        ErrorCode::VariableCannotBeDefaultConstructed,
                        "cannot default-construct a value of this type",
                        span,
                    ))
                }
            };
            let lit = self.literal(value, ty.base_type());
            return Ok(self.prog.alloc_expr(ProgExpr {
                kind: ProgExprKind::Copy { arg: lit },
                ty: ty.base_type(),
            }));
        }
        if ty.is_enum() {
            return Err(CompileError::new(
                ErrorCode::EnumerationsCannotBeDefaultConstructed,
                "enumerations cannot be default constructed",
                span,
            ));
        }
        if ty.is_function() {
            return Err(CompileError::new(
                ErrorCode::FunctionVariablesMustBeInitialized,
                "function variables must be initialized",
                span,
            ));
        }
        if ty.is_object() {
            let class = self.cx.ts.class_of(ty).expect("object type has a class");
            let ctor = self.cx.ts.default_constructor(class).ok_or_else(|| {
                CompileError::new(
                    ErrorCode::VariableCannotBeDefaultConstructed,
                    format!(
                        "'{}' cannot be default constructed",
                        self.cx.ts.type_name(ty, self.cx.interner)
                    ),
                    span,
                )
            })?;
            if self.cx.ts.function(ctor).is_deleted() {
                return Err(CompileError::new(
                    ErrorCode::ClassHasDeletedDefaultCtor,
                    format!(
                        "'{}' has a deleted default constructor",
                        self.cx.ts.type_name(ty, self.cx.interner)
                    ),
                    span,
                ));
            }
            return Ok(self.prog.alloc_expr(ProgExpr {
                kind: ProgExprKind::ConstructorCall {
                    constructor: ctor,
                    args: Vec::new(),
                },
                ty: ty.base_type(),
            }));
        }

        Err(CompileError::new(
            ErrorCode::VariableCannotBeDefaultConstructed,
            "cannot default-construct a value of this type",
            span,
        ))
    }

    // === Arrays and lists ===

    fn check_array_construction(
        &mut self,
        elements: &[ExprId],
        span: Span,
    ) -> CompileRes<ProgExprId> {
        let mut checked = Vec::with_capacity(elements.len());
        for &e in elements {
            checked.push(self.check_expr(e)?);
        }

        let Some(&first) = checked.first() else {
            return Err(CompileError::new(
                ErrorCode::ArrayElementNotConvertible,
                "cannot deduce the element type of an empty array",
                span,
            ));
        };

        let element_ty = self.prog.expr_type(first).base_type();
        if element_ty == Type::INITIALIZER_LIST {
            return Err(CompileError::new(
                ErrorCode::InitializerListAsFirstArrayElement,
                "an initializer list cannot be the first array element",
                span,
            ));
        }

        for e in checked.iter_mut() {
            let from = self.prog.expr_type(*e);
            let conv = Conversion::compute(from, element_ty, self.cx.ts, ConversionPolicy::NoExplicit);
            if conv.is_invalid() {
                return Err(CompileError::new(
                    ErrorCode::ArrayElementNotConvertible,
                    format!(
                        "array element of type '{}' is not convertible to '{}'",
                        self.cx.ts.type_name(from, self.cx.interner),
                        self.cx.ts.type_name(element_ty, self.cx.interner)
                    ),
                    span,
                ));
            }
            *e = self.apply_conversion(*e, conv, element_ty);
        }

        let array_template = self.cx.ts.array_template();
        let class = self
            .lookup()
            .instantiate_with_values(array_template, &[TemplateArgValue::Type(element_ty)])
            .map_err(|_| {
                CompileError::new(ErrorCode::InvalidTemplateArgument, "invalid element type", span)
            })?;
        let array_ty = self.cx.ts.class(class).ty;

        Ok(self.prog.alloc_expr(ProgExpr {
            kind: ProgExprKind::ArrayConstruction { elements: checked },
            ty: array_ty,
        }))
    }

    fn check_initializer_list(&mut self, elements: &[ExprId]) -> CompileRes<ProgExprId> {
        let mut checked = Vec::with_capacity(elements.len());
        for &e in elements {
            checked.push(self.check_expr(e)?);
        }
        Ok(self.prog.alloc_expr(ProgExpr {
            kind: ProgExprKind::InitializerList { elements: checked },
            ty: Type::INITIALIZER_LIST,
        }))
    }

    // === Lambdas ===

    /// Resolve captures in the enclosing scope, synthesize a closure
    /// type, compile the call operator.
    fn check_lambda(&mut self, lambda: &LambdaExpr, span: Span) -> CompileRes<ProgExprId> {
        let mut captures: Vec<CaptureDef> = Vec::new();
        let mut capture_inits: Vec<ProgExprId> = Vec::new();

        for cap in &lambda.captures {
            match cap {
                script_ir::ast::LambdaCapture::Named {
                    by_ref,
                    name,
                    value,
                } => {
                    let init = match value {
                        Some(v) => self.check_expr(*v)?,
                        None => {
                            let Some(var) = self.stack.find(*name) else {
                                return Err(CompileError::new(
                                    ErrorCode::UnknownCaptureName,
                                    format!(
                                        "no local variable '{}' to capture",
                                        self.cx.interner.resolve(*name)
                                    ),
                                    span,
                                ));
                            };
                            let (index, ty) = (var.index, var.ty);
                            self.prog.alloc_expr(ProgExpr {
                                kind: ProgExprKind::StackValue { index },
                                ty,
                            })
                        }
                    };
                    let ty = self.prog.expr_type(init);
                    captures.push(CaptureDef {
                        name: *name,
                        ty: if *by_ref { Type::make_ref(ty) } else { ty.base_type() },
                        by_ref: *by_ref,
                    });
                    capture_inits.push(init);
                }
                script_ir::ast::LambdaCapture::AllByValue
                | script_ir::ast::LambdaCapture::AllByRef => {
                    return Err(CompileError::new(
                        ErrorCode::CouldNotParseLambdaCapture,
                        "capture-all is not supported; name each capture",
                        span,
                    ));
                }
            }
        }

        let (lambda_id, closure_ty) = self.cx.ts.register_closure(captures.clone());

        // Parameter types.
        let mut params = vec![Prototype::this_param(closure_ty, false)];
        let mut param_names: Vec<Option<Name>> = vec![None];
        for p in &lambda.params {
            let ty = self.resolve_type(&p.ty, span)?;
            params.push(ty);
            param_names.push(p.name);
        }

        // The call operator's return type is deduced from the body.
        let call_op = self.cx.ts.add_function(FunctionDef {
            variant: FunctionVariant::Operator {
                op: OperatorId::FunctionCall,
            },
            flags: FunctionFlags::default(),
            prototype: Prototype::new(Type::AUTO, params),
            enclosing: SymbolRef::Namespace(script_ir::NamespaceId::ROOT),
            default_args: Vec::new(),
            body: None,
            native: None,
            source: None,
        });
        self.cx.ts.closure_mut(lambda_id).call_operator = Some(call_op);

        // Compile the body right away in a nested compiler.
        let body = self.cx.compile_lambda_body(
            lambda,
            call_op,
            &captures,
            &param_names,
            self.scope,
        )?;
        self.cx.ts.function_mut(call_op).body = Some(body);

        Ok(self.prog.alloc_expr(ProgExpr {
            kind: ProgExprKind::LambdaConstruction {
                captures: capture_inits,
            },
            ty: closure_ty,
        }))
    }

    // === Shared helpers ===

    pub(crate) fn could_not_convert(&self, from: Type, to: Type, span: Span) -> CompileError {
        CompileError::new(
            ErrorCode::CouldNotConvert,
            format!(
                "could not convert '{}' to '{}'",
                self.cx.ts.type_name(from, self.cx.interner),
                self.cx.ts.type_name(to, self.cx.interner)
            ),
            span,
        )
    }

    /// Convert `expr` to `dest`, erroring when no conversion exists.
    pub(crate) fn convert_to(
        &mut self,
        expr: ProgExprId,
        dest: Type,
        span: Span,
    ) -> CompileRes<ProgExprId> {
        let from = self.prog.expr_type(expr);
        let conv = Conversion::compute(from, dest, self.cx.ts, ConversionPolicy::NoExplicit);
        if conv.is_invalid() {
            return Err(self.could_not_convert(from, dest, span));
        }
        Ok(self.apply_conversion(expr, conv, dest))
    }

    /// Insert the nodes realizing a conversion.
    pub(crate) fn apply_conversion(
        &mut self,
        expr: ProgExprId,
        conv: Conversion,
        dest: Type,
    ) -> ProgExprId {
        if let Some(function) = conv.function {
            let def = self.cx.ts.function(function);
            if def.is_constructor() {
                let param = def.prototype.param(0);
                let class_ty = def.prototype.return_type.base_type();
                let arg = self.apply_standard(expr, conv.first, param);
                let call = self.prog.alloc_expr(ProgExpr {
                    kind: ProgExprKind::ConstructorCall {
                        constructor: function,
                        args: vec![arg],
                    },
                    ty: class_ty,
                });
                return self.apply_standard(call, conv.second, dest);
            }
            // Cast operator: call it on the object, then finish with the
            // second standard conversion.
            let ret = def.prototype.return_type;
            let call = self.prog.alloc_expr(ProgExpr {
                kind: ProgExprKind::FunctionCall {
                    function,
                    args: vec![expr],
                },
                ty: ret,
            });
            return self.apply_standard(call, conv.second, dest);
        }

        self.apply_standard(expr, conv.first, dest)
    }

    fn apply_standard(
        &mut self,
        expr: ProgExprId,
        conv: StandardConversion,
        dest: Type,
    ) -> ProgExprId {
        if conv.is_none() || conv.is_not_convertible() {
            return expr;
        }
        if conv.is_numeric_promotion() || conv.is_numeric_conversion() || conv.is_enum_to_int() {
            return self.prog.alloc_expr(ProgExpr {
                kind: ProgExprKind::FundamentalConversion { arg: expr },
                ty: dest.base_type(),
            });
        }
        if conv.is_reference_binding() {
            // Reference bindings (including derived-to-base) leave the
            // value in place.
            return expr;
        }
        self.prog.alloc_expr(ProgExpr {
            kind: ProgExprKind::Copy { arg: expr },
            ty: dest.base_type(),
        })
    }

    /// Apply per-argument initializations from overload resolution and
    /// append default arguments for missing trailing parameters.
    /// `param_offset` is the prototype index of the first initialization
    /// (1 for constructor calls, 0 otherwise).
    pub(crate) fn apply_initializations(
        &mut self,
        args: Vec<ProgExprId>,
        inits: &[Initialization],
        function: FunctionId,
        param_offset: usize,
    ) -> CompileRes<Vec<ProgExprId>> {
        let proto = self.cx.ts.function(function).prototype.clone();
        let mut out = Vec::with_capacity(args.len());

        for (i, (arg, init)) in args.into_iter().zip(inits).enumerate() {
            let dest = proto.param(i + param_offset);
            out.push(self.apply_conversion(arg, init.conversion, dest));
        }

        // Fill missing trailing parameters from default arguments.
        let supplied = out.len() + param_offset;
        if supplied < proto.param_count() {
            let defaults = self.cx.ts.function(function).default_args.clone();
            let missing = proto.param_count() - supplied;
            let start = defaults.len() - missing;
            for (j, &default_expr) in defaults[start..].iter().enumerate() {
                let dest = proto.param(supplied + j);
                let span = self.cx.arena.expr(default_expr).span;
                let compiled = self.check_expr(default_expr)?;
                out.push(self.convert_to(compiled, dest, span)?);
            }
        }

        Ok(out)
    }

    pub(crate) fn emit_function_call(
        &mut self,
        function: FunctionId,
        args: Vec<ProgExprId>,
    ) -> ProgExprId {
        let def = self.cx.ts.function(function);
        let ty = def.prototype.return_type;
        let kind = if def.is_constructor() {
            ProgExprKind::ConstructorCall {
                constructor: function,
                args,
            }
        } else {
            ProgExprKind::FunctionCall { function, args }
        };
        self.prog.alloc_expr(ProgExpr { kind, ty })
    }

    /// Emit a virtual call: look up the function's vtable slot in its
    /// class and split off the object argument.
    fn emit_virtual_call(
        &mut self,
        function: FunctionId,
        mut args: Vec<ProgExprId>,
        span: Span,
    ) -> CompileRes<ProgExprId> {
        let def = self.cx.ts.function(function);
        let class = def.member_of().expect("virtual functions are members");
        let ret = def.prototype.return_type;

        let slot = self
            .cx
            .ts
            .class(class)
            .vtable
            .iter()
            .position(|&f| f == function)
            .ok_or_else(|| {
                CompileError::new(
                    ErrorCode::CouldNotFindValidMemberFunction,
                    "virtual function missing from its vtable",
                    span,
                )
            })?;

        let object = args.remove(0);
        Ok(self.prog.alloc_expr(ProgExpr {
            kind: ProgExprKind::VirtualCall {
                object,
                vtable_index: slot as u16,
                args,
            },
            ty: ret,
        }))
    }

    /// Deleted-function and accessibility checks shared by every call
    /// form.
    pub(crate) fn reject_deleted_or_inaccessible(
        &mut self,
        function: FunctionId,
        span: Span,
    ) -> CompileRes<()> {
        let def = self.cx.ts.function(function);
        if def.is_deleted() {
            return Err(CompileError::new(
                ErrorCode::CallToDeletedFunction,
                "call to a deleted function",
                span,
            ));
        }
        if let Some(class) = def.member_of() {
            let access = def.flags.access();
            self.check_access_level(class, access, span)?;
        }
        Ok(())
    }

    /// Access control: `protected` requires the caller's class to derive
    /// from the owner, `private` requires the caller's class to be the
    /// owner or a friend.
    pub(crate) fn check_access_level(
        &self,
        owner: ClassId,
        access: AccessSpecifier,
        span: Span,
    ) -> CompileRes<()> {
        let allowed = match access {
            AccessSpecifier::Public => true,
            AccessSpecifier::Protected => match self.current_class {
                Some(current) => self.cx.ts.inheritance_level(current, owner) >= 0,
                None => false,
            },
            AccessSpecifier::Private => match self.current_class {
                Some(current) => {
                    current == owner || {
                        let name = self.cx.ts.class(current).name;
                        self.cx.ts.class(owner).friends.contains(&name)
                    }
                }
                None => false,
            },
        };
        if allowed {
            Ok(())
        } else {
            Err(CompileError::new(
                ErrorCode::InaccessibleMember,
                "member is not accessible from this context",
                span,
            ))
        }
    }

    /// The implicit object expression of the function being compiled:
    /// stack slot 0 in constructors/destructors, slot 1 in other member
    /// functions.
    pub(crate) fn implicit_object(&mut self) -> Option<ProgExprId> {
        let caller = self.caller?;
        let def = self.cx.ts.function(caller);
        let class = def.member_of()?;
        let class_ty = self.cx.ts.class(class).ty;
        let index = if def.is_constructor() || def.is_destructor() {
            0
        } else if def.has_implicit_object() {
            1
        } else {
            return None;
        };
        Some(self.prog.alloc_expr(ProgExpr {
            kind: ProgExprKind::StackValue { index },
            ty: Type::make_ref(class_ty),
        }))
    }

    /// Shortcut building a `Lookup` context over the module state.
    pub(crate) fn lookup(&mut self) -> Lookup<'_> {
        self.cx.lookup()
    }

    pub(crate) fn resolve(&mut self, ident: IdentId) -> CompileRes<NameLookup> {
        let span = self.cx.arena.ident(ident).span;
        let scope = self.scope;
        self.cx
            .lookup()
            .resolve(ident, scope)
            .map_err(|e| ModuleCx::lookup_error_to_compile_error(e, span))
    }

    /// Resolve a parsed type against the current scope.
    pub(crate) fn resolve_type(
        &mut self,
        qt: &script_ir::ast::QualType,
        span: Span,
    ) -> CompileRes<Type> {
        let scope = self.scope;
        self.cx
            .lookup()
            .resolve_qual_type(qt, scope)
            .map_err(|e| ModuleCx::lookup_error_to_compile_error(e, span))
    }
}

/// Split a user-defined literal into its numeric prefix and suffix,
/// scanning the number exactly the way the lexer does.
fn split_literal_suffix(text: &str) -> (&str, &str) {
    let b = text.as_bytes();
    let mut i = 0;

    if b.len() > 2 && b[0] == b'0' && matches!(b[1], b'x' | b'X') {
        i = 2;
        while i < b.len() && b[i].is_ascii_hexdigit() {
            i += 1;
        }
    } else if b.len() > 2 && b[0] == b'0' && matches!(b[1], b'b' | b'B') {
        i = 2;
        while i < b.len() && matches!(b[i], b'0' | b'1') {
            i += 1;
        }
    } else {
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i + 1 < b.len() && b[i] == b'.' && b[i + 1].is_ascii_digit() {
            i += 1;
            while i < b.len() && b[i].is_ascii_digit() {
                i += 1;
            }
        }
        if i < b.len() && matches!(b[i], b'e' | b'E') {
            let mut j = i + 1;
            if j < b.len() && matches!(b[j], b'+' | b'-') {
                j += 1;
            }
            if j < b.len() && b[j].is_ascii_digit() {
                i = j;
                while i < b.len() && b[i].is_ascii_digit() {
                    i += 1;
                }
            }
        }
    }

    text.split_at(i)
}

/// Parse the numeric prefix of a user-defined literal.
fn parse_int_prefix(text: &str) -> Option<i64> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).ok();
    }
    if let Some(bin) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        return i64::from_str_radix(bin, 2).ok();
    }
    if text.len() > 1 && text.starts_with('0') {
        return i64::from_str_radix(text, 8).ok();
    }
    text.parse().ok()
}
