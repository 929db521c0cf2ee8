//! The statement and function-body compiler.
//!
//! A [`FunctionCompiler`] owns the per-body program arena and a local
//! stack of typed cells. Entering a block pushes a marker; leaving
//! destroys live variables in reverse declaration order, appending a
//! destructor call for every value of non-trivial type. Constructors
//! synthesize base/member initialization prologues; destructors append
//! member and base destructor calls as an epilogue.

use script_diagnostic::ErrorCode;
use script_ir::ast::{
    DeclKind, FunctionDecl, FunctionKind, IdentKind, Initializer, StmtKind, VariableDecl,
};
use script_ir::program::{CompiledBody, ProgExpr, ProgExprKind, ProgStmt, ProgramArena};
use script_ir::{ClassId, FunctionId, Name, ProgExprId, ProgStmtId, Span, StmtId, Type};
use script_types::{CaptureDef, Scope};

use crate::error::{CompileError, CompileRes};
use crate::module::ModuleCx;

/// One cell of the local stack.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Variable {
    pub ty: Type,
    pub name: Name,
    pub index: u16,
    pub global: bool,
}

/// The local stack: declared variables plus block markers.
#[derive(Default)]
pub(crate) struct LocalStack {
    vars: Vec<Variable>,
    blocks: Vec<usize>,
}

impl LocalStack {
    pub fn new() -> Self {
        LocalStack::default()
    }

    /// Add a variable; returns its stack index.
    pub fn add(&mut self, ty: Type, name: Name) -> u16 {
        let index = self.vars.len() as u16;
        self.vars.push(Variable {
            ty,
            name,
            index,
            global: false,
        });
        index
    }

    pub fn add_global(&mut self, ty: Type, name: Name, global_index: u16) -> u16 {
        self.vars.push(Variable {
            ty,
            name,
            index: global_index,
            global: true,
        });
        global_index
    }

    /// Innermost variable with this name.
    pub fn find(&self, name: Name) -> Option<&Variable> {
        self.vars.iter().rev().find(|v| v.name == name)
    }

    /// Enter a block: remember where it starts.
    pub fn enter_block(&mut self) {
        self.blocks.push(self.vars.len());
    }

    /// Leave a block: pop and return its variables, innermost first.
    pub fn leave_block(&mut self) -> Vec<Variable> {
        let start = self.blocks.pop().unwrap_or(0);
        let mut out: Vec<Variable> = self.vars.drain(start..).collect();
        out.reverse();
        out
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }
}

/// Compiles one function body (or the script's top level).
pub(crate) struct FunctionCompiler<'m, 'a> {
    pub cx: &'m mut ModuleCx<'a>,
    pub prog: ProgramArena,
    pub stack: LocalStack,
    /// The function being compiled; `None` at the script top level.
    pub caller: Option<FunctionId>,
    pub current_class: Option<ClassId>,
    pub scope: Scope,
    /// Captures visible while compiling a lambda body.
    pub captures: Vec<CaptureDef>,
    /// Deduced `auto` return type, fixed by the first value `return`.
    pub deduced_return: Option<Type>,
    pub loop_depth: u32,
    /// Compiling the script top level: variable declarations become
    /// globals.
    pub at_top_level: bool,
}

impl<'m, 'a> FunctionCompiler<'m, 'a> {
    pub fn new(cx: &'m mut ModuleCx<'a>, scope: Scope) -> Self {
        FunctionCompiler {
            cx,
            prog: ProgramArena::new(),
            stack: LocalStack::new(),
            caller: None,
            current_class: None,
            scope,
            captures: Vec::new(),
            deduced_return: None,
            loop_depth: 0,
            at_top_level: false,
        }
    }

    pub(crate) fn find_capture(&self, name: Name) -> Option<(u16, Type)> {
        self.captures
            .iter()
            .position(|c| c.name == name)
            .map(|i| (i as u16, self.captures[i].ty))
    }

    // === Function bodies ===

    /// Compile a function declaration's body into a `CompiledBody`.
    pub fn compile_function_body(
        &mut self,
        decl: &FunctionDecl,
        function: FunctionId,
        body_stmt: StmtId,
        span: Span,
    ) -> CompileRes<CompiledBody> {
        self.caller = Some(function);
        self.current_class = self.cx.ts.function(function).member_of();

        self.stack.enter_block();
        self.bind_parameters(decl, function);

        let mut statements: Vec<ProgStmtId> = Vec::new();

        // Constructor prologue: delegate or parent construction plus
        // member initializers.
        if matches!(decl.kind, FunctionKind::Constructor { .. }) {
            self.constructor_prologue(decl, function, span, &mut statements)?;
        }

        // The body proper.
        let StmtKind::Compound(body_statements) = self.cx.arena.stmt(body_stmt).kind.clone()
        else {
            return Err(CompileError::new(
                ErrorCode::ExpectedDeclaration,
                "function body must be a compound statement",
                span,
            ));
        };
        for stmt in body_statements {
            let compiled = self.compile_stmt(stmt)?;
            statements.push(compiled);
        }

        // Destructor epilogue: destroy members in reverse order, then
        // run the parent destructor.
        if matches!(decl.kind, FunctionKind::Destructor) {
            self.destructor_epilogue(function, &mut statements);
        }

        // Fix a deduced `auto` return type.
        if self.cx.ts.function(function).prototype.return_type == Type::AUTO {
            let deduced = self.deduced_return.unwrap_or(Type::VOID);
            self.cx.ts.function_mut(function).prototype.return_type = deduced;
        }

        let vars = self.stack.leave_block();
        self.emit_destructors(&vars, &mut statements);

        let root = self.prog.alloc_stmt(ProgStmt::Compound(statements));
        Ok(CompiledBody {
            arena: std::mem::take(&mut self.prog),
            root: Some(root),
        })
    }

    /// Reserve the conventional slots: 0 for the return value (or `this`
    /// in constructors and destructors), then `this` for members, then
    /// the declared parameters.
    fn bind_parameters(&mut self, decl: &FunctionDecl, function: FunctionId) {
        let def = self.cx.ts.function(function);
        let proto = def.prototype.clone();
        let is_ctor = def.is_constructor();
        let is_dtor = def.is_destructor();
        let has_object = def.has_implicit_object();
        let member_of = def.member_of();
        let this_name = self.cx.interner.intern("this");

        let mut param_index = 0;
        if is_ctor {
            // Slot 0 is the object under construction; constructor
            // prototypes do not list it.
            let class_ty = self.cx.ts.class(member_of.expect("ctor")).ty;
            self.stack.add(Type::make_ref(class_ty), this_name);
        } else if is_dtor {
            // Slot 0 is `this` (the prototype's only parameter).
            self.stack.add(proto.param(0), this_name);
            param_index = 1;
        } else {
            // Slot 0 is the return placeholder.
            self.stack.add(proto.return_type, Name::EMPTY);
            if has_object {
                self.stack.add(proto.param(0), this_name);
                param_index = 1;
            }
        }

        for (i, p) in decl.params.iter().enumerate() {
            let ty = proto.param(param_index + i);
            let name = p.name.unwrap_or(Name::EMPTY);
            self.stack.add(ty, name);
        }
    }

    // === Statements ===

    pub(crate) fn compile_stmt(&mut self, stmt: StmtId) -> CompileRes<ProgStmtId> {
        let span = self.cx.arena.stmt(stmt).span;
        match self.cx.arena.stmt(stmt).kind.clone() {
            StmtKind::Null => Ok(self.prog.alloc_stmt(ProgStmt::Compound(Vec::new()))),
            StmtKind::Expression(expr) => {
                let compiled = self.check_expr(expr)?;
                Ok(self.prog.alloc_stmt(ProgStmt::Expression(compiled)))
            }
            StmtKind::Compound(statements) => self.compile_block(&statements),
            StmtKind::If {
                cond,
                body,
                else_clause,
            } => {
                let cond = self.check_expr(cond)?;
                let cond = self.convert_to(cond, Type::BOOLEAN, span)?;
                let body = self.compile_in_block(body)?;
                let else_clause = match else_clause {
                    Some(s) => Some(self.compile_in_block(s)?),
                    None => None,
                };
                Ok(self.prog.alloc_stmt(ProgStmt::If {
                    cond,
                    body,
                    else_clause,
                }))
            }
            StmtKind::While { cond, body } => {
                let cond = self.check_expr(cond)?;
                let cond = self.convert_to(cond, Type::BOOLEAN, span)?;
                self.loop_depth += 1;
                let body = self.compile_in_block(body);
                self.loop_depth -= 1;
                Ok(self.prog.alloc_stmt(ProgStmt::While { cond, body: body? }))
            }
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => {
                // The init declaration lives in its own block around the
                // whole loop.
                self.stack.enter_block();
                let result = (|| {
                    let init = self.compile_stmt(init)?;
                    let cond = self.check_expr(cond)?;
                    let cond = self.convert_to(cond, Type::BOOLEAN, span)?;
                    let step_expr = self.check_expr(step)?;
                    self.loop_depth += 1;
                    let body = self.compile_in_block(body);
                    self.loop_depth -= 1;
                    Ok(self.prog.alloc_stmt(ProgStmt::For {
                        init,
                        cond,
                        step: step_expr,
                        body: body?,
                    }))
                })();
                let vars = self.stack.leave_block();
                let for_stmt = result?;
                let mut statements = vec![for_stmt];
                self.emit_destructors(&vars, &mut statements);
                if statements.len() == 1 {
                    Ok(for_stmt)
                } else {
                    Ok(self.prog.alloc_stmt(ProgStmt::Compound(statements)))
                }
            }
            StmtKind::Return { value } => self.compile_return(value, span),
            StmtKind::Break => {
                if self.loop_depth == 0 {
                    return Err(CompileError::new(
                        ErrorCode::IllegalUseOfKeyword,
                        "'break' outside of a loop",
                        span,
                    ));
                }
                Ok(self.prog.alloc_stmt(ProgStmt::Break))
            }
            StmtKind::Continue => {
                if self.loop_depth == 0 {
                    return Err(CompileError::new(
                        ErrorCode::IllegalUseOfKeyword,
                        "'continue' outside of a loop",
                        span,
                    ));
                }
                Ok(self.prog.alloc_stmt(ProgStmt::Continue))
            }
            StmtKind::Declaration(decl) => {
                let decl_span = self.cx.arena.decl(decl).span;
                match self.cx.arena.decl(decl).kind.clone() {
                    DeclKind::Variable(var) => self.compile_variable_decl(&var, decl_span),
                    DeclKind::Enum(_) | DeclKind::Typedef { .. } | DeclKind::Using(_) => {
                        // Registered by the declaration pass; nothing to
                        // execute.
                        Ok(self.prog.alloc_stmt(ProgStmt::Compound(Vec::new())))
                    }
                    _ => Err(CompileError::new(
                        ErrorCode::ExpectedDeclaration,
                        "this declaration is not allowed here",
                        decl_span,
                    )),
                }
            }
        }
    }

    /// Compile a nested statement in a fresh block scope.
    fn compile_in_block(&mut self, stmt: StmtId) -> CompileRes<ProgStmtId> {
        match self.cx.arena.stmt(stmt).kind.clone() {
            StmtKind::Compound(statements) => self.compile_block(&statements),
            _ => {
                self.stack.enter_block();
                let result = self.compile_stmt(stmt);
                let vars = self.stack.leave_block();
                let inner = result?;
                let mut statements = vec![inner];
                self.emit_destructors(&vars, &mut statements);
                Ok(self.prog.alloc_stmt(ProgStmt::Compound(statements)))
            }
        }
    }

    fn compile_block(&mut self, statements: &[StmtId]) -> CompileRes<ProgStmtId> {
        self.stack.enter_block();
        let mut out = Vec::with_capacity(statements.len());
        let mut error = None;
        for &s in statements {
            match self.compile_stmt(s) {
                Ok(compiled) => out.push(compiled),
                Err(e) => {
                    error = Some(e);
                    break;
                }
            }
        }
        let vars = self.stack.leave_block();
        if let Some(e) = error {
            return Err(e);
        }
        self.emit_destructors(&vars, &mut out);
        Ok(self.prog.alloc_stmt(ProgStmt::Compound(out)))
    }

    /// Append `DestroyValue` statements for block-local values of
    /// destructible type, in reverse declaration order.
    pub(crate) fn emit_destructors(&mut self, vars: &[Variable], out: &mut Vec<ProgStmtId>) {
        for var in vars {
            if var.global {
                continue;
            }
            let destructor = self.cx.ts.destructor_for(var.ty);
            if var.ty.is_object() {
                out.push(self.prog.alloc_stmt(ProgStmt::DestroyValue {
                    index: var.index,
                    destructor,
                }));
            }
        }
    }

    fn compile_return(&mut self, value: Option<script_ir::ExprId>, span: Span) -> CompileRes<ProgStmtId> {
        let caller = self.caller;
        let return_type = match caller {
            Some(f) => self.cx.ts.function(f).prototype.return_type,
            None => Type::VOID,
        };
        let is_special = caller
            .map(|f| {
                let def = self.cx.ts.function(f);
                def.is_constructor() || def.is_destructor()
            })
            .unwrap_or(false);

        match value {
            None => {
                if return_type != Type::VOID && return_type != Type::AUTO && !is_special {
                    return Err(CompileError::new(
                        ErrorCode::ReturnStatementWithoutValue,
                        "this function must return a value",
                        span,
                    ));
                }
                if return_type == Type::AUTO {
                    self.deduce_return(Type::VOID, span)?;
                }
                Ok(self.prog.alloc_stmt(ProgStmt::Return { value: None }))
            }
            Some(expr) => {
                if is_special || return_type == Type::VOID {
                    return Err(CompileError::new(
                        ErrorCode::ReturnStatementWithValue,
                        "this function cannot return a value",
                        span,
                    ));
                }
                let compiled = self.check_expr(expr)?;
                let compiled = if return_type == Type::AUTO {
                    let deduced = self.prog.expr_type(compiled).base_type();
                    self.deduce_return(deduced, span)?;
                    compiled
                } else {
                    self.convert_to(compiled, return_type, span)?
                };
                Ok(self.prog.alloc_stmt(ProgStmt::Return {
                    value: Some(compiled),
                }))
            }
        }
    }

    /// All `return` statements of an `auto` function must deduce the
    /// same type.
    fn deduce_return(&mut self, ty: Type, span: Span) -> CompileRes<()> {
        match self.deduced_return {
            None => {
                self.deduced_return = Some(ty);
                Ok(())
            }
            Some(previous) if previous == ty => Ok(()),
            Some(previous) => Err(CompileError::new(
                ErrorCode::AutoReturnTypeMismatch,
                format!(
                    "deduced return type '{}' conflicts with previous '{}'",
                    self.cx.ts.type_name(ty, self.cx.interner),
                    self.cx.ts.type_name(previous, self.cx.interner)
                ),
                span,
            )),
        }
    }

    // === Variable declarations ===

    pub(crate) fn compile_variable_decl(
        &mut self,
        var: &VariableDecl,
        span: Span,
    ) -> CompileRes<ProgStmtId> {
        let declared = self.resolve_type(&var.ty, span)?;

        // `auto` deduction needs the initializer first.
        let (ty, init) = if declared.base_type() == Type::AUTO {
            let init_expr = match &var.init {
                Initializer::Assignment(e) => *e,
                Initializer::Constructor(args) | Initializer::Brace(args) if args.len() == 1 => {
                    args[0]
                }
                _ => {
                    return Err(CompileError::new(
                        ErrorCode::AutoMustBeUsedWithAssignment,
                        "'auto' requires an initializer",
                        span,
                    ))
                }
            };
            let compiled = self.check_expr(init_expr)?;
            let deduced = self.prog.expr_type(compiled).base_type();
            let deduced = if declared.is_const() {
                deduced.with_const()
            } else {
                deduced
            };
            let converted = self.convert_to(compiled, deduced, span)?;
            (deduced, converted)
        } else {
            let init = self.compile_initializer(declared, &var.init, span)?;
            (declared, init)
        };

        if self.at_top_level || var.is_static {
            let index = self.cx.next_global();
            self.stack.add_global(ty, var.name, index as u16);
            self.cx.register_global(var.name, ty, index, self.scope);
            return Ok(self.prog.alloc_stmt(ProgStmt::PushGlobal {
                index: index as u16,
                init,
            }));
        }

        let index = self.stack.add(ty, var.name);
        Ok(self
            .prog
            .alloc_stmt(ProgStmt::PushValue { index, init }))
    }

    /// Build the initializing expression for a variable of `ty`.
    fn compile_initializer(
        &mut self,
        ty: Type,
        init: &Initializer,
        span: Span,
    ) -> CompileRes<ProgExprId> {
        match init {
            Initializer::None => {
                if ty.is_reference() || ty.is_rvalue_reference() {
                    return Err(CompileError::new(
                        ErrorCode::ReferencesMustBeInitialized,
                        "references must be initialized",
                        span,
                    ));
                }
                if ty.is_enum() {
                    return Err(CompileError::new(
                        ErrorCode::EnumerationsMustBeInitialized,
                        "enumerations must be initialized",
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
                self.default_construct(ty, span)
            }
            Initializer::Assignment(expr) => {
                let compiled = self.check_expr(*expr)?;
                self.convert_to(compiled, ty, span)
            }
            Initializer::Constructor(args) => {
                let mut checked = Vec::with_capacity(args.len());
                for &a in args {
                    checked.push(self.check_expr(a)?);
                }
                self.value_construct(ty, checked, false, span)
            }
            Initializer::Brace(args) => {
                let mut checked = Vec::with_capacity(args.len());
                for &a in args {
                    checked.push(self.check_expr(a)?);
                }
                self.value_construct(ty, checked, true, span)
            }
        }
    }

    // === Constructor prologue / destructor epilogue ===

    fn constructor_prologue(
        &mut self,
        decl: &FunctionDecl,
        function: FunctionId,
        span: Span,
        out: &mut Vec<ProgStmtId>,
    ) -> CompileRes<()> {
        let FunctionKind::Constructor { initializers } = &decl.kind else {
            return Ok(());
        };
        let class = self
            .cx
            .ts
            .function(function)
            .member_of()
            .expect("constructors are members");
        let class_name = self.cx.ts.class(class).name;
        let parent = self.cx.ts.class(class).parent;

        let mut initialized: Vec<Name> = Vec::new();
        let mut delegated = false;
        let mut parent_initialized = false;

        for init in initializers {
            let name = match &self.cx.arena.ident(init.name).kind {
                IdentKind::Simple(n) => *n,
                _ => {
                    return Err(CompileError::new(
                        ErrorCode::NotDataMember,
                        "invalid member initializer",
                        span,
                    ))
                }
            };

            let mut args = Vec::with_capacity(init.args.len());
            for &a in &init.args {
                args.push(self.check_expr(a)?);
            }

            if name == class_name {
                // Delegating constructor.
                if !initialized.is_empty() || delegated {
                    return Err(CompileError::new(
                        ErrorCode::InvalidUseOfDelegatedConstructor,
                        "a delegating constructor cannot have other initializers",
                        span,
                    ));
                }
                delegated = true;
                let ctors = self.cx.ts.class(class).constructors.clone();
                let arg_types: Vec<Type> = args.iter().map(|&a| self.prog.expr_type(a)).collect();
                let resolution =
                    crate::overload::resolve_overloads(self.cx.ts, &ctors, None, &arg_types)
                        .ok_or_else(|| {
                            CompileError::new(
                                ErrorCode::NoDelegatingConstructorFound,
                                "no matching delegating constructor",
                                span,
                            )
                        })?;
                let args = self.apply_initializations(
                    args,
                    &resolution.initializations,
                    resolution.function,
                    0,
                )?;
                out.push(self.prog.alloc_stmt(ProgStmt::InitParent {
                    constructor: resolution.function,
                    args,
                }));
                continue;
            }

            // Parent-class initializer.
            if let Some(parent_class) = parent {
                if name == self.cx.ts.class(parent_class).name {
                    parent_initialized = true;
                    let ctors = self.cx.ts.class(parent_class).constructors.clone();
                    let arg_types: Vec<Type> =
                        args.iter().map(|&a| self.prog.expr_type(a)).collect();
                    let resolution =
                        crate::overload::resolve_overloads(self.cx.ts, &ctors, None, &arg_types)
                            .ok_or_else(|| {
                                CompileError::new(
                                    ErrorCode::CouldNotFindValidBaseConstructor,
                                    "no matching base-class constructor",
                                    span,
                                )
                            })?;
                    let args = self.apply_initializations(
                        args,
                        &resolution.initializations,
                        resolution.function,
                        0,
                    )?;
                    out.push(self.prog.alloc_stmt(ProgStmt::InitParent {
                        constructor: resolution.function,
                        args,
                    }));
                    continue;
                }
            }

            // Data member initializer.
            let def = self.cx.ts.class(class);
            let Some(local) = def.data_member_index(name) else {
                if self
                    .cx
                    .ts
                    .class(class)
                    .parent
                    .map(|p| {
                        let mut current = Some(p);
                        while let Some(c) = current {
                            if self.cx.ts.class(c).data_member_index(name).is_some() {
                                return true;
                            }
                            current = self.cx.ts.class(c).parent;
                        }
                        false
                    })
                    .unwrap_or(false)
                {
                    return Err(CompileError::new(
                        ErrorCode::InheritedDataMember,
                        "cannot initialize an inherited data member",
                        span,
                    ));
                }
                return Err(CompileError::new(
                    ErrorCode::NotDataMember,
                    format!("'{}' is not a data member", self.cx.interner.resolve(name)),
                    span,
                ));
            };
            if initialized.contains(&name) {
                return Err(CompileError::new(
                    ErrorCode::DataMemberAlreadyHasInitializer,
                    format!(
                        "data member '{}' already has an initializer",
                        self.cx.interner.resolve(name)
                    ),
                    span,
                ));
            }
            initialized.push(name);

            let member = self.cx.ts.class(class).data_members[local].clone();
            let absolute = self.cx.ts.class(class).attributes_offset + local;
            let value = self.value_construct(member.ty, args, init.brace_form, span)?;
            out.push(self.prog.alloc_stmt(ProgStmt::InitMember {
                index: absolute as u16,
                init: value,
            }));
        }

        if delegated {
            return Ok(());
        }

        // Implicit parent default construction.
        if let Some(parent_class) = parent {
            if !parent_initialized {
                let ctor = self.cx.ts.default_constructor(parent_class).ok_or_else(|| {
                    CompileError::new(
                        ErrorCode::ParentHasNoDefaultConstructor,
                        "parent class has no default constructor",
                        span,
                    )
                })?;
                if self.cx.ts.function(ctor).is_deleted() {
                    return Err(CompileError::new(
                        ErrorCode::ParentHasDeletedDefaultConstructor,
                        "parent class's default constructor is deleted",
                        span,
                    ));
                }
                out.push(self.prog.alloc_stmt(ProgStmt::InitParent {
                    constructor: ctor,
                    args: Vec::new(),
                }));
            }
        }

        // Default-construct members without an explicit initializer.
        let members = self.cx.ts.class(class).data_members.clone();
        let offset = self.cx.ts.class(class).attributes_offset;
        for (i, member) in members.iter().enumerate() {
            if initialized.contains(&member.name) {
                continue;
            }
            let value = self.default_construct(member.ty, span)?;
            out.push(self.prog.alloc_stmt(ProgStmt::InitMember {
                index: (offset + i) as u16,
                init: value,
            }));
        }

        Ok(())
    }

    fn destructor_epilogue(&mut self, function: FunctionId, out: &mut Vec<ProgStmtId>) {
        let class = self
            .cx
            .ts
            .function(function)
            .member_of()
            .expect("destructors are members");

        // Destroy members in reverse declaration order.
        let members = self.cx.ts.class(class).data_members.clone();
        let offset = self.cx.ts.class(class).attributes_offset;
        for (i, member) in members.iter().enumerate().rev() {
            if !member.ty.is_object() {
                continue;
            }
            if let Some(dtor) = self.cx.ts.destructor_for(member.ty) {
                let this = self.implicit_object().expect("destructor has an object");
                let access = self.prog.alloc_expr(ProgExpr {
                    kind: ProgExprKind::MemberAccess {
                        object: this,
                        index: (offset + i) as u16,
                    },
                    ty: Type::make_ref(member.ty),
                });
                let call = self.prog.alloc_expr(ProgExpr {
                    kind: ProgExprKind::FunctionCall {
                        function: dtor,
                        args: vec![access],
                    },
                    ty: Type::VOID,
                });
                out.push(self.prog.alloc_stmt(ProgStmt::Expression(call)));
            }
        }

        // Then the parent destructor.
        if let Some(parent) = self.cx.ts.class(class).parent {
            if let Some(dtor) = self.cx.ts.class(parent).destructor.or_else(|| {
                let parent_ty = self.cx.ts.class(parent).ty;
                self.cx.ts.destructor_for(parent_ty)
            }) {
                let this = self.implicit_object().expect("destructor has an object");
                let call = self.prog.alloc_expr(ProgExpr {
                    kind: ProgExprKind::FunctionCall {
                        function: dtor,
                        args: vec![this],
                    },
                    ty: Type::VOID,
                });
                out.push(self.prog.alloc_stmt(ProgStmt::Expression(call)));
            }
        }
    }
}
