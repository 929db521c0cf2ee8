//! The compilation driver.
//!
//! Compilation runs in phases:
//!
//! 1. **Registration** walks the declarations and builds symbols:
//!    classes (with member prototypes and vtables), enums, namespaces,
//!    free functions, templates, typedefs and using-constructs.
//! 2. **Script body**: top-level statements compile into one script
//!    function; top-level variables become globals.
//! 3. **Function bodies** compile to a fixpoint: bodies may instantiate
//!    templates whose methods then need compiling too.
//!
//! Within one body the first semantic error aborts that body; other
//! declarations continue, so a run reports a batch of diagnostics.

use rustc_hash::FxHashMap;
use tracing::debug;

use script_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode, LineMap};
use script_ir::ast::{
    AccessSpecifier, ClassDecl, DeclKind, EnumDecl, ExprKind, FunctionBody, FunctionDecl,
    FunctionKind, IdentKind, Module, OperatorId, QualType, StmtKind, UsingDecl,
};
use script_ir::program::{CompiledBody, ProgExpr, ProgExprKind, ProgStmt};
use script_ir::{
    AstArena, ClassId, DeclId, FunctionId, Name, NamespaceId, Span, StringInterner, TemplateId,
    Type,
};
use script_types::lookup::{Lookup, LookupError, NameLookup, TemplateInstantiator};
use script_types::{
    DataMember, FunctionDef, FunctionFlags, FunctionSource, FunctionVariant, GlobalVariable,
    Prototype, Scope, ScopeKind, ScopeStack, StaticDataMember, SymbolRef, TemplateArgValue,
    TemplateDef, TemplateKind, TemplateParamDef, TypeSystem,
};

use crate::error::{CompileError, CompileRes};
use crate::stmt::FunctionCompiler;

/// Result of compiling one module against an engine.
pub struct CompileOutput {
    pub diagnostics: Vec<Diagnostic>,
    pub success: bool,
    /// The script's top-level body (global initialization and
    /// statements).
    pub script: Option<CompiledBody>,
    /// Number of global slots the script uses.
    pub global_count: usize,
    /// Imported module paths, dot-joined, in source order.
    pub imports: Vec<String>,
}

/// Instantiates user class templates by registering their members.
pub(crate) struct Instantiator<'a> {
    arena: &'a AstArena,
    interner: &'a StringInterner,
    depth: u8,
    /// Shared global-slot counter, so static members of template
    /// instances get distinct slots.
    globals: std::rc::Rc<std::cell::Cell<usize>>,
}

impl TemplateInstantiator for Instantiator<'_> {
    fn instantiate_class_template(
        &mut self,
        ts: &mut TypeSystem,
        template: TemplateId,
        args: &[TemplateArgValue],
    ) -> Result<ClassId, LookupError> {
        if self.depth > 16 {
            return Err(LookupError::InvalidTemplateArgument);
        }

        let def = ts.template(template);
        let TemplateKind::Class { decl } = def.kind else {
            return Err(LookupError::InvalidTemplateArgument);
        };
        let ns = def.enclosing_namespace;
        let name = def.name;
        let bindings: Vec<(Name, TemplateArgValue)> = def
            .params
            .iter()
            .map(|p| p.name)
            .zip(args.iter().cloned())
            .collect();

        let DeclKind::Class(class_decl) = self.arena.decl(decl).kind.clone() else {
            return Err(LookupError::InvalidTemplateArgument);
        };

        let class = ts.register_class(name, ns);
        let mut nested = Instantiator {
            arena: self.arena,
            interner: self.interner,
            depth: self.depth + 1,
            globals: self.globals.clone(),
        };
        let globals = self.globals.clone();
        register_class_members(
            ts,
            self.arena,
            self.interner,
            class,
            &class_decl,
            ns,
            &bindings,
            &mut nested,
            &mut || {
                let g = globals.get();
                globals.set(g + 1);
                g
            },
        )
        .map_err(|_| LookupError::InvalidTemplateArgument)?;

        Ok(class)
    }
}

/// Module-wide compilation state shared by every function compiler.
pub(crate) struct ModuleCx<'a> {
    pub ts: &'a mut TypeSystem,
    pub arena: &'a AstArena,
    pub interner: &'a StringInterner,
    pub scopes: ScopeStack,
    instantiator: Instantiator<'a>,
    globals: std::rc::Rc<std::cell::Cell<usize>>,
    pub imports: Vec<String>,
}

impl<'a> ModuleCx<'a> {
    fn new(ts: &'a mut TypeSystem, arena: &'a AstArena, interner: &'a StringInterner) -> Self {
        let globals = std::rc::Rc::new(std::cell::Cell::new(0));
        ModuleCx {
            ts,
            arena,
            interner,
            scopes: ScopeStack::new(),
            instantiator: Instantiator {
                arena,
                interner,
                depth: 0,
                globals: globals.clone(),
            },
            globals,
            imports: Vec::new(),
        }
    }

    pub(crate) fn lookup(&mut self) -> Lookup<'_> {
        Lookup {
            scopes: &self.scopes,
            ts: &mut *self.ts,
            arena: self.arena,
            interner: self.interner,
            instantiator: &mut self.instantiator,
        }
    }

    pub(crate) fn next_global(&mut self) -> usize {
        let g = self.globals.get();
        self.globals.set(g + 1);
        g
    }

    pub(crate) fn register_global(&mut self, name: Name, ty: Type, index: usize, scope: Scope) {
        let ns = self.scopes.enclosing_namespace(scope);
        self.ts
            .namespace_mut(ns)
            .variables
            .insert(name, GlobalVariable { ty, index });
    }

    pub(crate) fn lookup_error_to_compile_error(e: LookupError, span: Span) -> CompileError {
        match e {
            LookupError::NotAScope => {
                CompileError::new(ErrorCode::InvalidTypeName, "name does not denote a scope", span)
            }
            LookupError::UnknownType(_) => {
                CompileError::new(ErrorCode::InvalidTypeName, "unknown type name", span)
            }
            LookupError::InvalidTemplateArgument => CompileError::new(
                ErrorCode::InvalidTemplateArgument,
                "invalid template argument",
                span,
            ),
            LookupError::MissingTemplateArgument => CompileError::new(
                ErrorCode::MissingNonDefaultedTemplateParameter,
                "missing template argument without a default",
                span,
            ),
        }
    }

    /// Reconstruct the scope chain a deferred function body compiles in.
    fn scope_for_source(&mut self, source: &FunctionSource) -> Scope {
        let mut chain = Vec::new();
        let mut ns = Some(source.namespace);
        while let Some(id) = ns {
            chain.push(id);
            ns = self.ts.namespace(id).parent;
        }

        let mut scope = self.scopes.root();
        for &id in chain.iter().rev() {
            if id != NamespaceId::ROOT {
                scope = self.scopes.push(scope, ScopeKind::Namespace(id));
            }
        }
        if !source.template_args.is_empty() {
            scope = self
                .scopes
                .push(scope, ScopeKind::TemplateArgs(source.template_args.clone()));
        }
        if let Some(class) = source.member_of {
            scope = self.scopes.push(scope, ScopeKind::Class(class));
        }
        scope
    }

    // === Function templates ===

    /// Deduce a function template's arguments from call argument types
    /// and instantiate it. Returns `None` when deduction fails — the
    /// template simply contributes no candidate.
    pub(crate) fn complete_function_template(
        &mut self,
        template: TemplateId,
        arg_types: &[Type],
    ) -> CompileRes<Option<FunctionId>> {
        let def = self.ts.template(template);
        let TemplateKind::Function { decl } = def.kind else {
            return Ok(None);
        };
        let params = def.params.clone();
        let ns = def.enclosing_namespace;
        let name = def.name;

        let DeclKind::Function(fn_decl) = self.arena.decl(decl).kind.clone() else {
            return Ok(None);
        };

        // Deduction: a parameter written exactly as a template parameter
        // name binds that parameter to the argument's base type.
        let mut bound: FxHashMap<Name, TemplateArgValue> = FxHashMap::default();
        for (i, p) in fn_decl.params.iter().enumerate() {
            let Some(arg) = arg_types.get(i) else { break };
            if let Some(ident) = p.ty.ident {
                if let IdentKind::Simple(pname) = &self.arena.ident(ident).kind {
                    let pname = *pname;
                    if params.iter().any(|tp| tp.name == pname) {
                        bound
                            .entry(pname)
                            .or_insert(TemplateArgValue::Type(arg.base_type().without_const()));
                    }
                }
            }
        }

        let mut values = Vec::with_capacity(params.len());
        for p in &params {
            match bound.get(&p.name) {
                Some(v) => values.push(v.clone()),
                None => match &p.default_value {
                    Some(v) => values.push(v.clone()),
                    None => return Ok(None),
                },
            }
        }

        // Canonical cache.
        if let Some(script_types::TemplateInstance::Function(f)) =
            self.ts.template(template).cached(&values)
        {
            return Ok(Some(f));
        }

        let bindings: Vec<(Name, TemplateArgValue)> = params
            .iter()
            .map(|p| p.name)
            .zip(values.iter().cloned())
            .collect();

        // Resolve the instantiated prototype under the bound arguments.
        let source = FunctionSource {
            decl,
            namespace: ns,
            member_of: None,
            template_args: bindings.clone(),
        };
        let scope = self.scope_for_source(&source);
        let span = self.arena.decl(decl).span;

        let return_type = match &fn_decl.return_type {
            Some(qt) => self
                .lookup()
                .resolve_qual_type(qt, scope)
                .map_err(|e| Self::lookup_error_to_compile_error(e, span))?,
            None => Type::VOID,
        };
        let mut proto_params = Vec::with_capacity(fn_decl.params.len());
        for p in &fn_decl.params {
            let ty = self
                .lookup()
                .resolve_qual_type(&p.ty, scope)
                .map_err(|e| Self::lookup_error_to_compile_error(e, span))?;
            proto_params.push(ty);
        }

        let function = self.ts.add_function(FunctionDef {
            variant: FunctionVariant::Regular { name },
            flags: FunctionFlags::default(),
            prototype: Prototype::new(return_type, proto_params),
            enclosing: SymbolRef::Namespace(ns),
            default_args: trailing_defaults(&fn_decl),
            body: None,
            native: None,
            source: Some(source),
        });

        self.ts
            .template_mut(template)
            .instances
            .insert(values, script_types::TemplateInstance::Function(function));

        Ok(Some(function))
    }

    /// Compile a lambda body in a nested function compiler.
    pub(crate) fn compile_lambda_body(
        &mut self,
        lambda: &script_ir::ast::LambdaExpr,
        call_op: FunctionId,
        captures: &[script_types::CaptureDef],
        param_names: &[Option<Name>],
        enclosing_scope: Scope,
    ) -> CompileRes<CompiledBody> {
        let proto = self.ts.function(call_op).prototype.clone();

        let mut fc = FunctionCompiler::new(self, enclosing_scope);
        fc.caller = Some(call_op);
        fc.captures = captures.to_vec();

        fc.stack.enter_block();
        // Slot 0: return placeholder; slot 1: the closure object.
        fc.stack.add(proto.return_type, Name::EMPTY);
        let this_name = fc.cx.interner.intern("this");
        fc.stack.add(proto.param(0), this_name);
        for (i, name) in param_names.iter().enumerate().skip(1) {
            fc.stack.add(proto.param(i), name.unwrap_or(Name::EMPTY));
        }

        let StmtKind::Compound(statements) = fc.cx.arena.stmt(lambda.body).kind.clone() else {
            return Err(CompileError::new(
                ErrorCode::ExpectedDeclaration,
                "lambda body must be a compound statement",
                Span::DUMMY,
            ));
        };

        let mut out = Vec::new();
        for s in statements {
            let compiled = fc.compile_stmt(s)?;
            out.push(compiled);
        }

        if fc.cx.ts.function(call_op).prototype.return_type == Type::AUTO {
            let deduced = fc.deduced_return.unwrap_or(Type::VOID);
            fc.cx.ts.function_mut(call_op).prototype.return_type = deduced;
        }

        let vars = fc.stack.leave_block();
        fc.emit_destructors(&vars, &mut out);
        let root = fc.prog.alloc_stmt(ProgStmt::Compound(out));
        Ok(CompiledBody {
            arena: std::mem::take(&mut fc.prog),
            root: Some(root),
        })
    }
}

/// Compile a parsed module against an engine's type system.
pub fn compile(
    module: &Module,
    arena: &AstArena,
    interner: &StringInterner,
    ts: &mut TypeSystem,
    lines: &LineMap,
) -> CompileOutput {
    let mut cx = ModuleCx::new(ts, arena, interner);
    let mut queue = DiagnosticQueue::new();

    // Phase 1: registration.
    let root_scope = cx.scopes.root();
    for &decl in &module.declarations {
        if let Err(e) = register_decl(&mut cx, decl, NamespaceId::ROOT, root_scope) {
            queue.push(e.to_diagnostic(lines));
        }
    }

    // Phase 2: the script's top level.
    debug!("compiling script top level");
    let script = compile_script_body(&mut cx, module, &mut queue, lines);

    // Phase 3: function bodies, to a fixpoint (instantiations during one
    // round may add more bodies).
    loop {
        let pending: Vec<FunctionId> = pending_bodies(cx.ts);
        if pending.is_empty() {
            break;
        }
        for f in pending {
            compile_pending_body(&mut cx, f, &mut queue, lines);
        }
    }

    let success = !queue.has_errors();
    CompileOutput {
        diagnostics: queue.take_sorted(),
        success,
        script,
        global_count: cx.globals.get(),
        imports: cx.imports,
    }
}

/// Convenience: lex + parse + compile one source string.
pub fn compile_source(source: &str, interner: &StringInterner) -> (TypeSystem, CompileOutput) {
    let lines = LineMap::new(source);
    let mut ts = TypeSystem::new(interner);
    script_types::register_builtins(&mut ts, interner);

    let tokens = match script_lexer::lex(source, interner) {
        Ok(tokens) => tokens,
        Err(err) => {
            let code = match err.kind {
                script_lexer::LexErrorKind::UnterminatedString => {
                    ErrorCode::UnterminatedStringLiteral
                }
                script_lexer::LexErrorKind::UnterminatedBlockComment => {
                    ErrorCode::UnterminatedBlockComment
                }
                script_lexer::LexErrorKind::InvalidDigit { .. }
                | script_lexer::LexErrorKind::NumberOutOfRange => ErrorCode::InvalidNumericLiteral,
                script_lexer::LexErrorKind::InvalidEscape { .. } => ErrorCode::InvalidEscapeSequence,
                script_lexer::LexErrorKind::UnexpectedCharacter { .. } => {
                    ErrorCode::UnexpectedCharacter
                }
            };
            let diag = Diagnostic::error(code, err.to_string(), err.pos);
            return (
                ts,
                CompileOutput {
                    diagnostics: vec![diag],
                    success: false,
                    script: None,
                    global_count: 0,
                    imports: Vec::new(),
                },
            );
        }
    };

    let parsed = script_parse::parse(&tokens, interner);
    if parsed.has_errors() {
        let diagnostics = parsed
            .errors
            .iter()
            .map(script_parse::SyntaxError::to_diagnostic)
            .collect();
        return (
            ts,
            CompileOutput {
                diagnostics,
                success: false,
                script: None,
                global_count: 0,
                imports: Vec::new(),
            },
        );
    }

    let output = compile(&parsed.module, &parsed.arena, interner, &mut ts, &lines);
    (ts, output)
}

// === Registration ===

fn register_decl(
    cx: &mut ModuleCx<'_>,
    decl: DeclId,
    ns: NamespaceId,
    scope: Scope,
) -> CompileRes<()> {
    let span = cx.arena.decl(decl).span;
    match cx.arena.decl(decl).kind.clone() {
        DeclKind::Class(class_decl) => {
            let name = class_name(cx, &class_decl)?;
            let class = cx.ts.register_class(name, ns);
            cx.ts.namespace_mut(ns).classes.insert(name, class);
            let mut globals = {
                let shared = cx.globals.clone();
                move || {
                    let g = shared.get();
                    shared.set(g + 1);
                    g
                }
            };
            let mut instantiator = Instantiator {
                arena: cx.arena,
                interner: cx.interner,
                depth: 0,
                globals: cx.globals.clone(),
            };
            register_class_members(
                cx.ts,
                cx.arena,
                cx.interner,
                class,
                &class_decl,
                ns,
                &[],
                &mut instantiator,
                &mut globals,
            )?;
            Ok(())
        }
        DeclKind::Enum(enum_decl) => register_enum(cx, &enum_decl, ns, span),
        DeclKind::Function(fn_decl) => {
            register_free_function(cx, &fn_decl, decl, ns, scope, span).map(|_| ())
        }
        DeclKind::Namespace { name, declarations } => {
            let child = match cx.ts.namespace(ns).namespaces.get(&name) {
                Some(&existing) => existing,
                None => cx.ts.add_namespace(name, ns),
            };
            let child_scope = cx.scopes.push(scope, ScopeKind::Namespace(child));
            for stmt in declarations {
                if let StmtKind::Declaration(inner) = &cx.arena.stmt(stmt).kind {
                    let inner = *inner;
                    register_decl(cx, inner, child, child_scope)?;
                }
            }
            Ok(())
        }
        DeclKind::NamespaceAlias { name, aliased } => {
            let target = cx
                .lookup()
                .resolve(aliased, scope)
                .map_err(|e| ModuleCx::lookup_error_to_compile_error(e, span))?;
            match target {
                NameLookup::Namespace(target_ns) => {
                    cx.ts.namespace_mut(ns).aliases.insert(name, target_ns);
                    Ok(())
                }
                _ => Err(CompileError::new(
                    ErrorCode::InvalidTypeName,
                    "alias target is not a namespace",
                    span,
                )),
            }
        }
        DeclKind::Typedef { ty, name } => {
            let resolved = cx
                .lookup()
                .resolve_qual_type(&ty, scope)
                .map_err(|e| ModuleCx::lookup_error_to_compile_error(e, span))?;
            cx.ts.namespace_mut(ns).typedefs.insert(name, resolved);
            Ok(())
        }
        DeclKind::Using(using) => register_using(cx, &using, ns, scope, span),
        DeclKind::Import { names, .. } => {
            let path: Vec<&str> = names.iter().map(|&n| cx.interner.resolve(n)).collect();
            cx.imports.push(path.join("."));
            Ok(())
        }
        DeclKind::Template(template_decl) => {
            let params = template_params(cx, &template_decl.params, scope)?;
            let inner = template_decl.declaration;
            let (name, kind) = match &cx.arena.decl(inner).kind {
                DeclKind::Class(c) => (class_name(cx, c)?, TemplateKind::Class { decl: inner }),
                DeclKind::Function(f) => {
                    let name = cx.arena.ident(f.name).name().ok_or_else(|| {
                        CompileError::new(
                            ErrorCode::ExpectedIdentifier,
                            "invalid template function name",
                            span,
                        )
                    })?;
                    (name, TemplateKind::Function { decl: inner })
                }
                _ => {
                    return Err(CompileError::new(
                        ErrorCode::ExpectedDeclaration,
                        "a template must declare a class or a function",
                        span,
                    ))
                }
            };
            let template = cx.ts.add_template(TemplateDef::new(name, params, kind, ns));
            cx.ts.namespace_mut(ns).templates.push(template);
            Ok(())
        }
        DeclKind::Variable(_) => Ok(()), // compiled with the script body
        DeclKind::Friend { .. } => Err(CompileError::new(
            ErrorCode::IllegalUseOfKeyword,
            "'friend' is only allowed inside a class",
            span,
        )),
    }
}

fn class_name(cx: &ModuleCx<'_>, class_decl: &ClassDecl) -> CompileRes<Name> {
    cx.arena.ident(class_decl.name).name().ok_or_else(|| {
        CompileError::new(
            ErrorCode::ExpectedIdentifier,
            "invalid class name",
            cx.arena.ident(class_decl.name).span,
        )
    })
}

fn template_params(
    cx: &mut ModuleCx<'_>,
    params: &[script_ir::ast::TemplateParam],
    scope: Scope,
) -> CompileRes<Vec<TemplateParamDef>> {
    let mut out = Vec::with_capacity(params.len());
    for p in params {
        let default_value = match &p.default_value {
            None => None,
            Some(script_ir::ast::TemplateArg::Type(qt)) => {
                let ty = cx
                    .lookup()
                    .resolve_qual_type(qt, scope)
                    .map_err(|e| ModuleCx::lookup_error_to_compile_error(e, Span::DUMMY))?;
                Some(TemplateArgValue::Type(ty))
            }
            Some(script_ir::ast::TemplateArg::Expr(e)) => match cx.arena.expr(*e).kind {
                ExprKind::Int(v) => Some(TemplateArgValue::Int(v)),
                ExprKind::Bool(v) => Some(TemplateArgValue::Bool(v)),
                _ => {
                    return Err(CompileError::new(
                        ErrorCode::InvalidTemplateArgument,
                        "template parameter defaults must be constants",
                        cx.arena.expr(*e).span,
                    ))
                }
            },
        };
        out.push(TemplateParamDef {
            kind: p.kind,
            name: p.name,
            default_value,
        });
    }
    Ok(out)
}

fn register_enum(
    cx: &mut ModuleCx<'_>,
    enum_decl: &EnumDecl,
    ns: NamespaceId,
    span: Span,
) -> CompileRes<()> {
    let id = cx
        .ts
        .register_enum(enum_decl.name, enum_decl.is_enum_class, ns);
    cx.ts.namespace_mut(ns).enums.insert(enum_decl.name, id);

    for value in &enum_decl.values {
        let v = match value.value {
            None => cx.ts.enum_(id).next_value(),
            Some(expr) => const_eval_int(cx, expr).ok_or_else(|| {
                CompileError::new(
                    ErrorCode::InvalidTemplateArgument,
                    "enumerator values must be integer constants",
                    span,
                )
            })? as i32,
        };
        if !cx.ts.enum_mut(id).add_value(value.name, v) {
            return Err(CompileError::new(
                ErrorCode::ExpectedIdentifier,
                "duplicate enumerator name",
                span,
            ));
        }
    }

    // Synthesized assignment operator.
    let ty = cx.ts.enum_(id).ty;
    let assign = cx.ts.make_native_fn(
        FunctionVariant::Operator {
            op: OperatorId::Assignment,
        },
        FunctionFlags::default(),
        Prototype::new(Type::make_ref(ty), vec![Type::make_ref(ty), ty.with_const()]),
        SymbolRef::Namespace(ns),
        script_types::NativeTag::EnumAssign,
    );
    cx.ts.enum_mut(id).assignment = Some(assign);
    Ok(())
}

fn const_eval_int(cx: &ModuleCx<'_>, expr: script_ir::ExprId) -> Option<i64> {
    match &cx.arena.expr(expr).kind {
        ExprKind::Int(v) => Some(*v),
        ExprKind::Unary { op, arg } if *op == OperatorId::UnaryMinus => {
            const_eval_int(cx, *arg).map(|v| -v)
        }
        _ => None,
    }
}

fn register_using(
    cx: &mut ModuleCx<'_>,
    using: &UsingDecl,
    ns: NamespaceId,
    scope: Scope,
    span: Span,
) -> CompileRes<()> {
    match using {
        UsingDecl::Directive { name } => {
            let target = cx
                .lookup()
                .resolve(*name, scope)
                .map_err(|e| ModuleCx::lookup_error_to_compile_error(e, span))?;
            match target {
                NameLookup::Namespace(used) => {
                    cx.ts.namespace_mut(ns).using_directives.push(used);
                    Ok(())
                }
                _ => Err(CompileError::new(
                    ErrorCode::InvalidTypeName,
                    "'using namespace' requires a namespace name",
                    span,
                )),
            }
        }
        UsingDecl::Declaration { name } => {
            let imported_name = match &cx.arena.ident(*name).kind {
                IdentKind::Scoped { rhs, .. } => cx.arena.ident(*rhs).name(),
                _ => None,
            }
            .ok_or_else(|| {
                CompileError::new(
                    ErrorCode::ExpectedIdentifier,
                    "'using' requires a qualified name",
                    span,
                )
            })?;

            let target = cx
                .lookup()
                .resolve(*name, scope)
                .map_err(|e| ModuleCx::lookup_error_to_compile_error(e, span))?;
            match target {
                NameLookup::Functions { functions, .. } => {
                    for f in functions {
                        cx.ts.namespace_mut(ns).add_function(imported_name, f);
                    }
                    Ok(())
                }
                NameLookup::Type(ty) => {
                    cx.ts.namespace_mut(ns).typedefs.insert(imported_name, ty);
                    Ok(())
                }
                NameLookup::GlobalVariable(index, ty) => {
                    cx.ts
                        .namespace_mut(ns)
                        .variables
                        .insert(imported_name, GlobalVariable { ty, index });
                    Ok(())
                }
                _ => Err(CompileError::new(
                    ErrorCode::InvalidTypeName,
                    "cannot import this name",
                    span,
                )),
            }
        }
        UsingDecl::TypeAlias { name, aliased } => {
            let target = cx
                .lookup()
                .resolve(*aliased, scope)
                .map_err(|e| ModuleCx::lookup_error_to_compile_error(e, span))?;
            match target {
                NameLookup::Type(ty) => {
                    cx.ts.namespace_mut(ns).typedefs.insert(*name, ty);
                    Ok(())
                }
                _ => Err(CompileError::new(
                    ErrorCode::InvalidTypeName,
                    "alias target is not a type",
                    span,
                )),
            }
        }
    }
}

/// The trailing parameters that carry default arguments.
fn trailing_defaults(fn_decl: &FunctionDecl) -> Vec<script_ir::ExprId> {
    fn_decl
        .params
        .iter()
        .rev()
        .map_while(|p| p.default_value)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect()
}

fn register_free_function(
    cx: &mut ModuleCx<'_>,
    fn_decl: &FunctionDecl,
    decl: DeclId,
    ns: NamespaceId,
    scope: Scope,
    span: Span,
) -> CompileRes<FunctionId> {
    let return_type = match &fn_decl.return_type {
        Some(qt) => cx
            .lookup()
            .resolve_qual_type(qt, scope)
            .map_err(|e| ModuleCx::lookup_error_to_compile_error(e, span))?,
        None => Type::VOID,
    };

    let mut params = Vec::with_capacity(fn_decl.params.len());
    for p in &fn_decl.params {
        let ty = cx
            .lookup()
            .resolve_qual_type(&p.ty, scope)
            .map_err(|e| ModuleCx::lookup_error_to_compile_error(e, span))?;
        params.push(ty);
    }

    let variant = match &cx.arena.ident(fn_decl.name).kind {
        IdentKind::Simple(name) => FunctionVariant::Regular { name: *name },
        IdentKind::Operator(op) => FunctionVariant::Operator { op: *op },
        IdentKind::LiteralOperator(suffix) => FunctionVariant::LiteralOperator { suffix: *suffix },
        _ => {
            return Err(CompileError::new(
                ErrorCode::ExpectedIdentifier,
                "invalid function name",
                span,
            ))
        }
    };

    let mut flags = FunctionFlags::default();
    if matches!(fn_decl.body, FunctionBody::Deleted) {
        flags |= FunctionFlags::DELETED;
    }
    if matches!(fn_decl.body, FunctionBody::Defaulted) {
        return Err(CompileError::new(
            ErrorCode::FunctionCannotBeDefaulted,
            "a free function cannot be defaulted",
            span,
        ));
    }

    let function = cx.ts.add_function(FunctionDef {
        variant: variant.clone(),
        flags,
        prototype: Prototype::new(return_type, params),
        enclosing: SymbolRef::Namespace(ns),
        default_args: trailing_defaults(fn_decl),
        body: None,
        native: None,
        source: Some(FunctionSource {
            decl,
            namespace: ns,
            member_of: None,
            template_args: Vec::new(),
        }),
    });

    match variant {
        FunctionVariant::Regular { name } => cx.ts.namespace_mut(ns).add_function(name, function),
        FunctionVariant::Operator { .. } => cx.ts.namespace_mut(ns).operators.push(function),
        FunctionVariant::LiteralOperator { .. } => {
            cx.ts.namespace_mut(ns).literal_operators.push(function)
        }
        _ => unreachable!("free functions are regular, operator or literal-operator"),
    }

    Ok(function)
}

// === Class registration (shared with template instantiation) ===

#[allow(clippy::too_many_arguments)]
pub(crate) fn register_class_members(
    ts: &mut TypeSystem,
    arena: &AstArena,
    interner: &StringInterner,
    class: ClassId,
    class_decl: &ClassDecl,
    ns: NamespaceId,
    template_args: &[(Name, TemplateArgValue)],
    instantiator: &mut dyn TemplateInstantiator,
    next_global: &mut dyn FnMut() -> usize,
) -> CompileRes<()> {
    // Local scope chain for resolving member types: namespaces up to
    // `ns`, template arguments, then the class itself.
    let mut scopes = ScopeStack::new();
    let mut chain = Vec::new();
    let mut walk = Some(ns);
    while let Some(id) = walk {
        chain.push(id);
        walk = ts.namespace(id).parent;
    }
    let mut scope = scopes.root();
    for &id in chain.iter().rev() {
        if id != NamespaceId::ROOT {
            scope = scopes.push(scope, ScopeKind::Namespace(id));
        }
    }
    if !template_args.is_empty() {
        scope = scopes.push(scope, ScopeKind::TemplateArgs(template_args.to_vec()));
    }
    let class_scope = scopes.push(scope, ScopeKind::Class(class));

    let class_ty = ts.class(class).ty;
    let decl_span = arena.ident(class_decl.name).span;

    // Parent class.
    if let Some(parent_ident) = class_decl.parent {
        let parent_ty = {
            let mut lookup = Lookup {
                scopes: &scopes,
                ts,
                arena,
                interner,
                instantiator,
            };
            match lookup.resolve(parent_ident, scope) {
                Ok(NameLookup::Type(t)) if t.is_object() => t,
                _ => {
                    return Err(CompileError::new(
                        ErrorCode::InvalidBaseClass,
                        "base class name does not denote a class",
                        decl_span,
                    ))
                }
            }
        };
        let parent = ts.class_of(parent_ty).expect("object type has a class");
        let offset = ts.class(parent).attribute_count();
        let vtable = ts.class(parent).vtable.clone();
        let def = ts.class_mut(class);
        def.parent = Some(parent);
        def.attributes_offset = offset;
        def.vtable = vtable;
    }

    for member in &class_decl.members {
        let member_span = arena.decl(member.decl).span;
        match arena.decl(member.decl).kind.clone() {
            DeclKind::Variable(var) => {
                let ty = {
                    let mut lookup = Lookup {
                        scopes: &scopes,
                        ts,
                        arena,
                        interner,
                        instantiator,
                    };
                    lookup
                        .resolve_qual_type(&var.ty, class_scope)
                        .map_err(|e| ModuleCx::lookup_error_to_compile_error(e, member_span))?
                };
                if ty.base_type() == Type::AUTO {
                    return Err(CompileError::new(
                        ErrorCode::InvalidTypeName,
                        "a data member cannot be declared 'auto'",
                        member_span,
                    ));
                }
                if var.is_static {
                    let init = match var.init {
                        script_ir::ast::Initializer::Assignment(e) => Some(e),
                        script_ir::ast::Initializer::None => {
                            return Err(CompileError::new(
                                ErrorCode::StaticDataMemberMustBeInitialized,
                                "static data members must be initialized",
                                member_span,
                            ))
                        }
                        _ => None,
                    };
                    let index = next_global();
                    ts.class_mut(class).static_members.push(StaticDataMember {
                        ty,
                        name: var.name,
                        access: member.access,
                        init,
                        index,
                    });
                } else {
                    ts.class_mut(class).data_members.push(DataMember {
                        ty,
                        name: var.name,
                        access: member.access,
                    });
                }
            }
            DeclKind::Function(fn_decl) => {
                register_member_function(
                    ts,
                    arena,
                    interner,
                    class,
                    class_ty,
                    &fn_decl,
                    member.decl,
                    member.access,
                    ns,
                    template_args,
                    &scopes,
                    class_scope,
                    instantiator,
                )?;
            }
            DeclKind::Friend { class_name } => {
                if let Some(name) = arena.ident(class_name).name() {
                    ts.class_mut(class).friends.push(name);
                }
            }
            DeclKind::Enum(_) | DeclKind::Using(_) | DeclKind::Typedef { .. }
            | DeclKind::Template(_) => {
                // Nested declarations are registered against the
                // enclosing namespace; bodies that need them resolve
                // through it.
            }
            _ => {
                return Err(CompileError::new(
                    ErrorCode::ExpectedDeclaration,
                    "this declaration is not allowed in a class body",
                    member_span,
                ))
            }
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn register_member_function(
    ts: &mut TypeSystem,
    arena: &AstArena,
    interner: &StringInterner,
    class: ClassId,
    class_ty: Type,
    fn_decl: &FunctionDecl,
    decl: DeclId,
    access: AccessSpecifier,
    ns: NamespaceId,
    template_args: &[(Name, TemplateArgValue)],
    scopes: &ScopeStack,
    class_scope: Scope,
    instantiator: &mut dyn TemplateInstantiator,
) -> CompileRes<()> {
    let span = arena.decl(decl).span;

    let resolve_qt = |ts: &mut TypeSystem,
                      instantiator: &mut dyn TemplateInstantiator,
                      qt: &QualType|
     -> CompileRes<Type> {
        let mut lookup = Lookup {
            scopes,
            ts,
            arena,
            interner,
            instantiator,
        };
        lookup
            .resolve_qual_type(qt, class_scope)
            .map_err(|e| ModuleCx::lookup_error_to_compile_error(e, span))
    };

    let mut flags = FunctionFlags::default().with_access(access);
    if fn_decl.is_virtual {
        flags |= FunctionFlags::VIRTUAL;
    }
    if fn_decl.is_static {
        flags |= FunctionFlags::STATIC;
    }
    if fn_decl.is_explicit {
        flags |= FunctionFlags::EXPLICIT;
    }
    match fn_decl.body {
        FunctionBody::Deleted => flags |= FunctionFlags::DELETED,
        FunctionBody::Defaulted => flags |= FunctionFlags::DEFAULTED,
        FunctionBody::Pure => flags |= FunctionFlags::VIRTUAL | FunctionFlags::PURE,
        FunctionBody::Block(_) => {}
    }

    let this = Prototype::this_param(class_ty, fn_decl.is_const);
    let source = FunctionSource {
        decl,
        namespace: ns,
        member_of: Some(class),
        template_args: template_args.to_vec(),
    };

    match &fn_decl.kind {
        FunctionKind::Constructor { .. } => {
            // Constructor prototypes carry the declared parameters only;
            // the object under construction is a compiler convention.
            let mut params = Vec::with_capacity(fn_decl.params.len());
            for p in &fn_decl.params {
                params.push(resolve_qt(ts, instantiator, &p.ty)?);
            }
            // A constructor "returns" a const reference to the class.
            let proto = Prototype::new(Type::cref(class_ty), params);
            let f = ts.add_function(FunctionDef {
                variant: FunctionVariant::Constructor,
                flags,
                prototype: proto,
                enclosing: SymbolRef::Class(class),
                default_args: trailing_defaults(fn_decl),
                body: None,
                native: None,
                source: Some(source),
            });
            ts.class_mut(class).constructors.push(f);
        }
        FunctionKind::Destructor => {
            let proto = Prototype::new(Type::VOID, vec![Prototype::this_param(class_ty, false)]);
            let f = ts.add_function(FunctionDef {
                variant: FunctionVariant::Destructor,
                flags,
                prototype: proto,
                enclosing: SymbolRef::Class(class),
                default_args: Vec::new(),
                body: None,
                native: None,
                source: Some(source),
            });
            ts.class_mut(class).destructor = Some(f);
        }
        FunctionKind::Cast { target } => {
            let target_ty = resolve_qt(ts, instantiator, target)?;
            let proto = Prototype::new(target_ty, vec![this]);
            let f = ts.add_function(FunctionDef {
                variant: FunctionVariant::Cast,
                flags,
                prototype: proto,
                enclosing: SymbolRef::Class(class),
                default_args: Vec::new(),
                body: None,
                native: None,
                source: Some(source),
            });
            ts.class_mut(class).casts.push(f);
        }
        FunctionKind::Regular => {
            let return_type = match &fn_decl.return_type {
                Some(qt) => resolve_qt(ts, instantiator, qt)?,
                None => Type::VOID,
            };
            let mut params = Vec::new();
            if !fn_decl.is_static {
                params.push(this);
            }
            for p in &fn_decl.params {
                params.push(resolve_qt(ts, instantiator, &p.ty)?);
            }
            let proto = Prototype::new(return_type, params);

            let variant = match &arena.ident(fn_decl.name).kind {
                IdentKind::Simple(name) => FunctionVariant::Regular { name: *name },
                IdentKind::Operator(op) => FunctionVariant::Operator { op: *op },
                IdentKind::LiteralOperator(_) => {
                    return Err(CompileError::new(
                        ErrorCode::LiteralOperatorNotInNamespace,
                        "literal operators must be declared at namespace scope",
                        span,
                    ))
                }
                _ => {
                    return Err(CompileError::new(
                        ErrorCode::ExpectedIdentifier,
                        "invalid member function name",
                        span,
                    ))
                }
            };

            // Virtual override detection: a method whose name and
            // parameters match a parent vtable entry reuses its slot.
            let mut vtable_slot: Option<usize> = None;
            if let FunctionVariant::Regular { name } = variant {
                if let Some(parent) = ts.class(class).parent {
                    let parent_vtable = ts.class(parent).vtable.clone();
                    for (slot, &vf) in parent_vtable.iter().enumerate() {
                        let vdef = ts.function(vf);
                        if vdef.name() == Some(name)
                            && vdef.prototype.params[1..]
                                .iter()
                                .map(|t| t.base_type())
                                .eq(proto.params[1..].iter().map(|t| t.base_type()))
                        {
                            vtable_slot = Some(slot);
                            flags |= FunctionFlags::VIRTUAL;
                            break;
                        }
                    }
                }
            }

            let is_virtual = flags.contains(FunctionFlags::VIRTUAL);
            let f = ts.add_function(FunctionDef {
                variant: variant.clone(),
                flags,
                prototype: proto,
                enclosing: SymbolRef::Class(class),
                default_args: trailing_defaults(fn_decl),
                body: None,
                native: None,
                source: Some(source),
            });

            match variant {
                FunctionVariant::Operator { .. } => ts.class_mut(class).operators.push(f),
                _ => ts.class_mut(class).methods.push(f),
            }

            if let Some(slot) = vtable_slot {
                ts.class_mut(class).vtable[slot] = f;
            } else if is_virtual {
                ts.class_mut(class).vtable.push(f);
            }
        }
    }

    Ok(())
}

// === Bodies ===

fn compile_script_body(
    cx: &mut ModuleCx<'_>,
    module: &Module,
    queue: &mut DiagnosticQueue,
    lines: &LineMap,
) -> Option<CompiledBody> {
    let root_scope = cx.scopes.root();
    let mut fc = FunctionCompiler::new(cx, root_scope);
    fc.at_top_level = true;
    fc.stack.enter_block();

    let mut out = Vec::new();
    for &stmt in &module.statements {
        // Declarations other than variables were handled during
        // registration.
        if let StmtKind::Declaration(decl) = &fc.cx.arena.stmt(stmt).kind {
            if !matches!(fc.cx.arena.decl(*decl).kind, DeclKind::Variable(_)) {
                continue;
            }
        }
        match fc.compile_stmt(stmt) {
            Ok(compiled) => out.push(compiled),
            Err(e) => queue.push(e.to_diagnostic(lines)),
        }
    }

    // Static data member initializers are part of script start-up.
    let static_inits = collect_static_member_inits(fc.cx.ts);
    for (class, member_index) in static_inits {
        let member = fc.cx.ts.class(class).static_members[member_index].clone();
        let Some(init_expr) = member.init else { continue };
        let result = fc.check_expr(init_expr).and_then(|compiled| {
            let span = fc.cx.arena.expr(init_expr).span;
            fc.convert_to(compiled, member.ty, span)
        });
        match result {
            Ok(init) => out.push(fc.prog.alloc_stmt(ProgStmt::PushGlobal {
                index: member.index as u16,
                init,
            })),
            Err(e) => queue.push(e.to_diagnostic(lines)),
        }
    }

    let vars = fc.stack.leave_block();
    let _ = vars; // globals persist for the script's lifetime
    let root = fc.prog.alloc_stmt(ProgStmt::Compound(out));
    Some(CompiledBody {
        arena: std::mem::take(&mut fc.prog),
        root: Some(root),
    })
}

fn collect_static_member_inits(ts: &TypeSystem) -> Vec<(ClassId, usize)> {
    let mut out = Vec::new();
    for raw in 0.. {
        let id = ClassId::from_raw(raw);
        let Some(class) = ts.try_class(id) else { break };
        for i in 0..class.static_members.len() {
            out.push((id, i));
        }
    }
    out
}

/// Script functions still waiting for a body.
fn pending_bodies(ts: &TypeSystem) -> Vec<FunctionId> {
    let mut out = Vec::new();
    for raw in 0.. {
        let id = FunctionId::from_raw(raw);
        let Some(def) = ts.try_function(id) else { break };
        if def.body.is_some() || def.native.is_some() {
            continue;
        }
        if def.is_deleted() || def.flags.contains(FunctionFlags::PURE) {
            continue;
        }
        if def.source.is_none() {
            continue;
        }
        out.push(id);
    }
    out
}

fn compile_pending_body(
    cx: &mut ModuleCx<'_>,
    function: FunctionId,
    queue: &mut DiagnosticQueue,
    lines: &LineMap,
) {
    let source = cx
        .ts
        .function(function)
        .source
        .clone()
        .expect("pending bodies have a source");
    let span = cx.arena.decl(source.decl).span;
    let DeclKind::Function(fn_decl) = cx.arena.decl(source.decl).kind.clone() else {
        // Malformed source link; mark the body so the fixpoint loop
        // terminates.
        cx.ts.function_mut(function).body = Some(CompiledBody::default());
        return;
    };

    let scope = cx.scope_for_source(&source);

    let result = match &fn_decl.body {
        FunctionBody::Block(body) => {
            let mut fc = FunctionCompiler::new(cx, scope);
            fc.compile_function_body(&fn_decl, function, *body, span)
        }
        FunctionBody::Defaulted => synthesize_defaulted_body(cx, function, scope, span),
        FunctionBody::Deleted | FunctionBody::Pure => {
            cx.ts.function_mut(function).body = Some(CompiledBody::default());
            return;
        }
    };

    match result {
        Ok(body) => {
            cx.ts.function_mut(function).body = Some(body);
        }
        Err(e) => {
            queue.push(e.to_diagnostic(lines));
            // Discard the partial tree; mark the body so compilation
            // does not retry forever.
            cx.ts.function_mut(function).body = Some(CompiledBody::default());
        }
    }
}

/// `= default`: check every base and member supports the operation, then
/// synthesize the body.
fn synthesize_defaulted_body(
    cx: &mut ModuleCx<'_>,
    function: FunctionId,
    scope: Scope,
    span: Span,
) -> CompileRes<CompiledBody> {
    let def = cx.ts.function(function);
    let class = def.member_of().ok_or_else(|| {
        CompileError::new(
            ErrorCode::FunctionCannotBeDefaulted,
            "only members can be defaulted",
            span,
        )
    })?;
    let is_copy = def.is_constructor() && def.prototype.param_count() == 1;
    let is_default_ctor = def.is_constructor() && def.prototype.param_count() == 0;
    let is_dtor = def.is_destructor();

    if !is_copy && !is_default_ctor && !is_dtor {
        return Err(CompileError::new(
            ErrorCode::FunctionCannotBeDefaulted,
            "this function cannot be defaulted",
            span,
        ));
    }

    let mut fc = FunctionCompiler::new(cx, scope);
    fc.caller = Some(function);
    fc.current_class = Some(class);
    fc.stack.enter_block();

    let mut statements = Vec::new();

    if is_default_ctor {
        // Parent default construction.
        if let Some(parent) = fc.cx.ts.class(class).parent {
            let ctor = fc.cx.ts.default_constructor(parent).ok_or_else(|| {
                CompileError::new(
                    ErrorCode::ParentHasNoDefaultConstructor,
                    "parent class has no default constructor",
                    span,
                )
            })?;
            if fc.cx.ts.function(ctor).is_deleted() {
                return Err(CompileError::new(
                    ErrorCode::ParentHasDeletedDefaultConstructor,
                    "parent class's default constructor is deleted",
                    span,
                ));
            }
            statements.push(fc.prog.alloc_stmt(ProgStmt::InitParent {
                constructor: ctor,
                args: Vec::new(),
            }));
        }
        let members = fc.cx.ts.class(class).data_members.clone();
        let offset = fc.cx.ts.class(class).attributes_offset;
        for (i, member) in members.iter().enumerate() {
            let init = fc.default_construct(member.ty, span)?;
            statements.push(fc.prog.alloc_stmt(ProgStmt::InitMember {
                index: (offset + i) as u16,
                init,
            }));
        }
    } else if is_copy {
        if let Some(parent) = fc.cx.ts.class(class).parent {
            let ctor = fc.cx.ts.copy_constructor(parent).ok_or_else(|| {
                CompileError::new(
                    ErrorCode::ParentHasNoCopyConstructor,
                    "parent class has no copy constructor",
                    span,
                )
            })?;
            if fc.cx.ts.function(ctor).is_deleted() {
                return Err(CompileError::new(
                    ErrorCode::ParentHasDeletedCopyConstructor,
                    "parent class's copy constructor is deleted",
                    span,
                ));
            }
            let other = fc.prog.alloc_expr(ProgExpr {
                kind: ProgExprKind::StackValue { index: 1 },
                ty: fc.cx.ts.function(function).prototype.param(0),
            });
            statements.push(fc.prog.alloc_stmt(ProgStmt::InitParent {
                constructor: ctor,
                args: vec![other],
            }));
        }
        let members = fc.cx.ts.class(class).data_members.clone();
        let offset = fc.cx.ts.class(class).attributes_offset;
        for (i, member) in members.iter().enumerate() {
            // Each member must be copyable.
            if member.ty.is_object() {
                let member_class = fc.cx.ts.class_of(member.ty).expect("object member");
                if !fc.cx.ts.is_copy_constructible(member_class) {
                    return Err(CompileError::new(
                        ErrorCode::DataMemberIsNotCopyable,
                        format!(
                            "data member '{}' is not copyable",
                            fc.cx.interner.resolve(member.name)
                        ),
                        span,
                    ));
                }
            }
            let other = fc.prog.alloc_expr(ProgExpr {
                kind: ProgExprKind::StackValue { index: 1 },
                ty: fc.cx.ts.function(function).prototype.param(0),
            });
            let access = fc.prog.alloc_expr(ProgExpr {
                kind: ProgExprKind::MemberAccess {
                    object: other,
                    index: (offset + i) as u16,
                },
                ty: Type::cref(member.ty),
            });
            let copied = fc.prog.alloc_expr(ProgExpr {
                kind: ProgExprKind::Copy { arg: access },
                ty: member.ty.base_type(),
            });
            statements.push(fc.prog.alloc_stmt(ProgStmt::InitMember {
                index: (offset + i) as u16,
                init: copied,
            }));
        }
    } else if is_dtor {
        fc.destructor_epilogue_for_defaulted(function, &mut statements);
    }

    fc.stack.leave_block();
    let root = fc.prog.alloc_stmt(ProgStmt::Compound(statements));
    Ok(CompiledBody {
        arena: std::mem::take(&mut fc.prog),
        root: Some(root),
    })
}

// Used only by synthesize_defaulted_body; lives here to keep the
// defaulted logic in one place.
impl FunctionCompiler<'_, '_> {
    fn destructor_epilogue_for_defaulted(
        &mut self,
        function: FunctionId,
        out: &mut Vec<script_ir::ProgStmtId>,
    ) {
        // Same epilogue a written destructor gets.
        let class = self
            .cx
            .ts
            .function(function)
            .member_of()
            .expect("destructors are members");
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
    }
}
