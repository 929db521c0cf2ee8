//! The built-in `Array<T>` class template.
//!
//! Instantiating `Array<T>` builds the class and installs its members:
//! default/copy/size constructors, the destructor, `size`, `resize`,
//! assignment, and the two subscript overloads. Bodies are native; only
//! the signatures matter to the front end.

use script_ir::ast::OperatorId;
use script_ir::{ClassId, NamespaceId, StringInterner, Type};

use crate::function::{FunctionDef, FunctionFlags, FunctionVariant, NativeTag};
use crate::prototype::Prototype;
use crate::scope::SymbolRef;
use crate::type_system::TypeSystem;

/// Build the `Array<element>` class. The caller caches the result in the
/// template's instantiation table.
pub fn instantiate_array(ts: &mut TypeSystem, element: Type, interner: &StringInterner) -> ClassId {
    let name = interner.intern("Array");
    let class = ts.register_class(name, NamespaceId::ROOT);
    let array_ty = ts.class(class).ty;

    let this = Prototype::this_param(array_ty, false);
    let const_this = Prototype::this_param(array_ty, true);
    let owner = SymbolRef::Class(class);

    // Array<T>(); constructor prototypes list declared parameters only.
    let default_ctor = ts.make_native_fn(
        FunctionVariant::Constructor,
        FunctionFlags::default(),
        Prototype::new(Type::cref(array_ty), Vec::new()),
        owner,
        NativeTag::ArrayDefaultCtor,
    );
    // Array<T>(const Array<T>& other);
    let copy_ctor = ts.make_native_fn(
        FunctionVariant::Constructor,
        FunctionFlags::default(),
        Prototype::new(Type::cref(array_ty), vec![Type::cref(array_ty)]),
        owner,
        NativeTag::ArrayCopyCtor,
    );
    // Array<T>(const int& size); explicit, so `Array<int> a = 4` fails.
    let size_ctor = ts.make_native_fn(
        FunctionVariant::Constructor,
        FunctionFlags::EXPLICIT,
        Prototype::new(Type::cref(array_ty), vec![Type::cref(Type::INT)]),
        owner,
        NativeTag::ArraySizeCtor,
    );
    // ~Array<T>();
    let dtor = ts.make_native_fn(
        FunctionVariant::Destructor,
        FunctionFlags::default(),
        Prototype::new(Type::VOID, vec![this]),
        owner,
        NativeTag::ArrayDtor,
    );
    // int size() const;
    let size = ts.make_native_fn(
        FunctionVariant::Regular {
            name: interner.intern("size"),
        },
        FunctionFlags::default(),
        Prototype::new(Type::INT, vec![const_this]),
        owner,
        NativeTag::ArraySize,
    );
    // void resize(const int& newSize);
    let resize = ts.make_native_fn(
        FunctionVariant::Regular {
            name: interner.intern("resize"),
        },
        FunctionFlags::default(),
        Prototype::new(Type::VOID, vec![this, Type::cref(Type::INT)]),
        owner,
        NativeTag::ArrayResize,
    );
    // Array<T>& operator=(const Array<T>& other);
    let assign = ts.make_native_fn(
        FunctionVariant::Operator {
            op: OperatorId::Assignment,
        },
        FunctionFlags::default(),
        Prototype::new(
            Type::make_ref(array_ty),
            vec![this, Type::cref(array_ty)],
        ),
        owner,
        NativeTag::ArrayAssign,
    );
    // T& operator[](const int& index);
    let subscript = ts.make_native_fn(
        FunctionVariant::Operator {
            op: OperatorId::Subscript,
        },
        FunctionFlags::default(),
        Prototype::new(
            Type::make_ref(element),
            vec![this, Type::cref(Type::INT)],
        ),
        owner,
        NativeTag::ArraySubscript,
    );
    // const T& operator[](const int& index) const;
    let subscript_const = ts.make_native_fn(
        FunctionVariant::Operator {
            op: OperatorId::Subscript,
        },
        FunctionFlags::default(),
        Prototype::new(Type::cref(element), vec![const_this, Type::cref(Type::INT)]),
        owner,
        NativeTag::ArraySubscriptConst,
    );

    let def = ts.class_mut(class);
    def.constructors = vec![default_ctor, copy_ctor, size_ctor];
    def.destructor = Some(dtor);
    def.methods = vec![size, resize];
    def.operators = vec![assign, subscript, subscript_const];

    class
}

#[cfg(test)]
mod tests;
