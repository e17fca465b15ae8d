//! Names exported by the builtin module.
//!
//! Every builtin is a pipe receiver: it takes one bundle and returns a value
//! or a bundle. Unqualified names that are neither parameters nor bindings
//! fall back to this set.

/// Builtin operation names, in the order the builtin module defines them.
pub const STD_BUILTINS: &[&str] = &[
    // arithmetic
    "Add",
    "Subtract",
    "Multiply",
    "Divide",
    "Pow",
    "Sqrt",
    "Sin",
    "Cos",
    "Tan",
    // console
    "Println",
    "Printf",
    "In",
    // sequences
    "Extract",
    "ElementAt",
    "Slice",
    "Take",
    "Drop",
    "Length",
    "ToNum",
    // bundles
    "Wrap",
    "Unwrap",
    "GetArgs",
];

/// Check whether `name` is a builtin.
pub fn is_builtin(name: &str) -> bool {
    STD_BUILTINS.contains(&name)
}
