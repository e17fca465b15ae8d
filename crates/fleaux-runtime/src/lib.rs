//! Fleaux reference runtime.
//!
//! Evaluates the IR produced by `fleaux-compiler` without a Python host.
//! It implements the builtin capability set ([`Builtin`]) with Python value
//! semantics, so for most programs the output matches what the emitted
//! Python prints. Known differences:
//!
//! - `Wrap` packs the bundle it receives. The Python `Wrap` receives a
//!   bundle that was already wrapped once more, so `(4) -> Wrap` gives
//!   `(4,)` here and `((4,),)` there.
//! - `GetArgs` is an ordinary receiver here. The Python class only defines
//!   `__call__`, so piping into it fails there.
//! - Integral numerals outside `i64` evaluate as the nearest float, and
//!   sequence repetition is capped at [`ops::MAX_REPEAT_LEN`] elements.
//!
//! # Example
//!
//! ```
//! use fleaux_compiler::{CompilerOptions, MemoryLoader, Session};
//! use fleaux_runtime::{Bundle, Console, Interpreter, Value};
//!
//! let loader = MemoryLoader::new().with("Main", "let F(x: Number): Number :: (x, 5) -> Pow;");
//! let mut session = Session::new(CompilerOptions::default(), Box::new(loader));
//! let generated = session.compile_root("Main").unwrap();
//!
//! let (console, _) = Console::captured("");
//! let mut interp = Interpreter::new(console);
//! interp.run(session.modules()).unwrap();
//!
//! let result = interp.call(&generated, "F", Bundle::new(vec![Value::Int(2)])).unwrap();
//! assert_eq!(result, Value::Int(32));
//! ```

mod builtins;
mod console;
mod interpreter;
pub mod ops;
mod receiver;
mod value;

pub use builtins::Builtin;
pub use console::{CapturedOutput, Console};
pub use interpreter::{EVAL_STACK_SIZE, Interpreter, MAX_CALL_DEPTH};
pub use receiver::{PipeReceiver, UnitHandle};
pub use value::{Bundle, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use fleaux_compiler::{CompilerOptions, MemoryLoader, Session};
    use fleaux_core::RuntimeError;

    fn compile(modules: &[(&str, &str)]) -> Session {
        let mut loader = MemoryLoader::new();
        for (name, source) in modules {
            loader.insert(*name, *source);
        }
        let mut session = Session::new(CompilerOptions::default(), Box::new(loader));
        session.compile_root(modules[0].0).unwrap();
        session
    }

    /// Run the root module with `input` on stdin; return printed lines.
    fn run(modules: &[(&str, &str)], input: &str) -> Result<Vec<String>, RuntimeError> {
        let session = compile(modules);
        let (console, output) = Console::captured(input);
        let mut interp = Interpreter::new(console);
        interp.run(session.modules())?;
        Ok(output.lines())
    }

    #[test]
    fn pow_unit_round_trip() {
        let session = compile(&[("Main", "let F(x: Number): Number :: (x, 5) -> Pow;")]);
        let (console, _) = Console::captured("");
        let mut interp = Interpreter::new(console);
        interp.run(session.modules()).unwrap();

        let v = interp
            .call("fleaux_generated_module_Main", "F", Bundle::new(vec![Value::Int(2)]))
            .unwrap();
        assert_eq!(v, Value::Int(32));
        assert!(matches!(v, Value::Float(_)));
    }

    #[test]
    fn pipelines_print() {
        let lines = run(
            &[(
                "Main",
                "let Double(x: Number): Number :: (x, 2) -> Multiply;\n\
                 (21) -> Double -> Println;\n\
                 (1, \"two\", 3.5) -> Println;\n\
                 (\"sum {}\", 1, 2) -> Printf;",
            )],
            "",
        )
        .unwrap();
        assert_eq!(lines, vec!["42", "1 two 3.5", "sum (1, 2)"]);
    }

    #[test]
    fn imports_across_modules() {
        let lines = run(
            &[
                ("Main", "import Geometry;\n(3) -> Geometry.Square -> Println;"),
                ("Geometry", "let Square(x: Number): Number :: (x, 2) -> Pow;"),
            ],
            "",
        )
        .unwrap();
        assert_eq!(lines, vec!["9.0"]);
    }

    #[test]
    fn reads_input() {
        let lines = run(
            &[(
                "Main",
                "let Twice(s: String): Number :: ((s) -> ToNum, 2) -> Multiply;\n\
                 (1) -> In -> Unwrap -> Twice -> Println;",
            )],
            "21\n",
        )
        .unwrap();
        assert_eq!(lines, vec!["42"]);
    }

    #[test]
    fn later_let_shadows_earlier() {
        let lines = run(
            &[(
                "Main",
                "let F(x: Number): Number :: x + 1;\n\
                 let G(x: Number): Number :: (x) -> F;\n\
                 (1) -> G -> Println;\n\
                 let F(x: Number): Number :: x + 100;\n\
                 (1) -> G -> Println;",
            )],
            "",
        )
        .unwrap();
        assert_eq!(lines, vec!["2", "101"]);
    }

    #[test]
    fn recursion_with_short_circuit() {
        let lines = run(
            &[(
                "Main",
                "let Fact(n: Number): Number :: (n <= 1) && 1 || n * ((n - 1) -> Fact);\n\
                 (5) -> Fact -> Println;",
            )],
            "",
        )
        .unwrap();
        assert_eq!(lines, vec!["120"]);
    }

    #[test]
    fn arity_mismatch_surfaces_at_runtime() {
        let err = run(
            &[(
                "Main",
                "let F(a: Number, b: Number): Number :: a + b;\n(1) -> F;",
            )],
            "",
        )
        .unwrap_err();
        assert_eq!(
            err,
            RuntimeError::ArityMismatch {
                receiver: "F".into(),
                expected: "2".into(),
                got: 1,
            }
        );
    }

    #[test]
    fn recursion_near_the_default_limit() {
        let countdown = "let Down(n: Number): Number :: (n > 0) && ((n - 1) -> Down) + 1 || 0;\n";
        let source = format!("{countdown}(990) -> Down -> Println;");
        let lines = run(&[("Main", source.as_str())], "").unwrap();
        assert_eq!(lines, vec!["990"]);

        let source = format!("{countdown}(5000) -> Down;");
        let err = run(&[("Main", source.as_str())], "").unwrap_err();
        assert_eq!(err, RuntimeError::CallDepthExceeded { limit: MAX_CALL_DEPTH });
    }

    #[test]
    fn huge_integer_literal_evaluates_as_float() {
        let lines = run(&[("Main", "(99999999999999999999) -> Println;")], "").unwrap();
        assert_eq!(lines, vec!["1e+20"]);
    }

    #[test]
    fn oversized_repetition_is_an_error() {
        let err = run(&[("Main", "(\"ab\", 9223372036854775807) -> Multiply;")], "").unwrap_err();
        assert!(matches!(err, RuntimeError::RepetitionTooLarge { len: 2, .. }));
    }

    #[test]
    fn unbounded_recursion_is_an_error() {
        let session = compile(&[("Main", "let Loop(x: Number): Number :: (x) -> Loop;\n(1) -> Loop;")]);
        let (console, _) = Console::captured("");
        let mut interp = Interpreter::new(console).with_max_depth(64);
        let err = interp.run(session.modules()).unwrap_err();
        assert_eq!(err, RuntimeError::CallDepthExceeded { limit: 64 });
    }
}
