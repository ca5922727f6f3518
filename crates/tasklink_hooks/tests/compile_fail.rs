//! Compile-fail tests for `#[task_hooks]` argument and signature validation.

#[test]
fn compile_fail() {
    let t = trybuild::TestCases::new();
    t.compile_fail("tests/compile_fail/*.rs");
}
