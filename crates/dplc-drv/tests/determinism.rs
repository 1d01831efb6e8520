//! Determinism property: `compile` is a pure function of its input.

use dplc_drv::compile;
use proptest::prelude::*;

proptest! {
    /// Arbitrary input (mostly garbage) never panics and always
    /// compiles to the same result.
    #[test]
    fn prop_compile_is_deterministic(source in "\\PC{0,200}") {
        let first = compile(&source);
        let second = compile(&source);
        prop_assert_eq!(first.files, second.files);
        prop_assert_eq!(first.diagnostics, second.diagnostics);
    }

    /// Structured input stays deterministic too: vary the namespace,
    /// a global value, and a say payload.
    #[test]
    fn prop_structured_compile_is_deterministic(
        ns in "[a-z][a-z0-9_]{0,8}",
        value in -1000i32..1000,
        message in "[ -~&&[^\"\\\\{}$]]{0,20}",
    ) {
        let source = format!(
            "pack \"t\" namespace {} {{ global int x = {} func Load() {{ Say(\"{}\") x += 1; }} }}",
            ns, value, message
        );
        let first = compile(&source);
        let second = compile(&source);
        prop_assert_eq!(&first.files, &second.files);
        prop_assert!(!first.has_errors());
        prop_assert!(
            first
                .files
                .iter()
                .any(|f| f.path == format!("data/{}/function/load.mcfunction", ns)),
            "expected load.mcfunction for namespace {}",
            ns
        );
    }
}
