//! Condition lowering: execute-guard fragments and DNF expansion.
//!
//! A condition becomes a list of variants, each one conjunction of
//! guard fragments; the generator materializes every variant as one
//! guarded invocation, which is what preserves short-circuit `||`
//! semantics in the command runtime.
//!
//! Expansion laws:
//! - `variants(A && B)` = cartesian product, element-wise concatenated
//! - `variants(A || B)` = union
//!
//! Negation distributes by De Morgan at recursion time and flips
//! `if`/`unless` on the leaves.

use dplc_par::{BoolOp, CmpOp, Cond};

use crate::files::EmitBuf;
use crate::{PackCtx, Scope};

impl<'a> PackCtx<'a> {
    /// Expand a condition into guard-fragment variants.
    ///
    /// Side-evaluation commands for comparisons are appended to `buf`
    /// and must precede any command the variants guard. A null
    /// condition (parse recovery) yields the single empty variant,
    /// i.e. always true.
    pub(crate) fn cond_variants(
        &mut self,
        cond: Option<&Cond>,
        negated: bool,
        scope: &Scope,
        buf: &mut EmitBuf,
    ) -> Vec<Vec<String>> {
        let Some(cond) = cond else {
            return vec![vec![]];
        };

        match cond {
            Cond::Raw(raw, _) => {
                let word = if negated { "unless" } else { "if" };
                vec![vec![format!("{} {}", word, raw)]]
            },

            Cond::Compare { op, lhs, rhs, .. } => {
                let left = self.lower_expr(lhs, scope, buf);
                let right = self.lower_expr(rhs, scope, buf);
                let (Some(left), Some(right)) = (left, right) else {
                    // error already reported; treat as always true
                    return vec![vec![]];
                };
                vec![vec![compare_fragment(*op, &left, &right, negated)]]
            },

            Cond::Bool { op, lhs, rhs } => {
                let effective = match (op, negated) {
                    (BoolOp::And, false) | (BoolOp::Or, true) => BoolOp::And,
                    (BoolOp::Or, false) | (BoolOp::And, true) => BoolOp::Or,
                };
                let left = self.cond_variants(Some(lhs), negated, scope, buf);
                let right = self.cond_variants(Some(rhs), negated, scope, buf);

                match effective {
                    BoolOp::And => {
                        let mut product = Vec::with_capacity(left.len() * right.len());
                        for l in &left {
                            for r in &right {
                                let mut clause = l.clone();
                                clause.extend(r.iter().cloned());
                                product.push(clause);
                            }
                        }
                        product
                    },
                    BoolOp::Or => {
                        let mut union = left;
                        union.extend(right);
                        union
                    },
                }
            },
        }
    }
}

/// Render one comparison as an execute-guard fragment.
///
/// `==` translates to `=`; `!=` has no scoreboard spelling and becomes
/// an `unless =` guard. Negation flips the `if`/`unless` word.
fn compare_fragment(op: CmpOp, left: &str, right: &str, negated: bool) -> String {
    let (word, score_op) = match op {
        CmpOp::Eq => (!negated, "="),
        CmpOp::Ne => (negated, "="),
        CmpOp::Lt => (!negated, "<"),
        CmpOp::Le => (!negated, "<="),
        CmpOp::Gt => (!negated, ">"),
        CmpOp::Ge => (!negated, ">="),
    };
    format!(
        "{} score {} vars {} {} vars",
        if word { "if" } else { "unless" },
        left,
        score_op,
        right
    )
}

/// Build the execute prefix for one variant, with optional extra
/// leading fragments (e.g. the if-chain flag guard).
pub(crate) fn guard_prefix(fragments: &[String]) -> String {
    if fragments.is_empty() {
        String::new()
    } else {
        format!("execute {} run ", fragments.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileSet, PackCtx};
    use dplc_util::Handler;

    fn variants_of(cond_text: &str, negated: bool) -> Vec<Vec<String>> {
        let source = format!(
            "pack \"p\" namespace n {{ int a = 0 int b = 0 int c = 0 func F() {{ if({}) {{ }} }} }}",
            cond_text
        );
        let handler = Handler::new();
        let tokens = dplc_lex::lex(&source, &handler);
        let script = dplc_par::parse(tokens, &handler).expect("no AST");
        let dplc_par::Stmt::If(if_stmt) = &script[0].functions[0].body[0] else {
            panic!("expected if");
        };

        let mut files = FileSet::new();
        let mut ctx = PackCtx::new(&script[0], &script, &handler, &mut files);
        let scope = Scope {
            fn_name: "f".to_string(),
            locals: Default::default(),
        };
        let mut buf = EmitBuf::new();
        ctx.cond_variants(if_stmt.cond.as_ref(), negated, &scope, &mut buf)
    }

    #[test]
    fn test_null_condition_is_always_true() {
        let handler = Handler::new();
        let script = Vec::new();
        let pack_src = "pack \"p\" namespace n { }";
        let tokens = dplc_lex::lex(pack_src, &handler);
        let parsed = dplc_par::parse(tokens, &handler).unwrap();
        let mut files = FileSet::new();
        let mut ctx = PackCtx::new(&parsed[0], &script, &handler, &mut files);
        let scope = Scope::default();
        let mut buf = EmitBuf::new();
        assert_eq!(
            ctx.cond_variants(None, false, &scope, &mut buf),
            vec![Vec::<String>::new()]
        );
    }

    #[test]
    fn test_single_compare() {
        let variants = variants_of("a == 1", false);
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0], vec!["if score __tmp0 vars = __tmp1 vars"]);
    }

    #[test]
    fn test_not_equal_uses_unless() {
        let variants = variants_of("a != 1", false);
        assert_eq!(variants[0], vec!["unless score __tmp0 vars = __tmp1 vars"]);
    }

    #[test]
    fn test_negated_relational_flips_word() {
        let variants = variants_of("a < 1", true);
        assert_eq!(variants[0], vec!["unless score __tmp0 vars < __tmp1 vars"]);
    }

    #[test]
    fn test_and_is_cartesian() {
        let variants = variants_of("a == 1 && b == 2", false);
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].len(), 2);
    }

    #[test]
    fn test_or_is_union() {
        let variants = variants_of("a == 1 || b == 2", false);
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].len(), 1);
        assert_eq!(variants[1].len(), 1);
    }

    #[test]
    fn test_or_of_ands_expands() {
        // (a && b) || c  ->  two variants: [a,b] and [c]
        let variants = variants_of("a == 1 && b == 2 || c == 3", false);
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].len(), 2);
        assert_eq!(variants[1].len(), 1);
    }

    #[test]
    fn test_and_over_or_distributes() {
        // A && (B || C) -> [A,B] and [A,C]; built directly since the
        // surface grammar has no condition parentheses
        use dplc_util::Span;
        let cond = Cond::Bool {
            op: BoolOp::And,
            lhs: Box::new(Cond::Raw("a".to_string(), Span::DUMMY)),
            rhs: Box::new(Cond::Bool {
                op: BoolOp::Or,
                lhs: Box::new(Cond::Raw("b".to_string(), Span::DUMMY)),
                rhs: Box::new(Cond::Raw("c".to_string(), Span::DUMMY)),
            }),
        };

        let handler = Handler::new();
        let tokens = dplc_lex::lex("pack \"p\" namespace n { }", &handler);
        let script = dplc_par::parse(tokens, &handler).unwrap();
        let mut files = FileSet::new();
        let mut ctx = PackCtx::new(&script[0], &script, &handler, &mut files);
        let scope = Scope::default();
        let mut buf = EmitBuf::new();

        let variants = ctx.cond_variants(Some(&cond), false, &scope, &mut buf);
        assert_eq!(
            variants,
            vec![
                vec!["if a".to_string(), "if b".to_string()],
                vec!["if a".to_string(), "if c".to_string()],
            ]
        );
    }

    #[test]
    fn test_de_morgan_negation() {
        // not (A || B) = not A && not B  ->  one variant with both
        let variants = variants_of("a == 1 || b == 2", true);
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].len(), 2);
        assert!(variants[0][0].starts_with("unless"));
        assert!(variants[0][1].starts_with("unless"));
    }

    #[test]
    fn test_raw_condition_verbatim() {
        let variants = variants_of("\"entity @e[type=cow]\"", false);
        assert_eq!(variants[0], vec!["if entity @e[type=cow]"]);
    }

    #[test]
    fn test_guard_prefix() {
        assert_eq!(guard_prefix(&[]), "");
        assert_eq!(
            guard_prefix(&["if score a vars = b vars".to_string()]),
            "execute if score a vars = b vars run "
        );
    }
}
