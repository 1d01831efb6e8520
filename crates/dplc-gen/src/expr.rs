//! Numeric expression lowering.
//!
//! A recursive single-result emitter: each expression is lowered to a
//! fresh temporary score that the emitted commands populate. Binary
//! operations lower both sides, fold the right into the left with a
//! scoreboard operation, then copy into the result temporary.

use dplc_par::{BinOp, Expr, VarKind};

use crate::files::EmitBuf;
use crate::names::{format_number, storage_ref};
use crate::{PackCtx, Scope};

impl<'a> PackCtx<'a> {
    /// Lower `expr` to a fresh temporary score and return its name.
    ///
    /// Returns `None` after reporting an error; callers skip the
    /// dependent emission.
    pub(crate) fn lower_expr(
        &mut self,
        expr: &Expr,
        scope: &Scope,
        buf: &mut EmitBuf,
    ) -> Option<String> {
        match expr {
            Expr::Number(value, _) => {
                let tmp = buf.fresh_tmp();
                // literal numbers truncate to integers
                buf.push(format!(
                    "scoreboard players set {} vars {}",
                    tmp, *value as i64
                ));
                Some(tmp)
            },

            Expr::Str(_, span) => {
                self.handler
                    .error("string literal is not valid in numeric context", *span);
                None
            },

            Expr::Var(name, span) => {
                let Some(var) = self.resolve_var(scope, name) else {
                    self.handler
                        .error(format!("unknown variable '{}'", name), *span);
                    return None;
                };
                if var.ty.array {
                    self.handler.error(
                        format!("array variable '{}' is not valid in numeric context", name),
                        *span,
                    );
                    return None;
                }

                let tmp = buf.fresh_tmp();
                match var.ty.kind {
                    VarKind::Int | VarKind::Bool => {
                        buf.push(format!(
                            "scoreboard players operation {} vars = {} vars",
                            tmp, var.score
                        ));
                    },
                    VarKind::Float | VarKind::Double => {
                        // integer-truncated read into the scoreboard
                        buf.push(format!(
                            "execute store result score {} vars run data get storage {} {} 1",
                            tmp,
                            storage_ref(&self.ns),
                            var.storage
                        ));
                    },
                    VarKind::Str | VarKind::Ent => {
                        self.handler.error(
                            format!("variable '{}' is not numeric", name),
                            *span,
                        );
                        return None;
                    },
                }
                Some(tmp)
            },

            Expr::Binary { op, lhs, rhs, .. } => {
                let left = self.lower_expr(lhs, scope, buf)?;
                let right = self.lower_expr(rhs, scope, buf)?;
                buf.push(format!(
                    "scoreboard players operation {} vars {} {} vars",
                    left,
                    op.score_op(),
                    right
                ));
                let tmp = buf.fresh_tmp();
                buf.push(format!(
                    "scoreboard players operation {} vars = {} vars",
                    tmp, left
                ));
                Some(tmp)
            },

            Expr::Call { .. } => self.lower_call(expr, scope, buf),

            Expr::Member { object, name, span } => {
                if matches!(&**object, Expr::Var(obj, _) if obj == "Math") && name == "PI" {
                    self.handler.info("Math.PI collapsed to 3", *span);
                    let tmp = buf.fresh_tmp();
                    buf.push(format!("scoreboard players set {} vars 3", tmp));
                    return Some(tmp);
                }
                self.handler.error(
                    format!("unsupported member access '.{}' in numeric context", name),
                    *span,
                );
                None
            },

            Expr::Array(_, span) => {
                self.handler
                    .error("array literal is not valid in numeric context", *span);
                None
            },
        }
    }

    /// Lower the supported call forms.
    fn lower_call(&mut self, expr: &Expr, scope: &Scope, buf: &mut EmitBuf) -> Option<String> {
        let Expr::Call {
            target,
            name,
            args,
            span,
        } = expr
        else {
            unreachable!("lower_call on non-call expression");
        };

        match (target.as_deref(), name.as_str()) {
            (Some("Random"), "value") => {
                let (min, max) = match (args.first(), args.get(1)) {
                    (Some(Expr::Number(min, _)), Some(Expr::Number(max, _))) => {
                        (*min as i64, *max as i64)
                    },
                    _ => {
                        self.handler.warning(
                            "non-literal Random.value bounds default to 0..100",
                            *span,
                        );
                        (0, 100)
                    },
                };
                let tmp = buf.fresh_tmp();
                buf.push(format!(
                    "execute store result score {} vars run random value {}..{}",
                    tmp, min, max
                ));
                Some(tmp)
            },

            (Some("Math"), "Min") | (Some("Math"), "Max") => {
                let (Some(first), Some(second)) = (args.first(), args.get(1)) else {
                    self.handler
                        .error(format!("Math.{} expects two arguments", name), *span);
                    return None;
                };
                let left = self.lower_expr(first, scope, buf)?;
                let right = self.lower_expr(second, scope, buf)?;
                let tmp = buf.fresh_tmp();
                buf.push(format!(
                    "scoreboard players operation {} vars = {} vars",
                    tmp, left
                ));
                let cmp = if name == "Min" { "<" } else { ">" };
                buf.push(format!(
                    "execute if score {} vars {} {} vars run scoreboard players operation {} vars = {} vars",
                    right, cmp, tmp, tmp, right
                ));
                Some(tmp)
            },

            (Some("Math"), "Pow") => {
                let Some(base) = args.first() else {
                    self.handler.error("Math.Pow expects two arguments", *span);
                    return None;
                };
                let exponent = match args.get(1) {
                    Some(Expr::Number(k, _)) => {
                        let k = *k as i64;
                        if !(0..=10).contains(&k) {
                            self.handler.warning(
                                "Math.Pow exponent outside 0..10 is clamped",
                                *span,
                            );
                        }
                        k.clamp(0, 10)
                    },
                    _ => {
                        self.handler
                            .warning("non-literal Math.Pow exponent defaults to 1", *span);
                        1
                    },
                };

                let base_score = self.lower_expr(base, scope, buf)?;
                let tmp = buf.fresh_tmp();
                buf.push(format!("scoreboard players set {} vars 1", tmp));
                // unrolled multiplication
                for _ in 0..exponent {
                    buf.push(format!(
                        "scoreboard players operation {} vars *= {} vars",
                        tmp, base_score
                    ));
                }
                Some(tmp)
            },

            (Some("Math"), "Root") => {
                let Some(operand) = args.first() else {
                    self.handler.error("Math.Root expects two arguments", *span);
                    return None;
                };
                let degree = match args.get(1) {
                    Some(Expr::Number(k, _)) if (*k as i64) >= 1 => *k as u32,
                    Some(Expr::Number(_, _)) | None => {
                        self.handler
                            .warning("Math.Root degree defaults to 2", *span);
                        2
                    },
                    Some(_) => {
                        self.handler
                            .warning("non-literal Math.Root degree defaults to 2", *span);
                        2
                    },
                };

                let operand_score = self.lower_expr(operand, scope, buf)?;
                let tmp = buf.fresh_tmp();
                buf.push(format!("scoreboard players set {} vars 0", tmp));
                // linear search: the largest r in 0..=100 with r^k <= n
                for root in 0..=100i64 {
                    let Some(power) = root.checked_pow(degree) else {
                        break;
                    };
                    if power > i32::MAX as i64 {
                        break;
                    }
                    buf.push(format!(
                        "execute if score {} vars matches {}.. run scoreboard players set {} vars {}",
                        operand_score, power, tmp, root
                    ));
                }
                Some(tmp)
            },

            (None, "GetData") => {
                // Ent.Get(<selector>).GetData(<field>)
                let (Some(object), Some(field)) = (args.first(), args.get(1)) else {
                    self.handler.error("GetData expects a field name", *span);
                    return None;
                };
                let Some(selector) = entity_selector(object) else {
                    self.handler.error(
                        "GetData is only supported on Ent.Get(…) receivers",
                        *span,
                    );
                    return None;
                };
                let Expr::Str(field, _) = field else {
                    self.handler
                        .error("GetData expects a literal field name", *span);
                    return None;
                };

                let tmp = buf.fresh_tmp();
                buf.push(format!(
                    "execute as {} store result score {} vars run data get entity @s {} 1",
                    selector, tmp, field
                ));
                Some(tmp)
            },

            (Some("Ent"), "Get") => {
                self.handler.error(
                    "Ent.Get(…) is only valid as an Ent assignment or GetData receiver",
                    *span,
                );
                None
            },

            _ => {
                let full = match target {
                    Some(target) => format!("{}.{}", target, name),
                    None => name.clone(),
                };
                self.handler.error(
                    format!("unknown function '{}' in expression", full),
                    *span,
                );
                None
            },
        }
    }

    /// Fold an expression to a compile-time string, when every leaf is
    /// a literal. Static concatenations fold; anything else does not.
    pub(crate) fn fold_static_string(&self, expr: &Expr) -> Option<String> {
        match expr {
            Expr::Str(value, _) => Some(value.clone()),
            Expr::Number(value, _) => Some(format_number(*value)),
            Expr::Binary {
                op: BinOp::Add,
                lhs,
                rhs,
                ..
            } => {
                let mut folded = self.fold_static_string(lhs)?;
                folded.push_str(&self.fold_static_string(rhs)?);
                Some(folded)
            },
            _ => None,
        }
    }
}

/// Extract and normalize the selector from an `Ent.Get("…")` call.
pub(crate) fn entity_selector(expr: &Expr) -> Option<String> {
    let Expr::Call {
        target: Some(target),
        name,
        args,
        ..
    } = expr
    else {
        return None;
    };
    if target != "Ent" || name != "Get" {
        return None;
    }
    let Some(Expr::Str(selector, _)) = args.first() else {
        return None;
    };
    Some(normalize_selector(selector))
}

/// Wrap a non-selector string in a nearest-entity selector.
pub(crate) fn normalize_selector(selector: &str) -> String {
    if selector.starts_with('@') {
        selector.to_string()
    } else {
        format!("@e[limit=1, {}]", selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{compile_files, file};

    fn init_of(source_body: &str) -> String {
        let source = format!("pack \"p\" namespace n {{ {} }}", source_body);
        let (files, handler) = compile_files(&source);
        assert!(
            !handler.has_errors(),
            "generation errors: {:?}",
            handler.diagnostics()
        );
        file(&files, "data/n/function/__init.mcfunction").to_string()
    }

    #[test]
    fn test_literal_global_init() {
        let init = init_of("global int x = 5");
        assert!(init.contains("scoreboard players set __tmp0 vars 5"));
        assert!(init.contains("scoreboard players operation _n.x vars = __tmp0 vars"));
    }

    #[test]
    fn test_binary_lowering_shape() {
        let init = init_of("global int x = 1 + 2 * 3");
        // multiplication folds into its left temp, then addition, then
        // the final copy
        assert!(init.contains("scoreboard players operation __tmp1 vars *= __tmp2 vars"));
        assert!(init.contains("scoreboard players operation __tmp0 vars += __tmp3 vars"));
    }

    #[test]
    fn test_float_read_truncates() {
        let init = init_of("global double d = 2.5 global int x = d + 1");
        assert!(init.contains(
            "execute store result score __tmp0 vars run data get storage n:variables d 1"
        ));
    }

    #[test]
    fn test_random_literal_bounds() {
        let init = init_of("global int x = Random.value(1, 6)");
        assert!(init.contains("run random value 1..6"));
    }

    #[test]
    fn test_random_nonliteral_bounds_warn() {
        let source = "pack \"p\" namespace n { global int a = 1 global int x = Random.value(a, 6) }";
        let (files, handler) = compile_files(source);
        assert_eq!(handler.warning_count(), 1);
        let init = file(&files, "data/n/function/__init.mcfunction");
        assert!(init.contains("run random value 0..100"));
    }

    #[test]
    fn test_math_min_conditional_copy() {
        let init = init_of("global int x = Math.Min(3, 7)");
        assert!(init.contains("execute if score __tmp1 vars < __tmp2 vars run scoreboard players operation __tmp2 vars = __tmp1 vars"));
    }

    #[test]
    fn test_math_pow_unrolls() {
        let init = init_of("global int x = Math.Pow(2, 3)");
        let multiplies = init
            .lines()
            .filter(|l| l.contains("*= __tmp0 vars"))
            .count();
        assert_eq!(multiplies, 3);
    }

    #[test]
    fn test_math_root_linear_search() {
        let init = init_of("global int x = Math.Root(17, 2)");
        assert!(init.contains("scoreboard players set __tmp1 vars 0"));
        assert!(init.contains("matches 16.. run scoreboard players set __tmp1 vars 4"));
        assert!(init.contains("matches 10000.. run scoreboard players set __tmp1 vars 100"));
    }

    #[test]
    fn test_math_pi_info() {
        let source = "pack \"p\" namespace n { global int x = Math.PI }";
        let (files, handler) = compile_files(source);
        assert!(!handler.has_errors());
        assert_eq!(
            handler
                .diagnostics()
                .iter()
                .filter(|d| d.severity == dplc_util::Severity::Info)
                .count(),
            1
        );
        let init = file(&files, "data/n/function/__init.mcfunction");
        assert!(init.contains("scoreboard players set __tmp0 vars 3"));
    }

    #[test]
    fn test_ent_getdata_chain() {
        let init = init_of(
            "global int hp = Ent.Get(\"type=cow\").GetData(\"Health\")",
        );
        assert!(init.contains(
            "execute as @e[limit=1, type=cow] store result score __tmp0 vars run data get entity @s Health 1"
        ));
    }

    #[test]
    fn test_string_in_numeric_context_errors() {
        let source = "pack \"p\" namespace n { global int x = \"oops\" }";
        let (_, handler) = compile_files(source);
        assert!(handler.has_errors());
    }

    #[test]
    fn test_normalize_selector() {
        assert_eq!(normalize_selector("@a"), "@a");
        assert_eq!(normalize_selector("type=cow"), "@e[limit=1, type=cow]");
    }
}
