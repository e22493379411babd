//! The literal rewrite pass.
//!
//! Rewrites every numeric literal node in a parsed tree into its
//! exact-rational constant. Literals never evaluate as native numeric types,
//! which guarantees that all downstream arithmetic is exact.

use crate::grammar::*;
use crate::math::Rational;

/// Rewrites [Number](Expr::Number) nodes to [Const](Expr::Const) nodes
/// throughout `expr`.
pub(crate) fn rewrite_literals(expr: Expr) -> Expr {
    use Expr::*;
    match expr {
        // The scanner only produces digits[.digits] lexemes, so the
        // conversion cannot fail.
        Number(raw) => Const(Rational::from_decimal_str(&raw).unwrap()),
        Const(konst) => Const(konst),
        Bool(b) => Bool(b),
        Var(var) => Var(var),
        UnaryExpr(unary_expr) => UnaryExpr(crate::grammar::UnaryExpr {
            op: unary_expr.op,
            rhs: rewrite_boxed(unary_expr.rhs),
        }),
        BinaryExpr(binary_expr) => BinaryExpr(crate::grammar::BinaryExpr {
            op: binary_expr.op,
            lhs: rewrite_boxed(binary_expr.lhs),
            rhs: rewrite_boxed(binary_expr.rhs),
        }),
        BoolExpr(bool_expr) => BoolExpr(crate::grammar::BoolExpr {
            op: bool_expr.op,
            lhs: rewrite_boxed(bool_expr.lhs),
            rhs: rewrite_boxed(bool_expr.rhs),
        }),
        Comparison(comparison) => Comparison(crate::grammar::Comparison {
            first: rewrite_boxed(comparison.first),
            rest: comparison
                .rest
                .into_iter()
                .map(|(op, operand)| (op, rewrite_literals(operand)))
                .collect(),
        }),
        Call(call) => Call(crate::grammar::Call {
            name: call.name,
            args: call.args.into_iter().map(rewrite_literals).collect(),
        }),
        Comprehension(comprehension) => {
            let comprehension = *comprehension;
            Comprehension(Box::new(crate::grammar::Comprehension {
                element: rewrite_literals(comprehension.element),
                binding: comprehension.binding,
                iterable: rewrite_literals(comprehension.iterable),
                filter: comprehension.filter.map(rewrite_literals),
                set: comprehension.set,
            }))
        }
    }
}

fn rewrite_boxed(expr: Box<Expr>) -> Box<Expr> {
    Box::new(rewrite_literals(*expr))
}
