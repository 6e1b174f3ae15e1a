//! The inversion engine.
//!
//! Inversion walks the dynamic spine of an expression from the root down to
//! the single assignable leaf. At every step the node rewrites "I must equal
//! `value`" into "my dynamic child must equal `value'`", building `value'` in
//! a separate working model. The leaf finally turns the accumulated value
//! into an [`ExprKind::Assign`].

use bindexpr_core::{BindingContext, ExprError, ExprKind, ExprModel, MathOp, NodeId};
use bindexpr_types::TypeResolver;
use log::debug;

use crate::rearrange::rearrange;
use crate::side::DynamicSide;

/// Default bound on the length of the dynamic spine.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Inverts expressions of one source model.
pub struct Inverter<'a> {
    source: &'a ExprModel,
    resolver: &'a dyn TypeResolver,
    max_depth: usize,
}

impl<'a> Inverter<'a> {
    /// Creates an inverter over `source`.
    #[must_use]
    pub fn new(source: &'a ExprModel, resolver: &'a dyn TypeResolver) -> Self {
        Self {
            source,
            resolver,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum spine length.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn not_invertible(&self, reason: impl Into<String>, id: NodeId) -> ExprError {
        ExprError::not_invertible(reason, self.source.display(id))
    }

    /// Checks whether `id` can be the target of a two-way binding.
    ///
    /// # Errors
    ///
    /// Returns [`ExprError::NotInvertible`] explaining the first obstacle
    /// found along the dynamic spine, or a type error if resolution fails.
    pub fn check(&self, id: NodeId) -> Result<(), ExprError> {
        self.check_at(id, 0)
    }

    fn check_at(&self, id: NodeId, depth: usize) -> Result<(), ExprError> {
        if depth > self.max_depth {
            return Err(ExprError::DepthExceeded(self.max_depth));
        }
        match self.source.get(id) {
            ExprKind::Identifier { .. } => Ok(()),
            ExprKind::Field { target, .. } => self.field_gate(id, *target),
            ExprKind::Math { left, op, right } => {
                let side = self.math_gate(id, *left, *op, *right)?;
                let (dynamic, _) = side.split(*left, *right);
                self.check_at(dynamic, depth + 1)
            }
            ExprKind::Unary { operand, .. } | ExprKind::Cast { operand, .. } => {
                self.operand_gate(id, *operand)?;
                self.check_at(*operand, depth + 1)
            }
            ExprKind::Group(inner) => self.check_at(*inner, depth + 1),
            ExprKind::Literal { .. } | ExprKind::Ternary { .. } | ExprKind::Assign { .. } => {
                Err(self.leaf_error(id))
            }
        }
    }

    /// Produces the assignment that makes `id` evaluate to `value`.
    ///
    /// `value` must be a node of `dest`; the result, and every node built on
    /// the way, is interned into `dest`. The source model is left untouched.
    ///
    /// # Errors
    ///
    /// Fails as a whole if any node on the dynamic spine is not invertible.
    pub fn invert(
        &self,
        id: NodeId,
        value: NodeId,
        dest: &mut ExprModel,
        context: &BindingContext,
    ) -> Result<NodeId, ExprError> {
        self.invert_at(id, value, dest, context, 0)
    }

    fn invert_at(
        &self,
        id: NodeId,
        value: NodeId,
        dest: &mut ExprModel,
        context: &BindingContext,
        depth: usize,
    ) -> Result<NodeId, ExprError> {
        if depth > self.max_depth {
            return Err(ExprError::DepthExceeded(self.max_depth));
        }
        debug!("invert {} = {}", self.source.display(id), dest.display(value));
        match self.source.get(id) {
            ExprKind::Identifier { .. } => Ok(self.assign(id, value, dest, context)),
            ExprKind::Field { target, .. } => {
                self.field_gate(id, *target)?;
                Ok(self.assign(id, value, dest, context))
            }
            ExprKind::Math { left, op, right } => {
                let side = self.math_gate(id, *left, *op, *right)?;
                let (dynamic, constant) = side.split(*left, *right);
                let constant = self.source.clone_into(constant, dest);
                let new_value = rearrange(dest, *op, side, value, constant)?;
                self.invert_at(dynamic, new_value, dest, context, depth + 1)
            }
            ExprKind::Unary { op, operand } => {
                self.operand_gate(id, *operand)?;
                // every supported unary operator is its own inverse
                let new_value = dest.unary(*op, value);
                self.invert_at(*operand, new_value, dest, context, depth + 1)
            }
            ExprKind::Cast { operand, .. } => {
                self.operand_gate(id, *operand)?;
                let original = self.source.resolved_type(*operand, self.resolver)?;
                let new_value = dest.cast(original.name(), value);
                self.invert_at(*operand, new_value, dest, context, depth + 1)
            }
            ExprKind::Group(inner) => self.invert_at(*inner, value, dest, context, depth + 1),
            ExprKind::Literal { .. } | ExprKind::Ternary { .. } | ExprKind::Assign { .. } => {
                Err(self.leaf_error(id))
            }
        }
    }

    fn assign(
        &self,
        id: NodeId,
        value: NodeId,
        dest: &mut ExprModel,
        context: &BindingContext,
    ) -> NodeId {
        let target = self.source.clone_into(id, dest);
        dest.assign(target, value, context.clone())
    }

    /// Rejects `%`, string concatenation, and anything without exactly one
    /// dynamic operand. The returned side drives both checking and inversion.
    fn math_gate(
        &self,
        id: NodeId,
        left: NodeId,
        op: MathOp,
        right: NodeId,
    ) -> Result<DynamicSide, ExprError> {
        if op == MathOp::Rem {
            return Err(self.not_invertible(
                "The modulus operator (%) is not supported in two-way binding",
                id,
            ));
        }
        let ty = self.source.resolved_type(id, self.resolver)?;
        if self.resolver.is_string(&ty) {
            return Err(self.not_invertible(
                "String concatenation operator (+) is not supported in two-way binding",
                id,
            ));
        }
        DynamicSide::of(self.source, left, right).ok_or_else(|| {
            self.not_invertible(
                format!("Arithmetic operator {op} requires exactly one dynamic operand"),
                id,
            )
        })
    }

    fn operand_gate(&self, id: NodeId, operand: NodeId) -> Result<(), ExprError> {
        if self.source.is_dynamic(operand) {
            Ok(())
        } else {
            Err(self.not_invertible("The operand is a constant", id))
        }
    }

    fn field_gate(&self, id: NodeId, target: NodeId) -> Result<(), ExprError> {
        if self.source.is_dynamic(target) {
            Ok(())
        } else {
            Err(self.not_invertible(
                "A property of a constant cannot be the target of a two-way binding",
                id,
            ))
        }
    }

    fn leaf_error(&self, id: NodeId) -> ExprError {
        let reason = match self.source.get(id) {
            ExprKind::Literal { .. } => "A constant cannot be the target of a two-way binding",
            ExprKind::Ternary { .. } => {
                "The conditional operator (?:) is not supported in two-way binding"
            }
            _ => "An assignment cannot be the target of a two-way binding",
        };
        self.not_invertible(reason, id)
    }
}

#[cfg(test)]
mod tests {
    use bindexpr_core::{Env, UnaryOp, Value};
    use bindexpr_types::BuiltinTypes;

    use super::*;

    struct Fixture {
        types: BuiltinTypes,
        source: ExprModel,
        dest: ExprModel,
        value: NodeId,
        context: BindingContext,
    }

    impl Fixture {
        fn new(value_ty: &str) -> Self {
            let mut types = BuiltinTypes::new();
            types.register_class("User", "Object");
            types.register_property("User", "age", "int").unwrap();
            types.register_property("User", "name", "String").unwrap();

            let mut dest = ExprModel::new();
            let value = dest.identifier("value", value_ty);
            Self {
                types,
                source: ExprModel::new(),
                dest,
                value,
                context: BindingContext::new("MainBinding"),
            }
        }

        fn invert(&mut self, id: NodeId) -> Result<NodeId, ExprError> {
            Inverter::new(&self.source, &self.types).invert(
                id,
                self.value,
                &mut self.dest,
                &self.context,
            )
        }

        fn check(&self, id: NodeId) -> Result<(), ExprError> {
            Inverter::new(&self.source, &self.types).check(id)
        }

        /// Inverts `id` and evaluates the written value for the given target.
        fn solve(&mut self, id: NodeId, target: Value) -> Value {
            let assignment = self.invert(id).unwrap();
            let env = Env::new().with("value", target);
            self.dest.evaluate(assignment, &env).unwrap()
        }
    }

    fn reason(err: &ExprError) -> &str {
        match err {
            ExprError::NotInvertible { reason, .. } => reason,
            other => panic!("expected NotInvertible, got {other:?}"),
        }
    }

    #[test]
    fn test_constant_plus_variable() {
        let mut fx = Fixture::new("int");
        let c = fx.source.literal("10", "int");
        let x = fx.source.identifier("x", "int");
        let expr = fx.source.math(c, MathOp::Add, x);

        assert_eq!(fx.solve(expr, Value::Int(25)), Value::Int(15));
    }

    #[test]
    fn test_constant_minus_variable() {
        let mut fx = Fixture::new("int");
        let c = fx.source.literal("10", "int");
        let x = fx.source.identifier("x", "int");
        let expr = fx.source.math(c, MathOp::Sub, x);

        assert_eq!(fx.solve(expr, Value::Int(3)), Value::Int(7));
    }

    #[test]
    fn test_variable_over_constant() {
        let mut fx = Fixture::new("int");
        let x = fx.source.identifier("x", "int");
        let c = fx.source.literal("4", "int");
        let expr = fx.source.math(x, MathOp::Div, c);

        assert_eq!(fx.solve(expr, Value::Int(5)), Value::Int(20));
    }

    #[test]
    fn test_constant_over_variable() {
        let mut fx = Fixture::new("int");
        let c = fx.source.literal("100", "int");
        let x = fx.source.identifier("x", "int");
        let expr = fx.source.math(c, MathOp::Div, x);

        assert_eq!(fx.solve(expr, Value::Int(4)), Value::Int(25));
    }

    #[test]
    fn test_inversion_builds_assignment_to_leaf() {
        let mut fx = Fixture::new("int");
        let c = fx.source.literal("10", "int");
        let user = fx.source.identifier("user", "User");
        let age = fx.source.field(user, "age");
        let expr = fx.source.math(c, MathOp::Add, age);

        let assignment = fx.invert(expr).unwrap();
        let ExprKind::Assign {
            target,
            value,
            context,
        } = fx.dest.get(assignment)
        else {
            panic!("expected an assignment");
        };
        assert_eq!(fx.dest.key(*target), fx.source.key(age));
        assert_eq!(context.class_name(), "MainBinding");
        assert_eq!(fx.dest.display(*value).to_string(), "(value) - (10)");
    }

    #[test]
    fn test_nested_spine() {
        // ((x - 2) * 3) + 1 = 19  =>  x = 8
        let mut fx = Fixture::new("int");
        let x = fx.source.identifier("x", "int");
        let two = fx.source.literal("2", "int");
        let three = fx.source.literal("3", "int");
        let one = fx.source.literal("1", "int");
        let sub = fx.source.math(x, MathOp::Sub, two);
        let grouped = fx.source.group(sub);
        let mul = fx.source.math(grouped, MathOp::Mul, three);
        let expr = fx.source.math(mul, MathOp::Add, one);

        assert!(fx.check(expr).is_ok());
        assert_eq!(fx.solve(expr, Value::Int(19)), Value::Int(8));
    }

    #[test]
    fn test_unary_and_cast() {
        let mut fx = Fixture::new("double");
        let x = fx.source.identifier("x", "int");
        let neg = fx.source.unary(UnaryOp::Neg, x);
        let cast = fx.source.cast("double", neg);

        let assignment = fx.invert(cast).unwrap();
        let ExprKind::Assign { value, .. } = fx.dest.get(assignment) else {
            panic!("expected an assignment");
        };
        assert_eq!(fx.dest.display(*value).to_string(), "-((int) (value))");

        let env = Env::new().with("value", Value::Float(-6.0));
        assert_eq!(fx.dest.evaluate(assignment, &env), Ok(Value::Int(6)));
    }

    #[test]
    fn test_logical_not_is_its_own_inverse() {
        let mut fx = Fixture::new("boolean");
        let flag = fx.source.identifier("flag", "boolean");
        let expr = fx.source.unary(UnaryOp::Not, flag);

        let written = fx.solve(expr, Value::Bool(true));
        assert_eq!(written, Value::Bool(false));
        let replayed = fx.source.evaluate(expr, &Env::new().with("flag", written));
        assert_eq!(replayed, Ok(Value::Bool(true)));
    }

    #[test]
    fn test_bitwise_not_is_its_own_inverse() {
        let mut fx = Fixture::new("int");
        let x = fx.source.identifier("x", "int");
        let expr = fx.source.unary(UnaryOp::BitNot, x);

        let written = fx.solve(expr, Value::Int(5));
        assert_eq!(written, Value::Int(-6));
        let replayed = fx.source.evaluate(expr, &Env::new().with("x", written));
        assert_eq!(replayed, Ok(Value::Int(5)));
    }

    #[test]
    fn test_field_of_conditional_target() {
        let mut fx = Fixture::new("int");
        let flag = fx.source.identifier("flag", "boolean");
        let a = fx.source.identifier("a", "User");
        let b = fx.source.identifier("b", "User");
        let pick = fx.source.ternary(flag, a, b);
        let age = fx.source.field(pick, "age");
        let one = fx.source.literal("1", "int");
        let expr = fx.source.math(age, MathOp::Add, one);

        assert!(fx.check(expr).is_ok());
        let assignment = fx.invert(expr).unwrap();
        let ExprKind::Assign { target, .. } = fx.dest.get(assignment) else {
            panic!("expected an assignment");
        };
        assert_eq!(fx.dest.key(*target), fx.source.key(age));
        assert_eq!(
            fx.dest.display(assignment).to_string(),
            "((flag) ? (a) : (b)).age = (value) - (1)"
        );
    }

    #[test]
    fn test_modulus_never_invertible() {
        let mut fx = Fixture::new("int");
        let x = fx.source.identifier("x", "int");
        let five = fx.source.literal("5", "int");
        let expr = fx.source.math(x, MathOp::Rem, five);

        let err = fx.check(expr).unwrap_err();
        assert!(reason(&err).contains("modulus"));
        assert_eq!(fx.invert(expr).unwrap_err(), err);
    }

    #[test]
    fn test_both_sides_dynamic() {
        let mut fx = Fixture::new("int");
        let x = fx.source.identifier("x", "int");
        let expr = fx.source.math(x, MathOp::Add, x);

        let err = fx.check(expr).unwrap_err();
        assert!(reason(&err).contains("exactly one dynamic"));
        assert!(reason(&err).contains('+'));
        assert!(fx.invert(expr).is_err());
    }

    #[test]
    fn test_neither_side_dynamic() {
        let mut fx = Fixture::new("int");
        let three = fx.source.literal("3", "int");
        let four = fx.source.literal("4", "int");
        let expr = fx.source.math(three, MathOp::Add, four);

        assert!(reason(&fx.check(expr).unwrap_err()).contains("exactly one dynamic"));
        assert!(fx.invert(expr).is_err());
    }

    #[test]
    fn test_string_concatenation_not_invertible() {
        let mut fx = Fixture::new("String");
        let user = fx.source.identifier("user", "User");
        let name = fx.source.field(user, "name");
        let suffix = fx.source.literal("\"!\"", "String");
        let expr = fx.source.math(name, MathOp::Add, suffix);

        let err = fx.check(expr).unwrap_err();
        assert!(reason(&err).contains("String concatenation"));
        match err {
            ExprError::NotInvertible { expr, .. } => assert_eq!(expr, "(user.name) + (\"!\")"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_failure_leaves_no_partial_assignment() {
        let mut fx = Fixture::new("int");
        let x = fx.source.identifier("x", "int");
        let flag = fx.source.identifier("flag", "boolean");
        let one = fx.source.literal("1", "int");
        let pick = fx.source.ternary(flag, x, one);
        let expr = fx.source.math(pick, MathOp::Add, one);

        assert!(reason(&fx.check(expr).unwrap_err()).contains("conditional"));
        let err = fx.invert(expr).unwrap_err();
        assert!(!err.is_fatal());
        assert!(!fx
            .dest
            .iter()
            .any(|(_, kind)| matches!(kind, ExprKind::Assign { .. })));
    }

    #[test]
    fn test_type_errors_propagate() {
        let mut fx = Fixture::new("int");
        let x = fx.source.identifier("x", "Unknown");
        let one = fx.source.literal("1", "int");
        let expr = fx.source.math(x, MathOp::Add, one);

        assert!(matches!(fx.check(expr), Err(ExprError::Type(_))));
    }

    #[test]
    fn test_depth_limit() {
        let mut fx = Fixture::new("int");
        let mut expr = fx.source.identifier("x", "int");
        let one = fx.source.literal("1", "int");
        for _ in 0..10 {
            expr = fx.source.math(expr, MathOp::Add, one);
        }

        let inverter = Inverter::new(&fx.source, &fx.types).with_max_depth(4);
        assert_eq!(inverter.check(expr), Err(ExprError::DepthExceeded(4)));
        assert!(Inverter::new(&fx.source, &fx.types).check(expr).is_ok());
    }

    #[test]
    fn test_source_model_untouched() {
        let mut fx = Fixture::new("int");
        let c = fx.source.literal("10", "int");
        let x = fx.source.identifier("x", "int");
        let expr = fx.source.math(c, MathOp::Sub, x);
        let len = fx.source.len();

        fx.invert(expr).unwrap();
        assert_eq!(fx.source.len(), len);
    }
}
