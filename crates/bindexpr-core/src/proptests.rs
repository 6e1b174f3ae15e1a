//! Property-based tests for interning and structural keys.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{ExprModel, MathOp, NodeId};

    /// A model-independent description of an arithmetic tree.
    #[derive(Clone, Debug, PartialEq)]
    enum Shape {
        Lit(i64),
        Var(u8),
        Math(Box<Shape>, MathOp, Box<Shape>),
    }

    fn math_op() -> impl Strategy<Value = MathOp> {
        prop::sample::select(MathOp::ALL.to_vec())
    }

    fn shape() -> impl Strategy<Value = Shape> {
        let leaf = prop_oneof![
            (-50i64..50).prop_map(Shape::Lit),
            (0u8..4).prop_map(Shape::Var),
        ];
        leaf.prop_recursive(4, 32, 2, |inner| {
            (inner.clone(), math_op(), inner)
                .prop_map(|(l, op, r)| Shape::Math(Box::new(l), op, Box::new(r)))
        })
    }

    fn build(model: &mut ExprModel, shape: &Shape) -> NodeId {
        match shape {
            Shape::Lit(n) => model.literal(&n.to_string(), "int"),
            Shape::Var(v) => model.identifier(&format!("v{v}"), "int"),
            Shape::Math(l, op, r) => {
                let l = build(model, l);
                let r = build(model, r);
                model.math(l, *op, r)
            }
        }
    }

    proptest! {
        #[test]
        fn rebuilding_returns_same_node(s in shape()) {
            let mut model = ExprModel::new();
            let first = build(&mut model, &s);
            let len = model.len();
            let second = build(&mut model, &s);
            prop_assert_eq!(first, second);
            prop_assert_eq!(model.len(), len);
        }

        #[test]
        fn keys_agree_across_models(s in shape()) {
            let mut a = ExprModel::new();
            let mut b = ExprModel::new();
            // skew b's indices so equal keys cannot come from equal handles
            b.identifier("padding", "int");
            let x = build(&mut a, &s);
            let y = build(&mut b, &s);
            prop_assert_eq!(a.key(x), b.key(y));
        }

        #[test]
        fn keys_collide_only_for_equal_shapes(s in shape(), t in shape()) {
            let mut model = ExprModel::new();
            let x = build(&mut model, &s);
            let y = build(&mut model, &t);
            prop_assert_eq!(s == t, x == y);
            prop_assert_eq!(s == t, model.key(x) == model.key(y));
        }

        #[test]
        fn clone_preserves_key_and_source(s in shape()) {
            let mut source = ExprModel::new();
            let x = build(&mut source, &s);
            let len = source.len();

            let mut dest = ExprModel::new();
            let y = source.clone_into(x, &mut dest);
            prop_assert_eq!(source.key(x), dest.key(y));
            prop_assert_eq!(source.is_dynamic(x), dest.is_dynamic(y));
            prop_assert_eq!(source.len(), len);
            prop_assert_eq!(dest.len(), len);
        }
    }
}
