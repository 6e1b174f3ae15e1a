//! The binding compiler: forward code, inverse code and diagnostics.

use std::fmt;

use bindexpr_codegen::generate_string;
use bindexpr_core::{BindingContext, Dependency, ExprError, ExprModel, NodeId};
use bindexpr_invert::Inverter;
use bindexpr_types::{Ty, TypeResolver};
use log::{debug, info, warn};

use crate::config::CompilerConfig;

/// The forward half of a binding.
#[derive(Clone, Debug)]
pub struct CompiledExpr {
    /// The node that was compiled.
    pub id: NodeId,
    /// Resolved result type.
    pub ty: Ty,
    /// Generated source text.
    pub code: String,
    /// Whether the value can change at runtime.
    pub dynamic: bool,
    /// Edges to the dynamic children the value must be recomputed from.
    pub dependencies: Vec<Dependency>,
}

/// The reverse half of a two-way binding.
///
/// Lives in its own working model so the source model is never mutated.
#[derive(Debug)]
pub struct InverseBinding {
    /// Working model holding the value identifier and the assignment.
    pub model: ExprModel,
    /// The identifier carrying the new value.
    pub value: NodeId,
    /// The assignment node, a root of `model`.
    pub assignment: NodeId,
    /// Generated setter code.
    pub code: String,
}

/// One expression that cannot take part in a two-way binding.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// The offending root.
    pub node: NodeId,
    /// Rendered source of the root.
    pub expr: String,
    /// Why it failed.
    pub error: ExprError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.expr, self.error)
    }
}

/// Result of checking a set of two-way binding targets.
#[derive(Clone, Debug, Default)]
pub struct BindingReport {
    /// Number of expressions checked.
    pub checked: usize,
    /// One entry per failing expression, in input order.
    pub diagnostics: Vec<Diagnostic>,
}

impl BindingReport {
    /// Returns true if every expression passed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Returns true if any failure is fatal to the whole compilation.
    #[must_use]
    pub fn has_fatal(&self) -> bool {
        self.diagnostics.iter().any(|d| d.error.is_fatal())
    }
}

impl fmt::Display for BindingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} two-way expressions failed",
            self.diagnostics.len(),
            self.checked
        )?;
        for diagnostic in &self.diagnostics {
            write!(f, "\n  {diagnostic}")?;
        }
        Ok(())
    }
}

/// Compiles binding expressions against a type resolver.
pub struct BindingCompiler<R> {
    resolver: R,
    config: CompilerConfig,
}

impl<R: TypeResolver> BindingCompiler<R> {
    /// Creates a compiler with the default configuration.
    pub fn new(resolver: R) -> Self {
        Self::with_config(resolver, CompilerConfig::default())
    }

    /// Creates a compiler with a custom configuration.
    pub fn with_config(resolver: R, config: CompilerConfig) -> Self {
        Self { resolver, config }
    }

    /// The resolver in use.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// The configuration in use.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Creates an empty model sized by the configuration.
    pub fn model(&self) -> ExprModel {
        ExprModel::with_capacity(self.config.model_capacity)
    }

    fn inverter<'a>(&'a self, model: &'a ExprModel) -> Inverter<'a> {
        Inverter::new(model, &self.resolver).with_max_depth(self.config.max_inversion_depth)
    }

    /// Resolves the type of `id` and generates its code.
    ///
    /// # Errors
    ///
    /// Returns a type error if the expression cannot be typed.
    pub fn compile(&self, model: &ExprModel, id: NodeId) -> Result<CompiledExpr, ExprError> {
        let ty = model.resolved_type(id, &self.resolver)?;
        let code = generate_string(model, id, &self.config.codegen_options());
        debug!("compiled {} : {ty} => {code}", model.display(id));
        Ok(CompiledExpr {
            id,
            ty,
            code,
            dynamic: model.is_dynamic(id),
            dependencies: model.dependencies(id).to_vec(),
        })
    }

    /// Builds the setter code that writes `value_name` back through `id`.
    ///
    /// The value identifier takes the resolved type of `id`.
    ///
    /// # Errors
    ///
    /// Fails if `id` cannot be typed or is not invertible.
    pub fn compile_inverse(
        &self,
        model: &ExprModel,
        id: NodeId,
        context: &BindingContext,
        value_name: &str,
    ) -> Result<InverseBinding, ExprError> {
        let ty = model.resolved_type(id, &self.resolver)?;
        let mut working = self.model();
        let value = working.identifier(value_name, ty.name());
        let assignment = self.inverter(model).invert(id, value, &mut working, context)?;
        working.mark_root(assignment);
        let code = generate_string(&working, assignment, &self.config.codegen_options());
        debug!("inverse of {} => {code}", model.display(id));
        Ok(InverseBinding {
            model: working,
            value,
            assignment,
            code,
        })
    }

    /// Checks every expression in `targets` for two-way use.
    ///
    /// Failures are collected rather than returned so that a caller can
    /// report them all at once.
    pub fn check_two_way(&self, model: &ExprModel, targets: &[NodeId]) -> BindingReport {
        let inverter = self.inverter(model);
        let mut report = BindingReport {
            checked: targets.len(),
            diagnostics: Vec::new(),
        };
        for &node in targets {
            if let Err(error) = inverter.check(node) {
                let expr = model.display(node).to_string();
                warn!("{expr}: {error}");
                report.diagnostics.push(Diagnostic { node, expr, error });
            }
        }
        info!(
            "checked {} two-way expressions, {} failed",
            report.checked,
            report.diagnostics.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use bindexpr_core::MathOp;
    use bindexpr_types::BuiltinTypes;

    use super::*;

    fn compiler() -> BindingCompiler<BuiltinTypes> {
        let mut types = BuiltinTypes::new();
        types.register_class("User", "Object");
        types.register_property("User", "age", "int").unwrap();
        BindingCompiler::new(types)
    }

    #[test]
    fn test_compile_reports_type_code_and_dependencies() {
        let compiler = compiler();
        let mut model = compiler.model();
        let ten = model.literal("10", "int");
        let x = model.identifier("x", "int");
        let sum = model.math(ten, MathOp::Add, x);

        let compiled = compiler.compile(&model, sum).unwrap();
        assert_eq!(compiled.ty, Ty::new("int"));
        assert_eq!(compiled.code, "(10) + (x)");
        assert!(compiled.dynamic);
        assert_eq!(
            compiled.dependencies,
            vec![Dependency {
                dependant: sum,
                other: x
            }]
        );
    }

    #[test]
    fn test_compile_inverse_uses_fresh_model() {
        let compiler = compiler();
        let mut model = compiler.model();
        let ten = model.literal("10", "int");
        let x = model.identifier("x", "int");
        let sum = model.math(ten, MathOp::Add, x);
        let before = model.len();

        let inverse = compiler
            .compile_inverse(&model, sum, &BindingContext::new("Binding"), "value")
            .unwrap();
        assert_eq!(inverse.code, "Binding.setX((value) - (10))");
        assert_eq!(inverse.model.roots(), &[inverse.assignment]);
        assert_eq!(model.len(), before);
    }

    #[test]
    fn test_check_two_way_collects_all_failures() {
        let compiler = compiler();
        let mut model = compiler.model();
        let x = model.identifier("x", "int");
        let y = model.identifier("y", "int");
        let c = model.literal("3", "int");
        let ok = model.math(x, MathOp::Mul, c);
        let both = model.math(x, MathOp::Add, y);
        let rem = model.math(x, MathOp::Rem, c);

        let report = compiler.check_two_way(&model, &[ok, both, rem]);
        assert_eq!(report.checked, 3);
        let failed: Vec<_> = report.diagnostics.iter().map(|d| d.node).collect();
        assert_eq!(failed, vec![both, rem]);
        assert!(!report.has_fatal());
        assert!(report.to_string().starts_with("2 of 3 two-way expressions failed"));
    }
}
