//! Per-variant code generation.
//!
//! Binary and conditional operands are always wrapped in parentheses, so the
//! generated code is correct whatever the target language's precedence rules.

use bindexpr_core::{ExprKind, ExprModel, NodeId};

use crate::emitter::{CodeBuffer, CodeEmitter};

/// Options controlling generated code.
#[derive(Clone, Debug)]
pub struct CodegenOptions {
    /// Prefix of generated setter names, `set` gives `setAge`.
    pub setter_prefix: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            setter_prefix: "set".to_string(),
        }
    }
}

impl CodegenOptions {
    /// Returns the setter name for a property or variable.
    #[must_use]
    pub fn setter_name(&self, property: &str) -> String {
        let mut chars = property.chars();
        let mut name = self.setter_prefix.clone();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
        name
    }
}

/// Emits the code of `id` into `out`.
///
/// Reads the model only; generating code twice yields the same text.
pub fn generate(
    model: &ExprModel,
    id: NodeId,
    options: &CodegenOptions,
    out: &mut impl CodeEmitter,
) {
    Generator { model, options }.emit(id, out);
}

/// Generates the code of `id` as a string.
#[must_use]
pub fn generate_string(model: &ExprModel, id: NodeId, options: &CodegenOptions) -> String {
    let mut buffer = CodeBuffer::new();
    generate(model, id, options, &mut buffer);
    buffer.finish()
}

struct Generator<'a> {
    model: &'a ExprModel,
    options: &'a CodegenOptions,
}

impl Generator<'_> {
    fn nested(&self, id: NodeId, out: &mut impl CodeEmitter) {
        out.begin_nested();
        self.emit(id, out);
        out.end_nested();
    }

    /// Emits the object of a member access, parenthesized unless it is a
    /// variable path.
    fn member_target(&self, target: NodeId, out: &mut impl CodeEmitter) {
        if self.model.get(target).is_assignable() {
            self.nested(target, out);
        } else {
            out.text("(");
            self.nested(target, out);
            out.text(")");
        }
    }

    fn emit(&self, id: NodeId, out: &mut impl CodeEmitter) {
        match self.model.get(id) {
            ExprKind::Literal { text, .. } => out.text(text),
            ExprKind::Identifier { name, .. } => out.text(name),
            ExprKind::Field { target, name } => {
                self.member_target(*target, out);
                out.text(".");
                out.text(name);
            }
            ExprKind::Math { left, op, right } => {
                out.text("(");
                self.nested(*left, out);
                out.text(") ");
                out.text(op.symbol());
                out.text(" (");
                self.nested(*right, out);
                out.text(")");
            }
            ExprKind::Unary { op, operand } => {
                out.text(op.symbol());
                out.text("(");
                self.nested(*operand, out);
                out.text(")");
            }
            ExprKind::Group(inner) => {
                out.text("(");
                self.nested(*inner, out);
                out.text(")");
            }
            ExprKind::Cast { ty, operand } => {
                out.text("((");
                out.text(ty);
                out.text(") (");
                self.nested(*operand, out);
                out.text("))");
            }
            ExprKind::Ternary {
                cond,
                then,
                otherwise,
            } => {
                out.text("(");
                self.nested(*cond, out);
                out.text(") ? (");
                self.nested(*then, out);
                out.text(") : (");
                self.nested(*otherwise, out);
                out.text(")");
            }
            ExprKind::Assign {
                target,
                value,
                context,
            } => self.emit_assign(*target, *value, context.class_name(), out),
        }
    }

    fn emit_assign(
        &self,
        target: NodeId,
        value: NodeId,
        class_name: &str,
        out: &mut impl CodeEmitter,
    ) {
        match self.model.get(target) {
            ExprKind::Identifier { name, .. } => {
                out.text(class_name);
                out.text(".");
                out.text(&self.options.setter_name(name));
            }
            ExprKind::Field { target: owner, name } => {
                self.member_target(*owner, out);
                out.text(".");
                out.text(&self.options.setter_name(name));
            }
            _ => {
                self.nested(target, out);
                out.text(" = ");
                self.nested(value, out);
                return;
            }
        }
        out.text("(");
        self.nested(value, out);
        out.text(")");
    }
}
