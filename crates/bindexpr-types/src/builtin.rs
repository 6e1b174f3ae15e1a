//! A self-contained reference type system.
//!
//! Models the subset of a Java-like type system that binding expressions
//! need: numeric primitives with widening, `boolean`, `String`, and classes
//! with single inheritance rooted at `Object`.

use hashbrown::HashMap;

use crate::error::TypeError;
use crate::resolver::TypeResolver;
use crate::ty::Ty;

/// The root of every class hierarchy.
pub const OBJECT: &str = "Object";
/// The string type.
pub const STRING: &str = "String";
/// The boolean type.
pub const BOOLEAN: &str = "boolean";

/// Numeric primitives in widening order.
const NUMERIC_RANKS: [&str; 6] = ["byte", "short", "int", "long", "float", "double"];

#[derive(Clone, Debug)]
enum TypeKind {
    Numeric { rank: usize },
    Char,
    Boolean,
    Class { parent: Option<Ty> },
}

#[derive(Clone, Debug)]
struct TypeInfo {
    kind: TypeKind,
    properties: HashMap<String, Ty>,
}

impl TypeInfo {
    fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            properties: HashMap::new(),
        }
    }
}

/// A resolver with built-in primitives and user-registered classes.
#[derive(Clone, Debug)]
pub struct BuiltinTypes {
    types: HashMap<String, TypeInfo>,
}

impl Default for BuiltinTypes {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinTypes {
    /// Creates a resolver knowing only the built-in types.
    #[must_use]
    pub fn new() -> Self {
        let mut types = HashMap::new();
        for (rank, name) in NUMERIC_RANKS.iter().enumerate() {
            types.insert((*name).to_string(), TypeInfo::new(TypeKind::Numeric { rank }));
        }
        types.insert("char".to_string(), TypeInfo::new(TypeKind::Char));
        types.insert(BOOLEAN.to_string(), TypeInfo::new(TypeKind::Boolean));
        types.insert(
            OBJECT.to_string(),
            TypeInfo::new(TypeKind::Class { parent: None }),
        );
        types.insert(
            STRING.to_string(),
            TypeInfo::new(TypeKind::Class {
                parent: Some(Ty::new(OBJECT)),
            }),
        );
        Self { types }
    }

    /// Registers a class named `name` extending `parent`.
    ///
    /// Registering an existing name replaces it, properties included.
    pub fn register_class(&mut self, name: &str, parent: &str) -> &mut Self {
        self.types.insert(
            name.to_string(),
            TypeInfo::new(TypeKind::Class {
                parent: Some(Ty::new(parent)),
            }),
        );
        self
    }

    /// Declares `owner.name` with type `ty`.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::TypeNotFound`] if `owner` was never registered.
    pub fn register_property(
        &mut self,
        owner: &str,
        name: &str,
        ty: &str,
    ) -> Result<&mut Self, TypeError> {
        self.types
            .get_mut(owner)
            .ok_or_else(|| TypeError::TypeNotFound(owner.to_string()))?
            .properties
            .insert(name.to_string(), Ty::new(ty));
        Ok(self)
    }

    fn info(&self, ty: &Ty) -> Result<&TypeInfo, TypeError> {
        self.types
            .get(ty.name())
            .ok_or_else(|| TypeError::TypeNotFound(ty.name().to_string()))
    }

    /// Walks the superclass chain of `ty`, starting with `ty` itself.
    fn ancestors(&self, ty: &Ty) -> Result<Vec<Ty>, TypeError> {
        let mut chain = vec![ty.clone()];
        let mut current = ty.clone();
        while let TypeKind::Class {
            parent: Some(parent),
        } = &self.info(&current)?.kind
        {
            if chain.contains(parent) {
                break;
            }
            chain.push(parent.clone());
            current = parent.clone();
        }
        Ok(chain)
    }

    fn numeric_rank(kind: &TypeKind) -> Option<usize> {
        match kind {
            TypeKind::Numeric { rank } => Some(*rank),
            // char promotes like int when mixed with other numerics
            TypeKind::Char => Some(2),
            _ => None,
        }
    }
}

impl TypeResolver for BuiltinTypes {
    fn find_type(&self, name: &str) -> Result<Ty, TypeError> {
        if self.types.contains_key(name) {
            Ok(Ty::new(name))
        } else {
            Err(TypeError::TypeNotFound(name.to_string()))
        }
    }

    fn is_string(&self, ty: &Ty) -> bool {
        ty.name() == STRING
    }

    fn common_ancestor(&self, a: &Ty, b: &Ty) -> Result<Ty, TypeError> {
        let a_info = self.info(a)?;
        let b_info = self.info(b)?;
        if a == b {
            return Ok(a.clone());
        }

        match (&a_info.kind, &b_info.kind) {
            (TypeKind::Class { .. }, TypeKind::Class { .. }) => {
                let b_chain = self.ancestors(b)?;
                self.ancestors(a)?
                    .into_iter()
                    .find(|ancestor| b_chain.contains(ancestor))
                    .ok_or_else(|| {
                        TypeError::NoCommonAncestor(a.name().to_string(), b.name().to_string())
                    })
            }
            (a_kind, b_kind) => {
                match (Self::numeric_rank(a_kind), Self::numeric_rank(b_kind)) {
                    (Some(x), Some(y)) => Ok(Ty::new(NUMERIC_RANKS[x.max(y)])),
                    // primitives mixed with anything else box to Object
                    _ => Ok(Ty::new(OBJECT)),
                }
            }
        }
    }

    fn property_type(&self, owner: &Ty, property: &str) -> Result<Ty, TypeError> {
        for ancestor in self.ancestors(owner)? {
            if let Some(ty) = self.info(&ancestor)?.properties.get(property) {
                return Ok(ty.clone());
            }
        }
        Err(TypeError::PropertyNotFound {
            owner: owner.name().to_string(),
            property: property.to_string(),
        })
    }

    fn string_type(&self) -> Result<Ty, TypeError> {
        self.find_type(STRING)
    }

    fn boolean_type(&self) -> Result<Ty, TypeError> {
        self.find_type(BOOLEAN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types() -> BuiltinTypes {
        let mut types = BuiltinTypes::new();
        types
            .register_class("Animal", OBJECT)
            .register_class("Dog", "Animal")
            .register_class("Cat", "Animal");
        types.register_property("Animal", "name", STRING).unwrap();
        types.register_property("Dog", "age", "int").unwrap();
        types
    }

    #[test]
    fn test_find_type() {
        let types = types();
        assert_eq!(types.find_type("int").unwrap(), Ty::new("int"));
        assert_eq!(types.find_type("Dog").unwrap(), Ty::new("Dog"));
        assert_eq!(
            types.find_type("Missing"),
            Err(TypeError::TypeNotFound("Missing".to_string()))
        );
    }

    #[test]
    fn test_numeric_widening() {
        let types = types();
        let int = Ty::new("int");
        let double = Ty::new("double");
        let byte = Ty::new("byte");
        let ch = Ty::new("char");

        assert_eq!(types.common_ancestor(&int, &double).unwrap(), double);
        assert_eq!(types.common_ancestor(&double, &int).unwrap(), double);
        assert_eq!(types.common_ancestor(&byte, &int).unwrap(), int);
        assert_eq!(types.common_ancestor(&ch, &byte).unwrap(), int);
        assert_eq!(types.common_ancestor(&int, &int).unwrap(), int);
    }

    #[test]
    fn test_class_ancestor() {
        let types = types();
        let dog = Ty::new("Dog");
        let cat = Ty::new("Cat");

        assert_eq!(types.common_ancestor(&dog, &cat).unwrap(), Ty::new("Animal"));
        assert_eq!(
            types.common_ancestor(&dog, &Ty::new(STRING)).unwrap(),
            Ty::new(OBJECT)
        );
    }

    #[test]
    fn test_mixed_primitive_boxes_to_object() {
        let types = types();
        assert_eq!(
            types
                .common_ancestor(&Ty::new("boolean"), &Ty::new("int"))
                .unwrap(),
            Ty::new(OBJECT)
        );
    }

    #[test]
    fn test_inherited_property() {
        let types = types();
        let dog = Ty::new("Dog");
        assert_eq!(types.property_type(&dog, "age").unwrap(), Ty::new("int"));
        assert_eq!(types.property_type(&dog, "name").unwrap(), Ty::new(STRING));
        assert!(matches!(
            types.property_type(&dog, "owner"),
            Err(TypeError::PropertyNotFound { .. })
        ));
    }

    #[test]
    fn test_predicates() {
        let types = types();
        assert!(types.is_string(&Ty::new(STRING)));
        assert!(!types.is_string(&Ty::new("Dog")));
        assert_eq!(types.string_type().unwrap(), Ty::new(STRING));
        assert_eq!(types.boolean_type().unwrap(), Ty::new(BOOLEAN));
    }
}
