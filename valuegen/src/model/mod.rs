//! In-memory model of the classes produced by the upstream class generator.
//!
//! A [`ClassModel`] owns every [`ClassDescriptor`] of one generation run and
//! hands out [`ClassId`]s for them. Superclass links between classes of the
//! same run are stored as ids; superclasses that live outside the run (library
//! base classes, classes from other schemas) are kept by name only, since
//! nothing is known about their fields.

mod discover;
mod schema;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::errors::ModelError;
use crate::tree::GeneratedMethod;

pub use discover::{discover_model_files, load_models};
pub use schema::{ClassSchema, FieldSchema, MethodSchema, ModelSchema, load_model};

/// Handle to a class inside a [`ClassModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClassId(usize);

impl ClassId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A field declared on a generated class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    /// Java type text, only used when rendering the class skeleton.
    pub field_type: String,
    pub is_static: bool,
}

impl FieldDescriptor {
    /// An instance field.
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            is_static: false,
        }
    }

    /// A static (class-level) field.
    pub fn new_static(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            is_static: true,
            ..Self::new(name, field_type)
        }
    }
}

/// Name plus parameter types of a method, used to detect methods that already exist.
///
/// Parameter types are reduced to their simple names on construction, so
/// `equals(java.lang.Object)` and `equals(Object)` are the same signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MethodSignature {
    name: String,
    params: Vec<String>,
}

impl MethodSignature {
    pub fn new<I, S>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            params: params.into_iter().map(|p| simple_name(p.as_ref()).to_string()).collect(),
        }
    }

    pub fn no_args(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    pub fn to_string_method() -> Self {
        Self::no_args("toString")
    }

    pub fn hash_code_method() -> Self {
        Self::no_args("hashCode")
    }

    pub fn equals_method() -> Self {
        Self::new("equals", ["Object"])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.params.join(", "))
    }
}

/// Strip the package (and generic arguments) from a Java type name.
fn simple_name(ty: &str) -> &str {
    let ty = ty.trim();
    let base = ty.split('<').next().unwrap_or(ty);
    base.rsplit('.').next().unwrap_or(base)
}

/// Superclass of a generated class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Superclass {
    /// Another class of the same model.
    Defined(ClassId),
    /// A class outside the model, known by name only.
    External(String),
}

/// One generated class.
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    pub name: String,
    pub package: Option<String>,
    pub is_abstract: bool,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
    pub superclass: Option<Superclass>,
    existing_methods: BTreeSet<MethodSignature>,
    /// Java source of declared methods, keyed by signature.
    method_sources: BTreeMap<MethodSignature, String>,
    generated: Vec<GeneratedMethod>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: None,
            is_abstract: false,
            fields: Vec::new(),
            superclass: None,
            existing_methods: BTreeSet::new(),
            method_sources: BTreeMap::new(),
            generated: Vec::new(),
        }
    }

    pub fn in_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, signature: MethodSignature) -> Self {
        self.existing_methods.insert(signature);
        self
    }

    /// Fully qualified name (`package.Name`, or just `Name` in the default package).
    /// Declare a method together with its full Java source, so the rendered
    /// compilation unit can reproduce it.
    pub fn with_method_source(mut self, signature: MethodSignature, source: impl Into<String>) -> Self {
        self.declare_method_source(signature, source);
        self
    }

    pub fn qualified_name(&self) -> String {
        match &self.package {
            Some(package) if !package.is_empty() => format!("{package}.{}", self.name),
            _ => self.name.clone(),
        }
    }

    pub fn has_method(&self, signature: &MethodSignature) -> bool {
        self.existing_methods.contains(signature)
    }

    /// Record a method the upstream generator already put on this class.
    pub fn declare_method(&mut self, signature: MethodSignature) -> bool {
        self.existing_methods.insert(signature)
    }

    pub fn declare_method_source(&mut self, signature: MethodSignature, source: impl Into<String>) {
        self.existing_methods.insert(signature.clone());
        self.method_sources.insert(signature, source.into());
    }

    pub fn existing_methods(&self) -> impl Iterator<Item = &MethodSignature> {
        self.existing_methods.iter()
    }

    pub fn method_source(&self, signature: &MethodSignature) -> Option<&str> {
        self.method_sources.get(signature).map(String::as_str)
    }

    /// Methods the upstream generator wrote, i.e. existing methods that were
    /// not attached by synthesis.
    pub fn declared_methods(&self) -> impl Iterator<Item = &MethodSignature> {
        self.existing_methods
            .iter()
            .filter(|signature| !self.generated.iter().any(|method| method.signature() == **signature))
    }

    /// Declared methods whose source the model does not carry.
    pub fn methods_without_source(&self) -> impl Iterator<Item = &MethodSignature> {
        self.declared_methods()
            .filter(|signature| !self.method_sources.contains_key(*signature))
    }

    /// Attach a synthesized method. Its signature becomes an existing method,
    /// so a later pass will not generate it again.
    pub fn attach(&mut self, method: GeneratedMethod) {
        self.existing_methods.insert(method.signature());
        self.generated.push(method);
    }

    pub fn generated_methods(&self) -> &[GeneratedMethod] {
        &self.generated
    }

    pub fn external_superclass(&self) -> Option<&str> {
        match &self.superclass {
            Some(Superclass::External(name)) => Some(name),
            _ => None,
        }
    }
}

/// All classes of one generation run.
#[derive(Debug, Clone, Default)]
pub struct ClassModel {
    classes: Vec<ClassDescriptor>,
    by_name: HashMap<String, ClassId>,
}

impl ClassModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class to the model.
    ///
    /// Classes are keyed by qualified name; field names must be unique within
    /// the class.
    pub fn add_class(&mut self, class: ClassDescriptor) -> Result<ClassId, ModelError> {
        let key = class.qualified_name();
        if self.by_name.contains_key(&key) {
            return Err(ModelError::DuplicateClass { name: key });
        }

        let mut seen = HashSet::new();
        for field in &class.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(ModelError::DuplicateField {
                    class: key,
                    field: field.name.clone(),
                });
            }
        }

        let id = ClassId(self.classes.len());
        self.classes.push(class);
        self.by_name.insert(key, id);
        Ok(id)
    }

    /// Make `parent` the superclass of `child`.
    pub fn extend(&mut self, child: ClassId, parent: ClassId) -> Result<(), ModelError> {
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == child {
                return Err(ModelError::InheritanceCycle {
                    class: self.get(child).qualified_name(),
                });
            }
            current = self.superclass_of(id);
        }
        self.get_mut(child).superclass = Some(Superclass::Defined(parent));
        Ok(())
    }

    /// Make a class outside the model the superclass of `child`.
    pub fn extend_external(&mut self, child: ClassId, name: impl Into<String>) {
        self.get_mut(child).superclass = Some(Superclass::External(name.into()));
    }

    /// # Panics
    ///
    /// Panics if `id` was not handed out by this model.
    pub fn get(&self, id: ClassId) -> &ClassDescriptor {
        &self.classes[id.0]
    }

    /// # Panics
    ///
    /// Panics if `id` was not handed out by this model.
    pub fn get_mut(&mut self, id: ClassId) -> &mut ClassDescriptor {
        &mut self.classes[id.0]
    }

    /// Look a class up by qualified name, falling back to a unique simple name.
    pub fn find(&self, name: &str) -> Option<ClassId> {
        if let Some(id) = self.by_name.get(name) {
            return Some(*id);
        }
        let mut matches = self.iter().filter(|(_, class)| class.name == name).map(|(id, _)| id);
        match (matches.next(), matches.next()) {
            (Some(id), None) => Some(id),
            _ => None,
        }
    }

    /// The in-model superclass of `id`, if any.
    pub fn superclass_of(&self, id: ClassId) -> Option<ClassId> {
        match self.get(id).superclass {
            Some(Superclass::Defined(parent)) => Some(parent),
            _ => None,
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = ClassId> + use<> {
        (0..self.classes.len()).map(ClassId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &ClassDescriptor)> {
        self.classes.iter().enumerate().map(|(i, class)| (ClassId(i), class))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_uses_simple_parameter_names() {
        assert_eq!(
            MethodSignature::new("equals", ["java.lang.Object"]),
            MethodSignature::equals_method()
        );
        assert_eq!(MethodSignature::new("put", ["java.util.Map<String, Object>"]).params(), ["Map"]);
        assert_eq!(MethodSignature::equals_method().to_string(), "equals(Object)");
    }

    #[test]
    fn test_add_class_rejects_duplicates() {
        let mut model = ClassModel::new();
        model.add_class(ClassDescriptor::new("A").in_package("p")).unwrap();
        let err = model.add_class(ClassDescriptor::new("A").in_package("p")).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateClass { ref name } if name == "p.A"));

        // Same simple name in another package is fine.
        assert!(model.add_class(ClassDescriptor::new("A").in_package("q")).is_ok());
    }

    #[test]
    fn test_add_class_rejects_duplicate_fields() {
        let mut model = ClassModel::new();
        let class = ClassDescriptor::new("A")
            .with_field(FieldDescriptor::new("x", "int"))
            .with_field(FieldDescriptor::new_static("x", "int"));
        let err = model.add_class(class).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateField { ref field, .. } if field == "x"));
    }

    #[test]
    fn test_extend_rejects_cycles() {
        let mut model = ClassModel::new();
        let a = model.add_class(ClassDescriptor::new("A")).unwrap();
        let b = model.add_class(ClassDescriptor::new("B")).unwrap();
        let c = model.add_class(ClassDescriptor::new("C")).unwrap();
        model.extend(a, b).unwrap();
        model.extend(b, c).unwrap();

        assert!(matches!(model.extend(c, a), Err(ModelError::InheritanceCycle { .. })));
        assert!(matches!(model.extend(a, a), Err(ModelError::InheritanceCycle { .. })));
        assert_eq!(model.superclass_of(c), None);
    }

    #[test]
    fn test_find_by_simple_name_requires_unique_match() {
        let mut model = ClassModel::new();
        let a = model.add_class(ClassDescriptor::new("A").in_package("p")).unwrap();
        model.add_class(ClassDescriptor::new("B").in_package("p")).unwrap();
        model.add_class(ClassDescriptor::new("B").in_package("q")).unwrap();

        assert_eq!(model.find("p.A"), Some(a));
        assert_eq!(model.find("A"), Some(a));
        assert_eq!(model.find("B"), None);
        assert!(model.find("q.B").is_some());
    }

    #[test]
    fn test_declare_method() {
        let mut class = ClassDescriptor::new("A");
        assert!(!class.has_method(&MethodSignature::to_string_method()));
        assert!(class.declare_method(MethodSignature::to_string_method()));
        assert!(!class.declare_method(MethodSignature::no_args("toString")));
        assert!(class.has_method(&MethodSignature::to_string_method()));
    }

    #[test]
    fn test_declared_methods_exclude_generated_ones() {
        let mut model = ClassModel::new();
        let id = model
            .add_class(
                ClassDescriptor::new("Money")
                    .with_field(FieldDescriptor::new("amount", "long"))
                    .with_method_source(
                        MethodSignature::equals_method(),
                        "public boolean equals(Object other) { return other == this; }",
                    )
                    .with_method(MethodSignature::no_args("currency")),
            )
            .unwrap();
        crate::plugin::GuavaPlugin::new().run(&mut model);

        let class = model.get(id);
        let declared: Vec<String> = class.declared_methods().map(ToString::to_string).collect();
        assert_eq!(declared, ["currency()", "equals(Object)"]);
        let missing: Vec<String> = class.methods_without_source().map(ToString::to_string).collect();
        assert_eq!(missing, ["currency()"]);
        assert!(class.method_source(&MethodSignature::equals_method()).is_some());
    }
}
