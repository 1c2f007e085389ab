//! Serialized form of a class model, as written by upstream tooling.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ClassDescriptor, ClassModel, FieldDescriptor, MethodSignature};
use crate::errors::ModelError;

/// Top-level model document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSchema {
    /// Package applied to classes that do not name their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    #[serde(default)]
    pub classes: Vec<ClassSchema>,
}

/// One class entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSchema {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Superclass name. Resolved against the classes of the same document;
    /// anything else is an external superclass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    #[serde(default, rename = "abstract", skip_serializing_if = "is_false")]
    pub is_abstract: bool,

    #[serde(default)]
    pub fields: Vec<FieldSchema>,

    /// Methods the class already declares.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodSchema>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,

    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: String,

    #[serde(default, rename = "static", skip_serializing_if = "is_false")]
    pub is_static: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodSchema {
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,

    /// Full Java source of the method, copied into the rendered class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

fn default_field_type() -> String {
    "Object".to_string()
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl ModelSchema {
    pub fn from_toml_str(content: &str) -> Result<Self, ModelError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a document, choosing the parser from the file extension.
    pub fn read(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(ModelError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Combine documents into one, pinning each document's default package
    /// onto its classes first.
    pub fn merge<I: IntoIterator<Item = ModelSchema>>(schemas: I) -> Self {
        let classes = schemas
            .into_iter()
            .flat_map(|schema| {
                let package = schema.package;
                schema.classes.into_iter().map(move |mut class| {
                    if class.package.is_none() {
                        class.package = package.clone();
                    }
                    class
                })
            })
            .collect();
        Self { package: None, classes }
    }

    /// Build a [`ClassModel`] from this document.
    ///
    /// Classes are added in document order. `extends` is resolved in a second
    /// pass so a subclass may be listed before its superclass.
    pub fn into_model(self) -> Result<ClassModel, ModelError> {
        let mut model = ClassModel::new();
        let mut pending = Vec::with_capacity(self.classes.len());

        for class in self.classes {
            let package = class.package.or_else(|| self.package.clone());
            let mut descriptor = ClassDescriptor::new(class.name);
            descriptor.package = package;
            descriptor.is_abstract = class.is_abstract;
            descriptor.fields = class
                .fields
                .into_iter()
                .map(|f| FieldDescriptor {
                    name: f.name,
                    field_type: f.field_type,
                    is_static: f.is_static,
                })
                .collect();
            for method in class.methods {
                let signature = MethodSignature::new(method.name, method.params);
                match method.source {
                    Some(source) => descriptor.declare_method_source(signature, source),
                    None => {
                        descriptor.declare_method(signature);
                    }
                }
            }

            let id = model.add_class(descriptor)?;
            if let Some(extends) = class.extends {
                pending.push((id, extends));
            }
        }

        for (id, extends) in pending {
            match resolve(&model, id, &extends) {
                Some(parent) => model.extend(id, parent)?,
                None => model.extend_external(id, extends),
            }
        }

        Ok(model)
    }
}

/// Resolve a superclass name relative to the package of the subclass.
fn resolve(model: &ClassModel, child: super::ClassId, name: &str) -> Option<super::ClassId> {
    if name.contains('.') {
        return model.find(name);
    }
    let sibling = match &model.get(child).package {
        Some(package) if !package.is_empty() => format!("{package}.{name}"),
        _ => name.to_string(),
    };
    model.find(&sibling).or_else(|| model.find(name))
}

/// Load a single model file.
pub fn load_model(path: &Path) -> Result<ClassModel, ModelError> {
    ModelSchema::read(path)?.into_model()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Superclass;

    const SAMPLE: &str = r#"
        package = "com.example"

        [[classes]]
        name = "Order"
        extends = "Document"
        fields = [
            { name = "total", type = "java.math.BigDecimal" },
            { name = "serialVersionUID", type = "long", static = true },
        ]
        methods = [{ name = "toString" }]

        [[classes]]
        name = "Document"
        abstract = true
        extends = "java.io.Serializable"
        fields = [{ name = "id" }]
    "#;

    #[test]
    fn test_parse_toml_model() {
        let model = ModelSchema::from_toml_str(SAMPLE).unwrap().into_model().unwrap();
        assert_eq!(model.len(), 2);

        let order = model.find("com.example.Order").unwrap();
        let document = model.find("Document").unwrap();
        assert_eq!(model.superclass_of(order), Some(document));

        let order = model.get(order);
        assert_eq!(order.fields.len(), 2);
        assert!(order.fields[1].is_static);
        assert!(order.has_method(&MethodSignature::to_string_method()));

        let document = model.get(document);
        assert!(document.is_abstract);
        assert_eq!(document.fields[0].field_type, "Object");
        assert_eq!(
            document.superclass,
            Some(Superclass::External("java.io.Serializable".to_string()))
        );
    }

    #[test]
    fn test_parse_json_model() {
        let json = r#"{
            "classes": [
                { "name": "Point", "fields": [{ "name": "x", "type": "int" }, { "name": "y", "type": "int" }],
                  "methods": [{ "name": "equals", "params": ["java.lang.Object"],
                                "source": "public boolean equals(Object o) { return this == o; }" }] }
            ]
        }"#;
        let model = ModelSchema::from_json_str(json).unwrap().into_model().unwrap();
        let point = model.get(model.find("Point").unwrap());
        assert_eq!(point.package, None);
        assert!(point.has_method(&MethodSignature::equals_method()));
        assert_eq!(
            point.method_source(&MethodSignature::equals_method()),
            Some("public boolean equals(Object o) { return this == o; }")
        );
    }

    #[test]
    fn test_cycle_in_document_is_rejected() {
        let toml = r#"
            [[classes]]
            name = "A"
            extends = "B"

            [[classes]]
            name = "B"
            extends = "A"
        "#;
        let err = ModelSchema::from_toml_str(toml).unwrap().into_model().unwrap_err();
        assert!(matches!(err, ModelError::InheritanceCycle { .. }));
    }

    #[test]
    fn test_load_model_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.yaml");
        std::fs::write(&path, "classes: []").unwrap();
        assert!(matches!(load_model(&path), Err(ModelError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_load_model_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        let model = load_model(&path).unwrap();
        assert!(model.find("Order").is_some());
    }
}
