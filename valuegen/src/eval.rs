//! Interpreter for generated method trees.
//!
//! Runs synthesized `equals`, `hashCode` and `toString` bodies against
//! in-memory instances with Java semantics: `Objects.hash` combines with
//! `31 * acc + h` seeded at 1 in wrapping 32-bit arithmetic, `Objects.equals`
//! is null-safe, and the string helper renders `Name{label=value, ...}`.
//! Calls dispatch like the JVM would: the nearest generated method on the
//! runtime class or its ancestors, falling back to `Object` identity
//! semantics when none exists.
//!
//! Instances are immutable once created, so object graphs are acyclic.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::classify::IdentityFields;
use crate::errors::EvalError;
use crate::model::{ClassId, ClassModel};
use crate::tree::{BinOp, Expr, GeneratedMethod, MethodKind, Stmt, ToStringRequest};

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Str(String),
    Object(ObjectRef),
    /// Result of `getClass()` on a model instance.
    Class(ClassId),
    /// Result of `getClass()` on a boxed primitive or string.
    LangClass(&'static str),
}

impl Value {
    fn describe(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(_) => "boolean".to_string(),
            Self::Int(_) => "int".to_string(),
            Self::Long(_) => "long".to_string(),
            Self::Str(_) => "String".to_string(),
            Self::Object(_) => "object".to_string(),
            Self::Class(_) | Self::LangClass(_) => "Class".to_string(),
        }
    }

    /// Runtime class of a non-object value once boxed.
    fn lang_class(&self) -> &'static str {
        match self {
            Self::Bool(_) => "java.lang.Boolean",
            Self::Int(_) => "java.lang.Integer",
            Self::Long(_) => "java.lang.Long",
            Self::Str(_) => "java.lang.String",
            Self::Null | Self::Object(_) | Self::Class(_) | Self::LangClass(_) => "java.lang.Class",
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<ObjectRef> for Value {
    fn from(value: ObjectRef) -> Self {
        Self::Object(value)
    }
}

/// Shared reference to an instance; clones alias the same object.
#[derive(Debug, Clone)]
pub struct ObjectRef(Rc<Instance>);

#[derive(Debug)]
struct Instance {
    class: ClassId,
    identity: i32,
    fields: HashMap<String, Value>,
}

impl ObjectRef {
    pub fn class(&self) -> ClassId {
        self.0.class
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.fields.get(name)
    }

    /// Reference identity (`==` on objects).
    pub fn same(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

struct Frame {
    this: ObjectRef,
    locals: HashMap<String, Value>,
}

/// Evaluates generated methods of one [`ClassModel`].
pub struct Interpreter<'m> {
    model: &'m ClassModel,
    next_identity: Cell<i32>,
}

impl<'m> Interpreter<'m> {
    pub fn new(model: &'m ClassModel) -> Self {
        Self {
            model,
            next_identity: Cell::new(0x1b6d_3586),
        }
    }

    /// Create an instance of `class`. Unset instance fields start as `null`;
    /// inherited instance fields may be set too.
    pub fn instantiate<'a, I>(&self, class: ClassId, values: I) -> Result<ObjectRef, EvalError>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let mut fields: HashMap<String, Value> = IdentityFields::of(self.model, class)
            .iter()
            .map(|field| (field.name.clone(), Value::Null))
            .collect();

        for (name, value) in values {
            match fields.get_mut(name) {
                Some(slot) => *slot = value,
                None => {
                    return Err(EvalError::NoSuchField {
                        class: self.model.get(class).qualified_name(),
                        field: name.to_string(),
                    });
                }
            }
        }

        let identity = self.next_identity.get();
        self.next_identity.set(identity.wrapping_add(0x9e37));
        Ok(ObjectRef(Rc::new(Instance {
            class,
            identity,
            fields,
        })))
    }

    /// `this.equals(other)`.
    pub fn equals(&self, this: &ObjectRef, other: &Value) -> Result<bool, EvalError> {
        expect_bool(self.invoke(this, MethodKind::Equals, vec![other.clone()])?)
    }

    /// `this.hashCode()`.
    pub fn hash_code(&self, this: &ObjectRef) -> Result<i32, EvalError> {
        match self.invoke(this, MethodKind::HashCode, Vec::new())? {
            Value::Int(hash) => Ok(hash),
            other => Err(EvalError::TypeMismatch {
                expected: "int",
                found: other.describe(),
            }),
        }
    }

    /// `this.toString()`.
    pub fn to_java_string(&self, this: &ObjectRef) -> Result<String, EvalError> {
        match self.invoke(this, MethodKind::ToString, Vec::new())? {
            Value::Str(text) => Ok(text),
            other => Err(EvalError::TypeMismatch {
                expected: "String",
                found: other.describe(),
            }),
        }
    }

    /// Nearest generated method of `kind` on `class` or its ancestors.
    fn resolve(&self, class: ClassId, kind: MethodKind) -> Result<Option<&'m GeneratedMethod>, EvalError> {
        let signature = kind.signature();
        let mut visited = HashSet::new();
        let mut current = Some(class);

        while let Some(id) = current {
            if !visited.insert(id) {
                break;
            }
            let descriptor = self.model.get(id);
            if let Some(method) = descriptor.generated_methods().iter().find(|m| m.kind == kind) {
                return Ok(Some(method));
            }
            if descriptor.has_method(&signature) {
                return Err(EvalError::OpaqueMethod {
                    class: descriptor.qualified_name(),
                    method: kind.method_name(),
                });
            }
            current = self.model.superclass_of(id);
        }

        Ok(None)
    }

    fn invoke(&self, this: &ObjectRef, kind: MethodKind, args: Vec<Value>) -> Result<Value, EvalError> {
        match self.resolve(this.class(), kind)? {
            Some(method) => self.run(method, this, args),
            None => Ok(self.object_default(this, kind, &args)),
        }
    }

    /// `java.lang.Object` behavior.
    fn object_default(&self, this: &ObjectRef, kind: MethodKind, args: &[Value]) -> Value {
        match kind {
            MethodKind::Equals => Value::Bool(matches!(args.first(), Some(Value::Object(other)) if this.same(other))),
            MethodKind::HashCode => Value::Int(this.0.identity),
            MethodKind::ToString => Value::Str(format!(
                "{}@{:x}",
                self.model.get(this.class()).qualified_name(),
                this.0.identity
            )),
        }
    }

    fn run(&self, method: &GeneratedMethod, this: &ObjectRef, args: Vec<Value>) -> Result<Value, EvalError> {
        let locals = method.params.iter().map(|p| p.name.clone()).zip(args).collect();
        let mut frame = Frame {
            this: this.clone(),
            locals,
        };
        self.exec(&mut frame, &method.body)?.ok_or(EvalError::MissingReturn)
    }

    fn exec(&self, frame: &mut Frame, stmts: &[Stmt]) -> Result<Option<Value>, EvalError> {
        for stmt in stmts {
            match stmt {
                Stmt::If { cond, then } => {
                    if expect_bool(self.eval(frame, cond)?)?
                        && let Some(value) = self.exec(frame, then)?
                    {
                        return Ok(Some(value));
                    }
                }
                Stmt::Final { name, init, .. } => {
                    let value = self.eval(frame, init)?;
                    frame.locals.insert(name.clone(), value);
                }
                Stmt::Return(expr) => return self.eval(frame, expr).map(Some),
            }
        }
        Ok(None)
    }

    fn eval(&self, frame: &Frame, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::This => Ok(Value::Object(frame.this.clone())),
            Expr::Null => Ok(Value::Null),
            Expr::Bool(value) => Ok(Value::Bool(*value)),
            Expr::Local(name) => frame
                .locals
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UnboundLocal(name.clone())),
            Expr::Field { target: None, name } => self.read_field(&frame.this, name),
            Expr::Field {
                target: Some(target),
                name,
            } => match self.eval(frame, target)? {
                Value::Object(object) => self.read_field(&object, name),
                Value::Null => Err(EvalError::NullPointer(format!("field '{name}'"))),
                other => Err(EvalError::TypeMismatch {
                    expected: "object",
                    found: other.describe(),
                }),
            },
            Expr::Call { target, method, args } => {
                let receiver = match target {
                    Some(target) => self.eval(frame, target)?,
                    None => Value::Object(frame.this.clone()),
                };
                let args = self.eval_args(frame, args)?;
                self.call(receiver, method, args)
            }
            Expr::StaticCall { class, method, args } => {
                let args = self.eval_args(frame, args)?;
                match (method.as_str(), args.as_slice()) {
                    ("hash", values) => self.hash_all(values).map(Value::Int),
                    ("equals", [a, b]) => self.objects_equal(a, b).map(Value::Bool),
                    _ => Err(EvalError::UnsupportedCall(format!("{}.{method}", class.qualified()))),
                }
            }
            Expr::Cast { ty, expr } => {
                let value = self.eval(frame, expr)?;
                self.cast(value, ty)
            }
            Expr::Binary { op, lhs, rhs } => match op {
                BinOp::And => {
                    let result =
                        expect_bool(self.eval(frame, lhs)?)? && expect_bool(self.eval(frame, rhs)?)?;
                    Ok(Value::Bool(result))
                }
                BinOp::RefEq => Ok(Value::Bool(same_reference(&self.eval(frame, lhs)?, &self.eval(frame, rhs)?))),
                BinOp::RefNe => Ok(Value::Bool(!same_reference(&self.eval(frame, lhs)?, &self.eval(frame, rhs)?))),
            },
            Expr::ToStringHelper(request) => self.helper_string(&frame.this, request).map(Value::Str),
        }
    }

    fn eval_args(&self, frame: &Frame, args: &[Expr]) -> Result<Vec<Value>, EvalError> {
        args.iter().map(|arg| self.eval(frame, arg)).collect()
    }

    fn read_field(&self, object: &ObjectRef, name: &str) -> Result<Value, EvalError> {
        object.field(name).cloned().ok_or_else(|| EvalError::NoSuchField {
            class: self.model.get(object.class()).qualified_name(),
            field: name.to_string(),
        })
    }

    fn call(&self, receiver: Value, method: &str, args: Vec<Value>) -> Result<Value, EvalError> {
        match (&receiver, method, args.as_slice()) {
            (Value::Null, ..) => Err(EvalError::NullPointer(format!("call to {method}()"))),
            (Value::Object(object), "getClass", []) => Ok(Value::Class(object.class())),
            (_, "getClass", []) => Ok(Value::LangClass(receiver.lang_class())),
            (Value::Object(object), "equals", [other]) => self.invoke(object, MethodKind::Equals, vec![other.clone()]),
            (Value::Object(object), "hashCode", []) => self.invoke(object, MethodKind::HashCode, Vec::new()),
            (Value::Object(object), "toString", []) => self.invoke(object, MethodKind::ToString, Vec::new()),
            (_, "hashCode", []) => self.hash_value(&receiver).map(Value::Int),
            (_, "toString", []) => self.display(&receiver).map(Value::Str),
            (_, "equals", [other]) => self.objects_equal(&receiver, other).map(Value::Bool),
            _ => Err(EvalError::UnsupportedCall(format!("{}.{method}", receiver.describe()))),
        }
    }

    fn cast(&self, value: Value, ty: &str) -> Result<Value, EvalError> {
        match &value {
            Value::Null => Ok(value),
            Value::Object(object) if self.is_instance_of(object.class(), ty) => Ok(value),
            Value::Object(object) => Err(EvalError::ClassCast {
                found: self.model.get(object.class()).qualified_name(),
                target: ty.to_string(),
            }),
            other => Err(EvalError::ClassCast {
                found: other.describe(),
                target: ty.to_string(),
            }),
        }
    }

    fn is_instance_of(&self, class: ClassId, ty: &str) -> bool {
        let mut visited = HashSet::new();
        let mut current = Some(class);
        while let Some(id) = current {
            if !visited.insert(id) {
                break;
            }
            let descriptor = self.model.get(id);
            if descriptor.name == ty || descriptor.qualified_name() == ty {
                return true;
            }
            current = self.model.superclass_of(id);
        }
        false
    }

    /// `Objects.equals(a, b)`.
    fn objects_equal(&self, a: &Value, b: &Value) -> Result<bool, EvalError> {
        if same_reference(a, b) {
            return Ok(true);
        }
        match (a, b) {
            (Value::Null, _) => Ok(false),
            (Value::Object(object), _) => self.equals(object, b),
            (Value::Bool(x), Value::Bool(y)) => Ok(x == y),
            (Value::Int(x), Value::Int(y)) => Ok(x == y),
            (Value::Long(x), Value::Long(y)) => Ok(x == y),
            (Value::Str(x), Value::Str(y)) => Ok(x == y),
            _ => Ok(false),
        }
    }

    /// `Objects.hash(values...)`.
    fn hash_all(&self, values: &[Value]) -> Result<i32, EvalError> {
        values
            .iter()
            .try_fold(1i32, |acc, value| Ok(acc.wrapping_mul(31).wrapping_add(self.hash_value(value)?)))
    }

    /// Boxed `hashCode()`, 0 for null.
    fn hash_value(&self, value: &Value) -> Result<i32, EvalError> {
        Ok(match value {
            Value::Null => 0,
            Value::Bool(true) => 1231,
            Value::Bool(false) => 1237,
            Value::Int(v) => *v,
            Value::Long(v) => (*v ^ ((*v as u64) >> 32) as i64) as i32,
            Value::Str(s) => string_hash(s),
            Value::Object(object) => return self.hash_code(object),
            Value::Class(id) => id.index() as i32,
            Value::LangClass(name) => string_hash(name),
        })
    }

    /// `String.valueOf(value)`.
    fn display(&self, value: &Value) -> Result<String, EvalError> {
        Ok(match value {
            Value::Null => "null".to_string(),
            Value::Bool(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Long(v) => v.to_string(),
            Value::Str(s) => s.clone(),
            Value::Object(object) => return self.to_java_string(object),
            Value::Class(id) => format!("class {}", self.model.get(*id).qualified_name()),
            Value::LangClass(name) => format!("class {name}"),
        })
    }

    /// The header is the runtime class's simple name, as the helper derives it
    /// from `this.getClass()`.
    fn helper_string(&self, this: &ObjectRef, request: &ToStringRequest) -> Result<String, EvalError> {
        let mut parts = Vec::with_capacity(request.entries.len());
        for entry in &request.entries {
            let value = self.read_field(this, &entry.field)?;
            if request.omit_nulls && matches!(value, Value::Null) {
                continue;
            }
            parts.push(format!("{}={}", entry.label, self.display(&value)?));
        }
        Ok(format!("{}{{{}}}", self.model.get(this.class()).name, parts.join(", ")))
    }
}

fn expect_bool(value: Value) -> Result<bool, EvalError> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(EvalError::TypeMismatch {
            expected: "boolean",
            found: other.describe(),
        }),
    }
}

/// Java `==`: identity for references, value equality for primitives.
fn same_reference(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Object(x), Value::Object(y)) => x.same(y),
        (Value::Class(x), Value::Class(y)) => x == y,
        (Value::LangClass(x), Value::LangClass(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Long(x), Value::Long(y)) => x == y,
        _ => false,
    }
}

/// `String.hashCode()` over UTF-16 code units.
fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |acc, unit| acc.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassDescriptor, FieldDescriptor, MethodSignature};
    use crate::synth::{SynthOptions, synthesize};

    fn generate_all(model: &mut ClassModel) {
        for id in model.ids() {
            synthesize(model, id, &SynthOptions::default()).apply(model);
        }
    }

    fn point_model() -> (ClassModel, ClassId) {
        let mut model = ClassModel::new();
        let point = model
            .add_class(
                ClassDescriptor::new("Point")
                    .with_field(FieldDescriptor::new("x", "int"))
                    .with_field(FieldDescriptor::new("label", "String")),
            )
            .unwrap();
        generate_all(&mut model);
        (model, point)
    }

    #[test]
    fn test_java_hash_primitives() {
        assert_eq!(string_hash("hello"), 99_162_322);
        assert_eq!(string_hash(""), 0);

        let model = ClassModel::new();
        let interp = Interpreter::new(&model);
        assert_eq!(interp.hash_value(&Value::Bool(true)).unwrap(), 1231);
        assert_eq!(interp.hash_value(&Value::Long(1 << 32)).unwrap(), 1);
        assert_eq!(interp.hash_value(&Value::Long(-1)).unwrap(), 0);
        assert_eq!(interp.hash_all(&[Value::Int(1), Value::Int(2)]).unwrap(), 994);
        assert_eq!(interp.hash_all(&[Value::Null]).unwrap(), 31);
        assert_eq!(interp.hash_all(&[]).unwrap(), 1);
    }

    #[test]
    fn test_generated_hash_matches_objects_hash() {
        let (model, point) = point_model();
        let interp = Interpreter::new(&model);
        let p = interp
            .instantiate(point, [("x", Value::Int(3)), ("label", "a".into())])
            .unwrap();
        // Objects.hash(3, "a") = 31 * (31 + 3) + 97
        assert_eq!(interp.hash_code(&p).unwrap(), 1151);
    }

    #[test]
    fn test_generated_to_string_omits_nulls() {
        let (model, point) = point_model();
        let interp = Interpreter::new(&model);
        let full = interp
            .instantiate(point, [("x", Value::Int(3)), ("label", "a".into())])
            .unwrap();
        let partial = interp.instantiate(point, [("x", Value::Int(-7))]).unwrap();

        assert_eq!(interp.to_java_string(&full).unwrap(), "Point{x=3, label=a}");
        assert_eq!(interp.to_java_string(&partial).unwrap(), "Point{x=-7}");
    }

    #[test]
    fn test_equals_contract() {
        let (model, point) = point_model();
        let interp = Interpreter::new(&model);
        let a = interp.instantiate(point, [("x", Value::Int(1))]).unwrap();
        let b = interp.instantiate(point, [("x", Value::Int(1))]).unwrap();
        let c = interp.instantiate(point, [("x", Value::Int(2))]).unwrap();

        assert!(interp.equals(&a, &Value::Object(a.clone())).unwrap());
        assert!(!interp.equals(&a, &Value::Null).unwrap());
        assert!(interp.equals(&a, &Value::Object(b.clone())).unwrap());
        assert!(!interp.equals(&a, &Value::Object(c)).unwrap());
        assert!(!interp.equals(&a, &Value::Int(1)).unwrap());
        assert_eq!(interp.hash_code(&a).unwrap(), interp.hash_code(&b).unwrap());
    }

    #[test]
    fn test_nested_objects_dispatch() {
        let mut model = ClassModel::new();
        let inner = model
            .add_class(ClassDescriptor::new("Inner").with_field(FieldDescriptor::new("v", "int")))
            .unwrap();
        let outer = model
            .add_class(ClassDescriptor::new("Outer").with_field(FieldDescriptor::new("inner", "Inner")))
            .unwrap();
        generate_all(&mut model);

        let interp = Interpreter::new(&model);
        let i1 = interp.instantiate(inner, [("v", Value::Int(5))]).unwrap();
        let i2 = interp.instantiate(inner, [("v", Value::Int(5))]).unwrap();
        let o1 = interp.instantiate(outer, [("inner", Value::Object(i1))]).unwrap();
        let o2 = interp.instantiate(outer, [("inner", Value::Object(i2))]).unwrap();

        assert!(interp.equals(&o1, &Value::Object(o2.clone())).unwrap());
        assert_eq!(interp.hash_code(&o1).unwrap(), interp.hash_code(&o2).unwrap());
        assert_eq!(interp.to_java_string(&o1).unwrap(), "Outer{inner=Inner{v=5}}");
    }

    #[test]
    fn test_object_defaults_without_generated_methods() {
        let mut model = ClassModel::new();
        let marker = model.add_class(ClassDescriptor::new("Marker").in_package("m")).unwrap();
        let interp = Interpreter::new(&model);
        let a = interp.instantiate(marker, std::iter::empty()).unwrap();
        let b = interp.instantiate(marker, std::iter::empty()).unwrap();

        assert!(interp.equals(&a, &Value::Object(a.clone())).unwrap());
        assert!(!interp.equals(&a, &Value::Object(b)).unwrap());
        assert!(interp.to_java_string(&a).unwrap().starts_with("m.Marker@"));
    }

    #[test]
    fn test_upstream_methods_are_opaque() {
        let mut model = ClassModel::new();
        let class = model
            .add_class(
                ClassDescriptor::new("Handwritten")
                    .with_field(FieldDescriptor::new("v", "int"))
                    .with_method(MethodSignature::hash_code_method()),
            )
            .unwrap();
        generate_all(&mut model);

        let interp = Interpreter::new(&model);
        let h = interp.instantiate(class, std::iter::empty()).unwrap();
        assert!(matches!(interp.hash_code(&h), Err(EvalError::OpaqueMethod { .. })));
        assert!(interp.equals(&h, &Value::Object(h.clone())).unwrap());
    }

    #[test]
    fn test_instantiate_rejects_unknown_and_static_fields() {
        let mut model = ClassModel::new();
        let class = model
            .add_class(
                ClassDescriptor::new("C")
                    .with_field(FieldDescriptor::new("v", "int"))
                    .with_field(FieldDescriptor::new_static("S", "int")),
            )
            .unwrap();
        let interp = Interpreter::new(&model);
        assert!(matches!(
            interp.instantiate(class, [("nope", Value::Null)]),
            Err(EvalError::NoSuchField { .. })
        ));
        assert!(matches!(
            interp.instantiate(class, [("S", Value::Int(1))]),
            Err(EvalError::NoSuchField { .. })
        ));
    }
}
