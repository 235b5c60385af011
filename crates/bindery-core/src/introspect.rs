//! Capability tables of bindable types.
//!
//! A presentation model describes its methods once through [`Introspect`]:
//!
//! ```rust,ignore
//! impl Introspect for ContactPmo {
//!     fn introspect(class: &mut ClassBuilder<Self>) {
//!         class
//!             .getter("getName", |p: &Self| p.name.clone())
//!             .annotate(UiField::text_field(1).label("Name"))
//!             .setter("setName", |p: &mut Self, v: String| p.name = v)
//!             .getter("isNameEnabled", |p: &Self| !p.locked);
//!     }
//! }
//! ```
//!
//! The resulting [`ClassInfo`] is built on first use and shared process-wide.
//! Bound types are static for the lifetime of the process, so the table is
//! never evicted.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::annotation::{Annotation, ClassAnnotation, UiSection};
use crate::value::{Value, ValueError};

pub type ReadFn = Arc<dyn Fn(&dyn Any) -> Result<Value, String> + Send + Sync>;
pub type WriteFn = Arc<dyn Fn(&mut dyn Any, Value) -> Result<(), String> + Send + Sync>;
pub type ActionFn = Arc<dyn Fn(&mut dyn Any) -> Result<(), String> + Send + Sync>;
pub type ModelObjectFn = Arc<dyn Fn(&dyn Any) -> Option<ObjectRef> + Send + Sync>;

/// Shared handle to a PMO or model object.
pub type ObjectRef = Rc<RefCell<dyn Bindable>>;

// ── Traits ────────────────────────────────────────────────────────────────

/// Implemented by every type that can be bound to UI components.
pub trait Introspect: Any + Sized {
    fn introspect(class: &mut ClassBuilder<Self>);
}

/// Object-safe view of an [`Introspect`] value.
pub trait Bindable: Any {
    fn class_info(&self) -> Arc<ClassInfo>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Introspect> Bindable for T {
    fn class_info(&self) -> Arc<ClassInfo> {
        ClassInfo::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Wraps a value into a shared [`ObjectRef`].
pub fn object_ref<T: Introspect>(value: T) -> ObjectRef {
    Rc::new(RefCell::new(value))
}

/// Pointer identity of two bound objects.
#[inline]
pub fn same_object(a: &ObjectRef, b: &ObjectRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Short class name of a bound object, used in diagnostics.
pub fn class_name_of(object: &ObjectRef) -> String {
    match object.try_borrow() {
        Ok(obj) => obj.class_info().name().to_string(),
        Err(_) => "<borrowed object>".to_string(),
    }
}

// ── MethodInfo ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub enum MethodKind {
    Getter(ReadFn),
    Setter(WriteFn),
    Action(ActionFn),
    ModelObject { name: String, get: ModelObjectFn },
    /// Carries annotations only; the accessors live on the model object.
    Marker,
}

impl MethodKind {
    fn label(&self) -> &'static str {
        match self {
            MethodKind::Getter(_) => "getter",
            MethodKind::Setter(_) => "setter",
            MethodKind::Action(_) => "action",
            MethodKind::ModelObject { .. } => "model object",
            MethodKind::Marker => "marker",
        }
    }
}

impl fmt::Debug for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodKind::ModelObject { name, .. } => write!(f, "ModelObject({name:?})"),
            other => f.write_str(other.label()),
        }
    }
}

/// One registered method with the annotations attached to it.
#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub name: String,
    pub kind: MethodKind,
    pub annotations: Vec<Annotation>,
}

impl MethodInfo {
    pub fn is_getter(&self) -> bool {
        matches!(self.kind, MethodKind::Getter(_))
    }

    pub fn is_setter(&self) -> bool {
        matches!(self.kind, MethodKind::Setter(_))
    }

    pub fn is_action(&self) -> bool {
        matches!(self.kind, MethodKind::Action(_))
    }

    /// The model object name if this method supplies one.
    pub fn model_object_name(&self) -> Option<&str> {
        match &self.kind {
            MethodKind::ModelObject { name, .. } => Some(name),
            _ => None,
        }
    }
}

// ── ClassInfo ─────────────────────────────────────────────────────────────

static CLASSES: Lazy<RwLock<HashMap<TypeId, Arc<ClassInfo>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Immutable capability table of one bindable type.
#[derive(Debug)]
pub struct ClassInfo {
    type_id: TypeId,
    name: String,
    methods: Vec<MethodInfo>,
    class_annotations: Vec<ClassAnnotation>,
    dangling_annotations: usize,
}

impl ClassInfo {
    /// Returns the cached table of `T`, building it on first use.
    pub fn of<T: Introspect>() -> Arc<ClassInfo> {
        let type_id = TypeId::of::<T>();
        if let Some(info) = CLASSES.read().get(&type_id) {
            return Arc::clone(info);
        }

        // Built outside the lock; introspection may look up other classes.
        let mut builder = ClassBuilder::<T>::new();
        T::introspect(&mut builder);
        let info = Arc::new(builder.finish());
        log::debug!(
            "introspected class {} ({} methods)",
            info.name,
            info.methods.len()
        );

        Arc::clone(CLASSES.write().entry(type_id).or_insert(info))
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Short type name without the module path.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Methods in declaration order.
    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn class_annotations(&self) -> &[ClassAnnotation] {
        &self.class_annotations
    }

    pub fn section(&self) -> Option<&UiSection> {
        self.class_annotations.iter().find_map(|a| match a {
            ClassAnnotation::Section(s) => Some(s),
        })
    }

    /// All methods supplying the model object called `name`.
    pub fn model_object_methods<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodInfo> + 'a {
        self.methods
            .iter()
            .filter(move |m| m.model_object_name() == Some(name))
    }

    pub(crate) fn dangling_annotations(&self) -> usize {
        self.dangling_annotations
    }
}

fn short_type_name(full: &str) -> String {
    let (base, generics) = match full.find('<') {
        Some(i) => full.split_at(i),
        None => (full, ""),
    };
    let base = base.rsplit("::").next().unwrap_or(base);
    format!("{base}{generics}")
}

// ── ClassBuilder ──────────────────────────────────────────────────────────

/// Collects the methods and annotations of `T` during [`Introspect::introspect`].
pub struct ClassBuilder<T> {
    methods: Vec<MethodInfo>,
    class_annotations: Vec<ClassAnnotation>,
    dangling_annotations: usize,
    _marker: PhantomData<fn(T)>,
}

impl<T: Introspect> ClassBuilder<T> {
    fn new() -> Self {
        Self {
            methods: Vec::new(),
            class_annotations: Vec::new(),
            dangling_annotations: 0,
            _marker: PhantomData,
        }
    }

    fn push(&mut self, name: &str, kind: MethodKind) -> &mut Self {
        self.methods.push(MethodInfo {
            name: name.to_string(),
            kind,
            annotations: Vec::new(),
        });
        self
    }

    fn downcast_error() -> String {
        format!("object is not a {}", short_type_name(std::any::type_name::<T>()))
    }

    /// Registers a `get<X>`/`is<X>` style method.
    pub fn getter<V, F>(&mut self, name: &str, f: F) -> &mut Self
    where
        V: Into<Value> + 'static,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        let read: ReadFn = Arc::new(move |obj: &dyn Any| {
            obj.downcast_ref::<T>()
                .map(|t| f(t).into())
                .ok_or_else(Self::downcast_error)
        });
        self.push(name, MethodKind::Getter(read))
    }

    /// Registers a `set<X>` method. The incoming value is converted with
    /// `TryFrom`; a conversion failure is reported as an access error.
    pub fn setter<V, F>(&mut self, name: &str, f: F) -> &mut Self
    where
        V: TryFrom<Value> + 'static,
        V::Error: Into<ValueError>,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let write: WriteFn = Arc::new(move |obj: &mut dyn Any, value: Value| {
            let target = obj.downcast_mut::<T>().ok_or_else(Self::downcast_error)?;
            let converted = V::try_from(value).map_err(|e| e.into().to_string())?;
            f(target, converted);
            Ok(())
        });
        self.push(name, MethodKind::Setter(write))
    }

    /// Registers an argument-less action, typically bound to a button.
    pub fn action<F>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        let action: ActionFn = Arc::new(move |obj: &mut dyn Any| {
            let target = obj.downcast_mut::<T>().ok_or_else(Self::downcast_error)?;
            f(target);
            Ok(())
        });
        self.push(name, MethodKind::Action(action))
    }

    /// Registers a method supplying the model object called `model_object`.
    pub fn model_object<F>(&mut self, name: &str, model_object: &str, f: F) -> &mut Self
    where
        F: Fn(&T) -> Option<ObjectRef> + Send + Sync + 'static,
    {
        let get: ModelObjectFn =
            Arc::new(move |obj: &dyn Any| obj.downcast_ref::<T>().and_then(|t| f(t)));
        self.push(
            name,
            MethodKind::ModelObject {
                name: model_object.to_string(),
                get,
            },
        )
    }

    /// Registers a method that only carries annotations, for properties read
    /// and written entirely through the model object.
    pub fn marker(&mut self, name: &str) -> &mut Self {
        self.push(name, MethodKind::Marker)
    }

    /// Attaches an annotation to the most recently registered method.
    pub fn annotate(&mut self, annotation: impl Into<Annotation>) -> &mut Self {
        match self.methods.last_mut() {
            Some(method) => method.annotations.push(annotation.into()),
            None => self.dangling_annotations += 1,
        }
        self
    }

    /// Attaches a class-level annotation.
    pub fn annotate_class(&mut self, annotation: impl Into<ClassAnnotation>) -> &mut Self {
        self.class_annotations.push(annotation.into());
        self
    }

    fn finish(self) -> ClassInfo {
        ClassInfo {
            type_id: TypeId::of::<T>(),
            name: short_type_name(std::any::type_name::<T>()),
            methods: self.methods,
            class_annotations: self.class_annotations,
            dangling_annotations: self.dangling_annotations,
        }
    }
}
