//! Declarative resource representations
//!
//! A representation describes every argument of a resource or data source
//! block: whether it is required, the value used when the resource is first
//! created, and the value used when the test switches to its update step.
//! Nested blocks are described by [`RepresentationGroup`]s holding a full
//! [`RepresentationMap`] of their own.
//!
//! Representation tables are built once and never mutated; the copy helpers
//! (`updated`, `without`, `with_fields`) always return a new map.

use std::collections::BTreeMap;

/// Presence requirement of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepType {
    Required,
    Optional,
}

/// Which value variant a render uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepresentationMode {
    Create,
    Update,
}

/// A leaf value of a representation
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Rendered as a quoted string; `${...}` interpolations stay inside the quotes
    Str(String),
    Bool(bool),
    Number(f64),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
    /// Rendered verbatim, for expressions that must not be quoted
    Raw(String),
}

impl Value {
    pub fn raw(expr: impl Into<String>) -> Self {
        Value::Raw(expr.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

/// A leaf field: presence requirement plus create and update values
#[derive(Debug, Clone, PartialEq)]
pub struct Representation {
    pub rep_type: RepType,
    pub create: Value,
    pub update: Option<Value>,
}

impl Representation {
    pub fn required(create: impl Into<Value>) -> Self {
        Self {
            rep_type: RepType::Required,
            create: create.into(),
            update: None,
        }
    }

    pub fn optional(create: impl Into<Value>) -> Self {
        Self {
            rep_type: RepType::Optional,
            create: create.into(),
            update: None,
        }
    }

    pub fn with_update(mut self, update: impl Into<Value>) -> Self {
        self.update = Some(update.into());
        self
    }

    /// Value for the given mode; update falls back to the create value
    pub fn value(&self, mode: RepresentationMode) -> &Value {
        match (mode, &self.update) {
            (RepresentationMode::Update, Some(update)) => update,
            _ => &self.create,
        }
    }
}

/// A nested block described by its own representation map
#[derive(Debug, Clone, PartialEq)]
pub struct RepresentationGroup {
    pub rep_type: RepType,
    pub group: RepresentationMap,
}

impl RepresentationGroup {
    pub fn required(group: RepresentationMap) -> Self {
        Self {
            rep_type: RepType::Required,
            group,
        }
    }

    pub fn optional(group: RepresentationMap) -> Self {
        Self {
            rep_type: RepType::Optional,
            group,
        }
    }
}

/// One entry of a representation map
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Leaf(Representation),
    Group(RepresentationGroup),
    /// Repeated block; one block is rendered per element, in order
    Groups(Vec<RepresentationGroup>),
}

impl Field {
    pub fn rep_type(&self) -> RepType {
        match self {
            Field::Leaf(r) => r.rep_type,
            Field::Group(g) => g.rep_type,
            Field::Groups(gs) => {
                if gs.iter().any(|g| g.rep_type == RepType::Required) {
                    RepType::Required
                } else {
                    RepType::Optional
                }
            }
        }
    }
}

impl From<Representation> for Field {
    fn from(r: Representation) -> Self {
        Field::Leaf(r)
    }
}

impl From<RepresentationGroup> for Field {
    fn from(g: RepresentationGroup) -> Self {
        Field::Group(g)
    }
}

impl From<Vec<RepresentationGroup>> for Field {
    fn from(gs: Vec<RepresentationGroup>) -> Self {
        Field::Groups(gs)
    }
}

/// Field name to field description, iterated in lexical order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepresentationMap {
    fields: BTreeMap<String, Field>,
}

impl RepresentationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, field: impl Into<Field>) -> Self {
        self.fields.insert(name.into(), field.into());
        self
    }

    pub fn required(self, name: impl Into<String>, create: impl Into<Value>) -> Self {
        self.field(name, Representation::required(create))
    }

    pub fn optional(self, name: impl Into<String>, create: impl Into<Value>) -> Self {
        self.field(name, Representation::optional(create))
    }

    pub fn optional_with_update(
        self,
        name: impl Into<String>,
        create: impl Into<Value>,
        update: impl Into<Value>,
    ) -> Self {
        self.field(name, Representation::optional(create).with_update(update))
    }

    pub fn group(self, name: impl Into<String>, group: RepresentationGroup) -> Self {
        self.field(name, group)
    }

    pub fn groups(self, name: impl Into<String>, groups: Vec<RepresentationGroup>) -> Self {
        self.field(name, groups)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Field)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field by dotted path. Group segments are entered by name,
    /// repeated groups by numeric index (`route_rules.0.destination`).
    pub fn get(&self, path: &str) -> Option<&Field> {
        let segments: Vec<&str> = path.split('.').collect();
        lookup(self, &segments)
    }

    /// Copy with the field at `path` inserted or replaced. Intermediate
    /// segments must name existing groups; otherwise the copy is unchanged.
    pub fn updated(&self, path: &str, field: impl Into<Field>) -> Self {
        let segments: Vec<&str> = path.split('.').collect();
        let mut copy = self.clone();
        if !update_nested(&mut copy, &segments, field.into()) {
            tracing::debug!("representation path {} not found, copy left unchanged", path);
        }
        copy
    }

    /// Copy with the fields at each dotted path removed
    pub fn without(&self, paths: &[&str]) -> Self {
        let mut copy = self.clone();
        for path in paths {
            let segments: Vec<&str> = path.split('.').collect();
            remove_nested(&mut copy, &segments);
        }
        copy
    }

    /// Copy with every top-level field of `other` added, replacing on conflict
    pub fn with_fields(&self, other: &RepresentationMap) -> Self {
        let mut copy = self.clone();
        for (name, field) in &other.fields {
            copy.fields.insert(name.clone(), field.clone());
        }
        copy
    }
}

fn lookup<'a>(map: &'a RepresentationMap, segments: &[&str]) -> Option<&'a Field> {
    let (head, rest) = segments.split_first()?;
    let field = map.fields.get(*head)?;
    if rest.is_empty() {
        return Some(field);
    }
    match field {
        Field::Leaf(_) => None,
        Field::Group(g) => lookup(&g.group, rest),
        Field::Groups(gs) => {
            let (index, rest) = rest.split_first()?;
            let group = gs.get(index.parse::<usize>().ok()?)?;
            if rest.is_empty() {
                return None;
            }
            lookup(&group.group, rest)
        }
    }
}

fn update_nested(map: &mut RepresentationMap, segments: &[&str], field: Field) -> bool {
    let Some((head, rest)) = segments.split_first() else {
        return false;
    };
    if rest.is_empty() {
        map.fields.insert(head.to_string(), field);
        return true;
    }
    match map.fields.get_mut(*head) {
        Some(Field::Group(g)) => update_nested(&mut g.group, rest, field),
        Some(Field::Groups(gs)) => {
            let Some((index, rest)) = rest.split_first() else {
                return false;
            };
            match index.parse::<usize>().ok().and_then(|i| gs.get_mut(i)) {
                Some(group) => update_nested(&mut group.group, rest, field),
                None => false,
            }
        }
        _ => false,
    }
}

fn remove_nested(map: &mut RepresentationMap, segments: &[&str]) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    if rest.is_empty() {
        map.fields.remove(*head);
        return;
    }
    match map.fields.get_mut(*head) {
        Some(Field::Group(g)) => remove_nested(&mut g.group, rest),
        Some(Field::Groups(gs)) => {
            if let Some((index, rest)) = rest.split_first() {
                if let Some(group) = index.parse::<usize>().ok().and_then(|i| gs.get_mut(i)) {
                    remove_nested(&mut group.group, rest);
                }
            }
        }
        _ => {}
    }
}
