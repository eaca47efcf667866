use bigdecimal::BigDecimal;

/// One node of the JSON tree.
///
/// Containers are mutable, but a tree never structurally shares nodes, so
/// the value model itself cannot contain cycles.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(BigDecimal),
    String(String),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<&BigDecimal> {
        match self {
            Value::Number(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Replace this node with `Null` and return the previous value.
    pub fn take(&mut self) -> Value {
        std::mem::replace(self, Value::Null)
    }
}

/// Structural, order-significant equality.
///
/// Two objects are equal only when their members match pairwise in
/// insertion order; this keeps `parse(render(v)) == v` exact. Implemented
/// with an explicit worklist so comparing deeply nested trees does not
/// recurse on the native stack.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        let mut pending: Vec<(&Value, &Value)> = vec![(self, other)];
        while let Some((left, right)) = pending.pop() {
            match (left, right) {
                (Value::Null, Value::Null) => {}
                (Value::Bool(a), Value::Bool(b)) => {
                    if a != b {
                        return false;
                    }
                }
                (Value::Number(a), Value::Number(b)) => {
                    if a != b {
                        return false;
                    }
                }
                (Value::String(a), Value::String(b)) => {
                    if a != b {
                        return false;
                    }
                }
                (Value::Array(a), Value::Array(b)) => {
                    if a.len() != b.len() {
                        return false;
                    }
                    pending.extend(a.iter().zip(b.iter()));
                }
                (Value::Object(a), Value::Object(b)) => {
                    if a.members.len() != b.members.len() {
                        return false;
                    }
                    for (x, y) in a.members.iter().zip(&b.members) {
                        if x.name != y.name {
                            return false;
                        }
                        pending.push((&x.value, &y.value));
                    }
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for Value {}

/// Iterative teardown: dropping a deeply nested tree must not recurse.
impl Drop for Value {
    fn drop(&mut self) {
        match self {
            Value::Array(items) if !items.is_empty() => {}
            Value::Object(object) if !object.members.is_empty() => {}
            _ => return,
        }
        let mut queue = Vec::new();
        reap(self, &mut queue);
        while let Some(mut value) = queue.pop() {
            reap(&mut value, &mut queue);
        }
    }
}

fn reap(value: &mut Value, queue: &mut Vec<Value>) {
    match value {
        Value::Array(items) => queue.append(items),
        Value::Object(object) => {
            queue.extend(object.members.drain(..).map(|member| member.value));
        }
        _ => {}
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(BigDecimal::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(BigDecimal::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(BigDecimal::from(value))
    }
}

impl From<BigDecimal> for Value {
    fn from(value: BigDecimal) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

/// A single `(name, value)` pair inside an [`Object`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub value: Value,
}

impl Member {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Member {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An ordered collection of members with lookup by name.
///
/// Iteration follows insertion order. Member names are unique for lookup:
/// inserting an existing name replaces its value in place, keeping the
/// original position (last value wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Object {
    pub(crate) members: Vec<Member>,
}

impl Object {
    #[must_use]
    pub fn new() -> Self {
        Object {
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.members
            .iter()
            .find(|member| member.name == name)
            .map(|member| &member.value)
    }

    #[must_use]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.members
            .iter_mut()
            .find(|member| member.name == name)
            .map(|member| &mut member.value)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|member| member.name == name)
    }

    /// Insert a member, replacing the value of an existing name in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        if let Some(member) = self.members.iter_mut().find(|member| member.name == name) {
            member.value = value;
        } else {
            self.members.push(Member { name, value });
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Member> {
        self.members.iter()
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = &'a Member;
    type IntoIter = std::slice::Iter<'a, Member>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

impl IntoIterator for Object {
    type Item = Member;
    type IntoIter = std::vec::IntoIter<Member>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut object = Object::new();
        for (name, value) in iter {
            object.insert(name, value);
        }
        object
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn insert_keeps_order() {
        let mut object = Object::new();
        object.insert("b", 1i64);
        object.insert("a", 2i64);
        object.insert("c", 3i64);
        let names: Vec<&str> = object.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn duplicate_insert_is_last_wins_in_place() {
        let mut object = Object::new();
        object.insert("a", 1i64);
        object.insert("b", 2i64);
        object.insert("a", 3i64);
        assert_eq!(object.len(), 2);
        let names: Vec<&str> = object.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(object.get("a"), Some(&Value::from(3i64)));
    }

    #[test]
    fn equality_is_order_significant() {
        let mut first = Object::new();
        first.insert("a", 1i64);
        first.insert("b", 2i64);
        let mut second = Object::new();
        second.insert("b", 2i64);
        second.insert("a", 1i64);
        assert_ne!(Value::Object(first), Value::Object(second));
    }

    #[test]
    fn number_equality_is_numeric() {
        let a = Value::Number(BigDecimal::from_str("1.0").unwrap());
        let b = Value::Number(BigDecimal::from_str("1.00").unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn deep_tree_drops_without_overflow() {
        let mut value = Value::Null;
        for _ in 0..200_000 {
            value = Value::Array(vec![value]);
        }
        drop(value);
    }

    #[test]
    fn deep_trees_compare_without_overflow() {
        let build = || {
            let mut value = Value::from("leaf");
            for _ in 0..200_000 {
                value = Value::Array(vec![value]);
            }
            value
        };
        assert_eq!(build(), build());
    }
}
