use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;
use crate::interpreter::ast::{BlockStatement, Identifier};
use crate::interpreter::builtins::Builtin;
use crate::interpreter::environment::Environment;


#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Integer,
    Boolean,
    String,
    Null,
    Array,
    Hash,
    Function,
    Builtin,
    Error,
    ReturnValue,
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ObjectType::Integer => "INTEGER",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::String => "STRING",
            ObjectType::Null => "NULL",
            ObjectType::Array => "ARRAY",
            ObjectType::Hash => "HASH",
            ObjectType::Function => "FUNCTION",
            ObjectType::Builtin => "BUILTIN",
            ObjectType::Error => "ERROR",
            ObjectType::ReturnValue => "RETURN_VALUE",
        })
    }
}

/// Key of a hash object. The type tag takes part in equality, so `1` and `true` never collide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub object_type: ObjectType,
    pub value: u64,
}

#[derive(Clone, Debug)]
pub struct HashPair {
    pub key: Rc<Object>,
    pub value: Rc<Object>,
}

#[derive(Clone)]
pub struct Function {
    pub parameters: Rc<Vec<Identifier>>,
    pub body: Rc<BlockStatement>,
    pub env: Rc<RefCell<Environment>>,
}

impl Debug for Function {
    // The captured environment may contain this function again
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Function({:?})", self.parameters.iter().map(Identifier::name).collect::<Vec<&str>>())
    }
}

#[derive(Clone, Debug)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(String),
    Null,
    Array(Vec<Rc<Object>>),
    Hash(HashMap<HashKey, HashPair>),
    Function(Function),
    Builtin(Builtin),
    Error(String),
    ReturnValue(Rc<Object>),
}

thread_local! {
    static TRUE: Rc<Object> = Rc::new(Object::Boolean(true));
    static FALSE: Rc<Object> = Rc::new(Object::Boolean(false));
    static NULL: Rc<Object> = Rc::new(Object::Null);
}

impl Object {
    /// The shared `true`/`false` instance, so identity comparison agrees with value comparison.
    pub fn native_bool(value: bool) -> Rc<Object> {
        if value {
            TRUE.with(Rc::clone)
        } else {
            FALSE.with(Rc::clone)
        }
    }

    /// The shared `null` instance.
    pub fn null() -> Rc<Object> {
        NULL.with(Rc::clone)
    }

    pub fn error(message: impl Into<String>) -> Rc<Object> {
        Rc::new(Object::Error(message.into()))
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::String(_) => ObjectType::String,
            Object::Null => ObjectType::Null,
            Object::Array(_) => ObjectType::Array,
            Object::Hash(_) => ObjectType::Hash,
            Object::Function(_) => ObjectType::Function,
            Object::Builtin(_) => ObjectType::Builtin,
            Object::Error(_) => ObjectType::Error,
            Object::ReturnValue(_) => ObjectType::ReturnValue,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    /// Errors and return values stop the evaluation of whatever encloses them.
    pub fn is_signal(&self) -> bool {
        matches!(self, Object::Error(_) | Object::ReturnValue(_))
    }

    /// `null` and `false` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }

    /// `None` for objects that cannot key a hash.
    pub fn hash_key(&self) -> Option<HashKey> {
        let value = match self {
            Object::Integer(value) => *value as u64,
            Object::Boolean(value) => u64::from(*value),
            Object::String(value) => fnv1a_64(value.as_bytes()),
            _ => return None,
        };

        Some(HashKey { object_type: self.object_type(), value })
    }
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a_64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME))
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::String(value) => f.write_str(value),
            Object::Null => f.write_str("null"),
            Object::Array(elements) => write!(f, "[{}]", elements.iter()
                .map(|element| element.to_string())
                .collect::<Vec<String>>().join(", ")),
            Object::Hash(pairs) => write!(f, "{{{}}}", pairs.values()
                .map(|pair| format!("{}: {}", pair.key, pair.value))
                .collect::<Vec<String>>().join(", ")),
            Object::Function(function) => write!(f, "fn({}) {{\n{}\n}}", function.parameters.iter()
                .map(Identifier::name)
                .collect::<Vec<&str>>().join(", "), function.body),
            Object::Builtin(_) => f.write_str("builtin function"),
            Object::Error(message) => write!(f, "Error: {}", message),
            Object::ReturnValue(value) => write!(f, "{}", value),
        }
    }
}
