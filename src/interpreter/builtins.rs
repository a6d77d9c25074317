use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::io::Write;
use std::rc::Rc;
use lazy_static::lazy_static;
use crate::interpreter::object::Object;


pub type BuiltinFunction = fn(&[Rc<Object>], &mut dyn Write) -> Rc<Object>;

/// A host function callable from interpreted code. `puts` writes to the sink it is given.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub function: BuiltinFunction,
}

impl Builtin {
    pub fn call(&self, args: &[Rc<Object>], out: &mut dyn Write) -> Rc<Object> {
        (self.function)(args, out)
    }
}

impl Debug for Builtin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

lazy_static! {
    static ref BUILTINS: HashMap<&'static str, Builtin> = [
        Builtin { name: "len", function: len },
        Builtin { name: "first", function: first },
        Builtin { name: "last", function: last },
        Builtin { name: "rest", function: rest },
        Builtin { name: "push", function: push },
        Builtin { name: "puts", function: puts },
    ].into_iter().map(|builtin| (builtin.name, builtin)).collect();
}

thread_local! {
    // One object per builtin, so identity comparison treats every reference to it as equal
    static BUILTIN_OBJECTS: HashMap<&'static str, Rc<Object>> = BUILTINS.values()
        .map(|builtin| (builtin.name, Rc::new(Object::Builtin(*builtin))))
        .collect();
}

pub fn lookup(name: &str) -> Option<Rc<Object>> {
    BUILTIN_OBJECTS.with(|objects| objects.get(name).map(Rc::clone))
}

fn check_arity(args: &[Rc<Object>], want: usize) -> Result<(), Rc<Object>> {
    if args.len() == want {
        Ok(())
    } else {
        Err(Object::error(format!("wrong number of arguments. got={}, want={}", args.len(), want)))
    }
}

/// The elements of the single array argument of `name`.
fn array_argument<'a>(name: &str, args: &'a [Rc<Object>], want: usize) -> Result<&'a [Rc<Object>], Rc<Object>> {
    check_arity(args, want)?;

    match &*args[0] {
        Object::Array(elements) => Ok(elements),
        other => Err(Object::error(format!("argument to `{}` must be ARRAY, got {}", name, other.object_type()))),
    }
}

fn len(args: &[Rc<Object>], _: &mut dyn Write) -> Rc<Object> {
    if let Err(err) = check_arity(args, 1) {
        return err;
    }

    match &*args[0] {
        Object::String(value) => Rc::new(Object::Integer(value.len() as i64)),
        Object::Array(elements) => Rc::new(Object::Integer(elements.len() as i64)),
        other => Object::error(format!("argument to `len` not supported, got {}", other.object_type())),
    }
}

fn first(args: &[Rc<Object>], _: &mut dyn Write) -> Rc<Object> {
    match array_argument("first", args, 1) {
        Ok(elements) => elements.first().map(Rc::clone).unwrap_or_else(Object::null),
        Err(err) => err,
    }
}

fn last(args: &[Rc<Object>], _: &mut dyn Write) -> Rc<Object> {
    match array_argument("last", args, 1) {
        Ok(elements) => elements.last().map(Rc::clone).unwrap_or_else(Object::null),
        Err(err) => err,
    }
}

fn rest(args: &[Rc<Object>], _: &mut dyn Write) -> Rc<Object> {
    match array_argument("rest", args, 1) {
        Ok([]) => Object::null(),
        Ok([_, tail @ ..]) => Rc::new(Object::Array(tail.to_vec())),
        Err(err) => err,
    }
}

fn push(args: &[Rc<Object>], _: &mut dyn Write) -> Rc<Object> {
    match array_argument("push", args, 2) {
        Ok(elements) => {
            let mut pushed = elements.to_vec();
            pushed.push(Rc::clone(&args[1]));
            Rc::new(Object::Array(pushed))
        },
        Err(err) => err,
    }
}

fn puts(args: &[Rc<Object>], out: &mut dyn Write) -> Rc<Object> {
    for arg in args {
        if let Err(err) = writeln!(out, "{}", arg) {
            return Object::error(format!("could not write output: {}", err));
        }
    }

    Object::null()
}
