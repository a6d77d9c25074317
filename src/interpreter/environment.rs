use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use crate::interpreter::object::Object;


/// A lexical scope. Children hold a strong reference to their parent, which is how closures
/// keep their defining scope alive.
#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Rc<Object>>,
    parent: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new_global() -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment::default()))
    }

    pub fn new_with_parent(parent: Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            store: HashMap::new(),
            parent: Some(parent),
        }))
    }

    /// Looks `name` up in this scope, then in each enclosing one.
    pub fn get(&self, name: &str) -> Option<Rc<Object>> {
        self.store.get(name).map(Rc::clone)
            .or_else(|| self.parent.as_ref().and_then(|parent| parent.borrow().get(name)))
    }

    /// Binds `name` in this scope only; enclosing scopes are never modified.
    pub fn set(&mut self, name: &str, value: Rc<Object>) -> Rc<Object> {
        self.store.insert(name.to_owned(), Rc::clone(&value));
        value
    }
}
