//! Parent-linked symbol tables.
//!
//! A `Scope` is a cheap handle to one block's `Environment`. Name lookups walk
//! outward through the parents until a binding is found. Both the analyzer and
//! the interpreter build their own chains from these.

use std::{
    cell::{Ref, RefCell},
    collections::HashMap,
    fmt::Debug,
    io::Write,
    rc::{Rc, Weak},
};

use crate::{
    ast::ast::FunctionDecl,
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{types::Type, value::Value};

/// A declared variable. The value cell is only meaningful at run time.
#[derive(Debug)]
pub struct Variable {
    pub name: String,
    pub qualified_name: String,
    /// For a list binding, `ty` is the element type.
    pub ty: Type,
    pub mutable: bool,
    pub is_list: bool,
    value: RefCell<Value>,
}

impl Variable {
    pub fn new(name: &str, ty: Type, mutable: bool, value: Value) -> Self {
        Variable {
            name: name.to_string(),
            qualified_name: name.to_string(),
            ty,
            mutable,
            is_list: false,
            value: RefCell::new(value),
        }
    }

    pub fn new_list(name: &str, element_type: Type, mutable: bool, value: Value) -> Self {
        Variable {
            is_list: true,
            ..Variable::new(name, element_type, mutable, value)
        }
    }

    pub fn get_value(&self) -> Value {
        self.value.borrow().clone()
    }

    pub fn borrow_value(&self) -> Ref<'_, Value> {
        self.value.borrow()
    }

    pub fn set_value(&self, value: Value) {
        *self.value.borrow_mut() = value;
    }

    /// Mutates the stored value in place (used for list element assignment).
    pub fn update_value<R>(&self, update: impl FnOnce(&mut Value) -> R) -> R {
        update(&mut *self.value.borrow_mut())
    }
}

/// Built-in function implementation. Writes go to the interpreter's output sink.
pub type NativeFn = fn(&mut dyn Write, &[Value]) -> Result<Value, ErrorImpl>;

pub enum Callable {
    Native(NativeFn),
    /// A user function closed over the scope it was declared in.
    User {
        declaration: Rc<FunctionDecl>,
        closure: WeakScope,
    },
    /// Signature only, as registered during analysis.
    Signature,
}

pub struct Function {
    pub name: String,
    pub qualified_name: String,
    pub parameter_types: Vec<Type>,
    pub return_type: Type,
    pub body: Callable,
}

impl Function {
    pub fn new(name: &str, parameter_types: Vec<Type>, return_type: Type, body: Callable) -> Self {
        Function {
            name: name.to_string(),
            qualified_name: name.to_string(),
            parameter_types,
            return_type,
            body,
        }
    }

    pub fn with_qualified_name(mut self, qualified_name: &str) -> Self {
        self.qualified_name = qualified_name.to_string();
        self
    }

    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }
}

impl Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.body {
            Callable::Native(_) => "native",
            Callable::User { .. } => "user",
            Callable::Signature => "signature",
        };

        f.debug_struct("Function")
            .field("name", &self.name)
            .field("qualified_name", &self.qualified_name)
            .field("parameter_types", &self.parameter_types)
            .field("return_type", &self.return_type)
            .field("body", &kind)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct Environment {
    variable_lookup: HashMap<String, Rc<Variable>>,
    function_lookup: HashMap<(String, usize), Rc<Function>>,
    // Set on the scope opened for a function body
    return_type: Option<Type>,
    parent: Option<Scope>,
}

#[derive(Debug, Clone)]
pub struct Scope(Rc<RefCell<Environment>>);

#[derive(Debug, Clone)]
pub struct WeakScope(Weak<RefCell<Environment>>);

impl WeakScope {
    pub fn upgrade(&self) -> Option<Scope> {
        self.0.upgrade().map(Scope)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Scope {
    pub fn new(parent: Option<Scope>) -> Self {
        Scope(Rc::new(RefCell::new(Environment {
            parent,
            ..Environment::default()
        })))
    }

    /// A root scope pre-populated with `functions`, keyed by name and arity.
    pub fn with_functions(functions: impl IntoIterator<Item = Function>) -> Self {
        let function_lookup = functions
            .into_iter()
            .map(|function| ((function.name.clone(), function.arity()), Rc::new(function)))
            .collect();

        Scope(Rc::new(RefCell::new(Environment {
            function_lookup,
            ..Environment::default()
        })))
    }

    pub fn child(&self) -> Self {
        Scope::new(Some(self.clone()))
    }

    /// Opens the body scope of a function returning `return_type`.
    pub fn function_body(&self, return_type: Type) -> Self {
        let scope = self.child();
        scope.0.borrow_mut().return_type = Some(return_type);
        scope
    }

    pub fn get_parent(&self) -> Option<Scope> {
        self.0.borrow().parent.clone()
    }

    pub fn downgrade(&self) -> WeakScope {
        WeakScope(Rc::downgrade(&self.0))
    }

    pub fn define_variable(&self, variable: Variable, position: &Position) -> Result<Rc<Variable>, Error> {
        let mut environment = self.0.borrow_mut();

        if environment.variable_lookup.contains_key(&variable.name) {
            return Err(Error::new(
                ErrorImpl::VariableAlreadyDeclared { variable: variable.name },
                position.clone(),
            ));
        }

        let variable = Rc::new(variable);
        environment.variable_lookup.insert(variable.name.clone(), Rc::clone(&variable));
        Ok(variable)
    }

    pub fn lookup_variable(&self, name: &str, position: &Position) -> Result<Rc<Variable>, Error> {
        let mut scope = Some(self.clone());

        while let Some(current) = scope {
            let found = current.0.borrow().variable_lookup.get(name).cloned();
            if let Some(variable) = found {
                return Ok(variable);
            }
            scope = current.get_parent();
        }

        Err(Error::new(
            ErrorImpl::VariableNotDeclared { variable: name.to_string() },
            position.clone(),
        ))
    }

    pub fn define_function(&self, function: Function, position: &Position) -> Result<Rc<Function>, Error> {
        let mut environment = self.0.borrow_mut();
        let key = (function.name.clone(), function.arity());

        if environment.function_lookup.contains_key(&key) {
            return Err(Error::new(
                ErrorImpl::FunctionAlreadyDeclared { function: key.0, arity: key.1 },
                position.clone(),
            ));
        }

        let function = Rc::new(function);
        environment.function_lookup.insert(key, Rc::clone(&function));
        Ok(function)
    }

    pub fn lookup_function(&self, name: &str, arity: usize, position: &Position) -> Result<Rc<Function>, Error> {
        let key = (name.to_string(), arity);
        let mut scope = Some(self.clone());

        while let Some(current) = scope {
            let found = current.0.borrow().function_lookup.get(&key).cloned();
            if let Some(function) = found {
                return Ok(function);
            }
            scope = current.get_parent();
        }

        Err(Error::new(
            ErrorImpl::FunctionNotDeclared { function: key.0, arity },
            position.clone(),
        ))
    }

    /// Return type of the nearest enclosing function body, if any.
    pub fn enclosing_return_type(&self) -> Option<Type> {
        let mut scope = Some(self.clone());

        while let Some(current) = scope {
            let found = current.0.borrow().return_type.clone();
            if found.is_some() {
                return found;
            }
            scope = current.get_parent();
        }

        None
    }
}
