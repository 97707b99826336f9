//! Lexical environments for the runjs interpreter.
//!
//! Environment records live in an arena owned by one interpreter and point at
//! their parent through an [`EnvId`]. A record stays allocated while its scope
//! runs or while some [`ScopeHandle`] to it is alive. Closures hold a handle
//! to the record they were created in, and every handle holds its parent's.
//!
//! Released records whose handles are only reachable from other released
//! records (a function record holding the closures declared inside it) are
//! reclaimed by [`Environments::collect`], which runs as released records
//! pile up. Freed slots are reused by later scopes.

mod retention;

use crate::error::{Result, RuntimeError};
use crate::value::Value;
use runjs_parser::DeclarationKind;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Released records tolerated before the first collection
const MIN_COLLECT_THRESHOLD: usize = 64;

/// Handle to an environment record in an [`Environments`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvId(usize);

/// Identity of one arena; closures remember the realm that created them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RealmId(usize);

impl RealmId {
    fn next() -> Self {
        static NEXT_REALM: AtomicUsize = AtomicUsize::new(1);
        RealmId(NEXT_REALM.fetch_add(1, Ordering::Relaxed))
    }
}

/// Keeps a record, and through `parent` its ancestors, allocated
#[derive(Debug)]
pub struct ScopeHandle {
    env: EnvId,
    parent: Option<ScopeRef>,
}

pub type ScopeRef = Rc<ScopeHandle>;

impl ScopeHandle {
    pub fn env(&self) -> EnvId {
        self.env
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    Var,
    Let,
    Const,
}

impl From<DeclarationKind> for Mutability {
    fn from(kind: DeclarationKind) -> Self {
        match kind {
            DeclarationKind::Var => Mutability::Var,
            DeclarationKind::Let => Mutability::Let,
            DeclarationKind::Const => Mutability::Const,
        }
    }
}

/// A single named storage cell
#[derive(Debug, Clone)]
pub struct Binding {
    pub value: Value,
    pub mutability: Mutability,
}

/// Whether `var` declarations stop at a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentKind {
    Block,
    Function,
}

#[derive(Debug)]
pub struct EnvironmentRecord {
    pub kind: EnvironmentKind,
    pub parent: Option<EnvId>,
    bindings: HashMap<String, Binding>,
    handle: Weak<ScopeHandle>,
    /// Held while the record's scope is running
    anchor: Option<ScopeRef>,
}

impl EnvironmentRecord {
    fn new(kind: EnvironmentKind, parent: Option<EnvId>) -> Self {
        Self {
            kind,
            parent,
            bindings: HashMap::new(),
            handle: Weak::new(),
            anchor: None,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings.iter().map(|(name, binding)| (name.as_str(), binding))
    }
}

/// Arena of environment records
#[derive(Debug)]
pub struct Environments {
    records: Vec<EnvironmentRecord>,
    free: Vec<usize>,
    /// Records whose scope exited while handles to them were still alive
    released: Vec<EnvId>,
    collect_at: usize,
    realm: RealmId,
}

impl Environments {
    /// Create an arena holding only the root record
    pub fn new_root() -> Self {
        let mut root = EnvironmentRecord::new(EnvironmentKind::Block, None);
        let anchor = Rc::new(ScopeHandle {
            env: EnvId(0),
            parent: None,
        });
        root.handle = Rc::downgrade(&anchor);
        root.anchor = Some(anchor);

        Self {
            records: vec![root],
            free: Vec::new(),
            released: Vec::new(),
            collect_at: MIN_COLLECT_THRESHOLD,
            realm: RealmId::next(),
        }
    }

    pub fn root(&self) -> EnvId {
        EnvId(0)
    }

    pub fn realm(&self) -> RealmId {
        self.realm
    }

    /// Number of allocated records
    pub fn len(&self) -> usize {
        self.records.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn record(&self, id: EnvId) -> &EnvironmentRecord {
        &self.records[id.0]
    }

    fn record_mut(&mut self, id: EnvId) -> &mut EnvironmentRecord {
        &mut self.records[id.0]
    }

    /// Open a record for a scope that is starting to run
    pub fn push(&mut self, kind: EnvironmentKind, parent: EnvId) -> EnvId {
        let parent_handle = self.capture(parent);
        let record = EnvironmentRecord::new(kind, Some(parent));
        let id = match self.free.pop() {
            Some(slot) => {
                self.records[slot] = record;
                EnvId(slot)
            }
            None => {
                self.records.push(record);
                EnvId(self.records.len() - 1)
            }
        };

        let anchor = Rc::new(ScopeHandle {
            env: id,
            parent: Some(parent_handle),
        });
        let record = self.record_mut(id);
        record.handle = Rc::downgrade(&anchor);
        record.anchor = Some(anchor);
        id
    }

    /// A handle keeping `id` allocated after its scope exits
    pub fn capture(&mut self, id: EnvId) -> ScopeRef {
        if let Some(handle) = self.record(id).handle.upgrade() {
            return handle;
        }
        let parent = self.record(id).parent.map(|parent| self.capture(parent));
        let handle = Rc::new(ScopeHandle { env: id, parent });
        self.record_mut(id).handle = Rc::downgrade(&handle);
        handle
    }

    /// The scope of `id` has exited.
    ///
    /// The record is freed at once unless a handle still refers to it.
    pub fn release(&mut self, id: EnvId) {
        if id == self.root() || self.record(id).anchor.is_none() {
            return;
        }
        let record = self.record_mut(id);
        record.anchor = None;
        if record.handle.strong_count() == 0 {
            let bindings = self.free_record(id);
            drop(bindings);
            return;
        }

        self.released.push(id);
        if self.released.len() >= self.collect_at {
            self.collect();
        }
    }

    /// Free released records that nothing outside the released set keeps
    /// alive.
    pub fn collect(&mut self) {
        let released = std::mem::take(&mut self.released);
        let unreachable = retention::unreachable_records(self, &released);

        let mut garbage = Vec::new();
        for id in released {
            if unreachable.contains(&id) {
                garbage.push(self.free_record(id));
            } else {
                self.released.push(id);
            }
        }
        self.collect_at = (self.released.len() * 2).max(MIN_COLLECT_THRESHOLD);

        tracing::trace!(
            freed = garbage.len(),
            retained = self.released.len(),
            "collected environment records"
        );
        drop(garbage);
    }

    /// Return the slot to the free list, handing back the bindings so the
    /// caller drops them once the arena is consistent again.
    fn free_record(&mut self, id: EnvId) -> HashMap<String, Binding> {
        let record = self.record_mut(id);
        record.parent = None;
        record.handle = Weak::new();
        record.anchor = None;
        let bindings = std::mem::take(&mut record.bindings);
        self.free.push(id.0);
        bindings
    }

    /// Nearest record at or above `env` that `var` declarations land in
    pub fn hoisting_target(&self, env: EnvId) -> EnvId {
        let mut current = env;
        loop {
            let record = self.record(current);
            match (record.kind, record.parent) {
                (EnvironmentKind::Block, Some(parent)) => current = parent,
                _ => return current,
            }
        }
    }

    /// Declare a `var` in the hoisting target.
    ///
    /// Returns `false` when the name was already bound there, in which case
    /// nothing changes.
    pub fn declare_var(&mut self, env: EnvId, name: &str, value: Value) -> bool {
        let target = self.hoisting_target(env);
        let record = self.record_mut(target);
        if record.bindings.contains_key(name) {
            return false;
        }
        record.bindings.insert(
            name.to_string(),
            Binding {
                value,
                mutability: Mutability::Var,
            },
        );
        true
    }

    pub fn declare_let(&mut self, env: EnvId, name: &str, value: Value) -> Result<()> {
        self.declare_lexical(env, name, value, Mutability::Let)
    }

    pub fn declare_const(&mut self, env: EnvId, name: &str, value: Value) -> Result<()> {
        self.declare_lexical(env, name, value, Mutability::Const)
    }

    fn declare_lexical(
        &mut self,
        env: EnvId,
        name: &str,
        value: Value,
        mutability: Mutability,
    ) -> Result<()> {
        let record = self.record_mut(env);
        if record.bindings.contains_key(name) {
            return Err(RuntimeError::duplicate_declaration(name));
        }
        record
            .bindings
            .insert(name.to_string(), Binding { value, mutability });
        Ok(())
    }

    pub fn declare(
        &mut self,
        kind: DeclarationKind,
        env: EnvId,
        name: &str,
        value: Value,
    ) -> Result<()> {
        match kind {
            DeclarationKind::Var => {
                self.declare_var(env, name, value);
                Ok(())
            }
            DeclarationKind::Let => self.declare_let(env, name, value),
            DeclarationKind::Const => self.declare_const(env, name, value),
        }
    }

    /// Bind a hoisted function declaration in `env` itself.
    ///
    /// Replaces an earlier `var` or function of the same name; a `let` or
    /// `const` binding there is a duplicate declaration.
    pub fn declare_function(&mut self, env: EnvId, name: &str, value: Value) -> Result<()> {
        let record = self.record_mut(env);
        match record.bindings.get(name) {
            Some(binding) if binding.mutability != Mutability::Var => {
                Err(RuntimeError::duplicate_declaration(name))
            }
            _ => {
                record.bindings.insert(
                    name.to_string(),
                    Binding {
                        value,
                        mutability: Mutability::Var,
                    },
                );
                Ok(())
            }
        }
    }

    pub fn lookup(&self, env: EnvId, name: &str) -> Option<(EnvId, &Binding)> {
        let mut current = Some(env);
        while let Some(id) = current {
            let record = self.record(id);
            if let Some(binding) = record.bindings.get(name) {
                return Some((id, binding));
            }
            current = record.parent;
        }
        None
    }

    pub fn read(&self, env: EnvId, name: &str) -> Result<Value> {
        self.lookup(env, name)
            .map(|(_, binding)| binding.value.clone())
            .ok_or_else(|| RuntimeError::reference_error(name))
    }

    pub fn write(&mut self, env: EnvId, name: &str, value: Value) -> Result<()> {
        let (owner, mutability) = self
            .lookup(env, name)
            .map(|(owner, binding)| (owner, binding.mutability))
            .ok_or_else(|| RuntimeError::reference_error(name))?;

        if mutability == Mutability::Const {
            return Err(RuntimeError::assignment_to_constant(name));
        }
        if let Some(binding) = self.record_mut(owner).bindings.get_mut(name) {
            binding.value = value;
        }
        Ok(())
    }
}

impl Default for Environments {
    fn default() -> Self {
        Self::new_root()
    }
}
