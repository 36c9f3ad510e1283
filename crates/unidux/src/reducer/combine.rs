//! Reducer composition
//!
//! Large state shapes are split into independently testable slices, each owned
//! by one sub-reducer. The combined reducer hands every sub-reducer only its own
//! slice plus the action, and only allocates a new top-level state when at least
//! one slice changed.

use super::Reducer;
use crate::error::{Result, StoreError};
use std::any::{type_name, Any};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A type-erased state slice
pub type Slice = Arc<dyn Any + Send + Sync>;

/// State shape produced by [`CombineReducers`]: one slice per key
#[derive(Clone, Default)]
pub struct CombinedState {
    slices: BTreeMap<String, Slice>,
}

impl CombinedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a slice
    pub fn with_slice<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        self.slices.insert(key.into(), Arc::new(value));
        self
    }

    /// Get a typed handle to a slice
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.slices.get(key).cloned()?.downcast::<T>().ok()
    }

    /// Borrow a slice
    pub fn get_ref<T: Any + Send + Sync>(&self, key: &str) -> Option<&T> {
        self.slices.get(key)?.downcast_ref::<T>()
    }

    /// Untyped access, e.g. for identity comparisons
    pub fn slice(&self, key: &str) -> Option<&Slice> {
        self.slices.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slices.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slices.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

impl fmt::Debug for CombinedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedState")
            .field("slices", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Object-safe view of a typed sub-reducer
trait SliceReducer<A>: Send + Sync {
    fn initial(&self) -> Slice;

    fn reduce_slice(&self, key: &str, slice: &Slice, action: &A) -> Result<Slice>;
}

struct TypedSlice<T, F> {
    initial: Arc<T>,
    reducer: F,
}

impl<T, A, F> SliceReducer<A> for TypedSlice<T, F>
where
    T: Any + Send + Sync,
    F: Reducer<T, A>,
{
    fn initial(&self) -> Slice {
        let slice: Slice = self.initial.clone();
        slice
    }

    fn reduce_slice(&self, key: &str, slice: &Slice, action: &A) -> Result<Slice> {
        let typed = Arc::clone(slice).downcast::<T>().map_err(|_| {
            StoreError::ReducerContractViolation {
                key: key.to_string(),
                reason: format!("slice is not a `{}`", type_name::<T>()),
            }
        })?;

        let next = self.reducer.reduce(&typed, action)?;
        if Arc::ptr_eq(&next, &typed) {
            return Ok(Arc::clone(slice));
        }
        Ok(next)
    }
}

/// Builder for a reducer over [`CombinedState`]
///
/// ```ignore
/// let reducer = combine_reducers()
///     .slice("a", 0_i64, reduce_a)
///     .slice("b", Vec::<String>::new(), reduce_b);
/// let initial_state = reducer.initial_state();
/// let store = create_store(reducer, initial_state);
/// ```
pub struct CombineReducers<A> {
    reducers: Vec<(String, Box<dyn SliceReducer<A>>)>,
}

impl<A: 'static> CombineReducers<A> {
    pub fn new() -> Self {
        Self {
            reducers: Vec::new(),
        }
    }

    /// Register the sub-reducer that owns `key`
    ///
    /// Registering the same key twice replaces the earlier sub-reducer.
    pub fn slice<T, F>(mut self, key: impl Into<String>, initial: T, reducer: F) -> Self
    where
        T: Any + Send + Sync,
        F: Reducer<T, A> + 'static,
    {
        let key = key.into();
        let entry: Box<dyn SliceReducer<A>> = Box::new(TypedSlice {
            initial: Arc::new(initial),
            reducer,
        });

        match self.reducers.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = entry,
            None => self.reducers.push((key, entry)),
        }
        self
    }

    /// State with every registered slice at its initial value
    pub fn initial_state(&self) -> CombinedState {
        CombinedState {
            slices: self
                .reducers
                .iter()
                .map(|(key, reducer)| (key.clone(), reducer.initial()))
                .collect(),
        }
    }
}

impl<A: 'static> Default for CombineReducers<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> Reducer<CombinedState, A> for CombineReducers<A> {
    fn reduce(&self, state: &Arc<CombinedState>, action: &A) -> Result<Arc<CombinedState>> {
        let mut changed: Option<BTreeMap<String, Slice>> = None;

        for (key, reducer) in &self.reducers {
            // Missing slices start from their initial value
            let (previous, seeded) = match state.slices.get(key) {
                Some(slice) => (Arc::clone(slice), false),
                None => (reducer.initial(), true),
            };

            let next = reducer.reduce_slice(key, &previous, action)?;
            if seeded || !Arc::ptr_eq(&next, &previous) {
                changed
                    .get_or_insert_with(|| state.slices.clone())
                    .insert(key.clone(), next);
            }
        }

        Ok(match changed {
            Some(slices) => Arc::new(CombinedState { slices }),
            None => Arc::clone(state),
        })
    }
}

/// Start building a combined reducer
pub fn combine_reducers<A: 'static>() -> CombineReducers<A> {
    CombineReducers::new()
}
