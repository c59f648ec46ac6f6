//! Rule sets: include patterns, exclude patterns and transforms.

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use jv_reflect::{AccessError, Reflect};
use jv_utils::hash::HashMap;

use crate::error::ConfigError;
use crate::pattern::PatternSet;

// -----------------------------------------------------------------------------
// Transform

/// Replaces the value of a property, given its owner and the value read.
pub type TransformFn = dyn for<'a> Fn(&'a dyn Reflect, &'a dyn Reflect) -> Result<Box<dyn Reflect>, AccessError>
    + Send
    + Sync;

/// A shared transform function.
///
/// Transforms compare equal only when they are the same function object.
#[derive(Clone)]
pub struct Transform(Arc<TransformFn>);

impl Transform {
    /// Wraps a transform over an owner of type `O` and a value of type `V`.
    ///
    /// `Option`, `Box` and `Arc` around `O` or `V` are looked through; any
    /// other type is an [`AccessError`].
    pub fn new<O, V, R, F>(f: F) -> Self
    where
        O: Reflect,
        V: Reflect,
        R: Reflect,
        F: Fn(&O, &V) -> R + Send + Sync + 'static,
    {
        Self(Arc::new(
            move |owner: &dyn Reflect, value: &dyn Reflect| -> Result<Box<dyn Reflect>, AccessError> {
                let this = owner
                    .downcast_represented::<O>()
                    .ok_or_else(|| AccessError::mismatch::<O>(owner))?;
                let value = value
                    .downcast_represented::<V>()
                    .ok_or_else(|| AccessError::mismatch::<V>(value))?;
                Ok(Box::new(f(this, value)))
            },
        ))
    }

    /// Wraps an untyped transform function.
    #[inline]
    pub fn from_fn(f: Arc<TransformFn>) -> Self {
        Self(f)
    }

    #[inline]
    pub fn apply(&self, owner: &dyn Reflect, value: &dyn Reflect) -> Result<Box<dyn Reflect>, AccessError> {
        (self.0)(owner, value)
    }
}

impl PartialEq for Transform {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Transform {}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(..)")
    }
}

// -----------------------------------------------------------------------------
// Match

/// Accumulates the rules attached to one type.
///
/// Paths are relative to the type the rules are attached to. See
/// [`pattern`](crate::pattern) for the wildcard syntax.
///
/// # Examples
///
/// ```
/// use jv_view::Match;
///
/// let rules = Match::new().exclude(["*"]).include(["id", "name"]);
///
/// assert!(rules.includes().contains("id"));
/// assert_eq!(rules, Match::new().include(["name", "id"]).exclude(["*"]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Match {
    includes: BTreeSet<String>,
    excludes: BTreeSet<String>,
    transforms: BTreeMap<String, Transform>,
}

impl Match {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds include patterns.
    pub fn include<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds exclude patterns.
    pub fn exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Replaces the value at `path` with `f(owner, value)`.
    ///
    /// `path` is matched literally, without wildcards.
    pub fn transform<O, V, R, F>(self, path: impl Into<String>, f: F) -> Self
    where
        O: Reflect,
        V: Reflect,
        R: Reflect,
        F: Fn(&O, &V) -> R + Send + Sync + 'static,
    {
        self.transform_with(path, Transform::new(f))
    }

    /// Replaces the value at `path` through an existing [`Transform`].
    pub fn transform_with(mut self, path: impl Into<String>, transform: Transform) -> Self {
        self.transforms.insert(path.into(), transform);
        self
    }

    #[inline]
    pub fn includes(&self) -> &BTreeSet<String> {
        &self.includes
    }

    #[inline]
    pub fn excludes(&self) -> &BTreeSet<String> {
        &self.excludes
    }

    #[inline]
    pub fn transforms(&self) -> &BTreeMap<String, Transform> {
        &self.transforms
    }

    /// Compiles the patterns.
    pub fn compile(self) -> Result<RuleSet, ConfigError> {
        Ok(RuleSet {
            includes: PatternSet::compile(&self.includes)?,
            excludes: PatternSet::compile(&self.excludes)?,
            transforms: self
                .transforms
                .into_iter()
                .map(|(path, transform)| (path.into_boxed_str(), transform))
                .collect(),
        })
    }
}

// -----------------------------------------------------------------------------
// RuleSet

/// A compiled [`Match`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    includes: PatternSet,
    excludes: PatternSet,
    transforms: HashMap<Box<str>, Transform>,
}

impl RuleSet {
    #[inline]
    pub fn includes(&self) -> &PatternSet {
        &self.includes
    }

    #[inline]
    pub fn excludes(&self) -> &PatternSet {
        &self.excludes
    }

    #[inline]
    pub fn transform(&self, path: &str) -> Option<&Transform> {
        self.transforms.get(path)
    }

    #[inline]
    pub fn transform_paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.transforms.keys().map(|k| &**k)
    }

    /// Merges rule sets: patterns are united and transforms combined.
    ///
    /// A path transformed by more than one set keeps the last transform.
    pub fn union<'a>(sets: impl IntoIterator<Item = &'a RuleSet>) -> RuleSet {
        let sets: Vec<&RuleSet> = sets.into_iter().collect();
        let mut transforms = HashMap::default();
        for set in &sets {
            for (path, transform) in &set.transforms {
                if let Some(previous) = transforms.insert(path.clone(), transform.clone())
                    && previous != *transform
                {
                    log::warn!("transform `{path}` is defined by more than one matching rule set");
                }
            }
        }
        RuleSet {
            includes: PatternSet::union(sets.iter().map(|s| &s.includes)),
            excludes: PatternSet::union(sets.iter().map(|s| &s.excludes)),
            transforms,
        }
    }
}
