//! Ancestor walks over the type graph.

use alloc::collections::VecDeque;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use jv_reflect::info::TypeInfo;
use jv_reflect::{ProjectFn, Reflect};
use jv_utils::hash::HashSet;

// -----------------------------------------------------------------------------
// Ancestor

/// A type reachable from another one through parents and interfaces,
/// including the type itself.
#[derive(Clone)]
pub struct Ancestor {
    info: &'static TypeInfo,
    projection: Option<Arc<ProjectFn>>,
    distance: usize,
}

impl Ancestor {
    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        self.info
    }

    /// Number of parent or interface links from the starting type.
    #[inline]
    pub fn distance(&self) -> usize {
        self.distance
    }

    /// The projection from the starting type to the class part members of
    /// this ancestor are read from. `None` when no projection is needed.
    #[inline]
    pub fn projection(&self) -> Option<&Arc<ProjectFn>> {
        self.projection.as_ref()
    }

    /// Projects a value of the starting type to this ancestor's part.
    #[inline]
    pub fn project<'a>(&self, value: &'a dyn Reflect) -> Option<&'a dyn Reflect> {
        match &self.projection {
            Some(project) => project(value),
            None => Some(value),
        }
    }
}

impl fmt::Debug for Ancestor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ancestor")
            .field("type", &self.info.type_path())
            .field("distance", &self.distance)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Walk

/// Lists `info` and all its ancestors, breadth first.
///
/// The parent of a type comes before the interfaces it implements. A type
/// reached twice, such as an interface implemented by both a class and
/// its parent, is listed once at its first position.
pub fn ancestors(info: &'static TypeInfo) -> Vec<Ancestor> {
    let mut result = Vec::new();
    let mut seen = HashSet::<TypeId>::default();
    let mut queue = VecDeque::new();
    queue.push_back(Ancestor {
        info,
        projection: None,
        distance: 0,
    });

    while let Some(current) = queue.pop_front() {
        if !seen.insert(current.info.type_id()) {
            continue;
        }

        if let Some(link) = current.info.parent_link() {
            queue.push_back(Ancestor {
                info: link.info(),
                projection: Some(compose(current.projection.as_ref(), link.projection())),
                distance: current.distance + 1,
            });
        }
        for interface in current.info.interfaces() {
            queue.push_back(Ancestor {
                info: interface,
                projection: current.projection.clone(),
                distance: current.distance + 1,
            });
        }

        result.push(current);
    }
    result
}

fn compose(outer: Option<&Arc<ProjectFn>>, inner: &Arc<ProjectFn>) -> Arc<ProjectFn> {
    match outer {
        None => inner.clone(),
        Some(outer) => {
            let (outer, inner) = (outer.clone(), inner.clone());
            jv_reflect::projection(move |value| outer(value).and_then(|part| inner(part)))
        }
    }
}
