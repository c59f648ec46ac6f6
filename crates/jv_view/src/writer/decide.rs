use jv_reflect::Reflect;
use jv_reflect::info::TypeInfo;

use crate::attrs::Include;
use crate::config::Inclusion;
use crate::introspect::PropertyDescriptor;
use crate::pattern::MatchKind;
use crate::rules::RuleSet;

use super::Context;

/// Decides whether `property` is written, `candidate` being its path
/// relative to the rules in force.
///
/// Exact matches outrank wildcard ones, and includes outrank excludes of
/// the same kind. Without rules, or when no pattern matches, the ignore
/// tags decide.
pub(crate) fn field_allowed(
    ctx: &Context<'_>,
    rules: Option<&RuleSet>,
    candidate: &str,
    property: &PropertyDescriptor,
    referring: Option<&PropertyDescriptor>,
) -> bool {
    let Some(rules) = rules else {
        return !ctx.cache.is_ignored(property, referring);
    };

    let included = ctx.cache.evaluate(rules.includes(), candidate, true);
    let excluded = ctx.cache.evaluate(rules.excludes(), candidate, false);
    let allowed = match (included, excluded) {
        (MatchKind::Exact, _) => true,
        (_, MatchKind::Exact) => false,
        (MatchKind::Wildcard, _) => true,
        (_, MatchKind::Wildcard) => false,
        (MatchKind::None, MatchKind::None) => !ctx.cache.is_ignored(property, referring),
    };

    log::trace!("`{candidate}`: include {included:?}, exclude {excluded:?}, allowed {allowed}");
    allowed
}

/// Applies the null policy: the property's own, then the owner type's,
/// then the engine's.
pub(crate) fn value_allowed(
    ctx: &Context<'_>,
    property: &PropertyDescriptor,
    owner: &TypeInfo,
    value: &dyn Reflect,
) -> bool {
    if !value.reflect_ref().is_null() {
        return true;
    }
    let inclusion = property
        .get_attribute::<Include>()
        .or_else(|| owner.get_attribute::<Include>())
        .map_or(ctx.inclusion, |include| include.0);
    inclusion == Inclusion::Always
}
