//! Name and code resolution for easing curves.
//!
//! Resolution is total: anything that does not match resolves to
//! [`Easing::Linear`], so a typo in a settings file degrades to a plain
//! linear fade instead of failing the load.

use super::curve::Easing;

/// Alias table. Keys are already normalized (see [`normalize_name`]).
const ALIASES: &[(&str, Easing)] = &[
    ("linear", Easing::Linear),
    ("easeinsine", Easing::EaseInSine),
    ("sine", Easing::EaseInSine),
    ("sin(x)", Easing::EaseInSine),
    ("1", Easing::EaseInSine),
    ("easeoutsine", Easing::EaseOutSine),
    ("easeinoutsine", Easing::EaseInOutSine),
    ("easeinquad", Easing::EaseInQuad),
    ("quad", Easing::EaseInQuad),
    ("x^2", Easing::EaseInQuad),
    ("quadratic", Easing::EaseInQuad),
    ("2", Easing::EaseInQuad),
    ("easeoutquad", Easing::EaseOutQuad),
    ("easeinoutquad", Easing::EaseInOutQuad),
    ("easeincubic", Easing::EaseInCubic),
    ("cubic", Easing::EaseInCubic),
    ("x^3", Easing::EaseInCubic),
    ("cubed", Easing::EaseInCubic),
    ("3", Easing::EaseInCubic),
    ("easeoutcubic", Easing::EaseOutCubic),
    ("easeinoutcubic", Easing::EaseInOutCubic),
    ("easeinquart", Easing::EaseInQuart),
    ("quart", Easing::EaseInQuart),
    ("x^4", Easing::EaseInQuart),
    ("4", Easing::EaseInQuart),
    ("easeoutquart", Easing::EaseOutQuart),
    ("easeinoutquart", Easing::EaseInOutQuart),
    ("easeinquint", Easing::EaseInQuint),
    ("quint", Easing::EaseInQuint),
    ("x^5", Easing::EaseInQuint),
    ("5", Easing::EaseInQuint),
    ("easeoutquint", Easing::EaseOutQuint),
    ("easeinoutquint", Easing::EaseInOutQuint),
    ("easeinexpo", Easing::EaseInExpo),
    ("expo", Easing::EaseInExpo),
    ("2^x", Easing::EaseInExpo),
    ("6", Easing::EaseInExpo),
    ("easeoutexpo", Easing::EaseOutExpo),
    ("easeinoutexpo", Easing::EaseInOutExpo),
    ("easeincirc", Easing::EaseInCirc),
    ("circ", Easing::EaseInCirc),
    ("circle", Easing::EaseInCirc),
    ("7", Easing::EaseInCirc),
    ("easeoutcirc", Easing::EaseOutCirc),
    ("easeinoutcirc", Easing::EaseInOutCirc),
    ("easeinback", Easing::EaseInBack),
    ("back", Easing::EaseInBack),
    ("easeoutback", Easing::EaseOutBack),
    ("easeinoutback", Easing::EaseInOutBack),
    ("easeinelastic", Easing::EaseInElastic),
    ("elastic", Easing::EaseInElastic),
    ("easeoutelastic", Easing::EaseOutElastic),
    ("easeinoutelastic", Easing::EaseInOutElastic),
    ("easeinbounce", Easing::EaseInBounce),
    ("bounce", Easing::EaseInBounce),
    ("easeoutbounce", Easing::EaseOutBounce),
    ("easeinoutbounce", Easing::EaseInOutBounce),
];

/// Resolve a curve by integer code. Unknown codes resolve to linear.
#[inline]
pub fn lookup(code: u8) -> Easing {
    Easing::from_code(code).unwrap_or(Easing::Linear)
}

/// Resolve a curve by name, case-insensitively, through the alias table.
///
/// Never fails; unrecognized names resolve to [`Easing::Linear`]. Use
/// [`find_by_name`] to tell a miss apart from an explicit `"linear"`.
pub fn lookup_by_name(name: &str) -> Easing {
    find_by_name(name).unwrap_or(Easing::Linear)
}

/// Resolve a curve by name, returning `None` when nothing matches.
pub fn find_by_name(name: &str) -> Option<Easing> {
    let key = normalize_name(name);
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, curve)| *curve)
}

/// Name of a curve, for diagnostics.
#[inline]
pub const fn reverse_lookup(curve: Easing) -> &'static str {
    curve.name()
}

/// Canonical name for an integer code. Unknown codes report `"linear"`.
#[inline]
pub fn canonical_name(code: u8) -> &'static str {
    lookup(code).name()
}

/// Lowercase and drop whitespace, `-` and `_`.
fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}
