//! Assignability between inferred types.

use crate::type_info::TypeDescription;

/// Whether a value of type `source` may be stored in a slot of type `target`.
///
/// The relation is directional. Integers compare by effective width, integer
/// arrays by their element types, and `0`/`1` literals (or any unsigned
/// one-bit integer, Bernoulli draws included) may stand in for booleans.
/// Everything else requires equal type tags.
#[must_use]
pub fn is_compatible(target: &TypeDescription, source: &TypeDescription) -> bool {
    if !source.is_distribution()
        && let (Some(target), Some(source)) = (target.as_integer(), source.as_integer())
        && target.effective_width() < source.effective_width()
    {
        return false;
    }
    if let (Some(target), Some(source)) = (target.as_integer_array(), source.as_integer_array())
        && target.effective_width() < source.effective_width()
    {
        return false;
    }
    if target.is_boolean() {
        match source {
            TypeDescription::Integer(integer) => {
                return match integer.literal {
                    Some(literal) => !literal.negative && literal.value <= 1,
                    None => !integer.signed && integer.width == 1,
                };
            }
            TypeDescription::Distribution(draw) => return !draw.signed && draw.width == 1,
            _ => {}
        }
    }
    target.tag() == source.tag()
}
