//! Folding list modifications into a final list.

use crate::source::ListModification;
use crate::value::ConfigValue;

/// Applies `modifications` in order to an empty list.
///
/// Each modification first removes any equal value already in the list, then
/// appends the value if it is an addition. A value therefore ends up at the
/// position of its last surviving addition, and a later removal deletes it
/// no matter how many times it was added before. Values are compared with
/// [`ConfigValue::same_value`].
///
/// # Examples
///
/// ```
/// use strata::ListModification;
/// use strata::resolver::fold_modifications;
///
/// let folded: Vec<String> = fold_modifications(vec![
///     ListModification::added("b"),
///     ListModification::added("a"),
///     ListModification::added("b"),
///     ListModification::removed("a"),
/// ]);
/// assert_eq!(folded, vec!["b"]);
/// ```
pub fn fold_modifications<T, I>(modifications: I) -> Vec<T>
where
    T: ConfigValue,
    I: IntoIterator<Item = ListModification<T>>,
{
    fold_modifications_by(modifications, T::same_value)
}

/// Like [`fold_modifications`], comparing values with `same`.
///
/// `same` should be reflexive, or a value can be left in the list twice.
pub fn fold_modifications_by<T, I, F>(modifications: I, same: F) -> Vec<T>
where
    I: IntoIterator<Item = ListModification<T>>,
    F: Fn(&T, &T) -> bool,
{
    modifications
        .into_iter()
        .fold(Vec::new(), |mut values, modification| {
            let added = modification.is_added();
            let value = modification.into_value();
            values.retain(|existing| !same(existing, &value));
            if added {
                values.push(value);
            }
            values
        })
}
