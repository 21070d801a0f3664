//! Property-based tests for bubbling resolution.

use super::*;
use crate::source::MemorySource;
use proptest::prelude::*;

const VALUES: ListKey<i64> = ListKey::new("values");
const SETTING: ScalarKey<i64> = ScalarKey::new("setting");

// Small value domain so adds and removes collide often.
fn modification_strategy() -> impl Strategy<Value = ListModification<i64>> {
    (0i64..6, any::<bool>()).prop_map(|(value, added)| {
        if added {
            ListModification::added(value)
        } else {
            ListModification::removed(value)
        }
    })
}

// A scope: its list edits, whether they are authoritative, and whether it
// raises stop-bubbling.
fn scope_strategy() -> impl Strategy<Value = (Vec<ListModification<i64>>, bool, bool)> {
    (
        prop::collection::vec(modification_strategy(), 0..5),
        prop::bool::weighted(0.2),
        prop::bool::weighted(0.2),
    )
}

fn memory_source(index: usize, scope: &(Vec<ListModification<i64>>, bool, bool)) -> MemorySource {
    let (modifications, authoritative, stop) = scope;
    let mut source = MemorySource::new(format!("scope-{index}"));
    for modification in modifications {
        source = if modification.is_added() {
            source.add(VALUES.name(), *modification.value())
        } else {
            source.remove(VALUES.name(), *modification.value())
        };
    }
    if *authoritative {
        source = source.reset(VALUES.name());
    }
    if *stop {
        source = source.with_stop_bubbling(true);
    }
    source
}

fn build(scopes: &[(Vec<ListModification<i64>>, bool, bool)]) -> BubblingResolver {
    scopes
        .iter()
        .enumerate()
        .fold(BubblingResolver::builder(), |builder, (i, scope)| {
            builder.with_source(memory_source(i, scope))
        })
        .build()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Fold output holds each value at most once
    #[test]
    fn fold_never_duplicates(
        modifications in prop::collection::vec(modification_strategy(), 0..30)
    ) {
        let folded = fold_modifications(modifications);
        for (i, value) in folded.iter().enumerate() {
            prop_assert!(!folded[i + 1..].contains(value), "{} appears twice", value);
        }
    }

    // A value survives exactly when its last modification is an add
    #[test]
    fn fold_keeps_values_whose_last_edit_adds(
        modifications in prop::collection::vec(modification_strategy(), 0..30)
    ) {
        let folded = fold_modifications(modifications.clone());
        for candidate in 0i64..6 {
            let last = modifications
                .iter()
                .rev()
                .find(|m| *m.value() == candidate)
                .map(ListModification::is_added);
            prop_assert_eq!(folded.contains(&candidate), last == Some(true));
        }
    }

    // Resolution matches folding the visited scopes' edits farthest first
    #[test]
    fn list_resolution_matches_model(
        scopes in prop::collection::vec(scope_strategy(), 0..6)
    ) {
        let resolver = build(&scopes);

        let mut visited = Vec::new();
        for (modifications, authoritative, stop) in &scopes {
            // MemorySource only answers keys it has entries for.
            if modifications.is_empty() && !authoritative {
                continue;
            }
            visited.push(modifications.clone());
            if *authoritative || *stop {
                break;
            }
        }
        let expected = fold_modifications(visited.into_iter().rev().flatten());

        prop_assert_eq!(resolver.resolve(&VALUES), expected);
    }

    // Scalar resolution takes the first authoritative value unless a
    // non-authoritative scope stops bubbling before it
    #[test]
    fn scalar_resolution_matches_model(
        scopes in prop::collection::vec(
            (prop::option::of((0i64..100, any::<bool>())), prop::bool::weighted(0.2)),
            0..6,
        )
    ) {
        let resolver = scopes
            .iter()
            .enumerate()
            .fold(BubblingResolver::builder(), |builder, (i, (answer, stop))| {
                let mut source = MemorySource::new(format!("scope-{i}"));
                if let Some((value, authoritative)) = answer {
                    source = if *authoritative {
                        source.set(SETTING.name(), *value)
                    } else {
                        source.suggest(SETTING.name(), *value)
                    };
                }
                builder.with_source(source.with_stop_bubbling(*stop))
            })
            .build();

        let mut expected = None;
        for (answer, stop) in &scopes {
            let Some((value, authoritative)) = answer else {
                continue;
            };
            if *authoritative {
                expected = Some(*value);
                break;
            }
            if *stop {
                break;
            }
        }

        prop_assert_eq!(resolver.resolve(&SETTING), expected);
    }

    // Resolving twice gives the same list
    #[test]
    fn list_resolution_is_idempotent(
        scopes in prop::collection::vec(scope_strategy(), 0..6)
    ) {
        let resolver = build(&scopes);
        prop_assert_eq!(resolver.resolve(&VALUES), resolver.resolve(&VALUES));
    }
}
